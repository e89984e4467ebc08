//! Skills and items as one kind of action.
//!
//! Skill and item ids share a namespace. [`lookup_action`] resolves an id once,
//! skill registry first, into an [`ActionObject`] so the rest of the pipeline
//! never needs to know which table an action came from.
//!
//! # Module Structure
//!
//! - `error`: [`ActionError`], forfeiting a single action
//! - `effect`: [`EffectResult`], the pure description of what an action will do
//! - `targeting`: target selection per [`TargetPattern`]
//! - `resolver`: [`ActionResolver`], computing effects without mutating anything
pub mod effect;
pub mod error;
pub mod resolver;
pub mod targeting;

pub use effect::{EffectHit, EffectOutcome, EffectResult};
pub use error::ActionError;
pub use resolver::ActionResolver;
pub use targeting::{front_row, select_targets};

use std::sync::Arc;

use crate::env::{
    EffectSpec, Element, ItemDefinition, ScalingStat, Services, SkillCategory, SkillDefinition,
    TargetPattern,
};
use crate::registry::RegistryError;
use crate::stats::Uid;

/// A resolved skill or item.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionObject {
    Skill(Arc<SkillDefinition>),
    Item(Arc<ItemDefinition>),
}

impl ActionObject {
    pub fn id(&self) -> &str {
        match self {
            Self::Skill(skill) => &skill.id,
            Self::Item(item) => &item.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Skill(skill) => skill.name(),
            Self::Item(item) => item.name(),
        }
    }

    pub fn script(&self) -> &str {
        match self {
            Self::Skill(skill) => skill.script(),
            Self::Item(item) => item.script(),
        }
    }

    pub fn target(&self) -> TargetPattern {
        match self {
            Self::Skill(skill) => skill.target(),
            Self::Item(item) => item.target(),
        }
    }

    pub fn effects(&self) -> &[EffectSpec] {
        match self {
            Self::Skill(skill) => skill.effects(),
            Self::Item(item) => item.effects(),
        }
    }

    /// Items are classified by their effects.
    pub fn category(&self) -> SkillCategory {
        match self {
            Self::Skill(skill) => skill.category(),
            Self::Item(item) if item.effects().iter().any(EffectSpec::is_damage) => {
                SkillCategory::Damage
            }
            Self::Item(item) if item.effects().iter().any(EffectSpec::is_heal) => {
                SkillCategory::Heal
            }
            Self::Item(_) => SkillCategory::Effect,
        }
    }

    pub fn element(&self) -> Option<Element> {
        match self {
            Self::Skill(skill) => skill.element,
            Self::Item(_) => None,
        }
    }

    pub fn stat(&self) -> ScalingStat {
        match self {
            Self::Skill(skill) => skill.stat(),
            Self::Item(_) => ScalingStat::Atk,
        }
    }

    pub fn mp_cost(&self) -> u32 {
        match self {
            Self::Skill(skill) => skill.mp_cost(),
            Self::Item(_) => 0,
        }
    }

    pub fn repeat(&self) -> u32 {
        match self {
            Self::Skill(skill) => skill.repeat(),
            Self::Item(_) => 1,
        }
    }

    pub fn is_damage(&self) -> bool {
        self.effects().iter().any(EffectSpec::is_damage)
    }
}

/// Transient action value: who acts, with what, on whom.
#[derive(Clone, Debug, PartialEq)]
pub struct Action {
    pub subject: Uid,
    pub object: ActionObject,
    pub targets: Vec<Uid>,
}

/// Resolves `id` against the skill registry, then the item registry.
///
/// # Errors
///
/// - [`ActionError::UnknownAction`] if neither registry holds `id`
/// - [`ActionError::Registry`] if the definition fails to resolve
/// - [`ActionError::Service`] if a registry is not registered
pub fn lookup_action(services: &Services, id: &str) -> Result<ActionObject, ActionError> {
    match services.skills()?.get(id) {
        Ok(skill) => return Ok(ActionObject::Skill(skill)),
        Err(RegistryError::NotFound { .. }) => {}
        Err(err) => return Err(err.into()),
    }
    match services.items()?.get(id) {
        Ok(item) => Ok(ActionObject::Item(item)),
        Err(RegistryError::NotFound { .. }) => Err(ActionError::UnknownAction(id.to_owned())),
        Err(err) => Err(err.into()),
    }
}
