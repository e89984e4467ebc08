use crate::inherit_fields;
use crate::registry::{Definition, DefinitionKind};

use super::{EffectSpec, Element};

/// Broad purpose of a skill, consulted by automatic action selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum SkillCategory {
    #[default]
    Damage,
    Heal,
    Effect,
}

/// Which combatants an action lands on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum TargetPattern {
    /// The acting creature itself.
    #[cfg_attr(feature = "serde", serde(rename = "self", alias = "user"))]
    #[strum(serialize = "self")]
    User,
    /// The living friend with the lowest HP.
    #[cfg_attr(feature = "serde", serde(alias = "ally-single"))]
    AllySingle,
    #[cfg_attr(feature = "serde", serde(alias = "ally-all"))]
    AllyAll,
    /// A fallen friend.
    #[cfg_attr(feature = "serde", serde(alias = "ally-fallen"))]
    AllyFallen,
    /// A random living opponent.
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "enemy-single"))]
    EnemySingle,
    #[cfg_attr(feature = "serde", serde(alias = "enemy-all"))]
    EnemyAll,
    /// Every living opponent in the front row, or the back row if the front is empty.
    #[cfg_attr(feature = "serde", serde(alias = "enemy-row"))]
    EnemyRow,
}

impl TargetPattern {
    /// Returns true if the pattern selects the subject's own side.
    pub const fn is_friendly(self) -> bool {
        matches!(
            self,
            Self::User | Self::AllySingle | Self::AllyAll | Self::AllyFallen
        )
    }
}

/// Stat pair used by damage and heal formulas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ScalingStat {
    /// `atk` against `def`.
    #[default]
    Atk,
    /// `mat` against `mdf`.
    Mat,
}

/// Raw skill record.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SkillDefinition {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(alias = "parent"))]
    pub inherits: Option<String>,

    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<SkillCategory>,
    pub target: Option<TargetPattern>,
    /// Priority tweak reported to presentation; negative is slower.
    pub speed: Option<i32>,
    pub element: Option<Element>,
    pub stat: Option<ScalingStat>,
    pub mp_cost: Option<u32>,
    /// Number of times the effect rolls repeat per target.
    pub repeat: Option<u32>,
    /// Opaque animation script id.
    pub script: Option<String>,
    pub effects: Option<Vec<EffectSpec>>,
}

impl SkillDefinition {
    pub const DEFAULT_SCRIPT: &'static str = "flash";

    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    pub fn category(&self) -> SkillCategory {
        self.category.unwrap_or_default()
    }

    pub fn target(&self) -> TargetPattern {
        self.target.unwrap_or_default()
    }

    pub fn speed(&self) -> i32 {
        self.speed.unwrap_or(0)
    }

    pub fn stat(&self) -> ScalingStat {
        self.stat.unwrap_or_default()
    }

    pub fn mp_cost(&self) -> u32 {
        self.mp_cost.unwrap_or(0)
    }

    pub fn repeat(&self) -> u32 {
        self.repeat.unwrap_or(1).max(1)
    }

    pub fn script(&self) -> &str {
        self.script.as_deref().unwrap_or(Self::DEFAULT_SCRIPT)
    }

    pub fn effects(&self) -> &[EffectSpec] {
        self.effects.as_deref().unwrap_or_default()
    }
}

impl Definition for SkillDefinition {
    const KIND: DefinitionKind = DefinitionKind::Skill;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn inherits(&self) -> Option<&str> {
        self.inherits.as_deref()
    }

    fn inherit_from(&mut self, parent: &Self) {
        inherit_fields!(self, parent;
            name, description, category, target, speed, element,
            stat, mp_cost, repeat, script, effects,
        );
    }

    fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
