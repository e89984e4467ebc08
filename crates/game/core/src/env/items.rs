use crate::inherit_fields;
use crate::registry::{Definition, DefinitionKind};

use super::{EffectSpec, TargetPattern};

/// Raw consumable item record. Items resolve through the same effect
/// pipeline as skills but never scale with an element.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ItemDefinition {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(alias = "parent"))]
    pub inherits: Option<String>,

    pub name: Option<String>,
    pub description: Option<String>,
    /// Shop price in gold.
    pub cost: Option<u32>,
    pub target: Option<TargetPattern>,
    pub script: Option<String>,
    pub effects: Option<Vec<EffectSpec>>,
}

impl ItemDefinition {
    pub const DEFAULT_SCRIPT: &'static str = "item";

    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    pub fn cost(&self) -> u32 {
        self.cost.unwrap_or(0)
    }

    pub fn target(&self) -> TargetPattern {
        self.target.unwrap_or(TargetPattern::AllySingle)
    }

    pub fn script(&self) -> &str {
        self.script.as_deref().unwrap_or(Self::DEFAULT_SCRIPT)
    }

    pub fn effects(&self) -> &[EffectSpec] {
        self.effects.as_deref().unwrap_or_default()
    }
}

impl Definition for ItemDefinition {
    const KIND: DefinitionKind = DefinitionKind::Item;

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
        inherit_fields!(self, parent; name, description, cost, target, script, effects);
    }

    fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
