use crate::inherit_fields;
use crate::registry::{Definition, DefinitionKind};

/// Heal amount rolled by [`PassiveTrait::PostBattleHeal`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HealAmount {
    Flat(u32),
    /// Random in `1..=level`, weighted towards 1.
    Level,
}

/// Triggered behaviour granted by a passive.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PassiveTrait {
    /// Heals the holder after each battle it survives.
    PostBattleHeal(HealAmount),
    /// Drains the adjacent party slots after battle; the holder heals half.
    PostBattleLeech(u32),
    /// Heals the holder whenever any creature acts.
    TurnHeal(u32),
    /// Each successful evade adds a stacking evasion bonus, capped at level / 2.
    EvadeBonus,
    /// Casts the named skill when the holder is defeated.
    OnDeathCast(String),
}

/// Raw passive record.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct PassiveDefinition {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(alias = "parent"))]
    pub inherits: Option<String>,

    pub name: Option<String>,
    pub description: Option<String>,
    pub traits: Option<Vec<PassiveTrait>>,
}

impl PassiveDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    pub fn traits(&self) -> &[PassiveTrait] {
        self.traits.as_deref().unwrap_or_default()
    }
}

impl Definition for PassiveDefinition {
    const KIND: DefinitionKind = DefinitionKind::Passive;

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
        inherit_fields!(self, parent; name, description, traits);
    }

    fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
