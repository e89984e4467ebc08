use crate::inherit_fields;
use crate::registry::{Definition, DefinitionKind};

/// When an applied status wears off.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusExpiry {
    /// Cleared when the next round begins.
    RoundStart,
    /// Lasts until the encounter ends.
    #[default]
    BattleEnd,
}

/// Raw status effect record.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct StatusDefinition {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(alias = "parent"))]
    pub inherits: Option<String>,

    pub name: Option<String>,
    /// Incoming damage is divided by this while the status is active.
    pub damage_divisor: Option<u32>,
    pub expires: Option<StatusExpiry>,
}

impl StatusDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    pub fn damage_divisor(&self) -> u32 {
        self.damage_divisor.unwrap_or(1).max(1)
    }

    pub fn expires(&self) -> StatusExpiry {
        self.expires.unwrap_or_default()
    }
}

impl Definition for StatusDefinition {
    const KIND: DefinitionKind = DefinitionKind::Status;

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
        inherit_fields!(self, parent; name, damage_divisor, expires);
    }

    fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
