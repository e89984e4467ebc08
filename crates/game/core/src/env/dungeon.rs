use crate::inherit_fields;
use crate::registry::{Definition, DefinitionKind};

/// Inclusive enemy count range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl Default for CountRange {
    fn default() -> Self {
        Self { min: 1, max: 3 }
    }
}

/// Enemies eligible on an inclusive floor range. `hi = None` is open-ended.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterPool {
    pub floors: (u32, Option<u32>),
    pub enemies: Vec<String>,
}

impl EncounterPool {
    pub fn covers(&self, floor: u32) -> bool {
        let (lo, hi) = self.floors;
        floor >= lo && hi.is_none_or(|hi| floor <= hi)
    }
}

/// Random encounter table of a dungeon.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct EncounterTable {
    pub count: CountRange,
    pub pools: Vec<EncounterPool>,
    /// Enemy level gained per floor below the first.
    pub level_per_floor: f64,
}

impl Default for EncounterTable {
    fn default() -> Self {
        Self {
            count: CountRange::default(),
            pools: Vec::new(),
            level_per_floor: 0.5,
        }
    }
}

impl EncounterTable {
    /// First pool covering `floor`.
    pub fn pool_for(&self, floor: u32) -> Option<&EncounterPool> {
        self.pools.iter().find(|pool| pool.covers(floor))
    }

    /// Level of enemies spawned on `floor`.
    pub fn enemy_level(&self, floor: u32) -> u32 {
        let bonus = (f64::from(floor.saturating_sub(1)) * self.level_per_floor).floor();
        1 + bonus.max(0.0) as u32
    }
}

/// Raw dungeon record.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct DungeonDefinition {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(alias = "parent"))]
    pub inherits: Option<String>,

    pub name: Option<String>,
    /// Number of floors; unset means endless.
    pub floors: Option<u32>,
    pub encounters: Option<EncounterTable>,
}

impl DungeonDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    pub fn encounters(&self) -> Option<&EncounterTable> {
        self.encounters.as_ref()
    }

    /// Every species id referenced by any encounter pool.
    pub fn all_enemies(&self) -> impl Iterator<Item = &str> {
        self.encounters
            .iter()
            .flat_map(|table| table.pools.iter())
            .flat_map(|pool| pool.enemies.iter())
            .map(String::as_str)
    }
}

impl Definition for DungeonDefinition {
    const KIND: DefinitionKind = DefinitionKind::Dungeon;

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
        inherit_fields!(self, parent; name, floors, encounters);
    }

    fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
