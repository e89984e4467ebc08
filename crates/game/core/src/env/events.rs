use crate::inherit_fields;
use crate::registry::{Definition, DefinitionKind};

use super::{RngSource, RollContext, compute_seed};

/// Exploration event categories.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum EventKind {
    Shop,
    #[default]
    Treasure,
    Shrine,
    Recruit,
    Trap,
}

/// Items offered by an event, drawn without replacement from `pools`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct StockTable {
    pub count: u32,
    pub pools: Vec<String>,
}

impl StockTable {
    /// Draws up to `count` distinct item ids.
    pub fn roll(&self, rng: &dyn RngSource, seed: u64) -> Vec<String> {
        let mut remaining = self.pools.clone();
        let mut picked = Vec::new();
        for draw in 0..self.count {
            if remaining.is_empty() {
                break;
            }
            let seed = compute_seed(seed, u64::from(draw), 0, RollContext::Loot);
            picked.push(remaining.remove(rng.index(seed, remaining.len())));
        }
        picked
    }
}

/// `base + random(0..=random) + per_floor * floor`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct GoldTable {
    pub base: u32,
    pub random: u32,
    pub per_floor: u32,
}

impl GoldTable {
    pub fn roll(&self, rng: &dyn RngSource, seed: u64, floor: u32) -> u32 {
        let seed = compute_seed(seed, u64::from(floor), 0, RollContext::Loot);
        self.base
            .saturating_add(rng.range(seed, 0, self.random))
            .saturating_add(self.per_floor.saturating_mul(floor))
    }
}

/// Raw event template record.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct EventTemplateDefinition {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(alias = "parent"))]
    pub inherits: Option<String>,

    pub name: Option<String>,
    pub kind: Option<EventKind>,
    pub stock: Option<StockTable>,
    pub gold: Option<GoldTable>,
}

impl EventTemplateDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    pub fn kind(&self) -> EventKind {
        self.kind.unwrap_or_default()
    }

    /// Every item id any stock roll could produce.
    pub fn stock_items(&self) -> impl Iterator<Item = &str> {
        self.stock
            .iter()
            .flat_map(|stock| stock.pools.iter())
            .map(String::as_str)
    }
}

impl Definition for EventTemplateDefinition {
    const KIND: DefinitionKind = DefinitionKind::EventTemplate;

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
        inherit_fields!(self, parent; name, kind, stock, gold);
    }

    fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
