//! Content definitions and the services container that serves them.
//!
//! Every kind of content (species, skills, items, equipment, passives,
//! statuses, dungeons, event templates) is an immutable [`Definition`](crate::registry::Definition)
//! stored in a [`Registry`](crate::registry::Registry). The [`Services`] aggregate
//! bundles the registries and configuration so the battle rules, exploration
//! and UI collaborators can query everything through one explicit handle.
mod dungeon;
mod effects;
mod element;
mod equipment;
mod error;
mod events;
mod items;
mod passives;
mod rng;
mod services;
mod skills;
mod species;
mod status;

pub use dungeon::{CountRange, DungeonDefinition, EncounterPool, EncounterTable};
pub use effects::EffectSpec;
pub use element::Element;
pub use equipment::{EquipmentDefinition, EquipmentTrait};
pub use error::ServiceError;
pub use events::{EventKind, EventTemplateDefinition, GoldTable, StockTable};
pub use items::ItemDefinition;
pub use passives::{HealAmount, PassiveDefinition, PassiveTrait};
pub use rng::{PcgRng, RngSource, RollContext, RollStream, compute_seed};
pub use services::{
    DungeonRegistry, EquipmentRegistry, EventRegistry, ItemRegistry, PassiveRegistry, Service, ServiceName, Services,
    ServicesBuilder, SkillRegistry, SpeciesRegistry, StatusRegistry,
};
pub use skills::{ScalingStat, SkillCategory, SkillDefinition, TargetPattern};
pub use species::{SpeciesDefinition, Temperament};
pub use status::{StatusDefinition, StatusExpiry};
