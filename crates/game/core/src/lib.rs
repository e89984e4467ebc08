//! Deterministic rules and data types for a turn-based dungeon RPG.
//!
//! `game-core` defines the content model (species, skills, items, passives,
//! statuses, dungeons), the inheritance-aware [`Registry`], the stat and
//! formula engines, the pure [`ActionResolver`], and the [`BattleManager`]
//! state machine. Nothing here performs I/O; content is loaded by
//! `game-content` and encounters are driven asynchronously by `runtime`.
pub mod action;
pub mod battle;
pub mod config;
pub mod env;
pub mod error;
pub mod formula;
pub mod registry;
pub mod stats;

#[cfg(test)]
mod test_support;

pub use action::{
    Action, ActionError, ActionObject, ActionResolver, EffectHit, EffectOutcome, EffectResult,
    lookup_action,
};
pub use battle::{
    BattleError, BattleLog, BattleManager, BattleOutcome, BattlePhase, BattleState,
    LevelUpReport, Resolution, SelectOutcome, Side, SyncStatus, Ticket, VictoryReport,
    roll_encounter,
};
pub use config::{BattleConfig, ExpCurveConfig, GameConfig, RewardConfig};
pub use env::{
    DungeonDefinition, EffectSpec, Element, EquipmentDefinition, EquipmentTrait,
    EventTemplateDefinition, ItemDefinition, PassiveDefinition, PcgRng, RngSource, Service,
    ServiceError, ServiceName, Services, ServicesBuilder, SkillDefinition, SpeciesDefinition,
    StatusDefinition,
};
pub use error::{ErrorSeverity, GameError};
pub use formula::{Formula, FormulaError, FormulaScope, FormulaVar};
pub use registry::{Definition, DefinitionKind, Registry, RegistryError, RegistryView};
pub use stats::{Actor, ActorSnapshot, ExpTable, StatBlock, StatKind, Uid, UidAllocator};
