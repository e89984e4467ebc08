//! Stat model: level-scaled stats, the experience table, and runtime actors.
//!
//! Everything here is a pure function of a resolved species and a level, so
//! the same inputs always produce the same stats.
pub mod actor;
pub mod experience;
pub mod growth;

pub use actor::{Actor, ActorSnapshot, LevelUp, Uid, UidAllocator};
pub use experience::{ExpCurve, ExpTable};
pub use growth::{StatBlock, StatKind, scaled_stat};
