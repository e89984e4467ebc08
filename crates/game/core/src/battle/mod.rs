//! Turn-based encounter engine.
//!
//! A [`BattleManager`] owns one [`BattleState`] from `INIT` to a terminal
//! phase. Actions are resolved by the pure [`ActionResolver`](crate::action::ActionResolver)
//! and applied exactly once at the apply synchronization point, so the outcome
//! never depends on how long an animation takes.
//!
//! # Module Structure
//!
//! - `phase`: [`BattlePhase`], [`BattleOutcome`] and [`Side`]
//! - `state`: [`BattleState`], the authoritative per-encounter state
//! - `manager`: [`BattleManager`] and its synchronization tickets
//! - `turns`: acting order
//! - `policy`: automatic action choice for enemies and auto-battling allies
//! - `passives`: passive trait triggers
//! - `rewards`: victory settlement
//! - `encounter`: random encounter rolls
mod apply;
pub mod encounter;
pub mod error;
pub mod log;
pub mod manager;
pub mod passives;
pub mod phase;
pub mod policy;
pub mod rewards;
pub mod state;
pub mod turns;

pub use encounter::roll_encounter;
pub use error::BattleError;
pub use log::BattleLog;
pub use manager::{BattleManager, Resolution, SelectOutcome, SyncStatus, Ticket};
pub use phase::{BattleOutcome, BattlePhase, Side};
pub use policy::{PolicyChoice, choose_action};
pub use rewards::{LevelUpReport, VictoryReport};
pub use state::BattleState;
pub use turns::turn_order;
