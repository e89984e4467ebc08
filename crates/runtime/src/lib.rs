//! Async encounter runtime.
//!
//! This crate drives a [`game_core::BattleManager`] against an animation
//! collaborator. The rules stay synchronous; the runtime decides when the
//! apply and complete synchronization points fire, bounds every wait with a
//! timeout, and lets callers force-end an encounter at any suspension point.
//!
//! Modules are organized by responsibility:
//! - [`runner`] hosts the encounter loop and its control handle
//! - [`animation`] defines the animation player contract and stock players
//! - [`provider`] sources ally intent
//! - [`events`] broadcasts encounter progress to observers
//! - [`config`] reads runtime settings from the environment
pub mod animation;
pub mod config;
pub mod error;
pub mod events;
pub mod provider;
pub mod runner;

pub use animation::{
    AnimationCue, AnimationPlayer, AnimationSignals, AnimationTriggers, InstantPlayer,
    StalledPlayer, TimedPlayer,
};
pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError};
pub use events::{BattleEvent, EventBus, SyncSignal};
pub use provider::{ActionChoice, ActionProvider, AutoProvider, ScriptedProvider};
pub use runner::{EncounterHandle, EncounterRunner, EncounterSummary};
