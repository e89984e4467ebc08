//! Asynchronous abstraction for sourcing ally intent.
//!
//! Enemies always act through the battle policy. Allies act through the
//! runner's [`ActionProvider`] when one is set, so the same encounter can run
//! with human input, scripted fixtures, or fully automatic play.
use std::collections::VecDeque;

use async_trait::async_trait;
use game_core::{BattleState, Uid};
use tokio::sync::Mutex;

use crate::error::Result;

/// What an ally does on its turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionChoice {
    /// Use a skill or item. Targets are picked automatically when `None`.
    Act {
        action: String,
        targets: Option<Vec<Uid>>,
    },
    /// Let the battle policy choose.
    Auto,
    Flee,
}

impl ActionChoice {
    pub fn act(action: impl Into<String>) -> Self {
        Self::Act {
            action: action.into(),
            targets: None,
        }
    }

    pub fn act_on(action: impl Into<String>, targets: Vec<Uid>) -> Self {
        Self::Act {
            action: action.into(),
            targets: Some(targets),
        }
    }
}

#[async_trait]
pub trait ActionProvider: Send + Sync {
    /// Chooses the action for `actor` given a read-only view of the encounter.
    async fn choose(&self, actor: Uid, state: &BattleState) -> Result<ActionChoice>;
}

/// Defers every decision to the battle policy.
#[derive(Clone, Copy, Debug, Default)]
pub struct AutoProvider;

#[async_trait]
impl ActionProvider for AutoProvider {
    async fn choose(&self, _actor: Uid, _state: &BattleState) -> Result<ActionChoice> {
        Ok(ActionChoice::Auto)
    }
}

/// Replays a fixed list of choices, then falls back to [`ActionChoice::Auto`].
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    queue: Mutex<VecDeque<ActionChoice>>,
}

impl ScriptedProvider {
    pub fn new(choices: impl IntoIterator<Item = ActionChoice>) -> Self {
        Self {
            queue: Mutex::new(choices.into_iter().collect()),
        }
    }

    pub async fn remaining(&self) -> usize {
        self.queue.lock().await.len()
    }
}

#[async_trait]
impl ActionProvider for ScriptedProvider {
    async fn choose(&self, actor: Uid, _state: &BattleState) -> Result<ActionChoice> {
        let choice = self.queue.lock().await.pop_front();
        tracing::debug!(%actor, ?choice, "scripted choice");
        Ok(choice.unwrap_or(ActionChoice::Auto))
    }
}
