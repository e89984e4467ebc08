//! Error types surfaced by the encounter runtime.
use game_core::BattleError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Battle(#[from] BattleError),

    #[error("action provider failed: {0}")]
    Provider(String),

    #[error("encounter is no longer running")]
    EncounterClosed,

    #[error("encounter task failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}
