use thiserror::Error;

/// Errors raised by the environment.
#[derive(Debug, Error)]
pub enum Error {
    /// The action is not a member of the scenario's action set.
    #[error("invalid action (steering {steering}, acceleration {acceleration})")]
    InvalidAction { steering: f64, acceleration: f64 },
    /// The index does not name an action in the scenario's action set.
    #[error("invalid action index {index} (the action set has {len} actions)")]
    InvalidActionIndex { index: usize, len: usize },
    /// `step` was called after the episode terminated and before `reset`.
    #[error("the episode has terminated; call reset before stepping again")]
    InvalidStateTransition,
    /// The scenario configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
