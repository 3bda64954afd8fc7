//! Recoverable error outcomes
//!
//! Nothing inside the tick loop fails; these are the absence and
//! configuration results that callers are expected to handle.

use thiserror::Error;

use crate::sim::BodyId;

#[derive(Error, Debug)]
pub enum SimError {
    /// No active shootable body is registered. The game-state layer usually
    /// recovers by spawning a replacement cue ball.
    #[error("no shootable body is available")]
    NoShootableBody,

    #[error("no body ids left to allocate")]
    BodyIdsExhausted,

    #[error("body {0} is already registered")]
    DuplicateBody(BodyId),

    #[error("invalid physics settings: {0}")]
    InvalidSettings(String),

    #[error("failed to parse settings: {0}")]
    SettingsFormat(#[from] serde_json::Error),

    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
}
