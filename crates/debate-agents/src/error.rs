//! Error taxonomy for the agent layer.
//!
//! Collaborator failures inside a debate are reported through
//! `deliberation::CollaboratorError`; the types here cover everything around
//! the debate (configuration, client construction, batch bookkeeping).

use std::path::PathBuf;

use deliberation::DebateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    /// Configuration is invalid or missing required fields.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Config file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config or batch file is not valid TOML for the expected schema.
    #[error("Failed to parse {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The rig client could not be built.
    #[error("Client build failed: {0}")]
    ClientBuild(String),
}

/// Failure of one debate inside a batch.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The debate itself failed (bad product or no verdict).
    #[error(transparent)]
    Debate(#[from] DebateError),

    /// The debate task died before reporting.
    #[error("Debate task aborted: {0}")]
    Aborted(String),
}
