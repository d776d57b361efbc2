//! LLM-backed collaborators and the `buy-or-skip` command line.
//!
//! The debate itself lives in `deliberation`; this crate supplies the rig
//! agents that argue, judge and format, plus config, batch fan-out and
//! reporting around them.

pub mod agents;
pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod parse;
pub mod prompts;
pub mod report;
pub mod telemetry;

pub use agents::{AgentFactory, RigDebateAgents};
pub use config::AgentsConfig;
pub use error::{AgentError, BatchError};
