//! Debate Orchestration — Pro/Con Sentiment Debate
//!
//! State machine that alternates a pro advocate and a con critic over a
//! product, accumulates their sentiment, and asks a judge for a verdict once
//! the round budget is spent.
//!
//! # Debate Flow
//!
//! ```text
//!            ┌──────── rounds left, even ───────▶ Pro ──┐
//!            │                                         │
//! start → Moderate ◀───────────────────────────────────┤
//!            │                                         │
//!            ├──────── rounds left, odd ────────▶ Con ──┘
//!            │
//!            └─ budget spent → judge verdict → Decide → format → Done
//! ```
//!
//! A round whose collaborator fails is still counted ("spent"); only a failed
//! verdict aborts the run.

pub mod agents;
pub mod error;
pub mod orchestrator;
pub mod policy;
pub mod state;
pub mod types;

pub use agents::{CollaboratorError, DebateAgents};
pub use error::DebateError;
pub use orchestrator::{DebateConfig, DebateOrchestrator, DebateOutcome};
pub use policy::{DecisionPolicy, PolicyBand};
pub use state::{DebatePhase, DebateState, PhaseTransition, TransitionError};
pub use types::{Argument, Choice, Decision, Product, Stance, DEFAULT_PRODUCT_NAME};
