//! Deliberation: buy-or-skip product debates.
//!
//! This crate holds the deterministic part of the debate:
//! - the data model (`Product`, `Argument`, `Decision`)
//! - the per-run `DebateState` and its phase machine
//! - the threshold `DecisionPolicy`
//! - the `DebateAgents` collaborator trait
//! - the `DebateOrchestrator` that drives a run end-to-end
//!
//! Nothing in here talks to a network. Argument generation, verdict wording and
//! final formatting are delegated to a `DebateAgents` implementation supplied
//! by the caller (see the `debate-agents` crate for the LLM-backed one).
//!
//! # Usage
//!
//! ```ignore
//! let orchestrator = DebateOrchestrator::new(agents);
//! let decision = orchestrator.run_debate(product).await?;
//! ```

pub mod debate;

pub use debate::{
    Argument, Choice, CollaboratorError, DebateAgents, DebateConfig, DebateError, DebateOrchestrator,
    DebateOutcome, DebatePhase, DebateState, Decision, DecisionPolicy, PhaseTransition, PolicyBand,
    Product, Stance, TransitionError, DEFAULT_PRODUCT_NAME,
};
