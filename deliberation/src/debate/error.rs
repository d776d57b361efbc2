//! Errors that abort a debate run.
//!
//! Argument failures never show up here: a failed pro or con round is spent
//! and the run moves on. Only a bad input, a failed verdict, or a broken phase
//! machine end a run early.

use super::agents::CollaboratorError;
use super::state::TransitionError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DebateError {
    /// The product failed its input constraints.
    #[error("invalid product: {0}")]
    InvalidProduct(String),

    /// The judge produced no verdict. There is no fallback choice.
    #[error("decision generation failed: {0}")]
    DecisionGeneration(#[source] CollaboratorError),

    /// Internal phase machine violation.
    #[error("transition failed: {0}")]
    Transition(#[from] TransitionError),
}

impl DebateError {
    /// Whether this is the fatal verdict failure.
    pub fn is_decision_failure(&self) -> bool {
        matches!(self, Self::DecisionGeneration(_))
    }
}
