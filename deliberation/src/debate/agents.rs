//! Collaborator interface — one method per debate role.
//!
//! The orchestrator never builds prompts or talks to a model. It calls into a
//! `DebateAgents` implementation and only cares whether a usable value came
//! back. Tests substitute deterministic fakes.

use async_trait::async_trait;

use super::types::{Argument, Decision, Product, Stance};

/// Failure of a single collaborator call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    /// No result at all (transport failure, timeout, backend error).
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    /// A result came back but did not have the expected shape.
    #[error("invalid response shape: {0}")]
    InvalidShape(String),
}

/// The four debate roles.
#[async_trait]
pub trait DebateAgents: Send + Sync {
    /// Argue for buying. Sentiment is documented to be in 0..=100.
    async fn generate_pro(&self, product: &Product) -> Result<Argument, CollaboratorError>;

    /// Argue against buying. Sentiment is documented to be in -100..=0.
    async fn generate_con(&self, product: &Product) -> Result<Argument, CollaboratorError>;

    /// Produce a verdict from the accumulated totals.
    async fn generate_decision(
        &self,
        pro_sentiment: i64,
        con_sentiment: i64,
        product: &Product,
    ) -> Result<Decision, CollaboratorError>;

    /// Re-render a verdict for presentation. Choice and sentiment must not change.
    async fn format_decision(
        &self,
        decision: &Decision,
        product: &Product,
    ) -> Result<Decision, CollaboratorError>;

    /// Dispatch to the advocate for `stance`.
    async fn generate_argument(
        &self,
        stance: Stance,
        product: &Product,
    ) -> Result<Argument, CollaboratorError> {
        match stance {
            Stance::Pro => self.generate_pro(product).await,
            Stance::Con => self.generate_con(product).await,
        }
    }
}

#[async_trait]
impl<T: DebateAgents + ?Sized> DebateAgents for std::sync::Arc<T> {
    async fn generate_pro(&self, product: &Product) -> Result<Argument, CollaboratorError> {
        (**self).generate_pro(product).await
    }

    async fn generate_con(&self, product: &Product) -> Result<Argument, CollaboratorError> {
        (**self).generate_con(product).await
    }

    async fn generate_decision(
        &self,
        pro_sentiment: i64,
        con_sentiment: i64,
        product: &Product,
    ) -> Result<Decision, CollaboratorError> {
        (**self)
            .generate_decision(pro_sentiment, con_sentiment, product)
            .await
    }

    async fn format_decision(
        &self,
        decision: &Decision,
        product: &Product,
    ) -> Result<Decision, CollaboratorError> {
        (**self).format_decision(decision, product).await
    }
}
