//! Batch mode: many independent debates, bounded fan-out.
//!
//! ```text
//! BatchFile ([[products]])
//!     │
//!     ▼
//! JoinSet::spawn(orchestrator.run(product_i)) × N, Semaphore-guarded
//!     │
//!     ▼
//! Vec<Result<DebateOutcome, BatchError>> in input order
//! ```
//!
//! Each debate owns its own state; one failing debate never affects another.

use std::path::Path;
use std::sync::Arc;

use deliberation::{DebateAgents, DebateOrchestrator, DebateOutcome, Product};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::error::{AgentError, BatchError};

/// Products to debate, as read from a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFile {
    #[serde(default)]
    pub products: Vec<Product>,
}

impl BatchFile {
    pub fn from_toml_str(raw: &str, origin: &Path) -> Result<Self, AgentError> {
        toml::from_str(raw).map_err(|source| AgentError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, AgentError> {
        let raw = std::fs::read_to_string(path).map_err(|source| AgentError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw, path)
    }
}

/// Result of one debate in a batch.
pub type BatchResult = Result<DebateOutcome, BatchError>;

/// Run every product through its own debate, at most `max_parallel` at a time.
///
/// Results come back in input order regardless of completion order.
pub async fn run_batch<A>(
    orchestrator: Arc<DebateOrchestrator<A>>,
    products: Vec<Product>,
    max_parallel: usize,
) -> Vec<BatchResult>
where
    A: DebateAgents + 'static,
{
    let total = products.len();
    let sem = Arc::new(Semaphore::new(max_parallel.max(1)));
    let mut join_set: JoinSet<(usize, BatchResult)> = JoinSet::new();

    info!(total, max_parallel, "batch starting");

    for (index, product) in products.into_iter().enumerate() {
        let sem = sem.clone();
        let orchestrator = orchestrator.clone();
        join_set.spawn(async move {
            let _permit = match sem.acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => return (index, Err(BatchError::Aborted(e.to_string()))),
            };
            (index, orchestrator.run(product).await.map_err(BatchError::from))
        });
    }

    let mut slots: Vec<Option<BatchResult>> = (0..total).map(|_| None).collect();
    while let Some(res) = join_set.join_next().await {
        match res {
            Ok((index, result)) => {
                if let Err(e) = &result {
                    warn!(index, error = %e, "debate failed");
                }
                slots[index] = Some(result);
            }
            Err(e) => warn!(error = %e, "debate task panicked"),
        }
    }

    let results: Vec<BatchResult> = slots
        .into_iter()
        .map(|slot| slot.unwrap_or_else(|| Err(BatchError::Aborted("task did not report".into()))))
        .collect();

    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    info!(total, succeeded, failed = total - succeeded, "batch complete");
    results
}
