//! Human and JSON renderings of a debate outcome.

use std::path::Path;

use chrono::{DateTime, Utc};
use deliberation::DebateOutcome;
use serde::{Deserialize, Serialize};

use crate::prompts::PROMPT_VERSION;

/// Serializable record of one debate, stamped with model and prompt version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateReport {
    pub generated_at: DateTime<Utc>,
    pub prompt_version: String,
    pub model: String,
    pub outcome: DebateOutcome,
}

impl DebateReport {
    pub fn new(outcome: DebateOutcome, model: impl Into<String>) -> Self {
        Self {
            generated_at: Utc::now(),
            prompt_version: PROMPT_VERSION.to_string(),
            model: model.into(),
            outcome,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty JSON to `path`.
    pub fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Console rendering: verdict, reasoning, then the transcript.
    pub fn render_text(&self) -> String {
        let decision = &self.outcome.decision;
        let mut out = String::new();
        out.push_str(&format!("🛒 {}\n", self.outcome.state.product.name));
        if self.outcome.is_buy() {
            out.push_str("✅ Decision: Buy");
        } else {
            out.push_str("❌ Decision: Skip");
        }
        if decision.uncertain {
            out.push_str(" (low confidence)");
        }
        out.push('\n');
        out.push_str(&format!("💡 Reasoning: {}\n", decision.explanation));
        out.push_str(&format!(
            "📊 Sentiment: pro {} / con {} over {} rounds\n",
            self.outcome.state.pro_sentiment,
            self.outcome.state.con_sentiment,
            self.outcome.state.round_count
        ));
        if !self.outcome.state.transcript.is_empty() {
            out.push_str("\nTranscript:\n");
            for line in &self.outcome.state.transcript {
                out.push_str(&format!("  {line}\n"));
            }
        }
        out
    }
}

/// Reports for a whole batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub generated_at: DateTime<Utc>,
    pub prompt_version: String,
    pub model: String,
    pub outcomes: Vec<DebateOutcome>,
    /// `(product name, error message)` for every failed debate.
    pub failures: Vec<(String, String)>,
}

impl BatchReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
