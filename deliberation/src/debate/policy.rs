//! Buy/skip decision policy — threshold bands over accumulated sentiment.
//!
//! The bands are asymmetric: Pro needs a 20-point lead to win a
//! Buy, Con needs 15 points for a confident Skip, and everything else is an
//! uncertain Skip. A Pro lead of 15..=19 therefore lands in the uncertain band.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::types::{Choice, Decision};

/// Pro lead required for a Buy.
pub const DEFAULT_BUY_MARGIN: i64 = 20;
/// Con lead required for a confident Skip.
pub const DEFAULT_SKIP_MARGIN: i64 = 15;

/// Leading marker on uncertain explanations.
pub const UNCERTAIN_PREFIX: &str = "Uncertain:";

/// Which band a pair of totals falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyBand {
    /// Pro lead at or above the buy margin.
    Buy,
    /// Con lead at or above the skip margin.
    Skip,
    /// Neither side cleared its margin.
    Uncertain,
}

impl PolicyBand {
    pub fn choice(self) -> Choice {
        match self {
            Self::Buy => Choice::Buy,
            Self::Skip | Self::Uncertain => Choice::Skip,
        }
    }

    pub fn is_uncertain(self) -> bool {
        self == Self::Uncertain
    }
}

impl std::fmt::Display for PolicyBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Skip => write!(f, "skip"),
            Self::Uncertain => write!(f, "uncertain"),
        }
    }
}

/// Threshold policy applied to the final sentiment totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionPolicy {
    /// Minimum `pro - con` for Buy.
    pub buy_margin: i64,
    /// Minimum `con - pro` for a confident Skip.
    pub skip_margin: i64,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            buy_margin: DEFAULT_BUY_MARGIN,
            skip_margin: DEFAULT_SKIP_MARGIN,
        }
    }
}

impl DecisionPolicy {
    /// Classify a pair of totals.
    pub fn classify(&self, pro_sentiment: i64, con_sentiment: i64) -> PolicyBand {
        let lead = pro_sentiment.saturating_sub(con_sentiment);
        if lead >= self.buy_margin {
            PolicyBand::Buy
        } else if con_sentiment.saturating_sub(pro_sentiment) >= self.skip_margin {
            PolicyBand::Skip
        } else {
            PolicyBand::Uncertain
        }
    }

    /// Deterministic verdict with a plain-language explanation.
    pub fn verdict(&self, pro_sentiment: i64, con_sentiment: i64) -> Decision {
        let band = self.classify(pro_sentiment, con_sentiment);
        let net = pro_sentiment.saturating_sub(con_sentiment);
        let explanation = match band {
            PolicyBand::Buy => format!(
                "Pro sentiment ({pro_sentiment}) leads con sentiment ({con_sentiment}) by {net} \
                 points, clearing the {}-point buy margin.",
                self.buy_margin
            ),
            PolicyBand::Skip => format!(
                "Con sentiment ({con_sentiment}) leads pro sentiment ({pro_sentiment}) by {} \
                 points, clearing the {}-point skip margin.",
                net.saturating_neg(),
                self.skip_margin
            ),
            PolicyBand::Uncertain => format!(
                "{UNCERTAIN_PREFIX} pro sentiment ({pro_sentiment}) and con sentiment ({con_sentiment}) \
                 differ by {} points, which clears neither margin. Defaulting to Skip.",
                net.saturating_abs()
            ),
        };
        Decision::new(net, band.choice(), explanation).with_uncertain(band.is_uncertain())
    }

    /// Force a collaborator's verdict onto the policy band.
    ///
    /// An agreeing verdict keeps its wording and sentiment. An overridden one
    /// takes the policy's explanation and net sentiment. The uncertain flag
    /// always comes from the policy, and an uncertain explanation says so.
    pub fn reconcile(
        &self,
        mut decision: Decision,
        pro_sentiment: i64,
        con_sentiment: i64,
    ) -> Decision {
        let band = self.classify(pro_sentiment, con_sentiment);
        if decision.decision != band.choice() {
            warn!(
                proposed = %decision.decision,
                policy = %band,
                pro = pro_sentiment,
                con = con_sentiment,
                "verdict disagrees with decision policy, overriding"
            );
            let verdict = self.verdict(pro_sentiment, con_sentiment);
            decision.decision = verdict.decision;
            decision.sentiment = verdict.sentiment;
            decision.explanation = verdict.explanation;
        }
        decision.uncertain = band.is_uncertain();
        flag_uncertain(&mut decision);
        decision
    }

    /// Validate margins; both must be non-negative.
    pub fn validate(&self) -> Result<(), String> {
        if self.buy_margin < 0 {
            return Err(format!("buy_margin must be >= 0, got {}", self.buy_margin));
        }
        if self.skip_margin < 0 {
            return Err(format!("skip_margin must be >= 0, got {}", self.skip_margin));
        }
        Ok(())
    }
}

/// Prefix an uncertain decision's explanation with `Uncertain:` unless it
/// already mentions uncertainty.
pub fn flag_uncertain(decision: &mut Decision) {
    if decision.uncertain && !decision.explanation.to_lowercase().contains("uncertain") {
        decision.explanation = format!("{UNCERTAIN_PREFIX} {}", decision.explanation);
    }
}
