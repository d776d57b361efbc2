//! Debate state machine — phases, transitions, and the per-run state record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{Argument, Product, Stance};

/// Phase of a debate run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebatePhase {
    /// Moderator picks the next speaker or asks for a verdict.
    Moderate,
    /// Pro advocate is arguing.
    Pro,
    /// Con critic is arguing.
    Con,
    /// Verdict is being formatted.
    Decide,
    /// Terminal.
    Done,
}

impl DebatePhase {
    /// Whether this is a terminal phase.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }

    /// Valid transitions from this phase.
    pub fn valid_transitions(self) -> &'static [DebatePhase] {
        match self {
            Self::Moderate => &[Self::Pro, Self::Con, Self::Decide],
            Self::Pro | Self::Con => &[Self::Moderate],
            Self::Decide => &[Self::Done],
            Self::Done => &[],
        }
    }

    /// Advocate phase for a stance.
    pub fn for_stance(stance: Stance) -> Self {
        match stance {
            Stance::Pro => Self::Pro,
            Stance::Con => Self::Con,
        }
    }
}

impl std::fmt::Display for DebatePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Moderate => write!(f, "moderate"),
            Self::Pro => write!(f, "pro"),
            Self::Con => write!(f, "con"),
            Self::Decide => write!(f, "decide"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// A phase transition record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseTransition {
    /// Previous phase.
    pub from: DebatePhase,
    /// New phase.
    pub to: DebatePhase,
    /// When the transition occurred.
    pub timestamp: DateTime<Utc>,
    /// Reason for the transition.
    pub reason: String,
}

/// Error for invalid state transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid transition {from} → {to}: {reason}")]
pub struct TransitionError {
    pub from: DebatePhase,
    pub to: DebatePhase,
    pub reason: String,
}

/// Validate and log a move between phases.
///
/// Returns the new phase so callers can write `phase = advance(...)?`.
pub(crate) fn advance(
    log: &mut Vec<PhaseTransition>,
    from: DebatePhase,
    to: DebatePhase,
    reason: &str,
) -> Result<DebatePhase, TransitionError> {
    if !from.valid_transitions().contains(&to) {
        return Err(TransitionError {
            from,
            to,
            reason: format!(
                "not a valid transition (allowed: {:?})",
                from.valid_transitions()
            ),
        });
    }
    log.push(PhaseTransition {
        from,
        to,
        timestamp: Utc::now(),
        reason: reason.to_string(),
    });
    Ok(to)
}

/// Mutable record threaded through a single debate run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateState {
    /// The product being debated.
    pub product: Product,
    /// Append-only transcript, one line per usable argument.
    pub transcript: Vec<String>,
    /// Pro and Con visits so far, including spent rounds.
    pub round_count: u32,
    /// Sum of Pro sentiments.
    pub pro_sentiment: i64,
    /// Sum of absolute Con sentiments.
    pub con_sentiment: i64,
}

impl DebateState {
    pub fn new(product: Product) -> Self {
        Self {
            product,
            transcript: Vec::new(),
            round_count: 0,
            pro_sentiment: 0,
            con_sentiment: 0,
        }
    }

    /// Fold a pro argument into the state.
    pub fn record_pro(&mut self, argument: &Argument) {
        self.transcript.push(argument.transcript_line(Stance::Pro));
        self.pro_sentiment = self.pro_sentiment.saturating_add(argument.sentiment);
        self.round_count += 1;
    }

    /// Fold a con argument into the state; only its magnitude counts.
    pub fn record_con(&mut self, argument: &Argument) {
        self.transcript.push(argument.transcript_line(Stance::Con));
        self.con_sentiment = self
            .con_sentiment
            .saturating_add(argument.sentiment.saturating_abs());
        self.round_count += 1;
    }

    /// Record an argument for the given stance.
    pub fn record(&mut self, stance: Stance, argument: &Argument) {
        match stance {
            Stance::Pro => self.record_pro(argument),
            Stance::Con => self.record_con(argument),
        }
    }

    /// Count a round that produced nothing usable.
    pub fn record_spent(&mut self, _stance: Stance) {
        self.round_count += 1;
    }

    /// Rounds that contributed a transcript line.
    pub fn usable_rounds(&self) -> u32 {
        self.transcript.len() as u32
    }

    /// Rounds that were counted but contributed nothing.
    pub fn spent_rounds(&self) -> u32 {
        self.round_count.saturating_sub(self.usable_rounds())
    }

    /// Pro total minus Con total.
    pub fn net_sentiment(&self) -> i64 {
        self.pro_sentiment.saturating_sub(self.con_sentiment)
    }

    /// Compact status line.
    pub fn status_line(&self) -> String {
        format!(
            "round {} | pro={} con={} | {} transcript lines | product={}",
            self.round_count,
            self.pro_sentiment,
            self.con_sentiment,
            self.transcript.len(),
            self.product.name
        )
    }
}
