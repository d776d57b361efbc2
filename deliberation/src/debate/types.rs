//! Debate data model — products, arguments, and decisions.

use serde::{Deserialize, Serialize};

/// Default display name when the caller only supplies a URL.
pub const DEFAULT_PRODUCT_NAME: &str = "User Selected Product";

/// The product under debate. Read-only for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Display name.
    pub name: String,
    /// Product page URL.
    pub url: String,
    /// Search keywords describing the product, in user order.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Product {
    /// Create a product with no keywords.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            keywords: Vec::new(),
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Parse a comma-separated keyword list, dropping blank entries.
    pub fn parse_keywords(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Check the input constraint: name and URL must be non-blank.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("product name must not be empty".to_string());
        }
        if self.url.trim().is_empty() {
            return Err("product url must not be empty".to_string());
        }
        Ok(())
    }

    /// Keywords joined for prompts and log lines.
    pub fn keyword_line(&self) -> String {
        if self.keywords.is_empty() {
            "(none)".to_string()
        } else {
            self.keywords.join(", ")
        }
    }
}

/// Polarity of an advocate for one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stance {
    /// Argues for buying.
    Pro,
    /// Argues against buying.
    Con,
}

impl Stance {
    /// Documented sentiment range for this stance (inclusive).
    pub fn sentiment_range(self) -> std::ops::RangeInclusive<i64> {
        match self {
            Self::Pro => 0..=100,
            Self::Con => -100..=0,
        }
    }

    /// Transcript prefix, e.g. `Pro`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pro => "Pro",
            Self::Con => "Con",
        }
    }
}

impl std::fmt::Display for Stance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pro => write!(f, "pro"),
            Self::Con => write!(f, "con"),
        }
    }
}

/// A single advocate's output for one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    /// Signed strength score. Pro: 0..=100, Con: -100..=0 by contract.
    pub sentiment: i64,
    /// Free-text argument.
    pub body: String,
}

impl Argument {
    pub fn new(sentiment: i64, body: impl Into<String>) -> Self {
        Self {
            sentiment,
            body: body.into(),
        }
    }

    /// Human-readable transcript line for this argument.
    pub fn transcript_line(&self, stance: Stance) -> String {
        format!(
            "{}: {} (Sentiment: {})",
            stance.label(),
            self.body,
            self.sentiment
        )
    }
}

/// Final buy/skip choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Choice {
    Buy,
    Skip,
}

impl std::fmt::Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "Buy"),
            Self::Skip => write!(f, "Skip"),
        }
    }
}

/// A verdict, either straight from the judge or after final formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Net sentiment carried through for audit.
    pub sentiment: i64,
    /// Buy or skip.
    pub decision: Choice,
    /// Rationale.
    pub explanation: String,
    /// Set when the sentiment gap was too small for a confident call.
    #[serde(default)]
    pub uncertain: bool,
}

impl Decision {
    pub fn new(sentiment: i64, decision: Choice, explanation: impl Into<String>) -> Self {
        Self {
            sentiment,
            decision,
            explanation: explanation.into(),
            uncertain: false,
        }
    }

    pub fn with_uncertain(mut self, uncertain: bool) -> Self {
        self.uncertain = uncertain;
        self
    }

    /// Whether two decisions agree on everything except wording.
    pub fn same_verdict(&self, other: &Decision) -> bool {
        self.decision == other.decision
            && self.sentiment == other.sentiment
            && self.uncertain == other.uncertain
    }
}
