//! Lenient parsing of model replies into debate records.
//!
//! Reasoning models wrap their answer in `<think>` blocks and markdown fences,
//! and small models drift on number formats. Everything that cannot be read as
//! the expected shape becomes `CollaboratorError::InvalidShape`.

use deliberation::{Argument, Choice, CollaboratorError, Decision};
use serde::Deserialize;
use serde_json::Value;

/// Remove every `<think>...</think>` block. An unclosed block drops the rest.
pub fn strip_reasoning(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find("<think>") {
        out.push_str(&rest[..start]);
        match rest[start..].find("</think>") {
            Some(end) => rest = &rest[start + end + "</think>".len()..],
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Extract the JSON object from a reply: strip reasoning and fences, then
/// take the first `{` through the last `}`.
pub fn extract_json_object(raw: &str) -> String {
    let without_reasoning = strip_reasoning(raw);
    let stripped = without_reasoning
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    if let (Some(start), Some(end)) = (stripped.find('{'), stripped.rfind('}')) {
        if start < end {
            return stripped[start..=end].to_string();
        }
    }
    stripped.to_string()
}

fn invalid(msg: impl Into<String>) -> CollaboratorError {
    CollaboratorError::InvalidShape(msg.into())
}

/// Accept integers, floats (rounded) and numeric strings.
fn coerce_sentiment(value: &Value) -> Result<i64, CollaboratorError> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64))
            .ok_or_else(|| invalid(format!("sentiment out of range: {n}"))),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f.round() as i64)
            .ok_or_else(|| invalid(format!("sentiment is not a number: {s:?}"))),
        other => Err(invalid(format!("sentiment has wrong type: {other}"))),
    }
}

fn parse_choice(raw: &str) -> Result<Choice, CollaboratorError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "buy" => Ok(Choice::Buy),
        "skip" => Ok(Choice::Skip),
        other => Err(invalid(format!("unknown decision {other:?}"))),
    }
}

#[derive(Deserialize)]
struct RawArgument {
    sentiment: Value,
    body: String,
}

#[derive(Deserialize)]
struct RawDecision {
    sentiment: Value,
    decision: String,
    explanation: String,
    #[serde(default)]
    uncertain: bool,
}

/// Parse an advocate reply.
pub fn parse_argument(raw: &str) -> Result<Argument, CollaboratorError> {
    let json = extract_json_object(raw);
    let parsed: RawArgument = serde_json::from_str(&json)
        .map_err(|e| invalid(format!("argument reply is not valid JSON: {e}")))?;
    let body = parsed.body.trim();
    if body.is_empty() {
        return Err(invalid("argument body is empty"));
    }
    Ok(Argument::new(coerce_sentiment(&parsed.sentiment)?, body))
}

/// Parse a judge or formatter reply.
pub fn parse_decision(raw: &str) -> Result<Decision, CollaboratorError> {
    let json = extract_json_object(raw);
    let parsed: RawDecision = serde_json::from_str(&json)
        .map_err(|e| invalid(format!("decision reply is not valid JSON: {e}")))?;
    let decision = Decision::new(
        coerce_sentiment(&parsed.sentiment)?,
        parse_choice(&parsed.decision)?,
        parsed.explanation.trim(),
    );
    Ok(decision.with_uncertain(parsed.uncertain))
}
