//! Mocked debate integration test — exercises full debate runs with
//! deterministic mock agents (no LLM calls).
//!
//! Covers: orchestrator ↔ state ↔ policy ↔ formatter guard, plus parallel
//! independent runs.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use deliberation::{
    Argument, Choice, CollaboratorError, DebateAgents, DebateConfig, DebateError,
    DebateOrchestrator, DebatePhase, Decision, DecisionPolicy, Product,
};

/// How the mock formatter behaves.
#[derive(Clone, Copy)]
enum FormatMode {
    /// Rewrites the explanation only.
    Restyle,
    /// Flips the choice and sentiment (misbehaving formatter).
    Tamper,
    /// Replaces the explanation with a fixed one-liner.
    Summarize,
    /// Returns an error.
    Fail,
}

/// Fixed-score agents. `None` means that side always fails.
struct FixedAgents {
    pro: Option<i64>,
    con: Option<i64>,
    judge: JudgeMode,
    format: FormatMode,
    pro_calls: AtomicU32,
    con_calls: AtomicU32,
}

#[derive(Clone, Copy)]
enum JudgeMode {
    /// Uses the policy directly.
    Policy,
    /// Always says Buy regardless of totals.
    AlwaysBuy,
    /// Fails outright.
    Fail,
}

impl FixedAgents {
    fn new(pro: Option<i64>, con: Option<i64>) -> Self {
        Self {
            pro,
            con,
            judge: JudgeMode::Policy,
            format: FormatMode::Restyle,
            pro_calls: AtomicU32::new(0),
            con_calls: AtomicU32::new(0),
        }
    }

    fn judge(mut self, judge: JudgeMode) -> Self {
        self.judge = judge;
        self
    }

    fn format(mut self, format: FormatMode) -> Self {
        self.format = format;
        self
    }
}

#[async_trait]
impl DebateAgents for FixedAgents {
    async fn generate_pro(&self, product: &Product) -> Result<Argument, CollaboratorError> {
        self.pro_calls.fetch_add(1, Ordering::SeqCst);
        self.pro
            .map(|s| Argument::new(s, format!("{} is worth it", product.name)))
            .ok_or_else(|| CollaboratorError::Unavailable("pro backend down".into()))
    }

    async fn generate_con(&self, product: &Product) -> Result<Argument, CollaboratorError> {
        self.con_calls.fetch_add(1, Ordering::SeqCst);
        self.con
            .map(|s| Argument::new(s, format!("{} is overpriced", product.name)))
            .ok_or_else(|| CollaboratorError::InvalidShape("sentiment missing".into()))
    }

    async fn generate_decision(
        &self,
        pro: i64,
        con: i64,
        _product: &Product,
    ) -> Result<Decision, CollaboratorError> {
        match self.judge {
            JudgeMode::Policy => Ok(DecisionPolicy::default().verdict(pro, con)),
            JudgeMode::AlwaysBuy => Ok(Decision::new(pro - con, Choice::Buy, "buy it")),
            JudgeMode::Fail => Err(CollaboratorError::Unavailable("judge timeout".into())),
        }
    }

    async fn format_decision(
        &self,
        decision: &Decision,
        product: &Product,
    ) -> Result<Decision, CollaboratorError> {
        match self.format {
            FormatMode::Restyle => {
                let mut out = decision.clone();
                out.explanation = format!("{}: {}", product.name, decision.explanation);
                Ok(out)
            }
            FormatMode::Tamper => {
                let mut out = decision.clone();
                out.decision = match decision.decision {
                    Choice::Buy => Choice::Skip,
                    Choice::Skip => Choice::Buy,
                };
                out.sentiment = 999;
                out.uncertain = !decision.uncertain;
                Ok(out)
            }
            FormatMode::Summarize => {
                let mut out = decision.clone();
                out.explanation = "Short summary.".into();
                Ok(out)
            }
            FormatMode::Fail => Err(CollaboratorError::Unavailable("formatter down".into())),
        }
    }
}

fn product(name: &str) -> Product {
    Product::new(name, format!("https://shop.example/{name}")).with_keywords(["gadget"])
}

// ── Band properties ────────────────────────────────────────────────

#[tokio::test]
async fn test_strong_pro_buys() {
    let orch = DebateOrchestrator::new(FixedAgents::new(Some(80), Some(-40)));
    let decision = orch.run_debate(product("Blender")).await.unwrap();
    assert_eq!(decision.decision, Choice::Buy);
    assert!(!decision.uncertain);
}

#[tokio::test]
async fn test_con_lead_at_boundary_skips_confidently() {
    let orch = DebateOrchestrator::new(FixedAgents::new(Some(30), Some(-50)));
    let decision = orch.run_debate(product("Blender")).await.unwrap();
    assert_eq!(decision.decision, Choice::Skip);
    assert!(!decision.uncertain);
}

#[tokio::test]
async fn test_small_gap_skips_uncertain() {
    let orch = DebateOrchestrator::new(FixedAgents::new(Some(50), Some(-55)));
    let decision = orch.run_debate(product("Blender")).await.unwrap();
    assert_eq!(decision.decision, Choice::Skip);
    assert!(decision.uncertain);
    assert!(decision.explanation.contains("Uncertain:"));
}

#[tokio::test]
async fn test_pro_lead_between_bands_is_uncertain() {
    let orch = DebateOrchestrator::new(FixedAgents::new(Some(67), Some(-50)));
    let decision = orch.run_debate(product("Blender")).await.unwrap();
    assert_eq!(decision.decision, Choice::Skip);
    assert!(decision.uncertain);
}

#[tokio::test]
async fn test_all_rounds_fail_still_completes() {
    let orch = DebateOrchestrator::new(FixedAgents::new(None, None));
    let outcome = orch.run(product("Blender")).await.unwrap();
    assert_eq!(outcome.state.pro_sentiment, 0);
    assert_eq!(outcome.state.con_sentiment, 0);
    assert_eq!(outcome.state.round_count, 2);
    assert!(outcome.state.transcript.is_empty());
    assert_eq!(outcome.decision.decision, Choice::Skip);
    assert!(outcome.decision.uncertain);
}

// ── Round budget ───────────────────────────────────────────────────

#[tokio::test]
async fn test_pro_and_con_visited_once_each() {
    let agents = FixedAgents::new(None, Some(-20));
    let orch = DebateOrchestrator::new(agents);
    let outcome = orch.run(product("Blender")).await.unwrap();

    assert_eq!(outcome.state.round_count, 2);
    assert_eq!(outcome.state.transcript.len(), 1);
    assert_eq!(outcome.visits(DebatePhase::Pro), 1);
    assert_eq!(outcome.visits(DebatePhase::Con), 1);
    assert_eq!(outcome.visits(DebatePhase::Decide), 1);
    assert_eq!(orch.agents().pro_calls.load(Ordering::SeqCst), 1);
    assert_eq!(orch.agents().con_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_sentiment_totals_are_sums() {
    let config = DebateConfig {
        rounds_per_side: 3,
        ..Default::default()
    };
    let orch = DebateOrchestrator::with_config(FixedAgents::new(Some(25), Some(-10)), config);
    let outcome = orch.run(product("Blender")).await.unwrap();

    assert_eq!(outcome.state.round_count, 6);
    assert_eq!(outcome.state.pro_sentiment, 75);
    assert_eq!(outcome.state.con_sentiment, 30);
    assert!(outcome.state.pro_sentiment >= 0 && outcome.state.con_sentiment >= 0);
    assert_eq!(outcome.state.transcript.len(), 6);
    assert!(outcome.state.transcript[0].starts_with("Pro: "));
    assert!(outcome.state.transcript[1].starts_with("Con: "));
}

// ── Fatal and fail-soft paths ──────────────────────────────────────

#[tokio::test]
async fn test_judge_failure_propagates() {
    let agents = FixedAgents::new(Some(90), Some(-10)).judge(JudgeMode::Fail);
    let err = DebateOrchestrator::new(agents)
        .run_debate(product("Blender"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DebateError::DecisionGeneration(CollaboratorError::Unavailable(_))
    ));
}

#[tokio::test]
async fn test_judge_held_to_policy() {
    let agents = FixedAgents::new(Some(10), Some(-60)).judge(JudgeMode::AlwaysBuy);
    let decision = DebateOrchestrator::new(agents)
        .run_debate(product("Blender"))
        .await
        .unwrap();
    assert_eq!(decision.decision, Choice::Skip);
    assert!(!decision.uncertain);
    assert_eq!(decision.sentiment, -50);
    assert!(!decision.explanation.contains("buy it"));
    assert!(decision.explanation.contains("skip margin"));
}

#[tokio::test]
async fn test_overridden_judge_in_uncertain_band_reads_uncertain() {
    let agents = FixedAgents::new(Some(50), Some(-55)).judge(JudgeMode::AlwaysBuy);
    let outcome = DebateOrchestrator::new(agents)
        .run(product("Blender"))
        .await
        .unwrap();
    let expected = DecisionPolicy::default().verdict(50, 55);
    assert_eq!(outcome.verdict, expected);
    assert_eq!(outcome.decision.decision, Choice::Skip);
    assert!(outcome.decision.uncertain);
    assert_eq!(outcome.decision.sentiment, -5);
    assert_eq!(
        outcome.decision.explanation,
        format!("Blender: {}", expected.explanation)
    );
    assert!(outcome.decision.explanation.contains("Uncertain:"));
}

#[tokio::test]
async fn test_formatter_dropping_uncertain_wording_is_reflagged() {
    let agents = FixedAgents::new(Some(50), Some(-55)).format(FormatMode::Summarize);
    let decision = DebateOrchestrator::new(agents)
        .run_debate(product("Blender"))
        .await
        .unwrap();
    assert!(decision.uncertain);
    assert_eq!(decision.explanation, "Uncertain: Short summary.");
}

#[tokio::test]
async fn test_tampering_formatter_is_corrected() {
    let agents = FixedAgents::new(Some(80), Some(-40)).format(FormatMode::Tamper);
    let outcome = DebateOrchestrator::new(agents)
        .run(product("Blender"))
        .await
        .unwrap();
    assert_eq!(outcome.decision.decision, Choice::Buy);
    assert_eq!(outcome.decision.sentiment, outcome.verdict.sentiment);
    assert_eq!(outcome.decision.uncertain, outcome.verdict.uncertain);
}

#[tokio::test]
async fn test_formatter_failure_keeps_verdict() {
    let agents = FixedAgents::new(Some(80), Some(-40)).format(FormatMode::Fail);
    let outcome = DebateOrchestrator::new(agents)
        .run(product("Blender"))
        .await
        .unwrap();
    assert_eq!(outcome.decision, outcome.verdict);
    assert_eq!(outcome.visits(DebatePhase::Done), 1);
}

#[tokio::test]
async fn test_formatting_twice_keeps_choice_and_sentiment() {
    for (pro, con) in [(80, -40), (50, -55), (10, -60)] {
        let agents = FixedAgents::new(Some(pro), Some(con)).format(FormatMode::Tamper);
        let p = product("Blender");
        let orch = DebateOrchestrator::new(agents);
        let once = orch.run_debate(p.clone()).await.unwrap();
        let twice = orch.format_verdict(&once, &p).await;
        assert_eq!(once.decision, twice.decision);
        assert_eq!(once.sentiment, twice.sentiment);
        assert_eq!(once.uncertain, twice.uncertain);
    }
}

#[tokio::test]
async fn test_repeated_runs_agree() {
    let orch = DebateOrchestrator::new(FixedAgents::new(Some(50), Some(-55)));
    let first = orch.run_debate(product("Blender")).await.unwrap();
    let second = orch.run_debate(product("Blender")).await.unwrap();
    assert!(first.same_verdict(&second));
    assert_eq!(first.explanation, second.explanation);
}

// ── Independent parallel runs ──────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_debates_do_not_share_state() {
    let orch = Arc::new(DebateOrchestrator::new(FixedAgents::new(Some(40), Some(-10))));
    let mut handles = Vec::new();
    for i in 0..8 {
        let orch = Arc::clone(&orch);
        handles.push(tokio::spawn(async move {
            orch.run(product(&format!("item-{i}"))).await
        }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        let outcome = handle.await.unwrap().unwrap();
        assert_eq!(outcome.state.product.name, format!("item-{i}"));
        assert_eq!(outcome.state.round_count, 2);
        assert_eq!(outcome.state.pro_sentiment, 40);
        assert_eq!(outcome.state.con_sentiment, 10);
        assert_eq!(outcome.decision.decision, Choice::Buy);
    }
    assert_eq!(orch.agents().pro_calls.load(Ordering::SeqCst), 8);
}

#[tokio::test]
async fn test_each_run_gets_unique_id() {
    let orch = DebateOrchestrator::new(FixedAgents::new(Some(40), Some(-10)));
    let a = orch.run(product("a")).await.unwrap();
    let b = orch.run(product("b")).await.unwrap();
    assert_ne!(a.debate_id, b.debate_id);
}

#[tokio::test]
async fn test_outcome_serializes() {
    let orch = DebateOrchestrator::new(FixedAgents::new(Some(80), Some(-40)));
    let outcome = orch.run(product("Blender")).await.unwrap();
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["decision"]["decision"], "Buy");
    assert_eq!(json["state"]["round_count"], 2);
    assert_eq!(json["transitions"][0]["to"], "pro");
}
