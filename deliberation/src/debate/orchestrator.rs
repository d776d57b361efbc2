//! Debate orchestrator — drives the moderator → pro/con → verdict loop.
//!
//! Ties together the state record, the phase machine, the decision policy and
//! the injected collaborators to run one debate end-to-end. Exactly one
//! collaborator call is in flight at a time; the state is owned by the run.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, info_span, warn, Instrument};

use super::agents::DebateAgents;
use super::error::DebateError;
use super::policy::{flag_uncertain, DecisionPolicy};
use super::state::{advance, DebatePhase, DebateState, PhaseTransition};
use super::types::{Choice, Decision, Product, Stance};

/// Configuration for the debate orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateConfig {
    /// Pro rounds (and Con rounds) before the verdict.
    pub rounds_per_side: u32,
    /// Threshold policy for the verdict.
    pub policy: DecisionPolicy,
}

impl Default for DebateConfig {
    fn default() -> Self {
        Self {
            rounds_per_side: 1,
            policy: DecisionPolicy::default(),
        }
    }
}

impl DebateConfig {
    /// Total Pro + Con visits before the moderator asks for a verdict.
    pub fn round_budget(&self) -> u32 {
        self.rounds_per_side.saturating_mul(2)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.rounds_per_side == 0 {
            return Err("rounds_per_side must be > 0".to_string());
        }
        self.policy.validate()
    }
}

/// Outcome of a completed debate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateOutcome {
    /// Run identifier (uuid v4).
    pub debate_id: String,
    /// Final, formatted decision.
    pub decision: Decision,
    /// Verdict as it stood before formatting.
    pub verdict: Decision,
    /// State snapshot at completion.
    pub state: DebateState,
    /// Phase transition history.
    pub transitions: Vec<PhaseTransition>,
}

impl DebateOutcome {
    pub fn is_buy(&self) -> bool {
        self.decision.decision == Choice::Buy
    }

    /// Rounds counted without contributing an argument.
    pub fn spent_rounds(&self) -> u32 {
        self.state.spent_rounds()
    }

    /// How many times the machine entered `phase`.
    pub fn visits(&self, phase: DebatePhase) -> usize {
        self.transitions.iter().filter(|t| t.to == phase).count()
    }

    /// Compact summary line.
    pub fn summary_line(&self) -> String {
        let status = match (self.decision.decision, self.decision.uncertain) {
            (Choice::Buy, _) => "BUY",
            (Choice::Skip, false) => "SKIP",
            (Choice::Skip, true) => "SKIP?",
        };
        format!(
            "[{}] pro={} con={} | {} rounds ({} spent) | product={}",
            status,
            self.state.pro_sentiment,
            self.state.con_sentiment,
            self.state.round_count,
            self.spent_rounds(),
            self.state.product.name
        )
    }
}

/// Machine position, carrying the verdict once one exists.
#[derive(Debug)]
enum Node {
    Moderate,
    Advocate(Stance),
    Decide(Decision),
    Done(Decision),
}

impl Node {
    fn phase(&self) -> DebatePhase {
        match self {
            Self::Moderate => DebatePhase::Moderate,
            Self::Advocate(stance) => DebatePhase::for_stance(*stance),
            Self::Decide(_) => DebatePhase::Decide,
            Self::Done(_) => DebatePhase::Done,
        }
    }
}

/// The debate orchestrator.
///
/// Usage:
/// 1. Create with `new()` or `with_config()`, handing over the collaborators
/// 2. Call `run()` for the full outcome or `run_debate()` for the decision only
///
/// One orchestrator may run many debates, including concurrently; each run
/// owns its own `DebateState`.
pub struct DebateOrchestrator<A> {
    agents: A,
    config: DebateConfig,
}

impl<A: DebateAgents> DebateOrchestrator<A> {
    /// Create an orchestrator with the default two-round budget.
    pub fn new(agents: A) -> Self {
        Self::with_config(agents, DebateConfig::default())
    }

    pub fn with_config(agents: A, config: DebateConfig) -> Self {
        Self { agents, config }
    }

    pub fn config(&self) -> &DebateConfig {
        &self.config
    }

    pub fn agents(&self) -> &A {
        &self.agents
    }

    /// Moderator rule: who speaks next, or `None` once the budget is spent.
    ///
    /// Pro speaks on even round counts, Con on odd ones.
    pub fn next_speaker(&self, state: &DebateState) -> Option<Stance> {
        if state.round_count >= self.config.round_budget() {
            return None;
        }
        Some(if state.round_count % 2 == 0 {
            Stance::Pro
        } else {
            Stance::Con
        })
    }

    /// Run a debate and return only the final decision.
    pub async fn run_debate(&self, product: Product) -> Result<Decision, DebateError> {
        self.run(product).await.map(|outcome| outcome.decision)
    }

    /// Run a debate to completion.
    pub async fn run(&self, product: Product) -> Result<DebateOutcome, DebateError> {
        product.validate().map_err(DebateError::InvalidProduct)?;

        let debate_id = uuid::Uuid::new_v4().to_string();
        let span = info_span!("debate", debate_id = %debate_id, product = %product.name);
        self.drive(debate_id, product).instrument(span).await
    }

    async fn drive(
        &self,
        debate_id: String,
        product: Product,
    ) -> Result<DebateOutcome, DebateError> {
        info!(
            url = %product.url,
            keywords = %product.keyword_line(),
            budget = self.config.round_budget(),
            "debate starting"
        );

        let mut state = DebateState::new(product);
        let mut transitions = Vec::new();
        let mut verdict: Option<Decision> = None;
        let mut node = Node::Moderate;

        loop {
            let from = node.phase();
            let (next, reason) = match node {
                Node::Moderate => {
                    debug!(status = %state.status_line(), "moderating");
                    match self.next_speaker(&state) {
                        Some(stance) => (
                            Node::Advocate(stance),
                            format!("round {} goes to {}", state.round_count + 1, stance),
                        ),
                        None => {
                            let proposed = self.request_verdict(&state).await?;
                            (Node::Decide(proposed), "round budget spent".to_string())
                        }
                    }
                }
                Node::Advocate(stance) => {
                    self.argue(stance, &mut state).await;
                    (Node::Moderate, format!("{stance} round complete"))
                }
                Node::Decide(proposed) => {
                    let formatted = self.format_verdict(&proposed, &state.product).await;
                    verdict = Some(proposed);
                    (Node::Done(formatted), "decision formatted".to_string())
                }
                Node::Done(decision) => {
                    let outcome = DebateOutcome {
                        debate_id,
                        verdict: verdict.unwrap_or_else(|| decision.clone()),
                        decision,
                        state,
                        transitions,
                    };
                    info!(summary = %outcome.summary_line(), "debate complete");
                    return Ok(outcome);
                }
            };

            advance(&mut transitions, from, next.phase(), &reason)?;
            node = next;
        }
    }

    /// One Pro or Con visit. Failures spend the round.
    async fn argue(&self, stance: Stance, state: &mut DebateState) {
        let round = state.round_count + 1;
        match self.agents.generate_argument(stance, &state.product).await {
            Ok(argument) => {
                if !stance.sentiment_range().contains(&argument.sentiment) {
                    debug!(
                        %stance,
                        sentiment = argument.sentiment,
                        "sentiment outside documented range"
                    );
                }
                state.record(stance, &argument);
                info!(
                    %stance,
                    round,
                    sentiment = argument.sentiment,
                    pro = state.pro_sentiment,
                    con = state.con_sentiment,
                    "argument recorded"
                );
            }
            Err(e) => {
                state.record_spent(stance);
                warn!(%stance, round, error = %e, "no usable argument, round spent");
            }
        }
    }

    /// Ask the judge for a verdict and hold it to the policy.
    async fn request_verdict(&self, state: &DebateState) -> Result<Decision, DebateError> {
        let (pro, con) = (state.pro_sentiment, state.con_sentiment);
        info!(pro, con, net = state.net_sentiment(), "requesting final verdict");

        let proposed = self
            .agents
            .generate_decision(pro, con, &state.product)
            .await
            .map_err(|e| {
                error!(error = %e, "verdict generation failed");
                DebateError::DecisionGeneration(e)
            })?;

        Ok(self.config.policy.reconcile(proposed, pro, con))
    }

    /// Format a verdict. Only the wording may change; a formatter failure
    /// returns the verdict unchanged.
    pub async fn format_verdict(&self, verdict: &Decision, product: &Product) -> Decision {
        match self.agents.format_decision(verdict, product).await {
            Ok(mut formatted) => {
                if !formatted.same_verdict(verdict) {
                    warn!(
                        expected = %verdict.decision,
                        got = %formatted.decision,
                        "formatter altered the verdict, restoring choice and sentiment"
                    );
                    formatted.decision = verdict.decision;
                    formatted.sentiment = verdict.sentiment;
                    formatted.uncertain = verdict.uncertain;
                }
                flag_uncertain(&mut formatted);
                formatted
            }
            Err(e) => {
                warn!(error = %e, "formatter failed, keeping unformatted verdict");
                verdict.clone()
            }
        }
    }
}
