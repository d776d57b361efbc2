//! Agent builders for the buy/skip debate.
//!
//! Each agent is built via a free function that returns `Agent<openai::completion::CompletionModel>`.
//! The `AgentFactory` ties them together using the rig client and `AgentsConfig`,
//! and `RigDebateAgents` adapts the built agents to `deliberation::DebateAgents`.

pub mod advocate;
pub mod judge;

use std::time::Duration;

use async_trait::async_trait;
use deliberation::{Argument, CollaboratorError, DebateAgents, Decision, Product, Stance};
use rig::agent::Agent;
use rig::completion::Prompt;
use rig::providers::openai;
use tracing::{debug, warn};

use crate::config::AgentsConfig;
use crate::error::AgentError;
use crate::{parse, prompts};

/// Type alias for agents built from OpenAI-compatible endpoints.
pub type OaiAgent = Agent<openai::completion::CompletionModel>;

/// Factory that builds all debate agents from an `AgentsConfig`.
pub struct AgentFactory {
    pub client: openai::CompletionsClient,
    pub config: AgentsConfig,
}

impl AgentFactory {
    pub fn new(config: &AgentsConfig) -> Result<Self, AgentError> {
        config.validate()?;
        let client = config.client()?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn model(&self) -> &str {
        &self.config.provider.model
    }

    pub fn build_advocate(&self, stance: Stance) -> OaiAgent {
        advocate::build_advocate(
            &self.client,
            self.model(),
            stance,
            self.config.advocate_temperature,
        )
    }

    pub fn build_judge(&self) -> OaiAgent {
        judge::build_judge(
            &self.client,
            self.model(),
            &self.config.policy,
            self.config.judge_temperature,
        )
    }

    pub fn build_formatter(&self) -> OaiAgent {
        judge::build_formatter(&self.client, self.model(), self.config.judge_temperature)
    }

    /// Build the full collaborator set for the orchestrator.
    pub fn build_debate_agents(&self) -> RigDebateAgents {
        RigDebateAgents {
            pro: self.build_advocate(Stance::Pro),
            con: self.build_advocate(Stance::Con),
            judge: self.build_judge(),
            formatter: self.build_formatter(),
            timeout: self.config.provider.request_timeout(),
            max_retries: self.config.provider.max_retries,
        }
    }
}

/// LLM-backed debate collaborators.
pub struct RigDebateAgents {
    pro: OaiAgent,
    con: OaiAgent,
    judge: OaiAgent,
    formatter: OaiAgent,
    timeout: Duration,
    max_retries: u32,
}

impl RigDebateAgents {
    /// Prompt one agent under the per-call timeout, mapping failures to
    /// `CollaboratorError::Unavailable`.
    async fn ask(
        &self,
        role: &str,
        agent: &OaiAgent,
        prompt: &str,
    ) -> Result<String, CollaboratorError> {
        debug!(role, prompt_version = prompts::PROMPT_VERSION, "prompting agent");
        let call = prompt_with_retry(agent, prompt, self.max_retries);
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(e)) => Err(CollaboratorError::Unavailable(format!("{role}: {e}"))),
            Err(_) => Err(CollaboratorError::Unavailable(format!(
                "{role}: no reply within {}s",
                self.timeout.as_secs()
            ))),
        }
    }

    async fn argue(
        &self,
        stance: Stance,
        product: &Product,
    ) -> Result<Argument, CollaboratorError> {
        let agent = match stance {
            Stance::Pro => &self.pro,
            Stance::Con => &self.con,
        };
        let reply = self
            .ask(stance.label(), agent, &prompts::argument_prompt(stance, product))
            .await?;
        parse::parse_argument(&reply)
    }
}

#[async_trait]
impl DebateAgents for RigDebateAgents {
    async fn generate_pro(&self, product: &Product) -> Result<Argument, CollaboratorError> {
        self.argue(Stance::Pro, product).await
    }

    async fn generate_con(&self, product: &Product) -> Result<Argument, CollaboratorError> {
        self.argue(Stance::Con, product).await
    }

    async fn generate_decision(
        &self,
        pro_sentiment: i64,
        con_sentiment: i64,
        product: &Product,
    ) -> Result<Decision, CollaboratorError> {
        let prompt = prompts::decision_prompt(pro_sentiment, con_sentiment, product);
        let reply = self.ask("judge", &self.judge, &prompt).await?;
        parse::parse_decision(&reply)
    }

    async fn format_decision(
        &self,
        decision: &Decision,
        product: &Product,
    ) -> Result<Decision, CollaboratorError> {
        let prompt = prompts::format_prompt(decision, product)
            .map_err(|e| CollaboratorError::InvalidShape(e.to_string()))?;
        let reply = self.ask("formatter", &self.formatter, &prompt).await?;
        parse::parse_decision(&reply)
    }
}

/// Prompt an agent with exponential backoff retry for transient HTTP errors.
///
/// Retries on connection errors, 502, 503, 429 with backoff: 2s, 4s, 8s, ...
/// Non-transient errors fail immediately.
async fn prompt_with_retry(
    agent: &impl Prompt,
    prompt: &str,
    max_retries: u32,
) -> Result<String, rig::completion::PromptError> {
    let mut attempt = 0;
    loop {
        match agent.prompt(prompt).await {
            Ok(response) => return Ok(response),
            Err(e) => {
                let err_str = e.to_string();
                if attempt >= max_retries || !is_transient_error(&err_str) {
                    return Err(e);
                }
                attempt += 1;
                let backoff = Duration::from_secs(2u64.saturating_pow(attempt));
                warn!(
                    attempt,
                    max_retries,
                    backoff_secs = backoff.as_secs(),
                    error = %err_str,
                    "transient error, retrying"
                );
                tokio::time::sleep(backoff).await;
            }
        }
    }
}

fn is_transient_error(err_str: &str) -> bool {
    let lower = err_str.to_ascii_lowercase();
    err_str.contains("502")
        || err_str.contains("503")
        || err_str.contains("429")
        || lower.contains("connection")
        || lower.contains("timed out")
        || lower.contains("timeout")
        || lower.contains("error sending request")
        || lower.contains("reset by peer")
}
