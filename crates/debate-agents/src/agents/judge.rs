//! Judge and formatter agents.

use deliberation::DecisionPolicy;
use rig::client::CompletionClient;
use rig::providers::openai;

use crate::prompts;

use super::OaiAgent;

/// Build the judge. Its preamble states the policy margins in force.
pub fn build_judge(
    client: &openai::CompletionsClient,
    model: &str,
    policy: &DecisionPolicy,
    temperature: f64,
) -> OaiAgent {
    client
        .agent(model)
        .name("judge")
        .description("Turns accumulated pro/con sentiment into a Buy or Skip verdict.")
        .preamble(&prompts::judge_preamble(policy))
        .temperature(temperature)
        .build()
}

/// Build the formatter. It only rewords the explanation.
pub fn build_formatter(
    client: &openai::CompletionsClient,
    model: &str,
    temperature: f64,
) -> OaiAgent {
    client
        .agent(model)
        .name("formatter")
        .description("Rewrites a verdict's explanation for presentation.")
        .preamble(prompts::FORMATTER_PREAMBLE)
        .temperature(temperature)
        .build()
}
