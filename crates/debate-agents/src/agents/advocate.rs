//! Pro and con advocate agents.

use deliberation::Stance;
use rig::client::CompletionClient;
use rig::providers::openai;

use crate::prompts;

use super::OaiAgent;

/// Build the advocate for one side of the debate.
///
/// NO tools: the advocate sees only the product block in its prompt and
/// answers with a `{sentiment, body}` JSON object.
pub fn build_advocate(
    client: &openai::CompletionsClient,
    model: &str,
    stance: Stance,
    temperature: f64,
) -> OaiAgent {
    let (name, description, preamble) = match stance {
        Stance::Pro => (
            "pro_advocate",
            "Argues for buying the product. Sentiment 0..=100.",
            prompts::PRO_PREAMBLE,
        ),
        Stance::Con => (
            "con_advocate",
            "Argues against buying the product. Sentiment -100..=0.",
            prompts::CON_PREAMBLE,
        ),
    };
    client
        .agent(model)
        .name(name)
        .description(description)
        .preamble(preamble)
        .temperature(temperature)
        .build()
}
