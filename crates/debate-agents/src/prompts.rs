//! System prompt constants and prompt builders for each debate role.
//!
//! Prompt versioning: bump `PROMPT_VERSION` whenever preamble content changes.
//! The version is stamped into every JSON report so a verdict can be traced
//! back to the prompts that produced it.

use deliberation::{Decision, DecisionPolicy, Product, Stance};

/// Prompt version. Bump on any preamble content change.
pub const PROMPT_VERSION: &str = "1.3.0";

/// Reply contract for the two advocates, sent with every argument prompt.
const ARGUMENT_REPLY_FORMAT: &str = "\
Reply with a single JSON object and nothing else:
{\"sentiment\": <integer>, \"body\": \"<your argument, 2-5 sentences>\"}";

/// Pro advocate preamble.
pub const PRO_PREAMBLE: &str = "\
You are a product manager. Write a strong, positive argument for why the product \
is worth buying. Ground the argument in the product name, its page and the \
keywords you are given; do not invent prices or specifications.

Assign a sentiment score from 0 to 100, where 100 means an outstanding purchase.";

/// Con advocate preamble.
pub const CON_PREAMBLE: &str = "\
You are a critic. Write a strong, negative argument for why the product is not \
worth buying. Ground the argument in the product name, its page and the keywords \
you are given; do not invent prices or specifications.

Assign a sentiment score from -100 to 0, where -100 means a terrible purchase.";

/// Formatter preamble. The formatter may only reword.
pub const FORMATTER_PREAMBLE: &str = "\
Format the final decision in a structured way for a shopper.

You receive a decision as JSON. Rewrite only the explanation: one short paragraph, \
plain language, naming the product. Keep `sentiment`, `decision` and `uncertain` \
exactly as given.

Reply with a single JSON object and nothing else:
{\"sentiment\": <integer>, \"decision\": \"Buy\" | \"Skip\", \"explanation\": \"<text>\", \"uncertain\": <bool>}";

/// Judge preamble, parameterized by the policy margins.
pub fn judge_preamble(policy: &DecisionPolicy) -> String {
    format!(
        "You are a decision-making agent. Decide whether the product is worth buying \
         from the accumulated pro and con sentiment scores.\n\n\
         Rules:\n\
         - Return \"Buy\" if the pro sentiment is at least {buy} points stronger than the con sentiment.\n\
         - Return \"Skip\" if the con sentiment is at least {skip} points stronger than the pro sentiment.\n\
         - Otherwise return \"Skip\" and set \"uncertain\" to true.\n\n\
         Reply with a single JSON object and nothing else:\n\
         {{\"sentiment\": <integer, pro minus con>, \"decision\": \"Buy\" | \"Skip\", \
         \"explanation\": \"<one paragraph>\", \"uncertain\": <bool>}}",
        buy = policy.buy_margin,
        skip = policy.skip_margin,
    )
}

/// Product context block shared by every prompt.
fn product_block(product: &Product) -> String {
    format!(
        "## Product\n- Name: {}\n- URL: {}\n- Keywords: {}",
        product.name,
        product.url,
        product.keyword_line()
    )
}

/// User prompt for an advocate.
pub fn argument_prompt(stance: Stance, product: &Product) -> String {
    let ask = match stance {
        Stance::Pro => "Make a strong argument for buying this product.",
        Stance::Con => "Make a strong argument against buying this product.",
    };
    format!("{}\n\n{ask}\n\n{ARGUMENT_REPLY_FORMAT}", product_block(product))
}

/// User prompt for the judge.
pub fn decision_prompt(pro_sentiment: i64, con_sentiment: i64, product: &Product) -> String {
    format!(
        "{}\n\nAnalyze the arguments and make a decision. \
         Pro Sentiment: {pro_sentiment}, Con Sentiment: {con_sentiment}.",
        product_block(product)
    )
}

/// User prompt for the formatter.
pub fn format_prompt(decision: &Decision, product: &Product) -> Result<String, serde_json::Error> {
    let decision_json = serde_json::to_string(decision)?;
    Ok(format!(
        "{}\n\nFormat the final decision for {}.\n\n## Decision\n{decision_json}",
        product_block(product),
        product.name
    ))
}
