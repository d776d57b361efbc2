//! Command-line surface of `buy-or-skip`.

use std::path::PathBuf;

use clap::Parser;
use deliberation::{Product, DEFAULT_PRODUCT_NAME};
use tracing::warn;

use crate::config::AgentsConfig;
use crate::error::AgentError;

/// Debate whether a product is worth buying, then print a Buy or Skip verdict.
#[derive(Debug, Parser)]
#[command(name = "buy-or-skip", version, about)]
pub struct Cli {
    /// Product page URL.
    #[arg(long, required_unless_present_any = ["batch", "check_endpoint"])]
    pub url: Option<String>,

    /// Comma-separated product keywords.
    #[arg(long, default_value = "")]
    pub keywords: String,

    /// Product name.
    #[arg(long, default_value = DEFAULT_PRODUCT_NAME)]
    pub name: String,

    /// TOML config file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Model override for every role.
    #[arg(long)]
    pub model: Option<String>,

    /// OpenAI-compatible base URL override.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Pro rounds (and Con rounds) per debate.
    #[arg(long)]
    pub rounds_per_side: Option<u32>,

    /// TOML file with `[[products]]` entries to debate concurrently.
    #[arg(long, conflicts_with = "url")]
    pub batch: Option<PathBuf>,

    /// Print the outcome as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Write a JSON report to this path.
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Probe `<base_url>/models` and exit.
    #[arg(long)]
    pub check_endpoint: bool,

    /// Debug-level logging when `RUST_LOG` is unset.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The single product described by `--url`, `--name` and `--keywords`.
    pub fn product(&self) -> Result<Product, AgentError> {
        let url = self
            .url
            .as_deref()
            .ok_or_else(|| AgentError::Configuration("--url is required".into()))?;
        let keywords = Product::parse_keywords(&self.keywords);
        if keywords.is_empty() {
            warn!("no keywords given, the advocates will only see the name and URL");
        }
        Ok(Product::new(self.name.trim(), url.trim()).with_keywords(keywords))
    }

    /// Load file and environment config, then apply flag overrides.
    pub fn resolve_config(&self) -> Result<AgentsConfig, AgentError> {
        let mut config = AgentsConfig::load(self.config.as_deref())?;
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut AgentsConfig) {
        if let Some(model) = &self.model {
            config.provider.model = model.clone();
        }
        if let Some(base_url) = &self.base_url {
            config.provider.base_url = base_url.clone();
        }
        if let Some(rounds) = self.rounds_per_side {
            config.rounds_per_side = rounds;
        }
    }
}
