use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use debate_agents::batch::{run_batch, BatchFile};
use debate_agents::cli::Cli;
use debate_agents::config::check_endpoint;
use debate_agents::prompts::PROMPT_VERSION;
use debate_agents::report::{BatchReport, DebateReport};
use debate_agents::{telemetry, AgentFactory, AgentsConfig};
use deliberation::DebateOrchestrator;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    telemetry::init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = cli.resolve_config()?;
    info!(
        model = %config.provider.model,
        base_url = %config.provider.base_url,
        rounds_per_side = config.rounds_per_side,
        prompt_version = PROMPT_VERSION,
        "buy-or-skip starting"
    );

    if cli.check_endpoint {
        let reachable =
            check_endpoint(&config.provider.base_url, config.provider.api_key.as_deref()).await;
        println!(
            "{} {}",
            if reachable { "✅ reachable:" } else { "❌ unreachable:" },
            config.provider.base_url
        );
        return Ok(if reachable { ExitCode::SUCCESS } else { ExitCode::FAILURE });
    }

    let factory = AgentFactory::new(&config)?;
    let orchestrator =
        DebateOrchestrator::with_config(factory.build_debate_agents(), config.debate_config());

    match &cli.batch {
        Some(path) => run_many(&cli, &config, orchestrator, path).await,
        None => run_one(&cli, &config, orchestrator).await,
    }
}

async fn run_one(
    cli: &Cli,
    config: &AgentsConfig,
    orchestrator: DebateOrchestrator<debate_agents::RigDebateAgents>,
) -> Result<ExitCode> {
    let product = cli.product()?;

    let outcome = tokio::select! {
        outcome = orchestrator.run(product) => outcome.context("debate failed")?,
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted, no decision reached");
            return Ok(ExitCode::from(130));
        }
    };

    let report = DebateReport::new(outcome, &config.provider.model);
    if let Some(path) = &cli.report {
        report
            .write_json(path)
            .with_context(|| format!("writing report to {}", path.display()))?;
        info!(path = %path.display(), "report written");
    }
    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.render_text());
    }
    Ok(ExitCode::SUCCESS)
}

async fn run_many(
    cli: &Cli,
    config: &AgentsConfig,
    orchestrator: DebateOrchestrator<debate_agents::RigDebateAgents>,
    path: &std::path::Path,
) -> Result<ExitCode> {
    let batch = BatchFile::load(path)?;
    if batch.products.is_empty() {
        warn!(path = %path.display(), "batch file lists no products");
    }
    let names: Vec<String> = batch.products.iter().map(|p| p.name.clone()).collect();

    let batch_run = run_batch(
        Arc::new(orchestrator),
        batch.products,
        config.max_parallel_debates,
    );
    let results = tokio::select! {
        results = batch_run => results,
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted, batch abandoned");
            return Ok(ExitCode::from(130));
        }
    };

    let mut outcomes = Vec::new();
    let mut failures = Vec::new();
    for (name, result) in names.into_iter().zip(results) {
        match result {
            Ok(outcome) => {
                if !cli.json {
                    println!("{}", outcome.summary_line());
                }
                outcomes.push(outcome);
            }
            Err(e) => {
                if !cli.json {
                    println!("[FAILED] product={name} | {e}");
                }
                failures.push((name, e.to_string()));
            }
        }
    }

    let report = BatchReport {
        generated_at: Utc::now(),
        prompt_version: PROMPT_VERSION.to_string(),
        model: config.provider.model.clone(),
        outcomes,
        failures,
    };
    if let Some(path) = &cli.report {
        report
            .write_json(path)
            .with_context(|| format!("writing report to {}", path.display()))?;
    }
    if cli.json {
        println!("{}", report.to_json()?);
    }

    Ok(if report.failures.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
