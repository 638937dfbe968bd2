// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::Context;
use feature_assembler::config::{load_and_validate_config, RuntimeBuilder};
use feature_assembler::types::{ScoreKey, ScoreRecord};
use serde::Serialize;
use std::env;
use tracing_subscriber::EnvFilter;

/// What a successful run prints to stdout.
#[derive(Serialize)]
struct AssemblyReport<'a> {
    ordered_score_keys: &'a [ScoreKey],
    records: &'a [ScoreRecord],
    feature_vectors: &'a [Vec<f64>],
}

/// Parsed command line.
struct Cli {
    config_path: String,
    remove_logs: bool,
    remove_results: bool,
}

fn parse_args(args: &[String]) -> Option<Cli> {
    let mut config_path = None;
    let mut remove_logs = false;
    let mut remove_results = false;

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--remove-logs" => remove_logs = true,
            "--remove-results" => remove_results = true,
            flag if flag.starts_with("--") => return None,
            path if config_path.is_none() => config_path = Some(path.to_string()),
            _ => return None,
        }
    }

    Some(Cli {
        config_path: config_path?,
        remove_logs,
        remove_results,
    })
}

fn program_name(args: &[String]) -> &str {
    args.first().map_or("feature-assembler", String::as_str)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();

    let Some(cli) = parse_args(&args) else {
        let program = program_name(&args);
        eprintln!(
            "Usage: {} <config.yaml|config.toml> [--remove-logs] [--remove-results]",
            program
        );
        eprintln!("Example: {} configs/vmaf-all.yaml", program);
        eprintln!("Example: {} configs/vmaf-subset.toml --remove-logs", program);
        std::process::exit(1);
    };

    init_tracing();

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = load_and_validate_config(&cli.config_path)
        .with_context(|| format!("Failed to load config '{}'", cli.config_path))?;
    let mut assembler =
        RuntimeBuilder::from_config(&config).context("Failed to build feature assembler")?;

    let records = assembler
        .run()
        .await
        .context("Feature assembly failed")?
        .to_vec();
    let ordered_score_keys = assembler.ordered_score_key_list()?;
    let feature_vectors = assembler.feature_vectors()?;

    let report = AssemblyReport {
        ordered_score_keys: &ordered_score_keys,
        records: &records,
        feature_vectors: &feature_vectors,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    if cli.remove_logs {
        assembler
            .remove_logs()
            .await
            .context("Failed to remove extractor logs")?;
    }
    if cli.remove_results {
        assembler
            .remove_results()
            .await
            .context("Failed to remove stored results")?;
    }

    Ok(())
}
