use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use serde_json::{json, Value as JsonValue};
use stoich_checker::{Marker, MarkingConfig, Statement, Verdict, Visualize};
use tracing::{debug, info};

mod cli;
mod logging;

use cli::{Cli, Command, GraphArgs, MarkArgs};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);

    let result = match cli.command {
        Command::Mark(args) => run_mark(&args),
        Command::Graph(args) => run_graph(&args).map(|()| true),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(2)
        }
    }
}

/// Prints verdict JSON and reports whether every candidate passed.
fn run_mark(args: &MarkArgs) -> Result<bool> {
    let config = match &args.config {
        Some(path) => {
            let source = read(path)?;
            MarkingConfig::from_yaml_str(&source)
                .with_context(|| format!("Failed to parse config {}", path.display()))?
        }
        None => MarkingConfig::default(),
    };
    let marker = Marker::from_config(&config).context("Invalid marking configuration")?;

    let reference: Statement = parse_json(&args.reference)?;
    let candidate: JsonValue = parse_json(&args.candidate)?;
    debug!(reference = %reference, "loaded reference");

    let (output, all_pass) = match decode_candidates(candidate)? {
        Candidates::Batch(candidates) => {
            let verdicts = marker.mark_batch(&reference, &candidates);
            let passed = verdicts.iter().filter(|v| v.is_pass()).count();
            info!(total = verdicts.len(), passed, "marked batch");
            let rendered: Vec<JsonValue> = verdicts.iter().map(verdict_json).collect();
            (JsonValue::Array(rendered), passed == verdicts.len())
        }
        Candidates::Single(candidate) => {
            let verdict = marker.mark(&reference, &candidate);
            info!(outcome = %verdict.outcome, "marked candidate");
            (verdict_json(&verdict), verdict.is_pass())
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(all_pass)
}

#[derive(Debug)]
enum Candidates {
    Single(Statement),
    Batch(Vec<Statement>),
}

/// A JSON array is a batch and must hold at least one statement.
fn decode_candidates(value: JsonValue) -> Result<Candidates> {
    if value.is_array() {
        let batch: Vec<Statement> =
            serde_json::from_value(value).context("Failed to decode candidate statements")?;
        ensure!(!batch.is_empty(), "Candidate batch is empty");
        Ok(Candidates::Batch(batch))
    } else {
        let single =
            serde_json::from_value(value).context("Failed to decode candidate statement")?;
        Ok(Candidates::Single(single))
    }
}

fn run_graph(args: &GraphArgs) -> Result<()> {
    let statement: Statement = parse_json(&args.input)?;
    print!("{}", statement.visualize(args.format.into()));
    Ok(())
}

fn verdict_json(verdict: &Verdict) -> JsonValue {
    json!({
        "outcome": verdict.outcome,
        "message": verdict.message(),
        "wrong_terms": verdict
            .wrong_terms
            .iter()
            .map(|term| json!({
                "side": term.side,
                "formula": term.formula.to_string(),
                "expected": term.expected,
                "actual": term.actual,
            }))
            .collect::<Vec<_>>(),
    })
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn parse_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let source = read(path)?;
    serde_json::from_str(&source).with_context(|| format!("Failed to parse {}", path.display()))
}
