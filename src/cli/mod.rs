//! Survival Insight CLI Module
//!
//! Starts the web server, or runs the analysis pipeline on a local CSV.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::analysis::{analyze, DEFAULT_PREDICTION_LIMIT};
use crate::training::ModelState;

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString {
    s.truecolor(100, 100, 100)
}
fn muted(s: &str) -> ColoredString {
    s.truecolor(140, 140, 140)
}
fn ok(s: &str) -> ColoredString {
    s.truecolor(100, 210, 120)
}

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_ok(msg: &str) {
    println!("  {} {}", ok("✓"), msg);
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "survival-insight")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Passenger survival predictions from an uploaded CSV")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
    },

    /// Run the analysis pipeline on a CSV file and print the JSON payload
    Analyze {
        /// Input CSV file. Must contain a Survived column for a model to be trained.
        #[arg(short, long)]
        data: PathBuf,

        /// Write the JSON payload here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of prediction records to include
        #[arg(long, default_value_t = DEFAULT_PREDICTION_LIMIT)]
        limit: usize,
    },
}

/// Analyze a local CSV with a fresh model state
pub fn cmd_analyze(data: &Path, output: Option<&Path>, limit: usize) -> anyhow::Result<()> {
    let start = Instant::now();
    let bytes = std::fs::read(data)?;

    let mut state = ModelState::new();
    let report = analyze(&bytes, &mut state, limit)?;
    let json = serde_json::to_string_pretty(&report)?;

    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            step_ok(&format!("Wrote analysis to {}", path.display()));
            println!("  {}", kv("rows     ", &report.summary.rows.to_string()));
            println!("  {}", kv("predicted", &report.summary.total.to_string()));
            println!("  {}", kv("survived ", &report.summary.survived.to_string()));
            println!("  {}", kv("deceased ", &report.summary.deceased.to_string()));
            println!("  {}", dim(&format!("{:.2?}", start.elapsed())));
        }
        None => println!("{}", json),
    }

    Ok(())
}

pub async fn cmd_serve(host: &str, port: u16) -> anyhow::Result<()> {
    use crate::server::{run_server, ServerConfig};

    println!();
    println!("  {}", "Survival Insight".white().bold());
    println!("  {}", dim(&format!("v{}", env!("CARGO_PKG_VERSION"))));
    println!("  {}", kv("Web UI ", &format!("http://{}:{}", host, port)));
    println!("  {}", kv("Analyze", &format!("http://{}:{}/analyze", host, port)));
    println!("  {}", kv("Health ", &format!("http://{}:{}/api/health", host, port)));
    println!("  {}", dim("ctrl+c to stop"));
    println!();

    let config = ServerConfig {
        host: host.to_string(),
        port,
        ..Default::default()
    };

    run_server(config).await
}
