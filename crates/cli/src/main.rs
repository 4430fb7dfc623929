use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use palletrack_ai::HeuristicAdvisor;
use palletrack_cli::{AppConfig, ScriptRunner};
use palletrack_inventory::BatchMode;

#[derive(Parser)]
#[command(name = "palletrack")]
#[command(about = "Run a JSON-lines warehouse script against an in-memory store")]
#[command(version)]
struct Cli {
    /// Script file (reads stdin when omitted)
    script: Option<PathBuf>,

    /// Batch mode for `pick` steps (overrides PALLETRACK_BATCH_MODE)
    #[arg(long)]
    batch_mode: Option<BatchMode>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    palletrack_observability::init(&config.log);
    config.report_rejected();
    if let Some(mode) = cli.batch_mode {
        config.batch_mode = mode;
    }

    let mut runner = ScriptRunner::new(config, Box::new(HeuristicAdvisor::new()));
    let stdout = io::stdout().lock();

    let summary = match &cli.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            runner.run(BufReader::new(file), stdout).await?
        }
        None => runner.run(io::stdin().lock(), stdout).await?,
    };

    if summary.failed > 0 {
        tracing::warn!(failed = summary.failed, steps = summary.steps, "some steps failed");
    }
    Ok(())
}
