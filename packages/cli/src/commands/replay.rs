use super::open_layout;
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::debug;
use wireframe_editor::{Command, EditSession};

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Script: JSON array of steps
    pub script: String,

    /// Layout document (defaults to the configured layout)
    #[arg(short, long)]
    pub layout: Option<String>,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    pub out: Option<String>,
}

/// One script step: `"undo"`, `"redo"` or `{"command": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Step {
    History(HistoryStep),
    Command { command: Command },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryStep {
    Undo,
    Redo,
}

/// What happened to each step
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub applied: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub fn replay(args: ReplayArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let layout_path = config.layout_path(cwd, args.layout.as_deref());
    let script_path = PathBuf::from(cwd).join(&args.script);

    let mut session = open_layout(&layout_path, &config.session)?;
    let script = fs::read_to_string(&script_path)
        .with_context(|| format!("Cannot read script {}", script_path.display()))?;
    let steps: Vec<Step> = serde_json::from_str(&script)
        .with_context(|| format!("Invalid script {}", script_path.display()))?;

    eprintln!(
        "{}",
        format!("▶️  Replaying {} steps...", steps.len()).bright_blue().bold()
    );
    let summary = run_steps(&mut session, &steps);
    let output = session.export_json()?;

    match &args.out {
        Some(out) => {
            let out_path = PathBuf::from(cwd).join(out);
            fs::write(&out_path, output)?;
            eprintln!("  {} Wrote {}", "✓".green(), out_path.display());
        }
        None => println!("{}", output),
    }

    eprintln!(
        "{} applied, {} skipped, {} failed",
        summary.applied.to_string().green(),
        summary.skipped.to_string().yellow(),
        summary.failed.to_string().red()
    );
    Ok(())
}

/// Apply every step, reporting validation failures and moving on
pub fn run_steps(session: &mut EditSession, steps: &[Step]) -> ReplaySummary {
    let mut summary = ReplaySummary::default();

    for (index, step) in steps.iter().enumerate() {
        let changed = match step {
            Step::History(HistoryStep::Undo) => Ok(session.undo()),
            Step::History(HistoryStep::Redo) => Ok(session.redo()),
            Step::Command { command } => session.apply(command.clone()),
        };
        debug!(step = index + 1, ?changed, "Replayed step");
        match changed {
            Ok(true) => summary.applied += 1,
            Ok(false) => summary.skipped += 1,
            Err(e) => {
                summary.failed += 1;
                eprintln!("  {} step {} - {}", "✗".red(), index + 1, e);
            }
        }
    }

    summary
}
