use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use properties_panel::config;
use properties_panel::replay::{self, ReplayError, ReplayOptions};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Replay(#[from] ReplayError),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
    #[error("failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "properties", about = "Properties panel view-state tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Feed recorded frames through the panel and print each committed state.
    Replay(ReplayCommand),
}

#[derive(Args, Debug)]
struct ReplayCommand {
    /// Newline-delimited frames; `-` reads stdin.
    input: PathBuf,

    /// Only accept frames of this subscription; defaults to `PROPERTIES_SUBSCRIPTION_ID`.
    #[arg(long)]
    subscription_id: Option<String>,

    /// Print only the last state.
    #[arg(long)]
    final_only: bool,

    /// Fail on the first undecodable line.
    #[arg(long)]
    strict: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Replay(cmd) => run_replay(cmd),
    }
}

fn run_replay(cmd: ReplayCommand) -> Result<(), CliError> {
    // Replay never queues frames, so only the subscription id is read from the environment.
    let subscription_id = cmd.subscription_id.or_else(config::subscription_id_from_env);
    let options = ReplayOptions { subscription_id, strict: cmd.strict };

    let reader: Box<dyn BufRead> = if cmd.input.as_os_str() == "-" {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(&cmd.input).map_err(|source| CliError::Open { path: cmd.input.clone(), source })?;
        Box::new(BufReader::new(file))
    };

    let steps = replay::replay(reader, &options)?;
    tracing::info!(steps = steps.len(), "replay complete");

    let mut out = io::stdout().lock();
    let selected = if cmd.final_only { steps.last().into_iter().collect::<Vec<_>>() } else { steps.iter().collect() };
    for step in selected {
        serde_json::to_writer(&mut out, &step.state)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}
