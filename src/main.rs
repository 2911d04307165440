use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use partial_persistence::{PartialPersistence, PersistenceConfig, Value, DEFAULT_MAX_DELTAS};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "persist", about = "Replay updates against a partially persistent document")]
struct Cli {
    /// Log rebalances and cascades (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a script and print the document at every version.
    Replay {
        /// Script: `wrap <literal>` followed by `set <path> <index> <literal>` lines.
        script: PathBuf,
        /// Delta log length that triggers a rebalance.
        #[arg(long, default_value_t = DEFAULT_MAX_DELTAS)]
        max_deltas: usize,
        /// Print only this version.
        #[arg(long)]
        at: Option<u64>,
    },
    /// Run a script and dump the internal record linkage.
    Inspect {
        /// Script to replay.
        script: PathBuf,
        /// Delta log length that triggers a rebalance.
        #[arg(long, default_value_t = DEFAULT_MAX_DELTAS)]
        max_deltas: usize,
    },
}

/// One parsed script line.
#[derive(Debug)]
enum Step {
    Wrap(Value<i64>),
    Set {
        path: Vec<usize>,
        index: usize,
        value: Value<i64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Replay {
            script,
            max_deltas,
            at,
        } => run_replay(script, max_deltas, at)?,
        Commands::Inspect { script, max_deltas } => run_inspect(script, max_deltas)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_replay(script: PathBuf, max_deltas: usize, at: Option<u64>) -> Result<()> {
    let persistence = replay(&script, max_deltas)?;

    let versions = match at {
        Some(version) => version..=version,
        None => 0..=persistence.now(),
    };
    for version in versions {
        let document = persistence
            .unwrap(version)
            .with_context(|| format!("cannot read version {}", version))?;
        println!("v{}\t{}", version, document);
    }

    println!();
    println!("{}", persistence.stats().report());
    Ok(())
}

fn run_inspect(script: PathBuf, max_deltas: usize) -> Result<()> {
    let persistence = replay(&script, max_deltas)?;
    print!("{}", persistence.inspect());
    Ok(())
}

fn replay(path: &PathBuf, max_deltas: usize) -> Result<PartialPersistence<i64>> {
    let config = PersistenceConfig::with_max_deltas(max_deltas)?;
    let reader = BufReader::new(
        File::open(path).with_context(|| format!("failed to open script {}", path.display()))?,
    );

    let mut persistence: Option<PartialPersistence<i64>> = None;
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let step = match parse_step(&line)
            .with_context(|| format!("invalid script line {}", line_no + 1))?
        {
            Some(step) => step,
            None => continue,
        };

        match step {
            Step::Wrap(document) => {
                if persistence.is_some() {
                    bail!("line {}: document already wrapped", line_no + 1);
                }
                persistence = Some(PartialPersistence::wrap_with_config(document, config));
            }
            Step::Set { path, index, value } => {
                let document = persistence
                    .as_mut()
                    .ok_or_else(|| anyhow!("line {}: `set` before `wrap`", line_no + 1))?;
                document
                    .set(&path, index, value)
                    .with_context(|| format!("update on line {} failed", line_no + 1))?;
            }
        }
    }

    persistence.ok_or_else(|| anyhow!("script {} never wraps a document", path.display()))
}

/// Parse one line; blank lines and `#` comments yield `None`.
fn parse_step(line: &str) -> Result<Option<Step>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (keyword, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    match keyword {
        "wrap" => Ok(Some(Step::Wrap(rest.parse()?))),
        "set" => {
            // The path literal is flat, so it ends at the first ']'.
            let close = rest
                .find(']')
                .ok_or_else(|| anyhow!("expected a path literal such as [0, 2]"))?;
            let path = rest[..=close]
                .parse::<Value<usize>>()?
                .into_flat_list()
                .ok_or_else(|| anyhow!("path must be a flat list of indices"))?;

            let rest = rest[close + 1..].trim_start();
            let (index, literal) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| anyhow!("expected `<index> <value>` after the path"))?;
            let index = index
                .parse::<usize>()
                .with_context(|| format!("invalid index '{}'", index))?;

            Ok(Some(Step::Set {
                path,
                index,
                value: literal.trim().parse()?,
            }))
        }
        other => bail!("unknown command '{}'", other),
    }
}
