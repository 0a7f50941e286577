//! Trialmaker CLI - Turn CSV stimulus lists into trial records
//!
//! ```bash
//! trialmaker parse stimuli.csv                   # Rows as JSON
//! trialmaker trials stimuli.csv                  # Trials as JSON
//! trialmaker trials stimuli.csv --set block=1    # Extra attribute on every trial
//! trialmaker show stimuli.csv 0                  # Inspect one trial
//! ```
//!
//! Logs go to stderr (`RUST_LOG` controls the level); JSON goes to stdout
//! or to `--output`.

use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use trialmaker::parser::infer::{convert_cell, infer_column};
use trialmaker::{
    make_trial_list_with, read_rows_with, AppError, AppResult, CellValue, ReaderOptions,
};

#[derive(Parser)]
#[command(name = "trialmaker")]
#[command(about = "Turn CSV stimulus lists into per-trial records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a stimulus file and output its rows as JSON
    Parse {
        /// Input CSV file
        input: PathBuf,

        #[command(flatten)]
        reader: ReaderArgs,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build the trial list and output it as JSON
    Trials {
        /// Input CSV file
        input: PathBuf,

        #[command(flatten)]
        reader: ReaderArgs,

        /// Extra attribute assigned to every trial (repeatable)
        #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        extras: Vec<(String, String)>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the variables of a single trial
    Show {
        /// Input CSV file
        input: PathBuf,

        /// Zero-based trial index
        index: usize,

        #[command(flatten)]
        reader: ReaderArgs,
    },
}

/// Options shared by every command that reads a stimulus file.
#[derive(Args)]
struct ReaderArgs {
    /// CSV delimiter (default: ',')
    #[arg(short, long, env = "TRIALMAKER_DELIMITER")]
    delimiter: Option<char>,

    /// Detect the delimiter from the header line
    #[arg(long)]
    auto: bool,

    /// Content encoding, or "auto" to detect it (default: utf-8)
    #[arg(short, long, env = "TRIALMAKER_ENCODING")]
    encoding: Option<String>,

    /// Trim whitespace around headers and values
    #[arg(long)]
    trim: bool,
}

impl From<ReaderArgs> for ReaderOptions {
    fn from(args: ReaderArgs) -> Self {
        ReaderOptions {
            delimiter: args.delimiter,
            auto_detect: args.auto,
            encoding: args.encoding,
            trim: args.trim,
        }
    }
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse {
            input,
            reader,
            output,
        } => cmd_parse(&input, reader.into(), output.as_deref()),

        Commands::Trials {
            input,
            reader,
            extras,
            output,
        } => cmd_trials(&input, reader.into(), &extras, output.as_deref()),

        Commands::Show {
            input,
            index,
            reader,
        } => cmd_show(&input, index, reader.into()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_parse(input: &Path, options: ReaderOptions, output: Option<&Path>) -> AppResult<()> {
    let result = read_rows_with(input, &options)?;
    info!(
        encoding = %result.encoding,
        columns = %result.headers.join(", "),
        rows = result.rows.len(),
        "parsed"
    );

    let json = serde_json::to_string_pretty(&result.rows)?;
    write_output(&json, output)
}

fn cmd_trials(
    input: &Path,
    options: ReaderOptions,
    extras: &[(String, String)],
    output: Option<&Path>,
) -> AppResult<()> {
    let mut result = make_trial_list_with(input, &options)?;

    if !extras.is_empty() {
        for trial in &mut result.trials {
            for (name, raw) in extras {
                trial.set(name.as_str(), typed_value(raw));
            }
        }
        info!(count = extras.len(), "assigned extra attributes to every trial");
    }

    let json = serde_json::to_string_pretty(&result.trials)?;
    write_output(&json, output)
}

fn cmd_show(input: &Path, index: usize, options: ReaderOptions) -> AppResult<()> {
    let result = make_trial_list_with(input, &options)?;
    let trial = result.trial(index)?;

    println!("Trial {} of {}", index, result.trials.len());
    println!("vars_list: {}", trial.vars_list().join(", "));
    for (name, value) in trial.attributes() {
        println!("  {} = {}", name, describe(value));
    }
    Ok(())
}

fn describe(value: &CellValue) -> String {
    match value {
        CellValue::Empty => "(empty)".to_string(),
        CellValue::Text(s) => format!("{:?}", s),
        other => other.to_string(),
    }
}

/// Type a command-line value the same way a one-cell column would be typed.
fn typed_value(raw: &str) -> CellValue {
    convert_cell(raw, infer_column([raw]))
}

fn parse_assignment(s: &str) -> Result<(String, String), AppError> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| AppError::InvalidArgument(format!("expected NAME=VALUE, got '{}'", s)))?;
    Ok((name.to_string(), value.to_string()))
}

fn write_output(content: &str, path: Option<&Path>) -> AppResult<()> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            info!(path = %p.display(), "output written");
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
