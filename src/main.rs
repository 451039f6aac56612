//! sipcheck command line interface

use std::fs;
use std::io::{self, Read};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing::{debug, info};

use sipcheck::logging::setup_logging;
use sipcheck::{api, BatchRunner, Config, ValidationResult, Validator};

#[derive(Parser, Debug)]
#[command(author, version, about = "Validate SIP messages and headers against RFC 3261", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, global = true, env = "SIPCHECK_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "SIPCHECK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// How validation results are printed
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Address to listen on
        #[arg(short, long, env = "SIPCHECK_BIND")]
        bind: Option<SocketAddr>,
    },
    /// Validate complete SIP messages read from files ("-" or nothing for stdin)
    Message { files: Vec<PathBuf> },
    /// Validate a single header, e.g. "Call-ID: a84b4c76e66710"
    Header { text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("sipcheck: {:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns whether every validated input was valid
fn run(args: Args) -> Result<bool> {
    let config = load_config(&args)?;
    setup_logging(config.logging_config()?)?;
    debug!(?config, "configuration loaded");

    let validator = Validator::new(config.limits);

    match args.command {
        Command::Serve { .. } => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("cannot start async runtime")?;
            runtime.block_on(api::serve(config.server.bind, Arc::new(validator)))?;
            Ok(true)
        }
        Command::Message { files } => {
            let inputs = read_inputs(&files)?;
            let texts: Vec<&str> = inputs.iter().map(|(_, text)| text.as_str()).collect();

            let runner = BatchRunner::new(config.batch.threads)?;
            info!(inputs = texts.len(), threads = runner.threads(), "validating messages");
            let results = runner.run(&validator, &texts);

            let labelled: Vec<(&str, &ValidationResult)> = inputs
                .iter()
                .map(|(label, _)| label.as_str())
                .zip(results.iter())
                .collect();
            print_results(&labelled, args.output)?;
            Ok(results.iter().all(ValidationResult::is_valid))
        }
        Command::Header { text } => {
            let result = validator.validate_header(&text);
            print_results(&[("header", &result)], args.output)?;
            Ok(result.is_valid())
        }
    }
}

/// Configuration file first, then flags and environment on top
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.json = true;
    }
    if let Command::Serve { bind: Some(bind) } = &args.command {
        config.server.bind = *bind;
    }

    config.validate()?;
    Ok(config)
}

/// (label, text) for every input file, stdin when none is given
fn read_inputs(files: &[PathBuf]) -> Result<Vec<(String, String)>> {
    if files.is_empty() {
        return Ok(vec![("<stdin>".to_string(), read_stdin()?)]);
    }

    let mut inputs = Vec::with_capacity(files.len());
    for path in files {
        if path.as_os_str() == "-" {
            inputs.push(("<stdin>".to_string(), read_stdin()?));
            continue;
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        inputs.push((path.display().to_string(), text));
    }
    Ok(inputs)
}

fn read_stdin() -> Result<String> {
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("cannot read standard input")?;
    Ok(text)
}

fn print_results(results: &[(&str, &ValidationResult)], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let output = if let [(_, result)] = results {
                serde_json::to_string_pretty(result)?
            } else {
                let entries: Vec<_> = results
                    .iter()
                    .map(|(source, result)| json!({ "source": source, "result": result }))
                    .collect();
                serde_json::to_string_pretty(&entries)?
            };
            println!("{}", output);
        }
        OutputFormat::Text => {
            for (source, result) in results {
                if results.len() > 1 {
                    println!("== {} ==", source);
                }
                print_text(result);
            }
        }
    }
    Ok(())
}

fn print_text(result: &ValidationResult) {
    println!("{}", if result.is_valid() { "VALID" } else { "INVALID" });
    for message in result.messages() {
        println!("  {}", message);
    }
    for error in result.errors() {
        println!("  error: {}", error);
    }
    for header in result.headers() {
        match header.rfc_reference() {
            Some(rfc) => println!(
                "  {} ({}): {} <{}>",
                header.canonical_name(),
                header.header_type(),
                rfc.display_text(),
                rfc.url()
            ),
            None => println!(
                "  {} ({}): no RFC reference",
                header.canonical_name(),
                header.header_type()
            ),
        }
    }
}
