use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process;

use shapecheck_core::normalizer::semantic_hash;
use shapecheck_core::render::{segments, Segment};
use shapecheck_core::{parse, Error, Value};

/// Shapecheck: structural contracts for runtime values
///
/// Parse contracts, check JSON values against them, and print diagnostics
/// that mark exactly which part of a value broke the contract.
#[derive(Parser)]
#[command(name = "shapecheck", version, about, long_about = None)]
struct Cli {
    /// Print nothing on success
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Disable coloured highlights (also honoured via NO_COLOR)
    #[arg(long, global = true)]
    no_color: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a contract and print its parse tree
    Parse {
        /// Contract text, e.g. "(str,) -> str"
        #[arg(allow_hyphen_values = true)]
        contract: String,
    },

    /// Check JSON values against a contract
    Check {
        /// Contract text
        #[arg(allow_hyphen_values = true)]
        contract: String,
        /// JSON array holding the argument tuple
        #[arg(long)]
        input: String,
        /// JSON value to check against the output side
        #[arg(long)]
        output: Option<String>,
    },

    /// Compute the SHA-256 identity of a contract
    Hash {
        /// Contract text
        #[arg(allow_hyphen_values = true)]
        contract: String,
    },

    /// Show version information
    Version,
}

// Exit codes
const EXIT_OK: i32 = 0;
const EXIT_MISMATCH: i32 = 1;
const EXIT_SETUP: i32 = 2;
const EXIT_INTERNAL: i32 = 3;

fn main() {
    let cli = Cli::parse();
    init_tracing();

    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    let exit_code = match cli.command {
        Commands::Parse { ref contract } => cmd_parse(&cli, contract),
        Commands::Check {
            ref contract,
            ref input,
            ref output,
        } => cmd_check(&cli, contract, input, output.as_deref()),
        Commands::Hash { ref contract } => cmd_hash(&cli, contract),
        Commands::Version => {
            println!(
                "shapecheck {} (shapecheck-core {})",
                env!("CARGO_PKG_VERSION"),
                shapecheck_core::VERSION
            );
            EXIT_OK
        }
    };

    process::exit(exit_code);
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ── Commands ──────────────────────────────────────────────

fn cmd_parse(cli: &Cli, contract: &str) -> i32 {
    let schema = match parse(contract) {
        Ok(schema) => schema,
        Err(e) => return report_error(cli, &e),
    };

    if cli.json {
        match serde_json::to_string_pretty(&schema) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("{} {}", "error:".red().bold(), e);
                return EXIT_INTERNAL;
            }
        }
    } else if !cli.quiet {
        println!("{}", schema.text());
        print!("{}", schema.tree());
    }
    EXIT_OK
}

fn cmd_check(cli: &Cli, contract: &str, input: &str, output: Option<&str>) -> i32 {
    let schema = match parse(contract) {
        Ok(schema) => schema,
        Err(e) => return report_error(cli, &e),
    };

    let args = match decode_arguments(input) {
        Ok(args) => args,
        Err(e) => return report_error(cli, &e),
    };
    if let Err(e) = schema.check_input(&args) {
        return report_error(cli, &e);
    }

    if let Some(output) = output {
        let result = match decode_json(output) {
            Ok(value) => value,
            Err(e) => return report_error(cli, &e),
        };
        if let Err(e) = schema.check_output(&result) {
            return report_error(cli, &e);
        }
    }

    if cli.json {
        println!(
            "{}",
            serde_json::json!({ "ok": true, "contract": schema.text() })
        );
    } else if !cli.quiet {
        println!("{}", "ok".green());
    }
    EXIT_OK
}

fn cmd_hash(cli: &Cli, contract: &str) -> i32 {
    let schema = match parse(contract) {
        Ok(schema) => schema,
        Err(e) => return report_error(cli, &e),
    };
    let hash = semantic_hash(&schema);

    if cli.json {
        println!(
            "{}",
            serde_json::json!({ "contract": schema.text(), "hash": hash })
        );
    } else {
        println!("{}", hash);
    }
    EXIT_OK
}

// ── Helpers ───────────────────────────────────────────────

fn decode_json(text: &str) -> Result<Value, Error> {
    let json: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| Error::InvalidValue(format!("malformed JSON: {}", e)))?;
    Value::from_json(&json)
}

/// The argument list is written as a plain JSON array
fn decode_arguments(text: &str) -> Result<Value, Error> {
    match decode_json(text)? {
        Value::List(items) | Value::Tuple(items) => Ok(Value::Tuple(items)),
        other => Err(Error::InvalidValue(format!(
            "--input must be a JSON array of arguments, got {}",
            other.type_name()
        ))),
    }
}

fn exit_code_for(error: &Error) -> i32 {
    match error {
        e if e.is_mismatch() => EXIT_MISMATCH,
        Error::InvariantViolation(_) => EXIT_INTERNAL,
        _ => EXIT_SETUP,
    }
}

fn error_kind(error: &Error) -> &'static str {
    match error {
        Error::Unparseable { .. } => "unparseable",
        Error::Ambiguous { .. } => "ambiguous",
        Error::InputMismatch { .. } => "input_mismatch",
        Error::OutputMismatch { .. } => "output_mismatch",
        Error::InvalidContract { .. } => "invalid_contract",
        Error::InvariantViolation(_) => "invariant_violation",
        Error::InvalidValue(_) => "invalid_value",
    }
}

fn report_error(cli: &Cli, error: &Error) -> i32 {
    let code = exit_code_for(error);
    let message = error.to_string();
    tracing::debug!(kind = error_kind(error), code, "command failed");

    if cli.json {
        println!(
            "{}",
            serde_json::json!({
                "ok": false,
                "error": error_kind(error),
                "message": message,
            })
        );
    } else if error.is_mismatch() {
        eprintln!("{} {}", "mismatch:".red().bold(), colorize(&message));
    } else {
        eprintln!("{} {}", "error:".red().bold(), message);
    }
    code
}

/// Style each highlight layer; markers stay in the text
fn colorize(message: &str) -> String {
    segments(message)
        .into_iter()
        .map(|Segment { depth, text }| match depth {
            0 => text.normal().to_string(),
            1 => text.red().bold().to_string(),
            _ => text.yellow().bold().to_string(),
        })
        .collect()
}
