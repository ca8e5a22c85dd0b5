use std::process::ExitCode;

use cart_eligibility::{Context, Evaluator};
use clap::Parser;
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Check whether a record satisfies a criteria document.
///
/// Prints `true` or `false`. Exits 0 when eligible, 1 when not and 2 when
/// the input cannot be evaluated.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Record JSON, or `@path` to read it from a file
    record: String,
    /// Criteria JSON, or `@path` to read it from a file
    criteria: String,
    /// Maximum nesting of and/or combinators (unbounded when omitted)
    #[arg(long)]
    max_depth: Option<usize>,
    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

const ELIGIBLE: u8 = 0;
const NOT_ELIGIBLE: u8 = 1;
const FAILURE: u8 = 2;

fn init_logger(verbose: bool) {
    let default = if verbose { "cart_eligibility=debug,elig=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn load_json(label: &str, arg: &str) -> Result<Value, String> {
    let text = match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {label} file {path}: {e}"))?,
        None => arg.to_string(),
    };
    serde_json::from_str(&text).map_err(|e| format!("invalid {label} JSON: {e}"))
}

fn exit_status(outcome: &cart_eligibility::Result<bool>) -> u8 {
    match outcome {
        Ok(true) => ELIGIBLE,
        Ok(false) => NOT_ELIGIBLE,
        Err(_) => FAILURE,
    }
}

fn main() -> ExitCode {
    // Parse CLI arguments.
    let args = Args::parse();
    init_logger(args.verbose);

    let inputs = load_json("record", &args.record)
        .and_then(|record| load_json("criteria", &args.criteria).map(|criteria| (record, criteria)));
    let (record, criteria) = match inputs {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(FAILURE);
        }
    };

    let ctx = Context { max_depth: args.max_depth };
    let outcome = Evaluator::new(ctx).is_eligible(&record, &criteria);
    match &outcome {
        Ok(eligible) => {
            tracing::debug!(eligible, "evaluation finished");
            println!("{eligible}");
        }
        Err(e) => {
            tracing::error!(error = %e, "evaluation failed");
            eprintln!("error: {e}");
        }
    }
    ExitCode::from(exit_status(&outcome))
}
