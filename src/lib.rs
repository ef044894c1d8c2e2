//! OpenLABEL: an in-memory engine for annotation documents.
//!
//! An OpenLABEL (formerly VCD) document describes what happens in a
//! recording: objects, actions, events, contexts, relations and tags, each
//! either static or present over frame intervals, carrying typed data that
//! may change from frame to frame. [`store::Vcd`] owns such a document and
//! keeps its element records, per-frame index and document extent in sync
//! through every mutation.
//!
//! # Modules
//!
//! - [`model`]: value types and the JSON wire format
//! - [`store`]: the document store and its element lifecycle
//! - [`poly2d`]: the SRF6DCC polygon chain-code codec
//! - [`sanity`]: coherence checks and the schema validator seam
//! - [`stats`]: document statistics
//! - [`error`]: error types

pub mod error;
pub mod model;
pub mod poly2d;
pub mod sanity;
pub mod stats;
pub mod store;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use error::VcdError;
pub use model::{ElementData, ElementType, FrameIntervals, Uid};
pub use store::{ElementArgs, SetMode, StoreOptions, UidMode, Vcd};

/// The openlabel CLI application.
#[derive(Parser)]
#[command(name = "openlabel")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a document for internal inconsistencies.
    Check(CheckArgs),
    /// Show element, frame and data counts of a document.
    Stats(StatsArgs),
    /// Encode or decode SRF6DCC polygon chain codes.
    #[command(subcommand)]
    Poly2d(Poly2dCommands),
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Document to check.
    input: PathBuf,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long, env = "OPENLABEL_STRICT")]
    strict: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, env = "OPENLABEL_OUTPUT", default_value = "text")]
    output: String,
}

#[derive(clap::Args)]
struct StatsArgs {
    /// Document to analyze.
    input: PathBuf,

    /// Number of semantic types to list.
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Output format ('text' or 'json').
    #[arg(long, env = "OPENLABEL_OUTPUT", default_value = "text")]
    output: String,
}

#[derive(Subcommand)]
enum Poly2dCommands {
    /// Encode a polygon given as x y pairs.
    Encode {
        /// Flat coordinate list: x0 y0 x1 y1 ...
        #[arg(required = true, num_args = 2.., allow_negative_numbers = true)]
        points: Vec<i64>,
    },
    /// Decode a chain code back into x y pairs.
    Decode {
        #[arg(allow_negative_numbers = true)]
        xinit: String,
        #[arg(allow_negative_numbers = true)]
        yinit: String,
        rest: String,
        code: String,
    },
}

/// Run the openlabel CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), VcdError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Check(args)) => run_check(args),
        Some(Commands::Stats(args)) => run_stats(args),
        Some(Commands::Poly2d(command)) => run_poly2d(command),
        None => {
            println!("openlabel {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Build, check and inspect OpenLABEL annotation documents.");
            println!();
            println!("Run 'openlabel --help' for usage information.");
            Ok(())
        }
    }
}

fn run_check(args: CheckArgs) -> Result<(), VcdError> {
    let vcd = Vcd::load(&args.input)?;
    let report = sanity::check_document(&vcd);

    match args.output.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "text" => print!("{}", report),
        other => {
            return Err(VcdError::UnsupportedFormat(format!(
                "output '{}' (supported: text, json)",
                other
            )));
        }
    }

    let options = sanity::CheckOptions {
        strict: args.strict,
    };
    if sanity::passes(&report, &options) {
        Ok(())
    } else {
        Err(VcdError::SanityFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    }
}

fn run_stats(args: StatsArgs) -> Result<(), VcdError> {
    let vcd = Vcd::load(&args.input)?;
    let report = stats::stats_document(
        &vcd,
        &stats::StatsOptions {
            top_labels: args.top,
        },
    );

    match args.output.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "text" => print!("{}", report),
        other => {
            return Err(VcdError::UnsupportedFormat(format!(
                "output '{}' (supported: text, json)",
                other
            )));
        }
    }
    Ok(())
}

fn run_poly2d(command: Poly2dCommands) -> Result<(), VcdError> {
    match command {
        Poly2dCommands::Encode { points } => {
            let code = poly2d::encode(&points)?;
            println!("{}", code.to_strings().join(" "));
        }
        Poly2dCommands::Decode {
            xinit,
            yinit,
            rest,
            code,
        } => {
            let code = poly2d::ChainCode::from_strings(&[xinit, yinit, rest, code])?;
            let points = poly2d::decode(&code)?;
            let text: Vec<String> = points.iter().map(i64::to_string).collect();
            println!("{}", text.join(" "));
        }
    }
    Ok(())
}
