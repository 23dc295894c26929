mod commands;
mod output;

use clap::{Parser, Subcommand};
use commands::PipelineArgs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "bbs",
    version,
    about = "Convert Bar Bending Schedule PDFs into a standard spreadsheet"
)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the schedule table from a PDF and preview it
    Extract {
        /// Path to the BBS PDF
        input_file: PathBuf,

        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the extracted table to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Show what happened to each detected table fragment
        #[arg(long)]
        report: bool,
    },
    /// Print a column mapping template, matched against a PDF's columns if given
    Mapping {
        /// Path to the BBS PDF
        input_file: Option<PathBuf>,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Extract, map columns onto the standard headers and write an .xlsx file
    Convert {
        /// Path to the BBS PDF
        input_file: PathBuf,

        #[command(flatten)]
        pipeline: PipelineArgs,

        /// JSON column mapping (see `bbs mapping`)
        #[arg(short, long, value_name = "FILE", conflicts_with = "auto")]
        mapping: Option<PathBuf>,

        /// Map each standard header to the extracted column with the same name
        #[arg(long)]
        auto: bool,

        /// Output spreadsheet
        #[arg(short = 'O', long = "out", value_name = "FILE", default_value = bbs_core::export::DEFAULT_FILE_NAME)]
        out: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("bbs_core={level},bbs={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Extract {
            input_file,
            pipeline,
            output,
            out,
            report,
        } => commands::extract::run(input_file, &pipeline, &output, out, report),
        Commands::Mapping {
            input_file,
            pipeline,
        } => commands::mapping::run(input_file, &pipeline),
        Commands::Convert {
            input_file,
            pipeline,
            mapping,
            auto,
            out,
        } => commands::convert::run(input_file, &pipeline, mapping, auto, out),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
