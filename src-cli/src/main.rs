//! Pawartos Lelayu - command line driver
//!
//! Renders announcement records to PDF, stores submitted records and dumps
//! the laid-out surface for inspection.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lelayu", version)]
#[command(about = "Pawartos Lelayu announcement exporter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a record and write the PDF
    Export {
        /// Record JSON file
        record: PathBuf,
        /// Output directory (defaults to the configured one)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Settings file
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Preview scale in effect when the export starts
        #[arg(long)]
        preview_scale: Option<f64>,
        /// Font file to render with
        #[arg(long)]
        font: Option<PathBuf>,
    },
    /// Validate and store a record
    Submit {
        /// Record JSON file
        record: PathBuf,
        /// Directory holding stored records
        #[arg(long)]
        store: PathBuf,
    },
    /// Print the laid-out lines of a record
    Preview {
        /// Record JSON file
        record: PathBuf,
        /// Font file to measure with
        #[arg(long)]
        font: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so stdout stays clean for results
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Commands::Export {
            record,
            out,
            settings,
            preview_scale,
            font,
        } => {
            let args = commands::ExportArgs {
                record,
                out,
                settings,
                preview_scale,
                font,
            };
            commands::export(args)
                .await
                .map(|path| println!("{}", path.display()))
        }
        Commands::Submit { record, store } => commands::submit(&record, &store).and_then(|stored| {
            println!("{}", serde_json::to_string_pretty(&stored)?);
            Ok(())
        }),
        Commands::Preview { record, font } => commands::preview(&record, font.as_deref()).map(|lines| {
            for line in lines {
                println!("{}", line);
            }
        }),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
