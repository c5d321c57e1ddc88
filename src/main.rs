use clap::{Parser, Subcommand};
use std::path::PathBuf;

use code_nexus::config::NexusConfig;
use code_nexus::samples::{self, Dataset};
use code_nexus::{runtime, StreamProcessor};

#[derive(Parser)]
#[command(name = "nexus")]
#[command(about = "Code Nexus - polymorphic stream processing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a stream over built-in sample records
    Demo {
        /// Dataset to process
        #[arg(short, long, value_enum, default_value_t = Dataset::Numeric)]
        dataset: Dataset,
        /// Print results as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Run every stream type through one manager
    Mixed,
    /// Run the streams described by a YAML configuration
    Run {
        /// Path to config YAML file
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration
    Validate {
        /// Path to config YAML file
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Demo { dataset, json } => {
            let (mut handler, records) = dataset.load()?;
            println!("Initializing {}...", handler.describe());
            let results = handler.run(records)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                for (idx, result) in results.iter().enumerate() {
                    println!("Result {}: {}", idx + 1, result);
                }
                println!("\n{}", handler.report(&results));
            }
        }
        Commands::Mixed => {
            let mut processor = StreamProcessor::new();
            let mut batches = Vec::new();
            for (handler, batch) in samples::mixed()? {
                println!("Initializing {}", handler.describe());
                processor.add_stream(handler);
                batches.push(batch);
            }

            println!("\nProcessing mixed stream types through unified interface...");
            for outcome in processor.process_all(batches) {
                match outcome.result {
                    Ok((_, report)) => println!("- {} ({} high-priority)", report.summary, report.priority),
                    Err(e) => println!("- {}: processing error: {}", outcome.stream_id, e),
                }
            }
        }
        Commands::Run { config } => {
            let config = NexusConfig::from_yaml_file(&config)?;
            let manifest = runtime::run_pipeline(&config)?;
            if manifest.failed_streams() > 0 {
                anyhow::bail!("{} streams aborted", manifest.failed_streams());
            }
        }
        Commands::Validate { config } => {
            let _config = NexusConfig::from_yaml_file(&config)?;
            println!("✓ Configuration is valid");
        }
        Commands::Version => {
            println!("nexus version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
