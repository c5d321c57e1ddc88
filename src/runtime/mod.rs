use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::info;

use crate::config::NexusConfig;
use crate::io;
use crate::processors::ProcessorRegistry;
use crate::stream::StreamProcessor;

mod manifest;
pub use manifest::{Manifest, StreamManifest};

pub fn run_pipeline(config: &NexusConfig) -> Result<Manifest> {
    println!("Running pipeline: {}", config.name);

    let registry = ProcessorRegistry::with_defaults();
    let mut manifest = Manifest::new(config.name.clone());

    // Build handlers and read their batches
    let mut processor = StreamProcessor::new();
    let mut batches = Vec::with_capacity(config.streams.len());
    let mut inputs = Vec::with_capacity(config.streams.len());
    for (stream_idx, stream) in config.streams.iter().enumerate() {
        let handler = stream
            .build(&registry)
            .with_context(|| format!("Failed to build stream: {}", stream.id))?;
        println!(
            "\n[Stream {}/{}] {}",
            stream_idx + 1,
            config.streams.len(),
            handler.describe()
        );

        let paths = io::resolve_inputs(&stream.input)?;
        let records = io::read_records(&paths)?;
        println!("  Read {} records from {} files", records.len(), paths.len());
        info!(stream = %stream.id, records = records.len(), "loaded input");

        processor.add_stream(handler);
        batches.push(records);
        inputs.push(
            paths
                .iter()
                .map(|p| p.to_string_lossy().to_string())
                .collect::<Vec<_>>(),
        );
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .context("Invalid progress template")?,
    );
    pb.set_message(format!("Processing {} streams...", processor.len()));
    pb.enable_steady_tick(Duration::from_millis(100));
    let outcomes = processor.process_all(batches);
    pb.finish_with_message("All streams processed");

    for ((outcome, stream), input_files) in outcomes.into_iter().zip(&config.streams).zip(inputs) {
        let mut stream_manifest = StreamManifest {
            id: outcome.stream_id.clone(),
            stream_type: String::new(),
            input_files,
            results_file: None,
            total: 0,
            succeeded: 0,
            failed: 0,
            priority: 0,
            summary: String::new(),
            error: None,
        };

        match outcome.result {
            Ok((results, report)) => {
                println!("\n{}", report);

                if let Some(output) = &config.output {
                    let results_path = output.join(format!("{}.json", stream.id));
                    io::write_json(&results, &results_path)?;
                    println!("  ✓ Results written to: {}", results_path.display());
                    stream_manifest.results_file =
                        Some(results_path.to_string_lossy().to_string());
                }

                stream_manifest.stream_type = report.stream_type;
                stream_manifest.total = report.total;
                stream_manifest.succeeded = report.succeeded;
                stream_manifest.failed = report.failed;
                stream_manifest.priority = report.priority;
                stream_manifest.summary = report.summary;
            }
            Err(e) => {
                println!("\n✗ Stream {} aborted: {}", outcome.stream_id, e);
                stream_manifest.error = Some(e.to_string());
            }
        }

        manifest.add_stream(stream_manifest);
    }

    if let Some(output) = &config.output {
        let manifest_path = output.join("manifest.json");
        manifest.write_to_file(&manifest_path)?;
        println!("\n✓ Manifest written to: {}", manifest_path.display());
    }

    let failed = manifest.failed_streams();
    if failed == 0 {
        println!("\n✓ Pipeline completed successfully!");
    } else {
        println!("\n✗ Pipeline completed with {} aborted streams", failed);
    }
    Ok(manifest)
}
