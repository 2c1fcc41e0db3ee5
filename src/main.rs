use anyhow::{Context, Result};
use clap::Parser;
use hotspot_partition::io::{read_graph, write_report, write_report_to_file};
use hotspot_partition::structures::read_structures;
use hotspot_partition::{PartitionEngine, RunConfig, WeightedGraph};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path of the key=value configuration file
    config: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = RunConfig::load(&args.config)
        .with_context(|| format!("could not load configuration from {}", args.config))?;

    log::info!("Reading graph file");
    let graph: WeightedGraph<i64> = read_graph(
        &config.graph_filename,
        config.graph_format,
        &config.graph_delimiter,
    )
    .with_context(|| format!("could not read graph {}", config.graph_filename.display()))?;

    log::info!("Reading structure file");
    let structures = read_structures(&config.structure_filename).with_context(|| {
        format!(
            "could not read structures {}",
            config.structure_filename.display()
        )
    })?;

    let start = Instant::now();
    let outcome = PartitionEngine::new(&graph, config.partitioning.clone())
        .run(&structures)
        .context("partitioning failed")?;
    log::info!("partitioned in {}ms", start.elapsed().as_millis());

    match &config.output_filename {
        Some(path) => write_report_to_file(path, &outcome, graph.len())
            .with_context(|| format!("could not write report to {}", path.display()))?,
        None => write_report(&mut std::io::stdout().lock(), &outcome, graph.len())
            .context("could not write report")?,
    }
    Ok(())
}
