//! CLI command implementations

use anyhow::Context;
use clap::{Args, ValueEnum};
use docdeps_core::{
    BuildConfig, BuildManifest, CONFIG_FILE, ClosureBuilder, EdgeAccumulator, EdgeSet,
    RecordStats, SourceOrder,
};
use rayon::prelude::*;
use std::path::Path;
use std::sync::Arc;

/// Command-line settings that take precedence over the configuration file.
#[derive(Args, Debug, Default)]
pub struct Overrides {
    /// Producer threads (0 = available parallelism)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Order in which source documents are flattened
    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    Sorted,
    Reverse,
}

impl From<OrderArg> for SourceOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Sorted => SourceOrder::Sorted,
            OrderArg::Reverse => SourceOrder::Reverse,
        }
    }
}

pub fn build(
    manifest_path: &Path,
    config_path: Option<&Path>,
    output: Option<&Path>,
    overrides: &Overrides,
) -> anyhow::Result<()> {
    let config = load_config(manifest_path, config_path, overrides)?;
    let manifest = BuildManifest::load(manifest_path)?;

    let (edges, _) = record_manifest(&manifest, config.worker_count())?;
    if config.report_cycles {
        report_cycles(&edges);
    }

    let (map, stats) = ClosureBuilder::new(&edges).build_with_stats(config.order);
    tracing::info!(
        "Flattened {} edges into {} dependencies across {} documents",
        stats.input_edges,
        stats.output_edges,
        stats.sources
    );

    let json = if config.pretty {
        serde_json::to_string_pretty(&map)?
    } else {
        serde_json::to_string(&map)?
    };
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Cannot write dependency map to {}", path.display()))?;
            tracing::info!("Dependency map written to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

pub fn stats(
    manifest_path: &Path,
    config_path: Option<&Path>,
    overrides: &Overrides,
) -> anyhow::Result<()> {
    let config = load_config(manifest_path, config_path, overrides)?;
    let manifest = BuildManifest::load(manifest_path)?;

    let (edges, recording) = record_manifest(&manifest, config.worker_count())?;
    let cycles = edges.transitive_cycles();
    let (_, closure) = ClosureBuilder::new(&edges).build_with_stats(config.order);

    tracing::info!(
        "Recorded {} edges ({} duplicates, {} rejected)",
        recording.recorded,
        recording.duplicates,
        recording.rejected()
    );

    let report = serde_json::json!({
        "recording": recording,
        "closure": closure,
        "transitive_cycles": cycles,
    });
    let json = if config.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");

    Ok(())
}

/// Defaults < configuration file < command-line flags.
fn load_config(
    manifest_path: &Path,
    config_path: Option<&Path>,
    overrides: &Overrides,
) -> anyhow::Result<BuildConfig> {
    let mut config = match config_path {
        Some(path) => BuildConfig::load(path)?,
        None => {
            let beside_manifest = manifest_path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(CONFIG_FILE);
            BuildConfig::load_or_default(&beside_manifest)?
        }
    };

    if let Some(workers) = overrides.workers {
        config.workers = workers;
    }
    if let Some(order) = overrides.order {
        config.order = order.into();
    }
    if overrides.pretty {
        config.pretty = true;
    }
    config.validate()?;

    Ok(config)
}

/// Replay the manifest through a shared accumulator, one rayon task per
/// reporting document, then freeze it.
fn record_manifest(
    manifest: &BuildManifest,
    workers: usize,
) -> anyhow::Result<(EdgeSet, RecordStats)> {
    let accumulator = Arc::new(EdgeAccumulator::new(manifest.original_table()));
    let units = manifest.work_units();
    tracing::debug!("Recording {} documents on {} workers", units.len(), workers);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .context("Cannot start producer pool")?;
    pool.install(|| {
        units.par_iter().for_each(|(source, records)| {
            tracing::trace!("Recording {} edges from {}", records.len(), source);
            for record in records {
                record.record_into(&accumulator);
            }
        });
    });

    let stats = accumulator.stats();
    let edges = EdgeAccumulator::try_freeze(accumulator)?;
    Ok((edges, stats))
}

fn report_cycles(edges: &EdgeSet) {
    for cycle in edges.transitive_cycles() {
        let members: Vec<String> = cycle.iter().map(ToString::to_string).collect();
        tracing::warn!("Transitive dependency cycle: {}", members.join(" <-> "));
    }
}
