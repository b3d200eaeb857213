use anyhow::Result;
use parcel_cli::pipeline::{DedupJob, DedupOutcome, load_catalog, run_job};
use parcel_core::{ClusterMode, DedupOptions, PartitionMode};

use crate::cli::{DedupArgs, SourcesArgs};
use crate::summary::print_sources;

pub fn run_dedup(args: &DedupArgs) -> Result<DedupOutcome> {
    let options = DedupOptions {
        cluster_mode: if args.transitive {
            ClusterMode::Transitive
        } else {
            ClusterMode::FirstMatch
        },
        partition_mode: if args.partition_by_zip {
            PartitionMode::Zip
        } else {
            PartitionMode::Whole
        },
    };
    let job = DedupJob {
        input: args.input.clone(),
        source: args.source.clone(),
        catalog: args.config.clone(),
        threshold: args.threshold,
        options,
        output: args.output.clone(),
        merges: args.merges.clone(),
        dry_run: args.dry_run,
    };
    run_job(&job)
}

pub fn run_sources(args: &SourcesArgs) -> Result<()> {
    let catalog = load_catalog(args.config.as_deref())?;
    print_sources(&catalog);
    Ok(())
}
