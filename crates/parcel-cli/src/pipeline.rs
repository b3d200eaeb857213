//! The `dedup` command as a library call: load, resolve, run, write.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use parcel_core::{DedupOptions, DedupPipeline};
use parcel_ingest::{
    MergeReport, SourceCatalog, digest_file, read_batch, write_csv_survivors, write_merge_report,
};
use parcel_model::{DedupResult, RecordBatch, ThresholdConfig};
use parcel_normalize::normalize_record_address;
use tracing::{Level, debug, enabled, info, info_span, trace};

use crate::logging::redact_value;

/// Everything the `dedup` command needs, independent of clap.
#[derive(Debug, Clone, Default)]
pub struct DedupJob {
    pub input: PathBuf,
    pub source: String,
    /// Source catalog file; the built-in catalog is used when absent.
    pub catalog: Option<PathBuf>,
    /// Overrides the catalog threshold for this run.
    pub threshold: Option<i64>,
    pub options: DedupOptions,
    /// Survivors CSV (default: `<input stem>.dedup.csv` next to the input).
    pub output: Option<PathBuf>,
    /// Merge report JSON (default: `<input stem>.merges.json`).
    pub merges: Option<PathBuf>,
    /// Run and report without writing files.
    pub dry_run: bool,
}

/// Where a finished job wrote its files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputPaths {
    pub survivors: Option<PathBuf>,
    pub merges: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct DedupOutcome {
    pub input: PathBuf,
    pub config: ThresholdConfig,
    pub options: DedupOptions,
    pub headers: Vec<String>,
    /// CSV line or JSON index of each input position.
    pub source_rows: Vec<u64>,
    pub result: DedupResult,
    pub outputs: OutputPaths,
    pub duration_ms: u128,
}

impl DedupOutcome {
    /// Where the record at an input position came from in the file.
    pub fn source_row(&self, position: usize) -> Option<u64> {
        self.source_rows.get(position).copied()
    }
}

pub fn load_catalog(path: Option<&Path>) -> Result<SourceCatalog> {
    match path {
        Some(path) => SourceCatalog::load(path)
            .with_context(|| format!("load source catalog {}", path.display())),
        None => SourceCatalog::builtin().context("load built-in source catalog"),
    }
}

/// Look up a source and apply a threshold override, validating it the same
/// way a catalog entry is validated.
pub fn resolve_config(
    catalog: &SourceCatalog,
    source: &str,
    threshold: Option<i64>,
) -> Result<ThresholdConfig> {
    let config = catalog.get(source)?;
    match threshold {
        Some(value) => config
            .with_fuzzy_threshold(value)
            .with_context(|| format!("override threshold for source '{source}'")),
        None => Ok(config.clone()),
    }
}

pub fn default_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "records".to_string());
    input.with_file_name(format!("{stem}.{suffix}"))
}

pub fn run_job(job: &DedupJob) -> Result<DedupOutcome> {
    let span = info_span!("job", source = %job.source, input = %job.input.display());
    let _guard = span.enter();
    let start = Instant::now();

    let catalog = load_catalog(job.catalog.as_deref())?;
    let config = resolve_config(&catalog, &job.source, job.threshold)?;
    let batch = read_batch(&job.input, &job.source)
        .with_context(|| format!("read input {}", job.input.display()))?;
    debug!(
        records = batch.len(),
        columns = batch.headers.len(),
        threshold = config.fuzzy_threshold(),
        "input loaded"
    );

    let RecordBatch {
        headers,
        records,
        source_rows,
        ..
    } = batch;
    let result = DedupPipeline::new(&config)
        .with_options(job.options)
        .run(records);
    if enabled!(Level::TRACE) {
        for entry in &result.survivors {
            let address = normalize_record_address(&entry.record, &config);
            trace!(
                position = entry.position,
                address = redact_value(&address),
                "survivor"
            );
        }
    }

    let outputs = if job.dry_run {
        info!("dry run, no files written");
        OutputPaths::default()
    } else {
        write_outputs(job, &config, &headers, &result)?
    };

    Ok(DedupOutcome {
        input: job.input.clone(),
        config,
        options: job.options,
        headers,
        source_rows,
        result,
        outputs,
        duration_ms: start.elapsed().as_millis(),
    })
}

fn write_outputs(
    job: &DedupJob,
    config: &ThresholdConfig,
    headers: &[String],
    result: &DedupResult,
) -> Result<OutputPaths> {
    let survivors = job
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&job.input, "dedup.csv"));
    let merges = job
        .merges
        .clone()
        .unwrap_or_else(|| default_output_path(&job.input, "merges.json"));

    write_csv_survivors(&survivors, headers, result).context("write survivors")?;
    let digest = digest_file(&job.input).context("fingerprint input")?;
    let report = MergeReport::new(config, result).with_input(digest);
    write_merge_report(&merges, &report).context("write merge report")?;
    info!(
        survivors = %survivors.display(),
        merges = %merges.display(),
        "outputs written"
    );
    Ok(OutputPaths {
        survivors: Some(survivors),
        merges: Some(merges),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/data/feed.csv"), "dedup.csv"),
            PathBuf::from("/data/feed.dedup.csv")
        );
        assert_eq!(
            default_output_path(Path::new("/data/feed.json"), "merges.json"),
            PathBuf::from("/data/feed.merges.json")
        );
    }

    #[test]
    fn test_resolve_config_override_is_validated() {
        let catalog = SourceCatalog::builtin().unwrap();
        let config = resolve_config(&catalog, "aggregator", Some(90)).unwrap();
        assert_eq!(config.fuzzy_threshold(), 90);
        assert!(resolve_config(&catalog, "aggregator", Some(150)).is_err());
        assert!(resolve_config(&catalog, "unknown", None).is_err());
    }
}
