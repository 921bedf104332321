//! CMS Feature Extraction
//!
//! Runs band aggregations and plain statistics over CMS records: load
//! records, filter them by time range and id, resolve each record's
//! spectrum and emit one feature row per record and aggregation.

mod aggregation;
mod config;
mod error;
mod extract;
mod filter;
mod record;

pub use aggregation::{
    feature_names, Aggregation, FeatureValue, NamedStatistic, SpectralAggregation, Spectrum,
    SpectrumSource, Statistic,
};
pub use self::config::{AggregationConfig, ExtractionConfig, ENV_PREFIX};
pub use error::ExtractionError;
pub use extract::{
    aggregate_values, extract_cms_features, feature_signal_id, ContextFields, FeatureRow,
};
pub use filter::RecordFilter;
pub use record::{load_records, parse_timestamp, CmsRecord};

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::{info, subscriber::SetGlobalDefaultError, Level};
use tracing_subscriber::FmtSubscriber;

/// Log level for a `-v` count style verbosity
pub fn log_level(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

/// Initialize logging to stderr
pub fn init_logging(verbosity: u8) -> Result<(), SetGlobalDefaultError> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(verbosity))
        .with_target(true)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}

/// Load, filter and aggregate as configured
pub fn run(config: &ExtractionConfig) -> Result<Vec<FeatureRow>, ExtractionError> {
    let aggregations = config.build_aggregations()?;
    config.log_summary(&aggregations);

    let records = load_records(&config.input)?;
    Ok(extract_cms_features(
        &records,
        &aggregations,
        &config.filter,
        &config.context_fields,
    ))
}

/// Write rows as a JSON array to `output`, or to stdout
pub fn write_rows(rows: &[FeatureRow], output: Option<&Path>) -> Result<(), ExtractionError> {
    let io_error = |path: &Path| {
        let path = path.to_path_buf();
        move |source| ExtractionError::Io { path, source }
    };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(io_error(parent))?;
            }
            info!("Writing {} rows to {}", rows.len(), path.display());
            let file = fs::File::create(path).map_err(io_error(path))?;
            let mut writer = io::BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, rows)?;
            writer.flush().map_err(io_error(path))?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, rows)?;
            writeln!(writer).map_err(io_error(Path::new("<stdout>")))?;
        }
    }
    Ok(())
}
