//! Application execution logic.
//!
//! One pass: fetch adapters, build the report, render it, write it.
//! Nothing reaches the sink unless every earlier step succeeded.

use thiserror::Error;

use netconfig::config::ValidatedConfig;
use netconfig::discovery::{
    AddressEntry, DiscoveryReport, ReportBuilder, ReportError, ReportObserver, ResolutionPath,
};
use netconfig::host::resolve_hostname;
use netconfig::network::filter::FilteredFetcher;
use netconfig::network::platform::PlatformFetcher;
use netconfig::network::{AdapterFetcher, FetchError, RawAdapter, SnapshotFetcher};
use netconfig::output::{OutputError, Sink, render, write_document};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to enumerate adapters.
    #[error("Failed to enumerate adapters: {0}")]
    Fetch(#[source] FetchError),

    /// An adapter carried a malformed address record.
    #[error("Failed to build report: {0}")]
    Report(#[source] ReportError),

    /// Failed to render or write the document.
    #[error("Failed to emit report: {0}")]
    Output(#[source] OutputError),
}

/// Runtime options extracted from validated config.
///
/// This struct holds only the fields needed after the fetcher is built,
/// allowing the config's `filter` field to be moved separately.
struct RuntimeOptions {
    host: String,
    pretty: bool,
    sink: Sink,
}

impl From<&ValidatedConfig> for RuntimeOptions {
    fn from(config: &ValidatedConfig) -> Self {
        Self {
            host: config.host.clone().unwrap_or_else(resolve_hostname),
            pretty: config.pretty,
            sink: Sink::from_path(config.output.as_deref()),
        }
    }
}

/// Forwards report-building events to `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl ReportObserver for TracingObserver {
    fn adapter_skipped(&self, adapter: &RawAdapter) {
        tracing::debug!(
            "Skipping adapter '{}' (state {})",
            adapter.friendly_name,
            adapter.oper_state
        );
    }

    fn adapter_included(&self, adapter: &RawAdapter, address_count: usize) {
        tracing::debug!(
            "Adapter '{}' included with {address_count} address(es)",
            adapter.friendly_name
        );
    }

    fn address_resolved(&self, adapter: &RawAdapter, entry: &AddressEntry, path: ResolutionPath) {
        match path {
            ResolutionPath::Computed => {
                tracing::trace!("{}: {}", adapter.friendly_name, entry.key());
            }
            ResolutionPath::NoMask => {
                tracing::debug!(
                    "{}: no mask for {}, using fallback prefix",
                    adapter.friendly_name,
                    entry.key()
                );
            }
            ResolutionPath::NonComputable(mismatch) => {
                tracing::warn!(
                    "{}: mask of {} not usable ({mismatch}), using fallback prefix",
                    adapter.friendly_name,
                    entry.key()
                );
            }
            ResolutionPath::NotFound => {
                tracing::warn!(
                    "{}: {} not among adapter records",
                    adapter.friendly_name,
                    entry.key()
                );
            }
        }
    }

    fn duplicate_adapter(&self, friendly_name: &str) {
        tracing::warn!("Duplicate adapter name '{friendly_name}', keeping the last one");
    }
}

/// Runs one discovery pass.
///
/// # Errors
///
/// Returns an error if enumeration fails, any address record is malformed,
/// or the document cannot be written.
#[cfg(not(tarpaulin_include))]
pub fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let options = RuntimeOptions::from(&config);

    let source: Box<dyn AdapterFetcher> = match config.snapshot {
        Some(path) => {
            tracing::info!("Reading adapters from snapshot {}", path.display());
            Box::new(SnapshotFetcher::new(path))
        }
        None => Box::new(PlatformFetcher::default()),
    };
    let fetcher = FilteredFetcher::new(source, config.filter);

    let document = generate(&fetcher, &options.host, options.pretty)?;
    write_document(&options.sink, &document).map_err(RunError::Output)?;

    if let Sink::File(path) = &options.sink {
        tracing::info!("Report written to {}", path.display());
    }
    Ok(())
}

/// Fetches, builds and renders the document without writing it.
fn generate<F: AdapterFetcher>(fetcher: &F, host: &str, pretty: bool) -> Result<String, RunError> {
    let report = build_report(fetcher, host)?;
    render(&report, pretty).map_err(RunError::Output)
}

fn build_report<F: AdapterFetcher>(fetcher: &F, host: &str) -> Result<DiscoveryReport, RunError> {
    let adapters = fetcher.fetch().map_err(RunError::Fetch)?;
    tracing::debug!("Fetched {} adapter(s)", adapters.len());

    let observer = TracingObserver;
    let report = ReportBuilder::new(host)
        .with_observer(&observer)
        .build(&adapters)
        .map_err(RunError::Report)?;

    tracing::info!(
        "Discovered {} active adapter(s) on host '{}'",
        report.data.len(),
        report.host
    );
    Ok(report)
}

