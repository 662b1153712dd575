//! JobPulse - BDJobs Search Client
//!
//! JobPulse turns structured search criteria into requests against the BDJobs
//! job search API and hands back validated, typed result pages. Requests share
//! one rate limiter and one connection pool, transient network failures are
//! retried with exponential backoff, and every failure keeps a distinct kind.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use jobpulse::{JobSearcher, JobType, SearchFilters};
//!
//! let searcher = JobSearcher::new()?;
//!
//! let filters = SearchFilters::builder("software engineer")
//!     .location("Dhaka")
//!     .job_type(JobType::FullTime)
//!     .page_size(10)
//!     .build();
//!
//! let page = searcher.search(&filters)?;
//! println!(
//!     "{} of {} matching jobs",
//!     page.total_returned_count(),
//!     page.summary().total_records_found
//! );
//! for listing in page.unique_listings() {
//!     println!("{} - {} ({})", listing.title, listing.company, listing.url());
//! }
//!
//! if let Some(next) = searcher.next_page(&filters, &page)? {
//!     println!("page 2 has {} listings", next.total_returned_count());
//! }
//! # Ok::<(), jobpulse::error::JobPulseError>(())
//! ```
//!
//! # Locations
//!
//! Place names are resolved through the embedded table of Bangladeshi
//! divisions and districts. Unknown names search everywhere rather than fail:
//!
//! ```rust
//! use jobpulse::LocationIndex;
//!
//! let index = LocationIndex::embedded();
//! assert_eq!(index.resolve("dhaka"), Some("14"));
//! assert_eq!(index.resolve("Atlantis"), None);
//! ```
use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

pub mod config;
mod core;
pub mod error;
pub mod model;
pub mod search;
pub mod store;
pub mod transport;

pub use crate::core::JobSearcher;

pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{ErrorKind, JobPulseError, Result};
pub use jobpulse_locations::{Location, LocationIndex};
pub use model::{Listing, ResultPage, SearchSummary};
pub use search::{
    Gender, InvalidInput, JobLevel, JobType, PostedWithin, Range, SearchFilters,
    SearchFiltersBuilder, WorkArrangement, build_search_url,
};
pub use store::{ConfigStore, InMemoryStore, RecordStore};
pub use transport::{Fetch, HttpFetcher, Transport, TransportError};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for the JobPulse library.
///
/// Installs a `tracing` fmt subscriber once per process. `RUST_LOG` takes
/// precedence over `level` when set. Later calls are no-ops.
///
/// ```rust
/// use jobpulse::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), jobpulse::error::JobPulseError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static ()> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?
            .add_directive("hyper_util=warn".parse()?)
            .add_directive("reqwest=warn".parse()?);

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .try_init()
            .map_err(|e| anyhow::anyhow!("{e}"))?;
        Ok(())
    })
}
