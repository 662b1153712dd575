//! The search orchestrator.
//!
//! [`JobSearcher`] ties the pieces together for one query:
//! validate the filters, build the URL, fetch through the shared
//! [`Transport`], and validate the body into a [`ResultPage`].
//!
//! ```rust,no_run
//! use jobpulse::{JobSearcher, SearchFilters};
//!
//! let searcher = JobSearcher::new()?;
//! let filters = SearchFilters::builder("software engineer")
//!     .location("Dhaka")
//!     .page_size(5)
//!     .build();
//!
//! let page = searcher.search(&filters)?;
//! for listing in page.all_listings() {
//!     println!("{} at {}: {}", listing.title, listing.company, listing.url());
//! }
//! # Ok::<(), jobpulse::error::JobPulseError>(())
//! ```

use jobpulse_locations::LocationIndex;
use tracing::{debug, info, instrument, warn};

use crate::{
    config::ClientConfig,
    error::JobPulseError,
    model::ResultPage,
    search::{SearchFilters, build_search_url, validate},
    transport::{Fetch, HttpFetcher, Transport},
};

/// Runs searches against the BDJobs API.
///
/// Cheap to share: wrap it in an `Arc` and call [`search`](Self::search) from
/// as many threads as needed. All of them go through one rate limiter and one
/// connection pool.
#[derive(Debug)]
pub struct JobSearcher<F: Fetch = HttpFetcher> {
    config: ClientConfig,
    transport: Transport<F>,
    locations: &'static LocationIndex,
}

impl JobSearcher<HttpFetcher> {
    /// Create a searcher with the production defaults.
    pub fn new() -> Result<Self, JobPulseError> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a searcher configured from `JOBPULSE_*` environment variables.
    pub fn from_env() -> Result<Self, JobPulseError> {
        Self::with_config(ClientConfig::from_env()?)
    }

    #[instrument(name = "Create JobSearcher", skip_all, fields(api = %config.api_base_url), level = "info")]
    pub fn with_config(config: ClientConfig) -> Result<Self, JobPulseError> {
        let transport = Transport::new(&config)?;
        info!(
            max_retries = config.max_retries,
            min_request_interval = ?config.min_request_interval,
            "JobSearcher ready"
        );
        Ok(Self {
            config,
            transport,
            locations: LocationIndex::embedded(),
        })
    }
}

impl<F: Fetch> JobSearcher<F> {
    /// Create a searcher that performs its HTTP through `fetcher`.
    pub fn with_fetcher(config: ClientConfig, fetcher: F) -> Self {
        let transport = Transport::with_fetcher(fetcher, &config);
        Self {
            config,
            transport,
            locations: LocationIndex::embedded(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &Transport<F> {
        &self.transport
    }

    /// The index used to turn place names into location codes.
    pub fn locations(&self) -> &'static LocationIndex {
        self.locations
    }

    /// Run one search.
    ///
    /// Invalid filters are rejected with every problem listed and without any
    /// network traffic. A well-formed page that reports no success (for
    /// example, zero matches) is still returned as `Ok`.
    #[instrument(
        name = "Job search",
        skip_all,
        fields(keyword = %filters.keyword, location = %filters.location, page = filters.page),
        level = "info"
    )]
    pub fn search(&self, filters: &SearchFilters) -> Result<ResultPage, JobPulseError> {
        let t_search = std::time::Instant::now();

        let problems = validate(filters);
        if !problems.is_empty() {
            debug!(?problems, "Rejected search filters");
            return Err(JobPulseError::Validation(problems));
        }

        let url = build_search_url(&self.config.api_base_url, filters, self.locations);
        debug!(url = %url, "Built search URL");

        let body = self.transport.get(&url)?;
        let page = ResultPage::from_value(body)?;

        if page.is_success() {
            info!(
                returned = page.total_returned_count(),
                total_records = page.summary().total_records_found,
                total_pages = page.summary().total_pages,
                elapsed_ms = t_search.elapsed().as_millis(),
                "Search complete"
            );
        } else {
            warn!(
                status = page.status_code(),
                message = page.message(),
                "Search returned an unsuccessful page"
            );
        }
        Ok(page)
    }

    /// Search by keyword with every other filter at its default.
    pub fn search_keyword(&self, keyword: &str) -> Result<ResultPage, JobPulseError> {
        self.search(&SearchFilters::new(keyword))
    }

    /// Fetch the page after `filters.page`, or `None` when `current` was the
    /// last one.
    pub fn next_page(
        &self,
        filters: &SearchFilters,
        current: &ResultPage,
    ) -> Result<Option<ResultPage>, JobPulseError> {
        if !current.has_next_page(filters.page) {
            debug!(page = filters.page, "No further pages");
            return Ok(None);
        }
        self.search(&filters.with_page(filters.page.saturating_add(1)))
            .map(Some)
    }

    /// Close pooled connections. Later searches reconnect on demand.
    pub fn shutdown(&self) {
        self.transport.shutdown();
    }
}
