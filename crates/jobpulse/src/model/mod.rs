//! Typed search results.
//!
//! A decoded response body is validated once into a [`ResultPage`]; nothing
//! downstream works with untyped JSON. Unknown fields are ignored so upstream
//! additions do not break parsing.

use std::str::FromStr;

use chrono::NaiveDateTime;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::Value;

mod de;
pub use de::parse_timestamp;
pub use error::FormatError;

/// Public site that hosts the job detail pages.
pub const SITE_BASE_URL: &str = "https://bdjobs.com";
/// Value of `statuscode` on a successful response.
pub const SUCCESS_STATUS: &str = "1";
/// Value of `message` on a successful response, compared case-insensitively.
pub const SUCCESS_MESSAGE: &str = "success";

fn default_ad_type() -> String {
    "0".to_string()
}

fn default_language() -> String {
    "1".to_string()
}

fn default_display() -> String {
    "1".to_string()
}

/// One job posting.
///
/// The detail page URL is derived from [`Listing::id`] by [`Listing::url`] and
/// never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Opaque identifier, unique per source and never blank
    #[serde(rename = "Jobid", deserialize_with = "de::job_id")]
    pub id: String,
    #[serde(rename = "AdType", default = "default_ad_type", deserialize_with = "de::text_or_empty")]
    pub ad_type: String,
    #[serde(rename = "jobTitle", deserialize_with = "de::text")]
    pub title: String,
    #[serde(rename = "companyName", deserialize_with = "de::text")]
    pub company: String,
    /// Title in Bengali
    #[serde(rename = "JobTitleBng", default, deserialize_with = "de::text_or_empty")]
    pub localized_title: String,
    /// Deadline formatted for display, e.g. "30 Nov 2025"
    #[serde(default, deserialize_with = "de::text_or_empty")]
    pub deadline: String,
    #[serde(rename = "deadlineDB", default, deserialize_with = "de::timestamp")]
    pub deadline_at: Option<NaiveDateTime>,
    #[serde(rename = "publishDate", default, deserialize_with = "de::timestamp")]
    pub published_at: Option<NaiveDateTime>,
    #[serde(rename = "eduRec", default, deserialize_with = "de::text_or_empty")]
    pub education: String,
    #[serde(default, deserialize_with = "de::text_or_empty")]
    pub experience: String,
    #[serde(default, deserialize_with = "de::integer")]
    pub standout: i64,
    #[serde(default, deserialize_with = "de::text_or_empty")]
    pub logo: String,
    #[serde(rename = "lantype", default, deserialize_with = "de::integer")]
    pub language_type: i64,
    #[serde(default, deserialize_with = "de::text_or_empty")]
    pub location: String,
    #[serde(rename = "JobLang", default = "default_language", deserialize_with = "de::text_or_empty")]
    pub language: String,
    #[serde(rename = "jobContext", default, deserialize_with = "de::optional_text")]
    pub description: Option<String>,
    #[serde(rename = "isEarlyAccess", default, deserialize_with = "de::boolean")]
    pub early_access: bool,
    /// Online/remote job
    #[serde(rename = "OnlineJob", default, deserialize_with = "de::boolean")]
    pub online: bool,
}

impl Listing {
    pub fn url(&self) -> String {
        format!("{SITE_BASE_URL}/jobs/details/{}", self.id)
    }

    pub fn is_remote(&self) -> bool {
        self.online
    }
}

/// Upstream summary counts for the whole query, not just this page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSummary {
    /// Matching records across all pages
    #[serde(default, deserialize_with = "de::count")]
    pub total_records_found: u64,
    #[serde(rename = "showd", default = "default_display", deserialize_with = "de::text_or_empty")]
    pub display: String,
    #[serde(rename = "totalpages", default, deserialize_with = "de::count")]
    pub total_pages: u64,
    #[serde(default, deserialize_with = "de::count")]
    pub total_vacancies: u64,
}

impl Default for SearchSummary {
    fn default() -> Self {
        Self {
            total_records_found: 0,
            display: default_display(),
            total_pages: 0,
            total_vacancies: 0,
        }
    }
}

/// One page of search results.
///
/// Constructed once from a response body and read-only afterwards; a new query
/// produces a new page. Regular and premium listings keep the API's order.
///
/// ```rust
/// use jobpulse::ResultPage;
///
/// let page: ResultPage = r#"{
///     "message": "Success",
///     "statuscode": "1",
///     "data": [{"Jobid": "101", "jobTitle": "Rust Engineer", "companyName": "Acme"}],
///     "common": {"total_records_found": 1, "totalpages": 1}
/// }"#
/// .parse()?;
///
/// assert!(page.is_success());
/// assert_eq!(page.total_returned_count(), 1);
/// # Ok::<(), jobpulse::model::FormatError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPage {
    #[serde(deserialize_with = "de::text")]
    message: String,
    #[serde(rename = "statuscode", deserialize_with = "de::status_code")]
    status_code: String,
    #[serde(rename = "data", default, deserialize_with = "de::listings")]
    regular: Vec<Listing>,
    #[serde(rename = "premiumData", default, deserialize_with = "de::listings")]
    premium: Vec<Listing>,
    #[serde(rename = "common", default, deserialize_with = "de::summary")]
    summary: SearchSummary,
}

impl ResultPage {
    /// Validate a decoded response body.
    pub fn from_value(value: Value) -> Result<Self, FormatError> {
        serde_json::from_value(value).map_err(FormatError::InvalidResponse)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_code(&self) -> &str {
        &self.status_code
    }

    pub fn regular(&self) -> &[Listing] {
        &self.regular
    }

    pub fn premium(&self) -> &[Listing] {
        &self.premium
    }

    pub fn summary(&self) -> &SearchSummary {
        &self.summary
    }

    /// Regular listings followed by premium listings.
    pub fn all_listings(&self) -> impl Iterator<Item = &Listing> + '_ {
        self.regular.iter().chain(self.premium.iter())
    }

    /// Listings on this page. Not to be confused with
    /// [`SearchSummary::total_records_found`], which spans every page.
    pub fn total_returned_count(&self) -> usize {
        self.regular.len() + self.premium.len()
    }

    /// Both the status sentinel and the message must signal success.
    pub fn is_success(&self) -> bool {
        self.status_code == SUCCESS_STATUS && self.message.eq_ignore_ascii_case(SUCCESS_MESSAGE)
    }

    pub fn remote_listings(&self) -> impl Iterator<Item = &Listing> + '_ {
        self.all_listings().filter(|listing| listing.is_remote())
    }

    /// [`all_listings`](Self::all_listings) with repeated identifiers dropped;
    /// the first occurrence wins, so a listing promoted to premium shows once
    /// in its regular position.
    pub fn unique_listings(&self) -> Vec<&Listing> {
        self.all_listings()
            .unique_by(|listing| listing.id.clone())
            .collect()
    }

    /// Whether the upstream reports pages after `current_page` (1-based).
    pub fn has_next_page(&self, current_page: i32) -> bool {
        u64::try_from(current_page).is_ok_and(|page| page < self.summary.total_pages)
    }

    pub fn is_empty(&self) -> bool {
        self.total_returned_count() == 0
    }
}

impl FromStr for ResultPage {
    type Err = FormatError;

    fn from_str(body: &str) -> Result<Self, Self::Err> {
        let value: Value = serde_json::from_str(body).map_err(FormatError::InvalidJson)?;
        Self::from_value(value)
    }
}

mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum FormatError {
        #[error("API returned invalid JSON: {0}")]
        InvalidJson(#[source] serde_json::Error),
        #[error("Invalid API response format: {0}")]
        InvalidResponse(#[source] serde_json::Error),
    }
}
