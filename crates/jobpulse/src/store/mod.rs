//! Persistence collaborators.
//!
//! The search core never touches storage itself. Front ends that keep
//! settings, profiles, bookmarked jobs or application history do so through
//! [`ConfigStore`] and [`RecordStore`]; [`InMemoryStore`] implements both.

use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::model::Listing;

mod memory;

pub use error::StoreError;
pub use memory::InMemoryStore;

/// Value written to [`SavedJob::source`] for listings from this API.
pub const BDJOBS_SOURCE: &str = "bdjobs";
/// Most rows [`RecordStore::find_jobs`] returns.
pub const MAX_JOB_RESULTS: usize = 100;

pub(crate) fn now() -> NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

/// One application setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub description: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A job seeker and their standing preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Assigned by the store; ignored on create
    pub id: i64,
    pub name: String,
    /// Unique across profiles when set
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub preferred_job_type: Option<String>,
    pub preferred_job_level: Option<String>,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
    pub keywords: Vec<String>,
    pub is_active: bool,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl Profile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            email: None,
            phone: None,
            location: None,
            preferred_job_type: None,
            preferred_job_level: None,
            min_salary: None,
            max_salary: None,
            keywords: Vec::new(),
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }
}

/// A job kept locally, usually a bookmarked [`Listing`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedJob {
    /// Assigned by the store; ignored on save
    pub id: i64,
    /// Identifier at the source; saving twice with the same value updates
    pub external_id: Option<String>,
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: Option<String>,
    pub job_level: Option<String>,
    pub salary_range: Option<String>,
    pub experience_required: String,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub posted_at: Option<NaiveDateTime>,
    pub deadline_at: Option<NaiveDateTime>,
    pub url: String,
    pub source: String,
    pub is_active: bool,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl SavedJob {
    pub fn from_listing(listing: &Listing) -> Self {
        Self {
            id: 0,
            external_id: Some(listing.id.clone()),
            title: listing.title.clone(),
            company: listing.company.clone(),
            location: listing.location.clone(),
            job_type: None,
            job_level: None,
            salary_range: None,
            experience_required: listing.experience.clone(),
            description: listing.description.clone(),
            requirements: (!listing.education.is_empty()).then(|| listing.education.clone()),
            posted_at: listing.published_at,
            deadline_at: listing.deadline_at,
            url: listing.url(),
            source: BDJOBS_SOURCE.to_string(),
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Interested,
    Applied,
    Interview,
    Rejected,
    Accepted,
}

impl ApplicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Interested => "interested",
            Self::Applied => "applied",
            Self::Interview => "interview",
            Self::Rejected => "rejected",
            Self::Accepted => "accepted",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interested" => Ok(Self::Interested),
            "applied" => Ok(Self::Applied),
            "interview" => Ok(Self::Interview),
            "rejected" => Ok(Self::Rejected),
            "accepted" => Ok(Self::Accepted),
            other => Err(StoreError::Invalid(format!(
                "unknown application status {other:?}"
            ))),
        }
    }
}

/// A profile's interest in, or application to, a saved job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    pub profile_id: i64,
    pub job_id: i64,
    pub status: ApplicationStatus,
    /// Set the first time the status moves to `Applied`
    pub applied_at: Option<NaiveDateTime>,
    pub notes: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Filter for [`RecordStore::find_jobs`]. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobQuery {
    /// Case-insensitive substring of the title or description
    pub keyword: Option<String>,
    /// Case-insensitive substring of the location
    pub location: Option<String>,
    /// Exact job type
    pub job_type: Option<String>,
}

/// Key-value application settings.
pub trait ConfigStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn get_or(&self, key: &str, default: &str) -> Result<String, StoreError> {
        Ok(self.get(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// Insert or overwrite `key`. An empty `description` keeps the existing one.
    fn set(&self, key: &str, value: &str, description: &str) -> Result<(), StoreError>;

    fn all(&self) -> Result<BTreeMap<String, String>, StoreError>;
}

/// Profiles, saved jobs and applications, keyed by store-assigned integers.
///
/// Update and delete methods return `Ok(false)` when the row does not exist.
pub trait RecordStore: Send + Sync {
    fn create_profile(&self, profile: Profile) -> Result<i64, StoreError>;
    fn profile(&self, id: i64) -> Result<Option<Profile>, StoreError>;
    /// Profiles that have not been deleted, in creation order.
    fn active_profiles(&self) -> Result<Vec<Profile>, StoreError>;
    /// Replace the editable fields of profile `id`.
    fn update_profile(&self, id: i64, profile: Profile) -> Result<bool, StoreError>;
    /// Soft delete: the profile stays readable by id but is no longer active.
    fn delete_profile(&self, id: i64) -> Result<bool, StoreError>;

    /// Insert `job`, or update the row with the same `external_id`.
    fn save_job(&self, job: SavedJob) -> Result<i64, StoreError>;
    fn job(&self, id: i64) -> Result<Option<SavedJob>, StoreError>;
    /// Active jobs matching `query`, newest posting first, at most
    /// [`MAX_JOB_RESULTS`].
    fn find_jobs(&self, query: &JobQuery) -> Result<Vec<SavedJob>, StoreError>;

    fn create_application(
        &self,
        profile_id: i64,
        job_id: i64,
        status: ApplicationStatus,
        notes: &str,
    ) -> Result<i64, StoreError>;
    /// Change the status; `notes` only replaces the existing notes when non-empty.
    fn update_application_status(
        &self,
        id: i64,
        status: ApplicationStatus,
        notes: &str,
    ) -> Result<bool, StoreError>;
    /// Applications of one profile, newest first.
    fn applications_for(&self, profile_id: i64) -> Result<Vec<Application>, StoreError>;
}

mod error {
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        #[error("{entity} {id} not found")]
        NotFound { entity: &'static str, id: i64 },
        #[error("Conflict: {0}")]
        Conflict(String),
        #[error("Invalid record: {0}")]
        Invalid(String),
    }
}
