use std::{
    cmp::Reverse,
    collections::BTreeMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use tracing::debug;

use super::{
    Application, ApplicationStatus, ConfigEntry, ConfigStore, JobQuery, MAX_JOB_RESULTS, Profile,
    RecordStore, SavedJob, StoreError, now,
};

#[derive(Debug, Default)]
struct Tables {
    config: BTreeMap<String, ConfigEntry>,
    profiles: BTreeMap<i64, Profile>,
    jobs: BTreeMap<i64, SavedJob>,
    applications: BTreeMap<i64, Application>,
    last_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn check_email_free(&self, email: Option<&str>, owner: i64) -> Result<(), StoreError> {
        let Some(email) = email else {
            return Ok(());
        };
        let taken = self
            .profiles
            .values()
            .any(|p| p.id != owner && p.email.as_deref().is_some_and(|e| e.eq_ignore_ascii_case(email)));
        if taken {
            return Err(StoreError::Conflict(format!(
                "email {email} is already used by another profile"
            )));
        }
        Ok(())
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Process-local store behind a single mutex.
///
/// Suitable for tests and for front ends that do not need persistence across
/// restarts. Identifiers are shared across all record kinds and never reused.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ConfigStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.tables().config.get(key).map(|entry| entry.value.clone()))
    }

    fn set(&self, key: &str, value: &str, description: &str) -> Result<(), StoreError> {
        if key.trim().is_empty() {
            return Err(StoreError::Invalid("config key must not be empty".to_string()));
        }
        let timestamp = now();
        let mut tables = self.tables();
        match tables.config.get_mut(key) {
            Some(entry) => {
                entry.value = value.to_string();
                entry.updated_at = timestamp;
                if !description.is_empty() {
                    entry.description = description.to_string();
                }
            }
            None => {
                tables.config.insert(
                    key.to_string(),
                    ConfigEntry {
                        key: key.to_string(),
                        value: value.to_string(),
                        description: description.to_string(),
                        created_at: timestamp,
                        updated_at: timestamp,
                    },
                );
            }
        }
        debug!(key, "Config value stored");
        Ok(())
    }

    fn all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        Ok(self
            .tables()
            .config
            .values()
            .map(|entry| (entry.key.clone(), entry.value.clone()))
            .collect())
    }
}

impl RecordStore for InMemoryStore {
    fn create_profile(&self, mut profile: Profile) -> Result<i64, StoreError> {
        if profile.name.trim().is_empty() {
            return Err(StoreError::Invalid("profile name must not be empty".to_string()));
        }
        let mut tables = self.tables();
        tables.check_email_free(profile.email.as_deref(), 0)?;

        let id = tables.next_id();
        let timestamp = now();
        profile.id = id;
        profile.is_active = true;
        profile.created_at = Some(timestamp);
        profile.updated_at = Some(timestamp);
        tables.profiles.insert(id, profile);
        debug!(id, "Profile created");
        Ok(id)
    }

    fn profile(&self, id: i64) -> Result<Option<Profile>, StoreError> {
        Ok(self.tables().profiles.get(&id).cloned())
    }

    fn active_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        Ok(self
            .tables()
            .profiles
            .values()
            .filter(|p| p.is_active)
            .cloned()
            .collect())
    }

    fn update_profile(&self, id: i64, profile: Profile) -> Result<bool, StoreError> {
        if profile.name.trim().is_empty() {
            return Err(StoreError::Invalid("profile name must not be empty".to_string()));
        }
        let mut tables = self.tables();
        if !tables.profiles.contains_key(&id) {
            return Ok(false);
        }
        tables.check_email_free(profile.email.as_deref(), id)?;

        let Some(existing) = tables.profiles.get_mut(&id) else {
            return Ok(false);
        };
        *existing = Profile {
            id,
            is_active: existing.is_active,
            created_at: existing.created_at,
            updated_at: Some(now()),
            ..profile
        };
        Ok(true)
    }

    fn delete_profile(&self, id: i64) -> Result<bool, StoreError> {
        let mut tables = self.tables();
        let Some(profile) = tables.profiles.get_mut(&id) else {
            return Ok(false);
        };
        profile.is_active = false;
        profile.updated_at = Some(now());
        debug!(id, "Profile deactivated");
        Ok(true)
    }

    fn save_job(&self, job: SavedJob) -> Result<i64, StoreError> {
        if job.title.trim().is_empty() {
            return Err(StoreError::Invalid("job title must not be empty".to_string()));
        }
        let timestamp = now();
        let mut tables = self.tables();

        let existing = job.external_id.as_deref().and_then(|external| {
            tables
                .jobs
                .values()
                .find(|j| j.external_id.as_deref() == Some(external))
                .map(|j| (j.id, j.created_at))
        });

        let (id, created_at) = match existing {
            Some(found) => found,
            None => (tables.next_id(), Some(timestamp)),
        };
        tables.jobs.insert(
            id,
            SavedJob {
                id,
                created_at,
                updated_at: Some(timestamp),
                ..job
            },
        );
        debug!(id, updated = existing.is_some(), "Job saved");
        Ok(id)
    }

    fn job(&self, id: i64) -> Result<Option<SavedJob>, StoreError> {
        Ok(self.tables().jobs.get(&id).cloned())
    }

    fn find_jobs(&self, query: &JobQuery) -> Result<Vec<SavedJob>, StoreError> {
        let tables = self.tables();
        let mut jobs: Vec<SavedJob> = tables
            .jobs
            .values()
            .filter(|job| job.is_active)
            .filter(|job| {
                query.keyword.as_deref().is_none_or(|keyword| {
                    contains_ignore_case(&job.title, keyword)
                        || job
                            .description
                            .as_deref()
                            .is_some_and(|d| contains_ignore_case(d, keyword))
                })
            })
            .filter(|job| {
                query
                    .location
                    .as_deref()
                    .is_none_or(|location| contains_ignore_case(&job.location, location))
            })
            .filter(|job| {
                query
                    .job_type
                    .as_deref()
                    .is_none_or(|job_type| job.job_type.as_deref() == Some(job_type))
            })
            .cloned()
            .collect();

        // Newest first; undated postings sort last.
        jobs.sort_by_key(|job| (Reverse(job.posted_at.is_some()), Reverse(job.posted_at), job.id));
        jobs.truncate(MAX_JOB_RESULTS);
        Ok(jobs)
    }

    fn create_application(
        &self,
        profile_id: i64,
        job_id: i64,
        status: ApplicationStatus,
        notes: &str,
    ) -> Result<i64, StoreError> {
        let mut tables = self.tables();
        if !tables.profiles.contains_key(&profile_id) {
            return Err(StoreError::NotFound {
                entity: "Profile",
                id: profile_id,
            });
        }
        if !tables.jobs.contains_key(&job_id) {
            return Err(StoreError::NotFound {
                entity: "Job",
                id: job_id,
            });
        }

        let id = tables.next_id();
        let timestamp = now();
        tables.applications.insert(
            id,
            Application {
                id,
                profile_id,
                job_id,
                status,
                applied_at: (status == ApplicationStatus::Applied).then_some(timestamp),
                notes: notes.to_string(),
                created_at: timestamp,
                updated_at: timestamp,
            },
        );
        debug!(id, profile_id, job_id, %status, "Application created");
        Ok(id)
    }

    fn update_application_status(
        &self,
        id: i64,
        status: ApplicationStatus,
        notes: &str,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables();
        let Some(application) = tables.applications.get_mut(&id) else {
            return Ok(false);
        };
        let timestamp = now();
        application.status = status;
        if status == ApplicationStatus::Applied && application.applied_at.is_none() {
            application.applied_at = Some(timestamp);
        }
        if !notes.is_empty() {
            application.notes = notes.to_string();
        }
        application.updated_at = timestamp;
        debug!(id, %status, "Application updated");
        Ok(true)
    }

    fn applications_for(&self, profile_id: i64) -> Result<Vec<Application>, StoreError> {
        let mut applications: Vec<Application> = self
            .tables()
            .applications
            .values()
            .filter(|a| a.profile_id == profile_id)
            .cloned()
            .collect();
        applications.sort_by_key(|a| Reverse((a.created_at, a.id)));
        Ok(applications)
    }
}
