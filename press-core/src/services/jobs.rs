//! Jobs service
//!
//! Stage changes are full-record replaces through the cache, so they follow
//! the same optimistic path as any other update.

use crate::cache::EntityCache;
use chrono::Utc;
use press_client::RemoteStore;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Job, JobStage, JobType, Quote};
use std::collections::BTreeMap;

/// Number of jobs in [`JobsService::recent`]
pub const RECENT_JOBS_LIMIT: usize = 10;

/// New Draft job carrying a snapshot of the quote
///
/// Later edits to the quote are not tracked.
pub fn job_from_quote(id: impl Into<String>, quote: &Quote, job_type: JobType) -> Job {
    let mut job = Job::new(id, quote.client_id.clone(), Utc::now());
    job.job_type = job_type;
    job.quote_ids = vec![quote.quote_id.clone()];
    job.client_name = quote.client_name.clone();
    job.material = quote.material.clone();
    job.quantity = quote.quantity;
    job.size = quote.size.clone();
    job.finish_type = quote.finish_type.clone();
    job.total_price = quote.total_price();
    job.client_notes = quote.notes.clone();
    job
}

fn job_not_found(id: &str) -> AppError {
    AppError::with_message(ErrorCode::JobNotFound, format!("Job {} not found", id)).with_detail("id", id)
}

#[derive(Debug, Clone)]
pub struct JobsService {
    cache: EntityCache<Job>,
}

impl JobsService {
    pub fn new(store: RemoteStore) -> Self {
        Self {
            cache: EntityCache::new(store, "job"),
        }
    }

    pub fn cache(&self) -> &EntityCache<Job> {
        &self.cache
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.cache.snapshot()
    }

    pub fn get(&self, id: &str) -> Option<Job> {
        self.cache.get(id)
    }

    pub fn by_stage(&self, stage: JobStage) -> Vec<Job> {
        self.cache.filter(|job| job.stage == stage)
    }

    /// Every stage with its jobs, in workflow order; empty stages included
    pub fn grouped_by_stage(&self) -> BTreeMap<JobStage, Vec<Job>> {
        let mut groups: BTreeMap<JobStage, Vec<Job>> =
            JobStage::ALL.iter().map(|stage| (*stage, Vec::new())).collect();
        self.cache.with_items(|jobs| {
            for job in jobs {
                groups.entry(job.stage).or_default().push(job.clone());
            }
        });
        groups
    }

    /// Most recent jobs by job date, newest first
    pub fn recent(&self) -> Vec<Job> {
        let mut jobs = self.cache.snapshot();
        jobs.sort_by(|a, b| b.job_date.cmp(&a.job_date));
        jobs.truncate(RECENT_JOBS_LIMIT);
        jobs
    }

    pub fn for_client(&self, client_id: &str) -> Vec<Job> {
        self.cache.filter(|job| job.client_id == client_id)
    }

    pub fn create(&self, job: Job) -> Job {
        let created = self.cache.create(job);
        tracing::info!(id = %created.id, stage = %created.stage, "Job created");
        created
    }

    /// Convert a quote into a new Draft job
    pub fn create_from_quote(&self, quote: &Quote, job_type: JobType) -> Job {
        let job = job_from_quote(shared::util::new_document_id(), quote, job_type);
        tracing::info!(quote_id = %quote.quote_id, job_id = %job.id, "Converting quote to job");
        self.create(job)
    }

    /// Full-record replace; `false` when the id is unknown
    pub fn update(&self, job: Job) -> bool {
        self.cache.update(job)
    }

    pub fn delete(&self, id: &str) -> bool {
        self.cache.delete(id)
    }

    /// Move a job to the next stage of the cycle (Sent wraps to Draft)
    pub fn advance(&self, id: &str) -> AppResult<Job> {
        let job = self.cache.get(id).ok_or_else(|| job_not_found(id))?;
        let next = job.with_stage(job.stage.next());
        tracing::info!(id = %id, from = %job.stage, to = %next.stage, "Job advanced");
        self.cache.update(next.clone());
        Ok(next)
    }

    /// Put a job into `stage`
    ///
    /// Returns `Ok(false)` without touching the cache when the job already is
    /// in that stage.
    pub fn move_to_stage(&self, id: &str, stage: JobStage) -> AppResult<bool> {
        let job = self.cache.get(id).ok_or_else(|| job_not_found(id))?;
        if job.stage == stage {
            return Ok(false);
        }
        tracing::info!(id = %id, from = %job.stage, to = %stage, "Job stage changed");
        Ok(self.cache.update(job.with_stage(stage)))
    }

    /// Sum of tooling costs over all jobs
    pub fn total_tooling_cost(&self) -> f64 {
        self.cache
            .with_items(|jobs| jobs.iter().map(Job::tooling_cost).sum())
    }

    pub fn display_code(&self, id: &str) -> Option<String> {
        self.cache.get(id).map(|job| job.display_code())
    }

    pub fn last_error(&self) -> Option<AppError> {
        self.cache.last_error()
    }
}
