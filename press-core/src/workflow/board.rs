//! Kanban board over the jobs cache
//!
//! Each column keeps a stable display order of job ids. `sync` reconciles the
//! columns with the jobs snapshot: ids still in a column keep their position,
//! jobs new to a column are appended. Dropping a job on another column changes
//! its stage through [`JobsService`]; dropping within a column only reorders.

use super::stage::{drop_target_for_stage, stage_for_drop_target};
use crate::services::JobsService;
use parking_lot::Mutex;
use shared::models::{Job, JobStage};

/// Result of a drop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// The job changed stage
    Moved { from: JobStage, to: JobStage },
    /// Display order changed, the job kept its stage
    Reordered,
    /// Unknown target or job; nothing changed
    Rejected,
}

#[derive(Debug)]
pub struct JobBoard {
    jobs: JobsService,
    columns: Mutex<[Vec<String>; 4]>,
}

impl JobBoard {
    pub fn new(jobs: JobsService) -> Self {
        let board = Self {
            jobs,
            columns: Mutex::new(Default::default()),
        };
        board.sync();
        board
    }

    /// Reconcile the columns with the current jobs snapshot
    pub fn sync(&self) {
        let snapshot = self.jobs.jobs();
        let mut columns = self.columns.lock();
        for stage in JobStage::ALL {
            let in_stage: Vec<&str> = snapshot
                .iter()
                .filter(|job| job.stage == stage)
                .map(|job| job.id.as_str())
                .collect();
            let column = &mut columns[stage.index()];
            column.retain(|id| in_stage.contains(&id.as_str()));
            for id in in_stage {
                if !column.iter().any(|existing| existing == id) {
                    column.push(id.to_string());
                }
            }
        }
    }

    /// Job ids of a column in display order
    pub fn column_ids(&self, stage: JobStage) -> Vec<String> {
        self.columns.lock()[stage.index()].clone()
    }

    /// Jobs of a column in display order; `None` for an unknown target
    pub fn column(&self, target: &str) -> Option<Vec<Job>> {
        let stage = stage_for_drop_target(target)?;
        Some(
            self.column_ids(stage)
                .iter()
                .filter_map(|id| self.jobs.get(id))
                .collect(),
        )
    }

    /// Number of jobs per column, in workflow order
    pub fn counts(&self) -> [usize; 4] {
        let columns = self.columns.lock();
        [columns[0].len(), columns[1].len(), columns[2].len(), columns[3].len()]
    }

    /// Drop `job_id` onto `target` at `index` (clamped to the column length)
    pub fn handle_drop(&self, job_id: &str, target: &str, index: usize) -> DropOutcome {
        let Some(to) = stage_for_drop_target(target) else {
            tracing::warn!(job_id = %job_id, target = %target, "Drop on unknown target ignored");
            return DropOutcome::Rejected;
        };
        let Some(job) = self.jobs.get(job_id) else {
            tracing::warn!(job_id = %job_id, target = %target, "Drop of unknown job ignored");
            return DropOutcome::Rejected;
        };

        let from = job.stage;
        if from != to && !self.jobs.update(job.with_stage(to)) {
            // Removed by a snapshot since the lookup
            tracing::warn!(job_id = %job_id, target = %target, "Drop of vanished job ignored");
            return DropOutcome::Rejected;
        }

        {
            let mut columns = self.columns.lock();
            for column in columns.iter_mut() {
                column.retain(|id| id != job_id);
            }
            let column = &mut columns[to.index()];
            let index = index.min(column.len());
            column.insert(index, job_id.to_string());
        }

        if from == to {
            tracing::debug!(job_id = %job_id, target = %target, "Job reordered");
            return DropOutcome::Reordered;
        }
        tracing::info!(
            job_id = %job_id,
            from = drop_target_for_stage(from),
            to = target,
            "Job moved on board"
        );
        DropOutcome::Moved { from, to }
    }
}
