//! Drop-target lookup
//!
//! Board columns are addressed by a target id. The table is a pure lookup,
//! independent of whatever produced the drop event.

use shared::models::JobStage;

/// Board column id
pub type DropTarget = &'static str;

pub const NEW_REQUESTS: DropTarget = "new-requests";
pub const READY_TO_START: DropTarget = "ready-to-start";
pub const IN_PRODUCTION: DropTarget = "in-production";
pub const COMPLETED: DropTarget = "completed";

/// Columns in workflow order
pub const DROP_TARGETS: [DropTarget; 4] = [NEW_REQUESTS, READY_TO_START, IN_PRODUCTION, COMPLETED];

pub fn stage_for_drop_target(target: &str) -> Option<JobStage> {
    match target {
        NEW_REQUESTS => Some(JobStage::Draft),
        READY_TO_START => Some(JobStage::Approved),
        IN_PRODUCTION => Some(JobStage::Production),
        COMPLETED => Some(JobStage::Sent),
        _ => None,
    }
}

pub const fn drop_target_for_stage(stage: JobStage) -> DropTarget {
    match stage {
        JobStage::Draft => NEW_REQUESTS,
        JobStage::Approved => READY_TO_START,
        JobStage::Production => IN_PRODUCTION,
        JobStage::Sent => COMPLETED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_bijective() {
        for stage in JobStage::ALL {
            assert_eq!(stage_for_drop_target(drop_target_for_stage(stage)), Some(stage));
        }
        for (target, stage) in DROP_TARGETS.iter().zip(JobStage::ALL) {
            assert_eq!(drop_target_for_stage(stage), *target);
        }
    }

    #[test]
    fn test_unknown_targets() {
        assert_eq!(stage_for_drop_target("archive"), None);
        assert_eq!(stage_for_drop_target(""), None);
        assert_eq!(stage_for_drop_target("Completed"), None);
    }
}
