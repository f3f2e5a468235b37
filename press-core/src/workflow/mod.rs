//! Job workflow: drop-target lookup and the Kanban board

pub mod board;
pub mod stage;

pub use board::{DropOutcome, JobBoard};
pub use stage::{DropTarget, drop_target_for_stage, stage_for_drop_target};
