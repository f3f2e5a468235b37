//! Job Model
//!
//! A production job, usually converted from a quote. Pricing and production
//! fields are a snapshot taken at conversion time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Stage
// ============================================================================

/// Job lifecycle stage, in workflow order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum JobStage {
    #[default]
    Draft,
    Approved,
    Production,
    Sent,
}

impl JobStage {
    /// All stages in workflow order
    pub const ALL: [JobStage; 4] = [
        JobStage::Draft,
        JobStage::Approved,
        JobStage::Production,
        JobStage::Sent,
    ];

    /// Position in [`JobStage::ALL`]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The stage reached by the manual "advance" action (Sent wraps to Draft)
    pub const fn next(self) -> JobStage {
        match self {
            JobStage::Draft => JobStage::Approved,
            JobStage::Approved => JobStage::Production,
            JobStage::Production => JobStage::Sent,
            JobStage::Sent => JobStage::Draft,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            JobStage::Draft => "Draft",
            JobStage::Approved => "Approved",
            JobStage::Production => "Production",
            JobStage::Sent => "Sent",
        }
    }
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Kind of print job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "Business Cards")]
    BusinessCards,
    Posters,
    Brochures,
    Menus,
    Invitations,
    #[default]
    Other,
}

/// Kind of tooling a job needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolingType {
    Die,
    Plate,
    Custom,
    #[default]
    Other,
}

// ============================================================================
// Production details
// ============================================================================

/// Paper stock line
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub paper_type: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish: Option<String>,
}

/// Component of a job, e.g. "Envelope" or "RSVP" in an invitation suite
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubJob {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    #[serde(default)]
    pub stock: Vec<Stock>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooling {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub tooling_type: ToolingType,
    #[serde(default)]
    pub cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Print step such as "Letterpress" or "Foil Stamp"; `order` fixes its position
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintProcess {
    pub id: String,
    pub name: String,
    pub order: u32,
    /// Minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// ============================================================================
// Job
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub job_date: DateTime<Utc>,
    #[serde(default)]
    pub stage: JobStage,
    #[serde(default)]
    pub job_type: JobType,

    // References
    pub client_id: String,
    #[serde(default)]
    pub quote_ids: Vec<String>,

    // Snapshot copied from the quote
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub finish_type: String,
    #[serde(default)]
    pub total_price: f64,

    // Production details
    #[serde(default)]
    pub stock: Vec<Stock>,
    #[serde(default)]
    pub sub_jobs: Vec<SubJob>,
    #[serde(default)]
    pub tooling: Vec<Tooling>,
    #[serde(default)]
    pub print_processes: Vec<PrintProcess>,

    #[serde(default)]
    pub production_notes: String,
    #[serde(default)]
    pub client_notes: String,

    // Deadlines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_deadline: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_deadline: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_deadline: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Empty Draft job for a client
    pub fn new(id: impl Into<String>, client_id: impl Into<String>, job_date: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            job_date,
            stage: JobStage::Draft,
            job_type: JobType::Other,
            client_id: client_id.into(),
            quote_ids: Vec::new(),
            client_name: String::new(),
            material: String::new(),
            quantity: 0,
            size: String::new(),
            finish_type: String::new(),
            total_price: 0.0,
            stock: Vec::new(),
            sub_jobs: Vec::new(),
            tooling: Vec::new(),
            print_processes: Vec::new(),
            production_notes: String::new(),
            client_notes: String::new(),
            quote_deadline: None,
            production_deadline: None,
            delivery_deadline: None,
            created_at: None,
        }
    }

    /// Same job in another stage (full record, ready for a replace-update)
    pub fn with_stage(&self, stage: JobStage) -> Job {
        Job {
            stage,
            ..self.clone()
        }
    }

    /// Print processes sorted by their explicit `order`
    pub fn ordered_processes(&self) -> Vec<&PrintProcess> {
        let mut processes: Vec<&PrintProcess> = self.print_processes.iter().collect();
        processes.sort_by_key(|p| p.order);
        processes
    }

    /// Sum of tooling costs
    pub fn tooling_cost(&self) -> f64 {
        self.tooling.iter().map(|t| t.cost).sum()
    }

    /// Short display code: first three letters of the client name, upper-cased,
    /// followed by the first three characters of the id (e.g. `ACM-1a2`)
    pub fn display_code(&self) -> String {
        let prefix: String = self.client_name.chars().take(3).collect::<String>().to_uppercase();
        let suffix: String = self.id.chars().take(3).collect();
        format!("{}-{}", prefix, suffix)
    }
}
