//! Statistics
//!
//! Pure reducers over cache snapshots. Averages of an empty collection are 0.

use serde::Serialize;
use shared::models::{Client, Job, JobStage, Quote};
use std::collections::BTreeMap;

fn average(total: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { total / count as f64 }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStats {
    pub total_jobs: usize,
    pub total_value: f64,
    pub avg_job_value: f64,
    pub by_stage: BTreeMap<JobStage, usize>,
}

impl JobStats {
    pub fn count(&self, stage: JobStage) -> usize {
        self.by_stage.get(&stage).copied().unwrap_or(0)
    }

    pub fn drafts(&self) -> usize {
        self.count(JobStage::Draft)
    }

    pub fn approved(&self) -> usize {
        self.count(JobStage::Approved)
    }

    pub fn production(&self) -> usize {
        self.count(JobStage::Production)
    }

    /// Sent jobs
    pub fn completed(&self) -> usize {
        self.count(JobStage::Sent)
    }
}

pub fn job_stats(jobs: &[Job]) -> JobStats {
    let mut by_stage: BTreeMap<JobStage, usize> = JobStage::ALL.iter().map(|s| (*s, 0)).collect();
    for job in jobs {
        *by_stage.entry(job.stage).or_default() += 1;
    }
    let total_value: f64 = jobs.iter().map(|j| j.total_price).sum();
    JobStats {
        total_jobs: jobs.len(),
        total_value,
        avg_job_value: average(total_value, jobs.len()),
        by_stage,
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteStats {
    pub total_quotes: usize,
    pub total_value: f64,
    /// Not yet converted into a job
    pub pending_count: usize,
    pub converted_count: usize,
    pub avg_quote_value: f64,
}

pub fn quote_stats(quotes: &[Quote]) -> QuoteStats {
    let total_value: f64 = quotes.iter().map(Quote::total_price).sum();
    let converted_count = quotes.iter().filter(|q| q.is_exported).count();
    QuoteStats {
        total_quotes: quotes.len(),
        total_value,
        pending_count: quotes.len() - converted_count,
        converted_count,
        avg_quote_value: average(total_value, quotes.len()),
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientStats {
    pub total_clients: usize,
    /// Every client counts as active
    pub active_clients: usize,
    pub tax_exempt_count: usize,
    pub avg_discount_rate: f64,
}

pub fn client_stats(clients: &[Client]) -> ClientStats {
    let discounts: f64 = clients.iter().map(|c| c.default_discount_rate).sum();
    ClientStats {
        total_clients: clients.len(),
        active_clients: clients.len(),
        tax_exempt_count: clients.iter().filter(|c| c.is_tax_exempt).count(),
        avg_discount_rate: average(discounts, clients.len()),
    }
}

/// Dashboard header figures
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(flatten)]
    pub jobs: JobStats,
    pub total_clients: usize,
}

pub fn dashboard_stats(jobs: &[Job], clients: &[Client]) -> DashboardStats {
    DashboardStats {
        jobs: job_stats(jobs),
        total_clients: clients.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn job(id: &str, stage: JobStage, total: f64) -> Job {
        let mut job = Job::new(id, "c1", Utc::now()).with_stage(stage);
        job.total_price = total;
        job
    }

    #[test]
    fn test_empty_collections_average_zero() {
        assert_eq!(job_stats(&[]).avg_job_value, 0.0);
        assert_eq!(quote_stats(&[]).avg_quote_value, 0.0);
        assert_eq!(client_stats(&[]).avg_discount_rate, 0.0);
        assert_eq!(job_stats(&[]).count(JobStage::Sent), 0);
    }

    #[test]
    fn test_job_stats() {
        let jobs = vec![
            job("a", JobStage::Draft, 100.0),
            job("b", JobStage::Draft, 50.0),
            job("c", JobStage::Sent, 150.0),
        ];
        let stats = job_stats(&jobs);
        assert_eq!(stats.total_jobs, 3);
        assert_eq!(stats.total_value, 300.0);
        assert_eq!(stats.avg_job_value, 100.0);
        assert_eq!(stats.drafts(), 2);
        assert_eq!(stats.approved(), 0);
        assert_eq!(stats.production(), 0);
        assert_eq!(stats.completed(), 1);
        // Deterministic
        assert_eq!(job_stats(&jobs), stats);
    }

    #[test]
    fn test_quote_and_client_stats_on_fallback() {
        use press_client::Document;

        let mut quotes = Quote::fallback();
        let stats = quote_stats(&quotes);
        assert_eq!((stats.pending_count, stats.converted_count), (1, 0));
        assert_eq!(stats.avg_quote_value, 321.0);

        quotes[0].is_exported = true;
        assert_eq!(quote_stats(&quotes).converted_count, 1);

        let clients = client_stats(&Client::fallback());
        assert_eq!(clients.total_clients, 2);
        assert_eq!(clients.active_clients, 2);
        assert_eq!(clients.tax_exempt_count, 1);
    }

    #[test]
    fn test_dashboard_flattens_job_stats() {
        let stats = dashboard_stats(&[job("a", JobStage::Production, 10.0)], &[]);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["totalJobs"], 1);
        assert_eq!(json["totalClients"], 0);
        assert_eq!(json["byStage"]["Production"], 1);
    }
}
