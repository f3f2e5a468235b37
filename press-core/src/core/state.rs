//! Application state
//!
//! Every cache is constructed here, once, and handed out as a cheap clone.
//!
//! | Field | Type | Description |
//! |-------|------|-------------|
//! | config | Config | Process configuration |
//! | auth | AuthSession | Current user |
//! | store | RemoteStore | Remote store adapter, mode fixed at startup |
//! | clients | ClientsService | Clients cache |
//! | quotes | QuotesService | Quotes cache, priced against the clients cache |
//! | jobs | JobsService | Jobs cache |
//! | board | Arc<JobBoard> | Kanban columns over the jobs cache |

use super::Config;
use crate::services::{ClientsService, JobsService, QuotesService};
use crate::stats::{self, ClientStats, DashboardStats, JobStats, QuoteStats};
use crate::workflow::JobBoard;
use press_client::{AuthSession, RemoteStore};
use shared::pricing::PricingEngine;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Config,
    pub auth: AuthSession,
    pub store: RemoteStore,
    pub clients: ClientsService,
    pub quotes: QuotesService,
    pub jobs: JobsService,
    pub board: Arc<JobBoard>,
}

impl AppState {
    /// Build the auth session and store from `config`, then the caches
    ///
    /// Must run inside a tokio runtime for the live channels to start;
    /// outside one the caches hold the fallback dataset.
    pub fn initialize(config: &Config) -> Self {
        let auth = AuthSession::new(config.admin_emails.clone());
        if let Some(uid) = config.user_id.as_deref() {
            let user = auth.sign_in(uid, config.user_name.as_deref(), config.user_email.as_deref());
            tracing::info!(user = %user.name, role = %user.role, "Signed in");
        }
        let store = RemoteStore::connect(&config.store, &auth);
        Self::with_store(config, auth, store)
    }

    /// Build the caches over an already constructed store
    pub fn with_store(config: &Config, auth: AuthSession, store: RemoteStore) -> Self {
        let clients = ClientsService::new(store.clone());
        let quotes = QuotesService::new(
            store.clone(),
            clients.cache().clone(),
            PricingEngine::new(config.tax_rate),
        );
        let jobs = JobsService::new(store.clone());
        let board = Arc::new(JobBoard::new(jobs.clone()));

        tracing::info!(
            active = store.is_active(),
            clients = clients.cache().len(),
            quotes = quotes.cache().len(),
            jobs = jobs.cache().len(),
            "Application state initialized"
        );

        Self {
            config: config.clone(),
            auth,
            store,
            clients,
            quotes,
            jobs,
            board,
        }
    }

    pub fn dashboard(&self) -> DashboardStats {
        stats::dashboard_stats(&self.jobs.jobs(), &self.clients.clients())
    }

    pub fn job_stats(&self) -> JobStats {
        self.jobs.cache().with_items(stats::job_stats)
    }

    pub fn quote_stats(&self) -> QuoteStats {
        self.quotes.cache().with_items(stats::quote_stats)
    }

    pub fn client_stats(&self) -> ClientStats {
        self.clients.cache().with_items(stats::client_stats)
    }

    /// Stop live updates and wait for every pending remote write
    pub async fn shutdown(&self) {
        tokio::join!(
            self.clients.cache().shutdown(),
            self.quotes.cache().shutdown(),
            self.jobs.cache().shutdown(),
        );
        tracing::info!("Application state shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_offline_state_serves_fallback() {
        let state = AppState::initialize(&Config::offline());
        assert!(!state.store.is_active());
        assert!(!state.auth.is_authenticated());

        let dashboard = state.dashboard();
        assert_eq!(dashboard.total_clients, 2);
        assert_eq!(dashboard.jobs.total_jobs, 1);
        assert_eq!(dashboard.jobs.total_value, 321.0);
        assert_eq!(state.board.column_ids(shared::models::JobStage::Draft), ["j1"]);
        state.shutdown().await;
    }

    #[tokio::test]
    async fn test_configured_identity_signs_in() {
        let mut config = Config::offline();
        config.admin_emails = vec!["owner@shop.test".into()];
        config.user_id = Some("u1".into());
        config.user_email = Some("owner@shop.test".into());

        let state = AppState::initialize(&config);
        assert!(state.auth.is_authenticated());
        assert!(state.auth.role().is_admin());
        // Still unconfigured, so still offline
        assert!(!state.store.is_active());
    }
}
