use press_core::workflow::stage::DROP_TARGETS;
use press_core::{AppState, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. .env, configuration, logging
    let config = setup_environment()?;
    tracing::info!(environment = %config.environment, "Press core starting...");

    // 2. Auth session, store, caches
    let state = AppState::initialize(&config);
    log_dashboard(&state);

    // 3. Follow job changes until Ctrl-C
    let mut revisions = state.jobs.cache().watch();
    loop {
        tokio::select! {
            changed = revisions.changed() => {
                if changed.is_err() {
                    break;
                }
                state.board.sync();
                log_dashboard(&state);
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    tracing::error!("Failed to listen for shutdown signal: {}", e);
                }
                break;
            }
        }
    }

    // 4. Flush pending writes
    tracing::info!("Shutting down...");
    state.shutdown().await;
    Ok(())
}

fn log_dashboard(state: &AppState) {
    let dashboard = state.dashboard();
    let quotes = state.quote_stats();
    tracing::info!(
        jobs = dashboard.jobs.total_jobs,
        value = dashboard.jobs.total_value,
        avg = dashboard.jobs.avg_job_value,
        drafts = dashboard.jobs.drafts(),
        approved = dashboard.jobs.approved(),
        production = dashboard.jobs.production(),
        completed = dashboard.jobs.completed(),
        clients = dashboard.total_clients,
        pending_quotes = quotes.pending_count,
        "Dashboard"
    );
    for (column, jobs) in DROP_TARGETS.iter().zip(state.board.counts()) {
        tracing::debug!(column = *column, jobs, "Board column");
    }
    if let Some(err) = state.jobs.last_error() {
        tracing::warn!(code = %err.code, "{}", err.message);
    }
}
