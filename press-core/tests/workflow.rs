// press-core/tests/workflow.rs
// Quote to job conversion and stage changes, offline

use press_core::workflow::{DropOutcome, stage_for_drop_target};
use press_core::{AppState, Config, ErrorCode};
use shared::models::{JobStage, JobType, QuoteDraft};

fn state() -> AppState {
    AppState::initialize(&Config::offline())
}

#[tokio::test]
async fn test_four_advances_return_to_draft() {
    let state = state();
    let job = state.jobs.get("j1").unwrap();
    assert_eq!(job.stage, JobStage::Draft);

    for _ in 0..3 {
        state.jobs.advance("j1").unwrap();
    }
    assert_eq!(state.jobs.get("j1").unwrap().stage, JobStage::Sent);
    state.jobs.advance("j1").unwrap();
    assert_eq!(state.jobs.get("j1").unwrap().stage, JobStage::Draft);
    state.shutdown().await;
}

#[tokio::test]
async fn test_drop_approved_job_into_production() {
    let state = state();
    state.jobs.move_to_stage("j1", JobStage::Approved).unwrap();
    state.board.sync();

    let outcome = state.board.handle_drop("j1", "in-production", 0);
    assert_eq!(
        outcome,
        DropOutcome::Moved {
            from: JobStage::Approved,
            to: JobStage::Production
        }
    );
    assert_eq!(state.jobs.get("j1").unwrap().stage, JobStage::Production);
    assert_eq!(state.job_stats().production(), 1);
    state.shutdown().await;
}

#[tokio::test]
async fn test_unknown_drop_target_changes_nothing() {
    let state = state();
    assert_eq!(stage_for_drop_target("backlog"), None);

    let revision = state.jobs.cache().revision();
    let before = state.jobs.jobs();
    assert_eq!(state.board.handle_drop("j1", "backlog", 0), DropOutcome::Rejected);
    assert_eq!(state.jobs.cache().revision(), revision);
    assert_eq!(state.jobs.jobs(), before);
    state.shutdown().await;
}

#[tokio::test]
async fn test_drop_on_current_column_only_reorders() {
    let state = state();
    let revision = state.jobs.cache().revision();
    assert_eq!(state.board.handle_drop("j1", "new-requests", 3), DropOutcome::Reordered);
    assert_eq!(state.jobs.cache().revision(), revision);
}

#[tokio::test]
async fn test_quote_to_job_flow() {
    let state = state();
    let quote = state
        .quotes
        .create(QuoteDraft {
            client_id: "c2".into(),
            client_name: String::new(),
            material: "Kraft Cardstock".into(),
            quantity: 200,
            price_per_unit: 1.25,
            size: "5x7".into(),
            finish_type: "Uncoated".into(),
            notes: "Gala invitations".into(),
            setup_fee: 40.0,
            discount_rate: None,
        })
        .unwrap();
    // Globex: 10% default discount, tax exempt
    assert_eq!(quote.client_name, "Globex Inc");
    assert_eq!(quote.sub_total(), 250.0);
    assert_eq!(quote.total_price(), 265.0);

    let job = state
        .quotes
        .convert_to_job(&quote.quote_id, JobType::Invitations, &state.jobs)
        .unwrap();
    assert_eq!(job.stage, JobStage::Draft);
    assert_eq!(job.total_price, 265.0);
    assert_eq!(job.client_notes, "Gala invitations");
    assert_eq!(job.display_code(), format!("GLO-{}", &job.id[..3]));

    assert!(state.quotes.get(&quote.quote_id).unwrap().is_exported);
    let again = state
        .quotes
        .convert_to_job(&quote.quote_id, JobType::Invitations, &state.jobs)
        .unwrap_err();
    assert_eq!(again.code, ErrorCode::QuoteAlreadyExported);

    // The new job lands at the end of the Draft column
    state.board.sync();
    assert_eq!(state.board.column_ids(JobStage::Draft), ["j1".to_string(), job.id.clone()]);

    let stats = state.quote_stats();
    assert_eq!((stats.total_quotes, stats.converted_count, stats.pending_count), (2, 1, 1));
    state.shutdown().await;
}

#[tokio::test]
async fn test_client_rename_keeps_quote_snapshot() {
    let state = state();
    let mut acme = state.clients.get("c1").unwrap();
    acme.name = "Acme Holdings".into();
    assert!(state.clients.update(acme).unwrap());

    assert_eq!(state.quotes.get("q1").unwrap().client_name, "Acme Corp");
    assert_eq!(state.jobs.get("j1").unwrap().client_name, "Acme Corp");
    state.shutdown().await;
}
