use axum::http::StatusCode;
use rbac_console_application::WorkflowOutcome;

pub mod health;
pub mod landing;
pub mod roles;
pub mod users;

/// Status for a re-rendered page after a workflow action.
fn page_status(outcome: WorkflowOutcome) -> StatusCode {
    match outcome {
        WorkflowOutcome::Invalid => StatusCode::UNPROCESSABLE_ENTITY,
        WorkflowOutcome::Failed => StatusCode::BAD_GATEWAY,
        WorkflowOutcome::Applied | WorkflowOutcome::Ignored => StatusCode::OK,
    }
}
