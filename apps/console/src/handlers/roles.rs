use axum::Form;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Html;
use rbac_console_application::RoleForm;
use rbac_console_core::AppError;
use rbac_console_domain::RoleId;

use crate::dto::{ConfirmRoleDeleteRequest, PermissionsRequest, RoleFormRequest};
use crate::error::ConsoleResult;
use crate::render;
use crate::state::AppState;

use super::page_status;

pub async fn list_roles_handler(State(state): State<AppState>) -> Html<String> {
    state.roles.load().await;
    render_roles(&state).await
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Form(payload): Form<RoleFormRequest>,
) -> (StatusCode, Html<String>) {
    let outcome = state
        .roles
        .add_role(RoleForm {
            name: payload.name,
            permissions: payload.permissions,
        })
        .await;

    (page_status(outcome), render_roles(&state).await)
}

pub async fn request_delete_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> ConsoleResult<Html<String>> {
    let role_id = known_role(&state, role_id).await?;
    state.roles.request_delete(role_id).await;
    Ok(render_roles(&state).await)
}

pub async fn confirm_delete_role_handler(
    State(state): State<AppState>,
    Form(payload): Form<ConfirmRoleDeleteRequest>,
) -> (StatusCode, Html<String>) {
    let outcome = state
        .roles
        .confirm_delete(&RoleId::new(payload.role_id))
        .await;
    (page_status(outcome), render_roles(&state).await)
}

pub async fn cancel_delete_role_handler(State(state): State<AppState>) -> Html<String> {
    state.roles.cancel_delete().await;
    render_roles(&state).await
}

pub async fn open_permissions_editor_handler(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> ConsoleResult<Html<String>> {
    let role_id = known_role(&state, role_id).await?;
    state.roles.open_permissions_editor(role_id).await;
    Ok(render_roles(&state).await)
}

pub async fn submit_permissions_handler(
    State(state): State<AppState>,
    Form(payload): Form<PermissionsRequest>,
) -> (StatusCode, Html<String>) {
    let outcome = state
        .roles
        .submit_permissions(&RoleId::new(payload.role_id), payload.permissions)
        .await;
    (page_status(outcome), render_roles(&state).await)
}

pub async fn close_permissions_editor_handler(State(state): State<AppState>) -> Html<String> {
    state.roles.close_permissions_editor().await;
    render_roles(&state).await
}

async fn known_role(state: &AppState, role_id: String) -> Result<RoleId, AppError> {
    let role_id = RoleId::new(role_id);
    if !state.roles.snapshot().await.roles().is_loaded() {
        state.roles.load().await;
    }
    if state.roles.snapshot().await.roles().get(&role_id).is_none() {
        return Err(AppError::NotFound(format!("role '{role_id}' is not listed")));
    }

    Ok(role_id)
}

async fn render_roles(state: &AppState) -> Html<String> {
    Html(render::role_page(&state.roles.snapshot().await))
}
