use std::str::FromStr;

use axum::Form;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Html;
use rbac_console_application::UserForm;
use rbac_console_core::AppError;
use rbac_console_domain::{RoleId, UserId, UserStatus};

use crate::dto::{
    ConfirmUserDeleteRequest, RoleSelectionRequest, StatusRequest, UserFormRequest,
};
use crate::error::ConsoleResult;
use crate::render;
use crate::state::AppState;

use super::page_status;

pub async fn list_users_handler(State(state): State<AppState>) -> Html<String> {
    state.users.load().await;
    render_users(&state).await
}

pub async fn create_user_handler(
    State(state): State<AppState>,
    Form(payload): Form<UserFormRequest>,
) -> (StatusCode, Html<String>) {
    let outcome = state
        .users
        .add_user(UserForm {
            name: payload.name,
            email: payload.email,
            role: payload.role,
        })
        .await;

    (page_status(outcome), render_users(&state).await)
}

pub async fn request_delete_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ConsoleResult<Html<String>> {
    let user_id = known_user(&state, user_id).await?;
    state.users.request_delete(user_id).await;
    Ok(render_users(&state).await)
}

pub async fn confirm_delete_user_handler(
    State(state): State<AppState>,
    Form(payload): Form<ConfirmUserDeleteRequest>,
) -> (StatusCode, Html<String>) {
    let outcome = state
        .users
        .confirm_delete(&UserId::new(payload.user_id))
        .await;
    (page_status(outcome), render_users(&state).await)
}

pub async fn cancel_delete_user_handler(State(state): State<AppState>) -> Html<String> {
    state.users.cancel_delete().await;
    render_users(&state).await
}

pub async fn open_role_editor_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ConsoleResult<Html<String>> {
    let user_id = known_user(&state, user_id).await?;
    state.users.open_role_editor(user_id).await;
    Ok(render_users(&state).await)
}

pub async fn save_role_handler(
    State(state): State<AppState>,
    Form(payload): Form<RoleSelectionRequest>,
) -> (StatusCode, Html<String>) {
    let selection = payload.role.trim();
    let role_id = (!selection.is_empty()).then(|| RoleId::new(selection));
    let outcome = state
        .users
        .save_role(&UserId::new(payload.user_id), role_id)
        .await;

    (page_status(outcome), render_users(&state).await)
}

pub async fn close_role_editor_handler(State(state): State<AppState>) -> Html<String> {
    state.users.close_role_editor().await;
    render_users(&state).await
}

pub async fn change_status_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Form(payload): Form<StatusRequest>,
) -> ConsoleResult<(StatusCode, Html<String>)> {
    let status = UserStatus::from_str(payload.status.as_str())?;
    let outcome = state
        .users
        .change_status(UserId::new(user_id), status)
        .await;

    Ok((page_status(outcome), render_users(&state).await))
}

async fn known_user(state: &AppState, user_id: String) -> Result<UserId, AppError> {
    let user_id = UserId::new(user_id);
    if !state.users.snapshot().await.users().is_loaded() {
        state.users.load().await;
    }
    if state.users.snapshot().await.users().get(&user_id).is_none() {
        return Err(AppError::NotFound(format!("user '{user_id}' is not listed")));
    }

    Ok(user_id)
}

async fn render_users(state: &AppState) -> Html<String> {
    Html(render::user_page(&state.users.snapshot().await))
}
