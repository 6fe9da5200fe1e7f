use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

#[cfg(test)]
mod tests;

pub fn build_router(app_state: AppState) -> Router {
    let role_routes = Router::new()
        .route(
            "/roles",
            get(handlers::roles::list_roles_handler).post(handlers::roles::create_role_handler),
        )
        .route(
            "/roles/{role_id}/delete",
            post(handlers::roles::request_delete_role_handler),
        )
        .route(
            "/roles/delete/confirm",
            post(handlers::roles::confirm_delete_role_handler),
        )
        .route(
            "/roles/delete/cancel",
            post(handlers::roles::cancel_delete_role_handler),
        )
        .route(
            "/roles/{role_id}/permissions",
            post(handlers::roles::open_permissions_editor_handler),
        )
        .route(
            "/roles/permissions",
            post(handlers::roles::submit_permissions_handler),
        )
        .route(
            "/roles/permissions/cancel",
            post(handlers::roles::close_permissions_editor_handler),
        );

    let user_routes = Router::new()
        .route(
            "/users",
            get(handlers::users::list_users_handler).post(handlers::users::create_user_handler),
        )
        .route(
            "/users/{user_id}/delete",
            post(handlers::users::request_delete_user_handler),
        )
        .route(
            "/users/delete/confirm",
            post(handlers::users::confirm_delete_user_handler),
        )
        .route(
            "/users/delete/cancel",
            post(handlers::users::cancel_delete_user_handler),
        )
        .route(
            "/users/{user_id}/role",
            post(handlers::users::open_role_editor_handler),
        )
        .route("/users/role", post(handlers::users::save_role_handler))
        .route(
            "/users/role/cancel",
            post(handlers::users::close_role_editor_handler),
        )
        .route(
            "/users/{user_id}/status",
            post(handlers::users::change_status_handler),
        );

    Router::new()
        .route("/", get(handlers::landing::landing_handler))
        .route("/health", get(handlers::health::health_handler))
        .merge(role_routes)
        .merge(user_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
