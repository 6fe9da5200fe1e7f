//! RBAC console composition root.

#![forbid(unsafe_code)]

mod console_config;
mod console_router;
mod dto;
mod error;
mod handlers;
mod render;
mod state;

use std::sync::Arc;

use rbac_console_application::{RbacApi, RoleWorkflow, UserWorkflow};
use rbac_console_core::AppError;
use rbac_console_infrastructure::{HttpRbacApi, InMemoryRbacApi};
use tracing::info;

use crate::console_config::{ConsoleConfig, RbacBackendConfig, init_tracing};
use crate::console_router::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ConsoleConfig::load()?;

    let rbac_api: Arc<dyn RbacApi> = match &config.backend {
        RbacBackendConfig::Http(base_url) => {
            info!(environment = %config.environment, base_url = %base_url, "using rbac service");
            Arc::new(HttpRbacApi::new(reqwest::Client::new(), base_url))
        }
        RbacBackendConfig::Memory => {
            info!(environment = %config.environment, "using in-memory rbac service");
            Arc::new(InMemoryRbacApi::new())
        }
    };

    let app_state = AppState {
        roles: RoleWorkflow::new(rbac_api.clone()),
        users: UserWorkflow::new(rbac_api),
    };
    let app = build_router(app_state);

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "rbac-console listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("console server error: {error}")))
}
