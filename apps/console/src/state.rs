use rbac_console_application::{RoleWorkflow, UserWorkflow};

/// Shared console state.
#[derive(Clone)]
pub struct AppState {
    pub roles: RoleWorkflow,
    pub users: UserWorkflow,
}
