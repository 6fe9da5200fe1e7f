use serde::{Deserialize, Serialize};

/// Health response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Submitted add-role form.
#[derive(Debug, Deserialize)]
pub struct RoleFormRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub permissions: String,
}

/// Submitted role delete confirmation.
#[derive(Debug, Deserialize)]
pub struct ConfirmRoleDeleteRequest {
    pub role_id: String,
}

/// Submitted permissions editor.
#[derive(Debug, Deserialize)]
pub struct PermissionsRequest {
    pub role_id: String,
    #[serde(default)]
    pub permissions: String,
}

/// Submitted add-user form.
#[derive(Debug, Deserialize)]
pub struct UserFormRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
}

/// Submitted user delete confirmation.
#[derive(Debug, Deserialize)]
pub struct ConfirmUserDeleteRequest {
    pub user_id: String,
}

/// Submitted role editor selection.
#[derive(Debug, Deserialize)]
pub struct RoleSelectionRequest {
    pub user_id: String,
    #[serde(default)]
    pub role: String,
}

/// Submitted status selection.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}
