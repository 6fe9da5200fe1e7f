//! Role domain types and the permission list parser.

use std::fmt::{Display, Formatter};

use rbac_console_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Opaque role identifier assigned by the RBAC service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(String);

impl RoleId {
    /// Wraps a service-assigned identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as sent over the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for RoleId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Role as listed by the RBAC service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    name: String,
    permissions: Vec<String>,
}

impl Role {
    /// Creates a role projection from service data.
    #[must_use]
    pub fn new(id: RoleId, name: impl Into<String>, permissions: Vec<String>) -> Self {
        Self {
            id,
            name: name.into(),
            permissions,
        }
    }

    /// Returns the role identifier.
    #[must_use]
    pub fn id(&self) -> &RoleId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the permissions in service order.
    #[must_use]
    pub fn permissions(&self) -> &[String] {
        self.permissions.as_slice()
    }

    /// Returns the permissions joined the way the console displays them.
    #[must_use]
    pub fn permissions_label(&self) -> String {
        self.permissions.join(", ")
    }
}

/// Reference from a user to its assigned role.
///
/// The service may return the role populated or as a bare id, so the name is
/// optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRef {
    /// Referenced role identifier.
    pub id: RoleId,
    /// Role name, when the service populated it.
    pub name: Option<String>,
}

/// Validated, non-empty list of permission strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct PermissionList(Vec<String>);

impl PermissionList {
    /// Parses comma-delimited operator input.
    ///
    /// Entries are trimmed and blank entries dropped. At least one entry must
    /// remain.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let permissions = raw
            .split(',')
            .map(str::trim)
            .filter(|permission| !permission.is_empty())
            .map(str::to_owned)
            .collect::<Vec<_>>();

        Self::from_entries(permissions)
    }

    /// Validates an already split list.
    pub fn from_entries(permissions: Vec<String>) -> AppResult<Self> {
        if permissions.is_empty() {
            return Err(AppError::Validation(
                "at least one permission is required".to_owned(),
            ));
        }

        if permissions
            .iter()
            .any(|permission| permission.trim().is_empty())
        {
            return Err(AppError::Validation(
                "permissions must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(permissions))
    }

    /// Returns the permissions in input order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        self.0.as_slice()
    }
}

impl TryFrom<Vec<String>> for PermissionList {
    type Error = AppError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_entries(value)
    }
}

impl From<PermissionList> for Vec<String> {
    fn from(value: PermissionList) -> Self {
        value.0
    }
}

/// Validated input for role creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRole {
    /// Role display name.
    pub name: NonEmptyString,
    /// Permissions granted by the role.
    pub permissions: PermissionList,
}
