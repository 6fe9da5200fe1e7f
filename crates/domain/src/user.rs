//! User domain types.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use rbac_console_core::{AppError, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::{RoleId, RoleRef};

/// Opaque user identifier assigned by the RBAC service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
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

impl Display for UserId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Account activation flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UserStatus {
    /// The account can be used.
    #[default]
    Active,
    /// The account is disabled.
    Inactive,
}

impl UserStatus {
    /// Returns the transport value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }

    /// Returns all statuses in display order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[UserStatus] = &[UserStatus::Active, UserStatus::Inactive];

        ALL
    }
}

impl FromStr for UserStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Active" => Ok(Self::Active),
            "Inactive" => Ok(Self::Inactive),
            _ => Err(AppError::Validation(format!(
                "unknown user status '{value}'"
            ))),
        }
    }
}

impl Display for UserStatus {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// User as listed by the RBAC service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    role: Option<RoleRef>,
    status: UserStatus,
}

impl User {
    /// Creates a user projection from service data.
    #[must_use]
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        role: Option<RoleRef>,
        status: UserStatus,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            role,
            status,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the email exactly as stored by the service.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Returns the assigned role, if any.
    #[must_use]
    pub fn role(&self) -> Option<&RoleRef> {
        self.role.as_ref()
    }

    /// Returns the assigned role id, if any.
    #[must_use]
    pub fn role_id(&self) -> Option<&RoleId> {
        self.role.as_ref().map(|role| &role.id)
    }

    /// Returns the activation status.
    #[must_use]
    pub fn status(&self) -> UserStatus {
        self.status
    }
}

/// Validated input for user creation.
///
/// Presence is the only rule; emails are not format checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// User display name.
    pub name: NonEmptyString,
    /// User email.
    pub email: NonEmptyString,
    /// Role assigned at creation.
    pub role: RoleId,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::UserStatus;

    #[test]
    fn status_roundtrip_transport_value() {
        for status in UserStatus::all() {
            let restored = UserStatus::from_str(status.as_str());
            assert_eq!(restored.ok(), Some(*status));
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(UserStatus::from_str("active").is_err());
        assert!(UserStatus::from_str("Suspended").is_err());
    }

    #[test]
    fn status_serializes_as_capitalized_word() {
        let json = serde_json::to_string(&UserStatus::Inactive).unwrap_or_default();
        assert_eq!(json, "\"Inactive\"");
    }
}
