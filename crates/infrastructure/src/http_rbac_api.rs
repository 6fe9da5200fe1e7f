use async_trait::async_trait;
use rbac_console_application::RbacApi;
use rbac_console_core::{AppError, AppResult};
use rbac_console_domain::{
    NewRole, NewUser, PermissionList, Role, RoleId, RoleRef, User, UserId, UserStatus,
};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;


/// `reqwest` client for the RBAC REST service.
///
/// One request per call: no retries, no timeouts beyond the client defaults.
#[derive(Clone)]
pub struct HttpRbacApi {
    http_client: reqwest::Client,
    base_url: Url,
}

impl HttpRbacApi {
    /// Creates a client rooted at the given service base URL.
    #[must_use]
    pub fn new(http_client: reqwest::Client, base_url: &Url) -> Self {
        Self {
            http_client,
            base_url: base_url.clone(),
        }
    }

    /// Returns the base URL requests are sent to, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Appends `segments` to the base path, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Internal(format!(
                    "rbac service url '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> AppResult<RequestBuilder> {
        let url = self.endpoint(segments)?;
        debug!(method = %method, path = url.path(), "rbac service request");
        Ok(self.http_client.request(method, url))
    }

    async fn execute(&self, request: RequestBuilder) -> AppResult<Vec<u8>> {
        let response = request.send().await.map_err(|error| {
            AppError::Transport(format!("rbac service request failed: {error}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<response body unavailable>".to_owned());
            return Err(AppError::Service {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.bytes().await.map_err(|error| {
            AppError::Transport(format!("failed to read rbac service response: {error}"))
        })?;
        Ok(body.to_vec())
    }

    async fn execute_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> AppResult<T> {
        let body = self.execute(request).await?;
        serde_json::from_slice(&body).map_err(|error| {
            AppError::Internal(format!("failed to decode rbac service response: {error}"))
        })
    }
}

#[derive(Debug, Deserialize)]
struct RoleRecord {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    #[serde(default)]
    permissions: Vec<String>,
}

impl From<RoleRecord> for Role {
    fn from(record: RoleRecord) -> Self {
        Role::new(RoleId::new(record.id), record.name, record.permissions)
    }
}

/// A user's role comes back either populated or as a bare id.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RoleReference {
    Populated {
        #[serde(rename = "_id")]
        id: String,
        #[serde(default)]
        name: Option<String>,
    },
    Id(String),
}

impl From<RoleReference> for RoleRef {
    fn from(reference: RoleReference) -> Self {
        match reference {
            RoleReference::Populated { id, name } => RoleRef {
                id: RoleId::new(id),
                name,
            },
            RoleReference::Id(id) => RoleRef {
                id: RoleId::new(id),
                name: None,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct UserRecord {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    email: String,
    #[serde(default)]
    role: Option<RoleReference>,
    #[serde(default)]
    status: UserStatus,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        User::new(
            UserId::new(record.id),
            record.name,
            record.email,
            record.role.map(RoleRef::from),
            record.status,
        )
    }
}

#[derive(Serialize)]
struct CreateRoleBody<'a> {
    name: &'a str,
    permissions: &'a [String],
}

#[derive(Serialize)]
struct UpdatePermissionsBody<'a> {
    permissions: &'a [String],
}

#[derive(Serialize)]
struct CreateUserBody<'a> {
    name: &'a str,
    email: &'a str,
    role: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateUserRoleBody<'a> {
    role_id: &'a str,
}

#[derive(Serialize)]
struct UpdateUserStatusBody {
    status: UserStatus,
}

#[async_trait]
impl RbacApi for HttpRbacApi {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let records: Vec<RoleRecord> = self
            .execute_json(self.request(Method::GET, &["roles"])?)
            .await?;
        Ok(records.into_iter().map(Role::from).collect())
    }

    async fn create_role(&self, role: NewRole) -> AppResult<()> {
        let body = CreateRoleBody {
            name: role.name.as_str(),
            permissions: role.permissions.as_slice(),
        };
        self.execute(self.request(Method::POST, &["roles"])?.json(&body))
            .await?;
        Ok(())
    }

    async fn delete_role(&self, role_id: &RoleId) -> AppResult<()> {
        self.execute(self.request(Method::DELETE, &["roles", role_id.as_str()])?)
            .await?;
        Ok(())
    }

    async fn update_role_permissions(
        &self,
        role_id: &RoleId,
        permissions: PermissionList,
    ) -> AppResult<()> {
        let body = UpdatePermissionsBody {
            permissions: permissions.as_slice(),
        };
        self.execute(
            self.request(Method::PATCH, &["roles", role_id.as_str()])?
                .json(&body),
        )
        .await?;
        Ok(())
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        let records: Vec<UserRecord> = self
            .execute_json(self.request(Method::GET, &["users"])?)
            .await?;
        Ok(records.into_iter().map(User::from).collect())
    }

    async fn create_user(&self, user: NewUser) -> AppResult<()> {
        let body = CreateUserBody {
            name: user.name.as_str(),
            email: user.email.as_str(),
            role: user.role.as_str(),
        };
        self.execute(self.request(Method::POST, &["users"])?.json(&body))
            .await?;
        Ok(())
    }

    async fn delete_user(&self, user_id: &UserId) -> AppResult<()> {
        self.execute(self.request(Method::DELETE, &["users", user_id.as_str()])?)
            .await?;
        Ok(())
    }

    async fn update_user_role(&self, user_id: &UserId, role_id: &RoleId) -> AppResult<User> {
        let body = UpdateUserRoleBody {
            role_id: role_id.as_str(),
        };
        let record: UserRecord = self
            .execute_json(
                self.request(Method::PATCH, &["users", user_id.as_str(), "role"])?
                    .json(&body),
            )
            .await?;
        Ok(record.into())
    }

    async fn update_user_status(&self, user_id: &UserId, status: UserStatus) -> AppResult<User> {
        let record: UserRecord = self
            .execute_json(
                self.request(Method::PATCH, &["users", user_id.as_str(), "status"])?
                    .json(&UpdateUserStatusBody { status }),
            )
            .await?;
        Ok(record.into())
    }
}
