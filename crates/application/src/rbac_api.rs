use async_trait::async_trait;
use rbac_console_core::AppResult;
use rbac_console_domain::{
    NewRole, NewUser, PermissionList, Role, RoleId, User, UserId, UserStatus,
};

/// Port for the remote RBAC service.
///
/// One method per endpoint. Implementations map requests and responses only:
/// no retries, no caching, no timeouts. Failures surface as
/// `AppError::Transport` or `AppError::Service`.
#[async_trait]
pub trait RbacApi: Send + Sync {
    /// Lists all roles.
    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// Creates a role.
    async fn create_role(&self, role: NewRole) -> AppResult<()>;

    /// Deletes a role.
    async fn delete_role(&self, role_id: &RoleId) -> AppResult<()>;

    /// Replaces the permissions of a role.
    async fn update_role_permissions(
        &self,
        role_id: &RoleId,
        permissions: PermissionList,
    ) -> AppResult<()>;

    /// Lists all users.
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Creates a user.
    async fn create_user(&self, user: NewUser) -> AppResult<()>;

    /// Deletes a user.
    async fn delete_user(&self, user_id: &UserId) -> AppResult<()>;

    /// Assigns a role to a user and returns the updated user.
    async fn update_user_role(&self, user_id: &UserId, role_id: &RoleId) -> AppResult<User>;

    /// Changes a user's status and returns the updated user.
    async fn update_user_status(&self, user_id: &UserId, status: UserStatus) -> AppResult<User>;
}
