use async_trait::async_trait;
use rbac_console_application::RbacApi;
use rbac_console_core::{AppError, AppResult};
use rbac_console_domain::{
    NewRole, NewUser, PermissionList, Role, RoleId, RoleRef, User, UserId, UserStatus,
};
use tokio::sync::Mutex;
use uuid::Uuid;


#[derive(Debug, Clone)]
struct StoredUser {
    id: UserId,
    name: String,
    email: String,
    role_id: RoleId,
    status: UserStatus,
}

#[derive(Debug, Default)]
struct Tables {
    roles: Vec<Role>,
    users: Vec<StoredUser>,
}

impl Tables {
    fn role(&self, role_id: &RoleId) -> AppResult<&Role> {
        self.roles
            .iter()
            .find(|role| role.id() == role_id)
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))
    }

    fn user_mut(&mut self, user_id: &UserId) -> AppResult<&mut StoredUser> {
        self.users
            .iter_mut()
            .find(|user| &user.id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))
    }

    /// Projects a stored user with its role populated, or no role when the
    /// referenced role has since been deleted.
    fn project(&self, user: &StoredUser) -> User {
        let role = self.role(&user.role_id).ok().map(|role| RoleRef {
            id: role.id().clone(),
            name: Some(role.name().to_owned()),
        });

        User::new(
            user.id.clone(),
            user.name.as_str(),
            user.email.as_str(),
            role,
            user.status,
        )
    }
}

/// In-process RBAC service used for local demos and console tests.
#[derive(Debug, Default)]
pub struct InMemoryRbacApi {
    tables: Mutex<Tables>,
}

impl InMemoryRbacApi {
    /// Creates an empty service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RbacApi for InMemoryRbacApi {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        Ok(self.tables.lock().await.roles.clone())
    }

    async fn create_role(&self, role: NewRole) -> AppResult<()> {
        let created = Role::new(
            RoleId::new(Uuid::new_v4().to_string()),
            role.name,
            role.permissions.into(),
        );
        self.tables.lock().await.roles.push(created);
        Ok(())
    }

    async fn delete_role(&self, role_id: &RoleId) -> AppResult<()> {
        let mut tables = self.tables.lock().await;
        let position = tables
            .roles
            .iter()
            .position(|role| role.id() == role_id)
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))?;
        tables.roles.remove(position);
        Ok(())
    }

    async fn update_role_permissions(
        &self,
        role_id: &RoleId,
        permissions: PermissionList,
    ) -> AppResult<()> {
        let mut tables = self.tables.lock().await;
        let role = tables
            .roles
            .iter_mut()
            .find(|role| role.id() == role_id)
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))?;
        *role = Role::new(role_id.clone(), role.name(), permissions.into());
        Ok(())
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().map(|user| tables.project(user)).collect())
    }

    async fn create_user(&self, user: NewUser) -> AppResult<()> {
        let mut tables = self.tables.lock().await;
        tables.role(&user.role)?;
        tables.users.push(StoredUser {
            id: UserId::new(Uuid::new_v4().to_string()),
            name: user.name.into(),
            email: user.email.into(),
            role_id: user.role,
            status: UserStatus::Active,
        });
        Ok(())
    }

    async fn delete_user(&self, user_id: &UserId) -> AppResult<()> {
        let mut tables = self.tables.lock().await;
        let position = tables
            .users
            .iter()
            .position(|user| &user.id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))?;
        tables.users.remove(position);
        Ok(())
    }

    async fn update_user_role(&self, user_id: &UserId, role_id: &RoleId) -> AppResult<User> {
        let mut tables = self.tables.lock().await;
        tables.role(role_id)?;
        let user = tables.user_mut(user_id)?;
        user.role_id = role_id.clone();
        let user = user.clone();
        Ok(tables.project(&user))
    }

    async fn update_user_status(&self, user_id: &UserId, status: UserStatus) -> AppResult<User> {
        let mut tables = self.tables.lock().await;
        let user = tables.user_mut(user_id)?;
        user.status = status;
        let user = user.clone();
        Ok(tables.project(&user))
    }
}
