use std::sync::Arc;

use async_trait::async_trait;
use rbac_console_core::{AppError, AppResult};
use rbac_console_domain::{
    NewRole, NewUser, PermissionList, Role, RoleId, RoleRef, User, UserId, UserStatus,
};
use tokio::sync::{Mutex, Notify};

use crate::RbacApi;

/// Service call recorded by [`FakeRbacApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ApiCall {
    ListRoles,
    CreateRole { name: String, permissions: Vec<String> },
    DeleteRole(RoleId),
    UpdateRolePermissions(RoleId, Vec<String>),
    ListUsers,
    CreateUser { name: String, email: String, role: RoleId },
    DeleteUser(UserId),
    UpdateUserRole(UserId, RoleId),
    UpdateUserStatus(UserId, UserStatus),
}

/// Holds mutations until the test releases them.
#[derive(Default)]
pub(crate) struct MutationGate {
    entered: Notify,
    released: Notify,
}

impl MutationGate {
    /// Waits until a mutation is parked at the gate.
    pub(crate) async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Lets the parked mutation continue.
    pub(crate) fn release(&self) {
        self.released.notify_one();
    }

    async fn pass(&self) {
        self.entered.notify_one();
        self.released.notified().await;
    }
}

/// In-process stand-in for the RBAC service that records every call.
#[derive(Default)]
pub(crate) struct FakeRbacApi {
    roles: Mutex<Vec<Role>>,
    users: Mutex<Vec<User>>,
    calls: Mutex<Vec<ApiCall>>,
    fail_mutations: bool,
    fail_role_listing: bool,
    gate: Option<Arc<MutationGate>>,
}

impl FakeRbacApi {
    pub(crate) fn with_roles(roles: Vec<Role>) -> Self {
        Self {
            roles: Mutex::new(roles),
            ..Self::default()
        }
    }

    pub(crate) fn with_users(roles: Vec<Role>, users: Vec<User>) -> Self {
        Self {
            roles: Mutex::new(roles),
            users: Mutex::new(users),
            ..Self::default()
        }
    }

    pub(crate) fn failing_mutations(mut self) -> Self {
        self.fail_mutations = true;
        self
    }

    pub(crate) fn failing_role_listing(mut self) -> Self {
        self.fail_role_listing = true;
        self
    }

    pub(crate) fn gated(mut self, gate: Arc<MutationGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub(crate) async fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().await.clone()
    }

    pub(crate) async fn mutation_calls(&self) -> Vec<ApiCall> {
        self.calls()
            .await
            .into_iter()
            .filter(|call| !matches!(call, ApiCall::ListRoles | ApiCall::ListUsers))
            .collect()
    }

    async fn record(&self, call: ApiCall) -> AppResult<()> {
        let is_mutation = !matches!(call, ApiCall::ListRoles | ApiCall::ListUsers);
        self.calls.lock().await.push(call);
        if let Some(gate) = self.gate.as_ref().filter(|_| is_mutation) {
            gate.pass().await;
        }
        if is_mutation && self.fail_mutations {
            return Err(AppError::Service {
                status: 500,
                message: "boom".to_owned(),
            });
        }

        Ok(())
    }

    async fn find_user(&self, user_id: &UserId) -> AppResult<User> {
        self.users
            .lock()
            .await
            .iter()
            .find(|user| user.id() == user_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}'")))
    }
}

#[async_trait]
impl RbacApi for FakeRbacApi {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.record(ApiCall::ListRoles).await?;
        if self.fail_role_listing {
            return Err(AppError::Transport("connection refused".to_owned()));
        }

        Ok(self.roles.lock().await.clone())
    }

    async fn create_role(&self, role: NewRole) -> AppResult<()> {
        let name = String::from(role.name);
        let permissions = Vec::<String>::from(role.permissions);
        self.record(ApiCall::CreateRole {
            name: name.clone(),
            permissions: permissions.clone(),
        })
        .await?;

        let mut roles = self.roles.lock().await;
        let id = RoleId::new(format!("role-{}", roles.len() + 1));
        roles.push(Role::new(id, name, permissions));
        Ok(())
    }

    async fn delete_role(&self, role_id: &RoleId) -> AppResult<()> {
        self.record(ApiCall::DeleteRole(role_id.clone())).await?;
        self.roles.lock().await.retain(|role| role.id() != role_id);
        Ok(())
    }

    async fn update_role_permissions(
        &self,
        role_id: &RoleId,
        permissions: PermissionList,
    ) -> AppResult<()> {
        let permissions = Vec::<String>::from(permissions);
        self.record(ApiCall::UpdateRolePermissions(
            role_id.clone(),
            permissions.clone(),
        ))
        .await?;

        let mut roles = self.roles.lock().await;
        for role in roles.iter_mut() {
            if role.id() == role_id {
                *role = Role::new(role_id.clone(), role.name(), permissions.clone());
            }
        }
        Ok(())
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.record(ApiCall::ListUsers).await?;
        Ok(self.users.lock().await.clone())
    }

    async fn create_user(&self, user: NewUser) -> AppResult<()> {
        let name = String::from(user.name);
        let email = String::from(user.email);
        self.record(ApiCall::CreateUser {
            name: name.clone(),
            email: email.clone(),
            role: user.role.clone(),
        })
        .await?;

        let mut users = self.users.lock().await;
        let id = UserId::new(format!("user-{}", users.len() + 1));
        users.push(User::new(
            id,
            name,
            email,
            Some(RoleRef {
                id: user.role,
                name: None,
            }),
            UserStatus::Active,
        ));
        Ok(())
    }

    async fn delete_user(&self, user_id: &UserId) -> AppResult<()> {
        self.record(ApiCall::DeleteUser(user_id.clone())).await?;
        self.users.lock().await.retain(|user| user.id() != user_id);
        Ok(())
    }

    async fn update_user_role(&self, user_id: &UserId, role_id: &RoleId) -> AppResult<User> {
        self.record(ApiCall::UpdateUserRole(user_id.clone(), role_id.clone()))
            .await?;

        let current = self.find_user(user_id).await?;
        let updated = User::new(
            current.id().clone(),
            current.name(),
            current.email(),
            Some(RoleRef {
                id: role_id.clone(),
                name: None,
            }),
            current.status(),
        );
        replace_user(&mut *self.users.lock().await, updated.clone());
        Ok(updated)
    }

    async fn update_user_status(&self, user_id: &UserId, status: UserStatus) -> AppResult<User> {
        self.record(ApiCall::UpdateUserStatus(user_id.clone(), status))
            .await?;

        let current = self.find_user(user_id).await?;
        let updated = User::new(
            current.id().clone(),
            current.name(),
            current.email(),
            current.role().cloned(),
            status,
        );
        replace_user(&mut *self.users.lock().await, updated.clone());
        Ok(updated)
    }
}

fn replace_user(users: &mut [User], updated: User) {
    for user in users.iter_mut() {
        if user.id() == updated.id() {
            *user = updated.clone();
        }
    }
}
