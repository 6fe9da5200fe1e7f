//! Role page workflow: add, delete with confirmation, edit permissions.
//!
//! State lives behind an async mutex that is released before every service
//! call, so overlapping actions run independently and each refetches.

use std::sync::Arc;

use rbac_console_core::NonEmptyString;
use rbac_console_domain::{NewRole, PermissionList, Role, RoleId};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{EntityStore, RbacApi, WorkflowOutcome};


const ROLE_NAME_REQUIRED: &str = "Role name is required.";
const PERMISSIONS_REQUIRED: &str = "Permissions are required.";
const AT_LEAST_ONE_PERMISSION: &str = "At least one permission is required.";

/// Raw add-role form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleForm {
    /// Role name as typed.
    pub name: String,
    /// Comma-delimited permissions as typed.
    pub permissions: String,
}

/// Field-level messages for the add-role form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleFormErrors {
    /// Message for the name field.
    pub name: Option<String>,
    /// Message for the permissions field.
    pub permissions: Option<String>,
}

impl RoleFormErrors {
    /// Returns whether no field has a message.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.permissions.is_none()
    }
}

/// Which dialog, if any, is open on the role page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RoleModal {
    /// No dialog.
    #[default]
    Closed,
    /// Waiting for the operator to confirm deleting a role.
    ConfirmingDelete(RoleId),
    /// Editing the permissions of one role.
    EditingPermissions {
        /// Role being edited.
        role_id: RoleId,
        /// Comma-delimited permissions as typed.
        draft: String,
        /// Validation message for the draft.
        error: Option<String>,
    },
}

/// Snapshot of the role page state.
#[derive(Debug, Clone, Default)]
pub struct RoleWorkflowState {
    roles: EntityStore<Role>,
    form: RoleForm,
    errors: RoleFormErrors,
    modal: RoleModal,
}

impl RoleWorkflowState {
    /// Returns the cached role list.
    #[must_use]
    pub fn roles(&self) -> &EntityStore<Role> {
        &self.roles
    }

    /// Returns the add-role form input.
    #[must_use]
    pub fn form(&self) -> &RoleForm {
        &self.form
    }

    /// Returns the add-role form errors.
    #[must_use]
    pub fn errors(&self) -> &RoleFormErrors {
        &self.errors
    }

    /// Returns the open dialog.
    #[must_use]
    pub fn modal(&self) -> &RoleModal {
        &self.modal
    }
}

/// Orchestrates role page actions against the RBAC service.
#[derive(Clone)]
pub struct RoleWorkflow {
    api: Arc<dyn RbacApi>,
    state: Arc<Mutex<RoleWorkflowState>>,
}

impl RoleWorkflow {
    /// Creates a workflow with an empty, unloaded role list.
    #[must_use]
    pub fn new(api: Arc<dyn RbacApi>) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(RoleWorkflowState::default())),
        }
    }

    /// Returns a copy of the current state for rendering.
    pub async fn snapshot(&self) -> RoleWorkflowState {
        self.state.lock().await.clone()
    }

    /// Fetches all roles.
    pub async fn load(&self) {
        self.refetch().await;
    }

    /// Validates and submits the add-role form.
    pub async fn add_role(&self, form: RoleForm) -> WorkflowOutcome {
        let new_role = match validate_role_form(&form) {
            Ok(new_role) => new_role,
            Err(errors) => {
                let mut state = self.state.lock().await;
                state.form = form;
                state.errors = errors;
                return WorkflowOutcome::Invalid;
            }
        };

        {
            let mut state = self.state.lock().await;
            state.form = form;
            state.errors = RoleFormErrors::default();
        }

        let name = new_role.name.to_string();
        match self.api.create_role(new_role).await {
            Ok(()) => {
                info!(role_name = %name, "role created");
                {
                    let mut state = self.state.lock().await;
                    state.form = RoleForm::default();
                    state.roles.mark_stale();
                }
                self.refetch().await;
                WorkflowOutcome::Applied
            }
            Err(error) => {
                warn!(role_name = %name, error = %error, "failed to create role");
                WorkflowOutcome::Failed
            }
        }
    }

    /// Opens the delete confirmation for a role.
    pub async fn request_delete(&self, role_id: RoleId) {
        self.state.lock().await.modal = RoleModal::ConfirmingDelete(role_id);
    }

    /// Deletes `role_id` if it is the role awaiting confirmation.
    ///
    /// A confirmation for any other role is ignored.
    pub async fn confirm_delete(&self, role_id: &RoleId) -> WorkflowOutcome {
        let pending = matches!(
            &self.state.lock().await.modal,
            RoleModal::ConfirmingDelete(pending) if pending == role_id
        );
        if !pending {
            debug!(role_id = %role_id, "ignored delete confirmation for a role not pending");
            return WorkflowOutcome::Ignored;
        }
        let role_id = role_id.clone();

        match self.api.delete_role(&role_id).await {
            Ok(()) => {
                info!(role_id = %role_id, "role deleted");
                {
                    let mut state = self.state.lock().await;
                    if state.modal == RoleModal::ConfirmingDelete(role_id.clone()) {
                        state.modal = RoleModal::Closed;
                    }
                    state.roles.mark_stale();
                }
                self.refetch().await;
                WorkflowOutcome::Applied
            }
            Err(error) => {
                warn!(role_id = %role_id, error = %error, "failed to delete role");
                WorkflowOutcome::Failed
            }
        }
    }

    /// Discards a pending delete without calling the service.
    pub async fn cancel_delete(&self) {
        let mut state = self.state.lock().await;
        if matches!(state.modal, RoleModal::ConfirmingDelete(_)) {
            state.modal = RoleModal::Closed;
        }
    }

    /// Opens the permissions editor for a role, prefilled with its current
    /// permissions.
    pub async fn open_permissions_editor(&self, role_id: RoleId) {
        let mut state = self.state.lock().await;
        let draft = state
            .roles
            .get(&role_id)
            .map(Role::permissions_label)
            .unwrap_or_default();
        state.modal = RoleModal::EditingPermissions {
            role_id,
            draft,
            error: None,
        };
    }

    /// Validates and submits the permissions editor for `role_id`.
    ///
    /// Ignored unless the editor is open for that role.
    pub async fn submit_permissions(&self, role_id: &RoleId, draft: String) -> WorkflowOutcome {
        let (role_id, permissions) = {
            let mut state = self.state.lock().await;
            let editing = matches!(
                &state.modal,
                RoleModal::EditingPermissions { role_id: open, .. } if open == role_id
            );
            if !editing {
                return WorkflowOutcome::Ignored;
            }
            let role_id = role_id.clone();

            match validate_permissions(draft.as_str()) {
                Ok(permissions) => {
                    state.modal = RoleModal::EditingPermissions {
                        role_id: role_id.clone(),
                        draft,
                        error: None,
                    };
                    (role_id, permissions)
                }
                Err(message) => {
                    state.modal = RoleModal::EditingPermissions {
                        role_id,
                        draft,
                        error: Some(message.to_owned()),
                    };
                    return WorkflowOutcome::Invalid;
                }
            }
        };

        match self
            .api
            .update_role_permissions(&role_id, permissions)
            .await
        {
            Ok(()) => {
                info!(role_id = %role_id, "role permissions updated");
                {
                    let mut state = self.state.lock().await;
                    let still_open = matches!(
                        &state.modal,
                        RoleModal::EditingPermissions { role_id: open, .. } if *open == role_id
                    );
                    if still_open {
                        state.modal = RoleModal::Closed;
                    }
                    state.roles.mark_stale();
                }
                self.refetch().await;
                WorkflowOutcome::Applied
            }
            Err(error) => {
                warn!(role_id = %role_id, error = %error, "failed to update role permissions");
                WorkflowOutcome::Failed
            }
        }
    }

    /// Closes the permissions editor without calling the service.
    pub async fn close_permissions_editor(&self) {
        let mut state = self.state.lock().await;
        if matches!(state.modal, RoleModal::EditingPermissions { .. }) {
            state.modal = RoleModal::Closed;
        }
    }

    async fn refetch(&self) {
        let ticket = self.state.lock().await.roles.begin_fetch();

        match self.api.list_roles().await {
            Ok(roles) => {
                let count = roles.len();
                if self.state.lock().await.roles.apply(ticket, roles) {
                    debug!(count, "role list refreshed");
                } else {
                    debug!(count, "discarded role list superseded by a newer fetch");
                }
            }
            Err(error) => {
                warn!(error = %error, "failed to fetch roles");
                self.state.lock().await.roles.fail(ticket);
            }
        }
    }
}

fn validate_role_form(form: &RoleForm) -> Result<NewRole, RoleFormErrors> {
    let name = NonEmptyString::new(form.name.trim());
    let permissions = validate_permissions(form.permissions.as_str());

    match (name, permissions) {
        (Ok(name), Ok(permissions)) => Ok(NewRole { name, permissions }),
        (name, permissions) => Err(RoleFormErrors {
            name: name.err().map(|_| ROLE_NAME_REQUIRED.to_owned()),
            permissions: permissions.err().map(str::to_owned),
        }),
    }
}

fn validate_permissions(raw: &str) -> Result<PermissionList, &'static str> {
    if raw.trim().is_empty() {
        return Err(PERMISSIONS_REQUIRED);
    }

    PermissionList::parse(raw).map_err(|_| AT_LEAST_ONE_PERMISSION)
}
