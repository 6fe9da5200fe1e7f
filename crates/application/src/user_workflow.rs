//! User page workflow: add, delete with confirmation, role reassignment and
//! status changes.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rbac_console_core::NonEmptyString;
use rbac_console_domain::{NewUser, Role, RoleId, User, UserId, UserStatus};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{EntityStore, RbacApi, WorkflowOutcome};


const NAME_REQUIRED: &str = "Name is required";
const EMAIL_REQUIRED: &str = "Email is required";
const ROLE_REQUIRED: &str = "Role is required";

/// Raw add-user form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserForm {
    /// Name as typed.
    pub name: String,
    /// Email as typed.
    pub email: String,
    /// Selected role id, empty when nothing is selected.
    pub role: String,
}

/// Field-level messages for the add-user form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFormErrors {
    /// Message for the name field.
    pub name: Option<String>,
    /// Message for the email field.
    pub email: Option<String>,
    /// Message for the role field.
    pub role: Option<String>,
}

impl UserFormErrors {
    /// Returns whether no field has a message.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.role.is_none()
    }
}

/// Which dialog, if any, is open on the user page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UserModal {
    /// No dialog.
    #[default]
    Closed,
    /// Waiting for the operator to confirm deleting a user.
    ConfirmingDelete(UserId),
    /// Choosing a new role for one user.
    ChangingRole {
        /// User being edited.
        user_id: UserId,
        /// Currently selected role.
        selected_role: Option<RoleId>,
    },
}

/// Snapshot of the user page state.
#[derive(Debug, Clone, Default)]
pub struct UserWorkflowState {
    users: EntityStore<User>,
    roles: EntityStore<Role>,
    form: UserForm,
    errors: UserFormErrors,
    modal: UserModal,
    busy: bool,
}

impl UserWorkflowState {
    /// Returns the cached user list.
    #[must_use]
    pub fn users(&self) -> &EntityStore<User> {
        &self.users
    }

    /// Returns the cached role list used for role selection.
    #[must_use]
    pub fn roles(&self) -> &EntityStore<Role> {
        &self.roles
    }

    /// Returns the add-user form input.
    #[must_use]
    pub fn form(&self) -> &UserForm {
        &self.form
    }

    /// Returns the add-user form errors.
    #[must_use]
    pub fn errors(&self) -> &UserFormErrors {
        &self.errors
    }

    /// Returns the open dialog.
    #[must_use]
    pub fn modal(&self) -> &UserModal {
        &self.modal
    }

    /// Returns whether a user mutation is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy
    }
}

/// Counts in-flight user mutations; released on drop so cancelled requests
/// still clear the flag.
struct BusyGuard(Arc<AtomicUsize>);

impl BusyGuard {
    fn acquire(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Orchestrates user page actions against the RBAC service.
#[derive(Clone)]
pub struct UserWorkflow {
    api: Arc<dyn RbacApi>,
    state: Arc<Mutex<UserWorkflowState>>,
    in_flight: Arc<AtomicUsize>,
}

impl UserWorkflow {
    /// Creates a workflow with empty, unloaded user and role lists.
    #[must_use]
    pub fn new(api: Arc<dyn RbacApi>) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(UserWorkflowState::default())),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns a copy of the current state for rendering.
    pub async fn snapshot(&self) -> UserWorkflowState {
        let mut snapshot = self.state.lock().await.clone();
        snapshot.busy = self.in_flight.load(Ordering::SeqCst) > 0;
        snapshot
    }

    /// Fetches users and roles concurrently; either may fail independently.
    pub async fn load(&self) {
        tokio::join!(self.refetch_users(), self.refetch_roles());
    }

    /// Validates and submits the add-user form.
    pub async fn add_user(&self, form: UserForm) -> WorkflowOutcome {
        let new_user = match validate_user_form(&form) {
            Ok(new_user) => new_user,
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
            state.errors = UserFormErrors::default();
        }

        let _busy = BusyGuard::acquire(&self.in_flight);
        let email = new_user.email.to_string();
        match self.api.create_user(new_user).await {
            Ok(()) => {
                info!(user_email = %email, "user created");
                {
                    let mut state = self.state.lock().await;
                    state.form = UserForm::default();
                    state.users.mark_stale();
                }
                self.refetch_users().await;
                WorkflowOutcome::Applied
            }
            Err(error) => {
                warn!(user_email = %email, error = %error, "failed to create user");
                WorkflowOutcome::Failed
            }
        }
    }

    /// Opens the delete confirmation for a user.
    pub async fn request_delete(&self, user_id: UserId) {
        self.state.lock().await.modal = UserModal::ConfirmingDelete(user_id);
    }

    /// Deletes `user_id` if it is the user awaiting confirmation.
    pub async fn confirm_delete(&self, user_id: &UserId) -> WorkflowOutcome {
        let pending = matches!(
            &self.state.lock().await.modal,
            UserModal::ConfirmingDelete(pending) if pending == user_id
        );
        if !pending {
            debug!(user_id = %user_id, "ignored delete confirmation for a user not pending");
            return WorkflowOutcome::Ignored;
        }
        let user_id = user_id.clone();

        let _busy = BusyGuard::acquire(&self.in_flight);
        match self.api.delete_user(&user_id).await {
            Ok(()) => {
                info!(user_id = %user_id, "user deleted");
                {
                    let mut state = self.state.lock().await;
                    if state.modal == UserModal::ConfirmingDelete(user_id.clone()) {
                        state.modal = UserModal::Closed;
                    }
                    state.users.mark_stale();
                }
                self.refetch_users().await;
                WorkflowOutcome::Applied
            }
            Err(error) => {
                warn!(user_id = %user_id, error = %error, "failed to delete user");
                WorkflowOutcome::Failed
            }
        }
    }

    /// Discards a pending delete without calling the service.
    pub async fn cancel_delete(&self) {
        let mut state = self.state.lock().await;
        if matches!(state.modal, UserModal::ConfirmingDelete(_)) {
            state.modal = UserModal::Closed;
        }
    }

    /// Opens the role editor for a user, preselecting its current role.
    pub async fn open_role_editor(&self, user_id: UserId) {
        let mut state = self.state.lock().await;
        let selected_role = state
            .users
            .get(&user_id)
            .and_then(User::role_id)
            .cloned();
        state.modal = UserModal::ChangingRole {
            user_id,
            selected_role,
        };
    }

    /// Assigns the selected role to `user_id`.
    ///
    /// Ignored unless the role editor is open for that user. An empty
    /// selection is ignored and leaves the editor open.
    pub async fn save_role(&self, user_id: &UserId, role_id: Option<RoleId>) -> WorkflowOutcome {
        let user_id = {
            let mut state = self.state.lock().await;
            let editing = matches!(
                &state.modal,
                UserModal::ChangingRole { user_id: open, .. } if open == user_id
            );
            if !editing {
                return WorkflowOutcome::Ignored;
            }
            let user_id = user_id.clone();
            state.modal = UserModal::ChangingRole {
                user_id: user_id.clone(),
                selected_role: role_id.clone(),
            };
            user_id
        };
        let Some(role_id) = role_id else {
            return WorkflowOutcome::Ignored;
        };

        let _busy = BusyGuard::acquire(&self.in_flight);
        match self.api.update_user_role(&user_id, &role_id).await {
            Ok(updated) => {
                info!(
                    user_id = %user_id,
                    role_id = %role_id,
                    "user role updated"
                );
                debug!(user = ?updated, "service returned updated user");
                {
                    let mut state = self.state.lock().await;
                    let still_open = matches!(
                        &state.modal,
                        UserModal::ChangingRole { user_id: open, .. } if *open == user_id
                    );
                    if still_open {
                        state.modal = UserModal::Closed;
                    }
                    state.users.mark_stale();
                }
                self.refetch_users().await;
                WorkflowOutcome::Applied
            }
            Err(error) => {
                warn!(
                    user_id = %user_id,
                    role_id = %role_id,
                    error = %error,
                    "failed to update user role"
                );
                WorkflowOutcome::Failed
            }
        }
    }

    /// Closes the role editor without calling the service.
    pub async fn close_role_editor(&self) {
        let mut state = self.state.lock().await;
        if matches!(state.modal, UserModal::ChangingRole { .. }) {
            state.modal = UserModal::Closed;
        }
    }

    /// Changes a user's status immediately, without confirmation.
    pub async fn change_status(&self, user_id: UserId, status: UserStatus) -> WorkflowOutcome {
        let _busy = BusyGuard::acquire(&self.in_flight);
        match self.api.update_user_status(&user_id, status).await {
            Ok(updated) => {
                info!(user_id = %user_id, status = %status, "user status updated");
                debug!(user = ?updated, "service returned updated user");
                self.state.lock().await.users.mark_stale();
                self.refetch_users().await;
                WorkflowOutcome::Applied
            }
            Err(error) => {
                warn!(
                    user_id = %user_id,
                    status = %status,
                    error = %error,
                    "failed to update user status"
                );
                WorkflowOutcome::Failed
            }
        }
    }

    async fn refetch_users(&self) {
        let ticket = self.state.lock().await.users.begin_fetch();

        match self.api.list_users().await {
            Ok(users) => {
                let count = users.len();
                if self.state.lock().await.users.apply(ticket, users) {
                    debug!(count, "user list refreshed");
                } else {
                    debug!(count, "discarded user list superseded by a newer fetch");
                }
            }
            Err(error) => {
                warn!(error = %error, "failed to fetch users");
                self.state.lock().await.users.fail(ticket);
            }
        }
    }

    async fn refetch_roles(&self) {
        let ticket = self.state.lock().await.roles.begin_fetch();

        match self.api.list_roles().await {
            Ok(roles) => {
                self.state.lock().await.roles.apply(ticket, roles);
            }
            Err(error) => {
                warn!(error = %error, "failed to fetch roles for user page");
                self.state.lock().await.roles.fail(ticket);
            }
        }
    }
}

fn validate_user_form(form: &UserForm) -> Result<NewUser, UserFormErrors> {
    let name = NonEmptyString::new(form.name.trim());
    let email = NonEmptyString::new(form.email.trim());
    let role = non_blank(form.role.as_str()).map(RoleId::new);

    match (name, email, role) {
        (Ok(name), Ok(email), Some(role)) => Ok(NewUser { name, email, role }),
        (name, email, role) => Err(UserFormErrors {
            name: name.err().map(|_| NAME_REQUIRED.to_owned()),
            email: email.err().map(|_| EMAIL_REQUIRED.to_owned()),
            role: role.is_none().then(|| ROLE_REQUIRED.to_owned()),
        }),
    }
}

/// Returns the trimmed value, or `None` when it is blank.
fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
