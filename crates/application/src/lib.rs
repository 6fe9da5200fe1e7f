//! Application workflows and ports.

#![forbid(unsafe_code)]

mod entity_store;
mod outcome;
mod rbac_api;
mod role_workflow;
mod user_workflow;

#[cfg(test)]
mod fake_rbac_api;

pub use entity_store::{EntityStore, FetchTicket, Freshness, StoreEntity};
pub use outcome::WorkflowOutcome;
pub use rbac_api::RbacApi;
pub use role_workflow::{RoleForm, RoleFormErrors, RoleModal, RoleWorkflow, RoleWorkflowState};
pub use user_workflow::{
    UserForm, UserFormErrors, UserModal, UserWorkflow, UserWorkflowState,
};
