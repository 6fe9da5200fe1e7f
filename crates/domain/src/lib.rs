//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod role;
mod user;

pub use role::{NewRole, PermissionList, Role, RoleId, RoleRef};
pub use user::{NewUser, User, UserId, UserStatus};
