//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_rbac_api;
mod in_memory_rbac_api;

pub use http_rbac_api::HttpRbacApi;
pub use in_memory_rbac_api::InMemoryRbacApi;
