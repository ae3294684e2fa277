//! Access-control data model for the GateKit gateway.
//!
//! Everything in this crate is immutable after construction: the
//! role-permission table and the route registry are built once at process
//! startup and shared behind `Arc` by any number of concurrent readers.

pub mod error;
pub mod permission;
pub mod role;
pub mod routes;

pub use error::AccessError;
pub use permission::{Permission, RolePermissions};
pub use role::{Action, Resource, Role};
pub use routes::{RouteAction, RouteMatch, RouteRegistry};
