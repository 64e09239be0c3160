//! Domain layer for the admin role editor.
//!
//! This crate contains:
//! - Domain models (Permission, Role, ModuleGroup)
//! - The permission tree and its selection state
//! - The role save flow and the `RoleService` abstraction

pub mod models;
pub mod services;
