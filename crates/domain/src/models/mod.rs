//! Domain models for the admin role editor.

pub mod module_group;
pub mod permission;
pub mod role;

pub use module_group::{classify_module, modules_for_group, ModuleGroup, GROUP_KEYWORDS};
pub use permission::{
    action_of, is_manage_slug, AssignPermissionsRequest, Permission, PermissionAssignment,
    RolePermissionEntry, RolePermissionPivot, MANAGE_ACTION, MANAGE_LABEL,
};
pub use role::{CreateRoleRequest, Role, RoleForm, RoleWithPermissions, UpdateRoleRequest};
