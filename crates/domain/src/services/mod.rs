//! Domain services for the admin role editor.
//!
//! Services contain the logic that operates on domain models.

pub mod permission_tree;
pub mod role_editor;
pub mod selection;

pub use permission_tree::{
    group_by_module, settings_section, ModuleGroupNode, PermissionTree, SubModule,
    SETTINGS_MODULE,
};

pub use role_editor::{
    EditorMode, MockRoleService, MockStep, RoleEditor, RoleService, RoleServiceError,
    SaveRoleError,
};

pub use selection::{check_state, CheckState, RolePermissionsState};
