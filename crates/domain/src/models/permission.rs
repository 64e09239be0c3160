//! Permission domain models for role-level RBAC.
//!
//! Permissions are defined by the dashboard API and are read-only here;
//! the editor only decides which of them a role grants.

use serde::{Deserialize, Serialize};

/// Action suffix that stands for "every action of this module".
pub const MANAGE_ACTION: &str = "manage";

/// Label shown for a `manage` permission in the tree.
pub const MANAGE_LABEL: &str = "all";

/// A grantable capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: i64,
    /// Dotted `<module>.<action>` identifier (e.g. "roles.edit")
    pub slug: String,
    /// Raw grouping key assigned by the server (e.g. "roles")
    pub module: String,
    /// Human-readable label
    #[serde(default)]
    pub name: String,
}

impl Permission {
    /// Last dotted segment of the slug.
    pub fn action(&self) -> &str {
        action_of(&self.slug)
    }

    /// Whether this is the module-wide `manage` permission.
    pub fn is_manage(&self) -> bool {
        is_manage_slug(&self.slug)
    }

    /// Label used when rendering the permission as a leaf.
    pub fn label(&self) -> &str {
        if self.is_manage() {
            MANAGE_LABEL
        } else if self.name.is_empty() {
            &self.slug
        } else {
            &self.name
        }
    }
}

/// Returns the last dotted segment of a permission slug.
pub fn action_of(slug: &str) -> &str {
    slug.rsplit('.').next().unwrap_or(slug)
}

/// True when the slug's last dotted segment is exactly `manage`.
pub fn is_manage_slug(slug: &str) -> bool {
    slug.contains('.') && action_of(slug) == MANAGE_ACTION
}

/// Pivot data attached to a permission when it is loaded through a role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermissionPivot {
    #[serde(default)]
    pub requires_approval: Option<bool>,
}

/// A permission as returned inside a role, with its pivot row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermissionEntry {
    #[serde(flatten)]
    pub permission: Permission,
    #[serde(
        rename = "RolePermission",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub role_permission: Option<RolePermissionPivot>,
}

impl RolePermissionEntry {
    /// Approval flag stored for this grant, defaulting to false.
    pub fn requires_approval(&self) -> bool {
        self.role_permission
            .as_ref()
            .and_then(|pivot| pivot.requires_approval)
            .unwrap_or(false)
    }
}

/// One entry of the assign-permissions payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionAssignment {
    pub permission_id: i64,
    pub requires_approval: bool,
}

/// Request that replaces a role's entire permission set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignPermissionsRequest {
    pub role_id: i64,
    pub permissions: Vec<PermissionAssignment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn permission(slug: &str, name: &str) -> Permission {
        Permission {
            id: 1,
            slug: slug.to_string(),
            module: slug.split('.').next().unwrap_or_default().to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_action_of() {
        assert_eq!(action_of("roles.edit"), "edit");
        assert_eq!(action_of("settings.optimize_settings_view"), "optimize_settings_view");
        assert_eq!(action_of("plain"), "plain");
    }

    #[test]
    fn test_is_manage_slug() {
        assert!(is_manage_slug("media.manage"));
        assert!(!is_manage_slug("media.manage_files"));
        assert!(!is_manage_slug("media.view"));
        assert!(!is_manage_slug("manage"));
    }

    #[test]
    fn test_label() {
        assert_eq!(permission("media.manage", "Manage Media").label(), "all");
        assert_eq!(permission("media.view", "View Media").label(), "View Media");
        assert_eq!(permission("media.view", "").label(), "media.view");
    }

    #[test]
    fn test_role_permission_entry_deserialization() {
        let json = r#"{
            "id": 7,
            "slug": "roles.edit",
            "module": "roles",
            "name": "Edit Roles",
            "RolePermission": { "requires_approval": true }
        }"#;

        let entry: RolePermissionEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.permission.id, 7);
        assert_eq!(entry.permission.slug, "roles.edit");
        assert!(entry.requires_approval());
    }

    #[test]
    fn test_role_permission_entry_without_pivot() {
        let json = r#"{"id": 3, "slug": "roles.view", "module": "roles", "name": "View Roles"}"#;

        let entry: RolePermissionEntry = serde_json::from_str(json).unwrap();
        assert!(entry.role_permission.is_none());
        assert!(!entry.requires_approval());

        let json = r#"{"id": 3, "slug": "roles.view", "module": "roles", "RolePermission": {}}"#;
        let entry: RolePermissionEntry = serde_json::from_str(json).unwrap();
        assert!(!entry.requires_approval());
    }

    #[test]
    fn test_assign_permissions_request_serialization() {
        let request = AssignPermissionsRequest {
            role_id: 4,
            permissions: vec![PermissionAssignment {
                permission_id: 9,
                requires_approval: true,
            }],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "roleId": 4,
                "permissions": [{ "permissionId": 9, "requiresApproval": true }]
            })
        );
    }
}
