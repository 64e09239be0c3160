//! Role domain models for the admin role editor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::permission::RolePermissionEntry;

/// Role record as returned by the dashboard API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_is_active() -> bool {
    true
}

/// Role with its granted permissions, used to seed the editor in edit mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleWithPermissions {
    #[serde(flatten)]
    pub role: Role,
    #[serde(default)]
    pub permissions: Vec<RolePermissionEntry>,
}

/// Request to create a role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateRoleRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "Slug must be 1-100 characters"))]
    #[validate(custom(function = "shared::validation::validate_slug"))]
    pub slug: String,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
    pub is_active: bool,
}

/// Request to update a role's metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateRoleRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "Slug must be 1-100 characters"))]
    #[validate(custom(function = "shared::validation::validate_slug"))]
    pub slug: String,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
    pub is_active: bool,
}

/// Editable role metadata held by the role dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleForm {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_active: bool,
    slug_edited: bool,
}

impl RoleForm {
    /// Empty form for a new, active role.
    pub fn new() -> Self {
        Self {
            is_active: true,
            ..Self::default()
        }
    }

    /// Form pre-filled from an existing role.
    pub fn from_role(role: &Role) -> Self {
        Self {
            name: role.name.clone(),
            slug: role.slug.clone(),
            description: role.description.clone(),
            is_active: role.is_active,
            slug_edited: true,
        }
    }

    /// Sets the name and, until the slug is edited by hand, derives the slug from it.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        if !self.slug_edited {
            self.slug = shared::text::generate_slug(&self.name);
        }
    }

    /// Sets the slug explicitly; later name edits keep it.
    pub fn set_slug(&mut self, slug: impl Into<String>) {
        self.slug = slug.into();
        self.slug_edited = true;
    }

    fn normalized_description(&self) -> Option<String> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
    }

    pub fn to_create_request(&self) -> CreateRoleRequest {
        CreateRoleRequest {
            name: self.name.trim().to_string(),
            slug: self.slug.clone(),
            description: self.normalized_description(),
            is_active: self.is_active,
        }
    }

    pub fn to_update_request(&self) -> UpdateRoleRequest {
        UpdateRoleRequest {
            name: self.name.trim().to_string(),
            slug: self.slug.clone(),
            description: self.normalized_description(),
            is_active: self.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request(name: &str, slug: &str) -> CreateRoleRequest {
        CreateRoleRequest {
            name: name.to_string(),
            slug: slug.to_string(),
            description: None,
            is_active: true,
        }
    }

    #[test]
    fn test_create_request_validation() {
        assert!(create_request("Content Editor", "content-editor").validate().is_ok());
    }

    #[test]
    fn test_create_request_validation_empty_name() {
        assert!(create_request("", "editor").validate().is_err());
        assert!(create_request("   ", "editor").validate().is_err());
    }

    #[test]
    fn test_create_request_validation_bad_slug() {
        let errors = create_request("Editor", "Content Editor").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("slug"));
    }

    #[test]
    fn test_update_request_validation_long_description() {
        let request = UpdateRoleRequest {
            name: "Editor".to_string(),
            slug: "editor".to_string(),
            description: Some("x".repeat(501)),
            is_active: false,
        };

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("description"));
    }

    #[test]
    fn test_role_form_derives_slug_from_name() {
        let mut form = RoleForm::new();
        form.set_name("Support Team");
        assert_eq!(form.slug, "support-team");

        form.set_slug("support");
        form.set_name("Support Staff");
        assert_eq!(form.slug, "support");
    }

    #[test]
    fn test_role_form_from_role_keeps_slug() {
        let role = Role {
            id: 2,
            name: "Editor".to_string(),
            slug: "editor_v1".to_string(),
            description: Some("Edits content".to_string()),
            is_active: false,
            created_at: None,
            updated_at: None,
        };

        let mut form = RoleForm::from_role(&role);
        form.set_name("Senior Editor");
        assert_eq!(form.slug, "editor_v1");
        assert!(!form.is_active);
    }

    #[test]
    fn test_role_form_normalizes_description() {
        let mut form = RoleForm::new();
        form.set_name(" Viewer ");
        form.description = Some("   ".to_string());

        let request = form.to_create_request();
        assert_eq!(request.name, "Viewer");
        assert_eq!(request.description, None);
        assert!(request.is_active);
    }

    #[test]
    fn test_role_with_permissions_deserialization() {
        let json = r#"{
            "id": 5,
            "name": "Editor",
            "slug": "editor",
            "description": null,
            "is_active": true,
            "created_at": "2024-03-01T10:00:00Z",
            "permissions": [
                {"id": 1, "slug": "roles.view", "module": "roles", "name": "View Roles"},
                {"id": 2, "slug": "roles.edit", "module": "roles", "name": "Edit Roles",
                 "RolePermission": {"requires_approval": true}}
            ]
        }"#;

        let role: RoleWithPermissions = serde_json::from_str(json).unwrap();
        assert_eq!(role.role.id, 5);
        assert!(role.role.created_at.is_some());
        assert_eq!(role.permissions.len(), 2);
        assert!(role.permissions[1].requires_approval());
    }
}
