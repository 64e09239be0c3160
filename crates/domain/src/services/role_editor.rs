//! Role editor: role metadata plus permission selection, and the save flow.
//!
//! Saving is two sequential calls against a [`RoleService`]: the role is
//! created or updated first, and only when that succeeds is its permission
//! set replaced with the current selection.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tracing::{info, warn};
use validator::Validate;

use crate::models::permission::{AssignPermissionsRequest, Permission};
use crate::models::role::{
    CreateRoleRequest, Role, RoleForm, RoleWithPermissions, UpdateRoleRequest,
};
use crate::services::selection::RolePermissionsState;

/// Errors reported by a [`RoleService`] implementation.
#[derive(Debug, Error)]
pub enum RoleServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected response: {0}")]
    Unexpected(String),
}

/// Role and permission endpoints of the dashboard API.
#[async_trait::async_trait]
pub trait RoleService: Send + Sync {
    /// Every permission that can be granted.
    async fn list_permissions(&self) -> Result<Vec<Permission>, RoleServiceError>;

    /// A role with its granted permissions.
    async fn get_role(&self, role_id: i64) -> Result<RoleWithPermissions, RoleServiceError>;

    async fn create_role(&self, request: &CreateRoleRequest) -> Result<Role, RoleServiceError>;

    async fn update_role(
        &self,
        role_id: i64,
        request: &UpdateRoleRequest,
    ) -> Result<Role, RoleServiceError>;

    /// Replaces the role's entire permission set.
    async fn assign_permissions(
        &self,
        request: &AssignPermissionsRequest,
    ) -> Result<(), RoleServiceError>;
}

/// Errors from [`RoleEditor::submit`].
#[derive(Debug, Error)]
pub enum SaveRoleError {
    #[error("Invalid role: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Failed to save role: {0}")]
    RoleSave(#[source] RoleServiceError),

    #[error("Role {role_id} saved but assigning permissions failed: {source}")]
    PermissionAssignment {
        role_id: i64,
        #[source]
        source: RoleServiceError,
    },
}

/// Whether the editor creates a new role or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit { role_id: i64 },
}

/// State of one role dialog.
#[derive(Debug, Clone)]
pub struct RoleEditor {
    mode: EditorMode,
    pub form: RoleForm,
    pub permissions: RolePermissionsState,
}

impl RoleEditor {
    /// Editor for a new role.
    pub fn new(permissions: Vec<Permission>) -> Self {
        Self {
            mode: EditorMode::Create,
            form: RoleForm::new(),
            permissions: RolePermissionsState::from_permissions(permissions),
        }
    }

    /// Editor for an existing role, seeded with its stored grants.
    pub fn for_role(role: &RoleWithPermissions, permissions: Vec<Permission>) -> Self {
        let mut state = RolePermissionsState::from_permissions(permissions);
        state.seed(&role.permissions);
        Self {
            mode: EditorMode::Edit {
                role_id: role.role.id,
            },
            form: RoleForm::from_role(&role.role),
            permissions: state,
        }
    }

    /// Fetches the permission list (and the role, when editing) and builds an editor.
    pub async fn load(
        service: &dyn RoleService,
        role_id: Option<i64>,
    ) -> Result<Self, RoleServiceError> {
        let permissions = service.list_permissions().await?;
        match role_id {
            Some(role_id) => {
                let role = service.get_role(role_id).await?;
                Ok(Self::for_role(&role, permissions))
            }
            None => Ok(Self::new(permissions)),
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// Validates the form, saves the role, then replaces its permissions.
    ///
    /// The permission call is only made after the role call succeeds. After
    /// a successful create the editor switches to edit mode, so a retry
    /// after a failed assignment updates the role it already created.
    pub async fn submit(&mut self, service: &dyn RoleService) -> Result<Role, SaveRoleError> {
        let role = match self.mode {
            EditorMode::Create => {
                let request = self.form.to_create_request();
                request.validate()?;
                let role = service
                    .create_role(&request)
                    .await
                    .map_err(SaveRoleError::RoleSave)?;
                info!(role_id = role.id, slug = %role.slug, "Created role");
                self.mode = EditorMode::Edit { role_id: role.id };
                role
            }
            EditorMode::Edit { role_id } => {
                let request = self.form.to_update_request();
                request.validate()?;
                let role = service
                    .update_role(role_id, &request)
                    .await
                    .map_err(SaveRoleError::RoleSave)?;
                info!(role_id = role.id, slug = %role.slug, "Updated role");
                role
            }
        };

        let request = AssignPermissionsRequest {
            role_id: role.id,
            permissions: self.permissions.build_assignments(),
        };
        if let Err(e) = service.assign_permissions(&request).await {
            warn!(role_id = role.id, error = %e, "Failed to assign role permissions");
            return Err(SaveRoleError::PermissionAssignment {
                role_id: role.id,
                source: e,
            });
        }

        info!(
            role_id = role.id,
            permissions = request.permissions.len(),
            "Assigned role permissions"
        );
        Ok(role)
    }
}

/// Step of the save flow, used to make [`MockRoleService`] fail on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockStep {
    ListPermissions,
    GetRole,
    CreateRole,
    UpdateRole,
    AssignPermissions,
}

/// In-memory role service for development and testing.
///
/// Records every call in order and can be told to fail one step.
#[derive(Debug, Default)]
pub struct MockRoleService {
    permissions: Vec<Permission>,
    roles: Mutex<Vec<RoleWithPermissions>>,
    calls: Mutex<Vec<MockStep>>,
    assignments: Mutex<Vec<AssignPermissionsRequest>>,
    fail_on: Option<MockStep>,
    next_id: AtomicI64,
}

impl MockRoleService {
    pub fn new(permissions: Vec<Permission>) -> Self {
        Self {
            permissions,
            next_id: AtomicI64::new(1),
            ..Self::default()
        }
    }

    /// Adds a stored role.
    pub fn with_role(self, role: RoleWithPermissions) -> Self {
        let next = self.next_id.load(Ordering::SeqCst).max(role.role.id + 1);
        self.next_id.store(next, Ordering::SeqCst);
        self.roles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(role);
        self
    }

    /// Makes the given step return an error.
    pub fn failing_on(mut self, step: MockStep) -> Self {
        self.fail_on = Some(step);
        self
    }

    /// Steps called so far, in order.
    pub fn calls(&self) -> Vec<MockStep> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Assignment requests received so far.
    pub fn assignments(&self) -> Vec<AssignPermissionsRequest> {
        self.assignments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, step: MockStep) -> Result<(), RoleServiceError> {
        lock(&self.calls)?.push(step);
        if self.fail_on == Some(step) {
            warn!(step = ?step, "Mock role service simulating failure");
            return Err(RoleServiceError::Transport("Simulated failure".to_string()));
        }
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RoleServiceError> {
    mutex
        .lock()
        .map_err(|_| RoleServiceError::Unexpected("Mock role service state poisoned".to_string()))
}

#[async_trait::async_trait]
impl RoleService for MockRoleService {
    async fn list_permissions(&self) -> Result<Vec<Permission>, RoleServiceError> {
        self.record(MockStep::ListPermissions)?;
        Ok(self.permissions.clone())
    }

    async fn get_role(&self, role_id: i64) -> Result<RoleWithPermissions, RoleServiceError> {
        self.record(MockStep::GetRole)?;
        lock(&self.roles)?
            .iter()
            .find(|r| r.role.id == role_id)
            .cloned()
            .ok_or_else(|| RoleServiceError::NotFound(format!("Role {} not found", role_id)))
    }

    async fn create_role(&self, request: &CreateRoleRequest) -> Result<Role, RoleServiceError> {
        self.record(MockStep::CreateRole)?;
        let mut roles = lock(&self.roles)?;
        if roles.iter().any(|r| r.role.slug == request.slug) {
            return Err(RoleServiceError::Conflict(format!(
                "Role slug '{}' already exists",
                request.slug
            )));
        }

        let role = Role {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: request.name.clone(),
            slug: request.slug.clone(),
            description: request.description.clone(),
            is_active: request.is_active,
            created_at: None,
            updated_at: None,
        };
        roles.push(RoleWithPermissions {
            role: role.clone(),
            permissions: Vec::new(),
        });
        Ok(role)
    }

    async fn update_role(
        &self,
        role_id: i64,
        request: &UpdateRoleRequest,
    ) -> Result<Role, RoleServiceError> {
        self.record(MockStep::UpdateRole)?;
        let mut roles = lock(&self.roles)?;
        let stored = roles
            .iter_mut()
            .find(|r| r.role.id == role_id)
            .ok_or_else(|| RoleServiceError::NotFound(format!("Role {} not found", role_id)))?;

        stored.role.name = request.name.clone();
        stored.role.slug = request.slug.clone();
        stored.role.description = request.description.clone();
        stored.role.is_active = request.is_active;
        Ok(stored.role.clone())
    }

    async fn assign_permissions(
        &self,
        request: &AssignPermissionsRequest,
    ) -> Result<(), RoleServiceError> {
        self.record(MockStep::AssignPermissions)?;
        lock(&self.assignments)?.push(request.clone());
        Ok(())
    }
}
