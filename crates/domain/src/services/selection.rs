//! Selection state of the role permission editor.
//!
//! Holds the granted permission slugs, the per-module approval flags and
//! the expansion state of the tree, and derives the tri-state value of
//! every group and sub-module checkbox from them.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::debug;

use crate::models::module_group::ModuleGroup;
use crate::models::permission::{
    is_manage_slug, Permission, PermissionAssignment, RolePermissionEntry,
};
use crate::services::permission_tree::PermissionTree;

/// Value of a checkbox that aggregates several permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckState {
    /// No descendant is selected, or there are no descendants.
    Empty,
    /// Some but not all descendants are selected.
    Partial,
    /// Every descendant is selected.
    Full,
}

impl CheckState {
    pub fn is_checked(&self) -> bool {
        matches!(self, CheckState::Full)
    }

    pub fn is_indeterminate(&self) -> bool {
        matches!(self, CheckState::Partial)
    }
}

/// Computes the aggregate state of a set of descendant slugs.
pub fn check_state<'a, I>(descendants: I, selected: &BTreeSet<String>) -> CheckState
where
    I: IntoIterator<Item = &'a str>,
{
    let mut total = 0usize;
    let mut hits = 0usize;
    for slug in descendants {
        total += 1;
        if selected.contains(slug) {
            hits += 1;
        }
    }

    if total == 0 || hits == 0 {
        CheckState::Empty
    } else if hits == total {
        CheckState::Full
    } else {
        CheckState::Partial
    }
}

fn apply<'a>(
    selected: &mut BTreeSet<String>,
    permissions: impl IntoIterator<Item = &'a Permission>,
    checked: bool,
) {
    for permission in permissions {
        if checked {
            selected.insert(permission.slug.clone());
        } else {
            selected.remove(&permission.slug);
        }
    }
}

/// Editable permission state of one role dialog.
#[derive(Debug, Clone, Default)]
pub struct RolePermissionsState {
    tree: PermissionTree,
    selected: BTreeSet<String>,
    approval_modules: BTreeMap<String, bool>,
    expanded_modules: HashSet<ModuleGroup>,
    expanded_sub_modules: HashSet<String>,
}

impl RolePermissionsState {
    pub fn new(tree: PermissionTree) -> Self {
        Self {
            tree,
            ..Self::default()
        }
    }

    pub fn from_permissions(permissions: Vec<Permission>) -> Self {
        Self::new(PermissionTree::build(permissions))
    }

    /// Replaces selection and approval flags with a role's stored grants.
    ///
    /// Approval is module-wide: a module requires approval when any of its
    /// granted permissions was stored with `requires_approval`.
    pub fn seed(&mut self, entries: &[RolePermissionEntry]) {
        self.selected = entries.iter().map(|e| e.permission.slug.clone()).collect();
        self.approval_modules.clear();
        for entry in entries {
            *self
                .approval_modules
                .entry(entry.permission.module.clone())
                .or_insert(false) |= entry.requires_approval();
        }

        debug!(
            selected = self.selected.len(),
            approval_modules = self.approval_modules.len(),
            "Seeded role permissions"
        );
    }

    pub fn tree(&self) -> &PermissionTree {
        &self.tree
    }

    pub fn selected_permission_keys(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn approval_modules(&self) -> &BTreeMap<String, bool> {
        &self.approval_modules
    }

    pub fn is_selected(&self, slug: &str) -> bool {
        self.selected.contains(slug)
    }

    // ------------------------------------------------------------------
    // Tri-state queries
    // ------------------------------------------------------------------

    /// State of a sub-module, addressed by [`SubModule::slug`].
    ///
    /// [`SubModule::slug`]: crate::services::permission_tree::SubModule::slug
    pub fn sub_module_state(&self, sub_module: &str) -> CheckState {
        match self.tree.find_sub_module(sub_module) {
            Some(sub) => check_state(sub.permission_slugs(), &self.selected),
            None => CheckState::Empty,
        }
    }

    pub fn group_state(&self, group: ModuleGroup) -> CheckState {
        match self.tree.group(group) {
            Some(node) => check_state(node.permission_slugs(), &self.selected),
            None => CheckState::Empty,
        }
    }

    /// State of the "All Permissions" checkbox over every known permission.
    pub fn all_state(&self) -> CheckState {
        check_state(
            self.tree.permissions().iter().map(|p| p.slug.as_str()),
            &self.selected,
        )
    }

    // ------------------------------------------------------------------
    // Selection commands
    // ------------------------------------------------------------------

    /// Checks or unchecks one permission.
    ///
    /// A `manage` permission stands for its whole sub-module: checking it
    /// selects every sibling, unchecking it deselects every sibling.
    pub fn set_permission(&mut self, slug: &str, checked: bool) {
        if is_manage_slug(slug) {
            if let Some(sub) = self.tree.sub_module_of(slug) {
                debug!(slug, sub_module = %sub.slug, checked, "Toggled manage permission");
                apply(&mut self.selected, &sub.permissions, checked);
                return;
            }
        }

        if checked {
            self.selected.insert(slug.to_string());
        } else {
            self.selected.remove(slug);
        }
    }

    /// Flips one permission.
    pub fn toggle_permission(&mut self, slug: &str) {
        let checked = !self.is_selected(slug);
        self.set_permission(slug, checked);
    }

    /// Sets every permission of a sub-module.
    pub fn set_sub_module(&mut self, sub_module: &str, checked: bool) {
        if let Some(sub) = self.tree.find_sub_module(sub_module) {
            apply(&mut self.selected, &sub.permissions, checked);
        }
    }

    /// Sets every permission of a group.
    pub fn set_group(&mut self, group: ModuleGroup, checked: bool) {
        if let Some(node) = self.tree.group(group) {
            apply(&mut self.selected, node.all_group_permissions(), checked);
        }
    }

    /// "All Permissions" checkbox.
    ///
    /// Checking selects every known permission and clears all approval
    /// flags. Unchecking clears the selection and keeps the flags.
    pub fn set_all(&mut self, checked: bool) {
        if checked {
            self.selected = self
                .tree
                .permissions()
                .iter()
                .map(|p| p.slug.clone())
                .collect();
            self.approval_modules.clear();
        } else {
            self.selected.clear();
        }
        debug!(checked, selected = self.selected.len(), "Toggled all permissions");
    }

    // ------------------------------------------------------------------
    // Approval flags
    // ------------------------------------------------------------------

    /// True when any raw module of the group requires approval.
    pub fn is_group_approval_enabled(&self, group: ModuleGroup) -> bool {
        self.tree
            .modules_of(group)
            .iter()
            .any(|module| self.module_requires_approval(module))
    }

    /// Moves every raw module of the group to the opposite of the current
    /// aggregate value.
    pub fn toggle_group_approval(&mut self, group: ModuleGroup) {
        let enabled = !self.is_group_approval_enabled(group);
        for module in self.tree.modules_of(group) {
            self.approval_modules.insert(module.clone(), enabled);
        }
        debug!(group = %group, enabled, "Toggled group approval");
    }

    pub fn module_requires_approval(&self, module: &str) -> bool {
        self.approval_modules.get(module).copied().unwrap_or(false)
    }

    pub fn set_module_approval(&mut self, module: &str, required: bool) {
        self.approval_modules.insert(module.to_string(), required);
    }

    // ------------------------------------------------------------------
    // Expansion state
    // ------------------------------------------------------------------

    pub fn toggle_group_expanded(&mut self, group: ModuleGroup) {
        if !self.expanded_modules.remove(&group) {
            self.expanded_modules.insert(group);
        }
    }

    pub fn is_group_expanded(&self, group: ModuleGroup) -> bool {
        self.expanded_modules.contains(&group)
    }

    pub fn toggle_sub_module_expanded(&mut self, sub_module: &str) {
        if !self.expanded_sub_modules.remove(sub_module) {
            self.expanded_sub_modules.insert(sub_module.to_string());
        }
    }

    pub fn is_sub_module_expanded(&self, sub_module: &str) -> bool {
        self.expanded_sub_modules.contains(sub_module)
    }

    // ------------------------------------------------------------------
    // Payload
    // ------------------------------------------------------------------

    /// Builds the replace-all assignment list from the current state.
    ///
    /// Slugs that match no known permission are skipped.
    pub fn build_assignments(&self) -> Vec<PermissionAssignment> {
        self.selected
            .iter()
            .filter_map(|slug| {
                let permission = self.tree.find_by_slug(slug);
                if permission.is_none() {
                    debug!(slug = %slug, "Dropping unknown permission from payload");
                }
                permission
            })
            .map(|permission| PermissionAssignment {
                permission_id: permission.id,
                requires_approval: self.module_requires_approval(&permission.module),
            })
            .collect()
    }
}
