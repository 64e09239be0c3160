//! Permission tree construction.
//!
//! Turns the flat permission list fetched from the API into the
//! group → sub-module → permission tree rendered by the role editor.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::models::module_group::{classify_module, modules_for_group, ModuleGroup};
use crate::models::permission::Permission;
use shared::text::{humanize, to_snake_key};

/// Raw module whose permissions are split into virtual sections.
pub const SETTINGS_MODULE: &str = "settings";

/// Section key used when neither slug nor name yields one.
const FALLBACK_SECTION: &str = "general";

lazy_static::lazy_static! {
    static ref SLUG_ACTION_SUFFIX: regex::Regex =
        regex::Regex::new(r"(?:^|[_.\-])(?:view|create|edit|delete|manage|all)$").unwrap();
    static ref NAME_ACTION_SUFFIX: regex::Regex =
        regex::Regex::new(r"(?i)\s*\b(?:view|create|edit|delete|manage|all)\s*$").unwrap();
}

/// One sub-module of a group: a raw module, or a settings section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubModule {
    /// Identifier, unique across the tree: the raw module name, or
    /// `settings.<key>` for settings sections
    pub slug: String,
    /// Raw module name, or the section key for settings sections
    pub key: String,
    pub name: String,
    /// Raw module the permissions come from
    pub module: String,
    pub permissions: Vec<Permission>,
}

impl SubModule {
    pub fn permission_slugs(&self) -> impl Iterator<Item = &str> {
        self.permissions.iter().map(|p| p.slug.as_str())
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.permissions.iter().any(|p| p.slug == slug)
    }

    /// Permissions in rendering order: `manage` first, the rest as received.
    pub fn display_permissions(&self) -> Vec<&Permission> {
        let mut permissions: Vec<&Permission> = self.permissions.iter().collect();
        permissions.sort_by_key(|p| !p.is_manage());
        permissions
    }
}

/// A module group with its sub-modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleGroupNode {
    pub group: ModuleGroup,
    /// Raw modules classified into this group
    pub modules: Vec<String>,
    pub sub_modules: Vec<SubModule>,
}

impl ModuleGroupNode {
    pub fn slug(&self) -> &'static str {
        self.group.slug()
    }

    pub fn name(&self) -> &'static str {
        self.group.display_name()
    }

    /// Every permission under this group, flattened across sub-modules.
    pub fn all_group_permissions(&self) -> impl Iterator<Item = &Permission> {
        self.sub_modules.iter().flat_map(|s| s.permissions.iter())
    }

    pub fn permission_slugs(&self) -> impl Iterator<Item = &str> {
        self.all_group_permissions().map(|p| p.slug.as_str())
    }
}

/// The full permission tree plus the flat list it was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionTree {
    permissions: Vec<Permission>,
    groups: Vec<ModuleGroupNode>,
    orphaned_modules: Vec<String>,
}

impl PermissionTree {
    /// Builds the tree. Output order is fixed group order, then sub-module
    /// discovery order, then the order of `permissions`.
    pub fn build(permissions: Vec<Permission>) -> Self {
        let grouped = group_by_module(&permissions);
        let raw_modules: Vec<&str> = grouped.iter().map(|(m, _)| *m).collect();

        let mut groups = Vec::new();

        for group in ModuleGroup::all() {
            let modules = modules_for_group(*group, &raw_modules);
            let mut sub_modules = Vec::new();

            for module in &modules {
                let Some((_, module_permissions)) =
                    grouped.iter().find(|(m, _)| *m == module.as_str())
                else {
                    continue;
                };
                if module == SETTINGS_MODULE {
                    sub_modules.extend(settings_sections(module_permissions));
                } else {
                    sub_modules.push(SubModule {
                        slug: module.clone(),
                        key: module.clone(),
                        name: humanize(module),
                        module: module.clone(),
                        permissions: module_permissions.iter().map(|p| (*p).clone()).collect(),
                    });
                }
            }

            if sub_modules.is_empty() {
                continue;
            }
            groups.push(ModuleGroupNode {
                group: *group,
                modules,
                sub_modules,
            });
        }

        let orphaned_modules: Vec<String> = raw_modules
            .iter()
            .filter(|m| classify_module(m).is_none())
            .map(|m| m.to_string())
            .collect();
        if !orphaned_modules.is_empty() {
            warn!(
                modules = ?orphaned_modules,
                "Permission modules match no module group and are hidden from the tree"
            );
        }

        debug!(
            permissions = permissions.len(),
            groups = groups.len(),
            "Built permission tree"
        );

        Self {
            permissions,
            groups,
            orphaned_modules,
        }
    }

    /// Every known permission, including those of orphaned modules.
    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    pub fn groups(&self) -> &[ModuleGroupNode] {
        &self.groups
    }

    pub fn group(&self, group: ModuleGroup) -> Option<&ModuleGroupNode> {
        self.groups.iter().find(|node| node.group == group)
    }

    /// Raw modules that match no group; their permissions are not rendered.
    pub fn orphaned_modules(&self) -> &[String] {
        &self.orphaned_modules
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<&Permission> {
        self.permissions.iter().find(|p| p.slug == slug)
    }

    pub fn find_sub_module(&self, slug: &str) -> Option<&SubModule> {
        self.groups
            .iter()
            .flat_map(|g| g.sub_modules.iter())
            .find(|s| s.slug == slug)
    }

    /// Sub-module that renders the given permission.
    pub fn sub_module_of(&self, permission_slug: &str) -> Option<&SubModule> {
        self.groups
            .iter()
            .flat_map(|g| g.sub_modules.iter())
            .find(|s| s.contains(permission_slug))
    }

    /// Raw modules of a group, as used for approval flags.
    pub fn modules_of(&self, group: ModuleGroup) -> &[String] {
        self.group(group).map(|g| g.modules.as_slice()).unwrap_or(&[])
    }
}

/// Groups permissions by raw module, in first-seen module order.
pub fn group_by_module(permissions: &[Permission]) -> Vec<(&str, Vec<&Permission>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut grouped: Vec<(&str, Vec<&Permission>)> = Vec::new();

    for permission in permissions {
        let module = permission.module.as_str();
        match index.get(module) {
            Some(&i) => grouped[i].1.push(permission),
            None => {
                index.insert(module, grouped.len());
                grouped.push((module, vec![permission]));
            }
        }
    }

    grouped
}

/// Section key and label of a settings permission.
///
/// The slug is tried first ("settings.optimize_settings_view" gives
/// "optimize_settings"), then the display name ("Optimize Settings View"
/// gives "Optimize Settings").
pub fn settings_section(permission: &Permission) -> (String, String) {
    let rest = permission
        .slug
        .strip_prefix("settings.")
        .unwrap_or(&permission.slug);
    let from_slug = SLUG_ACTION_SUFFIX.replace(rest, "");
    let key = to_snake_key(&from_slug);
    if !key.is_empty() {
        return (key, humanize(from_slug.trim()));
    }

    let from_name = NAME_ACTION_SUFFIX.replace(permission.name.trim(), "");
    let key = to_snake_key(&from_name);
    if !key.is_empty() {
        return (key, humanize(from_name.trim()));
    }

    (FALLBACK_SECTION.to_string(), humanize(FALLBACK_SECTION))
}

/// Splits the settings module into virtual sub-modules by section.
fn settings_sections(permissions: &[&Permission]) -> Vec<SubModule> {
    let mut sections: Vec<SubModule> = Vec::new();

    for permission in permissions {
        let (key, label) = settings_section(permission);
        match sections.iter_mut().find(|s| s.key == key) {
            Some(section) => section.permissions.push((*permission).clone()),
            None => sections.push(SubModule {
                slug: format!("{}.{}", SETTINGS_MODULE, key),
                key,
                name: label,
                module: permission.module.clone(),
                permissions: vec![(*permission).clone()],
            }),
        }
    }

    sections
}
