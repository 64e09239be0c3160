//! Module group taxonomy for the permission tree.
//!
//! The server attaches a free-form `module` string to every permission.
//! The editor folds those raw modules into a fixed set of display groups
//! using the keyword table below.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Display groups of the permission tree, in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleGroup {
    Settings,
    UsersRoles,
    Cms,
    Localization,
    Appearance,
    System,
}

/// Keywords per group. A raw module belongs to the first group that has a
/// keyword which prefixes one of the module's words.
pub const GROUP_KEYWORDS: &[(ModuleGroup, &[&str])] = &[
    (ModuleGroup::Settings, &["setting", "config", "smtp", "seo"]),
    (
        ModuleGroup::UsersRoles,
        &["user", "role", "permission", "profile", "admin"],
    ),
    (
        ModuleGroup::Cms,
        &[
            "announcement",
            "blog",
            "company",
            "companies",
            "content",
            "faq",
            "media",
            "page",
            "post",
            "template",
            "testimonial",
        ],
    ),
    (
        ModuleGroup::Localization,
        &["language", "translation", "locale", "localization"],
    ),
    (
        ModuleGroup::Appearance,
        &["appearance", "theme", "menu", "logo", "branding"],
    ),
    (
        ModuleGroup::System,
        &["plugin", "system", "log", "backup", "cache", "maintenance", "activity"],
    ),
];

impl ModuleGroup {
    /// All groups in rendering order.
    pub fn all() -> &'static [ModuleGroup] {
        &[
            ModuleGroup::Settings,
            ModuleGroup::UsersRoles,
            ModuleGroup::Cms,
            ModuleGroup::Localization,
            ModuleGroup::Appearance,
            ModuleGroup::System,
        ]
    }

    pub fn slug(&self) -> &'static str {
        match self {
            ModuleGroup::Settings => "settings",
            ModuleGroup::UsersRoles => "users_roles",
            ModuleGroup::Cms => "cms",
            ModuleGroup::Localization => "localization",
            ModuleGroup::Appearance => "appearance",
            ModuleGroup::System => "system",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ModuleGroup::Settings => "Settings",
            ModuleGroup::UsersRoles => "Users & Roles",
            ModuleGroup::Cms => "Content",
            ModuleGroup::Localization => "Localization",
            ModuleGroup::Appearance => "Appearance",
            ModuleGroup::System => "System",
        }
    }

    /// Keywords of this group from [`GROUP_KEYWORDS`].
    pub fn keywords(&self) -> &'static [&'static str] {
        GROUP_KEYWORDS
            .iter()
            .find(|(group, _)| group == self)
            .map(|(_, keywords)| *keywords)
            .unwrap_or(&[])
    }

    /// Whether the raw module matches one of this group's keywords.
    ///
    /// This ignores precedence between groups; use [`classify_module`]
    /// to find the group a module is actually rendered under.
    pub fn matches(&self, module: &str) -> bool {
        let module = module.to_lowercase();
        let keywords = self.keywords();
        module
            .split(['_', '-', '.', ' '])
            .filter(|word| !word.is_empty())
            .any(|word| keywords.iter().any(|keyword| word.starts_with(keyword)))
    }
}

impl FromStr for ModuleGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "settings" => Ok(ModuleGroup::Settings),
            "users_roles" | "users" => Ok(ModuleGroup::UsersRoles),
            "cms" | "content" => Ok(ModuleGroup::Cms),
            "localization" => Ok(ModuleGroup::Localization),
            "appearance" => Ok(ModuleGroup::Appearance),
            "system" => Ok(ModuleGroup::System),
            _ => Err(format!("Unknown module group: {}", s)),
        }
    }
}

impl std::fmt::Display for ModuleGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// Returns the group a raw module is rendered under, if any.
pub fn classify_module(module: &str) -> Option<ModuleGroup> {
    ModuleGroup::all()
        .iter()
        .copied()
        .find(|group| group.matches(module))
}

/// Raw modules (from `all_modules`, order preserved) that belong to `group`.
pub fn modules_for_group<S: AsRef<str>>(group: ModuleGroup, all_modules: &[S]) -> Vec<String> {
    all_modules
        .iter()
        .map(AsRef::as_ref)
        .filter(|module| classify_module(module) == Some(group))
        .map(str::to_string)
        .collect()
}
