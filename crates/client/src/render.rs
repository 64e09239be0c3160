//! Plain-text rendering of a role's permission tree.

use std::fmt;

use domain::services::{CheckState, RolePermissionsState};

fn marker(state: CheckState) -> &'static str {
    match state {
        CheckState::Full => "[x]",
        CheckState::Partial => "[-]",
        CheckState::Empty => "[ ]",
    }
}

fn leaf_marker(selected: bool) -> &'static str {
    if selected {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Text view of the tree, one line per group, sub-module and permission.
///
/// Groups whose approval toggle is on are tagged `(approval)`. Modules that
/// matched no group are listed at the end.
pub struct TreeView<'a>(pub &'a RolePermissionsState);

impl fmt::Display for TreeView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0;
        let tree = state.tree();

        writeln!(f, "{} All Permissions", marker(state.all_state()))?;

        for node in tree.groups() {
            let approval = if state.is_group_approval_enabled(node.group) {
                " (approval)"
            } else {
                ""
            };
            writeln!(
                f,
                "  {} {}{}",
                marker(state.group_state(node.group)),
                node.name(),
                approval
            )?;

            for sub_module in &node.sub_modules {
                writeln!(
                    f,
                    "    {} {}",
                    marker(state.sub_module_state(&sub_module.slug)),
                    sub_module.name
                )?;
                for permission in sub_module.display_permissions() {
                    writeln!(
                        f,
                        "      {} {}",
                        leaf_marker(state.is_selected(&permission.slug)),
                        permission.label()
                    )?;
                }
            }
        }

        let orphaned = tree.orphaned_modules();
        if !orphaned.is_empty() {
            writeln!(f, "Ungrouped modules: {}", orphaned.join(", "))?;
        }

        Ok(())
    }
}

/// Renders the tree as a string; see [`TreeView`].
pub fn render_tree(state: &RolePermissionsState) -> String {
    TreeView(state).to_string()
}
