use arbor_tree::{Expansion, TreeNode};
use std::{fmt::Display, sync::Arc};
use termtree::Tree as DisplayTree;

/// Text rendering of a forest, one tree per root. Children of nodes that are
/// not expanded are hidden.
#[derive(Debug, Clone, Copy)]
pub struct ForestView<'a>(pub &'a [Arc<TreeNode>]);

impl Display for ForestView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "(empty)");
        }
        for root in self.0 {
            display_tree(root).fmt(f)?;
        }
        Ok(())
    }
}

/// `▾` expanded, `▸` collapsed or not loaded yet, `…` loading, `·` loaded
/// without children.
pub fn marker(node: &TreeNode) -> &'static str {
    match node.expansion() {
        Expansion::Loading => "…",
        _ if node.children_loaded && node.is_leaf() => "·",
        Expansion::Expanded => "▾",
        Expansion::Collapsed | Expansion::Unloaded => "▸",
    }
}

pub fn label(node: &TreeNode) -> String {
    let mut label = format!("{} {} ({})", marker(node), node.name, node.id);
    if node.is_editing {
        label.push_str(" ✎");
    }
    label
}

fn display_tree(node: &TreeNode) -> DisplayTree<String> {
    let tree = DisplayTree::new(label(node));
    if node.expansion() == Expansion::Expanded {
        tree.with_leaves(node.children().iter().map(|child| display_tree(child)))
    } else {
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forest(nodes: Vec<TreeNode>) -> Vec<Arc<TreeNode>> {
        nodes.into_iter().map(Arc::new).collect()
    }

    #[test]
    fn markers_follow_expansion() {
        let mut loading = TreeNode::new("a", "A");
        loading.is_loading = true;

        assert_eq!(marker(&TreeNode::new("a", "A")), "▸");
        assert_eq!(marker(&loading), "…");
        assert_eq!(marker(&TreeNode::new("a", "A").loaded(true)), "·");
        let expanded = TreeNode::new("a", "A")
            .with_children(vec![TreeNode::new("b", "B")])
            .expanded(true);
        assert_eq!(marker(&expanded), "▾");
    }

    #[test]
    fn label_flags_editing() {
        let mut node = TreeNode::new("1", "Documents");
        node.is_editing = true;
        assert_eq!(label(&node), "▸ Documents (1) ✎");
    }

    #[test]
    fn collapsed_children_are_hidden() {
        let nodes = forest(vec![
            TreeNode::new("1", "Documents").with_children(vec![TreeNode::new("1-1", "Work")]),
            TreeNode::new("2", "Projects"),
        ]);
        let text = ForestView(&nodes).to_string();
        assert!(text.contains("▸ Documents (1)"));
        assert!(text.contains("▸ Projects (2)"));
        assert!(!text.contains("Work"));
    }

    #[test]
    fn expanded_children_are_drawn() {
        let nodes = forest(vec![
            TreeNode::new("1", "Documents")
                .with_children(vec![
                    TreeNode::new("1-1", "Work"),
                    TreeNode::new("1-2", "Personal"),
                ])
                .expanded(true),
        ]);
        let text = ForestView(&nodes).to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "▾ Documents (1)");
        assert!(lines[1].ends_with("▸ Work (1-1)"));
        assert!(lines[2].ends_with("▸ Personal (1-2)"));
    }

    #[test]
    fn empty_forest() {
        assert_eq!(ForestView(&[]).to_string(), "(empty)\n");
    }
}
