use std::sync::Arc;

use crate::NodeId;

/// Ordered root-level nodes. Nodes are shared by `Arc` so that unchanged
/// subtrees are reused between successive versions.
pub type Forest = Vec<Arc<TreeNode>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub id: NodeId,
    pub name: String,
    /// `None` means no children are attached yet, which is not the same as
    /// knowing there are none (`children_loaded` with `None`).
    pub children: Option<Vec<Arc<TreeNode>>>,
    pub is_expanded: bool,
    pub children_loaded: bool,
    pub is_loading: bool,
    pub is_editing: bool,
}

/// Where a node sits in the toggle state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    /// Children unknown, expanding requires a fetch.
    Unloaded,
    /// A fetch is in flight.
    Loading,
    Collapsed,
    Expanded,
}

/// Drag source payload: the dragged node and its nesting depth (0 for roots).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragItem {
    pub id: NodeId,
    pub depth: usize,
}

impl TreeNode {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children: None,
            is_expanded: false,
            children_loaded: false,
            is_loading: false,
            is_editing: false,
        }
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = Some(children.into_iter().map(Arc::new).collect());
        self
    }

    pub fn expanded(mut self, is_expanded: bool) -> Self {
        self.is_expanded = is_expanded;
        self
    }

    pub fn loaded(mut self, children_loaded: bool) -> Self {
        self.children_loaded = children_loaded;
        self
    }

    pub fn children(&self) -> &[Arc<TreeNode>] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    pub fn expansion(&self) -> Expansion {
        if self.is_loading {
            Expansion::Loading
        } else if self.children.is_none() && !self.children_loaded {
            Expansion::Unloaded
        } else if self.is_expanded {
            Expansion::Expanded
        } else {
            Expansion::Collapsed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_node_is_unloaded_leaf() {
        let node = TreeNode::new("2", "Projects");
        assert!(node.is_leaf());
        assert_eq!(node.expansion(), Expansion::Unloaded);
    }

    #[test]
    fn loaded_without_children_is_collapsible() {
        let node = TreeNode::new("2", "Projects").loaded(true);
        assert_eq!(node.expansion(), Expansion::Collapsed);
        assert_eq!(node.expanded(true).expansion(), Expansion::Expanded);
    }

    #[test]
    fn static_children_count_as_known() {
        let node =
            TreeNode::new("1", "Documents").with_children(vec![TreeNode::new("1-1", "Work")]);
        assert!(!node.is_leaf());
        assert_eq!(node.expansion(), Expansion::Collapsed);
    }

    #[test]
    fn loading_wins_over_everything() {
        let mut node = TreeNode::new("3", "Photos").expanded(true);
        node.is_loading = true;
        assert_eq!(node.expansion(), Expansion::Loading);
    }
}
