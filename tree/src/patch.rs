use std::sync::Arc;

use crate::TreeNode;

/// Partial update for a [`TreeNode`]. Absent fields leave the node's prior value.
///
/// `children` is doubly optional: `Some(None)` detaches the children,
/// `Some(Some(..))` replaces them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePatch {
    pub name: Option<String>,
    pub children: Option<Option<Vec<Arc<TreeNode>>>>,
    pub is_expanded: Option<bool>,
    pub children_loaded: Option<bool>,
    pub is_loading: Option<bool>,
    pub is_editing: Option<bool>,
}

impl NodePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = Some(Some(children.into_iter().map(Arc::new).collect()));
        self
    }

    pub fn clear_children(mut self) -> Self {
        self.children = Some(None);
        self
    }

    pub fn expanded(mut self, is_expanded: bool) -> Self {
        self.is_expanded = Some(is_expanded);
        self
    }

    pub fn children_loaded(mut self, children_loaded: bool) -> Self {
        self.children_loaded = Some(children_loaded);
        self
    }

    pub fn loading(mut self, is_loading: bool) -> Self {
        self.is_loading = Some(is_loading);
        self
    }

    pub fn editing(mut self, is_editing: bool) -> Self {
        self.is_editing = Some(is_editing);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Combine two patches; fields set in `later` override those in `self`.
    pub fn merge(self, later: NodePatch) -> NodePatch {
        NodePatch {
            name: later.name.or(self.name),
            children: later.children.or(self.children),
            is_expanded: later.is_expanded.or(self.is_expanded),
            children_loaded: later.children_loaded.or(self.children_loaded),
            is_loading: later.is_loading.or(self.is_loading),
            is_editing: later.is_editing.or(self.is_editing),
        }
    }

    pub fn apply(&self, node: &TreeNode) -> TreeNode {
        TreeNode {
            id: node.id.clone(),
            name: self.name.clone().unwrap_or_else(|| node.name.clone()),
            children: match &self.children {
                Some(children) => children.clone(),
                None => node.children.clone(),
            },
            is_expanded: self.is_expanded.unwrap_or(node.is_expanded),
            children_loaded: self.children_loaded.unwrap_or(node.children_loaded),
            is_loading: self.is_loading.unwrap_or(node.is_loading),
            is_editing: self.is_editing.unwrap_or(node.is_editing),
        }
    }
}
