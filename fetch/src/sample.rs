use arbor_tree::{Forest, TreeNode};
use std::sync::Arc;

/// Demo seed: a Documents folder with two unloaded children plus two unloaded
/// top-level folders.
pub fn sample_forest() -> Forest {
    vec![
        TreeNode::new("1", "Documents").with_children(vec![
            TreeNode::new("1-1", "Work"),
            TreeNode::new("1-2", "Personal"),
        ]),
        TreeNode::new("2", "Projects"),
        TreeNode::new("3", "Photos"),
    ]
    .into_iter()
    .map(Arc::new)
    .collect()
}
