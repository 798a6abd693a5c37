//! Pure transformations over a [`Forest`].
//!
//! Every operation returns a new forest and leaves its input untouched. Nodes
//! along the path to a change are rebuilt; every other node is the same `Arc`
//! as in the input. An operation that does not apply returns the input's
//! `Arc`s as they were.

use displaydoc::Display;
use std::sync::Arc;
use thiserror::Error;

use crate::{Forest, NodeId, NodePatch, TreeNode};

#[derive(Debug, Clone, PartialEq, Eq, Error, Display)]
pub enum MoveError {
    /// Node to move not found: {0}
    SourceNotFound(NodeId),
    /// Target parent not found: {0}
    TargetNotFound(NodeId),
    /// Cannot move node {0} into itself
    OntoItself(NodeId),
    /// Cannot move node {node} into its own descendant {descendant}
    IntoDescendant { node: NodeId, descendant: NodeId },
}

/// Depth-first, pre-order search.
pub fn find<'a>(forest: &'a [Arc<TreeNode>], id: &NodeId) -> Option<&'a Arc<TreeNode>> {
    for node in forest {
        if &node.id == id {
            return Some(node);
        }
        if let Some(found) = find(node.children(), id) {
            return Some(found);
        }
    }
    None
}

pub fn contains(forest: &[Arc<TreeNode>], id: &NodeId) -> bool {
    find(forest, id).is_some()
}

/// Id of the direct parent, `None` for roots and missing nodes.
pub fn find_parent_id<'a>(forest: &'a [Arc<TreeNode>], id: &NodeId) -> Option<&'a NodeId> {
    for node in forest {
        if node.children().iter().any(|child| &child.id == id) {
            return Some(&node.id);
        }
        if let Some(parent_id) = find_parent_id(node.children(), id) {
            return Some(parent_id);
        }
    }
    None
}

pub fn depth_of(forest: &[Arc<TreeNode>], id: &NodeId) -> Option<usize> {
    fn walk(nodes: &[Arc<TreeNode>], id: &NodeId, depth: usize) -> Option<usize> {
        nodes.iter().find_map(|node| {
            if &node.id == id {
                Some(depth)
            } else {
                walk(node.children(), id, depth + 1)
            }
        })
    }
    walk(forest, id, 0)
}

/// Whether `id` lies strictly inside the subtree rooted at `ancestor_id`.
pub fn is_descendant(forest: &[Arc<TreeNode>], ancestor_id: &NodeId, id: &NodeId) -> bool {
    find(forest, ancestor_id).is_some_and(|ancestor| contains(ancestor.children(), id))
}

/// Pre-order list of every id in the forest.
pub fn flatten_ids(forest: &[Arc<TreeNode>]) -> Vec<NodeId> {
    fn collect(nodes: &[Arc<TreeNode>], ids: &mut Vec<NodeId>) {
        for node in nodes {
            ids.push(node.id.clone());
            collect(node.children(), ids);
        }
    }
    let mut ids = Vec::new();
    collect(forest, &mut ids);
    ids
}

pub fn update(forest: &[Arc<TreeNode>], id: &NodeId, patch: &NodePatch) -> Forest {
    map_node(forest, id, &|node: &TreeNode| patch.apply(node)).unwrap_or_else(|| forest.to_vec())
}

pub fn toggle_expansion(forest: &[Arc<TreeNode>], id: &NodeId) -> Forest {
    map_node(forest, id, &|node: &TreeNode| TreeNode {
        is_expanded: !node.is_expanded,
        ..node.clone()
    })
    .unwrap_or_else(|| forest.to_vec())
}

pub fn set_loading(forest: &[Arc<TreeNode>], id: &NodeId, is_loading: bool) -> Forest {
    update(forest, id, &NodePatch::new().loading(is_loading))
}

/// Append `child` to the parent's children and expand the parent.
pub fn add_child(forest: &[Arc<TreeNode>], parent_id: &NodeId, child: TreeNode) -> Forest {
    let child = Arc::new(child);
    map_node(forest, parent_id, &|parent: &TreeNode| {
        let mut children = parent.children().to_vec();
        children.push(Arc::clone(&child));
        TreeNode {
            children: Some(children),
            is_expanded: true,
            ..parent.clone()
        }
    })
    .unwrap_or_else(|| forest.to_vec())
}

/// Remove the node and its whole subtree. A parent left without children has
/// its `children` cleared to `None`.
pub fn delete_subtree(forest: &[Arc<TreeNode>], id: &NodeId) -> Forest {
    match remove_node(forest, id) {
        Some((next, _removed)) => next,
        None => forest.to_vec(),
    }
}

/// Move `source_id` with its subtree under `target_parent_id` (or to the roots
/// when `None`) at `target_index`. Rejected moves leave the forest unchanged.
pub fn move_subtree(
    forest: &[Arc<TreeNode>],
    source_id: &NodeId,
    target_parent_id: Option<&NodeId>,
    target_index: usize,
) -> Forest {
    try_move_subtree(forest, source_id, target_parent_id, target_index)
        .unwrap_or_else(|_| forest.to_vec())
}

/// The source is removed before inserting, so `target_index` counts siblings
/// with the source already absent. Indexes past the end append.
pub fn try_move_subtree(
    forest: &[Arc<TreeNode>],
    source_id: &NodeId,
    target_parent_id: Option<&NodeId>,
    target_index: usize,
) -> Result<Forest, MoveError> {
    if !contains(forest, source_id) {
        return Err(MoveError::SourceNotFound(source_id.clone()));
    }
    if let Some(parent_id) = target_parent_id {
        if parent_id == source_id {
            return Err(MoveError::OntoItself(source_id.clone()));
        }
        if !contains(forest, parent_id) {
            return Err(MoveError::TargetNotFound(parent_id.clone()));
        }
        if is_descendant(forest, source_id, parent_id) {
            return Err(MoveError::IntoDescendant {
                node: source_id.clone(),
                descendant: parent_id.clone(),
            });
        }
    }

    let (mut remaining, source) =
        remove_node(forest, source_id).ok_or_else(|| MoveError::SourceNotFound(source_id.clone()))?;

    match target_parent_id {
        None => {
            let index = target_index.min(remaining.len());
            remaining.insert(index, source);
            Ok(remaining)
        }
        Some(parent_id) => insert_child(&remaining, parent_id, target_index, source)
            .ok_or_else(|| MoveError::TargetNotFound(parent_id.clone())),
    }
}

/// Where a drop onto `target_id` lands: the target's parent (`None` for roots)
/// and the index right after the target in its current sibling list.
pub fn drop_target(
    forest: &[Arc<TreeNode>],
    target_id: &NodeId,
) -> Option<(Option<NodeId>, usize)> {
    let parent_id = find_parent_id(forest, target_id);
    let siblings = match parent_id {
        Some(parent_id) => find(forest, parent_id)?.children(),
        None => forest,
    };
    let position = siblings.iter().position(|sibling| &sibling.id == target_id)?;
    Some((parent_id.cloned(), position + 1))
}

/// Rebuild the path to `id`, replacing that node with `map(node)`. `None` when
/// the id is absent.
fn map_node<F>(nodes: &[Arc<TreeNode>], id: &NodeId, map: &F) -> Option<Forest>
where
    F: Fn(&TreeNode) -> TreeNode,
{
    for (index, node) in nodes.iter().enumerate() {
        let replacement = if &node.id == id {
            map(node.as_ref())
        } else {
            let Some(children) = map_node(node.children(), id, map) else {
                continue;
            };
            TreeNode {
                children: Some(children),
                ..TreeNode::clone(node)
            }
        };
        let mut next = nodes.to_vec();
        next[index] = Arc::new(replacement);
        return Some(next);
    }
    None
}

fn remove_node(nodes: &[Arc<TreeNode>], id: &NodeId) -> Option<(Forest, Arc<TreeNode>)> {
    if let Some(index) = nodes.iter().position(|node| &node.id == id) {
        let mut next = nodes.to_vec();
        let removed = next.remove(index);
        return Some((next, removed));
    }
    for (index, node) in nodes.iter().enumerate() {
        let Some((children, removed)) = remove_node(node.children(), id) else {
            continue;
        };
        let parent = TreeNode {
            children: if children.is_empty() { None } else { Some(children) },
            ..TreeNode::clone(node)
        };
        let mut next = nodes.to_vec();
        next[index] = Arc::new(parent);
        return Some((next, removed));
    }
    None
}

fn insert_child(
    nodes: &[Arc<TreeNode>],
    parent_id: &NodeId,
    index: usize,
    child: Arc<TreeNode>,
) -> Option<Forest> {
    map_node(nodes, parent_id, &|parent: &TreeNode| {
        let mut children = parent.children().to_vec();
        children.insert(index.min(children.len()), Arc::clone(&child));
        TreeNode {
            children: Some(children),
            ..parent.clone()
        }
    })
}
