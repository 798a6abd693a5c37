use arbor_fetch::ChildrenFetcher;
use arbor_tree::{
    DragItem, Forest, NodeId, NodePatch, TreeNode, add_child, contains, delete_subtree, find,
    try_move_subtree, update,
};
use std::{fmt::Debug, sync::Arc};
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

/// Owns the current forest snapshot and the dragged-node marker.
///
/// Every command reads the latest snapshot, computes the next one with the
/// pure tree operations, and publishes it as a unit. Subscribers only ever see
/// complete forests. Cloning a store shares its state.
#[derive(Clone)]
pub struct TreeStore {
    pub(crate) inner: Arc<Inner>,
}

pub(crate) struct Inner {
    pub(crate) forest: watch::Sender<Forest>,
    pub(crate) dragged: watch::Sender<Option<DragItem>>,
    pub(crate) fetcher: Arc<dyn ChildrenFetcher>,
}

impl Debug for TreeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeStore")
            .field("forest", &*self.inner.forest.borrow())
            .field("dragged", &*self.inner.dragged.borrow())
            .finish_non_exhaustive()
    }
}

impl TreeStore {
    pub fn new<F>(initial: Forest, fetcher: F) -> Self
    where
        F: ChildrenFetcher + 'static,
    {
        let (forest, _) = watch::channel(initial);
        let (dragged, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                forest,
                dragged,
                fetcher: Arc::new(fetcher),
            }),
        }
    }

    pub fn snapshot(&self) -> Forest {
        self.inner.forest.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Forest> {
        self.inner.forest.subscribe()
    }

    pub fn find(&self, id: &NodeId) -> Option<Arc<TreeNode>> {
        find(&self.inner.forest.borrow(), id).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.forest.borrow().is_empty()
    }

    /// Add a child named `name` (trimmed) under `parent_id`, expanding the
    /// parent. Returns the new id, or `None` for a blank name or missing parent.
    #[instrument(skip(self))]
    pub fn add(&self, parent_id: &NodeId, name: &str) -> Option<NodeId> {
        let name = name.trim();
        if name.is_empty() {
            debug!("ignoring blank name");
            return None;
        }
        let id = NodeId::generate();
        let node = TreeNode::new(id.clone(), name);
        self.apply(|forest| add_child(forest, parent_id, node)).then_some(id)
    }

    /// Append a new root. This is how an empty forest gets its first node.
    #[instrument(skip(self))]
    pub fn add_root(&self, name: &str) -> NodeId {
        let name = match name.trim() {
            "" => "New Root Node",
            name => name,
        };
        let id = NodeId::with_prefix("root");
        let node = Arc::new(TreeNode::new(id.clone(), name));
        self.inner.forest.send_modify(|forest| forest.push(node));
        debug!(%id, "added root");
        id
    }

    #[instrument(skip(self))]
    pub fn delete(&self, id: &NodeId) -> bool {
        let deleted = self.apply(|forest| delete_subtree(forest, id));
        if deleted {
            self.clear_stale_drag();
        }
        deleted
    }

    /// Commit an edit. A blank or unchanged name only leaves edit mode.
    #[instrument(skip(self))]
    pub fn rename(&self, id: &NodeId, name: &str) -> bool {
        let name = name.trim();
        self.apply(|forest| {
            let Some(node) = find(forest, id) else {
                return forest.clone();
            };
            let patch = if name.is_empty() || name == node.name {
                NodePatch::new().editing(false)
            } else {
                NodePatch::new().name(name).editing(false)
            };
            update(forest, id, &patch)
        })
    }

    pub fn set_editing(&self, id: &NodeId, is_editing: bool) -> bool {
        self.update(id, NodePatch::new().editing(is_editing))
    }

    pub fn cancel_edit(&self, id: &NodeId) -> bool {
        self.set_editing(id, false)
    }

    pub fn update(&self, id: &NodeId, patch: NodePatch) -> bool {
        if patch.is_empty() {
            return false;
        }
        self.apply(|forest| update(forest, id, &patch))
    }

    /// Move `source_id` under `target_parent_id` (roots when `None`) at
    /// `target_index`. Rejected moves are logged and change nothing.
    #[instrument(skip(self))]
    pub fn move_node(
        &self,
        source_id: &NodeId,
        target_parent_id: Option<&NodeId>,
        target_index: usize,
    ) -> bool {
        self.apply(|forest| {
            match try_move_subtree(forest, source_id, target_parent_id, target_index) {
                Ok(next) => next,
                Err(error) => {
                    warn!(%error, "rejected move");
                    forest.clone()
                }
            }
        })
    }

    /// Replace the snapshot with `change(latest)`, notifying subscribers only
    /// when the forest actually differs. Returns whether it did.
    pub(crate) fn apply<F>(&self, change: F) -> bool
    where
        F: FnOnce(&Forest) -> Forest,
    {
        self.inner.forest.send_if_modified(|forest| {
            let next = change(forest);
            if *forest == next {
                return false;
            }
            *forest = next;
            debug!(roots = forest.len(), "published snapshot");
            true
        })
    }

    fn clear_stale_drag(&self) {
        let forest = self.inner.forest.borrow().clone();
        self.inner.dragged.send_if_modified(|dragged| match dragged {
            Some(item) if !contains(&forest, &item.id) => {
                *dragged = None;
                true
            }
            _ => false,
        });
    }
}
