use arbor_tree::{DragItem, NodeId, depth_of, drop_target, try_move_subtree};
use tracing::{debug, instrument, warn};

use crate::TreeStore;

impl TreeStore {
    /// Mark `id` as the node being dragged. `None` if it does not exist.
    #[instrument(skip(self))]
    pub fn start_drag(&self, id: &NodeId) -> Option<DragItem> {
        let depth = depth_of(&self.inner.forest.borrow(), id)?;
        let item = DragItem {
            id: id.clone(),
            depth,
        };
        self.inner.dragged.send_replace(Some(item.clone()));
        Some(item)
    }

    pub fn end_drag(&self) {
        self.inner.dragged.send_replace(None);
    }

    pub fn dragged(&self) -> Option<DragItem> {
        self.inner.dragged.borrow().clone()
    }

    /// Drop the dragged node onto `target_id`, placing it right after the
    /// target among the target's siblings. Dropping with nothing dragged, or
    /// onto the dragged node itself, does nothing.
    #[instrument(skip(self))]
    pub fn drop_on(&self, target_id: &NodeId) -> bool {
        let Some(dragged) = self.dragged() else {
            debug!("nothing dragged");
            return false;
        };
        if &dragged.id == target_id {
            return false;
        }

        let moved = self.apply(|forest| {
            let Some((parent_id, index)) = drop_target(forest, target_id) else {
                return forest.clone();
            };
            match try_move_subtree(forest, &dragged.id, parent_id.as_ref(), index) {
                Ok(next) => next,
                Err(error) => {
                    warn!(%error, "rejected drop");
                    forest.clone()
                }
            }
        });
        self.end_drag();
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{store, store_with};
    use arbor_tree::{TreeNode, find_parent_id};
    use std::sync::Arc;

    fn id(id: &str) -> NodeId {
        NodeId::from(id)
    }

    fn root_ids(store: &TreeStore) -> Vec<String> {
        store.snapshot().iter().map(|n| n.id.to_string()).collect()
    }

    #[test]
    fn start_drag_records_depth() {
        let store = store();
        assert_eq!(
            store.start_drag(&id("1-2")),
            Some(DragItem {
                id: id("1-2"),
                depth: 1,
            })
        );
        assert_eq!(store.dragged().map(|item| item.depth), Some(1));
        assert_eq!(store.start_drag(&id("missing")), None);
        assert_eq!(store.dragged().map(|item| item.id), Some(id("1-2")));
    }

    #[test]
    fn drop_places_after_target_and_clears_marker() {
        let store = store();
        store.start_drag(&id("3"));

        assert!(store.drop_on(&id("1")));
        assert_eq!(root_ids(&store), vec!["1", "3", "2"]);
        assert_eq!(store.dragged(), None);
    }

    #[test]
    fn drop_reparents_into_target_siblings() {
        let store = store();
        store.start_drag(&id("2"));

        assert!(store.drop_on(&id("1-1")));
        assert_eq!(find_parent_id(&store.snapshot(), &id("2")), Some(&id("1")));
        let children: Vec<_> = store
            .find(&id("1"))
            .unwrap()
            .children()
            .iter()
            .map(|n| n.id.to_string())
            .collect();
        assert_eq!(children, vec!["1-1", "2", "1-2"]);
    }

    #[test]
    fn drop_onto_self_or_without_drag_is_no_op() {
        let store = store();
        let before = store.snapshot();

        assert!(!store.drop_on(&id("1")));

        store.start_drag(&id("2"));
        assert!(!store.drop_on(&id("2")));
        assert_eq!(store.dragged().map(|item| item.id), Some(id("2")));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn drop_into_own_subtree_is_rejected() {
        let store = store();
        store.start_drag(&id("1"));

        assert!(!store.drop_on(&id("1-1")));
        assert_eq!(root_ids(&store), vec!["1", "2", "3"]);
        assert_eq!(store.dragged(), None);
    }

    #[test]
    fn drop_onto_later_sibling_uses_its_current_position() {
        let store = store_with(
            ["a", "b", "c", "d"]
                .into_iter()
                .map(|name| Arc::new(TreeNode::new(name, name.to_uppercase())))
                .collect(),
        );
        store.start_drag(&id("a"));

        assert!(store.drop_on(&id("c")));
        assert_eq!(root_ids(&store), vec!["b", "c", "d", "a"]);
    }

    #[test]
    fn deleting_dragged_node_clears_marker() {
        let store = store();
        store.start_drag(&id("1-1"));
        store.delete(&id("1"));
        assert_eq!(store.dragged(), None);
    }
}
