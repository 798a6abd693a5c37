use arbor_fetch::FetchError;
use arbor_tree::{Expansion, NodeId, NodePatch, find, set_loading, toggle_expansion, update};
use tracing::{debug, info, instrument, warn};

use crate::TreeStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// No node with that id.
    Missing,
    /// A fetch for the node is already in flight.
    Busy,
    Expanded,
    Collapsed,
    /// Children were unknown, so expanding went through a fetch.
    Fetched(LoadOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Node missing, already loaded, or already loading.
    Skipped,
    Loaded { children: usize },
    /// Loading flag cleared; a later toggle retries.
    Failed(FetchError),
    /// The node was deleted while its fetch was in flight.
    Discarded,
}

enum Step {
    Missing,
    Busy,
    Fetch,
    Expand,
    Collapse,
}

impl TreeStore {
    /// Expand or collapse a node, fetching its children first when they are
    /// not known yet.
    #[instrument(skip(self))]
    pub async fn toggle(&self, id: &NodeId) -> ToggleOutcome {
        let mut step = Step::Missing;
        self.apply(|forest| {
            let Some(node) = find(forest, id) else {
                return forest.clone();
            };
            step = match node.expansion() {
                Expansion::Loading => Step::Busy,
                Expansion::Unloaded => Step::Fetch,
                Expansion::Collapsed => Step::Expand,
                Expansion::Expanded => Step::Collapse,
            };
            match step {
                Step::Expand | Step::Collapse => toggle_expansion(forest, id),
                _ => forest.clone(),
            }
        });

        match step {
            Step::Missing => ToggleOutcome::Missing,
            Step::Busy => ToggleOutcome::Busy,
            Step::Expand => ToggleOutcome::Expanded,
            Step::Collapse => ToggleOutcome::Collapsed,
            Step::Fetch => ToggleOutcome::Fetched(self.load_children(id).await),
        }
    }

    /// Fetch and attach the children of a node that has not been loaded.
    ///
    /// Marking the node as loading and checking that it was not already
    /// loading happen in one snapshot replacement, so overlapping calls for
    /// the same node start a single fetch.
    #[instrument(skip(self))]
    pub async fn load_children(&self, id: &NodeId) -> LoadOutcome {
        let started = self.apply(|forest| match find(forest, id) {
            Some(node) if !node.children_loaded && !node.is_loading => {
                set_loading(forest, id, true)
            }
            _ => forest.clone(),
        });
        if !started {
            debug!("nothing to load");
            return LoadOutcome::Skipped;
        }

        match self.inner.fetcher.fetch_children(id).await {
            Ok(children) => {
                let count = children.len();
                let attach = if children.is_empty() {
                    NodePatch::new().clear_children()
                } else {
                    NodePatch::new().children(children)
                };
                let patch = attach.children_loaded(true).loading(false).expanded(true);

                if self.apply(|forest| update(forest, id, &patch)) {
                    info!(children = count, "loaded children");
                    LoadOutcome::Loaded { children: count }
                } else {
                    debug!("node removed while loading");
                    LoadOutcome::Discarded
                }
            }
            Err(error) => {
                warn!(%error, "failed to load children");
                if self.apply(|forest| set_loading(forest, id, false)) {
                    LoadOutcome::Failed(error)
                } else {
                    LoadOutcome::Discarded
                }
            }
        }
    }
}
