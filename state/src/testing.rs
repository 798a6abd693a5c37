use arbor_fetch::{ChildrenFetcher, FetchError, sample_forest};
use arbor_tree::{Forest, NodeId, TreeNode, find};
use async_trait::async_trait;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use tokio::sync::Notify;

use crate::TreeStore;

pub fn store() -> TreeStore {
    store_with(sample_forest())
}

pub fn store_with(forest: Forest) -> TreeStore {
    TreeStore::new(forest, Arc::new(Scripted::new(Vec::new())))
}

/// Returns clones of `children`, failing the first `failures` calls.
pub struct Scripted {
    children: Vec<TreeNode>,
    failures: usize,
    calls: AtomicUsize,
}

impl Scripted {
    pub fn new(children: Vec<TreeNode>) -> Self {
        Self {
            children,
            failures: 0,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_first(mut self, failures: usize) -> Self {
        self.failures = failures;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChildrenFetcher for Scripted {
    async fn fetch_children(&self, id: &NodeId) -> Result<Vec<TreeNode>, FetchError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(FetchError::Failed {
                id: id.clone(),
                reason: "offline".to_string(),
            });
        }
        Ok(self.children.clone())
    }
}

/// Holds every fetch until `open` is called.
pub struct Gated {
    gate: Notify,
    children: Vec<TreeNode>,
    calls: AtomicUsize,
}

impl Gated {
    pub fn new(children: Vec<TreeNode>) -> Self {
        Self {
            gate: Notify::new(),
            children,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn open(&self) {
        self.gate.notify_one();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChildrenFetcher for Gated {
    async fn fetch_children(&self, _id: &NodeId) -> Result<Vec<TreeNode>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        Ok(self.children.clone())
    }
}

pub async fn wait_until_loading(store: &TreeStore, id: &NodeId) {
    let mut rx = store.subscribe();
    let _ = rx
        .wait_for(|forest| find(forest, id).is_some_and(|node| node.is_loading))
        .await
        .expect("store alive");
}
