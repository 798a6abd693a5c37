use arbor_tree::{NodeId, TreeNode};
use async_trait::async_trait;
use std::{collections::HashSet, time::Duration};
use tracing::debug;

use crate::{ChildrenFetcher, FetchError};

/// Stand-in for a remote source: waits `delay`, then hands back `count`
/// children named `Child 1..=count`. Ids registered with [`fail_on`] fail.
///
/// [`fail_on`]: SimulatedFetcher::fail_on
#[derive(Debug, Clone)]
pub struct SimulatedFetcher {
    delay: Duration,
    count: usize,
    fail: HashSet<NodeId>,
}

impl Default for SimulatedFetcher {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000))
    }
}

impl SimulatedFetcher {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            count: 3,
            fail: HashSet::new(),
        }
    }

    pub fn children(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn fail_on(mut self, id: impl Into<NodeId>) -> Self {
        self.fail.insert(id.into());
        self
    }
}

#[async_trait]
impl ChildrenFetcher for SimulatedFetcher {
    async fn fetch_children(&self, id: &NodeId) -> Result<Vec<TreeNode>, FetchError> {
        debug!(%id, delay = ?self.delay, "simulated fetch");
        tokio::time::sleep(self.delay).await;

        if self.fail.contains(id) {
            return Err(FetchError::Failed {
                id: id.clone(),
                reason: "simulated failure".to_string(),
            });
        }

        Ok((1..=self.count)
            .map(|n| TreeNode::new(NodeId::with_prefix("child"), format!("Child {n}")))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_fresh_unloaded_children() {
        let fetcher = SimulatedFetcher::new(Duration::ZERO);
        let first = fetcher.fetch_children(&NodeId::from("2")).await.unwrap();
        let second = fetcher.fetch_children(&NodeId::from("2")).await.unwrap();

        let names: Vec<_> = first.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Child 1", "Child 2", "Child 3"]);
        assert!(first.iter().all(|n| !n.children_loaded && n.children.is_none()));
        assert!(first.iter().all(|n| n.id.as_str().starts_with("child-")));
        assert!(first.iter().zip(&second).all(|(a, b)| a.id != b.id));
    }

    #[tokio::test]
    async fn configured_ids_fail() {
        let fetcher = SimulatedFetcher::new(Duration::ZERO).children(1).fail_on("3");

        let err = fetcher.fetch_children(&NodeId::from("3")).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch children of 3: simulated failure");

        let ok = fetcher.fetch_children(&NodeId::from("2")).await.unwrap();
        assert_eq!(ok.len(), 1);
    }
}
