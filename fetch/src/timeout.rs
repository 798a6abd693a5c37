use arbor_tree::{NodeId, TreeNode};
use async_trait::async_trait;
use std::time::Duration;

use crate::{ChildrenFetcher, FetchError};

/// Bounds how long the wrapped fetcher may take.
#[derive(Debug, Clone)]
pub struct Timeout<F> {
    inner: F,
    duration: Duration,
}

impl<F> Timeout<F> {
    pub fn new(inner: F, duration: Duration) -> Self {
        Self { inner, duration }
    }
}

#[async_trait]
impl<F> ChildrenFetcher for Timeout<F>
where
    F: ChildrenFetcher,
{
    async fn fetch_children(&self, id: &NodeId) -> Result<Vec<TreeNode>, FetchError> {
        tokio::time::timeout(self.duration, self.inner.fetch_children(id))
            .await
            .map_err(|_| FetchError::TimedOut {
                id: id.clone(),
                elapsed: self.duration,
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SimulatedFetcher;

    #[tokio::test]
    async fn slow_fetch_times_out() {
        let fetcher = Timeout::new(
            SimulatedFetcher::new(Duration::from_secs(5)),
            Duration::from_millis(10),
        );
        let err = fetcher.fetch_children(&NodeId::from("2")).await.unwrap_err();
        assert_eq!(
            err,
            FetchError::TimedOut {
                id: NodeId::from("2"),
                elapsed: Duration::from_millis(10),
            }
        );
    }

    #[tokio::test]
    async fn fast_fetch_passes_through() {
        let fetcher = Timeout::new(
            SimulatedFetcher::new(Duration::ZERO).children(2),
            Duration::from_secs(5),
        );
        let children = fetcher.fetch_children(&NodeId::from("2")).await.unwrap();
        assert_eq!(children.len(), 2);
    }
}
