mod sample;
mod simulated;
mod timeout;

use arbor_tree::{NodeId, TreeNode};
use async_trait::async_trait;
use displaydoc::Display;
use std::{sync::Arc, time::Duration};
use thiserror::Error;

pub use crate::sample::sample_forest;
pub use crate::simulated::SimulatedFetcher;
pub use crate::timeout::Timeout;

/// Source of children for lazily loaded nodes.
///
/// Every returned node carries a fresh unique id, `children_loaded = false`,
/// and no children. Implementations must not block and must eventually settle.
#[async_trait]
pub trait ChildrenFetcher: Send + Sync {
    async fn fetch_children(&self, id: &NodeId) -> Result<Vec<TreeNode>, FetchError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Display)]
pub enum FetchError {
    /// Failed to fetch children of {id}: {reason}
    Failed { id: NodeId, reason: String },
    /// Timed out after {elapsed:?} fetching children of {id}
    TimedOut { id: NodeId, elapsed: Duration },
}

#[async_trait]
impl<F> ChildrenFetcher for Arc<F>
where
    F: ChildrenFetcher + ?Sized,
{
    async fn fetch_children(&self, id: &NodeId) -> Result<Vec<TreeNode>, FetchError> {
        (**self).fetch_children(id).await
    }
}
