//! Store gateway trait definition.

use crate::error::StoreResult;
use crate::tree::Node;
use async_trait::async_trait;

/// A provider of raw key-value trees.
///
/// The cache core treats gateway errors as opaque: they are propagated
/// verbatim to the caller or onto the updates channel, never interpreted or
/// retried by the core itself.
#[async_trait]
pub trait StoreGateway: Send + Sync {
    /// Fetches the full tree of descendants under `path`.
    ///
    /// This is a deep listing: all descendants, not just immediate children.
    async fn fetch_tree(&self, path: &str) -> StoreResult<Node>;
}
