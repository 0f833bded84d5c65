//! Listing resolution for a selected directory node.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{entry::RemoteEntry, error::Result, transport::Transport, tree::DirNode};

/// Immediate children of a directory, split for display.
///
/// The transport's return order is preserved within each partition;
/// sorting and grouping beyond the split belong to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub directories: Vec<RemoteEntry>,
    pub files: Vec<RemoteEntry>,
}

impl Listing {
    fn from_entries(entries: Vec<RemoteEntry>) -> Self {
        let (directories, files) = entries.into_iter().partition(RemoteEntry::is_directory);
        Self { directories, files }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.files.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.directories.len() + self.files.len()
    }
}

/// Resolves a directory node to its current remote listing.
///
/// Every resolution is exactly one listing call against the link; no
/// caching, since the remote side is the sole source of truth and may
/// have changed. A failed resolution propagates so the caller can keep
/// showing its last good listing.
pub struct ListingResolver {
    transport: Arc<dyn Transport>,
}

impl ListingResolver {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn resolve(&self, node: &DirNode) -> Result<Listing> {
        self.resolve_path(node.path()).await
    }

    pub async fn resolve_path(&self, path: &str) -> Result<Listing> {
        let entries = self.transport.list_directory(path).await?;
        debug!("resolved {} ({} entries)", path, entries.len());
        Ok(Listing::from_entries(entries))
    }
}
