//! Create, delete and rename operations with consistent refresh.
//!
//! Every mutation re-resolves the affected parent and hands the fresh
//! listing back, so the caller can never be shown a stale view after a
//! successful change. Directory-level mutations additionally refresh
//! the affected skeleton nodes instead of patching siblings in place.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    error::{Error, Result},
    listing::{Listing, ListingResolver},
    path,
    transport::Transport,
    tree::{DirNode, TreeBuilder},
};

/// Applies mutating operations against the transport.
///
/// Mutations are globally serialized: one in-flight mutation at a time,
/// which trivially satisfies the one-per-node minimum. The coordinator
/// never pre-checks remote state; the remote's own verdict (`NotFound`,
/// `AlreadyExists`, `NotEmpty`) surfaces unmasked.
pub struct MutationCoordinator {
    transport: Arc<dyn Transport>,
    resolver: ListingResolver,
    builder: TreeBuilder,
    serial: Mutex<()>,
}

impl MutationCoordinator {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            resolver: ListingResolver::new(transport.clone()),
            builder: TreeBuilder::new(transport.clone()),
            transport,
            serial: Mutex::new(()),
        }
    }

    /// Creates `name` under `parent_path` and returns the parent's
    /// refreshed listing.
    ///
    /// An empty name or one containing a separator is rejected before
    /// any link traffic.
    pub async fn create_directory(
        &self,
        tree: &mut DirNode,
        parent_path: &str,
        name: &str,
    ) -> Result<Listing> {
        let _guard = self.serial.lock().await;

        if name.is_empty() {
            return Err(Error::InvalidArgument("empty directory name".to_string()));
        }
        if name.contains('/') {
            return Err(Error::InvalidArgument(format!(
                "directory name must be a single component: {name:?}"
            )));
        }
        let parent_path = Self::require_absolute(parent_path)?;

        self.transport
            .create_directory(&path::join(&parent_path, name))
            .await?;

        self.refresh_skeleton(tree, &parent_path).await?;
        self.resolver.resolve_path(&parent_path).await
    }

    /// Removes a remote file and returns the parent's refreshed listing.
    pub async fn remove_file(&self, file_path: &str) -> Result<Listing> {
        let _guard = self.serial.lock().await;

        let file_path = Self::require_absolute(file_path)?;
        let parent = Self::parent_of(&file_path)?;

        self.transport.remove_file(&file_path).await?;
        self.resolver.resolve_path(&parent).await
    }

    /// Removes a remote directory (the remote decides whether a
    /// non-empty one is refused) and returns the parent's refreshed
    /// listing.
    pub async fn remove_directory(&self, tree: &mut DirNode, dir_path: &str) -> Result<Listing> {
        let _guard = self.serial.lock().await;

        let dir_path = Self::require_absolute(dir_path)?;
        let parent = Self::parent_of(&dir_path)?;

        self.transport.remove_directory(&dir_path).await?;

        self.refresh_skeleton(tree, &parent).await?;
        self.resolver.resolve_path(&parent).await
    }

    /// Renames `old_path` to `new_path` and returns the refreshed
    /// listing of the new path's parent.
    ///
    /// On success the old entry disappears and the new one appears on
    /// the next resolution; nothing is patched in place. When the two
    /// parents differ both skeleton nodes are refreshed.
    pub async fn rename(
        &self,
        tree: &mut DirNode,
        old_path: &str,
        new_path: &str,
    ) -> Result<Listing> {
        let _guard = self.serial.lock().await;

        let old_path = Self::require_absolute(old_path)?;
        let new_path = Self::require_absolute(new_path)?;
        let old_parent = Self::parent_of(&old_path)?;
        let new_parent = Self::parent_of(&new_path)?;

        self.transport.rename(&old_path, &new_path).await?;

        self.refresh_skeleton(tree, &old_parent).await?;
        if new_parent != old_parent {
            self.refresh_skeleton(tree, &new_parent).await?;
        }
        self.resolver.resolve_path(&new_parent).await
    }

    /// Re-lists one skeleton level if the path is mirrored in the tree.
    /// Paths outside the skeleton (or not yet discovered) are fine to
    /// skip: they have no cached children to go stale.
    async fn refresh_skeleton(&self, tree: &mut DirNode, dir_path: &str) -> Result<()> {
        match tree.find_mut(dir_path) {
            Some(node) => self.builder.refresh(node).await,
            None => Ok(()),
        }
    }

    fn require_absolute(p: &str) -> Result<String> {
        if !path::is_absolute(p) {
            return Err(Error::InvalidArgument(format!("path must be absolute: {p:?}")));
        }
        Ok(path::normalize(p))
    }

    fn parent_of(p: &str) -> Result<String> {
        path::parent(p)
            .ok_or_else(|| Error::InvalidArgument("the root has no parent".to_string()))
    }
}
