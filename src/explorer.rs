//! High-level facade for browsing a remote filesystem.

use std::{path::Path, sync::Arc};

use tokio::sync::{mpsc, Mutex};

use crate::{
    error::{Error, Result},
    listing::{Listing, ListingResolver},
    mutate::MutationCoordinator,
    path,
    progress::TransferEvent,
    transfer::TransferCoordinator,
    transport::Transport,
    tree::{DirNode, TreeBuilder},
};

/// One remote filesystem behind one transport, presented as a browsable
/// mirror: a directory skeleton for navigation, listings on demand,
/// serialized transfers and consistency-preserving mutations.
///
/// All methods are safe to call from any non-presentation task; results
/// and transfer events are plain data, and marshaling them back onto a
/// UI loop is entirely the caller's concern.
pub struct RemoteExplorer {
    root_path: String,
    tree: Mutex<DirNode>,
    builder: TreeBuilder,
    resolver: ListingResolver,
    transfers: TransferCoordinator,
    mutations: MutationCoordinator,
}

impl RemoteExplorer {
    /// Creates an explorer rooted at `root_path` along with the single
    /// observer for transfer events. No link traffic happens here; the
    /// skeleton is discovered lazily (or eagerly via
    /// [`Self::build_skeleton`]).
    pub fn new(
        transport: Arc<dyn Transport>,
        root_path: &str,
    ) -> Result<(Self, mpsc::UnboundedReceiver<TransferEvent>)> {
        let builder = TreeBuilder::new(transport.clone());
        let root = builder.root(root_path)?;
        let (transfers, events) = TransferCoordinator::new(transport.clone());

        Ok((
            Self {
                root_path: root.path().to_string(),
                tree: Mutex::new(root),
                builder,
                resolver: ListingResolver::new(transport.clone()),
                transfers,
                mutations: MutationCoordinator::new(transport),
            },
            events,
        ))
    }

    /// Eagerly materializes the whole directory skeleton, replacing the
    /// current mirror. Typically called once at startup.
    pub async fn build_skeleton(&self) -> Result<()> {
        let mut tree = self.tree.lock().await;
        *tree = self.builder.build(&self.root_path).await?;
        Ok(())
    }

    /// A display copy of the current skeleton.
    pub async fn snapshot(&self) -> DirNode {
        self.tree.lock().await.clone()
    }

    /// Discovers (or returns the already-discovered) subdirectories of
    /// a skeleton node.
    pub async fn expand(&self, dir_path: &str) -> Result<Vec<DirNode>> {
        let mut tree = self.tree.lock().await;
        let node = tree
            .find_mut(&path::normalize(dir_path))
            .ok_or_else(|| Error::NotFound(dir_path.to_string()))?;

        Ok(self.builder.expand(node).await?.to_vec())
    }

    /// Resolves a directory to its current remote listing. Never cached
    /// and safe to repeat; does not contend with an active transfer.
    pub async fn resolve(&self, dir_path: &str) -> Result<Listing> {
        self.resolver.resolve_path(dir_path).await
    }

    /// See [`TransferCoordinator::download`].
    pub async fn download<P: AsRef<Path>>(&self, remote_path: &str, local_path: P) -> Result<u64> {
        self.transfers.download(remote_path, local_path).await
    }

    /// See [`TransferCoordinator::upload`].
    pub async fn upload<P: AsRef<Path>>(&self, local_path: P, remote_path: &str) -> Result<u64> {
        self.transfers.upload(local_path, remote_path).await
    }

    pub async fn create_directory(&self, parent_path: &str, name: &str) -> Result<Listing> {
        let mut tree = self.tree.lock().await;
        self.mutations
            .create_directory(&mut tree, parent_path, name)
            .await
    }

    pub async fn remove_file(&self, file_path: &str) -> Result<Listing> {
        self.mutations.remove_file(file_path).await
    }

    pub async fn remove_directory(&self, dir_path: &str) -> Result<Listing> {
        let mut tree = self.tree.lock().await;
        self.mutations.remove_directory(&mut tree, dir_path).await
    }

    pub async fn rename(&self, old_path: &str, new_path: &str) -> Result<Listing> {
        let mut tree = self.tree.lock().await;
        self.mutations.rename(&mut tree, old_path, new_path).await
    }
}
