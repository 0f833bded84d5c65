//! Directory skeleton mirror.
//!
//! The tree holds only directories, never files; it is the navigable
//! skeleton of the remote filesystem. Nodes are discovered lazily on
//! first expansion, which keeps startup cheap over slow links. An eager
//! full walk is still available through [`TreeBuilder::build`].

use std::{future::Future, pin::Pin, sync::Arc};

use crate::{
    error::{Error, Result},
    path,
    transport::Transport,
};

type BoxedFut<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One node of the directory skeleton.
///
/// Invariants: `path` is absolute, `/`-separated, with no trailing slash
/// except the root `"/"`; no two nodes in a tree share a path; every
/// child path extends its parent path by exactly one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirNode {
    path: String,
    children: Vec<DirNode>,
    expanded: bool,
}

impl DirNode {
    fn new(path: String) -> Self {
        Self {
            path,
            children: Vec::new(),
            expanded: false,
        }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last path component, `"/"` for the root.
    #[must_use]
    pub fn name(&self) -> &str {
        path::file_name(&self.path).unwrap_or("/")
    }

    /// Directory children discovered so far. Empty until expanded.
    #[must_use]
    pub fn children(&self) -> &[DirNode] {
        &self.children
    }

    /// Whether this node's children have been discovered.
    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Whether `target` is this node's path or lies underneath it.
    fn covers(&self, target: &str) -> bool {
        target
            .strip_prefix(self.path.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }

    /// Looks a node up by absolute path.
    #[must_use]
    pub fn find(&self, target: &str) -> Option<&DirNode> {
        if self.path == target {
            return Some(self);
        }

        self.children
            .iter()
            .find(|c| c.covers(target))
            .and_then(|c| c.find(target))
    }

    pub fn find_mut(&mut self, target: &str) -> Option<&mut DirNode> {
        if self.path == target {
            return Some(self);
        }

        self.children
            .iter_mut()
            .find(|c| c.covers(target))
            .and_then(|c| c.find_mut(target))
    }
}

/// Builds and refreshes the directory skeleton from discrete listing
/// calls. The builder is the only component that mutates nodes besides
/// the mutation coordinator's refresh step.
pub struct TreeBuilder {
    transport: Arc<dyn Transport>,
}

impl TreeBuilder {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Creates an unexpanded root node without touching the link.
    pub fn root(&self, root_path: &str) -> Result<DirNode> {
        if !path::is_absolute(root_path) {
            return Err(Error::InvalidArgument(format!(
                "root path must be absolute: {root_path:?}"
            )));
        }

        Ok(DirNode::new(path::normalize(root_path)))
    }

    /// Discovers a node's directory children with a single listing call.
    ///
    /// Already-expanded nodes are returned as-is; use [`Self::refresh`]
    /// to force a re-list. Errors propagate and leave the node
    /// unexpanded, so a later attempt starts from a clean slate.
    pub async fn expand<'a>(&self, node: &'a mut DirNode) -> Result<&'a [DirNode]> {
        if !node.expanded {
            let entries = self.transport.list_directory(&node.path).await?;

            node.children = entries
                .into_iter()
                .filter(|e| e.is_directory())
                .map(|e| DirNode::new(e.path))
                .collect();
            node.expanded = true;

            debug!("expanded {} ({} subdirectories)", node.path, node.children.len());
        }

        Ok(&node.children)
    }

    /// Eagerly materializes the whole skeleton under `root_path`.
    ///
    /// A subdirectory whose listing reports [`Error::NotFound`] vanished
    /// between discovery and descent and is dropped; any other listing
    /// failure degrades that subdirectory to a leaf. Partial results
    /// never abort the build.
    pub async fn build(&self, root_path: &str) -> Result<DirNode> {
        let mut root = self.root(root_path)?;
        self.grow(&mut root).await?;
        Ok(root)
    }

    /// Drops cached children and re-lists one level.
    pub async fn refresh(&self, node: &mut DirNode) -> Result<()> {
        node.children.clear();
        node.expanded = false;
        self.expand(node).await.map(|_| ())
    }

    fn grow<'a>(&'a self, node: &'a mut DirNode) -> BoxedFut<'a, Result<()>> {
        Box::pin(async move {
            let entries = match self.transport.list_directory(&node.path).await {
                Ok(entries) => entries,
                Err(Error::NotFound(p)) => return Err(Error::NotFound(p)),
                Err(err) => {
                    warn!("listing {} failed, treating as empty: {}", node.path, err);
                    node.children.clear();
                    node.expanded = true;
                    return Ok(());
                }
            };

            let mut kept = Vec::new();
            for entry in entries.into_iter().filter(|e| e.is_directory()) {
                let mut child = DirNode::new(entry.path);
                match self.grow(&mut child).await {
                    Ok(()) => kept.push(child),
                    Err(Error::NotFound(p)) => debug!("dropping vanished directory {}", p),
                    Err(err) => return Err(err),
                }
            }

            node.children = kept;
            node.expanded = true;
            Ok(())
        })
    }
}
