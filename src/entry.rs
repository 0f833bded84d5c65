//! Plain-data records describing remote filesystem objects.

use serde::{Deserialize, Serialize};

use crate::path;

/// Kind of a remote filesystem object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// One file or directory record produced by a directory listing.
///
/// Entries are produced fresh on every listing call and are never patched
/// afterwards; staleness is resolved by re-listing the parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    /// Last path component
    pub name: String,
    /// Absolute remote path
    pub path: String,
    pub kind: EntryKind,
    /// Size in bytes, zero for directories
    pub size: u64,
}

impl RemoteEntry {
    /// Creates a file entry under `parent`.
    pub fn file<N: Into<String>>(parent: &str, name: N, size: u64) -> Self {
        let name = name.into();
        Self {
            path: path::join(parent, &name),
            name,
            kind: EntryKind::File,
            size,
        }
    }

    /// Creates a directory entry under `parent`.
    pub fn directory<N: Into<String>>(parent: &str, name: N) -> Self {
        let name = name.into();
        Self {
            path: path::join(parent, &name),
            name,
            kind: EntryKind::Directory,
            size: 0,
        }
    }

    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}
