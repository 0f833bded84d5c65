//! Transport collaborator seam.
//!
//! The core consumes the remote side exclusively through this trait. An
//! implementation wraps the actual chunked request/response protocol
//! (packet layout, opcodes, CRCs, retransmission all live below this
//! seam) and maps its status codes onto [`Error`](crate::Error) variants.

use bytes::Bytes;

use crate::{error::Result, RemoteEntry};

/// Callback fed with 0-100 percent values while a read or write
/// operation moves chunks over the link. Values may skip.
pub type ProgressFn<'a> = dyn Fn(u8) + Send + Sync + 'a;

/// Operation set the remote link exposes. Every call is a discrete,
/// size-limited request/response exchange; there is no streaming API.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Lists the entries of a remote directory, in the order the remote
    /// returned them.
    async fn list_directory(&self, path: &str) -> Result<Vec<RemoteEntry>>;

    /// Reserves the transfer session and opens a remote file for
    /// writing at the declared size.
    async fn open_for_write(&self, path: &str, size: u64) -> Result<()>;

    /// Writes the full content through the previously opened session.
    /// The transport chunks internally and reports progress as it goes.
    async fn write_file(&self, data: Bytes, progress: &ProgressFn<'_>) -> Result<()>;

    /// Reads a whole remote file, reporting progress as chunks arrive.
    async fn read_file(&self, path: &str, progress: &ProgressFn<'_>) -> Result<Bytes>;

    async fn remove_file(&self, path: &str) -> Result<()>;

    async fn remove_directory(&self, path: &str) -> Result<()>;

    async fn create_directory(&self, path: &str) -> Result<()>;

    async fn rename(&self, old_path: &str, new_path: &str) -> Result<()>;

    /// Releases any outstanding transfer session on the remote side.
    async fn reset_sessions(&self) -> Result<()>;
}
