#[macro_use]
extern crate log;
#[macro_use]
extern crate async_trait;

mod error;
pub mod entry;
/// High-level browsing facade
pub mod explorer;
pub mod listing;
pub mod mutate;
pub mod path;
pub mod progress;
pub mod transfer;
/// Transport collaborator seam
pub mod transport;
/// Directory skeleton mirror
pub mod tree;

pub use entry::{EntryKind, RemoteEntry};
pub use error::{Error, Result};
pub use explorer::RemoteExplorer;
pub use listing::{Listing, ListingResolver};
pub use mutate::MutationCoordinator;
pub use progress::{TransferDirection, TransferEvent};
pub use transfer::TransferCoordinator;
pub use transport::{ProgressFn, Transport};
pub use tree::{DirNode, TreeBuilder};
