//! One-at-a-time file transfer sequencing.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use bytes::Bytes;
use tokio::sync::{mpsc, Mutex};

use crate::{
    error::{Error, Result},
    progress::{ProgressGauge, TransferDirection, TransferEvent},
    transport::{ProgressFn, Transport},
};

/// Sequences download and upload operations against the link.
///
/// The underlying transport maintains a single negotiated session, so at
/// most one transfer is in flight at a time; a second call waits until
/// the first has emitted its terminal event. Listing and navigation do
/// not take this lock and may proceed alongside an active transfer.
///
/// There is no mid-transfer cancellation: a transfer runs to completion
/// or to transport-reported failure. Aborting the underlying connection
/// surfaces here as a failure with no partial local file left behind.
pub struct TransferCoordinator {
    transport: Arc<dyn Transport>,
    events: mpsc::UnboundedSender<TransferEvent>,
    single_flight: Mutex<()>,
}

impl TransferCoordinator {
    /// Creates the coordinator and hands out the single progress
    /// observer for all transfers it will run.
    pub fn new(
        transport: Arc<dyn Transport>,
    ) -> (Self, mpsc::UnboundedReceiver<TransferEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (
            Self {
                transport,
                events,
                single_flight: Mutex::new(()),
            },
            rx,
        )
    }

    /// Downloads a whole remote file into `local_path`.
    ///
    /// The sink is materialized atomically: content lands in a `.part`
    /// sibling first and is renamed into place only after the full byte
    /// sequence arrived. A failure partway leaves the sink absent or
    /// unchanged. Returns the number of bytes written.
    pub async fn download<P: AsRef<Path>>(&self, remote_path: &str, local_path: P) -> Result<u64> {
        let _guard = self.single_flight.lock().await;
        let local_path = local_path.as_ref();

        info!("download {} -> {}", remote_path, local_path.display());
        let gauge = ProgressGauge::start(
            self.events.clone(),
            TransferDirection::Download,
            remote_path,
        );

        let read = {
            // Raw percents are mirrored to the log for link diagnostics;
            // correctness never depends on this observation.
            let observe = |percent: u8| {
                debug!("download frame {}: {}%", remote_path, percent);
                gauge.report(percent);
            };
            self.transport.read_file(remote_path, &observe).await
        };

        let data = match read {
            Ok(data) => data,
            Err(err) => {
                gauge.fail(&err.to_string());
                return Err(err);
            }
        };

        match Self::materialize(local_path, &data).await {
            Ok(()) => {
                let bytes = data.len() as u64;
                gauge.complete(bytes);
                Ok(bytes)
            }
            Err(err) => {
                gauge.fail(&err.to_string());
                Err(err)
            }
        }
    }

    /// Uploads a local file to `remote_path`.
    ///
    /// The local source is read up front; if it cannot be read the
    /// transfer never starts. The remote session slot is released via
    /// `reset_sessions` whether the write succeeded or not — the reset
    /// itself is best-effort and its failure only logged. Returns the
    /// number of bytes written.
    pub async fn upload<P: AsRef<Path>>(&self, local_path: P, remote_path: &str) -> Result<u64> {
        let _guard = self.single_flight.lock().await;
        let local_path = local_path.as_ref();

        let data = Bytes::from(tokio::fs::read(local_path).await?);
        let size = data.len() as u64;

        info!(
            "upload {} -> {} ({} bytes)",
            local_path.display(),
            remote_path,
            size
        );
        let gauge = ProgressGauge::start(
            self.events.clone(),
            TransferDirection::Upload,
            remote_path,
        );

        let written = {
            let observe = |percent: u8| {
                debug!("upload frame {}: {}%", remote_path, percent);
                gauge.report(percent);
            };
            self.write_remote(remote_path, data, &observe).await
        };

        // Release the session slot even on failure.
        if let Err(err) = self.transport.reset_sessions().await {
            warn!("session reset after upload failed: {}", err);
        }

        match written {
            Ok(()) => {
                gauge.complete(size);
                Ok(size)
            }
            Err(err) => {
                gauge.fail(&err.to_string());
                Err(err)
            }
        }
    }

    async fn write_remote(
        &self,
        remote_path: &str,
        data: Bytes,
        observe: &ProgressFn<'_>,
    ) -> Result<()> {
        self.transport
            .open_for_write(remote_path, data.len() as u64)
            .await?;
        self.transport.write_file(data, observe).await
    }

    /// Writes `data` next to the sink and renames it into place, so the
    /// sink only ever holds complete content.
    async fn materialize(local_path: &Path, data: &[u8]) -> Result<()> {
        let mut staged = local_path.as_os_str().to_owned();
        staged.push(".part");
        let staged = PathBuf::from(staged);

        if let Err(err) = tokio::fs::write(&staged, data).await {
            let _ = tokio::fs::remove_file(&staged).await;
            return Err(Error::from(err));
        }

        if let Err(err) = tokio::fs::rename(&staged, local_path).await {
            let _ = tokio::fs::remove_file(&staged).await;
            return Err(Error::from(err));
        }

        Ok(())
    }
}
