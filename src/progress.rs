//! Progress reporting for file transfers.

use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferDirection {
    Upload,
    Download,
}

/// Notifications emitted by the active transfer.
///
/// Within one transfer the percent values are monotonically
/// non-decreasing, start at 0 and reach 100 on success; intermediate
/// values may be skipped. Exactly one terminal event (`Completed` or
/// `Failed`) closes each transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferEvent {
    Started {
        direction: TransferDirection,
        remote_path: String,
    },
    Progress {
        percent: u8,
    },
    Completed {
        bytes: u64,
    },
    Failed {
        message: String,
    },
}

/// Per-transfer progress state owned by the transfer coordinator.
///
/// The gauge is created fresh for each transfer (never ambient global
/// state), keeps a high-water mark so raw transport percents can only
/// move forward, and drops duplicates.
pub(crate) struct ProgressGauge {
    last: AtomicU8,
    events: mpsc::UnboundedSender<TransferEvent>,
}

impl ProgressGauge {
    pub(crate) fn start(
        events: mpsc::UnboundedSender<TransferEvent>,
        direction: TransferDirection,
        remote_path: &str,
    ) -> Self {
        let _ = events.send(TransferEvent::Started {
            direction,
            remote_path: remote_path.to_string(),
        });
        let _ = events.send(TransferEvent::Progress { percent: 0 });

        Self {
            last: AtomicU8::new(0),
            events,
        }
    }

    /// Feeds a raw percent from the transport. Values that would move
    /// the gauge backwards or repeat the current mark are dropped.
    pub(crate) fn report(&self, percent: u8) {
        let percent = percent.min(100);
        let prev = self.last.fetch_max(percent, Ordering::SeqCst);
        if percent > prev {
            let _ = self.events.send(TransferEvent::Progress { percent });
        }
    }

    /// Terminal success: forces 100 and emits `Completed`.
    pub(crate) fn complete(self, bytes: u64) {
        self.report(100);
        let _ = self.events.send(TransferEvent::Completed { bytes });
    }

    /// Terminal failure: the percent stays wherever it stopped.
    pub(crate) fn fail(self, message: &str) {
        let _ = self.events.send(TransferEvent::Failed {
            message: message.to_string(),
        });
    }
}
