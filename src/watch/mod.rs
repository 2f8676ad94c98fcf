//! Mount-change notification source
//!
//! Thin OS binding: polls the mount table on an interval, diffs consecutive
//! scans by device identifier, and reports what appeared or disappeared.
//! Events are consumed on the controller's task, so no further
//! synchronization is needed downstream.

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::volume::{self, Volume};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountEvent {
    Added(Volume),
    Removed(Volume),
}

/// Polling watcher over the mount table.
///
/// The first poll reports every already-mounted volume as `Added`, so a
/// consumer that starts from nothing sees the current state before any
/// change.
pub struct DeviceWatch {
    task: JoinHandle<()>,
    events: mpsc::Receiver<MountEvent>,
}

impl DeviceWatch {
    pub fn spawn(mounts_path: PathBuf, poll_interval: Duration) -> Self {
        let (tx, rx) = mpsc::channel(16);

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(poll_interval);
            let mut known: Vec<Volume> = Vec::new();

            loop {
                interval.tick().await;

                let current = match volume::scan(&mounts_path) {
                    Ok(volumes) => volumes,
                    Err(e) => {
                        warn!("Mount table scan failed: {}", e);
                        continue;
                    }
                };

                for event in diff(&known, &current) {
                    debug!("Mount event: {:?}", event);
                    if tx.send(event).await.is_err() {
                        // Consumer is gone, nothing left to watch for.
                        return;
                    }
                }

                known = current;
            }
        });

        Self { task, events: rx }
    }

    /// Next mount event, or `None` once the watch task has stopped.
    pub async fn next_event(&mut self) -> Option<MountEvent> {
        self.events.recv().await
    }
}

impl Drop for DeviceWatch {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Compare two scans by device identifier.
pub fn diff(before: &[Volume], after: &[Volume]) -> Vec<MountEvent> {
    let mut events = Vec::new();

    for volume in after {
        if !before.iter().any(|v| v.device == volume.device) {
            events.push(MountEvent::Added(volume.clone()));
        }
    }
    for volume in before {
        if !after.iter().any(|v| v.device == volume.device) {
            events.push(MountEvent::Removed(volume.clone()));
        }
    }

    events
}
