//! Session controller
//!
//! The orchestrating state machine over one detected target volume. Owns
//! the two child-process handle slots (at most one recording, at most one
//! playback), the recording store, and the refresh seam to the UI layer.
//!
//! All methods run on a single control task; the only concurrency is the
//! spawned children themselves. Failures degrade to logged no-ops so an
//! unattended kiosk never blocks on a dialog nobody will dismiss.

use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::error::StorageError;
use crate::store::{Recording, RecordingStore};
use crate::supervisor::{ProcessHandle, ProcessSupervisor};

/// Where the controller currently stands. Derived from the handle slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Recording,
    Playing(PathBuf),
}

/// UI collaborator boundary: told to re-render after the inventory changes.
pub trait ListRefresh {
    fn refresh(&self, recordings: &[Recording]);
}

/// Sink for headless operation and tests.
pub struct NullRefresh;

impl ListRefresh for NullRefresh {
    fn refresh(&self, _recordings: &[Recording]) {}
}

pub struct SessionController {
    store: RecordingStore,
    supervisor: ProcessSupervisor,
    recording: Option<ProcessHandle>,
    playback: Option<(ProcessHandle, PathBuf)>,
    ui: Box<dyn ListRefresh>,
}

impl SessionController {
    /// Build a controller over a fresh session root, creating it on disk.
    pub fn new(
        store: RecordingStore,
        supervisor: ProcessSupervisor,
        ui: Box<dyn ListRefresh>,
    ) -> Result<Self, StorageError> {
        store.ensure_root_exists()?;
        info!("Session root: {}", store.root().display());

        Ok(Self {
            store,
            supervisor,
            recording: None,
            playback: None,
            ui,
        })
    }

    pub fn state(&self) -> ControllerState {
        if self.recording.is_some() {
            ControllerState::Recording
        } else if let Some((_, path)) = &self.playback {
            ControllerState::Playing(path.clone())
        } else {
            ControllerState::Idle
        }
    }

    /// Current inventory without notifying the UI. Listing failures degrade
    /// to an empty snapshot.
    pub fn snapshot(&self) -> Vec<Recording> {
        match self.store.list() {
            Ok(recordings) => recordings,
            Err(e) => {
                warn!("Failed to list recordings: {}", e);
                Vec::new()
            }
        }
    }

    /// Rescan the store and push the snapshot through the UI seam.
    pub fn refresh(&self) -> Vec<Recording> {
        let recordings = self.snapshot();
        self.ui.refresh(&recordings);
        recordings
    }

    /// `Idle -> Recording`. Refused while recording or playing.
    pub fn start_record(&mut self) {
        if self.recording.is_some() {
            warn!("Already recording, ignoring start request");
            return;
        }
        if self.playback.is_some() {
            warn!("Playback active, ignoring record request");
            return;
        }

        let count = self.snapshot().len();
        let output = self.store.next_recording_path(count);

        match self.supervisor.start_recording(&output) {
            Ok(handle) => {
                info!("Recording to {}", output.display());
                self.recording = Some(handle);
            }
            Err(e) => error!("Could not start recording: {}", e),
        }
    }

    /// `Recording -> Idle`. Awaits the capture child's exit before
    /// rescanning, so the new file is fully flushed when the UI refreshes.
    pub async fn stop_record(&mut self) {
        let Some(handle) = self.recording.take() else {
            warn!("Not recording, ignoring stop request");
            return;
        };

        self.supervisor.stop(handle).await;
        self.refresh();
    }

    /// Toggle playback of one track:
    /// `Idle -> Playing(track)`, `Playing(track) -> Idle`.
    ///
    /// Refused while recording, and refused for a second track while
    /// another one is playing.
    pub async fn toggle_play(&mut self, track: &Recording) {
        if self.recording.is_some() {
            warn!("Recording active, ignoring playback request");
            return;
        }

        match self.playback.take() {
            Some((handle, current)) if current == track.path => {
                self.supervisor.stop(handle).await;
            }
            Some(other) => {
                warn!(
                    "{} is playing, ignoring request for {}",
                    other.1.display(),
                    track.path.display()
                );
                self.playback = Some(other);
            }
            None => match self.supervisor.start_playback(&track.path) {
                Ok(handle) => {
                    info!("Playing {}", track.path.display());
                    self.playback = Some((handle, track.path.clone()));
                }
                Err(e) => error!("Could not start playback: {}", e),
            },
        }
    }

    /// Remove the most recent recording. Refused while recording.
    pub fn delete_last(&mut self) {
        if self.recording.is_some() {
            warn!("Recording active, ignoring delete request");
            return;
        }

        self.store.delete_last();
        self.refresh();
    }

    /// The target volume disappeared: ask the host to power off. Valid from
    /// any state; in-flight children are intentionally not stopped first,
    /// the kiosk prioritizes fast power-off over a clean encoder exit.
    pub fn on_device_removed(&self) {
        if let Err(e) = self.supervisor.request_poweroff() {
            error!("Poweroff request failed: {}", e);
        }
    }
}
