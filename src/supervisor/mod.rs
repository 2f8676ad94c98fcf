//! External process lifecycle
//!
//! All audio work is delegated to one external tool (ecasound in
//! production): capture runs `<tool> -i <input-device> -o <file>`, playback
//! runs `<tool> -i <file> -o <output-device>`. Children are spawned directly
//! with fixed argument shapes, never through a shell, so recording filenames
//! cannot be interpreted.
//!
//! Stopping is SIGTERM plus a bounded wait for exit; a child that ignores
//! the signal is killed and reaped. The caller can therefore rescan the
//! session directory immediately after `stop` without racing a live writer.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};
use tracing::{error, info, warn};

use crate::config::{EncoderConfig, PowerConfig};
use crate::error::SpawnError;

/// Opaque reference to one spawned child, sufficient to signal and await it.
#[derive(Debug)]
pub struct ProcessHandle {
    child: Child,
    program: String,
}

impl ProcessHandle {
    /// OS pid, absent once the child has been reaped.
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    /// SIGTERM, then wait up to `grace` for the exit; SIGKILL and reap on
    /// timeout. Consumes the handle: after this the child is gone.
    pub async fn terminate(mut self, grace: Duration) {
        if let Some(pid) = self.child.id() {
            info!("Stopping {} (pid {})", self.program, pid);
            unsafe {
                libc::kill(pid as libc::pid_t, libc::SIGTERM);
            }
        }

        match tokio::time::timeout(grace, self.child.wait()).await {
            Ok(Ok(status)) => info!("{} exited: {}", self.program, status),
            Ok(Err(e)) => warn!("Failed to reap {}: {}", self.program, e),
            Err(_) => {
                warn!(
                    "{} ignored SIGTERM for {:?}, killing it",
                    self.program, grace
                );
                if let Err(e) = self.child.kill().await {
                    error!("Failed to kill {}: {}", self.program, e);
                }
            }
        }
    }
}

/// Spawns and stops the encoder, player and poweroff children.
///
/// Holds no process state itself: the at-most-one-recording and
/// at-most-one-playback rules live in the session controller, which owns
/// the handle slots.
#[derive(Debug, Clone)]
pub struct ProcessSupervisor {
    encoder: EncoderConfig,
    power: PowerConfig,
}

impl ProcessSupervisor {
    pub fn new(encoder: EncoderConfig, power: PowerConfig) -> Self {
        Self { encoder, power }
    }

    /// Spawn the capture child writing to `output`.
    pub fn start_recording(&self, output: &Path) -> Result<ProcessHandle, SpawnError> {
        info!("Starting capture to {}", output.display());
        self.spawn_encoder(|cmd| {
            cmd.arg("-i").arg(&self.encoder.capture_input);
            cmd.arg("-o").arg(output);
        })
    }

    /// Spawn the playback child reading `input`.
    pub fn start_playback(&self, input: &Path) -> Result<ProcessHandle, SpawnError> {
        info!("Starting playback of {}", input.display());
        self.spawn_encoder(|cmd| {
            cmd.arg("-i").arg(input);
            cmd.arg("-o").arg(&self.encoder.playback_output);
        })
    }

    /// Stop a child with the configured grace period.
    pub async fn stop(&self, handle: ProcessHandle) {
        handle
            .terminate(Duration::from_secs(self.encoder.stop_timeout_secs))
            .await;
    }

    /// Ask the host OS to power off. Fire-and-forget: the machine is about
    /// to die, so the child is never awaited.
    pub fn request_poweroff(&self) -> Result<(), SpawnError> {
        info!("Powering off...");
        Command::new(&self.power.program)
            .arg(&self.power.directive)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|source| SpawnError {
                program: self.power.program.clone(),
                source,
            })?;
        Ok(())
    }

    fn spawn_encoder(
        &self,
        configure: impl FnOnce(&mut Command),
    ) -> Result<ProcessHandle, SpawnError> {
        let mut cmd = Command::new(&self.encoder.program);
        configure(&mut cmd);
        cmd.stdin(Stdio::null());

        let child = cmd.spawn().map_err(|source| SpawnError {
            program: self.encoder.program.clone(),
            source,
        })?;

        Ok(ProcessHandle {
            child,
            program: self.encoder.program.clone(),
        })
    }
}
