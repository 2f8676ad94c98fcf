//! Unattended kiosk controller for USB audio recording
//!
//! Waits for one specific USB storage device, then manages a single
//! recording session on it: start/stop capture through an external encoder,
//! play back or delete previous tracks, and power the host off when the
//! device is pulled.

pub mod config;
pub mod controller;
pub mod error;
pub mod store;
pub mod supervisor;
pub mod volume;
pub mod watch;

pub use config::Config;
pub use controller::{ControllerState, ListRefresh, NullRefresh, SessionController};
pub use error::{SpawnError, StorageError};
pub use store::{Recording, RecordingStore};
pub use supervisor::{ProcessHandle, ProcessSupervisor};
pub use volume::{Volume, VolumeMatcher};
pub use watch::{DeviceWatch, MountEvent};
