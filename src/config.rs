use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub device: DeviceConfig,
    pub encoder: EncoderConfig,
    pub storage: StorageConfig,
    pub power: PowerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Substring of the OS device identifier that marks the target volume.
    pub match_substring: String,
    /// Mount table consumed by the volume scanner and the device watch.
    pub mounts_path: String,
    /// Mount-table poll period in milliseconds.
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// External tool used for both capture and playback.
    pub program: String,
    /// `-i` token for capture (the audio input device).
    pub capture_input: String,
    /// `-o` token for playback (the audio output device).
    pub playback_output: String,
    /// Bounded wait for a child to exit after SIGTERM, in seconds.
    pub stop_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Session directory is `<prefix><ISO date>` under the volume root.
    pub session_prefix: String,
    /// Recognized recording file extension, without the dot.
    pub audio_extension: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PowerConfig {
    pub program: String,
    pub directive: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            match_substring: "/dev/sdb".to_string(),
            mounts_path: "/proc/mounts".to_string(),
            poll_interval_ms: 1000,
        }
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            program: "/usr/bin/ecasound".to_string(),
            capture_input: "alsa".to_string(),
            playback_output: "alsa".to_string(),
            stop_timeout_secs: 5,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            session_prefix: "Aufnahme-".to_string(),
            audio_extension: "mp3".to_string(),
        }
    }
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            program: "/usr/bin/systemctl".to_string(),
            directive: "poweroff".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
