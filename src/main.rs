use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use aufnehmer::{
    volume, Config, DeviceWatch, ListRefresh, MountEvent, ProcessSupervisor, Recording,
    RecordingStore, SessionController, VolumeMatcher,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config file (TOML); built-in defaults are used when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// Override the device identifier substring to match
    #[arg(short, long)]
    device: Option<String>,
}

/// Console rendering of the track list, standing in for the kiosk UI.
struct ConsoleList;

impl ListRefresh for ConsoleList {
    fn refresh(&self, recordings: &[Recording]) {
        println!("Aufnahmen:");
        if recordings.is_empty() {
            println!("  (keine)");
        }
        for recording in recordings {
            println!("  {:>3}  {}", recording.index, recording.file_name);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut cfg = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(device) = args.device {
        cfg.device.match_substring = device;
    }

    info!("Aufnehmer v0.1.0");
    info!("Target device: {}", cfg.device.match_substring);

    let matcher = VolumeMatcher::new(&cfg.device.match_substring);
    let mut watch = DeviceWatch::spawn(
        cfg.device.mounts_path.clone().into(),
        Duration::from_millis(cfg.device.poll_interval_ms),
    );

    let root = match matcher.find_target(&volume::scan(Path::new(&cfg.device.mounts_path))?) {
        Some(root) => root,
        None => {
            info!("Bitte USB-Stick einstecken!");
            wait_for_target(&mut watch, &matcher).await?
        }
    };
    info!("USB drive detected at {}", root.display());

    let store = RecordingStore::new(
        &root,
        &cfg.storage.session_prefix,
        chrono::Local::now().date_naive(),
        cfg.storage.audio_extension.clone(),
    );
    let supervisor = ProcessSupervisor::new(cfg.encoder.clone(), cfg.power.clone());
    let mut controller = SessionController::new(store, supervisor, Box::new(ConsoleList))
        .context("Failed to open the recording session")?;
    controller.refresh();

    run_session(&mut controller, &mut watch, &matcher).await
}

/// Block until the device watch reports a mounted target volume.
async fn wait_for_target(watch: &mut DeviceWatch, matcher: &VolumeMatcher) -> Result<PathBuf> {
    while let Some(event) = watch.next_event().await {
        if let MountEvent::Added(volume) = event {
            if let Some(root) = matcher.resolve_root(&volume) {
                return Ok(root);
            }
        }
    }
    anyhow::bail!("Device watch stopped before the target volume appeared")
}

/// Drive the controller from console commands until quit or device removal.
async fn run_session(
    controller: &mut SessionController,
    watch: &mut DeviceWatch,
    matcher: &VolumeMatcher,
) -> Result<()> {
    println!("Befehle: record | stop | play <n> | delete | list | quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            event = watch.next_event() => match event {
                Some(MountEvent::Removed(volume)) if matcher.is_target(&volume) => {
                    info!("USB drive removed");
                    controller.on_device_removed();
                    return Ok(());
                }
                Some(_) => {}
                None => anyhow::bail!("Device watch stopped"),
            },
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read console input")? else {
                    return Ok(());
                };
                if !dispatch(controller, line.trim()).await {
                    return Ok(());
                }
            }
        }
    }
}

/// One console command against the controller; returns false on quit.
async fn dispatch(controller: &mut SessionController, line: &str) -> bool {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        [] => {}
        ["record"] => controller.start_record(),
        ["stop"] => controller.stop_record().await,
        ["play", index] => match index.parse::<usize>() {
            Ok(index) => {
                let tracks = controller.snapshot();
                match tracks.iter().find(|t| t.index == index) {
                    Some(track) => controller.toggle_play(track).await,
                    None => println!("Keine Aufnahme {}", index),
                }
            }
            Err(_) => println!("play braucht eine Nummer"),
        },
        ["delete"] => controller.delete_last(),
        ["list"] => {
            controller.refresh();
        }
        ["quit"] | ["exit"] => return false,
        _ => println!("Unbekannter Befehl: {}", line),
    }
    true
}
