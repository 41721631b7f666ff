//! safewatchd - safety incident watch daemon
//!
//! This daemon:
//! 1. Ingests frames from the configured camera source
//! 2. Runs the detection backend (persons + gender, SOS gesture)
//! 3. Evaluates the three alert rules against ambient context
//! 4. Appends each fired incident to the append-only incident store
//! 5. Dispatches a fire-and-forget alert notification per incident
//!
//! The loop terminates on Ctrl-C or when the source reports end-of-stream.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context as _, Result};

use safewatch_kernel::{
    pipeline, AlertNotifier, CameraConfig, CameraSource, CsvIncidentStore, StubBackend,
    SystemContextProvider, WatchdConfig,
};

fn main() -> Result<()> {
    let cfg = WatchdConfig::load()?;
    init_logging(&cfg)?;

    log::info!("safewatchd {} starting", env!("CARGO_PKG_VERSION"));
    log::info!("incident store: {}", cfg.incident_store_path);
    // Fidelity note: a condition that holds across frames records one
    // incident per frame. There is no debounce.
    log::warn!("no alert debounce: sustained conditions re-fire every frame");

    let quit = Arc::new(AtomicBool::new(false));
    {
        let quit = quit.clone();
        ctrlc::set_handler(move || {
            log::info!("quit signal received");
            quit.store(true, Ordering::Relaxed);
        })
        .context("install quit signal handler")?;
    }

    let camera_config = CameraConfig {
        url: cfg.camera.url.clone(),
        target_fps: cfg.camera.target_fps,
        width: cfg.camera.width,
        height: cfg.camera.height,
    };
    let mut source = CameraSource::new(camera_config)?;
    source.connect()?;

    let mut backend = StubBackend::new();
    let provider = SystemContextProvider::new(cfg.geolocate);
    let mut store = CsvIncidentStore::open(&cfg.incident_store_path)?;
    let notifier = build_notifier(&cfg);

    let stats = pipeline::run(
        &mut source,
        &mut backend,
        &provider,
        &mut store,
        notifier.as_ref(),
        &quit,
    )?;

    log::info!(
        "safewatchd stopped: {} frames processed, {} incidents recorded",
        stats.frames_processed,
        stats.incidents_recorded
    );
    Ok(())
}

fn init_logging(cfg: &WatchdConfig) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(path) = &cfg.alert_log_path {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("open alert log {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

#[cfg(feature = "alert-sound")]
fn build_notifier(cfg: &WatchdConfig) -> Box<dyn AlertNotifier> {
    Box::new(safewatch_kernel::SoundNotifier::new(&cfg.alert_sound_path))
}

#[cfg(not(feature = "alert-sound"))]
fn build_notifier(_cfg: &WatchdConfig) -> Box<dyn AlertNotifier> {
    Box::new(safewatch_kernel::LogNotifier)
}
