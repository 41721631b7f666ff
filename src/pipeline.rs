//! Frame loop driver.
//!
//! Single-threaded cooperative loop: capture, analyze, decide, sink. The
//! only concurrency is the notifier's detached playback thread, which the
//! loop never waits on. Store appends happen on the loop thread and their
//! failures stop the loop; notification failures cannot.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::alert::AlertNotifier;
use crate::context::ContextProvider;
use crate::decision;
use crate::detect::DetectorBackend;
use crate::incident::IncidentSink;
use crate::ingest::CameraSource;

const HEALTH_LOG_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, Debug, Default)]
pub struct PipelineStats {
    pub frames_processed: u64,
    pub incidents_recorded: u64,
}

/// Run the capture loop until the quit flag is set or the source ends.
///
/// Per frame: at most one incident is evaluated, appended, and notified;
/// rule mutual exclusivity is guaranteed by the decision engine.
pub fn run(
    source: &mut CameraSource,
    backend: &mut dyn DetectorBackend,
    provider: &dyn ContextProvider,
    store: &mut dyn IncidentSink,
    notifier: &dyn AlertNotifier,
    quit: &AtomicBool,
) -> Result<PipelineStats> {
    backend.warm_up()?;

    let frame_interval = Duration::from_millis(1000 / u64::from(source.target_fps().max(1)));
    let mut stats = PipelineStats::default();
    let mut last_health_log = Instant::now();

    while !quit.load(Ordering::Relaxed) {
        let Some(frame) = source.next_frame()? else {
            log::info!("camera source ended after {} frames", stats.frames_processed);
            break;
        };

        let analysis = backend.analyze(&frame.pixels, frame.width, frame.height)?;
        let summary = analysis.summarize();
        let context = provider.context();

        if let Some(condition) = decision::evaluate(&summary, &context) {
            let record = store.append(&condition, &context.location)?;
            notifier.notify(&condition);
            stats.incidents_recorded += 1;
            log::info!(
                "incident #{}: {} at {} {} city={}",
                stats.incidents_recorded,
                record.label,
                record.date,
                record.time,
                record.city
            );
        }

        stats.frames_processed += 1;

        if last_health_log.elapsed() >= HEALTH_LOG_INTERVAL {
            let camera = source.stats();
            log::info!(
                "camera health={} frames={} url={}",
                source.is_healthy(),
                camera.frames_captured,
                camera.url
            );
            last_health_log = Instant::now();
        }

        std::thread::sleep(frame_interval);
    }

    Ok(stats)
}
