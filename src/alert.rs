//! Alert notification side effects.
//!
//! Notification is fire-and-forget and lives in a separate failure domain
//! from persistence: a notifier can never fail the append that preceded it,
//! and sound playback runs on a detached thread so it never blocks the frame
//! loop. Overlapping alerts may produce overlapping playback; no ordering is
//! guaranteed between them.

use crate::decision::IncidentCondition;

#[cfg(feature = "alert-sound")]
use std::path::PathBuf;

/// Dispatches the notification side effect for a fired incident.
///
/// Implementations must be infallible from the caller's perspective:
/// failures are logged and swallowed, never returned.
pub trait AlertNotifier: Send {
    fn notify(&self, condition: &IncidentCondition);
}

/// Notifier that emits a warn-level log line per incident.
pub struct LogNotifier;

impl AlertNotifier for LogNotifier {
    fn notify(&self, condition: &IncidentCondition) {
        log::warn!("ALERT: {}", condition.label());
    }
}

/// Notifier that discards alerts. For tests.
pub struct NullNotifier;

impl AlertNotifier for NullNotifier {
    fn notify(&self, _condition: &IncidentCondition) {}
}

/// Notifier that plays a sound file on a detached thread per alert.
///
/// Each `notify` spawns an unsupervised playback thread: no join, no
/// cancellation, no result observed. A missing audio device or sound asset
/// is logged from the playback thread and otherwise ignored.
#[cfg(feature = "alert-sound")]
pub struct SoundNotifier {
    sound_path: PathBuf,
}

#[cfg(feature = "alert-sound")]
impl SoundNotifier {
    pub fn new(sound_path: impl Into<PathBuf>) -> Self {
        Self {
            sound_path: sound_path.into(),
        }
    }

    fn play(path: &std::path::Path) -> anyhow::Result<()> {
        use anyhow::Context as _;

        let file = std::fs::File::open(path)
            .with_context(|| format!("open alert sound {}", path.display()))?;
        let (_stream, handle) =
            rodio::OutputStream::try_default().context("open audio output device")?;
        let sink = rodio::Sink::try_new(&handle).context("create audio sink")?;
        let source =
            rodio::Decoder::new(std::io::BufReader::new(file)).context("decode alert sound")?;
        sink.append(source);
        sink.sleep_until_end();
        Ok(())
    }
}

#[cfg(feature = "alert-sound")]
impl AlertNotifier for SoundNotifier {
    fn notify(&self, condition: &IncidentCondition) {
        log::warn!("ALERT: {}", condition.label());
        let path = self.sound_path.clone();
        std::thread::spawn(move || {
            if let Err(e) = Self::play(&path) {
                log::warn!("alert sound playback failed: {:#}", e);
            }
        });
    }
}
