use anyhow::Result;

use crate::detect::result::FrameAnalysis;

/// Detector backend trait.
///
/// A backend turns a raw RGB frame into person detections (with classified
/// gender) plus an SOS gesture flag. Model inference is entirely the
/// backend's concern; the rest of the kernel treats this as a pure
/// frame-to-analysis function.
///
/// Implementations must treat the pixel slice as read-only and ephemeral:
/// no frame may be retained beyond the `analyze` call.
pub trait DetectorBackend: Send {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Run detection and classification on one frame.
    fn analyze(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<FrameAnalysis>;

    /// Optional warm-up hook (model loading, first-inference priming).
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}
