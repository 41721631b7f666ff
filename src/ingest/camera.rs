//! Camera frame source.
//!
//! `stub://` URLs select a synthetic source that generates deterministic
//! pixel patterns and cycles a scene state every few frames. Any other URL
//! is rejected: real capture backends are not built into this tree.

use anyhow::{bail, Result};

use crate::frame::RawFrame;

/// How many frames the synthetic source holds each scene before advancing.
const SCENE_HOLD_FRAMES: u64 = 50;

/// Configuration for a camera source.
#[derive(Clone, Debug)]
pub struct CameraConfig {
    /// Source URL (e.g. "stub://front_camera").
    pub url: String,
    /// Target frame rate; the loop driver paces to this.
    pub target_fps: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            url: "stub://front_camera".to_string(),
            target_fps: 10,
            width: 640,
            height: 480,
        }
    }
}

/// Camera frame source.
pub struct CameraSource {
    backend: CameraBackend,
}

enum CameraBackend {
    Synthetic(SyntheticCameraSource),
}

impl CameraSource {
    pub fn new(config: CameraConfig) -> Result<Self> {
        if config.url.starts_with("stub://") {
            Ok(Self {
                backend: CameraBackend::Synthetic(SyntheticCameraSource::new(config, None)),
            })
        } else {
            bail!(
                "unsupported camera url {:?}: only stub:// sources are built in",
                config.url
            )
        }
    }

    /// Synthetic source that ends after `max_frames` frames. For tests and
    /// bounded demo runs.
    pub fn bounded(config: CameraConfig, max_frames: u64) -> Self {
        Self {
            backend: CameraBackend::Synthetic(SyntheticCameraSource::new(config, Some(max_frames))),
        }
    }

    pub fn connect(&mut self) -> Result<()> {
        match &mut self.backend {
            CameraBackend::Synthetic(source) => source.connect(),
        }
    }

    /// Capture the next frame. `None` means end-of-stream.
    pub fn next_frame(&mut self) -> Result<Option<RawFrame>> {
        match &mut self.backend {
            CameraBackend::Synthetic(source) => source.next_frame(),
        }
    }

    pub fn target_fps(&self) -> u32 {
        match &self.backend {
            CameraBackend::Synthetic(source) => source.config.target_fps,
        }
    }

    pub fn is_healthy(&self) -> bool {
        match &self.backend {
            CameraBackend::Synthetic(_) => true,
        }
    }

    pub fn stats(&self) -> CameraStats {
        match &self.backend {
            CameraBackend::Synthetic(source) => source.stats(),
        }
    }
}

/// Statistics for a camera source.
#[derive(Clone, Debug)]
pub struct CameraStats {
    pub frames_captured: u64,
    pub url: String,
}

struct SyntheticCameraSource {
    config: CameraConfig,
    frame_count: u64,
    scene_state: u8,
    max_frames: Option<u64>,
}

impl SyntheticCameraSource {
    fn new(config: CameraConfig, max_frames: Option<u64>) -> Self {
        Self {
            config,
            frame_count: 0,
            scene_state: 0,
            max_frames,
        }
    }

    fn connect(&mut self) -> Result<()> {
        log::info!("CameraSource: connected to {} (synthetic)", self.config.url);
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Option<RawFrame>> {
        if let Some(max) = self.max_frames {
            if self.frame_count >= max {
                return Ok(None);
            }
        }
        self.frame_count += 1;

        // Advance the scene occasionally so the stub detector sees change.
        if self.frame_count % SCENE_HOLD_FRAMES == 0 {
            self.scene_state = self.scene_state.wrapping_add(1);
        }

        let pixels = self.generate_synthetic_pixels();
        Ok(Some(RawFrame::new(
            pixels,
            self.config.width,
            self.config.height,
            self.frame_count,
        )))
    }

    /// Pixel pattern that depends only on the scene state, so consecutive
    /// frames within a scene are byte-identical.
    fn generate_synthetic_pixels(&self) -> Vec<u8> {
        let pixel_count = (self.config.width * self.config.height * 3) as usize; // RGB
        let mut pixels = vec![0u8; pixel_count];
        for (i, pixel) in pixels.iter_mut().enumerate() {
            *pixel = ((i as u64 + self.scene_state as u64) % 256) as u8;
        }
        pixels
    }

    fn stats(&self) -> CameraStats {
        CameraStats {
            frames_captured: self.frame_count,
            url: self.config.url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_stub_urls() {
        let config = CameraConfig {
            url: "rtsp://camera-1".to_string(),
            ..CameraConfig::default()
        };
        assert!(CameraSource::new(config).is_err());
    }

    #[test]
    fn bounded_source_signals_end_of_stream() {
        let mut source = CameraSource::bounded(CameraConfig::default(), 3);
        source.connect().unwrap();
        for _ in 0..3 {
            assert!(source.next_frame().unwrap().is_some());
        }
        assert!(source.next_frame().unwrap().is_none());
        assert_eq!(source.stats().frames_captured, 3);
    }

    #[test]
    fn frames_within_a_scene_are_identical() {
        let mut source = CameraSource::bounded(
            CameraConfig {
                width: 8,
                height: 8,
                ..CameraConfig::default()
            },
            4,
        );
        let a = source.next_frame().unwrap().unwrap();
        let b = source.next_frame().unwrap().unwrap();
        assert_eq!(a.pixels, b.pixels);
        assert_eq!(b.frame_index, 2);
    }
}
