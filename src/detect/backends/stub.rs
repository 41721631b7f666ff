use anyhow::Result;
use sha2::{Digest, Sha256};

use crate::detect::backend::DetectorBackend;
use crate::detect::result::{BoundingBox, FrameAnalysis, Gender, PersonDetection};

/// Stub backend for testing and synthetic demo runs.
///
/// Plays back a fixed script of frame analyses. The script cursor advances
/// only when the frame content changes (detected by pixel hashing), so a
/// synthetic source that holds each scene for several frames produces a
/// stable analysis per scene.
pub struct StubBackend {
    script: Vec<FrameAnalysis>,
    cursor: usize,
    last_hash: Option<[u8; 32]>,
}

impl StubBackend {
    /// Backend with the built-in demo script: an empty street, a lone woman,
    /// a woman with two men, and an SOS gesture, cycling.
    pub fn new() -> Self {
        Self::scripted(vec![
            FrameAnalysis::default(),
            FrameAnalysis {
                persons: vec![person(Gender::Female, 0.92)],
                gesture_detected: false,
            },
            FrameAnalysis {
                persons: vec![
                    person(Gender::Female, 0.88),
                    person(Gender::Male, 0.81),
                    person(Gender::Male, 0.77),
                ],
                gesture_detected: false,
            },
            FrameAnalysis {
                persons: vec![person(Gender::Female, 0.90)],
                gesture_detected: true,
            },
        ])
    }

    /// Backend that plays back the given analyses, cycling when exhausted.
    pub fn scripted(script: Vec<FrameAnalysis>) -> Self {
        Self {
            script,
            cursor: 0,
            last_hash: None,
        }
    }
}

fn person(gender: Gender, confidence: f32) -> PersonDetection {
    PersonDetection {
        bbox: BoundingBox {
            x: 0.4,
            y: 0.3,
            w: 0.2,
            h: 0.5,
        },
        confidence,
        gender,
    }
}

impl Default for StubBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectorBackend for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn analyze(&mut self, pixels: &[u8], _width: u32, _height: u32) -> Result<FrameAnalysis> {
        if self.script.is_empty() {
            return Ok(FrameAnalysis::default());
        }

        let current_hash: [u8; 32] = Sha256::digest(pixels).into();
        if let Some(prev) = self.last_hash {
            if prev != current_hash {
                self.cursor = (self.cursor + 1) % self.script.len();
            }
        }
        self.last_hash = Some(current_hash);

        Ok(self.script[self.cursor].clone())
    }
}
