/// One captured RGB frame.
///
/// Frames are ephemeral: they flow from a source through the detector and
/// are dropped at the end of the loop iteration. Nothing in the kernel
/// persists pixels.
#[derive(Clone, Debug)]
pub struct RawFrame {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Monotonic capture index, starting at 1.
    pub frame_index: u64,
}

impl RawFrame {
    pub fn new(pixels: Vec<u8>, width: u32, height: u32, frame_index: u64) -> Self {
        Self {
            pixels,
            width,
            height,
            frame_index,
        }
    }
}
