use image::RgbImage;

/// A single decoded video frame with metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// RGB pixels, height x width x 3.
    pub image: RgbImage,
    /// Position in the decoded source (0-based). Kept through sampling.
    pub frame_number: u32,
    /// Elapsed seconds from the start of the source.
    pub timestamp_seconds: f64,
}

impl Frame {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
