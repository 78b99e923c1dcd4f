use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use tracing::{debug, info, warn};

use crate::video::Frame;

const TEXT_SCALE: f32 = 16.0;
const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const TEXT_LINE_HEIGHT: i32 = 18;

/// Writes frames as PNG files, optionally labelled with their source position.
pub struct FrameRenderer {
    font: Option<FontVec>,
}

impl FrameRenderer {
    pub fn new(font_path: Option<&Path>) -> Self {
        let font = font_path.and_then(Self::load_font);
        Self { font }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn save_frame(&self, frame: &Frame, dir: &Path, annotate: bool) -> Result<PathBuf> {
        let path = dir.join(frame_file_name(frame.frame_number));

        let saved = if annotate && self.font.is_some() {
            let mut img = frame.image.clone();
            self.draw_text_overlay(&mut img, frame);
            img.save(&path)
        } else {
            frame.image.save(&path)
        };
        saved.with_context(|| format!("failed to save frame to {}", path.display()))?;

        debug!(?path, frame_number = frame.frame_number, "saved frame");
        Ok(path)
    }

    fn draw_text_overlay(&self, img: &mut RgbImage, frame: &Frame) {
        let Some(font) = &self.font else { return };
        let scale = PxScale::from(TEXT_SCALE);
        let x = 4;
        let y = 4;

        let header = format!("F:{}", frame.frame_number);
        draw_text_mut(img, TEXT_COLOR, x, y, scale, font, &header);

        let time = format!("T:{:.2}s", frame.timestamp_seconds);
        draw_text_mut(img, TEXT_COLOR, x, y + TEXT_LINE_HEIGHT, scale, font, &time);
    }

    fn load_font(path: &Path) -> Option<FontVec> {
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                warn!(?path, error = %e, "failed to read font file");
                return None;
            }
        };
        match FontVec::try_from_vec(data) {
            Ok(font) => {
                info!(?path, "loaded annotation font");
                Some(font)
            }
            Err(e) => {
                warn!(?path, error = %e, "failed to parse font file");
                None
            }
        }
    }
}

fn frame_file_name(frame_number: u32) -> String {
    format!("frame_{frame_number:08}.png")
}
