use image::{Rgb, RgbImage};
use ndarray::{Array4, ArrayView3, Axis};

use crate::error::VideoError;

use super::frame::Frame;

/// Stack frames into an array of shape (frames, height, width, 3).
///
/// All frames must share one size.
pub fn frames_to_ndarray(frames: &[Frame]) -> Result<Array4<u8>, VideoError> {
    let Some(first) = frames.first() else {
        return Ok(Array4::zeros((0, 0, 0, 3)));
    };
    let expected = (first.height() as usize, first.width() as usize, 3);

    let mut data = Vec::with_capacity(frames.len() * expected.0 * expected.1 * 3);
    for (index, frame) in frames.iter().enumerate() {
        let actual = (frame.height() as usize, frame.width() as usize, 3);
        if actual != expected {
            return Err(VideoError::FrameShape {
                index,
                expected,
                actual,
            });
        }
        data.extend_from_slice(frame.image.as_raw());
    }

    Ok(Array4::from_shape_vec(
        (frames.len(), expected.0, expected.1, 3),
        data,
    )?)
}

/// Split an (frames, height, width, 3) array into one image per frame.
pub fn ndarray_to_images(frames: &Array4<u8>) -> Result<Vec<RgbImage>, VideoError> {
    let (_, height, width, channels) = frames.dim();
    if channels != 3 {
        return Err(VideoError::FrameShape {
            index: 0,
            expected: (height, width, 3),
            actual: (height, width, channels),
        });
    }
    Ok(frames.axis_iter(Axis(0)).map(view_to_image).collect())
}

/// Drop frame metadata, keeping pixels in order.
pub fn frames_to_images(frames: Vec<Frame>) -> Vec<RgbImage> {
    frames.into_iter().map(|f| f.image).collect()
}

fn view_to_image(view: ArrayView3<'_, u8>) -> RgbImage {
    let (height, width, _) = view.dim();
    RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let (x, y) = (x as usize, y as usize);
        Rgb([view[[y, x, 0]], view[[y, x, 1]], view[[y, x, 2]]])
    })
}
