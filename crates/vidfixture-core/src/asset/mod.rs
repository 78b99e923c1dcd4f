mod cache;
mod hub;

pub use cache::{AssetCache, AssetStore};
pub use hub::HubStore;

use std::path::PathBuf;

use image::RgbImage;
use ndarray::Array4;

use crate::config::AssetConfig;
use crate::error::VideoError;
use crate::pipeline;
use crate::video::{Decoder, Frame};

/// Demo clip in the default video dataset.
pub const SAMPLE_DEMO_1: &str = "sample_demo_1.mp4";

/// A named video fixture and the number of frames to sample from it.
///
/// Pure value: nothing is downloaded or decoded until one of the
/// resolving methods is called, and results are not kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoAsset {
    name: String,
    num_frames: Option<usize>,
}

impl VideoAsset {
    /// All frames of `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            num_frames: None,
        }
    }

    /// Sample `num_frames` frames, or all frames when `None`.
    pub fn with_num_frames(mut self, num_frames: Option<usize>) -> Self {
        self.num_frames = num_frames;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_frames(&self) -> Option<usize> {
        self.num_frames
    }

    /// Local path of the asset, fetching it into `cache` if needed.
    pub fn resolve<S: AssetStore>(&self, cache: &AssetCache<S>) -> Result<PathBuf, VideoError> {
        cache.resolve(&self.name)
    }

    /// Decoded and sampled frames.
    pub fn frames<S: AssetStore>(
        &self,
        cache: &AssetCache<S>,
        decoder: &dyn Decoder,
    ) -> Result<Vec<Frame>, VideoError> {
        let path = self.resolve(cache)?;
        pipeline::load_frames(decoder, &path, self.num_frames)
    }

    /// Frames stacked as (frames, height, width, 3).
    pub fn ndarray<S: AssetStore>(
        &self,
        cache: &AssetCache<S>,
        decoder: &dyn Decoder,
    ) -> Result<Array4<u8>, VideoError> {
        let path = self.resolve(cache)?;
        pipeline::video_to_ndarray(decoder, &path, self.num_frames)
    }

    /// Frames as one RGB image each.
    pub fn images<S: AssetStore>(
        &self,
        cache: &AssetCache<S>,
        decoder: &dyn Decoder,
    ) -> Result<Vec<RgbImage>, VideoError> {
        let path = self.resolve(cache)?;
        pipeline::video_to_images(decoder, &path, self.num_frames)
    }
}

/// Cache backed by the configured hub, rooted at `config.cache_dir`.
pub fn hub_cache(config: AssetConfig) -> AssetCache<HubStore> {
    let dir = config.cache_dir.clone();
    AssetCache::new(dir, HubStore::new(config))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use image::Rgb;

    use super::*;
    use crate::error::FetchError;

    /// Writes a placeholder file for any name.
    struct PlaceholderStore;

    impl AssetStore for PlaceholderStore {
        fn fetch(&self, _name: &str, dest: &Path) -> Result<(), FetchError> {
            fs::write(dest, b"placeholder")?;
            Ok(())
        }
    }

    /// Produces `len` 4x4 frames whose red channel is the frame number.
    struct SyntheticDecoder {
        len: u32,
    }

    impl Decoder for SyntheticDecoder {
        fn decode(&self, _path: &Path) -> Result<Vec<Frame>, VideoError> {
            Ok((0..self.len)
                .map(|i| Frame {
                    image: RgbImage::from_pixel(4, 4, Rgb([i as u8, 0, 0])),
                    frame_number: i,
                    timestamp_seconds: i as f64 / 10.0,
                })
                .collect())
        }
    }

    #[test]
    fn descriptor_defaults_to_all_frames() {
        let asset = VideoAsset::new(SAMPLE_DEMO_1);
        assert_eq!(asset.name(), "sample_demo_1.mp4");
        assert_eq!(asset.num_frames(), None);
        assert_eq!(asset.clone().with_num_frames(Some(8)).num_frames(), Some(8));
    }

    #[test]
    fn ndarray_of_sampled_asset() {
        let dir = tempfile::tempdir().unwrap();
        let cache = AssetCache::new(dir.path(), PlaceholderStore);
        let asset = VideoAsset::new("clip.mp4").with_num_frames(Some(4));

        let array = asset.ndarray(&cache, &SyntheticDecoder { len: 10 }).unwrap();

        assert_eq!(array.dim(), (4, 4, 4, 3));
        let reds: Vec<u8> = (0..4).map(|i| array[[i, 0, 0, 0]]).collect();
        assert_eq!(reds, vec![0, 3, 6, 9]);
    }

    #[test]
    fn images_of_whole_asset() {
        let dir = tempfile::tempdir().unwrap();
        let cache = AssetCache::new(dir.path(), PlaceholderStore);

        let images = VideoAsset::new("clip.mp4")
            .images(&cache, &SyntheticDecoder { len: 5 })
            .unwrap();

        assert_eq!(images.len(), 5);
        assert_eq!(images[4].get_pixel(3, 3).0, [4, 0, 0]);
    }

    #[test]
    fn short_asset_reports_insufficient_frames() {
        let dir = tempfile::tempdir().unwrap();
        let cache = AssetCache::new(dir.path(), PlaceholderStore);
        let asset = VideoAsset::new("short.mp4").with_num_frames(Some(16));

        let err = asset
            .frames(&cache, &SyntheticDecoder { len: 9 })
            .unwrap_err();

        match err {
            VideoError::InsufficientFrames {
                path,
                requested,
                actual,
            } => {
                assert_eq!(path, dir.path().join("short.mp4"));
                assert_eq!((requested, actual), (16, 9));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
