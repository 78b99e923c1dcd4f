//! Video test fixtures: fetch sample clips, decode them to RGB frames and
//! sample a fixed number of frames deterministically.

pub mod asset;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod video;

pub use asset::{AssetCache, AssetStore, HubStore, VideoAsset};
pub use error::{DecodeFailure, FetchError, VideoError};
pub use video::{Decoder, FfmpegDecoder, Frame};
