pub mod convert;
pub mod decoder;
pub mod frame;
pub mod probe;
pub mod sample;

pub use decoder::{Decoder, FfmpegDecoder};
pub use frame::Frame;
pub use probe::VideoInfo;
