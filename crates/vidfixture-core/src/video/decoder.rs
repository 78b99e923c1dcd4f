use std::path::Path;
use std::process::{Command, Stdio};

use image::RgbImage;
use tracing::{debug, error, info};

use crate::config::ToolConfig;
use crate::error::{DecodeFailure, VideoError};

use super::frame::Frame;
use super::probe::{self, VideoInfo};

/// Turns a video file into its full, ordered frame sequence.
pub trait Decoder {
    fn decode(&self, path: &Path) -> Result<Vec<Frame>, VideoError>;
}

/// Decodes video frames by piping raw RGB24 data from the ffmpeg CLI.
#[derive(Debug, Clone, Default)]
pub struct FfmpegDecoder {
    tools: ToolConfig,
}

impl FfmpegDecoder {
    pub fn new(tools: ToolConfig) -> Self {
        Self { tools }
    }

    pub fn tools(&self) -> &ToolConfig {
        &self.tools
    }

    /// Read width, height, frame rate and codec of the first video stream.
    pub fn probe(&self, path: &Path) -> Result<VideoInfo, VideoError> {
        probe::probe(&self.tools.ffprobe, path)
    }

    fn run_ffmpeg(&self, path: &Path) -> Result<Vec<u8>, DecodeFailure> {
        let program = self.tools.ffmpeg.display().to_string();
        info!(?path, %program, "spawning ffmpeg decoder process");

        let output = Command::new(&self.tools.ffmpeg)
            .args(["-v", "error", "-nostdin", "-i"])
            .arg(path)
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24", "pipe:1"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| DecodeFailure::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!(%stderr, ?path, status = %output.status, "ffmpeg failed");
            return Err(DecodeFailure::Exit {
                program,
                status: output.status,
                stderr,
            });
        }

        debug!(bytes = output.stdout.len(), "ffmpeg output captured");
        Ok(output.stdout)
    }
}

impl Decoder for FfmpegDecoder {
    fn decode(&self, path: &Path) -> Result<Vec<Frame>, VideoError> {
        let info = self.probe(path)?;

        let frames = self
            .run_ffmpeg(path)
            .and_then(|raw| frames_from_raw(&raw, &info))
            .map_err(|source| VideoError::Decode {
                path: path.to_path_buf(),
                source,
            })?;

        info!(
            ?path,
            frames = frames.len(),
            width = info.width,
            height = info.height,
            "video decoded"
        );
        Ok(frames)
    }
}

/// Split a flat RGB24 buffer into frames of the probed size.
///
/// The buffer must hold at least one frame and a whole number of frames.
pub fn frames_from_raw(raw: &[u8], info: &VideoInfo) -> Result<Vec<Frame>, DecodeFailure> {
    let frame_bytes = info.frame_bytes();
    if frame_bytes == 0 {
        return Err(DecodeFailure::InvalidDimensions {
            width: info.width,
            height: info.height,
        });
    }
    if raw.is_empty() {
        return Err(DecodeFailure::NoFrames);
    }
    if raw.len() % frame_bytes != 0 {
        error!(
            len = raw.len(),
            frame_bytes, "ffmpeg output ended mid-frame"
        );
        return Err(DecodeFailure::TruncatedFrame {
            len: raw.len(),
            frame_bytes,
        });
    }

    raw.chunks_exact(frame_bytes)
        .enumerate()
        .map(|(i, chunk)| -> Result<Frame, DecodeFailure> {
            let image = RgbImage::from_raw(info.width, info.height, chunk.to_vec()).ok_or(
                DecodeFailure::TruncatedFrame {
                    len: chunk.len(),
                    frame_bytes,
                },
            )?;
            let frame_number = i as u32;
            let timestamp_seconds = if info.fps > 0.0 {
                frame_number as f64 / info.fps
            } else {
                0.0
            };
            Ok(Frame {
                image,
                frame_number,
                timestamp_seconds,
            })
        })
        .collect()
}
