use std::path::Path;
use std::process::{Command, Stdio};

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::error::{DecodeFailure, VideoError};

/// Metadata of the first video stream in a file.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    /// Frames per second, 0.0 when ffprobe does not report a usable rate.
    pub fps: f64,
    pub codec: Option<String>,
}

impl VideoInfo {
    /// Size of one RGB24 frame in bytes.
    pub fn frame_bytes(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
}

/// Run ffprobe on `path` and return the first video stream's metadata.
pub(crate) fn probe(ffprobe: &Path, path: &Path) -> Result<VideoInfo, VideoError> {
    info!(?path, "probing video metadata with ffprobe");

    let decode_err = |source: DecodeFailure| VideoError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let output = Command::new(ffprobe)
        .args(["-v", "error", "-print_format", "json", "-show_streams"])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|source| {
            decode_err(DecodeFailure::Spawn {
                program: ffprobe.display().to_string(),
                source,
            })
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        error!(%stderr, ?path, "ffprobe failed");
        return Err(decode_err(DecodeFailure::Exit {
            program: ffprobe.display().to_string(),
            status: output.status,
            stderr,
        }));
    }

    match parse_probe_output(&output.stdout).map_err(decode_err)? {
        Some(info) => {
            info!(
                width = info.width,
                height = info.height,
                fps = info.fps,
                codec = ?info.codec,
                "probe completed"
            );
            Ok(info)
        }
        None => {
            warn!(?path, "no video stream in probe output");
            Err(VideoError::NoVideoStream {
                path: path.to_path_buf(),
            })
        }
    }
}

/// Parse `ffprobe -print_format json -show_streams` output.
///
/// Returns `Ok(None)` when the file has no video stream.
pub fn parse_probe_output(json: &[u8]) -> Result<Option<VideoInfo>, DecodeFailure> {
    let parsed: ProbeOutput = serde_json::from_slice(json)?;

    let Some(stream) = parsed
        .streams
        .into_iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
    else {
        return Ok(None);
    };

    let width = stream.width.unwrap_or(0);
    let height = stream.height.unwrap_or(0);
    if width == 0 || height == 0 {
        return Err(DecodeFailure::InvalidDimensions { width, height });
    }

    let fps = stream
        .r_frame_rate
        .as_deref()
        .and_then(parse_frame_rate)
        .unwrap_or(0.0);

    Ok(Some(VideoInfo {
        width,
        height,
        fps,
        codec: stream.codec_name,
    }))
}

/// Parse "num/den" or a plain number. Non-positive or malformed rates yield `None`.
fn parse_frame_rate(rate: &str) -> Option<f64> {
    let fps = match rate.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den > 0.0 {
                num / den
            } else {
                0.0
            }
        }
        None => rate.trim().parse().ok()?,
    };
    (fps > 0.0).then_some(fps)
}
