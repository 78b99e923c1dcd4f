use std::env;
use std::path::PathBuf;

const FFMPEG_ENV: &str = "VIDFIXTURE_FFMPEG";
const FFPROBE_ENV: &str = "VIDFIXTURE_FFPROBE";

/// Locations of the external executables used for decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
        }
    }
}

impl ToolConfig {
    /// Defaults, overridden by `VIDFIXTURE_FFMPEG` / `VIDFIXTURE_FFPROBE` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(path) = env::var_os(FFMPEG_ENV).filter(|v| !v.is_empty()) {
            config.ffmpeg = PathBuf::from(path);
        }
        if let Some(path) = env::var_os(FFPROBE_ENV).filter(|v| !v.is_empty()) {
            config.ffprobe = PathBuf::from(path);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_path_lookup() {
        let config = ToolConfig::default();
        assert_eq!(config.ffmpeg, PathBuf::from("ffmpeg"));
        assert_eq!(config.ffprobe, PathBuf::from("ffprobe"));
    }
}
