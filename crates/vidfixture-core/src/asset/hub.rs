use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{error, info};

use crate::config::AssetConfig;
use crate::error::FetchError;

use super::cache::AssetStore;

/// Downloads dataset files from a Hugging Face style hub with the curl CLI.
#[derive(Debug, Clone)]
pub struct HubStore {
    config: AssetConfig,
    curl: PathBuf,
}

impl HubStore {
    pub fn new(config: AssetConfig) -> Self {
        Self {
            config,
            curl: PathBuf::from("curl"),
        }
    }

    /// Use a specific curl executable instead of the one on `PATH`.
    pub fn with_curl(mut self, curl: impl Into<PathBuf>) -> Self {
        self.curl = curl.into();
        self
    }

    pub fn config(&self) -> &AssetConfig {
        &self.config
    }

    fn command(&self, url: &str, dest: &Path) -> Command {
        let mut cmd = Command::new(&self.curl);
        // -f: HTTP errors become a non-zero exit instead of an error page on disk.
        cmd.args(["-fsSL", "--proto", "=https,http", "-o"])
            .arg(dest)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        if let Some(token) = &self.config.token {
            cmd.arg("-H").arg(format!("Authorization: Bearer {token}"));
        }
        cmd
    }
}

impl AssetStore for HubStore {
    fn fetch(&self, name: &str, dest: &Path) -> Result<(), FetchError> {
        let url = self.config.file_url(name);
        info!(%url, ?dest, "fetching asset from hub");

        let output = self
            .command(&url, dest)
            .output()
            .map_err(|source| FetchError::Spawn {
                program: self.curl.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!(%url, %stderr, status = %output.status, "asset download failed");
            return Err(FetchError::Download {
                url,
                status: output.status,
                stderr,
            });
        }

        info!(%url, "asset fetched");
        Ok(())
    }
}
