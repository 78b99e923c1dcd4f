use std::env;
use std::path::PathBuf;

const CACHE_ENV: &str = "VIDFIXTURE_ASSETS_CACHE";
const ENDPOINT_ENV: &str = "HF_ENDPOINT";
const TOKEN_ENV: &str = "HF_TOKEN";

const DEFAULT_ENDPOINT: &str = "https://huggingface.co";
const DEFAULT_REPO_ID: &str = "raushan-testing-hf/videos-test";
const DEFAULT_REVISION: &str = "main";
const VIDEO_SUBDIR: &str = "video-example-data";

/// Where video assets come from and where they are cached.
#[derive(Clone, PartialEq, Eq)]
pub struct AssetConfig {
    /// Base URL of the dataset hub.
    pub endpoint: String,
    /// Dataset repository holding the videos.
    pub repo_id: String,
    /// Branch, tag or commit to download from.
    pub revision: String,
    /// Directory the downloaded files are stored in, keyed by file name.
    pub cache_dir: PathBuf,
    /// Bearer token for gated repositories.
    pub token: Option<String>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            repo_id: DEFAULT_REPO_ID.to_string(),
            revision: DEFAULT_REVISION.to_string(),
            cache_dir: default_cache_root().join(VIDEO_SUBDIR),
            token: None,
        }
    }
}

impl AssetConfig {
    /// Defaults with `VIDFIXTURE_ASSETS_CACHE`, `HF_ENDPOINT` and `HF_TOKEN` applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(root) = non_empty_var(CACHE_ENV) {
            config.cache_dir = PathBuf::from(root).join(VIDEO_SUBDIR);
        }
        if let Some(endpoint) = non_empty_var(ENDPOINT_ENV) {
            config.endpoint = endpoint.trim_end_matches('/').to_string();
        }
        config.token = non_empty_var(TOKEN_ENV);
        config
    }

    /// Download URL for a file in the configured dataset.
    pub fn file_url(&self, name: &str) -> String {
        format!(
            "{}/datasets/{}/resolve/{}/{}",
            self.endpoint, self.repo_id, self.revision, name
        )
    }
}

// Hand-written so the token never lands in logs.
impl std::fmt::Debug for AssetConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetConfig")
            .field("endpoint", &self.endpoint)
            .field("repo_id", &self.repo_id)
            .field("revision", &self.revision)
            .field("cache_dir", &self.cache_dir)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn default_cache_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(env::temp_dir)
        .join("vidfixture")
        .join("assets")
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}
