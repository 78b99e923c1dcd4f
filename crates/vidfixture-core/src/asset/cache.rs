use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use crate::error::{FetchError, VideoError};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Source of asset bytes, e.g. a remote dataset repository.
pub trait AssetStore {
    /// Write the asset called `name` to `dest`.
    fn fetch(&self, name: &str, dest: &Path) -> Result<(), FetchError>;
}

impl<T: AssetStore + ?Sized> AssetStore for Arc<T> {
    fn fetch(&self, name: &str, dest: &Path) -> Result<(), FetchError> {
        (**self).fetch(name, dest)
    }
}

/// Maps asset names to local files, fetching from `S` on first use.
///
/// Resolved paths are memoized per cache instance. The memo lock is not held
/// while fetching, so two threads resolving the same new asset may both
/// download it; each writes a private temporary file and renames it into
/// place, so readers only ever see complete files.
pub struct AssetCache<S> {
    dir: PathBuf,
    store: S,
    resolved: Mutex<HashMap<String, PathBuf>>,
}

impl<S: AssetStore> AssetCache<S> {
    pub fn new(dir: impl Into<PathBuf>, store: S) -> Self {
        Self {
            dir: dir.into(),
            store,
            resolved: Mutex::new(HashMap::new()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Local path of `name`, downloading it if it is not cached yet.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, VideoError> {
        validate_name(name)?;

        if let Some(path) = self.memo().get(name) {
            debug!(name, ?path, "asset path memoized");
            return Ok(path.clone());
        }

        let path = self.dir.join(name);
        if path.is_file() {
            debug!(name, ?path, "asset already on disk");
        } else {
            self.download(name, &path)?;
        }

        self.memo().insert(name.to_string(), path.clone());
        Ok(path)
    }

    fn download(&self, name: &str, path: &Path) -> Result<(), VideoError> {
        fs::create_dir_all(&self.dir).map_err(|source| VideoError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let tmp = self.dir.join(format!(
            ".{name}.{}-{}.part",
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        info!(name, ?path, "downloading asset");
        if let Err(source) = self.store.fetch(name, &tmp) {
            remove_temp(&tmp);
            return Err(VideoError::Fetch {
                name: name.to_string(),
                source,
            });
        }

        fs::rename(&tmp, path).map_err(|source| {
            remove_temp(&tmp);
            VideoError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;

        info!(name, ?path, "asset cached");
        Ok(())
    }

    fn memo(&self) -> std::sync::MutexGuard<'_, HashMap<String, PathBuf>> {
        // The map holds only finished inserts, so a poisoned lock is still consistent.
        self.resolved.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn validate_name(name: &str) -> Result<(), VideoError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || Path::new(name).is_absolute();
    if invalid {
        return Err(VideoError::InvalidAssetName {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn remove_temp(tmp: &Path) {
    if let Err(e) = fs::remove_file(tmp) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(?tmp, error = %e, "failed to remove partial download");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use tracing_test::traced_test;

    use super::*;

    /// Serves fixed bytes for known names and counts fetches.
    #[derive(Default)]
    struct FakeStore {
        files: HashMap<String, Vec<u8>>,
        fetches: AtomicUsize,
    }

    impl FakeStore {
        fn with(name: &str, bytes: &[u8]) -> Self {
            let mut store = Self::default();
            store.files.insert(name.to_string(), bytes.to_vec());
            store
        }

        fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    impl AssetStore for FakeStore {
        fn fetch(&self, name: &str, dest: &Path) -> Result<(), FetchError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let bytes = self
                .files
                .get(name)
                .ok_or_else(|| FetchError::NotFound(name.to_string()))?;
            fs::write(dest, bytes)?;
            Ok(())
        }
    }

    #[traced_test]
    #[test]
    fn first_resolve_downloads_then_memoizes() {
        let dir = tempfile::tempdir().unwrap();
        let cache = AssetCache::new(dir.path().join("videos"), FakeStore::with("a.mp4", b"abc"));

        let first = cache.resolve("a.mp4").unwrap();
        let second = cache.resolve("a.mp4").unwrap();

        assert_eq!(first, dir.path().join("videos").join("a.mp4"));
        assert_eq!(first, second);
        assert_eq!(fs::read(&first).unwrap(), b"abc");
        assert_eq!(cache.store().fetches(), 1);
        assert!(logs_contain("asset cached"));
    }

    #[test]
    fn existing_file_is_reused_without_fetching() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.mp4"), b"cached").unwrap();
        let cache = AssetCache::new(dir.path(), FakeStore::default());

        let path = cache.resolve("b.mp4").unwrap();

        assert_eq!(fs::read(path).unwrap(), b"cached");
        assert_eq!(cache.store().fetches(), 0);
    }

    #[test]
    fn store_failure_surfaces_as_fetch_error_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let cache = AssetCache::new(dir.path(), FakeStore::default());

        let err = cache.resolve("missing.mp4").unwrap_err();

        assert!(matches!(
            err,
            VideoError::Fetch { ref name, source: FetchError::NotFound(_) } if name == "missing.mp4"
        ));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn failed_resolve_is_not_memoized() {
        let dir = tempfile::tempdir().unwrap();
        let cache = AssetCache::new(dir.path(), FakeStore::default());

        assert!(cache.resolve("late.mp4").is_err());
        fs::write(dir.path().join("late.mp4"), b"now here").unwrap();

        assert!(cache.resolve("late.mp4").is_ok());
    }

    #[test]
    fn path_like_names_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cache = AssetCache::new(dir.path(), FakeStore::default());

        for name in ["", ".", "..", "../escape.mp4", "nested/clip.mp4", "a\\b.mp4", "/abs.mp4"] {
            assert!(
                matches!(cache.resolve(name), Err(VideoError::InvalidAssetName { .. })),
                "name={name:?}"
            );
        }
        assert_eq!(cache.store().fetches(), 0);
    }

    #[test]
    fn concurrent_resolves_agree_on_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FakeStore::with("shared.mp4", b"shared bytes"));
        let cache = Arc::new(AssetCache::new(dir.path(), Arc::clone(&store)));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.resolve("shared.mp4").unwrap())
            })
            .collect();
        let paths: Vec<PathBuf> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(paths.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(fs::read(&paths[0]).unwrap(), b"shared bytes");
        assert!((1..=4).contains(&store.fetches()));
    }
}
