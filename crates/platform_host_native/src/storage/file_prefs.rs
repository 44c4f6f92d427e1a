//! File-backed preference stores, one JSON map file per store name.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use platform_host::{
    ApplicationContext, PrefsAccessMode, PrefsStore, PrefsStoreFuture, PrefsStoreOpener,
    SharedPrefsStore,
};

type PrefMap = BTreeMap<String, String>;

const PRIVATE_DIR_MODE: u32 = 0o700;
const PRIVATE_FILE_MODE: u32 = 0o600;

static STAGING_SEQ: AtomicU64 = AtomicU64::new(0);

// One lock per backing file, shared by every store over that file in this process.
fn shared_write_lock(file: &Path) -> Arc<Mutex<()>> {
    static WRITE_LOCKS: OnceLock<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> = OnceLock::new();
    let mut locks = WRITE_LOCKS
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    Arc::clone(locks.entry(file.to_path_buf()).or_default())
}

fn staging_path(path: &Path) -> PathBuf {
    let seq = STAGING_SEQ.fetch_add(1, Ordering::Relaxed);
    path.with_extension(format!("json.{}.{seq}.tmp", process::id()))
}

fn load_pref_map(path: &Path) -> Result<PrefMap, String> {
    if !path.exists() {
        return Ok(PrefMap::new());
    }
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
    if raw.trim().is_empty() {
        return Ok(PrefMap::new());
    }
    serde_json::from_str(&raw)
        .map_err(|err| format!("failed to parse prefs map {}: {err}", path.display()))
}

fn save_pref_map(path: &Path, map: &PrefMap, mode: PrefsAccessMode) -> Result<(), String> {
    let serialized = serde_json::to_string(map)
        .map_err(|err| format!("failed to serialize prefs map: {err}"))?;
    let staging = staging_path(path);
    let result = fs::write(&staging, serialized)
        .map_err(|err| format!("failed to write {}: {err}", staging.display()))
        .and_then(|()| apply_access_mode(&staging, mode, PRIVATE_FILE_MODE))
        .and_then(|()| {
            fs::rename(&staging, path).map_err(|err| {
                format!(
                    "failed to replace {} with {}: {err}",
                    path.display(),
                    staging.display()
                )
            })
        });
    if result.is_err() {
        let _ = fs::remove_file(&staging);
    }
    result
}

fn apply_access_mode(path: &Path, mode: PrefsAccessMode, private_bits: u32) -> Result<(), String> {
    match mode {
        PrefsAccessMode::Private => restrict_permissions(path, private_bits),
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path, bits: u32) -> Result<(), String> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(bits))
        .map_err(|err| format!("failed to restrict permissions on {}: {err}", path.display()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path, _bits: u32) -> Result<(), String> {
    Ok(())
}

fn validate_key(key: &str) -> Result<(), String> {
    if key.is_empty() {
        Err("Preference key must not be empty".to_string())
    } else {
        Ok(())
    }
}

fn store_file(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.json"))
}

fn validate_store_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Preference store name must not be empty".to_string());
    }
    if name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(format!("invalid preference store name `{name}`"));
    }
    Ok(())
}

#[derive(Debug)]
/// Named preference store backed by a single JSON map file.
///
/// Every operation re-reads the file, so independently opened stores over the same file observe
/// each other's writes. Read-modify-write cycles on one file are serialized process-wide.
pub struct FilePrefsStore {
    file: PathBuf,
    mode: PrefsAccessMode,
    write_lock: Arc<Mutex<()>>,
}

impl FilePrefsStore {
    /// Opens (creating the directory if needed) the store `name` inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error when `name` is not a plain file stem or `dir` cannot be prepared.
    pub fn open(dir: impl AsRef<Path>, name: &str, mode: PrefsAccessMode) -> Result<Self, String> {
        validate_store_name(name)?;
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .map_err(|err| format!("failed to create prefs dir {}: {err}", dir.display()))?;
        apply_access_mode(dir, mode, PRIVATE_DIR_MODE)?;
        let file = store_file(dir, name);
        let write_lock = shared_write_lock(&file);
        Ok(Self {
            file,
            mode,
            write_lock,
        })
    }

    /// Path of the backing JSON file.
    pub fn path(&self) -> &Path {
        &self.file
    }

    /// Loads a preference payload by key.
    pub fn load(&self, key: &str) -> Result<Option<String>, String> {
        validate_key(key)?;
        let map = load_pref_map(&self.file)?;
        Ok(map.get(key).cloned())
    }

    /// Saves a preference payload by key.
    pub fn save(&self, key: &str, raw_json: &str) -> Result<(), String> {
        validate_key(key)?;
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut map = load_pref_map(&self.file)?;
        map.insert(key.to_string(), raw_json.to_string());
        save_pref_map(&self.file, &map, self.mode)
    }

    /// Deletes a preference key.
    pub fn delete(&self, key: &str) -> Result<(), String> {
        validate_key(key)?;
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut map = load_pref_map(&self.file)?;
        if map.remove(key).is_none() {
            return Ok(());
        }
        save_pref_map(&self.file, &map, self.mode)
    }
}

impl PrefsStore for FilePrefsStore {
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move { self.load(key) })
    }

    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async move { self.save(key, raw_json) })
    }

    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async move { self.delete(key) })
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Opens [`FilePrefsStore`]s under [`ApplicationContext::prefs_dir`].
///
/// Each backing file gets one store per process; reopening returns the same handle.
pub struct FilePrefsOpener;

impl PrefsStoreOpener for FilePrefsOpener {
    fn open_prefs(
        &self,
        context: &ApplicationContext,
        name: &str,
        mode: PrefsAccessMode,
    ) -> Result<SharedPrefsStore, String> {
        static OPEN_STORES: OnceLock<Mutex<HashMap<PathBuf, Arc<FilePrefsStore>>>> =
            OnceLock::new();

        validate_store_name(name)?;
        let dir = context.prefs_dir();
        let file = store_file(&dir, name);
        let mut stores = OPEN_STORES
            .get_or_init(Default::default)
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(store) = stores.get(&file) {
            return Ok(Arc::clone(store) as SharedPrefsStore);
        }

        let store = Arc::new(FilePrefsStore::open(&dir, name, mode)?);
        tracing::debug!(
            app_id = context.app_id(),
            store = name,
            path = %store.path().display(),
            "opened file-backed preference store"
        );
        stores.insert(file, Arc::clone(&store));
        Ok(store as SharedPrefsStore)
    }
}
