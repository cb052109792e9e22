use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use ocr_core::ports::{KeyValueStorePort, StorageError};

type Entries = BTreeMap<String, String>;

/// Key-value store persisted as one JSON object.
///
/// 基于单个 JSON 文件的键值存储。Writes go to a temp file that is renamed over
/// the target, so readers see either the old or the new map.
pub struct JsonFileKeyValueStore {
    path: PathBuf,
    // Serialises read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonFileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn map_io_error(context: &str, path: &Path, err: io::Error) -> StorageError {
        StorageError::Unavailable(format!("{context} {}: {err}", path.display()))
    }

    /// Create `path` afresh and write `bytes`. On unix the file is 0600 from
    /// the moment it exists.
    fn write_private(path: &Path, bytes: &[u8]) -> io::Result<()> {
        match fs::remove_file(path) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err),
        }

        let mut options = fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(path)?;
        file.write_all(bytes)?;
        file.sync_all()
    }

    fn read_entries(&self) -> Result<Entries, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Entries::new()),
            Err(err) => return Err(Self::map_io_error("failed to read", &self.path, err)),
        };

        if content.trim().is_empty() {
            return Ok(Entries::new());
        }

        serde_json::from_str(&content).map_err(|err| {
            StorageError::Corrupt(format!("{} is not a JSON object of strings: {err}", self.path.display()))
        })
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .map_err(|err| Self::map_io_error("failed to create", dir, err))?;
        }

        let json = serde_json::to_string_pretty(entries)
            .map_err(|err| StorageError::Other(format!("failed to encode store: {err}")))?;

        let tmp_path = self.path.with_extension("json.tmp");
        Self::write_private(&tmp_path, json.as_bytes())
            .map_err(|err| Self::map_io_error("failed to write", &tmp_path, err))?;

        fs::rename(&tmp_path, &self.path)
            .map_err(|err| Self::map_io_error("failed to replace", &self.path, err))?;

        debug!(path = %self.path.display(), entries = entries.len(), "key-value store written");
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut Entries) -> bool) -> Result<(), StorageError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StorageError::Unavailable("store lock poisoned".to_string()))?;

        let mut entries = self.read_entries()?;
        if f(&mut entries) {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

impl KeyValueStorePort for JsonFileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.update(|entries| entries.remove(key).is_some())
    }
}
