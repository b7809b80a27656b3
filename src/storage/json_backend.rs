use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    errors::Result,
    utils::{app_data_dir, ensure_dir},
};

use super::PrefStore;

const WALLET_FILE: &str = "wallet.json";
const TMP_SUFFIX: &str = "tmp";
const CURRENT_SCHEMA_VERSION: u8 = 1;

/// On-disk shape of the preference file.
#[derive(Debug, Serialize, Deserialize)]
struct PrefFile {
    #[serde(default = "schema_version_default")]
    schema_version: u8,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    values: BTreeMap<String, i64>,
}

fn schema_version_default() -> u8 {
    CURRENT_SCHEMA_VERSION
}

/// File-backed integer store. Writes are buffered in memory until `flush`,
/// which rewrites the whole file atomically (temp file plus rename).
pub struct JsonPrefStore {
    path: PathBuf,
    values: BTreeMap<String, i64>,
}

impl JsonPrefStore {
    /// Opens a store rooted at `root`, defaulting to the application data
    /// directory. A missing file yields an empty store; the file is only
    /// created on the first flush.
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let base = root.unwrap_or_else(app_data_dir);
        ensure_dir(&base)?;
        let path = base.join(WALLET_FILE);
        let values = if path.exists() {
            let data = fs::read_to_string(&path)?;
            let file: PrefFile = serde_json::from_str(&data)?;
            file.values
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PrefStore for JsonPrefStore {
    fn get_int(&self, key: &str) -> Option<i64> {
        self.values.get(key).copied()
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.values.insert(key.to_string(), value);
    }

    fn has_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn flush(&mut self) -> Result<()> {
        let file = PrefFile {
            schema_version: CURRENT_SCHEMA_VERSION,
            updated_at: Utc::now(),
            values: self.values.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with_temp_dir() -> (JsonPrefStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store = JsonPrefStore::new(Some(temp.path().to_path_buf())).expect("json store");
        (store, temp)
    }

    #[test]
    fn missing_file_yields_empty_store() {
        let (store, _guard) = store_with_temp_dir();
        assert_eq!(store.get_int("coins"), None);
        assert!(!store.has_key("coins"));
    }

    #[test]
    fn set_flush_and_reload_round_trip() {
        let (mut store, guard) = store_with_temp_dir();
        store.set_int("coins", 42);
        store.set_int("initial_reward", 1);
        store.flush().expect("flush");

        let reloaded =
            JsonPrefStore::new(Some(guard.path().to_path_buf())).expect("reload store");
        assert_eq!(reloaded.get_int("coins"), Some(42));
        assert_eq!(reloaded.get_int("initial_reward"), Some(1));
        assert!(reloaded.has_key("coins"));
    }

    #[test]
    fn flush_leaves_no_temp_residue() {
        let (mut store, guard) = store_with_temp_dir();
        store.set_int("gems", 7);
        store.flush().expect("flush");

        let leftovers: Vec<_> = fs::read_dir(guard.path())
            .expect("read dir")
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry
                    .path()
                    .to_string_lossy()
                    .ends_with(&format!(".{}", TMP_SUFFIX))
            })
            .collect();
        assert!(leftovers.is_empty(), "temp file should be renamed away");
    }

    #[test]
    fn unflushed_writes_stay_in_memory() {
        let (mut store, guard) = store_with_temp_dir();
        store.set_int("energy", 5);
        assert_eq!(store.get_int("energy"), Some(5));

        let fresh = JsonPrefStore::new(Some(guard.path().to_path_buf())).expect("fresh store");
        assert_eq!(fresh.get_int("energy"), None);
    }
}
