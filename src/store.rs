use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::api::{DynStorage, Storage};
use crate::entities::CommunityRoute;
use crate::error::{storage_error, Error};

/// One file per key under a directory. Writes go to a sibling temp file and are renamed
/// into place, so readers only ever see a complete record.
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, Error> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();

        self.dir.join(format!("{}.json", file_name))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");

        let mut file = fs::File::create(&tmp)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp, &path)?;

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(key: &str, value: &str) -> Result<Self, Error> {
        let storage = Self::new();
        storage.set(key, value)?;
        Ok(storage)
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let records = self.records.lock().map_err(storage_error)?;
        Ok(records.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        let mut records = self.records.lock().map_err(storage_error)?;
        records.insert(key.into(), value.into());
        Ok(())
    }
}

/// Durable collection of community routes kept under a single storage record.
pub struct CommunityRouteStore {
    storage: DynStorage,
    key: String,
}

impl std::fmt::Debug for CommunityRouteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommunityRouteStore")
            .field("key", &self.key)
            .finish()
    }
}

impl CommunityRouteStore {
    pub fn new(storage: DynStorage, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Stored routes in saved order. Missing, unreadable or malformed data loads as empty.
    #[tracing::instrument(skip(self), fields(key = %self.key))]
    pub fn load(&self) -> Vec<CommunityRoute> {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                tracing::warn!("could not read community routes: {}", err);
                return Vec::new();
            }
        };

        let routes = match serde_json::from_str::<Vec<CommunityRoute>>(&raw) {
            Ok(routes) => routes,
            Err(err) => {
                tracing::warn!("ignoring malformed community routes: {}", err);
                return Vec::new();
            }
        };

        let routes: Vec<CommunityRoute> = routes
            .into_iter()
            .filter(|route| match route.validate() {
                Ok(()) => true,
                Err(err) => {
                    tracing::warn!(id = %route.id, "dropping invalid community route: {}", err);
                    false
                }
            })
            .collect();

        tracing::info!("loaded {} community routes", routes.len());
        routes
    }

    /// Overwrites the record with the whole collection.
    #[tracing::instrument(skip_all, fields(key = %self.key, count = routes.len()))]
    pub fn save(&self, routes: &[CommunityRoute]) -> Result<(), Error> {
        let raw = serde_json::to_string(routes)?;
        self.storage.set(&self.key, &raw)
    }
}
