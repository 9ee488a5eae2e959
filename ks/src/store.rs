//! Credential store implementations

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use eyre::{Context, Result};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::Service;

/// Storage for the per-service API credentials
///
/// Implementations only touch local storage. Clients receive the store as an
/// injected `Arc<dyn CredentialStore>` and read it on every outbound call, so
/// a key set or cleared mid-session takes effect on the next request.
pub trait CredentialStore: Send + Sync {
    /// Get the stored credential, or `None` when the slot is empty
    fn get(&self, service: Service) -> Result<Option<String>>;

    /// Store a credential, overwriting any previous value
    fn set(&self, service: Service, value: &str) -> Result<()>;

    /// Remove a stored credential
    fn clear(&self, service: Service) -> Result<()>;

    /// Check whether a credential is stored
    fn has(&self, service: Service) -> Result<bool> {
        Ok(self.get(service)?.is_some())
    }
}

/// Credential store backed by a single YAML file
pub struct FileKeyStore {
    path: PathBuf,
}

impl FileKeyStore {
    /// Open a store at the given file path, creating its directory if needed
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).context("Failed to create keystore directory")?;
        }
        debug!(?path, "Opened key store");
        Ok(Self { path })
    }

    /// Default location: `<data_local_dir>/wayfarer/credentials.yml`
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wayfarer")
            .join("credentials.yml")
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_slots(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "read_slots: no keystore file yet");
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path)
            .context(format!("Failed to read keystore: {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        let slots: BTreeMap<String, String> =
            serde_yaml::from_str(&content).context("Failed to parse keystore file")?;
        Ok(slots)
    }

    // The temp file is created 0600 and renamed over the target, so the
    // secret is never visible with looser permissions.
    fn write_slots(&self, slots: &BTreeMap<String, String>) -> Result<()> {
        let content = serde_yaml::to_string(slots)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(dir).context("Failed to create keystore temp file")?;
        file.write_all(content.as_bytes())
            .context("Failed to write keystore temp file")?;
        file.persist(&self.path)
            .map_err(|e| e.error)
            .context(format!("Failed to write keystore: {}", self.path.display()))?;

        Ok(())
    }
}

impl CredentialStore for FileKeyStore {
    fn get(&self, service: Service) -> Result<Option<String>> {
        debug!(%service, "FileKeyStore::get: called");
        let mut slots = self.read_slots()?;
        Ok(slots.remove(service.slot()))
    }

    fn set(&self, service: Service, value: &str) -> Result<()> {
        debug!(%service, "FileKeyStore::set: called");
        let mut slots = self.read_slots()?;
        slots.insert(service.slot().to_string(), value.to_string());
        self.write_slots(&slots)?;
        info!(%service, "Credential saved");
        Ok(())
    }

    fn clear(&self, service: Service) -> Result<()> {
        debug!(%service, "FileKeyStore::clear: called");
        let mut slots = self.read_slots()?;
        if slots.remove(service.slot()).is_none() {
            debug!(%service, "FileKeyStore::clear: slot already empty");
            return Ok(());
        }
        self.write_slots(&slots)?;
        info!(%service, "Credential cleared");
        Ok(())
    }
}

/// In-process credential store
#[derive(Default)]
pub struct MemoryKeyStore {
    slots: RwLock<HashMap<Service, String>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store with the given credentials already set
    pub fn with(entries: &[(Service, &str)]) -> Self {
        let slots = entries.iter().map(|(s, v)| (*s, v.to_string())).collect();
        Self {
            slots: RwLock::new(slots),
        }
    }
}

impl CredentialStore for MemoryKeyStore {
    fn get(&self, service: Service) -> Result<Option<String>> {
        let slots = self.slots.read().map_err(|_| eyre::eyre!("Keystore lock poisoned"))?;
        Ok(slots.get(&service).cloned())
    }

    fn set(&self, service: Service, value: &str) -> Result<()> {
        let mut slots = self.slots.write().map_err(|_| eyre::eyre!("Keystore lock poisoned"))?;
        slots.insert(service, value.to_string());
        Ok(())
    }

    fn clear(&self, service: Service) -> Result<()> {
        let mut slots = self.slots.write().map_err(|_| eyre::eyre!("Keystore lock poisoned"))?;
        slots.remove(&service);
        Ok(())
    }
}
