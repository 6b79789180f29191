use crate::codec;
use crate::error::StoreError;
use crate::ports::ConsentStore;
use consent_types::config::DEFAULT_KEY_PREFIX;
use consent_types::{ConsentId, ConsentValue, Decision};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File-backed consent store.
///
/// Flags live in a JSON object (`{"consent-ads": "1"}`) that is rewritten
/// through a temporary file and a rename after every `set`. A `set` whose
/// write fails leaves the store unchanged.
pub struct FileConsentStore {
    prefix: String,
    path: PathBuf,
    flags: RwLock<BTreeMap<String, String>>,
}

impl FileConsentStore {
    /// Open the store at `path`, loading existing flags. A missing file is an
    /// empty store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::open_with_prefix(path, DEFAULT_KEY_PREFIX)
    }

    pub fn open_with_prefix<P: AsRef<Path>>(
        path: P,
        prefix: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let flags = Self::load_from_file(&path)?;

        if flags.is_empty() {
            info!(path = %path.display(), "No stored consent flags");
        } else {
            info!(path = %path.display(), flags = flags.len(), "Loaded consent flags");
        }

        Ok(Self {
            prefix: prefix.into(),
            path,
            flags: RwLock::new(flags),
        })
    }

    fn load_from_file(path: &Path) -> Result<BTreeMap<String, String>, StoreError> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn persist(&self, flags: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(flags)?;
        let tmp = self.path.with_extension("tmp");
        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        std::fs::write(&tmp, bytes).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.read().is_empty()
    }

    fn flag_name(&self, id: &str) -> String {
        format!("{}{}", self.prefix, id)
    }
}

impl ConsentStore for FileConsentStore {
    fn get(&self, id: &ConsentId) -> ConsentValue {
        let flags = self.flags.read();
        let Some(raw) = flags.get(&self.flag_name(id.as_str())) else {
            return ConsentValue::Unknown;
        };
        let value = codec::decode(raw);
        if value.is_unknown() {
            warn!(id = %id, raw = %raw, "Unparseable consent flag read as unknown");
        }
        value
    }

    fn set(&self, ids: &[ConsentId], decision: Decision) -> Result<(), StoreError> {
        let flag = codec::encode(decision);
        let mut flags = self.flags.write();
        let mut next = flags.clone();
        for id in ids {
            next.insert(self.flag_name(id.as_str()), flag.to_string());
        }
        // Only what reached the disk becomes visible.
        self.persist(&next)?;
        *flags = next;
        debug!(
            path = %self.path.display(),
            ids = ?ids,
            decision = %decision,
            "Consent flags persisted"
        );
        Ok(())
    }
}
