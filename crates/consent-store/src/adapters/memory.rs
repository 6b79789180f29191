use crate::codec;
use crate::error::StoreError;
use crate::ports::ConsentStore;
use consent_types::config::DEFAULT_KEY_PREFIX;
use consent_types::{ConsentId, ConsentValue, Decision};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, warn};

/// In-memory consent store.
///
/// Keeps raw flag strings keyed by flag name, so tests can plant corrupt or
/// foreign values the way another party sharing the substrate could.
pub struct InMemoryConsentStore {
    prefix: String,
    flags: RwLock<HashMap<String, String>>,
}

impl InMemoryConsentStore {
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_KEY_PREFIX)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            flags: RwLock::new(HashMap::new()),
        }
    }

    /// Overwrite a flag with an arbitrary value, bypassing the codec.
    pub fn set_raw(&self, id: &str, value: impl Into<String>) {
        let name = self.flag_name(id);
        self.flags.write().insert(name, value.into());
    }

    /// Drop a flag, as substrate expiry would.
    pub fn remove(&self, id: &str) -> bool {
        let name = self.flag_name(id);
        self.flags.write().remove(&name).is_some()
    }

    /// Raw flag value for `id`.
    pub fn raw(&self, id: &str) -> Option<String> {
        self.flags.read().get(&self.flag_name(id)).cloned()
    }

    pub fn len(&self) -> usize {
        self.flags.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.read().is_empty()
    }

    fn flag_name(&self, id: &str) -> String {
        format!("{}{}", self.prefix, id)
    }
}

impl Default for InMemoryConsentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsentStore for InMemoryConsentStore {
    fn get(&self, id: &ConsentId) -> ConsentValue {
        let Some(raw) = self.raw(id.as_str()) else {
            return ConsentValue::Unknown;
        };
        let value = codec::decode(&raw);
        if value.is_unknown() {
            warn!(id = %id, raw = %raw, "Unparseable consent flag read as unknown");
        }
        value
    }

    fn set(&self, ids: &[ConsentId], decision: Decision) -> Result<(), StoreError> {
        let flag = codec::encode(decision);
        let mut flags = self.flags.write();
        for id in ids {
            flags.insert(self.flag_name(id.as_str()), flag.to_string());
        }
        debug!(ids = ?ids, decision = %decision, "Consent flags stored in memory");
        Ok(())
    }
}
