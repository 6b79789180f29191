use crate::codec;
use crate::error::StoreError;
use crate::ports::ConsentStore;
use consent_types::config::{DEFAULT_COOKIE_PATH, DEFAULT_KEY_PREFIX};
use consent_types::{ConsentConfig, ConsentId, ConsentValue, Decision};
use parking_lot::RwLock;
use tracing::{debug, warn};

/// A single `name=value` flag scoped to a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: String,
}

impl Cookie {
    /// The assignment a page would write: `name=value; path=/`.
    #[must_use]
    pub fn set_cookie_line(&self) -> String {
        format!("{}={}; path={}", self.name, self.value, self.path)
    }
}

/// Consent store over a page-style cookie jar.
///
/// Writes go through `Set-Cookie`-like assignments scoped to one path. Reads
/// match the exact cookie name on that path, so a separator inside an id
/// cannot surface as another flag. Flags are never deleted by the
/// store itself; [`CookieJarStore::expire`] models the substrate dropping
/// one.
pub struct CookieJarStore {
    prefix: String,
    path: String,
    /// Cookies in creation order.
    jar: RwLock<Vec<Cookie>>,
}

impl CookieJarStore {
    /// Store with the `consent-` prefix scoped to `/`.
    pub fn new() -> Self {
        Self::with_layout(DEFAULT_KEY_PREFIX, DEFAULT_COOKIE_PATH)
    }

    pub fn with_layout(prefix: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            path: path.into(),
            jar: RwLock::new(Vec::new()),
        }
    }

    pub fn from_config(config: &ConsentConfig) -> Self {
        Self::with_layout(config.key_prefix.clone(), config.cookie_path.clone())
    }

    /// Assign a cookie by name as any other party on the page could.
    pub fn set_raw(&self, name: &str, value: impl Into<String>) {
        let cookie = Cookie {
            name: name.to_string(),
            value: value.into(),
            path: self.path.clone(),
        };
        let mut jar = self.jar.write();
        upsert(&mut jar, cookie);
    }

    /// Drop a cookie by name. Returns whether it existed.
    pub fn expire(&self, name: &str) -> bool {
        let mut jar = self.jar.write();
        let before = jar.len();
        jar.retain(|c| c.name != name);
        before != jar.len()
    }

    /// The jar as a page reads it: `a=1; b=0`.
    #[must_use]
    pub fn cookie_header(&self) -> String {
        self.jar
            .read()
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Every cookie as its `name=value; path=...` assignment.
    #[must_use]
    pub fn set_cookie_lines(&self) -> Vec<String> {
        self.jar.read().iter().map(Cookie::set_cookie_line).collect()
    }

    #[must_use]
    pub fn cookies(&self) -> Vec<Cookie> {
        self.jar.read().clone()
    }

    #[must_use]
    pub fn flag_name(&self, id: &str) -> String {
        format!("{}{}", self.prefix, id)
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Default for CookieJarStore {
    fn default() -> Self {
        Self::new()
    }
}

fn upsert(jar: &mut Vec<Cookie>, cookie: Cookie) {
    match jar
        .iter_mut()
        .find(|c| c.name == cookie.name && c.path == cookie.path)
    {
        Some(existing) => existing.value = cookie.value,
        None => jar.push(cookie),
    }
}

impl ConsentStore for CookieJarStore {
    fn get(&self, id: &ConsentId) -> ConsentValue {
        let name = self.flag_name(id.as_str());
        let jar = self.jar.read();
        let Some(raw) = jar
            .iter()
            .find(|c| c.name == name && c.path == self.path)
            .map(|c| c.value.as_str())
        else {
            return ConsentValue::Unknown;
        };
        let value = codec::decode(raw);
        if value.is_unknown() {
            warn!(cookie = %name, raw = %raw, "Unparseable consent cookie read as unknown");
        }
        value
    }

    fn set(&self, ids: &[ConsentId], decision: Decision) -> Result<(), StoreError> {
        let flag = codec::encode(decision);
        let mut jar = self.jar.write();
        for id in ids {
            let cookie = Cookie {
                name: self.flag_name(id.as_str()),
                value: flag.to_string(),
                path: self.path.clone(),
            };
            debug!(set_cookie = %cookie.set_cookie_line(), "Consent cookie written");
            upsert(&mut jar, cookie);
        }
        Ok(())
    }
}
