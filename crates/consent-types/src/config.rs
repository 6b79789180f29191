//! Consent configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use consent_types::ConsentConfigBuilder;
//!
//! let config = ConsentConfigBuilder::new()
//!     .site_id("site-1234")
//!     .key_prefix("consent-")
//!     .build()?;
//! ```

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;

/// Default prefix of persisted flag names (`consent-analytics=1`).
pub const DEFAULT_KEY_PREFIX: &str = "consent-";

/// Default prefix of channel event names (`consent.grant`).
pub const DEFAULT_EVENT_PREFIX: &str = "consent.";

/// Default scope of persisted flags.
pub const DEFAULT_COOKIE_PATH: &str = "/";

/// Process-wide consent configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentConfig {
    /// Site identifier / API key. Accepted and retained, not interpreted.
    pub site_id: Option<String>,
    /// Prefix prepended to a consent id to form its flag name.
    pub key_prefix: String,
    /// Prefix prepended to an event kind to form its channel event name.
    pub event_prefix: String,
    /// Scope the flags are written under.
    pub cookie_path: String,
}

impl Default for ConsentConfig {
    fn default() -> Self {
        Self {
            site_id: None,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            event_prefix: DEFAULT_EVENT_PREFIX.to_string(),
            cookie_path: DEFAULT_COOKIE_PATH.to_string(),
        }
    }
}

impl ConsentConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CONSENT_SITE_ID`: site identifier (default: none)
    /// - `CONSENT_KEY_PREFIX`: flag name prefix (default: `consent-`)
    /// - `CONSENT_EVENT_PREFIX`: event name prefix (default: `consent.`)
    /// - `CONSENT_COOKIE_PATH`: flag scope (default: `/`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ConsentConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = ConsentConfigBuilder::new();
        if let Some(site_id) = lookup("CONSENT_SITE_ID").filter(|v| !v.is_empty()) {
            builder = builder.site_id(site_id);
        }
        if let Some(prefix) = lookup("CONSENT_KEY_PREFIX") {
            builder = builder.key_prefix(prefix);
        }
        if let Some(prefix) = lookup("CONSENT_EVENT_PREFIX") {
            builder = builder.event_prefix(prefix);
        }
        if let Some(path) = lookup("CONSENT_COOKIE_PATH") {
            builder = builder.cookie_path(path);
        }
        builder.build()
    }

    /// Validate that prefixes and path cannot corrupt the flag layout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_token("key_prefix", &self.key_prefix)?;
        check_token("event_prefix", &self.event_prefix)?;
        check_token("cookie_path", &self.cookie_path)?;

        if !self.cookie_path.starts_with('/') {
            return Err(ConfigError::RelativePath(self.cookie_path.clone()));
        }

        Ok(())
    }

    /// Flag name for a consent id: `<key_prefix><id>`.
    #[must_use]
    pub fn flag_name(&self, id: &str) -> String {
        format!("{}{}", self.key_prefix, id)
    }

    /// Channel event name for an event kind: `<event_prefix><kind>`.
    #[must_use]
    pub fn event_name(&self, kind: &str) -> String {
        format!("{}{}", self.event_prefix, kind)
    }
}

fn check_token(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Empty { field });
    }
    if let Some(found) = value
        .chars()
        .find(|c| *c == ';' || *c == '=' || *c == ',' || c.is_whitespace())
    {
        return Err(ConfigError::ForbiddenCharacter {
            field,
            value: value.to_string(),
            found,
        });
    }
    Ok(())
}

/// Builder for `ConsentConfig` with validation.
#[derive(Default)]
pub struct ConsentConfigBuilder {
    site_id: Option<String>,
    key_prefix: Option<String>,
    event_prefix: Option<String>,
    cookie_path: Option<String>,
}

impl ConsentConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn site_id(mut self, site_id: impl Into<String>) -> Self {
        self.site_id = Some(site_id.into());
        self
    }

    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    pub fn event_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.event_prefix = Some(prefix.into());
        self
    }

    pub fn cookie_path(mut self, path: impl Into<String>) -> Self {
        self.cookie_path = Some(path.into());
        self
    }

    /// Build the configuration, validating every field.
    pub fn build(self) -> Result<ConsentConfig, ConfigError> {
        let defaults = ConsentConfig::default();

        let config = ConsentConfig {
            site_id: self.site_id.or(defaults.site_id),
            key_prefix: self.key_prefix.unwrap_or(defaults.key_prefix),
            event_prefix: self.event_prefix.unwrap_or(defaults.event_prefix),
            cookie_path: self.cookie_path.unwrap_or(defaults.cookie_path),
        };

        config.validate()?;
        Ok(config)
    }
}
