// Worker configuration
// Decision: Explicit properties struct populated from the environment and
// validated at construction - misconfiguration fails fast, not at the first
// API call
//
// Starter templates ship with FILL_ME placeholders; catching them here beats
// a 401 twenty minutes later.

use std::fmt;

use thiserror::Error;
use url::Url;

pub const ENV_API_ENDPOINT: &str = "FLOWLINE_API_ENDPOINT";
pub const ENV_API_APPLICATION_ID: &str = "FLOWLINE_API_APPLICATION_ID";
pub const ENV_API_TOKEN: &str = "FLOWLINE_API_TOKEN";
/// Key id used to seal new payloads. Setting it turns payload encryption on.
pub const ENV_ENCRYPTION_KEY_ID: &str = "FLOWLINE_ENCRYPTION_KEY_ID";
/// Comma-separated list of additional key ids the worker can still decode.
pub const ENV_ENCRYPTION_KEY_IDS: &str = "FLOWLINE_ENCRYPTION_KEY_IDS";

const PLACEHOLDER: &str = "FILL_ME";

/// Configuration problems detected at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Payload-encryption settings. An unset default key id means payloads cross
/// the boundary in plain form.
#[derive(Debug, Clone, Default)]
pub struct EncryptionProperties {
    /// Key id used to seal new payloads.
    pub default_key_id: Option<String>,
    /// Every key id the worker resolves at startup. Always contains the
    /// default id when encryption is enabled.
    pub key_ids: Vec<String>,
}

impl EncryptionProperties {
    pub fn is_enabled(&self) -> bool {
        self.default_key_id.is_some()
    }
}

/// Connection settings for the Flowline API.
#[derive(Clone)]
pub struct WorkerProperties {
    pub endpoint: String,
    pub application_id: String,
    pub token: String,
    pub encryption: EncryptionProperties,
}

impl WorkerProperties {
    /// Build and validate properties with encryption disabled.
    pub fn new(
        endpoint: impl Into<String>,
        application_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Self::with_encryption(endpoint, application_id, token, EncryptionProperties::default())
    }

    /// Build and validate properties with the given encryption settings.
    pub fn with_encryption(
        endpoint: impl Into<String>,
        application_id: impl Into<String>,
        token: impl Into<String>,
        mut encryption: EncryptionProperties,
    ) -> Result<Self, ConfigError> {
        // The default key is always resolvable, listed or not
        if let Some(default_key_id) = &encryption.default_key_id {
            if !encryption.key_ids.contains(default_key_id) {
                encryption.key_ids.insert(0, default_key_id.clone());
            }
        }

        let properties = Self {
            endpoint: endpoint.into(),
            application_id: application_id.into(),
            token: token.into(),
            encryption,
        };
        properties.validate()?;
        Ok(properties)
    }

    /// Read properties from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let endpoint = require_env(ENV_API_ENDPOINT)?;
        let application_id = require_env(ENV_API_APPLICATION_ID)?;
        let token = require_env(ENV_API_TOKEN)?;

        let encryption = EncryptionProperties {
            default_key_id: optional_env(ENV_ENCRYPTION_KEY_ID),
            key_ids: optional_env(ENV_ENCRYPTION_KEY_IDS)
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|id| !id.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        };

        Self::with_encryption(endpoint, application_id, token, encryption)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        ensure_filled(ENV_API_ENDPOINT, &self.endpoint)?;
        ensure_filled(ENV_API_APPLICATION_ID, &self.application_id)?;
        ensure_filled(ENV_API_TOKEN, &self.token)?;

        Url::parse(&self.endpoint).map_err(|e| ConfigError::Invalid {
            name: ENV_API_ENDPOINT,
            reason: format!("not a valid URL: {e}"),
        })?;

        // Check the default key id under its own variable name before the
        // list it was merged into
        if let Some(default_key_id) = &self.encryption.default_key_id {
            ensure_filled(ENV_ENCRYPTION_KEY_ID, default_key_id)?;
        }
        for key_id in &self.encryption.key_ids {
            ensure_filled(ENV_ENCRYPTION_KEY_IDS, key_id)?;
        }
        Ok(())
    }
}

impl fmt::Debug for WorkerProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The token is a credential; never render it
        f.debug_struct("WorkerProperties")
            .field("endpoint", &self.endpoint)
            .field("application_id", &self.application_id)
            .field("token", &"***")
            .field("encryption", &self.encryption)
            .finish()
    }
}

fn require_env(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn optional_env(name: &'static str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn ensure_filled(name: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Missing(name));
    }
    // Matched anywhere in the value, ignoring case: fill_me and FILL_ME_TOKEN
    // are placeholders too
    if value.to_ascii_uppercase().contains(PLACEHOLDER) {
        return Err(ConfigError::Invalid {
            name,
            reason: "contains the FILL_ME placeholder".to_string(),
        });
    }
    Ok(())
}
