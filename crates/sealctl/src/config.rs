//! Configuration loading and validation for sealctl.
//!
//! Key material is read from environment variables only, never from
//! command-line arguments.

use std::fmt;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use etm::Keyring;
use serde::Deserialize;
use zeroize::Zeroizing;

/// Validated sealctl configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Base64 encoding of the 64-byte primary key. **Required.**
    pub key: String,

    /// Comma-separated base64 keys that `open` also accepts.
    #[serde(default)]
    pub previous_keys: String,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "warn".into()
}

impl Config {
    /// Load and validate configuration from `SEALCTL_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `SEALCTL_KEY` is absent or empty.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix("SEALCTL"))
            .build()
            .context("failed to build sealctl configuration")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise sealctl configuration")?;

        c.validate()?;
        Ok(c)
    }

    fn validate(&self) -> Result<()> {
        if self.key.trim().is_empty() {
            anyhow::bail!("SEALCTL_KEY is required and must not be empty");
        }
        Ok(())
    }

    /// Decode the configured keys into a [`Keyring`].
    ///
    /// # Errors
    ///
    /// Returns an error if a key is not valid base64, or an
    /// [`etm::EtmError::InvalidKeyLength`] (with context) if one does not
    /// decode to exactly 64 bytes.
    pub fn keyring(&self) -> Result<Keyring> {
        let primary = decode_key(&self.key).context("SEALCTL_KEY is not valid base64")?;

        let previous = self
            .previous_keys
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .enumerate()
            .map(|(i, k)| {
                decode_key(k)
                    .with_context(|| format!("SEALCTL_PREVIOUS_KEYS entry {i} is not valid base64"))
            })
            .collect::<Result<Vec<_>>>()?;

        Keyring::new(&primary, previous.iter().map(|k| k.as_slice()))
            .context("configured keys must decode to exactly 64 bytes")
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("key", &"[REDACTED]")
            .field("previous_keys", &"[REDACTED]")
            .field("log_level", &self.log_level)
            .finish()
    }
}

fn decode_key(encoded: &str) -> Result<Zeroizing<Vec<u8>>, base64::DecodeError> {
    STANDARD.decode(encoded.trim()).map(Zeroizing::new)
}
