// SPDX-License-Identifier: MIT
//
// Screen configuration, read from TOML.
//
//     fallback_color   = "bright-black"   # what unknown colors become
//     poll_interval_ms = 50               # cadence of blocking key waits
//     key_timeout_ms   = 2000             # omit to wait forever
//     alternate_screen = true
//
// Every key is optional.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::Result;
use crate::style::{ColorSpec, Resolver};
use crate::wait::WaitOptions;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScreenConfig {
    pub fallback_color: ColorSpec,
    pub poll_interval_ms: u64,
    pub key_timeout_ms: Option<u64>,
    pub alternate_screen: bool,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            fallback_color: ColorSpec::default(),
            poll_interval_ms: 50,
            key_timeout_ms: None,
            alternate_screen: true,
        }
    }
}

impl ScreenConfig {
    /// Parse a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if the document is not
    /// valid TOML or has keys of the wrong type or unknown keys.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        Ok(toml::from_str(toml)?)
    }

    /// Read and parse a TOML file.
    ///
    /// # Errors
    ///
    /// [`Error::Io`](crate::Error::Io) if the file cannot be read, otherwise
    /// as [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), "loaded screen config");
        Ok(config)
    }

    /// A resolver using the configured fallback color.
    #[must_use]
    pub fn resolver(&self) -> Resolver {
        Resolver::with_fallback(&self.fallback_color)
    }

    /// Interval and timeout for blocking key waits.
    #[must_use]
    pub fn wait_options(&self) -> WaitOptions {
        WaitOptions {
            interval: Duration::from_millis(self.poll_interval_ms),
            timeout: self.key_timeout_ms.map(Duration::from_millis),
        }
    }
}
