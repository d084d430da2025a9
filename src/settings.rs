//! Server settings.
//!
//! Settings are stored as JSON in the user config directory. Missing or
//! unreadable files fall back to defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Environment variable overriding the settings file location.
pub const SETTINGS_ENV: &str = "PDF_FORTRESS_SETTINGS";

/// Server settings persisted to disk.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Hostname to bind (default: 127.0.0.1).
    #[serde(default = "default_host")]
    pub host: String,
    /// Port for the HTTP server (default: 3000).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Scratch directory for temporary files. `None` uses the system temp dir.
    #[serde(default)]
    pub temp_dir: Option<String>,
    /// Largest accepted request body in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Encryption parameters applied to every protected document.
    #[serde(default)]
    pub protection: ProtectionDefaults,
}

/// Encryption parameters that are not chosen by the user.
#[derive(Debug, Clone, Deserialize)]
pub struct ProtectionDefaults {
    /// PDF permission bitmask (default: 4, printing only).
    #[serde(default = "default_permissions")]
    pub permissions: u32,
    /// RC4 key length in bits, 40..=128 in steps of 8.
    #[serde(default = "default_key_length")]
    pub key_length: u32,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    3000
}
fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024
}
fn default_permissions() -> u32 {
    4
}
fn default_key_length() -> u32 {
    128
}

impl Default for ProtectionDefaults {
    fn default() -> Self {
        Self {
            permissions: default_permissions(),
            key_length: default_key_length(),
        }
    }
}

impl ProtectionDefaults {
    fn validate(&mut self) {
        if !is_valid_key_length(self.key_length) {
            tracing::warn!(
                "Invalid key_length {} (expected 40..=128 in steps of 8), using {}",
                self.key_length,
                default_key_length()
            );
            self.key_length = default_key_length();
        }
    }
}

fn is_valid_key_length(bits: u32) -> bool {
    bits % 8 == 0 && (40..=128).contains(&bits)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            temp_dir: None,
            max_upload_bytes: default_max_upload_bytes(),
            protection: ProtectionDefaults::default(),
        }
    }
}

impl Settings {
    /// Default settings file location, honouring `PDF_FORTRESS_SETTINGS`.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var(SETTINGS_ENV) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pdf-fortress")
            .join("settings.json")
    }

    /// Load settings from a JSON file. Returns defaults if file doesn't exist.
    /// Out-of-range protection values are replaced by their defaults.
    pub fn load(path: &Path) -> Self {
        let mut settings: Self = match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse settings file: {} (using defaults)", e);
                Self::default()
            }),
            Err(_) => {
                tracing::info!("No settings file found, using defaults");
                Self::default()
            }
        };
        settings.protection.validate();
        settings
    }

    /// Address the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Directory used for temporary input/output files.
    pub fn scratch_dir(&self) -> PathBuf {
        self.temp_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir)
    }
}
