//! Application settings and paths.
//!
//! Settings live in a JSON file under the XDG configuration directory.
//! A missing file means defaults.

use crate::error::{ConfigError, ConfigResult};
use crate::scanner::ScanConfig;
use crate::services::ServiceTable;
use crate::types::{PortError, PortSpec};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/portprobe)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the configuration directory. Nothing is created on disk.
    pub fn resolve() -> ConfigResult<Self> {
        let project = ProjectDirs::from("com", "portprobe", "portprobe")
            .ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Default concurrency cap.
    pub default_concurrency: usize,
    /// Default per-probe timeout in milliseconds.
    pub default_timeout_ms: u64,
    /// Replacement for the built-in `--quick` port list.
    pub quick_ports: Option<Vec<u16>>,
    /// Extra or replacement service names, keyed by port.
    pub services: HashMap<u16, String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_concurrency: ScanConfig::DEFAULT_CONCURRENCY,
            default_timeout_ms: ScanConfig::DEFAULT_TIMEOUT.as_millis() as u64,
            quick_ports: None,
            services: HashMap::new(),
        }
    }
}

impl AppSettings {
    /// Load settings from the default location.
    ///
    /// Falls back to defaults when there is no home directory or no file.
    pub fn load() -> ConfigResult<Self> {
        let Ok(paths) = Paths::resolve() else {
            debug!("no configuration directory, using default settings");
            return Ok(Self::default());
        };
        let file = paths.settings_file();

        if !file.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&file)
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
    }

    /// Ports probed by `--quick`.
    pub fn quick_port_spec(&self) -> Result<PortSpec, PortError> {
        match &self.quick_ports {
            Some(ports) => PortSpec::from_list(ports),
            None => Ok(PortSpec::common()),
        }
    }

    /// The built-in service table with this file's overrides applied.
    pub fn service_table(&self) -> ServiceTable {
        ServiceTable::well_known().with_overrides(&self.services)
    }
}
