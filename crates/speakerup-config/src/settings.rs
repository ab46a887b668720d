//! Configuration sections

use serde::{Deserialize, Serialize};
use speakerup_audio::backend::{BackendKind, BackendOptions};
use speakerup_audio::DEFAULT_FALLBACK_NAME;
use std::time::Duration;

/// Audio backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioSettings {
    /// Backend used to reach the OS audio stack
    #[serde(default)]
    pub backend: BackendKind,

    /// Ceiling for each external audio command, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Name shown for the synthetic device when enumeration fails
    #[serde(default = "default_fallback_name")]
    pub fallback_device_name: String,

    /// PowerShell executable (`powershell` or `pwsh`)
    #[serde(default = "default_powershell")]
    pub powershell_program: String,
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_fallback_name() -> String {
    DEFAULT_FALLBACK_NAME.to_string()
}

fn default_powershell() -> String {
    "powershell".to_string()
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            timeout_secs: default_timeout_secs(),
            fallback_device_name: default_fallback_name(),
            powershell_program: default_powershell(),
        }
    }
}

impl AudioSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Options for constructing a backend
    pub fn backend_options(&self) -> BackendOptions {
        BackendOptions {
            timeout: self.timeout(),
            powershell_program: self.powershell_program.clone(),
        }
    }
}

/// Terminal output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Colorize output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default log filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            color: true,
            log_level: default_log_level(),
        }
    }
}
