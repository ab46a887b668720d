//! OS audio backends
//!
//! Each backend wraps one platform's audio tooling behind [`AudioBackend`].
//! Backends only talk to the OS; normalization and validation live in
//! [`DeviceDirectory`](crate::DeviceDirectory) and
//! [`VolumeController`](crate::VolumeController).

mod powershell;
mod pulse;

pub use powershell::PowerShellBackend;
pub use pulse::PulseBackend;

use crate::device::{AudioDevice, DeviceRecord};
use crate::mock::MockBackend;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Default ceiling for a single external call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{0} is not available on this system")]
    Unavailable(String),

    #[error("{program} did not respond within {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    #[error("{diagnostic}")]
    CommandFailed {
        program: String,
        code: Option<i32>,
        diagnostic: String,
    },

    #[error("Malformed device listing: {0}")]
    Malformed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for BackendError {
    fn from(e: serde_json::Error) -> Self {
        BackendError::Malformed(e.to_string())
    }
}

/// Endpoint a volume change is applied to
#[derive(Debug, Clone, Copy)]
pub enum VolumeTarget<'a> {
    /// Whatever the OS currently routes default output to
    Default,
    /// A device from the most recent enumeration
    Device(&'a AudioDevice),
}

impl VolumeTarget<'_> {
    /// Backend handle for the target, `None` when the OS default is meant
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            VolumeTarget::Default => None,
            VolumeTarget::Device(device) => device.endpoint.as_deref(),
        }
    }
}

/// The OS audio query service
pub trait AudioBackend {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Query the OS for playback endpoints in OS order
    fn enumerate_playback_devices(&self) -> Result<Vec<DeviceRecord>, BackendError>;

    /// Set the master volume scalar (0.0-1.0) on the target endpoint
    ///
    /// For [`VolumeTarget::Device`] the backend selects the endpoint before
    /// setting its level.
    fn set_master_volume(&self, level: f32, target: VolumeTarget<'_>) -> Result<(), BackendError>;
}

impl<B: AudioBackend + ?Sized> AudioBackend for &B {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn enumerate_playback_devices(&self) -> Result<Vec<DeviceRecord>, BackendError> {
        (**self).enumerate_playback_devices()
    }

    fn set_master_volume(&self, level: f32, target: VolumeTarget<'_>) -> Result<(), BackendError> {
        (**self).set_master_volume(level, target)
    }
}

impl<B: AudioBackend + ?Sized> AudioBackend for Box<B> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn enumerate_playback_devices(&self) -> Result<Vec<DeviceRecord>, BackendError> {
        (**self).enumerate_playback_devices()
    }

    fn set_master_volume(&self, level: f32, target: VolumeTarget<'_>) -> Result<(), BackendError> {
        (**self).set_master_volume(level, target)
    }
}

/// Which backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// PowerShell on Windows, PulseAudio elsewhere
    #[default]
    Auto,
    /// Windows AudioDeviceCmdlets via PowerShell
    PowerShell,
    /// PulseAudio / PipeWire via pactl
    Pulse,
    /// In-memory backend with demo devices
    Mock,
}

impl BackendKind {
    /// Resolve `Auto` for the current platform
    pub fn resolve(self) -> Self {
        match self {
            BackendKind::Auto if cfg!(windows) => BackendKind::PowerShell,
            BackendKind::Auto => BackendKind::Pulse,
            other => other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Auto => "auto",
            BackendKind::PowerShell => "powershell",
            BackendKind::Pulse => "pulse",
            BackendKind::Mock => "mock",
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(BackendKind::Auto),
            "powershell" | "windows" => Ok(BackendKind::PowerShell),
            "pulse" | "pulseaudio" | "pactl" => Ok(BackendKind::Pulse),
            "mock" => Ok(BackendKind::Mock),
            other => Err(format!("unknown audio backend: {}", other)),
        }
    }
}

/// Settings shared by the command-based backends
#[derive(Debug, Clone)]
pub struct BackendOptions {
    pub timeout: Duration,
    pub powershell_program: String,
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            powershell_program: powershell::DEFAULT_PROGRAM.to_string(),
        }
    }
}

/// Construct the backend for `kind`
pub fn create(kind: BackendKind, options: &BackendOptions) -> Box<dyn AudioBackend> {
    let kind = kind.resolve();
    tracing::debug!("Using {} audio backend", kind.as_str());

    match kind {
        BackendKind::PowerShell => Box::new(
            PowerShellBackend::new(options.timeout).with_program(&options.powershell_program),
        ),
        BackendKind::Pulse | BackendKind::Auto => Box::new(PulseBackend::new(options.timeout)),
        BackendKind::Mock => Box::new(MockBackend::with_demo_devices()),
    }
}

/// Format a 0.0-1.0 level as a whole percentage string for tools that take one
pub(crate) fn level_to_percent(level: f32) -> u8 {
    (level.clamp(0.0, 1.0) * 100.0).round() as u8
}
