//! Playback device enumeration and volume control
//!
//! This crate is the façade between SpeakerUp's presentation layer and the
//! operating system's audio stack. The OS is reached through an
//! [`AudioBackend`], with one implementation per platform.
//!
//! # Components
//!
//! - [`DeviceDirectory`] lists playback endpoints and falls back to a single
//!   synthetic default device when the OS query fails
//! - [`VolumeController`] validates a volume request against the last
//!   enumeration and applies it through the backend
//!
//! # Example
//!
//! ```no_run
//! use speakerup_audio::backend::PulseBackend;
//! use speakerup_audio::{DeviceDirectory, DeviceRef, VolumeController};
//! use std::time::Duration;
//!
//! let backend = PulseBackend::new(Duration::from_secs(5));
//! let devices = DeviceDirectory::new(&backend).list_devices()?;
//! for device in devices.iter() {
//!     println!("{}. {}", device.ordinal(), device.name);
//! }
//!
//! let ack = VolumeController::new(&backend).set_volume(40, Some(DeviceRef::from_ordinal(1)?), Some(&devices))?;
//! println!("Volume set to {}% for {}", ack.percent, ack.device_name);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod backend;
mod command;
pub mod controller;
pub mod device;
pub mod directory;
pub mod mock;

pub use backend::{AudioBackend, BackendError, VolumeTarget};
pub use controller::{Ack, DEFAULT_DEVICE_LABEL, VolumeController};
pub use device::{AudioDevice, DeviceList, DeviceRecord, DeviceRef};
pub use directory::{DEFAULT_FALLBACK_NAME, DeviceDirectory};

use thiserror::Error;

/// The Device Directory could not produce even a degraded device list
#[derive(Debug, Error)]
pub enum EnumerationError {
    #[error("Fallback device name must not be empty")]
    EmptyFallbackName,
}

/// Errors from a volume request
#[derive(Debug, Error)]
pub enum VolumeError {
    #[error("Volume must be between 0 and 100 (got {0})")]
    OutOfRange(i64),

    #[error("Device {ordinal} not found")]
    DeviceNotFound { ordinal: usize },

    #[error("Error setting volume: {0}")]
    PlatformRejected(String),
}
