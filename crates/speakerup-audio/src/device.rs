//! Playback device records and the normalized device list

use crate::VolumeError;
use serde::Deserialize;

/// One playback endpoint from the most recent enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDevice {
    /// Dense 0-based position within the enumeration
    pub index: usize,
    /// Display name, never empty
    pub name: String,
    /// Whether the OS reports this endpoint as the system default
    pub is_default: bool,
    /// Backend handle used to address the endpoint (`None` means "the OS default")
    pub endpoint: Option<String>,
}

impl AudioDevice {
    /// 1-based ordinal shown to users
    pub fn ordinal(&self) -> usize {
        self.index + 1
    }
}

/// Ordered devices from a single enumeration
///
/// Every enumeration produces a new list; indices from an older list must not
/// be used against a newer one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceList {
    devices: Vec<AudioDevice>,
    fallback: bool,
}

impl DeviceList {
    /// Build a list from devices whose indices are already dense and 0-based
    pub(crate) fn from_os(devices: Vec<AudioDevice>) -> Self {
        debug_assert!(devices.iter().enumerate().all(|(i, d)| d.index == i));
        Self {
            devices,
            fallback: false,
        }
    }

    /// The single synthetic entry used when the OS query fails
    pub(crate) fn fallback(name: &str) -> Self {
        Self {
            devices: vec![AudioDevice {
                index: 0,
                name: name.to_string(),
                is_default: true,
                endpoint: None,
            }],
            fallback: true,
        }
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AudioDevice> {
        self.devices.iter()
    }

    pub fn as_slice(&self) -> &[AudioDevice] {
        &self.devices
    }

    /// Look up a device by reference
    pub fn get(&self, device: DeviceRef) -> Option<&AudioDevice> {
        self.devices.get(device.index)
    }

    /// The device flagged as the OS default, if any
    pub fn default_device(&self) -> Option<&AudioDevice> {
        self.devices.iter().find(|d| d.is_default)
    }

    /// Check if this list is the synthetic fallback
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}

impl<'a> IntoIterator for &'a DeviceList {
    type Item = &'a AudioDevice;
    type IntoIter = std::slice::Iter<'a, AudioDevice>;

    fn into_iter(self) -> Self::IntoIter {
        self.devices.iter()
    }
}

/// Reference to a device by its index in the most recent enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceRef {
    index: usize,
}

impl DeviceRef {
    /// Reference by 0-based index
    pub fn from_index(index: usize) -> Self {
        Self { index }
    }

    /// Reference by the 1-based ordinal users see in listings
    pub fn from_ordinal(ordinal: usize) -> Result<Self, VolumeError> {
        ordinal
            .checked_sub(1)
            .map(Self::from_index)
            .ok_or(VolumeError::DeviceNotFound { ordinal })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn ordinal(&self) -> usize {
        self.index + 1
    }
}

/// A raw endpoint record as reported by the OS query service
///
/// Matches the shape of `Get-AudioDevice | Select-Object Index, Name, Default, Type`
/// after `ConvertTo-Json`; lowercase keys are accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceRecord {
    #[serde(rename = "Index", alias = "index", default)]
    pub index: Option<u64>,

    #[serde(rename = "Name", alias = "name")]
    pub name: String,

    #[serde(rename = "Default", alias = "default", default)]
    pub default: bool,

    #[serde(rename = "Type", alias = "type", default)]
    pub kind: Option<String>,

    /// Backend handle, when the endpoint is addressed by something other than `index`
    #[serde(skip)]
    pub endpoint: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<DeviceRecord>),
    One(DeviceRecord),
}

impl DeviceRecord {
    /// Parse a JSON response holding either a list of records or a single record
    pub fn parse_json(text: &str) -> Result<Vec<DeviceRecord>, serde_json::Error> {
        let records = match serde_json::from_str::<OneOrMany>(text.trim())? {
            OneOrMany::Many(records) => records,
            OneOrMany::One(record) => vec![record],
        };
        Ok(records)
    }

    /// Handle used to address this endpoint in later volume calls
    pub fn endpoint_handle(&self) -> Option<String> {
        self.endpoint
            .clone()
            .or_else(|| self.index.map(|index| index.to_string()))
    }

    /// Whether this record describes a playback endpoint
    ///
    /// Records without a type are assumed to be playback endpoints.
    pub fn is_playback(&self) -> bool {
        self.kind
            .as_deref()
            .is_none_or(|kind| kind.eq_ignore_ascii_case("playback"))
    }
}
