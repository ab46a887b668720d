//! Device Directory: playback endpoint enumeration with a synthetic fallback

use crate::backend::{AudioBackend, BackendError};
use crate::device::{AudioDevice, DeviceList, DeviceRecord};
use crate::EnumerationError;

/// Name of the synthetic device used when the OS cannot be queried
pub const DEFAULT_FALLBACK_NAME: &str = "Default Audio Device";

/// Lists playback endpoints through a backend
pub struct DeviceDirectory<B> {
    backend: B,
    fallback_name: String,
}

impl<B: AudioBackend> DeviceDirectory<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            fallback_name: DEFAULT_FALLBACK_NAME.to_string(),
        }
    }

    /// Use a different name for the synthetic fallback device
    pub fn with_fallback_name(mut self, name: &str) -> Self {
        self.fallback_name = name.to_string();
        self
    }

    /// Enumerate playback devices
    ///
    /// Any failure of the OS query (missing tool, timeout, non-zero exit,
    /// malformed output, no usable devices) yields a single synthetic default
    /// device instead. Each call produces a fresh list.
    pub fn list_devices(&self) -> Result<DeviceList, EnumerationError> {
        match self.query() {
            Ok(list) => Ok(list),
            Err(e) => {
                tracing::warn!(
                    "Could not enumerate devices via {}: {}; using fallback device",
                    self.backend.name(),
                    e
                );
                self.fallback()
            }
        }
    }

    fn query(&self) -> Result<DeviceList, BackendError> {
        let records = self.backend.enumerate_playback_devices()?;
        let devices = normalize(records);

        if devices.is_empty() {
            return Err(BackendError::Malformed("no playback devices reported".to_string()));
        }

        tracing::debug!("Enumerated {} playback devices", devices.len());
        Ok(DeviceList::from_os(devices))
    }

    fn fallback(&self) -> Result<DeviceList, EnumerationError> {
        let name = self.fallback_name.trim();
        if name.is_empty() {
            return Err(EnumerationError::EmptyFallbackName);
        }
        Ok(DeviceList::fallback(name))
    }
}

/// Project raw records into dense, 0-based devices
///
/// Drops non-playback and unnamed records, and keeps only the first default flag.
fn normalize(records: Vec<DeviceRecord>) -> Vec<AudioDevice> {
    let mut devices: Vec<AudioDevice> = Vec::with_capacity(records.len());
    let mut seen_default = false;

    for record in records {
        if !record.is_playback() {
            continue;
        }

        let name = record.name.trim();
        if name.is_empty() {
            tracing::warn!("Skipping unnamed device record (index {:?})", record.index);
            continue;
        }

        let is_default = record.default && !seen_default;
        if record.default && seen_default {
            tracing::warn!("Multiple default devices reported, ignoring flag on {}", name);
        }
        seen_default |= is_default;

        devices.push(AudioDevice {
            index: devices.len(),
            name: name.to_string(),
            is_default,
            endpoint: record.endpoint_handle(),
        });
    }

    devices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockBackend, MockResponse};

    #[test]
    fn test_two_devices_in_order() {
        let backend = MockBackend::with_json(
            r#"[{"Index":0,"Name":"Speakers","Default":true},{"Index":1,"Name":"Headset","Default":false}]"#,
        );
        let list = DeviceDirectory::new(&backend).list_devices().unwrap();

        assert_eq!(list.len(), 2);
        assert!(!list.is_fallback());

        let devices = list.as_slice();
        assert_eq!(devices[0].name, "Speakers");
        assert!(devices[0].is_default);
        assert_eq!(devices[0].endpoint.as_deref(), Some("0"));
        assert_eq!(devices[1].name, "Headset");
        assert!(!devices[1].is_default);
        assert_eq!(devices[1].index, 1);
    }

    #[test]
    fn test_single_object_response() {
        let backend = MockBackend::with_json(r#"{"Index":0,"Name":"Speakers","Default":true}"#);
        let list = DeviceDirectory::new(&backend).list_devices().unwrap();

        assert_eq!(list.len(), 1);
        assert_eq!(list.default_device().unwrap().name, "Speakers");
    }

    #[test]
    fn test_fallback_on_failure() {
        for response in [
            MockResponse::Unavailable,
            MockResponse::Timeout,
            MockResponse::Failed("Get-AudioDevice : The term is not recognized".to_string()),
            MockResponse::Json("{".to_string()),
            MockResponse::Json("[]".to_string()),
        ] {
            let backend = MockBackend::new(response.clone());
            let list = DeviceDirectory::new(&backend).list_devices().unwrap();

            assert!(list.is_fallback(), "{:?} should fall back", response);
            assert_eq!(list.len(), 1);
            let device = &list.as_slice()[0];
            assert_eq!(device.index, 0);
            assert!(device.is_default);
            assert_eq!(device.name, DEFAULT_FALLBACK_NAME);
        }
    }

    #[test]
    fn test_custom_fallback_name() {
        let backend = MockBackend::new(MockResponse::Unavailable);
        let list = DeviceDirectory::new(&backend)
            .with_fallback_name("System Output")
            .list_devices()
            .unwrap();
        assert_eq!(list.as_slice()[0].name, "System Output");
    }

    #[test]
    fn test_empty_fallback_name_is_fatal() {
        let backend = MockBackend::new(MockResponse::Unavailable);
        let result = DeviceDirectory::new(&backend)
            .with_fallback_name("  ")
            .list_devices();
        assert!(matches!(result, Err(EnumerationError::EmptyFallbackName)));
    }

    #[test]
    fn test_normalize_filters_records() {
        let records = DeviceRecord::parse_json(
            r#"[
                {"Index": 1, "Name": "Microphone", "Default": true, "Type": "Recording"},
                {"Index": 2, "Name": "  ", "Default": false, "Type": "Playback"},
                {"Index": 3, "Name": "Speakers", "Default": true, "Type": "Playback"},
                {"Index": 4, "Name": "HDMI", "Default": true, "Type": "Playback"}
            ]"#,
        )
        .unwrap();

        let devices = normalize(records);
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].name, "Speakers");
        assert_eq!(devices[0].index, 0);
        assert!(devices[0].is_default);
        assert_eq!(devices[1].name, "HDMI");
        assert_eq!(devices[1].index, 1);
        assert!(!devices[1].is_default);
    }

    #[test]
    fn test_only_non_playback_records_fall_back() {
        let backend = MockBackend::with_json(r#"[{"Name":"Microphone","Type":"Recording"}]"#);
        let list = DeviceDirectory::new(&backend).list_devices().unwrap();
        assert!(list.is_fallback());
    }
}
