//! Volume Controller: validates and applies master volume changes

use crate::backend::{AudioBackend, VolumeTarget};
use crate::device::{DeviceList, DeviceRef};
use crate::VolumeError;

/// Label reported when the target device cannot be named
pub const DEFAULT_DEVICE_LABEL: &str = "Default Device";

/// Acknowledgment of an applied volume change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    /// Display name of the device the volume was applied to
    pub device_name: String,
    /// Applied volume (0-100)
    pub percent: u8,
}

/// Applies volume changes through a backend
pub struct VolumeController<B> {
    backend: B,
}

impl<B: AudioBackend> VolumeController<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Set the master volume to `percent` (0-100)
    ///
    /// With `target`, the device is looked up in `snapshot` (the most recent
    /// enumeration) and selected before its level is set. Without one, the
    /// OS default endpoint is used. Range and device checks happen before
    /// any OS call.
    pub fn set_volume(
        &self,
        percent: i64,
        target: Option<DeviceRef>,
        snapshot: Option<&DeviceList>,
    ) -> Result<Ack, VolumeError> {
        let percent = u8::try_from(percent)
            .ok()
            .filter(|p| *p <= 100)
            .ok_or(VolumeError::OutOfRange(percent))?;

        let (volume_target, device_name) = match target {
            Some(device_ref) => {
                let device = snapshot
                    .and_then(|list| list.get(device_ref))
                    .ok_or(VolumeError::DeviceNotFound {
                        ordinal: device_ref.ordinal(),
                    })?;
                (VolumeTarget::Device(device), device.name.clone())
            }
            None => {
                let name = snapshot
                    .and_then(|list| list.default_device())
                    .map(|device| device.name.clone())
                    .unwrap_or_else(|| DEFAULT_DEVICE_LABEL.to_string());
                (VolumeTarget::Default, name)
            }
        };

        let level = f32::from(percent) / 100.0;
        self.backend
            .set_master_volume(level, volume_target)
            .map_err(|e| {
                tracing::warn!("{} rejected volume change: {}", self.backend.name(), e);
                VolumeError::PlatformRejected(e.to_string())
            })?;

        tracing::info!("Volume set to {}% for {}", percent, device_name);
        Ok(Ack {
            device_name,
            percent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockBackend;
    use crate::DeviceDirectory;

    fn snapshot(backend: &MockBackend) -> DeviceList {
        DeviceDirectory::new(backend).list_devices().unwrap()
    }

    #[test]
    fn test_default_device_without_snapshot() {
        let backend = MockBackend::default();
        let ack = VolumeController::new(&backend).set_volume(50, None, None).unwrap();

        assert_eq!(ack.device_name, DEFAULT_DEVICE_LABEL);
        assert_eq!(ack.percent, 50);

        let calls = backend.volume_calls();
        assert_eq!(calls.len(), 1);
        assert!((calls[0].level - 0.5).abs() < f32::EPSILON);
        assert_eq!(calls[0].endpoint, None);
    }

    #[test]
    fn test_default_device_named_from_snapshot() {
        let backend = MockBackend::default();
        let devices = snapshot(&backend);

        let ack = VolumeController::new(&backend)
            .set_volume(50, None, Some(&devices))
            .unwrap();
        assert_eq!(ack.device_name, "Speakers (Realtek High Definition Audio)");
        assert_eq!(backend.volume_calls()[0].endpoint, None);
    }

    #[test]
    fn test_specific_device() {
        let backend = MockBackend::default();
        let devices = snapshot(&backend);

        let ack = VolumeController::new(&backend)
            .set_volume(75, Some(DeviceRef::from_index(1)), Some(&devices))
            .unwrap();
        assert_eq!(ack.device_name, "Headset (USB Audio Device)");

        let calls = backend.volume_calls();
        assert_eq!(calls[0].endpoint.as_deref(), Some("2"));
        assert!((calls[0].level - 0.75).abs() < f32::EPSILON);
    }

    #[test]
    fn test_out_of_range_makes_no_call() {
        let backend = MockBackend::default();
        let controller = VolumeController::new(&backend);

        for percent in [150, 101, -1, i64::MIN, i64::MAX] {
            assert!(matches!(
                controller.set_volume(percent, None, None),
                Err(VolumeError::OutOfRange(p)) if p == percent
            ));
        }
        assert!(backend.volume_calls().is_empty());
    }

    #[test]
    fn test_unknown_device_makes_no_call() {
        let backend = MockBackend::default();
        let devices = snapshot(&backend);
        let controller = VolumeController::new(&backend);

        let result = controller.set_volume(40, Some(DeviceRef::from_index(2)), Some(&devices));
        assert!(matches!(result, Err(VolumeError::DeviceNotFound { ordinal: 3 })));

        // No snapshot means no device can be resolved
        let result = controller.set_volume(40, Some(DeviceRef::from_index(0)), None);
        assert!(matches!(result, Err(VolumeError::DeviceNotFound { ordinal: 1 })));

        assert!(backend.volume_calls().is_empty());
    }

    #[test]
    fn test_out_of_range_checked_before_device() {
        let backend = MockBackend::default();
        let result = VolumeController::new(&backend).set_volume(
            200,
            Some(DeviceRef::from_index(9)),
            None,
        );
        assert!(matches!(result, Err(VolumeError::OutOfRange(200))));
    }

    #[test]
    fn test_platform_rejection_keeps_diagnostic() {
        let backend = MockBackend::default();
        backend.fail_volume_calls("Exception calling \"SetMasterVolume\": 0x80070005");

        let result = VolumeController::new(&backend).set_volume(30, None, None);
        match result {
            Err(VolumeError::PlatformRejected(diagnostic)) => {
                assert_eq!(diagnostic, "Exception calling \"SetMasterVolume\": 0x80070005");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(backend.volume_calls().len(), 1);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let backend = MockBackend::default();
        let controller = VolumeController::new(&backend);

        assert_eq!(controller.set_volume(0, None, None).unwrap().percent, 0);
        assert_eq!(controller.set_volume(100, None, None).unwrap().percent, 100);
        assert_eq!(backend.last_level(), Some(1.0));
    }
}
