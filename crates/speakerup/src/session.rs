//! Per-process state: the backend and the last device list shown to the user

use speakerup_audio::{
    Ack, AudioBackend, DeviceDirectory, DeviceList, DeviceRef, EnumerationError, VolumeController,
    VolumeError,
};

pub struct Session<B> {
    backend: B,
    fallback_name: String,
    devices: Option<DeviceList>,
}

impl<B: AudioBackend> Session<B> {
    pub fn new(backend: B, fallback_name: &str) -> Self {
        Self {
            backend,
            fallback_name: fallback_name.to_string(),
            devices: None,
        }
    }

    fn enumerate(&self) -> Result<DeviceList, EnumerationError> {
        DeviceDirectory::new(&self.backend)
            .with_fallback_name(&self.fallback_name)
            .list_devices()
    }

    /// Re-enumerate devices, replacing the previous list
    pub fn refresh(&mut self) -> Result<&DeviceList, EnumerationError> {
        let list = self.enumerate()?;
        Ok(self.devices.insert(list))
    }

    /// The last device list, enumerating first if there is none
    pub fn devices(&mut self) -> Result<&DeviceList, EnumerationError> {
        let list = match self.devices.take() {
            Some(list) => list,
            None => self.enumerate()?,
        };
        Ok(self.devices.insert(list))
    }

    /// Set volume on the default device or on a 1-based device ordinal
    pub fn set_volume(&self, percent: i64, ordinal: Option<usize>) -> Result<Ack, VolumeError> {
        let target = ordinal.map(DeviceRef::from_ordinal).transpose()?;
        VolumeController::new(&self.backend).set_volume(percent, target, self.devices.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use speakerup_audio::mock::MockBackend;

    #[test]
    fn test_devices_enumerates_once() {
        let backend = MockBackend::default();
        let mut session = Session::new(backend.clone(), "Default Audio Device");

        assert_eq!(session.devices().unwrap().len(), 2);
        assert_eq!(session.devices().unwrap().len(), 2);
        assert_eq!(backend.query_count(), 1);

        session.refresh().unwrap();
        assert_eq!(backend.query_count(), 2);
    }

    #[test]
    fn test_set_volume_by_ordinal() {
        let backend = MockBackend::default();
        let mut session = Session::new(backend.clone(), "Default Audio Device");
        session.refresh().unwrap();

        let ack = session.set_volume(60, Some(2)).unwrap();
        assert_eq!(ack.device_name, "Headset (USB Audio Device)");
        assert_eq!(backend.volume_calls()[0].endpoint.as_deref(), Some("2"));

        assert!(matches!(
            session.set_volume(60, Some(0)),
            Err(VolumeError::DeviceNotFound { ordinal: 0 })
        ));
        assert!(matches!(
            session.set_volume(60, Some(3)),
            Err(VolumeError::DeviceNotFound { ordinal: 3 })
        ));
    }

    #[test]
    fn test_ordinal_without_enumeration_is_not_found() {
        let backend = MockBackend::default();
        let session = Session::new(backend.clone(), "Default Audio Device");

        assert!(matches!(
            session.set_volume(60, Some(1)),
            Err(VolumeError::DeviceNotFound { ordinal: 1 })
        ));
        assert!(backend.volume_calls().is_empty());
    }
}
