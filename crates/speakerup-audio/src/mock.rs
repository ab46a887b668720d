//! Mock backend for testing without an audio stack
//!
//! The mock answers enumeration with a canned JSON response (or a forced
//! failure) and records every call, so tests can assert on how often the OS
//! would have been reached.
//!
//! # Usage
//!
//! ```
//! use speakerup_audio::mock::MockBackend;
//! use speakerup_audio::{DeviceDirectory, VolumeController};
//!
//! let backend = MockBackend::with_json(r#"{"Index": 1, "Name": "Speakers", "Default": true}"#);
//! let devices = DeviceDirectory::new(&backend).list_devices().unwrap();
//! assert_eq!(devices.len(), 1);
//!
//! VolumeController::new(&backend).set_volume(50, None, Some(&devices)).unwrap();
//! assert_eq!(backend.volume_calls().len(), 1);
//! ```

use crate::backend::{AudioBackend, BackendError, VolumeTarget};
use crate::device::DeviceRecord;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Two playback devices, the first one default
pub const DEMO_DEVICES_JSON: &str = r#"[
    {"Index": 1, "Name": "Speakers (Realtek High Definition Audio)", "Default": true, "Type": "Playback"},
    {"Index": 2, "Name": "Headset (USB Audio Device)", "Default": false, "Type": "Playback"}
]"#;

/// What the mock answers to an enumeration request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    /// Raw JSON as the OS query service would print it
    Json(String),
    /// The query tool is not installed
    Unavailable,
    /// The query tool hangs past its deadline
    Timeout,
    /// The query tool exits non-zero with this diagnostic
    Failed(String),
}

/// A recorded volume call
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeCall {
    pub level: f32,
    /// Endpoint handle, `None` for the OS default
    pub endpoint: Option<String>,
}

/// Shared mock state for inspection in tests
#[derive(Debug)]
pub struct MockState {
    /// Answer to enumeration requests
    pub response: MockResponse,
    /// When set, volume calls fail with this diagnostic
    pub volume_failure: Option<String>,
    /// Number of enumeration requests received
    pub query_count: usize,
    /// Volume calls received, in order
    pub volume_calls: Vec<VolumeCall>,
}

impl MockState {
    pub fn new(response: MockResponse) -> Self {
        Self {
            response,
            volume_failure: None,
            query_count: 0,
            volume_calls: Vec::new(),
        }
    }
}

impl Default for MockState {
    fn default() -> Self {
        Self::new(MockResponse::Json(DEMO_DEVICES_JSON.to_string()))
    }
}

/// In-memory [`AudioBackend`]
#[derive(Debug, Clone)]
pub struct MockBackend {
    state: Arc<RwLock<MockState>>,
}

impl MockBackend {
    pub fn new(response: MockResponse) -> Self {
        Self {
            state: Arc::new(RwLock::new(MockState::new(response))),
        }
    }

    /// Answer enumeration with the given JSON text
    pub fn with_json(json: &str) -> Self {
        Self::new(MockResponse::Json(json.to_string()))
    }

    /// Answer enumeration with [`DEMO_DEVICES_JSON`]
    pub fn with_demo_devices() -> Self {
        Self::with_json(DEMO_DEVICES_JSON)
    }

    /// Get shared state for manipulation in tests
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        Arc::clone(&self.state)
    }

    /// Replace the enumeration response
    pub fn set_response(&self, response: MockResponse) {
        if let Ok(mut state) = self.state.write() {
            state.response = response;
        }
    }

    /// Make subsequent volume calls fail with `diagnostic`
    pub fn fail_volume_calls(&self, diagnostic: &str) {
        if let Ok(mut state) = self.state.write() {
            state.volume_failure = Some(diagnostic.to_string());
        }
    }

    pub fn query_count(&self) -> usize {
        self.state.read().map(|s| s.query_count).unwrap_or(0)
    }

    pub fn volume_calls(&self) -> Vec<VolumeCall> {
        self.state
            .read()
            .map(|s| s.volume_calls.clone())
            .unwrap_or_default()
    }

    /// Level of the most recent volume call
    pub fn last_level(&self) -> Option<f32> {
        self.volume_calls().last().map(|call| call.level)
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::with_demo_devices()
    }
}

impl AudioBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn enumerate_playback_devices(&self) -> Result<Vec<DeviceRecord>, BackendError> {
        let response = {
            let mut state = self
                .state
                .write()
                .map_err(|e| BackendError::Malformed(e.to_string()))?;
            state.query_count += 1;
            state.response.clone()
        };

        match response {
            MockResponse::Json(json) => Ok(DeviceRecord::parse_json(&json)?),
            MockResponse::Unavailable => Err(BackendError::Unavailable("mock".to_string())),
            MockResponse::Timeout => Err(BackendError::Timeout {
                program: "mock".to_string(),
                timeout: Duration::from_secs(5),
            }),
            MockResponse::Failed(diagnostic) => Err(BackendError::CommandFailed {
                program: "mock".to_string(),
                code: Some(1),
                diagnostic,
            }),
        }
    }

    fn set_master_volume(&self, level: f32, target: VolumeTarget<'_>) -> Result<(), BackendError> {
        let mut state = self
            .state
            .write()
            .map_err(|e| BackendError::Malformed(e.to_string()))?;

        state.volume_calls.push(VolumeCall {
            level,
            endpoint: target.endpoint().map(str::to_string),
        });
        tracing::debug!("[MOCK] Volume set to {:.2} on {:?}", level, target.endpoint());

        match &state.volume_failure {
            Some(diagnostic) => Err(BackendError::CommandFailed {
                program: "mock".to_string(),
                code: Some(1),
                diagnostic: diagnostic.clone(),
            }),
            None => Ok(()),
        }
    }
}
