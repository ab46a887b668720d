//! Linux backend using `pactl` (PulseAudio or PipeWire's pulse server)

use super::{AudioBackend, BackendError, VolumeTarget, level_to_percent};
use crate::command;
use crate::device::DeviceRecord;
use serde::Deserialize;
use std::time::Duration;

const PACTL: &str = "pactl";
const DEFAULT_SINK: &str = "@DEFAULT_SINK@";

/// Subset of a sink entry from `pactl -f json list sinks`
#[derive(Debug, Deserialize)]
struct PulseSink {
    index: u64,
    name: String,
    #[serde(default)]
    description: String,
}

/// pactl-driven Linux backend
#[derive(Debug, Clone)]
pub struct PulseBackend {
    timeout: Duration,
}

impl PulseBackend {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn pactl(&self, args: &[&str]) -> Result<String, BackendError> {
        command::run(PACTL, args, self.timeout)
    }

    /// Name of the current default sink
    ///
    /// `get-default-sink` needs pactl 15 or newer; older versions only report
    /// it through `pactl info`.
    fn default_sink(&self) -> Option<String> {
        if let Ok(output) = self.pactl(&["get-default-sink"]) {
            let name = output.trim();
            if !name.is_empty() {
                return Some(name.to_string());
            }
        }

        let info = self.pactl(&["info"]).ok()?;
        parse_default_sink_from_info(&info)
    }
}

/// Turn `pactl -f json list sinks` output into device records
fn parse_sinks(json: &str, default_sink: Option<&str>) -> Result<Vec<DeviceRecord>, BackendError> {
    let sinks: Vec<PulseSink> = serde_json::from_str(json.trim())?;

    Ok(sinks
        .into_iter()
        .map(|sink| {
            let default = default_sink == Some(sink.name.as_str());
            let display = if sink.description.trim().is_empty() {
                sink.name.clone()
            } else {
                sink.description
            };
            DeviceRecord {
                index: Some(sink.index),
                name: display,
                default,
                kind: None,
                endpoint: Some(sink.name),
            }
        })
        .collect())
}

fn parse_default_sink_from_info(info: &str) -> Option<String> {
    info.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim() == "Default Sink")
        .map(|(_, value)| value.trim().to_string())
        .filter(|name| !name.is_empty())
}

impl AudioBackend for PulseBackend {
    fn name(&self) -> &'static str {
        "pulse"
    }

    fn enumerate_playback_devices(&self) -> Result<Vec<DeviceRecord>, BackendError> {
        let output = self.pactl(&["-f", "json", "list", "sinks"])?;
        let default_sink = self.default_sink();
        let records = parse_sinks(&output, default_sink.as_deref())?;
        tracing::debug!("pactl reported {} sinks", records.len());
        Ok(records)
    }

    fn set_master_volume(&self, level: f32, target: VolumeTarget<'_>) -> Result<(), BackendError> {
        let percent = format!("{}%", level_to_percent(level));

        match target.endpoint() {
            Some(sink) => {
                self.pactl(&["set-default-sink", sink])?;
                self.pactl(&["set-sink-volume", sink, &percent])?;
            }
            None => {
                self.pactl(&["set-sink-volume", DEFAULT_SINK, &percent])?;
            }
        }

        Ok(())
    }
}
