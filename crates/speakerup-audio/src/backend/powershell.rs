//! Windows backend using PowerShell and the AudioDeviceCmdlets module
//!
//! Enumeration goes through `Get-AudioDevice`. Volume is applied with an
//! inline C# binding to `IAudioEndpointVolume` on the default render
//! endpoint; targeting a specific device first makes it the default with
//! `Set-AudioDevice`.

use super::{AudioBackend, BackendError, VolumeTarget};
use crate::command;
use crate::device::DeviceRecord;
use std::time::Duration;

pub(crate) const DEFAULT_PROGRAM: &str = "powershell";

const QUERY_SCRIPT: &str = "$ErrorActionPreference = 'Stop'
Get-AudioDevice -List | Where-Object { $_.Type -eq 'Playback' } |
    Select-Object Index, Name, Default, Type | ConvertTo-Json -Compress";

const ENDPOINT_VOLUME_TYPE: &str = r#"Add-Type -TypeDefinition @'
using System;
using System.Runtime.InteropServices;

[Guid("5CDF2C82-841E-4546-9722-0CF74078229A"), InterfaceType(ComInterfaceType.InterfaceIsIUnknown)]
interface IAudioEndpointVolume {
    int RegisterControlChangeNotify(IntPtr pNotify);
    int UnregisterControlChangeNotify(IntPtr pNotify);
    int GetChannelCount(out int pnChannelCount);
    int SetMasterVolumeLevel(float fLevelDB, Guid pguidEventContext);
    int SetMasterVolumeLevelScalar(float fLevel, Guid pguidEventContext);
}

[Guid("D666063F-1587-4E43-81F1-B948E807363F"), InterfaceType(ComInterfaceType.InterfaceIsIUnknown)]
interface IMMDevice {
    int Activate(ref Guid iid, int dwClsCtx, IntPtr pActivationParams,
        [MarshalAs(UnmanagedType.IUnknown)] out object ppInterface);
}

[Guid("A95664D2-9614-4F35-A746-DE8DB63617E6"), InterfaceType(ComInterfaceType.InterfaceIsIUnknown)]
interface IMMDeviceEnumerator {
    int EnumAudioEndpoints(int dataFlow, int dwStateMask, out IntPtr ppDevices);
    int GetDefaultAudioEndpoint(int dataFlow, int role, out IMMDevice ppEndpoint);
}

[ComImport, Guid("BCDE0395-E52F-467C-8E3D-C4579291692E")]
class MMDeviceEnumeratorComObject { }

public static class SpeakerUpEndpoint {
    public static void SetMasterVolume(float level) {
        var enumerator = (IMMDeviceEnumerator)new MMDeviceEnumeratorComObject();
        IMMDevice device;
        Marshal.ThrowExceptionForHR(enumerator.GetDefaultAudioEndpoint(0, 0, out device));
        var iid = typeof(IAudioEndpointVolume).GUID;
        object endpoint;
        Marshal.ThrowExceptionForHR(device.Activate(ref iid, 23, IntPtr.Zero, out endpoint));
        var volume = (IAudioEndpointVolume)endpoint;
        Marshal.ThrowExceptionForHR(volume.SetMasterVolumeLevelScalar(level, Guid.Empty));
    }
}
'@"#;

/// PowerShell-driven Windows backend
#[derive(Debug, Clone)]
pub struct PowerShellBackend {
    program: String,
    timeout: Duration,
}

impl PowerShellBackend {
    /// Create a backend using `powershell` with the given per-call timeout
    pub fn new(timeout: Duration) -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            timeout,
        }
    }

    /// Use a different PowerShell executable (e.g. `pwsh`)
    pub fn with_program(mut self, program: &str) -> Self {
        self.program = program.to_string();
        self
    }

    fn run_script(&self, script: &str) -> Result<String, BackendError> {
        command::run(
            &self.program,
            &["-NoProfile", "-NonInteractive", "-Command", script],
            self.timeout,
        )
    }

    /// Build the script that sets the master volume, optionally selecting an endpoint first
    fn volume_script(level: f32, target: VolumeTarget<'_>) -> Result<String, BackendError> {
        let mut script = String::from("$ErrorActionPreference = 'Stop'\n");

        if let Some(endpoint) = target.endpoint() {
            // Indices come from Get-AudioDevice; anything else would be spliced into the script
            let index: u64 = endpoint
                .parse()
                .map_err(|_| BackendError::Malformed(format!("invalid device index: {}", endpoint)))?;
            script.push_str(&format!("Set-AudioDevice -Index {} | Out-Null\n", index));
        }

        script.push_str(ENDPOINT_VOLUME_TYPE);
        script.push_str(&format!(
            "\n[SpeakerUpEndpoint]::SetMasterVolume([float]{:.2})\n",
            level.clamp(0.0, 1.0)
        ));
        Ok(script)
    }
}

impl AudioBackend for PowerShellBackend {
    fn name(&self) -> &'static str {
        "powershell"
    }

    fn enumerate_playback_devices(&self) -> Result<Vec<DeviceRecord>, BackendError> {
        let output = self.run_script(QUERY_SCRIPT)?;
        let records = DeviceRecord::parse_json(&output)?;
        tracing::debug!("Get-AudioDevice reported {} playback devices", records.len());
        Ok(records)
    }

    fn set_master_volume(&self, level: f32, target: VolumeTarget<'_>) -> Result<(), BackendError> {
        let script = Self::volume_script(level, target)?;
        self.run_script(&script)?;
        Ok(())
    }
}
