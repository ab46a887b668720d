//! Colored terminal input and output

use colored::Colorize;
use speakerup_audio::{Ack, DeviceList, VolumeError};
use std::fmt::Display;
use std::io::{self, BufRead, Write};

const RULE_WIDTH: usize = 50;

/// Line-oriented console over any reader and writer
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Print `message` and read one line; `None` at end of input
    pub fn prompt(&mut self, message: impl Display) -> io::Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn line(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.output, "{}", text)
    }

    pub fn info(&mut self, text: &str) -> io::Result<()> {
        self.line(text.cyan())
    }

    pub fn error(&mut self, text: &str) -> io::Result<()> {
        self.line(text.red())
    }

    pub fn banner(&mut self) -> io::Result<()> {
        let lines = [
            "╔══════════════════════════════════════╗",
            "║            🔊 SpeakerUp 🔊            ║",
            "║     Audio Device Volume Control      ║",
            "╚══════════════════════════════════════╝",
        ];
        for line in lines {
            self.line(line.magenta().bold())?;
        }
        self.line("")
    }

    pub fn menu(&mut self) -> io::Result<()> {
        self.line("Options:".cyan())?;
        let options = [
            "Set volume for default device",
            "Choose device and set volume",
            "CRAZE mode - set any volume that works!",
            "Refresh device list",
            "Exit",
        ];
        for (i, option) in options.iter().enumerate() {
            self.line(format!("{} {}", format!("{}.", i + 1).white(), option))?;
        }
        Ok(())
    }

    pub fn device_list(&mut self, devices: &DeviceList) -> io::Result<()> {
        let rule = "─".repeat(RULE_WIDTH);

        self.line("")?;
        self.line("Available Audio Devices:".cyan().bold())?;
        self.line(rule.yellow())?;

        for device in devices {
            let marker = if device.is_default {
                format!(" {}", "(DEFAULT)".green())
            } else {
                String::new()
            };
            self.line(format!(
                "{} {}{}",
                format!("{:2}.", device.ordinal()).white(),
                device.name.bright_blue(),
                marker
            ))?;
        }

        self.line(rule.yellow())?;

        if devices.is_fallback() {
            self.line("Device query unavailable, showing the system default only".yellow())?;
        }
        Ok(())
    }

    pub fn success(&mut self, ack: &Ack) -> io::Result<()> {
        self.line(format!("✓ Volume set to {}% for {}", ack.percent, ack.device_name).green())
    }

    pub fn volume_error(&mut self, err: &VolumeError) -> io::Result<()> {
        let message = match err {
            VolumeError::OutOfRange(_) => "Error: Volume must be between 0 and 100".to_string(),
            VolumeError::DeviceNotFound { .. } => format!("Invalid device selection: {}", err),
            VolumeError::PlatformRejected(_) => err.to_string(),
        };
        self.error(&message)
    }
}
