//! Command-line arguments

use clap::Parser;
use speakerup_audio::backend::BackendKind;
use std::path::PathBuf;

const EXAMPLES: &str = "Examples:
  speakerup                    # Interactive mode
  speakerup -v 50              # Set default device to 50%
  speakerup -l                 # List available devices
  speakerup -d 1 -v 75         # Set device 1 to 75%
  speakerup -c                 # CRAZE mode - set any volume!";

#[derive(Debug, Parser)]
#[command(
    name = "speakerup",
    version,
    about = "SpeakerUp - Control speaker volume and select audio devices",
    after_help = EXAMPLES
)]
pub struct Args {
    /// Set volume level (0-100)
    #[arg(short, long, value_name = "LEVEL", allow_negative_numbers = true)]
    pub volume: Option<i64>,

    /// Device number (use -l to list devices)
    #[arg(short, long, value_name = "INDEX")]
    pub device: Option<usize>,

    /// List available audio devices
    #[arg(short, long)]
    pub list: bool,

    /// Launch interactive mode (default if no args)
    #[arg(short, long)]
    pub interactive: bool,

    /// CRAZE mode - set any volume that works for you
    #[arg(short, long)]
    pub craze: bool,

    /// Audio backend (auto, powershell, pulse, mock)
    #[arg(long, value_name = "BACKEND")]
    pub backend: Option<BackendKind>,

    /// Configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// What a single invocation does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    List,
    Craze,
    SetVolume { percent: i64, device: Option<usize> },
    Interactive,
    Help,
}

impl Args {
    /// Resolve flags into a mode; earlier flags win
    pub fn mode(&self) -> Mode {
        if self.list {
            Mode::List
        } else if self.craze {
            Mode::Craze
        } else if let Some(percent) = self.volume {
            Mode::SetVolume {
                percent,
                device: self.device,
            }
        } else if self.interactive || self.device.is_none() {
            Mode::Interactive
        } else {
            // --device alone has nothing to apply
            Mode::Help
        }
    }
}
