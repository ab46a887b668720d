//! SpeakerUp
//!
//! Lists audio playback devices and sets the output volume on a chosen or
//! default device, either from one-shot flags or an interactive menu.

mod cli;
mod console;
mod menu;
mod session;
#[cfg(unix)]
mod signals;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use speakerup_audio::{AudioBackend, backend};
use speakerup_config::SpeakerUpConfig;
use std::io;
use tracing::debug;

use crate::cli::{Args, Mode};
use crate::console::Console;
use crate::session::Session;

fn main() -> Result<()> {
    let args = Args::parse();

    let config = SpeakerUpConfig::load_default(args.config.as_deref())
        .context("Failed to load configuration")?;

    setup_logging(&config.display.log_level);

    if !config.display.color {
        colored::control::set_override(false);
    }

    let kind = args.backend.unwrap_or(config.audio.backend);
    let backend = backend::create(kind, &config.audio.backend_options());
    debug!("Audio backend: {}", backend.name());

    let mut session = Session::new(backend, &config.audio.fallback_device_name);
    let mut console = Console::new(io::stdin().lock(), io::stdout().lock());

    let mode = args.mode();

    #[cfg(unix)]
    if matches!(mode, Mode::Interactive | Mode::Craze) {
        signals::setup_signal_handlers().context("Failed to install Ctrl-C handler")?;
    }

    match mode {
        Mode::List => menu::list(&mut session, &mut console)?,
        Mode::Craze => menu::craze(&mut session, &mut console)?,
        Mode::SetVolume { percent, device } => {
            menu::set_volume(&mut session, &mut console, percent, device)?;
        }
        Mode::Interactive => menu::interactive(&mut session, &mut console)?,
        Mode::Help => Args::command().print_help()?,
    }

    Ok(())
}

/// Setup logging to stderr so it stays out of menu output
fn setup_logging(default_level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .init();
}
