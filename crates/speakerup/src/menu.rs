//! One-shot commands and the interactive menu

use crate::console::Console;
use crate::session::Session;
use anyhow::Result;
use colored::Colorize;
use speakerup_audio::AudioBackend;
use std::io::{BufRead, Write};

/// Printed when the menu exits, also by the Ctrl-C handler
pub const GOODBYE: &str = "Goodbye! 👋";

/// Print the device list
pub fn list<B, R, W>(session: &mut Session<B>, console: &mut Console<R, W>) -> Result<()>
where
    B: AudioBackend,
    R: BufRead,
    W: Write,
{
    let devices = session.devices()?;
    console.device_list(devices)?;
    Ok(())
}

/// Apply a volume change and report the outcome
///
/// Returns whether the change was applied.
pub fn set_volume<B, R, W>(
    session: &mut Session<B>,
    console: &mut Console<R, W>,
    percent: i64,
    device: Option<usize>,
) -> Result<bool>
where
    B: AudioBackend,
    R: BufRead,
    W: Write,
{
    if device.is_some() {
        // Device numbers refer to a listing, so make sure one exists
        session.devices()?;
    }

    match session.set_volume(percent, device) {
        Ok(ack) => {
            console.success(&ack)?;
            Ok(true)
        }
        Err(e) => {
            console.volume_error(&e)?;
            Ok(false)
        }
    }
}

/// CRAZE mode: pick any device, set any volume
pub fn craze<B, R, W>(session: &mut Session<B>, console: &mut Console<R, W>) -> Result<()>
where
    B: AudioBackend,
    R: BufRead,
    W: Write,
{
    console.line("🔥 CRAZE MODE ACTIVATED! 🔥".magenta().bold())?;
    console.line("Set ANY volume that works for you - go crazy!".yellow())?;
    list(session, console)?;

    let Some(device_choice) =
        console.prompt("Choose your device (or press Enter for default): ".yellow())?
    else {
        return Ok(());
    };
    let Some(volume) = console.prompt("Enter your CRAZE volume (0-100): ".magenta())? else {
        return Ok(());
    };

    let Ok(percent) = volume.parse::<i64>() else {
        console.error("Invalid volume value")?;
        return Ok(());
    };

    let device = if device_choice.is_empty() {
        None
    } else {
        match device_choice.parse::<usize>() {
            Ok(ordinal) => Some(ordinal),
            Err(_) => {
                console.error("Invalid device selection")?;
                return Ok(());
            }
        }
    };

    match session.set_volume(percent, device) {
        Ok(ack) => {
            console.success(&ack)?;
            console.line(
                format!("🔥 CRAZE volume {}% applied to {}! 🔥", ack.percent, ack.device_name)
                    .magenta(),
            )?;
        }
        Err(e) => console.volume_error(&e)?,
    }

    Ok(())
}

/// Interactive menu loop; exits on choice 5 or end of input
pub fn interactive<B, R, W>(session: &mut Session<B>, console: &mut Console<R, W>) -> Result<()>
where
    B: AudioBackend,
    R: BufRead,
    W: Write,
{
    console.banner()?;
    list(session, console)?;

    loop {
        console.menu()?;
        let Some(choice) = console.prompt(format!("\n{}", "Enter your choice (1-5): ".yellow()))?
        else {
            break;
        };

        match choice.as_str() {
            "1" => {
                let Some(volume) = console.prompt("Enter volume (0-100): ".yellow())? else {
                    break;
                };
                match volume.parse::<i64>() {
                    Ok(percent) => {
                        set_volume(session, console, percent, None)?;
                    }
                    Err(_) => console.error("Invalid volume value")?,
                }
            }
            "2" => {
                let Some(device) = console.prompt("Select device number: ".yellow())? else {
                    break;
                };
                let Some(volume) = console.prompt("Enter volume (0-100): ".yellow())? else {
                    break;
                };
                match (device.parse::<usize>(), volume.parse::<i64>()) {
                    (Ok(ordinal), Ok(percent)) => {
                        set_volume(session, console, percent, Some(ordinal))?;
                    }
                    _ => console.error("Invalid input")?,
                }
            }
            "3" => craze(session, console)?,
            "4" => {
                console.info("Refreshing device list...")?;
                let devices = session.refresh()?;
                console.device_list(devices)?;
            }
            "5" => break,
            _ => console.error("Invalid choice")?,
        }
    }

    console.line(GOODBYE.green())?;
    Ok(())
}
