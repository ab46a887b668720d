//! Ctrl-C handling for the menu modes

use anyhow::Result;

use crate::menu::GOODBYE;

/// Farewell written from the handler; signal context cannot color or format
const FAREWELL: &[u8] = "\nGoodbye! 👋\n".as_bytes();

/// Print the farewell and exit when Ctrl-C interrupts a menu
pub fn setup_signal_handlers() -> Result<()> {
    use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};

    let action = SigAction::new(
        SigHandler::Handler(handle_signal),
        SaFlags::empty(),
        SigSet::empty(),
    );

    unsafe {
        sigaction(Signal::SIGINT, &action)?;
    }

    Ok(())
}

/// Signal handler
extern "C" fn handle_signal(sig: i32) {
    if sig == libc::SIGINT {
        // Only async-signal-safe calls from here on
        unsafe {
            libc::write(libc::STDOUT_FILENO, FAREWELL.as_ptr().cast(), FAREWELL.len());
            libc::_exit(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_farewell_matches_menu_exit() {
        let text = std::str::from_utf8(FAREWELL).unwrap();
        assert_eq!(text.trim(), GOODBYE);
        assert!(text.starts_with('\n'));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_handler_installs() {
        use nix::sys::signal::{SigHandler, Signal, signal};

        setup_signal_handlers().unwrap();
        // Restore the default so the test harness keeps normal Ctrl-C behavior
        let previous = unsafe { signal(Signal::SIGINT, SigHandler::SigDfl) }.unwrap();
        assert!(matches!(previous, SigHandler::Handler(_)));
    }
}
