//! Bounded execution of external audio tools

use crate::BackendError;
use std::io::Read;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Run `program` with `args`, returning stdout on success
///
/// The child is killed once `timeout` elapses. A timeout too large to
/// represent as a deadline means no deadline. Output pipes are drained while
/// waiting so a chatty child never blocks on a full pipe.
pub(crate) fn run(program: &str, args: &[&str], timeout: Duration) -> Result<String, BackendError> {
    let path = which::which(program).map_err(|e| {
        tracing::debug!("{} not found: {}", program, e);
        BackendError::Unavailable(program.to_string())
    })?;

    tracing::debug!("Running {} {:?}", program, args);

    let mut child = Command::new(path)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    let deadline = Instant::now().checked_add(timeout);
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            let _ = child.kill();
            let _ = child.wait();
            // Readers are left detached; a grandchild may still hold the pipes open
            return Err(BackendError::Timeout {
                program: program.to_string(),
                timeout,
            });
        }
        thread::sleep(POLL_INTERVAL);
    };

    let stdout = collect(stdout)?;
    let stderr = collect(stderr)?;

    if status.success() {
        Ok(stdout)
    } else {
        let diagnostic = if stderr.trim().is_empty() {
            stdout.trim().to_string()
        } else {
            stderr.trim().to_string()
        };
        Err(BackendError::CommandFailed {
            program: program.to_string(),
            code: status.code(),
            diagnostic,
        })
    }
}

/// Read a pipe to its end on a separate thread
fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<std::io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn collect(reader: Option<JoinHandle<std::io::Result<Vec<u8>>>>) -> Result<String, BackendError> {
    let Some(reader) = reader else {
        return Ok(String::new());
    };
    let bytes = reader
        .join()
        .map_err(|_| BackendError::Malformed("output reader panicked".to_string()))??;
    Ok(String::from_utf8_lossy(&bytes).to_string())
}
