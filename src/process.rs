//! Running the external command-line tools the feeds are built on.
//!
//! Every query is a short-lived child process whose stdout is captured as
//! text.  An optional timeout bounds how long the caller waits; when it
//! elapses the child is killed and reaped.

use log::debug;
use std::io::Read;
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::time::Duration;

/// Errors produced while running a child process.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("{program} timed out after {timeout:?}")]
    Timeout { program: String, timeout: Duration },
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("{program} wrote non-utf-8 output")]
    Utf8 { program: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// How long to wait for stderr of a child that has already exited.
const STDERR_GRACE: Duration = Duration::from_millis(500);

/// Read `pipe` to the end on a helper thread and send the bytes to `tx`.
fn drain<R: Read + Send + 'static>(pipe: Option<R>, tx: mpsc::Sender<std::io::Result<Vec<u8>>>) {
    match pipe {
        Some(mut pipe) => {
            std::thread::spawn(move || {
                let mut buf = Vec::new();
                let result = pipe.read_to_end(&mut buf).map(|_| buf);
                let _ = tx.send(result);
            });
        }
        None => {
            let _ = tx.send(Ok(Vec::new()));
        }
    }
}

/// Run `program` with `args` and return its stdout.
///
/// A non-zero exit status is an error.  The output is returned untrimmed.
pub fn run(program: &str, args: &[&str], timeout: Option<Duration>) -> Result<String, ProcessError> {
    debug!("running {} {}", program, args.join(" "));

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ProcessError::Spawn {
            program: program.to_string(),
            source,
        })?;

    // Both pipes are drained on helper threads so neither can fill up and
    // stall the child, and so the deadline holds even when the child never
    // closes its end.
    let (tx, rx) = mpsc::channel();
    drain(child.stdout.take(), tx);
    let (err_tx, err_rx) = mpsc::channel();
    drain(child.stderr.take(), err_tx);

    let received = match timeout {
        Some(limit) => match rx.recv_timeout(limit) {
            Ok(result) => result,
            Err(_) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ProcessError::Timeout {
                    program: program.to_string(),
                    timeout: limit,
                });
            }
        },
        None => rx
            .recv()
            .unwrap_or_else(|_| Err(std::io::Error::other("stdout reader vanished"))),
    };
    let stdout = received?;

    let status = child.wait()?;
    if !status.success() {
        // The child has exited; only a lingering grandchild could keep
        // stderr open, so wait for it briefly.
        let stderr = err_rx
            .recv_timeout(STDERR_GRACE)
            .ok()
            .and_then(Result::ok)
            .unwrap_or_default();
        return Err(ProcessError::Failed {
            program: program.to_string(),
            status,
            stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
        });
    }

    String::from_utf8(stdout).map_err(|_| ProcessError::Utf8 {
        program: program.to_string(),
    })
}
