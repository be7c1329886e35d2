//! Synchronous helper-process execution.
//!
//! The child never outlives a failed [`run_helper`] call: on timeout or a
//! failed wait it is killed and reaped before the error is returned.

use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};
use wait_timeout::ChildExt;

#[derive(Debug, Error)]
pub enum HelperError {
    #[error("Failed to start `{0}`: {1}")]
    Spawn(String, #[source] std::io::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Command `{0}` timed out after {1:?}")]
    Timeout(String, Duration),
}

/// What a finished helper process produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelperOutput {
    /// `None` when the process was ended by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl HelperOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs `program` with `args`, capturing stdout and stderr.
///
/// Blocks until the process exits. With a timeout, the process is killed
/// once it is exceeded and [`HelperError::Timeout`] is returned. Output is
/// buffered in memory.
pub fn run_helper<S: AsRef<str>>(
    program: &str,
    args: &[S],
    timeout: Option<Duration>,
) -> Result<HelperOutput, HelperError> {
    let mut cmd = Command::new(program);
    cmd.args(args.iter().map(AsRef::as_ref))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!(program, args = args.len(), "spawning helper");
    let mut child = cmd
        .spawn()
        .map_err(|e| HelperError::Spawn(program.to_string(), e))?;

    // drain both pipes while waiting so a chatty helper cannot block
    let stdout = capture(child.stdout.take());
    let stderr = capture(child.stderr.take());

    let status = match timeout {
        Some(duration) => match reap_on_error(&mut child, |c: &mut Child| c.wait_timeout(duration))? {
            Some(status) => status,
            None => {
                kill(&mut child)?;
                return Err(HelperError::Timeout(program.to_string(), duration));
            }
        },
        None => reap_on_error(&mut child, |c: &mut Child| c.wait())?,
    };

    let output = HelperOutput {
        exit_code: status.code(),
        stdout: join(stdout)?,
        stderr: join(stderr)?,
    };
    debug!(program, exit_code = ?output.exit_code, "helper finished");
    Ok(output)
}

fn capture<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<std::io::Result<String>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = String::new();
            pipe.read_to_string(&mut buf)?;
            Ok(buf)
        })
    })
}

fn join(handle: Option<JoinHandle<std::io::Result<String>>>) -> Result<String, HelperError> {
    match handle {
        Some(handle) => handle
            .join()
            .map_err(|_| std::io::Error::other("output reader panicked"))?
            .map_err(HelperError::from),
        None => Ok(String::new()),
    }
}

/// Runs `wait` on the child, killing it when waiting itself fails.
fn reap_on_error<T>(
    child: &mut Child,
    wait: impl FnOnce(&mut Child) -> std::io::Result<T>,
) -> Result<T, HelperError> {
    wait(child).map_err(|err| {
        if let Err(kill_err) = kill(child) {
            warn!(error = %kill_err, "could not kill helper after a failed wait");
        }
        HelperError::from(err)
    })
}

fn kill(child: &mut Child) -> Result<(), HelperError> {
    child.kill()?;
    child.wait()?;
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout_and_stderr() {
        let out = run_helper("sh", &["-c", "echo out; echo err >&2"], None).unwrap();
        assert!(out.success());
        assert_eq!(out.stdout.trim(), "out");
        assert_eq!(out.stderr.trim(), "err");
    }

    #[test]
    fn non_zero_exit_is_reported() {
        let out = run_helper("sh", &["-c", "echo nope >&2; exit 3"], None).unwrap();
        assert!(!out.success());
        assert_eq!(out.exit_code, Some(3));
        assert_eq!(out.stderr.trim(), "nope");
    }

    #[test]
    fn missing_program() {
        let res = run_helper::<&str>("argot-no-such-helper", &[], None);
        assert!(matches!(res, Err(HelperError::Spawn(name, _)) if name == "argot-no-such-helper"));
    }

    #[test]
    fn failed_wait_kills_and_reaps_child() {
        let mut child = Command::new("sh").args(["-c", "sleep 30"]).spawn().unwrap();
        let err = reap_on_error(&mut child, |_: &mut Child| -> std::io::Result<()> {
            Err(std::io::Error::other("wait failed"))
        })
        .unwrap_err();
        assert!(matches!(err, HelperError::Io(_)));
        // already reaped: the exit status is available without blocking
        assert!(child.try_wait().unwrap().is_some());
    }

    #[test]
    fn timeout_kills_process() {
        let start = std::time::Instant::now();
        let res = run_helper("sh", &["-c", "sleep 5"], Some(Duration::from_millis(300)));
        assert!(matches!(res, Err(HelperError::Timeout(_, _))));
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
