//! # External Rank Tool Client
//!
//! Pipes a matrix in the interchange format to an out-of-process rank
//! tool (for example LinBox's sparse-elimination `rank`) and reads back a
//! single integer.
//!
//! ## I/O model
//!
//! The interchange text is streamed to stdin on a writer thread while
//! stdout and stderr are drained on reader threads, so neither side can
//! fill a pipe buffer and stall the other. The calling thread polls for
//! exit and kills the child once the timeout elapses.
//!
//! The I/O threads are detached and report over channels that are only
//! ever waited on until the same deadline. A tool that forks (a wrapper
//! script, a shell pipeline) leaves descendants holding the pipes after
//! the child is killed; those threads then finish whenever the
//! descendants do, and the call itself still returns on time.

use std::io::{self, BufWriter, Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::OracleConfig;
use crate::error::OracleError;
use crate::sms::SmsMatrix;
use crate::traits::RankOracle;

const POLL_INTERVAL_MS: u64 = 10;

/// Rank oracle backed by an external executable.
#[derive(Debug, Clone)]
pub struct ProcessOracle {
    config: OracleConfig,
}

impl ProcessOracle {
    /// Create an oracle for `config`.
    pub fn new(config: OracleConfig) -> Self {
        Self { config }
    }

    /// The invocation settings.
    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    fn spawn(&self) -> Result<Child, OracleError> {
        Command::new(&self.config.program)
            .args(&self.config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| OracleError::Unavailable {
                program: self.config.program.display().to_string(),
                source,
            })
    }
}

impl RankOracle for ProcessOracle {
    fn name(&self) -> &str {
        "process"
    }

    fn rank(&self, matrix: &SmsMatrix) -> Result<usize, OracleError> {
        let mut child = self.spawn()?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::other("rank oracle stdin unavailable"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("rank oracle stdout unavailable"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| io::Error::other("rank oracle stderr unavailable"))?;

        let limit = self.config.max_output_bytes;
        let timeout = self.config.timeout;
        let deadline = Instant::now() + timeout;
        tracing::debug!(
            program = %self.config.program.display(),
            rows = matrix.rows(),
            cols = matrix.cols(),
            nnz = matrix.nnz(),
            "invoking external rank oracle"
        );

        let owned = matrix.clone();
        let written = spawn_io(move || -> io::Result<()> {
            // Dropping the writer closes stdin so the tool sees EOF.
            let mut w = BufWriter::new(stdin);
            owned.write_to(&mut w)?;
            w.flush()
        });
        let out = spawn_io(move || read_bounded(stdout, limit, "stdout"));
        let err = spawn_io(move || read_bounded(stderr, limit, "stderr"));

        let timed_out = || {
            tracing::warn!(?timeout, "rank oracle timed out; process killed");
            OracleError::Timeout(timeout)
        };
        let status = match wait_until(&mut child, deadline) {
            Ok(Some(status)) => status,
            Ok(None) => return Err(timed_out()),
            Err(e) => return Err(OracleError::Io(e)),
        };

        // The child has exited, but a descendant may still hold its pipes.
        let stdout = match receive(&out, deadline, "stdout reader") {
            Some(result) => result,
            None => return Err(timed_out()),
        };
        let stderr = receive(&err, deadline, "stderr reader")
            .and_then(Result::ok)
            .unwrap_or_default();
        if !status.success() {
            return Err(OracleError::Failed {
                status: status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }
        match receive(&written, deadline, "writer") {
            Some(Ok(())) => {}
            Some(Err(e)) if e.kind() != io::ErrorKind::BrokenPipe => {
                return Err(OracleError::Io(e))
            }
            Some(Err(_)) | None => {
                return Err(OracleError::Protocol(
                    "rank oracle exited before reading the whole matrix".into(),
                ));
            }
        }
        parse_rank(&stdout?)
    }
}

/// Interpret the tool's stdout: the last non-blank line must be an integer.
pub fn parse_rank(stdout: &str) -> Result<usize, OracleError> {
    let line = stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .last()
        .ok_or_else(|| OracleError::Protocol("rank oracle produced no output".into()))?;
    line.parse().map_err(|_| {
        let shown: String = line.chars().take(80).collect();
        OracleError::Protocol(format!("expected an integer rank, got {shown:?}"))
    })
}

/// Run `task` on a detached thread and hand back its result channel.
fn spawn_io<T, F>(task: F) -> Receiver<io::Result<T>>
where
    T: Send + 'static,
    F: FnOnce() -> io::Result<T> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        // The receiver is gone once the call has given up on this thread.
        let _ = tx.send(task());
    });
    rx
}

/// Wait for an I/O thread until `deadline`; `None` means it is still blocked.
fn receive<T>(
    rx: &Receiver<io::Result<T>>,
    deadline: Instant,
    what: &str,
) -> Option<io::Result<T>> {
    let remaining = deadline.saturating_duration_since(Instant::now());
    match rx.recv_timeout(remaining) {
        Ok(result) => Some(result),
        Err(RecvTimeoutError::Timeout) => None,
        Err(RecvTimeoutError::Disconnected) => Some(Err(io::Error::other(format!(
            "rank oracle {what} thread panicked"
        )))),
    }
}

fn read_bounded<R: Read>(mut reader: R, limit: usize, stream: &'static str) -> io::Result<String> {
    let mut output = Vec::new();
    let mut total = 0usize;
    let mut buf = [0u8; 4096];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        total = total.saturating_add(n);
        if output.len() < limit {
            let take = (limit - output.len()).min(n);
            output.extend_from_slice(&buf[..take]);
        }
    }
    if total > limit {
        return Err(io::Error::other(format!(
            "rank oracle {stream} exceeded {limit} bytes"
        )));
    }
    Ok(String::from_utf8_lossy(&output).into_owned())
}

/// Poll for exit until `deadline`, killing the child if it is reached.
///
/// Returns `Ok(None)` on timeout.
fn wait_until(child: &mut Child, deadline: Instant) -> io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(Duration::from_millis(POLL_INTERVAL_MS));
    }
}
