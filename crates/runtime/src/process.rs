//! Child process supervision.

use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tracing::{debug, trace};

use crate::error::{Error, Result};

/// A supervised long-running child process.
///
/// Both output pipes are drained onto the tracing stream so a wedged
/// emulator cannot stall on a full pipe buffer.
#[derive(Debug)]
pub struct ProcessHandle {
    child: Option<Child>,
    name: String,
}

impl ProcessHandle {
    /// Spawns `program` with `args`, draining its output in the background.
    pub fn spawn<P, I, S>(name: &str, program: P, args: I) -> Result<Self>
    where
        P: AsRef<std::ffi::OsStr>,
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let program = program.as_ref();
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| Error::ProcessLaunchFailed {
                command: program.to_string_lossy().into_owned(),
                source,
            })?;

        if let Some(stdout) = child.stdout.take() {
            drain_lines(name.to_owned(), "stdout", stdout);
        }
        if let Some(stderr) = child.stderr.take() {
            drain_lines(name.to_owned(), "stderr", stderr);
        }

        debug!(process = name, pid = child.id(), "spawned");
        Ok(Self {
            child: Some(child),
            name: name.to_owned(),
        })
    }

    /// True while the child has not been reaped.
    pub fn is_running(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    /// Kills the child and waits for it to be reaped. Safe to call twice.
    pub async fn terminate(&mut self) -> Result<()> {
        if let Some(mut child) = self.child.take() {
            // start_kill fails if the child already exited; either way the
            // wait below reaps it.
            let _ = child.start_kill();
            child.wait().await?;
            debug!(process = %self.name, "terminated");
        }
        Ok(())
    }
}

fn drain_lines<R>(process: String, stream: &'static str, reader: R)
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            trace!(process = %process, stream, "{line}");
        }
    });
}

/// Runs a short-lived tool to completion, failing on a non-zero exit.
pub async fn check_call<P, I, S>(program: P, args: I) -> Result<()>
where
    P: AsRef<std::ffi::OsStr>,
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    check_output(program, args).await.map(|_| ())
}

/// Runs a short-lived tool and returns its stdout, failing on a non-zero exit.
pub async fn check_output<P, I, S>(program: P, args: I) -> Result<String>
where
    P: AsRef<std::ffi::OsStr>,
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    let program = program.as_ref();
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|source| Error::ProcessLaunchFailed {
            command: program.to_string_lossy().into_owned(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::CommandFailed(format!(
            "{} exited with {}: {}",
            program.to_string_lossy(),
            output.status,
            stderr.trim()
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
