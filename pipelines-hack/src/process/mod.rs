//! External command execution.
//!
//! Every `git`, `gh`, `kubectl` and container tool invocation goes through
//! [`CommandRunner`], so flows that orchestrate them can be exercised against
//! a scripted fake instead of real processes.

mod error;
#[cfg(test)]
pub(crate) mod fake;

pub use error::CommandError;

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Runs a named program with arguments inside a working directory.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `program args...` in `dir` and returns its combined output.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] if the process cannot be started, exits
    /// unsuccessfully, or cancellation was requested beforehand.
    async fn run(&self, dir: &Path, program: &str, args: &[&str]) -> Result<String, CommandError>;
}

/// [`CommandRunner`] backed by real child processes.
///
/// Stdout and stderr are buffered and returned together; stderr is also
/// mirrored to this process's stderr so long-running clones and pushes show
/// progress.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    cancel: CancellationToken,
}

impl ProcessRunner {
    /// Creates a runner that refuses to launch new commands once `cancel` fires.
    #[must_use]
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, dir: &Path, program: &str, args: &[&str]) -> Result<String, CommandError> {
        if self.cancel.is_cancelled() {
            return Err(CommandError::Cancelled {
                program: program.to_string(),
                args: owned(args),
            });
        }

        info!(dir = %dir.display(), command = %command_line(program, args), "Running");

        let spawn_error = |source: std::io::Error| CommandError::Spawn {
            dir: dir.display().to_string(),
            program: program.to_string(),
            args: owned(args),
            source,
        };

        let mut child = Command::new(program)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        let (stdout, stderr) = tokio::join!(
            capture(child.stdout.take(), false),
            capture(child.stderr.take(), true)
        );
        let status = child.wait().await.map_err(spawn_error)?;

        let mut output = String::from_utf8_lossy(&stdout).into_owned();
        output.push_str(&String::from_utf8_lossy(&stderr));

        if !status.success() {
            return Err(CommandError::Failed {
                dir: dir.display().to_string(),
                program: program.to_string(),
                args: owned(args),
                status: status.to_string(),
                output,
            });
        }

        Ok(output)
    }
}

/// Reads a child stream to the end, optionally echoing it to our stderr.
async fn capture<R>(stream: Option<R>, mirror: bool) -> Vec<u8>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = Vec::new();
    let Some(mut stream) = stream else {
        return buffer;
    };

    let mut echo = tokio::io::stderr();
    let mut chunk = [0u8; 8192];
    loop {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                if mirror {
                    // Echo failures are ignored.
                    let _ = echo.write_all(&chunk[..n]).await;
                }
                buffer.extend_from_slice(&chunk[..n]);
            }
        }
    }
    buffer
}

/// Renders a program and its arguments as a single line for logs.
#[must_use]
pub fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|arg| (*arg).to_string()).collect()
}
