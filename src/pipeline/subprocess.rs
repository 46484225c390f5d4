//! Child-process runner shared by the out-of-process collaborators.
//!
//! stdout is captured into memory; it is the data channel. stderr is
//! inherited, so whatever the child logs reaches the operator's terminal as
//! it is written, not after the child exits. stdin is either null or fed a
//! byte buffer and then closed.
//!
//! There is no timeout: a hung child blocks the run until it exits. The
//! child is killed only if the returned future is dropped.

use crate::error::SubprocessError;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// One invocation of an external program.
#[derive(Debug, Clone)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<OsString>,
    stdin: Option<Vec<u8>>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdin: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Feed `bytes` to the child's stdin, then close it.
    pub fn stdin_bytes(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.stdin = Some(bytes.into());
        self
    }

    pub fn program(&self) -> &std::path::Path {
        &self.program
    }

    /// Run to completion and return everything the child wrote to stdout.
    ///
    /// # Errors
    /// [`SubprocessError`] if the program cannot be started, if feeding stdin
    /// or waiting fails, or if it exits unsuccessfully. Any stdout captured
    /// before the failure is discarded.
    pub async fn run(self) -> Result<Vec<u8>, SubprocessError> {
        debug!("Running {} {:?}", self.program.display(), self.args);

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(if self.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|source| {
            warn!("Failed to start {}: {}", self.program.display(), source);
            SubprocessError::Spawn {
                program: self.program.clone(),
                source,
            }
        })?;

        let io_err = |source: std::io::Error| SubprocessError::Io {
            program: self.program.clone(),
            source,
        };

        // stdin is written while stdout drains so neither pipe can fill up
        // and stall the other.
        let output = match (self.stdin.as_deref(), child.stdin.take()) {
            (Some(bytes), Some(mut pipe)) => {
                let feed = async move {
                    let res = pipe.write_all(bytes).await;
                    drop(pipe);
                    res
                };
                let (fed, output) = tokio::join!(feed, child.wait_with_output());
                let output = output.map_err(io_err)?;
                // A child that exits without reading all of stdin closes the
                // pipe early; its exit status is the better signal.
                if let Err(e) = fed {
                    if e.kind() != std::io::ErrorKind::BrokenPipe {
                        return Err(io_err(e));
                    }
                }
                output
            }
            _ => child.wait_with_output().await.map_err(io_err)?,
        };

        if !output.status.success() {
            warn!("{} exited with {}", self.program.display(), output.status);
            return Err(SubprocessError::Exit {
                program: self.program,
                status: output.status,
            });
        }

        debug!(
            "{} produced {} bytes on stdout",
            self.program.display(),
            output.stdout.len()
        );
        Ok(output.stdout)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Invocation {
        Invocation::new("/bin/sh").arg("-c").arg(script)
    }

    #[test]
    fn builder_keeps_program() {
        let inv = Invocation::new("/opt/reader/dist/extractor_bin").arg("/data");
        assert_eq!(
            inv.program(),
            std::path::Path::new("/opt/reader/dist/extractor_bin")
        );
    }

    #[tokio::test]
    async fn captures_stdout() {
        let out = sh("printf 'hello\\nworld'").run().await.unwrap();
        assert_eq!(out, b"hello\nworld");
    }

    #[tokio::test]
    async fn stderr_is_not_captured() {
        let out = sh("echo visible-to-operator >&2; printf data").run().await.unwrap();
        assert_eq!(out, b"data");
    }

    #[tokio::test]
    async fn passes_arguments_verbatim() {
        let out = sh("printf '%s|' \"$@\"")
            .arg("sh")
            .args(["a b", "", "c"])
            .run()
            .await
            .unwrap();
        assert_eq!(out, b"a b||c|");
    }

    #[tokio::test]
    async fn feeds_stdin() {
        let out = sh("cat").stdin_bytes(b"payload".to_vec()).run().await.unwrap();
        assert_eq!(out, b"payload");
    }

    #[tokio::test]
    async fn large_stdin_does_not_deadlock() {
        let big = vec![b'x'; 1 << 20];
        let out = sh("cat").stdin_bytes(big.clone()).run().await.unwrap();
        assert_eq!(out.len(), big.len());
    }

    #[tokio::test]
    async fn non_zero_exit_is_an_error() {
        let err = sh("printf partial; exit 3").run().await.unwrap_err();
        match err {
            SubprocessError::Exit { status, .. } => assert_eq!(status.code(), Some(3)),
            other => panic!("expected Exit, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let err = Invocation::new("/definitely/not/here/extractor_bin")
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, SubprocessError::Spawn { .. }), "{err}");
    }
}
