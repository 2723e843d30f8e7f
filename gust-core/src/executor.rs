//! Command execution
//!
//! Runs an external program to completion and folds every outcome into a
//! [`CommandOutput`] value. Launch failures are reported through the
//! [`LAUNCH_FAILURE`] exit code rather than an error.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::process::{Child, Command};

/// Exit code reported when the process could not be started at all.
pub const LAUNCH_FAILURE: i32 = -1;

/// Result of one external program run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Interleaved stdout and stderr
    pub output: String,
    pub exit_code: i32,
    pub duration: Duration,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn launch_failed(&self) -> bool {
        self.exit_code == LAUNCH_FAILURE
    }
}

/// Process-wide settings applied to every spawned command.
///
/// Built once at startup and handed to the runner; nothing here is read
/// from ambient state afterwards.
#[derive(Debug, Clone, Default)]
pub struct ExecContext {
    working_dir: Option<PathBuf>,
    env: Vec<(OsString, OsString)>,
    programs: HashMap<String, PathBuf>,
}

impl ExecContext {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        let key = key.into();
        self.env.retain(|(k, _)| *k != key);
        self.env.push((key, value.into()));
        self
    }

    /// Resolve `name` to `path` instead of searching `PATH`.
    #[must_use]
    pub fn with_program(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.programs.insert(name.into(), path.into());
        self
    }

    /// Prepend `dir` to the `PATH` seen by child processes.
    #[must_use]
    pub fn with_path_prefix(self, dir: &Path) -> Self {
        let mut paths = vec![dir.to_path_buf()];
        if let Some(current) = std::env::var_os("PATH") {
            paths.extend(std::env::split_paths(&current));
        }
        match std::env::join_paths(paths) {
            Ok(joined) => self.with_env("PATH", joined),
            Err(e) => {
                log::warn!("Cannot prepend {} to PATH: {e}", dir.display());
                self
            }
        }
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    /// The path that will be executed for `name`.
    pub fn program(&self, name: &str) -> PathBuf {
        self.programs
            .get(name)
            .cloned()
            .unwrap_or_else(|| PathBuf::from(name))
    }

    fn apply(&self, cmd: &mut Command) {
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
    }
}

/// Runs external programs.
///
/// Implementations never fail: every failure mode is encoded in the
/// returned [`CommandOutput`].
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> CommandOutput;
}

/// [`CommandRunner`] backed by real child processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    context: ExecContext,
}

impl ProcessRunner {
    pub fn new(context: ExecContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &ExecContext {
        &self.context
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String]) -> CommandOutput {
        let started = Instant::now();
        let executable = self.context.program(program);

        let mut cmd = Command::new(&executable);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        self.context.apply(&mut cmd);

        log::debug!("Spawning {} {}", executable.display(), args.join(" "));

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                return CommandOutput {
                    output: format!("failed to start {program}: {e}\n"),
                    exit_code: LAUNCH_FAILURE,
                    duration: started.elapsed(),
                };
            }
        };

        let mut output = collect_output(&mut child).await;
        let exit_code = match child.wait().await {
            Ok(status) => exit_code(status),
            Err(e) => {
                output.push_str(&format!("failed to wait for {program}: {e}\n"));
                LAUNCH_FAILURE
            }
        };

        CommandOutput {
            output,
            exit_code,
            duration: started.elapsed(),
        }
    }
}

/// Read stdout and stderr line by line, in arrival order.
async fn collect_output(child: &mut Child) -> String {
    let mut combined = String::new();
    let mut stdout = child.stdout.take().map(|s| BufReader::new(s).lines());
    let mut stderr = child.stderr.take().map(|s| BufReader::new(s).lines());

    loop {
        tokio::select! {
            line = next_line(&mut stdout), if stdout.is_some() => match line {
                Some(line) => push_line(&mut combined, &line),
                None => stdout = None,
            },
            line = next_line(&mut stderr), if stderr.is_some() => match line {
                Some(line) => push_line(&mut combined, &line),
                None => stderr = None,
            },
            else => break,
        }
    }

    combined
}

async fn next_line<R>(lines: &mut Option<Lines<R>>) -> Option<String>
where
    R: AsyncBufRead + Unpin,
{
    match lines {
        Some(lines) => lines.next_line().await.ok().flatten(),
        None => None,
    }
}

fn push_line(buf: &mut String, line: &str) {
    buf.push_str(line);
    buf.push('\n');
}

fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
