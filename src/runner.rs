//! External command runner used by `noteerr rerun` and the clipboard fallback.

use std::io::{Read, Write};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// How long a re-run command may take before it is killed.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Exit code reported when the command could not be run to completion.
pub const FAILED_EXIT_CODE: i32 = -1;

/// Captured result of one command run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    fn failed(message: String) -> Self {
        Self {
            exit_code: FAILED_EXIT_CODE,
            stdout: String::new(),
            stderr: message,
        }
    }
}

/// Extract an exit code from a process status, mapping signals to 128+N on Unix.
fn exit_code_from_status(status: std::process::ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        status
            .code()
            .unwrap_or_else(|| status.signal().map_or(1, |s| 128 + s))
    }
    #[cfg(not(unix))]
    {
        status.code().unwrap_or(1)
    }
}

fn shell_command(command: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", command]);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", command]);
        cmd
    }
}

/// Drain a pipe on its own thread so a chatty child cannot block on a full buffer.
fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

/// Wait for `child`, killing it once `timeout` elapses. `None` means it timed out.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> std::io::Result<Option<i32>> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(exit_code_from_status(status)));
        }
        if start.elapsed() >= timeout {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(Duration::from_millis(10));
    }
}

/// Run `command` through the platform shell in `cwd`, capturing both streams.
///
/// Never fails: spawn errors and timeouts are reported as exit code -1 with
/// a message in `stderr`.
pub fn run_command(command: &str, cwd: Option<&Path>, timeout: Duration) -> CommandOutput {
    let mut cmd = shell_command(command);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) => return CommandOutput::failed(e.to_string()),
    };
    tracing::debug!(command, pid = child.id(), "spawned command");

    let stdout_thread = spawn_reader(child.stdout.take());
    let stderr_thread = spawn_reader(child.stderr.take());

    match wait_with_timeout(&mut child, timeout) {
        Ok(Some(exit_code)) => CommandOutput {
            exit_code,
            stdout: stdout_thread.join().unwrap_or_default(),
            stderr: stderr_thread.join().unwrap_or_default(),
        },
        // Readers are left detached: a grandchild may still hold the pipes open.
        Ok(None) => CommandOutput::failed(format!(
            "Command timed out after {} seconds",
            timeout.as_secs()
        )),
        Err(e) => CommandOutput::failed(e.to_string()),
    }
}

/// Feed `input` to `program args...` on stdin and wait for it to exit.
///
/// # Errors
/// Returns an error if the program cannot be spawned, written to, or exits non-zero.
pub fn pipe_to(program: &Path, args: &[&str], input: &str) -> anyhow::Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| anyhow::anyhow!("failed to spawn {}: {e}", program.display()))?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(input.as_bytes())?;
    }
    let status = child.wait()?;
    if !status.success() {
        anyhow::bail!(
            "{} exited with code {}",
            program.display(),
            exit_code_from_status(status)
        );
    }
    Ok(())
}

#[cfg(test)]
#[cfg(unix)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout_and_exit_code() {
        let out = run_command("echo hello", None, DEFAULT_TIMEOUT);
        assert_eq!(out.exit_code, 0);
        assert_eq!(out.stdout.trim(), "hello");
        assert!(out.stderr.is_empty());
    }

    #[test]
    fn captures_stderr_and_failure_code() {
        let out = run_command("echo oops >&2; exit 3", None, DEFAULT_TIMEOUT);
        assert_eq!(out.exit_code, 3);
        assert_eq!(out.stderr.trim(), "oops");
    }

    #[test]
    fn runs_in_requested_directory() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        std::fs::write(dir.path().join("marker.txt"), "").expect("write");
        let out = run_command("ls", Some(dir.path()), DEFAULT_TIMEOUT);
        assert!(out.stdout.contains("marker.txt"), "got: {}", out.stdout);
    }

    #[test]
    fn missing_directory_reports_failure() {
        let out = run_command(
            "echo hi",
            Some(Path::new("/nonexistent/noteerr/dir")),
            DEFAULT_TIMEOUT,
        );
        assert_eq!(out.exit_code, FAILED_EXIT_CODE);
        assert!(!out.stderr.is_empty());
    }

    #[test]
    fn times_out_and_reports_minus_one() {
        let out = run_command("sleep 5", None, Duration::from_millis(200));
        assert_eq!(out.exit_code, FAILED_EXIT_CODE);
        assert!(out.stderr.contains("timed out"), "got: {}", out.stderr);
    }

    #[test]
    fn pipe_to_feeds_stdin() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let target = dir.path().join("out.txt");
        let sh = which::which("sh").expect("sh on PATH");
        let script = format!("cat > '{}'", target.display());
        pipe_to(&sh, &["-c", &script], "copied text").expect("pipe");
        assert_eq!(std::fs::read_to_string(&target).expect("read"), "copied text");
    }
}
