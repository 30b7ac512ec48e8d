//! Subprocess execution wrappers
//!
//! All helpers capture stdout and stderr as UTF-8 text (lossily decoded).

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Output};

use crate::HutiError;

/// A finished process with captured output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completed {
    /// Program followed by its arguments.
    pub args: Vec<String>,
    /// Exit code, or `None` when the process was killed by a signal.
    pub code: Option<i32>,
    /// Signal number that terminated the process (Unix only).
    pub signal: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl Completed {
    fn from_output(args: Vec<String>, output: Output) -> Self {
        Self {
            args,
            code: output.status.code(),
            signal: exit_signal(&output.status),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn stdout_lines(&self) -> Vec<&str> {
        self.stdout.lines().collect()
    }

    pub fn stderr_lines(&self) -> Vec<&str> {
        self.stderr.lines().collect()
    }

    /// Turn a non-zero exit into an error.
    pub fn check(self) -> Result<Self, CmdError> {
        if self.success() {
            Ok(self)
        } else {
            Err(CmdError::Failed(Box::new(self)))
        }
    }
}

#[cfg(unix)]
fn exit_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: &ExitStatus) -> Option<i32> {
    None
}

#[cfg(unix)]
fn signal_name(signal: i32) -> Option<String> {
    nix::sys::signal::Signal::try_from(signal).ok().map(|s| s.as_str().to_string())
}

#[cfg(not(unix))]
fn signal_name(_signal: i32) -> Option<String> {
    None
}

#[derive(Debug, thiserror::Error)]
pub enum CmdError {
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{}", failure_report(.0))]
    Failed(Box<Completed>),

    #[error("empty command line")]
    Empty,
}

impl CmdError {
    /// The completed process behind a non-zero exit.
    pub fn completed(&self) -> Option<&Completed> {
        match self {
            CmdError::Failed(completed) => Some(completed.as_ref()),
            _ => None,
        }
    }
}

fn failure_report(completed: &Completed) -> String {
    let status = match (completed.code, completed.signal) {
        (Some(code), _) => code.to_string(),
        (None, Some(signal)) => match signal_name(signal) {
            Some(name) => format!("Died with {name}."),
            None => format!("Died with unknown signal {signal}."),
        },
        (None, None) => "unknown".to_string(),
    };
    let mut report = String::new();
    push_block(&mut report, "Return Code", &status);
    push_block(&mut report, "Command", &completed.args.join(" "));
    push_block(&mut report, "Stderr", completed.stderr.trim_end());
    push_block(&mut report, "Stdout", completed.stdout.trim_end());
    report
}

fn push_block(report: &mut String, title: &str, body: &str) {
    report.push_str(&format!("\n  {title}:\n    {body}\n"));
}

impl fmt::Display for Completed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (exit {:?})", self.args.join(" "), self.code)
    }
}

fn run_command(
    program: &str,
    args: &[&str],
    cwd: Option<&Path>,
) -> Result<Completed, CmdError> {
    let mut command = Command::new(program);
    command.args(args);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }
    tracing::debug!("running {} {}", program, args.join(" "));
    let output = command
        .output()
        .map_err(|source| CmdError::Spawn { program: program.to_string(), source })?;

    let mut argv = Vec::with_capacity(args.len() + 1);
    argv.push(program.to_string());
    argv.extend(args.iter().map(|a| a.to_string()));
    Ok(Completed::from_output(argv, output))
}

/// Run `program` with `args`, failing on a non-zero exit.
pub fn cmd(program: &str, args: &[&str]) -> Result<Completed, CmdError> {
    run_command(program, args, None)?.check()
}

/// Like [`cmd`], optionally inside `cwd`.
pub fn command(program: &str, args: &[&str], cwd: Option<&Path>) -> Result<Completed, CmdError> {
    run_command(program, args, cwd)?.check()
}

/// Options for [`cmdrun`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Run through `sh -c` so variables and pipes are expanded.
    pub shell: bool,
    /// Return an error on a non-zero exit.
    pub check: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { shell: true, check: false }
    }
}

/// Run a command line. Without `shell` it is split on whitespace.
pub fn cmdrun(line: &str, options: &RunOptions) -> Result<Completed, CmdError> {
    let completed = if options.shell {
        run_command("sh", &["-c", line], None)?
    } else {
        let mut parts = line.split_whitespace();
        let program = parts.next().ok_or(CmdError::Empty)?;
        let args: Vec<&str> = parts.collect();
        run_command(program, &args, None)?
    };

    if options.check {
        completed.check()
    } else {
        Ok(completed)
    }
}

/// Stdout of a shell command with the trailing newline removed, or `None`
/// if it could not run or exited non-zero.
pub fn stdout(line: &str) -> Option<String> {
    let completed = run_command("sh", &["-c", line], None).ok()?;
    if !completed.success() {
        return None;
    }
    let out = completed.stdout;
    Some(out.strip_suffix('\n').map(str::to_string).unwrap_or(out))
}

/// Resolve an executable name (or path) on `PATH`.
pub fn which<S: AsRef<OsStr>>(name: S) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Like [`which`], failing with [`HutiError::CommandNotFound`].
pub fn which_required(name: &str) -> Result<PathBuf, HutiError> {
    which(name).ok_or_else(|| HutiError::CommandNotFound(name.to_string()))
}

/// Whether the current process runs as `user`.
#[cfg(unix)]
pub fn ami(user: &str) -> bool {
    match nix::unistd::User::from_name(user) {
        Ok(Some(found)) => found.uid == nix::unistd::Uid::current(),
        _ => false,
    }
}

/// Run through `sudo -u user` unless already running as `user`.
#[cfg(unix)]
pub fn cmdsudo(user: &str, program: &str, args: &[&str]) -> Result<Option<Completed>, CmdError> {
    if ami(user) {
        return Ok(None);
    }
    let mut sudo_args = vec!["-u", user, program];
    sudo_args.extend_from_slice(args);
    cmd("sudo", &sudo_args).map(Some)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cmd_captures_stdout() {
        let completed = cmd("echo", &["hello"]).expect("echo");
        assert_eq!(completed.stdout, "hello\n");
        assert_eq!(completed.args, vec!["echo", "hello"]);
        assert!(completed.success());
    }

    #[test]
    fn test_cmd_failure_reports_details() {
        let err = cmd("sh", &["-c", "echo oops >&2; exit 3"]).unwrap_err();
        let completed = err.completed().expect("completed");
        assert_eq!(completed.code, Some(3));
        let message = err.to_string();
        assert!(message.contains("Return Code:\n    3"));
        assert!(message.contains("Stderr:\n    oops"));
    }

    #[test]
    fn test_cmd_missing_program_is_spawn_error() {
        let err = cmd("huti-definitely-not-a-program", &[]).unwrap_err();
        assert!(matches!(err, CmdError::Spawn { .. }));
    }

    #[test]
    fn test_killed_process_names_signal() {
        let err = cmd("sh", &["-c", "kill -TERM $$"]).unwrap_err();
        let completed = err.completed().expect("completed");
        assert_eq!(completed.code, None);
        assert!(err.to_string().contains("Died with SIGTERM."));
    }

    #[test]
    fn test_command_runs_in_cwd() {
        let tmp = TempDir::new().expect("tmp");
        let completed = command("pwd", &[], Some(tmp.path())).expect("pwd");
        let reported = std::path::PathBuf::from(completed.stdout.trim_end());
        assert_eq!(
            reported.canonicalize().expect("canon"),
            tmp.path().canonicalize().expect("canon")
        );
    }

    #[test]
    fn test_cmdrun_shell_and_lines() {
        let completed = cmdrun("printf 'a\\nb\\n'", &RunOptions::default()).expect("run");
        assert_eq!(completed.stdout_lines(), vec!["a", "b"]);

        let completed =
            cmdrun("ls /huti-missing-dir", &RunOptions::default()).expect("unchecked run");
        assert!(!completed.success());
        assert!(!completed.stderr_lines().is_empty());
    }

    #[test]
    fn test_cmdrun_without_shell_checks() {
        let options = RunOptions { shell: false, check: true };
        assert_eq!(cmdrun("echo a b", &options).expect("echo").stdout, "a b\n");
        assert!(cmdrun("false", &options).is_err());
        assert!(matches!(cmdrun("   ", &options), Err(CmdError::Empty)));
    }

    #[test]
    fn test_stdout_helper() {
        assert_eq!(stdout("echo /bin/ls"), Some("/bin/ls".to_string()));
        assert_eq!(stdout("true"), Some(String::new()));
        assert_eq!(stdout("ls /huti-missing-dir 2>/dev/null"), None);
    }

    #[test]
    fn test_ami_and_cmdsudo_for_current_user() {
        let current = nix::unistd::User::from_uid(nix::unistd::Uid::current()).ok().flatten();
        // Containers may run as a uid with no passwd entry.
        let Some(me) = current else {
            return;
        };
        assert!(ami(&me.name));
        assert!(matches!(cmdsudo(&me.name, "true", &[]), Ok(None)));
    }

    #[test]
    fn test_ami_unknown_user_is_false() {
        assert!(!ami("huti-no-such-user"));
    }

    #[test]
    fn test_which() {
        assert!(which("sh").is_some());
        assert!(which("huti-definitely-not-a-program").is_none());
        assert!(matches!(
            which_required("huti-definitely-not-a-program"),
            Err(HutiError::CommandNotFound(name)) if name == "huti-definitely-not-a-program"
        ));
    }
}
