//! Shell-facing collaborators: last failed command, last exit code, and the
//! integration snippets printed by `noteerr install`.

use std::path::Path;

use regex::Regex;

/// Exit code assumed when the shell did not pass one along.
pub const DEFAULT_EXIT_CODE: i32 = 1;

/// Shells noteerr knows how to integrate with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Powershell,
}

impl Shell {
    /// Detect the shell from a `$SHELL`-style value.
    pub fn from_shell_var(value: &str) -> Option<Self> {
        let value = value.to_lowercase();
        if value.contains("zsh") {
            Some(Self::Zsh)
        } else if value.contains("bash") {
            Some(Self::Bash)
        } else if value.contains("pwsh") || value.contains("powershell") {
            Some(Self::Powershell)
        } else {
            None
        }
    }

    /// Detect the current shell. Falls back to `PowerShell` on Windows.
    pub fn detect() -> Option<Self> {
        let from_env = std::env::var("SHELL")
            .ok()
            .and_then(|v| Self::from_shell_var(&v));
        if from_env.is_none() && cfg!(windows) {
            return Some(Self::Powershell);
        }
        from_env
    }

    /// History file name under the home directory, if the shell keeps one we can read.
    pub const fn history_file_name(self) -> Option<&'static str> {
        match self {
            Self::Bash => Some(".bash_history"),
            Self::Zsh => Some(".zsh_history"),
            Self::Powershell => None,
        }
    }

    /// Where the user should paste the integration snippet.
    pub const fn rc_file_hint(self) -> &'static str {
        match self {
            Self::Bash => "~/.bashrc",
            Self::Zsh => "~/.zshrc",
            Self::Powershell => "$PROFILE",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Bash => "bash",
            Self::Zsh => "zsh",
            Self::Powershell => "powershell",
        }
    }
}

/// Resolve the command that failed before noteerr was invoked.
///
/// Reads the shell's history file and returns its second-to-last line; the
/// last line is the noteerr invocation itself. Returns `None` for shells
/// without a readable history file.
pub fn last_command() -> Option<String> {
    let shell = Shell::detect()?;
    let file_name = shell.history_file_name()?;
    let home = dirs::home_dir()?;
    last_command_from(&home.join(file_name))
}

/// Second-to-last entry of a history file, with zsh extended-history prefixes removed.
pub fn last_command_from(history_file: &Path) -> Option<String> {
    let bytes = std::fs::read(history_file).ok()?;
    let content = String::from_utf8_lossy(&bytes);
    let lines: Vec<&str> = content.lines().collect();
    if lines.len() < 2 {
        return None;
    }
    let line = strip_zsh_metadata(lines[lines.len() - 2]).trim().to_owned();
    if line.is_empty() { None } else { Some(line) }
}

/// `: 1700000000:0;git push` → `git push`. Other lines pass through unchanged.
fn strip_zsh_metadata(line: &str) -> &str {
    let Ok(re) = Regex::new(r"^: \d+:\d+;") else {
        return line;
    };
    re.find(line).map_or(line, |m| &line[m.end()..])
}

/// Exit code from `NOTEERR_EXIT_CODE`, defaulting to 1.
pub fn last_exit_code() -> i32 {
    parse_exit_code(std::env::var("NOTEERR_EXIT_CODE").ok().as_deref())
}

fn parse_exit_code(value: Option<&str>) -> i32 {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(DEFAULT_EXIT_CODE)
}

const POSIX_SNIPPET_BASH: &str = r#"# noteerr: type `err "note"` right after a command fails
__noteerr_last_exit=0
__noteerr_capture() { __noteerr_last_exit=$?; }
PROMPT_COMMAND="__noteerr_capture${PROMPT_COMMAND:+;$PROMPT_COMMAND}"
err() {
    NOTEERR_EXIT_CODE=$__noteerr_last_exit \
    NOTEERR_COMMAND="$(HISTTIMEFORMAT= history 2 | head -n 1 | sed 's/^ *[0-9]* *//')" \
    noteerr save "$@"
}
"#;

const POSIX_SNIPPET_ZSH: &str = r#"# noteerr: type `err "note"` right after a command fails
__noteerr_last_exit=0
__noteerr_capture() { __noteerr_last_exit=$?; }
precmd_functions+=(__noteerr_capture)
err() {
    NOTEERR_EXIT_CODE=$__noteerr_last_exit \
    NOTEERR_COMMAND="$(fc -ln -2 -2)" \
    noteerr save "$@"
}
"#;

const POWERSHELL_SNIPPET: &str = r#"# noteerr: type `err "note"` right after a command fails
function err {
    param([Parameter(ValueFromRemainingArguments = $true)] $Rest)
    $env:NOTEERR_EXIT_CODE = if ($LASTEXITCODE) { $LASTEXITCODE } else { 1 }
    $env:NOTEERR_COMMAND = (Get-History -Count 1).CommandLine
    noteerr save @Rest
    Remove-Item Env:NOTEERR_EXIT_CODE, Env:NOTEERR_COMMAND -ErrorAction SilentlyContinue
}
"#;

/// Shell function that forwards the last command and exit code to `noteerr save`.
pub const fn integration_snippet(shell: Shell) -> &'static str {
    match shell {
        Shell::Bash => POSIX_SNIPPET_BASH,
        Shell::Zsh => POSIX_SNIPPET_ZSH,
        Shell::Powershell => POWERSHELL_SNIPPET,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn history(content: &str) -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join(".bash_history");
        std::fs::write(&path, content).expect("write history");
        (dir, path)
    }

    #[test]
    fn detects_shell_from_path() {
        assert_eq!(Shell::from_shell_var("/bin/bash"), Some(Shell::Bash));
        assert_eq!(Shell::from_shell_var("/usr/bin/ZSH"), Some(Shell::Zsh));
        assert_eq!(Shell::from_shell_var("/usr/bin/pwsh"), Some(Shell::Powershell));
        assert_eq!(Shell::from_shell_var("/usr/bin/fish"), None);
    }

    #[test]
    fn last_command_is_second_to_last_line() {
        let (_dir, path) = history("ls\nnpm install\nnoteerr save\n");
        assert_eq!(last_command_from(&path).as_deref(), Some("npm install"));
    }

    #[test]
    fn last_command_strips_zsh_extended_history() {
        let (_dir, path) = history(": 1700000000:0;git push origin main\n: 1700000005:0;noteerr save\n");
        assert_eq!(last_command_from(&path).as_deref(), Some("git push origin main"));
    }

    #[test]
    fn last_command_needs_two_lines() {
        let (_dir, path) = history("noteerr save\n");
        assert!(last_command_from(&path).is_none());
    }

    #[test]
    fn last_command_tolerates_invalid_utf8() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join(".zsh_history");
        std::fs::write(&path, b"make \xff build\nnoteerr save\n").expect("write");
        let cmd = last_command_from(&path).expect("command");
        assert!(cmd.starts_with("make"));
    }

    #[test]
    fn last_command_missing_file_is_none() {
        assert!(last_command_from(Path::new("/nonexistent/.bash_history")).is_none());
    }

    #[test]
    fn exit_code_parsing() {
        assert_eq!(parse_exit_code(Some("127")), 127);
        assert_eq!(parse_exit_code(Some(" 2 ")), 2);
        assert_eq!(parse_exit_code(Some("oops")), DEFAULT_EXIT_CODE);
        assert_eq!(parse_exit_code(None), DEFAULT_EXIT_CODE);
    }

    #[test]
    fn snippets_call_noteerr_save() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Powershell] {
            let snippet = integration_snippet(shell);
            assert!(snippet.contains("noteerr save"), "{}", shell.name());
            assert!(snippet.contains("NOTEERR_EXIT_CODE"), "{}", shell.name());
            assert!(snippet.contains("NOTEERR_COMMAND"), "{}", shell.name());
        }
    }
}
