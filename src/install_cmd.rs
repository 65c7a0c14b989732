use noteerr::shell::{self, Shell};

/// Print the integration snippet for `shell`, or for the detected shell.
pub fn cmd_install(shell: Option<Shell>) -> i32 {
    let Some(shell) = shell.or_else(Shell::detect) else {
        eprintln!("[noteerr] could not detect your shell, pass --shell bash|zsh|powershell");
        return 1;
    };

    eprintln!(
        "[noteerr] add the following to {} and restart your shell:\n",
        shell.rc_file_hint()
    );
    print!("{}", shell::integration_snippet(shell));
    eprintln!(
        "\n[noteerr] after a command fails, run 'err \"note\"' (or 'noteerr save') to log it ({} integration)",
        shell.name()
    );
    0
}
