use std::path::Path;

use noteerr::runner::{self, DEFAULT_TIMEOUT};
use noteerr::store::EntryStore;

use crate::output;

pub fn cmd_rerun(store: &EntryStore, id: u64, dry_run: bool, yes: bool) -> anyhow::Result<i32> {
    let Some(entry) = store.get_entry_by_id(id)? else {
        eprintln!("[noteerr] error #{id} not found");
        return Ok(1);
    };

    println!("Command: {}", entry.command);
    println!("Directory: {}", entry.directory);

    if dry_run {
        eprintln!("[noteerr] dry run, command not executed");
        return Ok(0);
    }
    if !yes && !output::confirm("Execute this command?", false)? {
        eprintln!("[noteerr] cancelled (pass --yes to skip confirmation)");
        return Ok(0);
    }

    let cwd = (!entry.directory.is_empty()).then(|| Path::new(&entry.directory));
    let result = runner::run_command(&entry.command, cwd, DEFAULT_TIMEOUT);

    if !result.stdout.is_empty() {
        print!("{}", result.stdout);
    }
    if !result.stderr.is_empty() {
        eprint!("{}", result.stderr);
        if !result.stderr.ends_with('\n') {
            eprintln!();
        }
    }

    if result.exit_code == 0 {
        eprintln!("[noteerr] \u{2713} command succeeded (exit code: 0)");
    } else {
        eprintln!(
            "[noteerr] \u{2717} command failed (exit code: {})",
            result.exit_code
        );
    }
    Ok(result.exit_code)
}
