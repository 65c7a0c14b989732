mod copy_cmd;
mod install_cmd;
mod list_cmd;
mod manage_cmd;
mod output;
mod rerun_cmd;
mod save_cmd;
mod stats_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use noteerr::config::Config;
use noteerr::shell::Shell;
use noteerr::store::EntryStore;

#[derive(Parser)]
#[command(
    name = "noteerr",
    version,
    about = "Command error memory: log, annotate, and recall failed commands"
)]
struct Cli {
    /// Print debug diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save the last failed command and its error
    Save(save_cmd::SaveArgs),
    /// List recent error entries
    List {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
        /// Only entries carrying this exact tag
        #[arg(short, long)]
        tag: Option<String>,
        /// Only entries in this project (case-insensitive)
        #[arg(short, long)]
        project: Option<String>,
        /// Show every entry instead of the most recent ones
        #[arg(short, long)]
        all: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search errors by command, error text, notes, or tags
    Search {
        /// Text to look for (case-insensitive)
        query: String,
        /// Maximum number of results to show
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show full details of one error
    Show {
        /// Entry ID
        id: u64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replace the notes (and optionally tags) of an error
    Annotate {
        /// Entry ID
        id: u64,
        /// New notes
        notes: String,
        /// Replace tags (comma-separated)
        #[arg(short, long)]
        tags: Option<String>,
    },
    /// Re-run a previously failed command in its original directory
    Rerun {
        /// Entry ID
        id: u64,
        /// Show the command without executing it
        #[arg(long)]
        dry_run: bool,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Show statistics about logged errors
    Stats {
        /// Restrict statistics to entries with this tag
        #[arg(short, long)]
        tag: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List all projects with their error counts
    Projects,
    /// Delete one error
    Delete {
        /// Entry ID
        id: u64,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete every error and reset IDs
    Clear {
        /// Do not ask for confirmation. This is destructive and cannot be undone
        #[arg(short, long)]
        yes: bool,
    },
    /// Copy an error to the clipboard (`copy 3`, `copy latest`, `copy error 3`)
    Copy {
        /// An entry ID, `latest`, or `error`
        what: String,
        /// Entry ID or `latest` when WHAT is `error`
        specifier: Option<String>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = copy_cmd::CopyFormat::Text)]
        format: copy_cmd::CopyFormat,
        /// Print to stdout instead of the clipboard
        #[arg(long)]
        stdout: bool,
    },
    /// Print the shell integration snippet
    Install {
        /// Shell to integrate with (detected from $SHELL when omitted)
        #[arg(long, value_enum)]
        shell: Option<Shell>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("NOTEERR_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn or_exit(r: anyhow::Result<i32>) -> i32 {
    r.unwrap_or_else(|e| {
        eprintln!("[noteerr] error: {e:#}");
        1
    })
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    // Install only prints text; it must work even without a writable data dir.
    if let Commands::Install { shell } = &cli.command {
        return Ok(install_cmd::cmd_install(*shell));
    }

    let config = Config::load();
    let store = EntryStore::open_default(&config)?;

    match cli.command {
        Commands::Save(args) => save_cmd::cmd_save(&store, &config, args),
        Commands::List {
            limit,
            tag,
            project,
            all,
            json,
        } => list_cmd::cmd_list(
            &store,
            &list_cmd::ListOptions {
                limit,
                tag,
                project,
                all,
                json,
            },
        ),
        Commands::Search { query, limit, json } => {
            list_cmd::cmd_search(&store, &query, limit, json)
        }
        Commands::Show { id, json } => list_cmd::cmd_show(&store, id, json),
        Commands::Annotate { id, notes, tags } => {
            manage_cmd::cmd_annotate(&store, id, &notes, tags.as_deref())
        }
        Commands::Rerun { id, dry_run, yes } => rerun_cmd::cmd_rerun(&store, id, dry_run, yes),
        Commands::Stats { tag, json } => stats_cmd::cmd_stats(&store, tag.as_deref(), json),
        Commands::Projects => stats_cmd::cmd_projects(&store),
        Commands::Delete { id, yes } => manage_cmd::cmd_delete(&store, id, yes),
        Commands::Clear { yes } => manage_cmd::cmd_clear(&store, yes),
        Commands::Copy {
            what,
            specifier,
            format,
            stdout,
        } => copy_cmd::cmd_copy(&store, &what, specifier.as_deref(), format, stdout),
        Commands::Install { shell } => Ok(install_cmd::cmd_install(shell)),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let exit_code = or_exit(run(cli));
    std::process::exit(exit_code);
}
