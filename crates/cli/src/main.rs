//! git-resolve: interactively resolve merge conflicts in a Git work tree.
//!
//! Walks every conflicted path reported by `git status`, offering to edit
//! files that still carry conflict markers and to confirm deletions, then
//! stages what was resolved and prints a summary.

mod style;
mod summary;
mod terminal;

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gitresolve_core::editor::SpawnEditor;
use gitresolve_core::errors::EXIT_ERROR;
use gitresolve_core::prompt::LinePrompter;
use gitresolve_core::{CoreError, Session, SessionReport};

use crate::terminal::TerminalPrompter;

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// Interactively resolve merge conflicts in the current repository.
#[derive(Parser, Debug)]
#[command(
    name = "git-resolve",
    version,
    about = "Interactively resolve merge conflicts in the current repository"
)]
struct Cli {
    /// Also check files git does not report as conflicted for leftover
    /// conflict markers. Defaults to the `resolve.allFiles` git setting.
    #[arg(short, long)]
    all_files: bool,

    /// Print every command that is run and other debugging output.
    #[arg(short, long)]
    verbose: bool,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => match e.downcast_ref::<CoreError>() {
            Some(core) if core.is_cancelled() => {
                eprintln!("{}", style::warn(&core.to_string()));
                ExitCode::from(core.exit_code())
            }
            Some(core) => {
                eprintln!("{}", style::error(&format!("error: {:#}", e)));
                ExitCode::from(core.exit_code())
            }
            None => {
                eprintln!("{}", style::error(&format!("error: {:#}", e)));
                ExitCode::from(EXIT_ERROR)
            }
        },
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: &Cli) -> Result<u8> {
    let cwd = std::env::current_dir().context("failed to determine the working directory")?;
    let session = Session::open(&cwd, cli.all_files, cli.verbose)
        .context("failed to open the repository")?;
    let mut editor = SpawnEditor::from_config(session.config());
    tracing::debug!(editor = %editor.command(), "using editor");

    let report = if io::stdin().is_terminal() && console::user_attended_stderr() {
        let mut prompter = TerminalPrompter::new();
        session.run(&mut prompter, &mut editor)?
    } else {
        let stdin = io::stdin();
        let mut prompter = LinePrompter::new(stdin.lock(), io::stderr());
        session.run(&mut prompter, &mut editor)?
    };

    print_report(&report);
    Ok(report.exit_code())
}

fn print_report(report: &SessionReport) {
    if let Some(table) = summary::render(report) {
        println!();
        println!("{table}");
    }
    println!("{}", style::outcome(report.state));
}
