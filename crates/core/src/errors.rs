//! Error types for the git-resolve core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them all for callers that want a
//! single error type and an exit code.

use std::path::PathBuf;

use thiserror::Error;

/// Exit code used when a session ends with conflicts still unresolved.
pub const EXIT_UNRESOLVED: u8 = 1;

/// Exit code used for hard errors that carry no exit code of their own.
pub const EXIT_ERROR: u8 = 2;

/// Exit code used when the user cancels the session.
pub const EXIT_CANCELLED: u8 = 130;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Status(#[from] StatusError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The user quit at a prompt or closed its input.
    #[error("Cancelled.")]
    Cancelled,
}

impl CoreError {
    /// Whether this error is a user cancellation rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// The process exit code this error should terminate with.
    ///
    /// Failed subprocesses propagate their own exit code when it fits in a
    /// byte and is nonzero.
    pub fn exit_code(&self) -> u8 {
        let propagated = match self {
            Self::Cancelled => return EXIT_CANCELLED,
            Self::Git(GitError::CommandFailed { exit_code, .. }) => Some(*exit_code),
            Self::Editor(EditorError::Exited { exit_code, .. }) => Some(*exit_code),
            _ => None,
        };
        propagated
            .and_then(|code| u8::try_from(code).ok())
            .filter(|code| *code != 0)
            .unwrap_or(EXIT_ERROR)
    }
}

// ---------------------------------------------------------------------------
// Status report errors
// ---------------------------------------------------------------------------

/// Errors from decoding the NUL-delimited status report.
#[derive(Debug, Error)]
pub enum StatusError {
    /// A record whose third character is not a space.
    #[error("malformed status record: \"{token}\"")]
    Malformed { token: String },

    /// A rename or copy record that was not followed by its source path.
    #[error("status record for '{path}' is missing its source path")]
    MissingSource { path: String },
}

// ---------------------------------------------------------------------------
// Marker scan errors
// ---------------------------------------------------------------------------

/// Errors from scanning a file for conflict markers.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The file could not be opened or read.
    #[error("failed to read '{}' at line {line}: {source}", path.display())]
    Io {
        path: PathBuf,
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Git errors
// ---------------------------------------------------------------------------

/// Errors from git subprocesses and repository discovery.
#[derive(Debug, Error)]
pub enum GitError {
    /// The `git` binary was not found on `$PATH`.
    #[error("git binary not found: {0}")]
    BinaryNotFound(String),

    /// A `git` command exited with a non-zero status.
    #[error("command failed (exit {exit_code}): {command}: {stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    /// No work tree could be found from the starting directory.
    #[error("git repository not found at '{0}'")]
    RepositoryNotFound(String),

    /// A `git2` library error.
    #[error("git2 error: {0}")]
    Git2Error(#[from] git2::Error),

    /// Generic I/O wrapper.
    #[error("git I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Editor errors
// ---------------------------------------------------------------------------

/// Errors from launching the text editor.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The editor process could not be started.
    #[error("failed to launch editor '{editor}': {source}")]
    LaunchFailed {
        editor: String,
        #[source]
        source: std::io::Error,
    },

    /// The editor exited with a non-zero status.
    #[error("editor '{editor}' exited with status {exit_code}")]
    Exited { editor: String, exit_code: i32 },
}

// ---------------------------------------------------------------------------
// Prompt errors
// ---------------------------------------------------------------------------

/// Errors from the interactive prompt.
#[derive(Debug, Error)]
pub enum PromptError {
    /// The terminal prompt failed.
    #[error("terminal prompt failed: {0}")]
    Terminal(String),

    /// Reading input or writing the prompt failed.
    #[error("prompt I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from building the session configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config value is invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue { field: String, detail: String },

    /// Reading the git configuration failed.
    #[error("git configuration error: {0}")]
    GitConfig(#[from] git2::Error),
}
