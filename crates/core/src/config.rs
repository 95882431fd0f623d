//! Session configuration.
//!
//! Command-line flags take priority; options that were not given on the
//! command line fall back to the git configuration (`resolve.allFiles`).
//! The editor is resolved the same way `git var GIT_EDITOR` resolves it.

use git2::{Config, ErrorCode, Repository};
use tracing::{debug, info};

use crate::errors::ConfigError;

/// Git configuration key consulted when `--all-files` is not given.
pub const ALL_FILES_KEY: &str = "resolve.allFiles";

/// Editor used when nothing else is configured.
pub const DEFAULT_EDITOR: &str = "vi";

/// Configuration passed by reference to every component of a session.
#[derive(Debug, Clone)]
pub struct ResolveConfig {
    /// Scan every regular file in the report for stray markers, not only
    /// unmerged ones.
    pub all_files: bool,

    /// Log every executed command and internal decision.
    pub verbose: bool,

    /// Editor command line, possibly with arguments.
    pub editor: String,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            all_files: false,
            verbose: false,
            editor: DEFAULT_EDITOR.into(),
        }
    }
}

impl ResolveConfig {
    /// Build the configuration from command-line flags and a git config.
    ///
    /// This does **not** resolve the editor -- call
    /// [`resolve_editor`](Self::resolve_editor) afterwards.
    pub fn from_git_config(
        config: &Config,
        all_files: bool,
        verbose: bool,
    ) -> Result<Self, ConfigError> {
        let all_files = all_files || read_bool(config, ALL_FILES_KEY)?.unwrap_or(false);
        debug!(all_files, verbose, "configuration parsed");
        Ok(Self {
            all_files,
            verbose,
            ..Self::default()
        })
    }

    /// Pick the editor from `GIT_EDITOR`, `core.editor`, `VISUAL` and
    /// `EDITOR`, in that order.
    pub fn resolve_editor(&mut self, config: &Config) -> Result<(), ConfigError> {
        self.editor = editor_from_sources(
            env_non_empty("GIT_EDITOR"),
            read_string(config, "core.editor")?,
            env_non_empty("VISUAL"),
            env_non_empty("EDITOR"),
        );
        info!(editor = %self.editor, "resolved editor");
        Ok(())
    }

    /// Validate that all fields are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.editor.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "editor".into(),
                detail: "editor command must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Convenience: build, resolve the editor, and validate in one call.
    pub fn load(repo: &Repository, all_files: bool, verbose: bool) -> Result<Self, ConfigError> {
        let git_config = repo.config()?;
        let mut config = Self::from_git_config(&git_config, all_files, verbose)?;
        config.resolve_editor(&git_config)?;
        config.validate()?;
        Ok(config)
    }
}

/// First non-empty editor among the given sources, else [`DEFAULT_EDITOR`].
pub fn editor_from_sources(
    git_editor: Option<String>,
    core_editor: Option<String>,
    visual: Option<String>,
    editor: Option<String>,
) -> String {
    [git_editor, core_editor, visual, editor]
        .into_iter()
        .flatten()
        .find(|e| !e.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_EDITOR.into())
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_bool(config: &Config, key: &str) -> Result<Option<bool>, ConfigError> {
    match config.get_bool(key) {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
        Err(e) => Err(ConfigError::InvalidValue {
            field: key.into(),
            detail: e.message().to_string(),
        }),
    }
}

fn read_string(config: &Config, key: &str) -> Result<Option<String>, ConfigError> {
    match config.get_string(key) {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
        Err(e) => Err(ConfigError::GitConfig(e)),
    }
}
