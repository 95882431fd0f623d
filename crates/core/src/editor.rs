//! Text editor launching.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use tracing::{debug, warn};

use crate::config::ResolveConfig;
use crate::errors::EditorError;

/// Capability used by the resolver to let the user edit a file.
pub trait Editor {
    /// Open `path`, positioned at `line` when given, and block until the
    /// editor exits.
    fn edit(&mut self, path: &Path, line: Option<usize>) -> Result<(), EditorError>;
}

/// How an editor accepts a starting line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    /// `editor +LINE FILE`
    PlusPrefix,
    /// `editor --goto FILE:LINE`
    Goto,
    /// `editor FILE:LINE`
    ColonSuffix,
    /// The file alone.
    Unsupported,
}

/// Line style for a bare program name such as `vim` or `code`.
pub fn line_style(program: &str) -> LineStyle {
    match program {
        "vi" | "vim" | "nvim" | "gvim" | "mvim" | "view" | "nano" | "pico" | "emacs"
        | "emacsclient" | "kak" | "micro" | "joe" | "mg" => LineStyle::PlusPrefix,
        "code" | "code-insiders" | "codium" => LineStyle::Goto,
        "subl" | "sublime_text" | "hx" | "helix" => LineStyle::ColonSuffix,
        _ => LineStyle::Unsupported,
    }
}

/// Arguments appended to the editor command for `path` and `line`.
pub fn editor_args(style: LineStyle, path: &Path, line: Option<usize>) -> Vec<OsString> {
    let Some(line) = line else {
        return vec![path.as_os_str().to_owned()];
    };

    let with_line = || {
        let mut arg = path.as_os_str().to_owned();
        arg.push(format!(":{}", line));
        arg
    };

    match style {
        LineStyle::PlusPrefix => vec![format!("+{}", line).into(), path.as_os_str().to_owned()],
        LineStyle::Goto => vec!["--goto".into(), with_line()],
        LineStyle::ColonSuffix => vec![with_line()],
        LineStyle::Unsupported => vec![path.as_os_str().to_owned()],
    }
}

/// Editor that runs a configured command line as a child process.
#[derive(Debug, Clone)]
pub struct SpawnEditor {
    command: String,
}

impl SpawnEditor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn from_config(config: &ResolveConfig) -> Self {
        Self::new(config.editor.clone())
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Bare name of the editor program, e.g. `vim` for `/usr/bin/vim -f`.
    pub fn program_name(&self) -> String {
        let first = self.command.split_whitespace().next().unwrap_or_default();
        let name = Path::new(first)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        name.strip_suffix(".exe").map(str::to_string).unwrap_or(name)
    }

    #[cfg(unix)]
    fn build_command(&self, args: &[OsString]) -> Command {
        // Let the shell split the editor command so it may carry arguments.
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(format!("{} \"$@\"", self.command))
            .arg(&self.command)
            .args(args);
        cmd
    }

    #[cfg(not(unix))]
    fn build_command(&self, args: &[OsString]) -> Command {
        let mut words = self.command.split_whitespace();
        let mut cmd = Command::new(words.next().unwrap_or_default());
        cmd.args(words).args(args);
        cmd
    }
}

impl Editor for SpawnEditor {
    fn edit(&mut self, path: &Path, line: Option<usize>) -> Result<(), EditorError> {
        let args = editor_args(line_style(&self.program_name()), path, line);
        debug!(editor = %self.command, ?args, "launching editor");

        let status = self
            .build_command(&args)
            .status()
            .map_err(|source| EditorError::LaunchFailed {
                editor: self.command.clone(),
                source,
            })?;

        if !status.success() {
            let exit_code = status.code().unwrap_or(-1);
            warn!(editor = %self.command, exit_code, "editor failed");
            return Err(EditorError::Exited {
                editor: self.command.clone(),
                exit_code,
            });
        }
        Ok(())
    }
}
