//! Interactive conflict resolution.
//!
//! [`Resolver`] classifies each status entry and dispatches it to one of:
//! - the content loop, which scans for markers and lets the user edit until
//!   none remain, skip the file, or quit;
//! - deletion resolution, which offers to delete the file;
//! - a plain report for add/add style conflicts that cannot be resolved
//!   here yet.
//!
//! Per-file outcomes are folded into one [`ConflictState`] for the session.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::classify::{action_for, Action, ConflictCategory};
use crate::config::ResolveConfig;
use crate::editor::Editor;
use crate::errors::{CoreError, StatusError};
use crate::git::Index;
use crate::marker::find_conflict_marker;
use crate::prompt::{Choice, Prompter};
use crate::state::ConflictState;
use crate::status::StatusEntry;

/// Answers offered while a file still contains a conflict marker.
pub const CONTENT_CHOICES: [Choice; 3] = [
    Choice::new('e', "edit"),
    Choice::new('s', "skip"),
    Choice::new('q', "quit"),
];

/// Result of processing one status entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub category: ConflictCategory,
    pub state: ConflictState,
}

/// Result of a whole session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    /// Join of every per-file state.
    pub state: ConflictState,
    /// One outcome per entry that was not ignored, in report order.
    pub files: Vec<FileOutcome>,
}

impl SessionReport {
    /// Fold one more file outcome into the session.
    pub fn record(&mut self, outcome: FileOutcome) {
        self.state = self.state.combine(outcome.state);
        self.files.push(outcome);
    }

    pub fn exit_code(&self) -> u8 {
        self.state.exit_code()
    }
}

/// Drives resolution of a session's entries through the user-facing
/// capabilities.
pub struct Resolver<'a> {
    config: &'a ResolveConfig,
    prompter: &'a mut dyn Prompter,
    editor: &'a mut dyn Editor,
    index: &'a mut dyn Index,
    base: PathBuf,
}

impl<'a> Resolver<'a> {
    pub fn new(
        config: &'a ResolveConfig,
        prompter: &'a mut dyn Prompter,
        editor: &'a mut dyn Editor,
        index: &'a mut dyn Index,
    ) -> Self {
        Self {
            config,
            prompter,
            editor,
            index,
            base: PathBuf::new(),
        }
    }

    /// Directory that entry paths are relative to, when it is not the
    /// process working directory. Index updates still receive the entry path.
    pub fn with_base_dir(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = base.into();
        self
    }

    /// Process every entry in report order and fold the results.
    ///
    /// Stops at the first error or cancellation; files already staged stay
    /// staged.
    pub fn run<I>(&mut self, entries: I) -> Result<SessionReport, CoreError>
    where
        I: IntoIterator<Item = Result<StatusEntry, StatusError>>,
    {
        let mut report = SessionReport::default();
        for entry in entries {
            if let Some(outcome) = self.process_entry(&entry?)? {
                debug!(path = %outcome.path.display(), state = %outcome.state, "file processed");
                report.record(outcome);
            }
        }
        info!(state = %report.state, files = report.files.len(), "session complete");
        Ok(report)
    }

    /// Classify one entry and resolve it. Returns `None` for ignored entries.
    pub fn process_entry(&mut self, entry: &StatusEntry) -> Result<Option<FileOutcome>, CoreError> {
        let category = ConflictCategory::from_code(entry.index_code, entry.worktree_code);
        let path = entry.path.as_path();
        let is_regular_file = self.config.all_files && self.base.join(path).is_file();
        let action = action_for(category, self.config.all_files, is_regular_file);
        debug!(path = %path.display(), code = %entry.raw_code(), ?action, "classified");

        let state = match action {
            Action::Ignore => return Ok(None),
            Action::ReportUnresolved => self.report_unresolved(path, category),
            Action::ResolveDeletion => self.resolve_deletion(path, category)?,
            Action::ResolveContent => self.resolve_content(path)?,
        };

        Ok(Some(FileOutcome {
            path: entry.path.clone(),
            category,
            state,
        }))
    }

    fn report_unresolved(&mut self, path: &Path, category: ConflictCategory) -> ConflictState {
        let message = match category {
            ConflictCategory::AddedByBoth => format!(
                "{}: {} (not yet supported; resolve manually)",
                path.display(),
                category
            ),
            _ => format!("{}: {}", path.display(), category),
        };
        self.prompter.notify(&message);
        ConflictState::Unresolved
    }

    /// Offer to delete a file that was deleted on at least one side.
    pub fn resolve_deletion(
        &mut self,
        path: &Path,
        category: ConflictCategory,
    ) -> Result<ConflictState, CoreError> {
        let prompt = format!("{}: {}. Delete it?", path.display(), category);
        match self.prompter.confirm(&prompt, true)? {
            Some(true) => {
                self.index.remove(path)?;
                Ok(ConflictState::Resolved)
            }
            Some(false) => Ok(ConflictState::Unresolved),
            None => Err(CoreError::Cancelled),
        }
    }

    /// Scan, prompt and edit until `path` has no marker, or the user skips
    /// or quits.
    ///
    /// Only a file that had a marker and then lost it is staged.
    pub fn resolve_content(&mut self, path: &Path) -> Result<ConflictState, CoreError> {
        let on_disk = self.base.join(path);
        let mut state = ConflictState::None;

        loop {
            let Some(line) = find_conflict_marker(&on_disk)? else {
                if state == ConflictState::Unresolved {
                    self.index.stage(path)?;
                    self.prompter.notify(&format!("{}: resolved", path.display()));
                    return Ok(ConflictState::Resolved);
                }
                debug!(path = %path.display(), "no conflicts");
                return Ok(state);
            };

            state = ConflictState::Unresolved;
            let prompt = format!("{}:{}: conflict marker found. Edit?", path.display(), line);
            match self.prompter.choose(&prompt, &CONTENT_CHOICES, Some('e'))? {
                Some('e') => self.editor.edit(&on_disk, Some(line))?,
                Some('s') => {
                    debug!(path = %path.display(), "skipped");
                    return Ok(state);
                }
                _ => return Err(CoreError::Cancelled),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{EditorError, GitError, PromptError};
    use std::collections::VecDeque;

    const CONFLICTED: &str = "a\n<<<<<<< ours\nx\n=======\ny\n>>>>>>> theirs\n";

    #[derive(Default)]
    struct Scripted {
        answers: VecDeque<Option<char>>,
        prompts: Vec<String>,
        notices: Vec<String>,
    }

    impl Scripted {
        fn answering(answers: &[Option<char>]) -> Self {
            Self {
                answers: answers.iter().copied().collect(),
                ..Self::default()
            }
        }
    }

    impl Prompter for Scripted {
        fn choose(
            &mut self,
            prompt: &str,
            _choices: &[Choice],
            _default: Option<char>,
        ) -> Result<Option<char>, PromptError> {
            self.prompts.push(prompt.to_string());
            Ok(self.answers.pop_front().flatten())
        }

        fn notify(&mut self, message: &str) {
            self.notices.push(message.to_string());
        }
    }

    /// Editor that rewrites the file to `fixed` on every launch.
    struct FixingEditor {
        fixed: &'static str,
        launches: Vec<(PathBuf, Option<usize>)>,
    }

    impl Editor for FixingEditor {
        fn edit(&mut self, path: &Path, line: Option<usize>) -> Result<(), EditorError> {
            self.launches.push((path.to_path_buf(), line));
            std::fs::write(path, self.fixed).unwrap();
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingIndex {
        staged: Vec<PathBuf>,
        removed: Vec<PathBuf>,
    }

    impl Index for RecordingIndex {
        fn stage(&mut self, path: &Path) -> Result<(), GitError> {
            self.staged.push(path.to_path_buf());
            Ok(())
        }

        fn remove(&mut self, path: &Path) -> Result<(), GitError> {
            self.removed.push(path.to_path_buf());
            Ok(())
        }
    }

    fn entry(code: &str, path: &Path) -> StatusEntry {
        let mut chars = code.chars();
        StatusEntry {
            path: path.to_path_buf(),
            index_code: chars.next().unwrap(),
            worktree_code: chars.next().unwrap(),
        }
    }

    #[test]
    fn test_clean_file_is_none_and_not_staged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clean.txt");
        std::fs::write(&path, "nothing here\n").unwrap();

        let config = ResolveConfig::default();
        let mut prompter = Scripted::default();
        let mut editor = FixingEditor { fixed: "", launches: Vec::new() };
        let mut index = RecordingIndex::default();
        let state = Resolver::new(&config, &mut prompter, &mut editor, &mut index)
            .resolve_content(&path)
            .unwrap();

        assert_eq!(state, ConflictState::None);
        assert!(index.staged.is_empty());
        assert!(prompter.prompts.is_empty());
    }

    #[test]
    fn test_edit_then_clean_is_resolved_and_staged_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, CONFLICTED).unwrap();

        let config = ResolveConfig::default();
        let mut prompter = Scripted::answering(&[Some('e')]);
        let mut editor = FixingEditor { fixed: "a\nx\ny\n", launches: Vec::new() };
        let mut index = RecordingIndex::default();
        let state = Resolver::new(&config, &mut prompter, &mut editor, &mut index)
            .resolve_content(&path)
            .unwrap();

        assert_eq!(state, ConflictState::Resolved);
        assert_eq!(index.staged, vec![path.clone()]);
        assert_eq!(editor.launches, vec![(path, Some(2))]);
    }

    #[test]
    fn test_edit_repeats_while_markers_remain() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, CONFLICTED).unwrap();

        let config = ResolveConfig::default();
        // The editor leaves the marker in place, so the user is asked again.
        let mut prompter = Scripted::answering(&[Some('e'), Some('e'), Some('s')]);
        let mut editor = FixingEditor { fixed: "=======\n", launches: Vec::new() };
        let mut index = RecordingIndex::default();
        let state = Resolver::new(&config, &mut prompter, &mut editor, &mut index)
            .resolve_content(&path)
            .unwrap();

        assert_eq!(state, ConflictState::Unresolved);
        assert_eq!(prompter.prompts.len(), 3);
        assert_eq!(editor.launches[1].1, Some(1));
        assert!(index.staged.is_empty());
    }

    #[test]
    fn test_skip_leaves_file_unresolved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, CONFLICTED).unwrap();

        let config = ResolveConfig::default();
        let mut prompter = Scripted::answering(&[Some('s')]);
        let mut editor = FixingEditor { fixed: "", launches: Vec::new() };
        let mut index = RecordingIndex::default();
        let state = Resolver::new(&config, &mut prompter, &mut editor, &mut index)
            .resolve_content(&path)
            .unwrap();

        assert_eq!(state, ConflictState::Unresolved);
        assert!(index.staged.is_empty());
        assert!(editor.launches.is_empty());
    }

    #[test]
    fn test_quit_cancels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, CONFLICTED).unwrap();

        let config = ResolveConfig::default();
        let mut prompter = Scripted::answering(&[Some('q')]);
        let mut editor = FixingEditor { fixed: "", launches: Vec::new() };
        let mut index = RecordingIndex::default();
        let err = Resolver::new(&config, &mut prompter, &mut editor, &mut index)
            .resolve_content(&path)
            .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_deletion_answers() {
        let config = ResolveConfig::default();
        let mut editor = FixingEditor { fixed: "", launches: Vec::new() };
        let path = Path::new("gone.txt");

        let mut prompter = Scripted::answering(&[Some('y')]);
        let mut index = RecordingIndex::default();
        let state = Resolver::new(&config, &mut prompter, &mut editor, &mut index)
            .resolve_deletion(path, ConflictCategory::DeletedByUs)
            .unwrap();
        assert_eq!(state, ConflictState::Resolved);
        assert_eq!(index.removed, vec![PathBuf::from("gone.txt")]);

        let mut prompter = Scripted::answering(&[Some('n')]);
        let mut index = RecordingIndex::default();
        let state = Resolver::new(&config, &mut prompter, &mut editor, &mut index)
            .resolve_deletion(path, ConflictCategory::DeletedByThem)
            .unwrap();
        assert_eq!(state, ConflictState::Unresolved);
        assert!(index.removed.is_empty());
    }

    #[test]
    fn test_added_conflicts_are_reported() {
        let config = ResolveConfig::default();
        let mut prompter = Scripted::default();
        let mut editor = FixingEditor { fixed: "", launches: Vec::new() };
        let mut index = RecordingIndex::default();
        let entries = vec![
            Ok(entry("AA", Path::new("both.txt"))),
            Ok(entry("UA", Path::new("theirs.txt"))),
        ];
        let report = Resolver::new(&config, &mut prompter, &mut editor, &mut index)
            .run(entries)
            .unwrap();

        assert_eq!(report.state, ConflictState::Unresolved);
        assert_eq!(report.files.len(), 2);
        assert!(prompter.notices[0].contains("not yet supported"));
        assert_eq!(prompter.notices[1], "theirs.txt: added by them");
    }

    #[test]
    fn test_all_files_mode_scans_clean_entries() {
        let dir = tempfile::tempdir().unwrap();
        let stray = dir.path().join("stray.txt");
        std::fs::write(&stray, ">>>>>>> leftover\n").unwrap();

        let mut prompter = Scripted::answering(&[Some('s')]);
        let mut editor = FixingEditor { fixed: "", launches: Vec::new() };
        let mut index = RecordingIndex::default();
        let entries = || vec![Ok(entry("M ", &stray))];

        let config = ResolveConfig::default();
        let report = Resolver::new(&config, &mut prompter, &mut editor, &mut index)
            .run(entries())
            .unwrap();
        assert!(report.files.is_empty());

        let config = ResolveConfig {
            all_files: true,
            ..ResolveConfig::default()
        };
        let report = Resolver::new(&config, &mut prompter, &mut editor, &mut index)
            .run(entries())
            .unwrap();
        assert_eq!(report.state, ConflictState::Unresolved);
        assert_eq!(report.files[0].category, ConflictCategory::NoConflict);
    }

    #[test]
    fn test_run_stops_at_status_error() {
        let config = ResolveConfig::default();
        let mut prompter = Scripted::default();
        let mut editor = FixingEditor { fixed: "", launches: Vec::new() };
        let mut index = RecordingIndex::default();
        let entries = vec![
            Err(StatusError::Malformed { token: "XX".into() }),
            Ok(entry("AU", Path::new("later.txt"))),
        ];
        let err = Resolver::new(&config, &mut prompter, &mut editor, &mut index)
            .run(entries)
            .unwrap_err();
        assert!(matches!(err, CoreError::Status(_)));
        assert!(prompter.notices.is_empty());
    }

    #[test]
    fn test_session_report_record() {
        let mut report = SessionReport::default();
        report.record(FileOutcome {
            path: "a".into(),
            category: ConflictCategory::BothModified,
            state: ConflictState::Resolved,
        });
        assert_eq!(report.exit_code(), 0);
        report.record(FileOutcome {
            path: "b".into(),
            category: ConflictCategory::DeletedByBoth,
            state: ConflictState::Unresolved,
        });
        assert_eq!(report.state, ConflictState::Unresolved);
        assert_eq!(report.exit_code(), 1);
    }
}
