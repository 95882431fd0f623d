//! Conflict classification by status code.
//!
//! Maps the two-character code of an unmerged path to a
//! [`ConflictCategory`], and a category to the [`Action`] the resolver takes.

use std::fmt;

use serde::Serialize;

/// Kind of conflict reported for a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictCategory {
    AddedByBoth,
    AddedByUs,
    AddedByThem,
    DeletedByBoth,
    DeletedByUs,
    DeletedByThem,
    BothModified,
    NoConflict,
}

impl ConflictCategory {
    /// Classify a status code given as index and work tree columns.
    pub fn from_code(index: char, worktree: char) -> Self {
        match (index, worktree) {
            ('A', 'A') => Self::AddedByBoth,
            ('A', 'U') => Self::AddedByUs,
            ('U', 'A') => Self::AddedByThem,
            ('D', 'D') => Self::DeletedByBoth,
            ('D', 'U') => Self::DeletedByUs,
            ('U', 'D') => Self::DeletedByThem,
            ('U', 'U') => Self::BothModified,
            _ => Self::NoConflict,
        }
    }

    /// Human-readable description, as git prints it.
    pub fn describe(self) -> &'static str {
        match self {
            Self::AddedByBoth => "both added",
            Self::AddedByUs => "added by us",
            Self::AddedByThem => "added by them",
            Self::DeletedByBoth => "both deleted",
            Self::DeletedByUs => "deleted by us",
            Self::DeletedByThem => "deleted by them",
            Self::BothModified => "both modified",
            Self::NoConflict => "no conflict",
        }
    }
}

impl fmt::Display for ConflictCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// What the resolver does with an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Report the conflict and count it as unresolved.
    ReportUnresolved,
    /// Offer to delete the file.
    ResolveDeletion,
    /// Run the interactive marker loop.
    ResolveContent,
    /// Nothing to do.
    Ignore,
}

/// Choose the action for an entry.
///
/// `is_regular_file` is only consulted in all-files mode, where any regular
/// file without a conflict code is still scanned for stray markers.
pub fn action_for(category: ConflictCategory, all_files: bool, is_regular_file: bool) -> Action {
    match category {
        ConflictCategory::AddedByBoth
        | ConflictCategory::AddedByUs
        | ConflictCategory::AddedByThem => Action::ReportUnresolved,
        ConflictCategory::DeletedByBoth
        | ConflictCategory::DeletedByUs
        | ConflictCategory::DeletedByThem => Action::ResolveDeletion,
        ConflictCategory::BothModified => Action::ResolveContent,
        ConflictCategory::NoConflict if all_files && is_regular_file => Action::ResolveContent,
        ConflictCategory::NoConflict => Action::Ignore,
    }
}
