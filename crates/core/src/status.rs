//! Reader for `git status --porcelain -z` output.
//!
//! The report is a sequence of NUL-terminated tokens. Each record is
//! `XY<space><path>`, and rename or copy records are followed by one extra
//! token naming the source path. [`StatusReader`] advances by exactly one or
//! two tokens per record so later records can never be misaligned.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::errors::StatusError;

/// One record of the status report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusEntry {
    /// Path relative to the current working directory.
    pub path: PathBuf,
    /// Index column of the status code.
    pub index_code: char,
    /// Work tree column of the status code.
    pub worktree_code: char,
}

impl StatusEntry {
    /// The two-character status code, e.g. `UU`.
    pub fn raw_code(&self) -> String {
        [self.index_code, self.worktree_code].iter().collect()
    }

    /// Whether the record is followed by a source-path token.
    pub fn carries_source(&self) -> bool {
        [self.index_code, self.worktree_code]
            .iter()
            .any(|c| matches!(c, 'R' | 'C'))
    }
}

// ---------------------------------------------------------------------------
// Path rewriting
// ---------------------------------------------------------------------------

/// Rewrites repository-root-relative paths to be relative to the working
/// directory.
#[derive(Debug, Clone, Default)]
pub struct PathRewriter {
    repo_root: PathBuf,
    cwd: PathBuf,
}

impl PathRewriter {
    /// Both paths should be absolute and canonical.
    pub fn new(repo_root: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
            cwd: cwd.into(),
        }
    }

    /// A rewriter that leaves paths untouched, for reports read from the
    /// repository root.
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn rewrite(&self, repo_relative: &Path) -> PathBuf {
        relative_path(&self.repo_root.join(repo_relative), &self.cwd)
    }
}

/// Express `target` relative to `base`, inserting `..` where needed.
pub fn relative_path(target: &Path, base: &Path) -> PathBuf {
    let target: Vec<Component<'_>> = target.components().collect();
    let base: Vec<Component<'_>> = base.components().collect();
    let common = target
        .iter()
        .zip(base.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for component in &target[common..] {
        relative.push(component.as_os_str());
    }
    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    relative
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Split a raw report into its NUL-separated tokens.
pub fn split_tokens(report: &[u8]) -> Vec<Vec<u8>> {
    report.split(|b| *b == 0).map(<[u8]>::to_vec).collect()
}

/// Stateful reader producing one [`StatusEntry`] per record.
///
/// The token source is consumed as the reader advances; the reader cannot be
/// restarted. After the first error it yields nothing more.
pub struct StatusReader<I> {
    tokens: I,
    paths: PathRewriter,
    failed: bool,
}

impl StatusReader<std::vec::IntoIter<Vec<u8>>> {
    /// Reader over a complete `git status -z` report.
    pub fn from_report(report: &[u8], paths: PathRewriter) -> Self {
        Self::new(split_tokens(report).into_iter(), paths)
    }
}

impl<I> StatusReader<I>
where
    I: Iterator<Item = Vec<u8>>,
{
    pub fn new(tokens: I, paths: PathRewriter) -> Self {
        Self {
            tokens,
            paths,
            failed: false,
        }
    }

    /// Read the next record, consuming its source-path token if it has one.
    ///
    /// Empty tokens between records are skipped.
    pub fn next_entry(&mut self) -> Result<Option<StatusEntry>, StatusError> {
        let Some(token) = self.tokens.by_ref().find(|t| !t.is_empty()) else {
            return Ok(None);
        };

        let entry = self.parse_record(&token)?;
        if entry.carries_source() {
            self.consume_source(&entry)?;
        }
        debug!(code = %entry.raw_code(), path = %entry.path.display(), "status record");
        Ok(Some(entry))
    }

    /// Consume the token that names the original path of a rename or copy.
    fn consume_source(&mut self, entry: &StatusEntry) -> Result<(), StatusError> {
        match self.tokens.next() {
            Some(source) if !source.is_empty() => {
                debug!(
                    source = %String::from_utf8_lossy(&source),
                    "skipping rename source"
                );
                Ok(())
            }
            _ => Err(StatusError::MissingSource {
                path: entry.path.display().to_string(),
            }),
        }
    }

    fn parse_record(&self, token: &[u8]) -> Result<StatusEntry, StatusError> {
        let malformed = || StatusError::Malformed {
            token: String::from_utf8_lossy(token).into_owned(),
        };

        match token {
            [x, y, b' ', path @ ..] if x.is_ascii() && y.is_ascii() && !path.is_empty() => {
                Ok(StatusEntry {
                    path: self.paths.rewrite(&bytes_to_path(path)),
                    index_code: char::from(*x),
                    worktree_code: char::from(*y),
                })
            }
            _ => Err(malformed()),
        }
    }
}

impl<I> Iterator for StatusReader<I>
where
    I: Iterator<Item = Vec<u8>>,
{
    type Item = Result<StatusEntry, StatusError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_entry() {
            Ok(entry) => entry.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(unix)]
fn bytes_to_path(bytes: &[u8]) -> PathBuf {
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(std::ffi::OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn bytes_to_path(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(report: &[u8]) -> Result<Vec<StatusEntry>, StatusError> {
        StatusReader::from_report(report, PathRewriter::identity()).collect()
    }

    #[test]
    fn test_empty_report() {
        assert!(read_all(b"").unwrap().is_empty());
        assert!(read_all(b"\0\0\0").unwrap().is_empty());
    }

    #[test]
    fn test_single_record() {
        let entries = read_all(b"UU a.txt\0").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, PathBuf::from("a.txt"));
        assert_eq!(entries[0].index_code, 'U');
        assert_eq!(entries[0].worktree_code, 'U');
        assert_eq!(entries[0].raw_code(), "UU");
    }

    #[test]
    fn test_rename_consumes_source() {
        let entries = read_all(b"R  new.txt\0old.txt\0UU b.txt\0").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, PathBuf::from("new.txt"));
        assert_eq!(entries[0].raw_code(), "R ");
        assert_eq!(entries[1].path, PathBuf::from("b.txt"));
    }

    #[test]
    fn test_worktree_rename_and_copy() {
        let entries = read_all(b" R moved.txt\0orig.txt\0C  copy.txt\0src.txt\0 M m.txt\0")
            .unwrap();
        let paths: Vec<_> = entries.iter().map(|e| e.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("moved.txt"),
                PathBuf::from("copy.txt"),
                PathBuf::from("m.txt"),
            ]
        );
    }

    #[test]
    fn test_rename_source_looking_like_record_is_skipped() {
        // The source token is consumed positionally, never parsed.
        let entries = read_all(b"R  new.txt\0UU x\0").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, PathBuf::from("new.txt"));
    }

    #[test]
    fn test_paths_with_spaces() {
        let entries = read_all(b"UU dir/with space.txt\0").unwrap();
        assert_eq!(entries[0].path, PathBuf::from("dir/with space.txt"));
    }

    #[test]
    fn test_malformed_third_character() {
        let err = read_all(b"UUa.txt\0").unwrap_err();
        match err {
            StatusError::Malformed { token } => assert_eq!(token, "UUa.txt"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_short_token() {
        assert!(matches!(
            read_all(b"U\0"),
            Err(StatusError::Malformed { .. })
        ));
        assert!(matches!(
            read_all(b"UU \0"),
            Err(StatusError::Malformed { .. })
        ));
    }

    #[test]
    fn test_missing_rename_source() {
        assert!(matches!(
            read_all(b"R  new.txt\0"),
            Err(StatusError::MissingSource { .. })
        ));
    }

    #[test]
    fn test_reader_stops_after_error() {
        let mut reader =
            StatusReader::from_report(b"XX\0UU a.txt\0", PathRewriter::identity());
        assert!(reader.next().unwrap().is_err());
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_rewrite_from_subdirectory() {
        let paths = PathRewriter::new("/repo", "/repo/sub");
        let entries: Vec<_> = StatusReader::from_report(b"UU sub/a.txt\0DD b.txt\0", paths)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(entries[0].path, PathBuf::from("a.txt"));
        assert_eq!(entries[1].path, PathBuf::from("../b.txt"));
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(
            relative_path(Path::new("/repo/a/b.txt"), Path::new("/repo")),
            PathBuf::from("a/b.txt")
        );
        assert_eq!(
            relative_path(Path::new("/repo/a.txt"), Path::new("/repo/x/y")),
            PathBuf::from("../../a.txt")
        );
        assert_eq!(
            relative_path(Path::new("/repo"), Path::new("/repo")),
            PathBuf::from(".")
        );
    }
}
