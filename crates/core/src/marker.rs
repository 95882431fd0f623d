//! Conflict marker detection.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use tracing::debug;

use crate::errors::ScanError;

/// Glyphs that open a conflict marker line.
pub const MARKER_GLYPHS: [u8; 4] = *b"<|=>";

/// Length of the glyph run that makes a marker.
pub const MARKER_LEN: usize = 7;

/// Whether `line` starts with a run of seven identical marker glyphs.
pub fn is_marker_line(line: &str) -> bool {
    let bytes = line.as_bytes();
    bytes.len() >= MARKER_LEN
        && MARKER_GLYPHS
            .iter()
            .any(|glyph| bytes[..MARKER_LEN].iter().all(|b| b == glyph))
}

/// Return the 1-indexed line number of the first conflict marker in `path`.
///
/// Returns `Ok(None)` when there is no marker or when the file is not valid
/// text. Failing to open or read the file is an error.
pub fn find_conflict_marker(path: &Path) -> Result<Option<usize>, ScanError> {
    let file = File::open(path).map_err(|source| ScanError::Io {
        path: path.to_path_buf(),
        line: 0,
        source,
    })?;

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line_number = index + 1;
        let line = match line {
            Ok(line) => line,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                debug!(path = %path.display(), line_number, "not a text file, skipping scan");
                return Ok(None);
            }
            Err(source) => {
                return Err(ScanError::Io {
                    path: path.to_path_buf(),
                    line: line_number,
                    source,
                })
            }
        };

        if is_marker_line(&line) {
            debug!(path = %path.display(), line_number, "conflict marker found");
            return Ok(Some(line_number));
        }
    }

    Ok(None)
}
