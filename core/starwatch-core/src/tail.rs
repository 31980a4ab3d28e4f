//! Last-line retrieval for append-only history files.
//!
//! History files grow by one row per recorded step and reach many megabytes
//! over a simulation's lifetime, while only the final row describes the
//! current state. The reader therefore seeks to the end and walks backward a
//! byte at a time, so the cost per call is proportional to the length of the
//! last line and independent of the file size.

use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{Result, WatchError};

/// Returns the last complete line of `path` without scanning the whole file.
///
/// A terminator sitting on the very last byte is walked past rather than
/// treated as the line boundary, so files with and without a trailing newline
/// yield the same line. An empty file yields an empty string. The file handle
/// is released before returning on every path.
pub fn last_line(path: &Path) -> Result<String> {
    let mut file = open(path)?;
    let size = file
        .metadata()
        .map_err(|source| WatchError::FileUnavailable {
            path: path.to_path_buf(),
            source,
        })?
        .len() as i64;

    if size == 0 {
        return Ok(String::new());
    }

    let mut line = Vec::new();
    let mut byte = [0u8; 1];
    let mut cursor: i64 = 0;
    loop {
        cursor -= 1;
        file.seek(SeekFrom::End(cursor))
            .and_then(|_| file.read_exact(&mut byte))
            .map_err(|source| WatchError::FileUnavailable {
                path: path.to_path_buf(),
                source,
            })?;

        let is_terminator = byte[0] == b'\n' || byte[0] == b'\r';

        // A terminator anywhere but the final byte marks the line start.
        if is_terminator && cursor != -1 {
            break;
        }
        if !is_terminator {
            line.push(byte[0]);
        }
        if cursor == -size {
            break;
        }
    }

    // Bytes were collected back-to-front.
    line.reverse();
    Ok(String::from_utf8_lossy(&line).into_owned())
}

fn open(path: &Path) -> Result<fs_err::File> {
    fs_err::File::open(path).map_err(|source| WatchError::FileUnavailable {
        path: path.to_path_buf(),
        source,
    })
}
