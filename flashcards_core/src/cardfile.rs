//! Plain-text card file format.
//!
//! One card per line, written as `<term>: <definition>`. Lines are split on
//! the first `": "`, so a definition may itself contain the separator but a
//! term may not.

use crate::{Error, Result};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Separator between term and definition
pub const SEPARATOR: &str = ": ";

/// Render one card as a line (without the trailing newline)
pub fn format_line(term: &str, definition: &str) -> String {
    format!("{}{}{}", term, SEPARATOR, definition)
}

/// Split a line on the first separator
pub fn parse_line(line: &str) -> Option<(&str, &str)> {
    line.split_once(SEPARATOR)
}

/// Read all cards from `path`
///
/// Blank and malformed lines are skipped. When a term appears more than
/// once the last definition wins, at the position of its first occurrence.
pub fn read_cards(path: &Path) -> Result<Vec<(String, String)>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::FileNotFound(path.to_path_buf()),
        _ => Error::Io(e),
    })?;

    let reader = BufReader::new(file);
    let mut cards: Vec<(String, String)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some((term, definition)) = parse_line(line) else {
            tracing::warn!(
                "Skipping line {} of {:?}: missing \"{}\" separator",
                line_num + 1,
                path,
                SEPARATOR
            );
            continue;
        };

        match positions.get(term) {
            Some(&idx) => cards[idx].1 = definition.to_string(),
            None => {
                positions.insert(term.to_string(), cards.len());
                cards.push((term.to_string(), definition.to_string()));
            }
        }
    }

    tracing::debug!("Read {} cards from {:?}", cards.len(), path);
    Ok(cards)
}

/// Write cards to `path`, replacing its contents
///
/// Atomically writes by:
/// 1. Writing to a temp file next to the destination
/// 2. Syncing to disk
/// 3. Renaming over the original
///
/// A symlinked destination is written through to its target, and an
/// existing file keeps its permissions.
pub fn write_cards(path: &Path, cards: &[(&str, &str)]) -> Result<()> {
    let target = match fs::canonicalize(path) {
        Ok(resolved) => resolved,
        Err(e) if e.kind() == io::ErrorKind::NotFound => path.to_path_buf(),
        Err(e) => return Err(Error::Io(e)),
    };

    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let temp = NamedTempFile::new_in(dir)?;

    {
        let mut writer = io::BufWriter::new(temp.as_file());
        for (term, definition) in cards {
            writer.write_all(format_line(term, definition).as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
    }

    if let Ok(existing) = fs::metadata(&target) {
        temp.as_file().set_permissions(existing.permissions())?;
    }

    temp.as_file().sync_all()?;
    temp.persist(&target).map_err(|e| Error::Io(e.error))?;

    tracing::debug!("Wrote {} cards to {:?}", cards.len(), target);
    Ok(())
}
