//! Notes file handling
//!
//! Notes are plain markdown. Prior notes are read from the output path (if it
//! exists) and the reconciled notes overwrite it on save.

use chrono::NaiveDate;
use std::fs;
use std::path::Path;

use crate::error::FileAccessError;

/// Read notes saved by a previous session, or an empty string if there are none
pub fn read_prior(path: &Path) -> Result<String, FileAccessError> {
    if !path.exists() {
        log::debug!("No prior notes at {}", path.display());
        return Ok(String::new());
    }
    let notes = fs::read_to_string(path).map_err(|e| FileAccessError::new(path, e))?;
    log::info!("Loaded prior notes from {} ({} bytes)", path.display(), notes.len());
    Ok(notes)
}

/// Overwrite `path` with `notes`
pub fn write(path: &Path, notes: &str) -> Result<(), FileAccessError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| FileAccessError::new(parent, e))?;
    }
    fs::write(path, notes).map_err(|e| FileAccessError::new(path, e))?;
    log::info!("Wrote notes to {} ({} bytes)", path.display(), notes.len());
    Ok(())
}

/// Obsidian-style frontmatter block. The title is double-quoted so file names
/// with `:` or `#` stay valid YAML.
pub fn frontmatter(title: &str, date: NaiveDate, tags: &[String]) -> String {
    let mut md = String::new();
    md.push_str("---\n");
    md.push_str(&format!("title: {}\n", serde_json::Value::from(title)));
    md.push_str(&format!("date: {}\n", date.format("%Y-%m-%d")));
    md.push_str(&format!("tags: [{}]\n", tags.join(", ")));
    md.push_str("---\n\n");
    md
}

/// Strip a leading frontmatter block so it is not fed back to the model twice.
/// Accepts both `\n` and `\r\n` line endings.
pub fn strip_frontmatter(notes: &str) -> &str {
    let is_fence = |line: &str| line.trim_end_matches(['\r', '\n']) == "---";

    let mut lines = notes.split_inclusive('\n');
    let mut offset = match lines.next() {
        Some(first) if is_fence(first) => first.len(),
        _ => return notes,
    };
    for line in lines {
        offset += line.len();
        if is_fence(line) {
            return notes[offset..].trim_start_matches(['\r', '\n']);
        }
    }
    notes
}
