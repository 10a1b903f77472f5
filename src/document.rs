//! The reference document a session chats about

use indexmap::IndexSet;
use lazy_regex::regex_captures;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::FileAccessError;

/// Section name used when a document has no level-2 headings
pub const WHOLE_DOCUMENT: &str = "Main Content";

/// Full text of the loaded paper. Read once, never mutated.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    content: String,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Read a UTF-8 markdown document from disk
    pub fn load(path: &Path) -> Result<Self, FileAccessError> {
        let content = fs::read_to_string(path).map_err(|e| FileAccessError::new(path, e))?;
        log::info!("Loaded document {} ({} bytes)", path.display(), content.len());
        Ok(Self::new(path, content))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// File stem, used as the notes title
    pub fn title(&self) -> String {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("paper")
            .to_string()
    }

    /// Level-2 headings in document order, without duplicates
    pub fn outline(&self) -> Vec<String> {
        let mut sections = IndexSet::new();
        for line in self.content.lines() {
            if let Some((_, rest)) = regex_captures!(r"^##([^#].*)?$", line) {
                let name = rest.replace('#', "").trim().to_string();
                if !name.is_empty() {
                    sections.insert(name);
                }
            }
        }

        if sections.is_empty() {
            vec![WHOLE_DOCUMENT.to_string()]
        } else {
            sections.into_iter().collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_reads_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("attention.md");
        fs::write(&path, "# Attention\n\nBody").unwrap();

        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.content(), "# Attention\n\nBody");
        assert_eq!(doc.title(), "attention");
        assert_eq!(doc.path(), path.as_path());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.md");

        let err = Document::load(&path).unwrap_err();
        assert_eq!(err.path, path);
        assert_eq!(err.source.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn test_load_rejects_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("binary.md");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let err = Document::load(&path).unwrap_err();
        assert_eq!(err.source.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_outline_takes_level_two_headings() {
        let doc = Document::new(
            "p.md",
            "# Title\n## Introduction\ntext\n### Detail\n## Method ##\n##Results\n## Introduction\n",
        );
        assert_eq!(doc.outline(), vec!["Introduction", "Method", "Results"]);
    }

    #[test]
    fn test_outline_handles_crlf() {
        let doc = Document::new("p.md", "## Abstract\r\nbody\r\n## Conclusion\r\n");
        assert_eq!(doc.outline(), vec!["Abstract", "Conclusion"]);
    }

    #[test]
    fn test_outline_without_headings() {
        let doc = Document::new("p.md", "just text\n# Only a title\n### deep\n##\n");
        assert_eq!(doc.outline(), vec![WHOLE_DOCUMENT]);
    }
}
