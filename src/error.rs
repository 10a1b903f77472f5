//! Error types for document access and text generation.

use std::path::PathBuf;

/// A file the session depends on could not be read or written.
#[derive(Debug, thiserror::Error)]
#[error("cannot access {}: {source}", path.display())]
pub struct FileAccessError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

impl FileAccessError {
    pub fn new(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

/// Errors from the text generation endpoint.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("endpoint unreachable: {0}")]
    Transport(String),
    #[error("endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("response contained no text")]
    EmptyResponse,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_file_access_error_display() {
        let err = FileAccessError::new("/tmp/paper.md", io::Error::new(io::ErrorKind::NotFound, "not found"));
        assert_eq!(err.to_string(), "cannot access /tmp/paper.md: not found");
    }

    #[test]
    fn test_file_access_error_keeps_source() {
        use std::error::Error;

        let err = FileAccessError::new("x.md", io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert!(err.source().is_some());
        assert_eq!(err.source.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_generation_error_display() {
        let err = GenerationError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "endpoint unreachable: connection refused");

        let err = GenerationError::Status {
            status: 404,
            body: "model not found".to_string(),
        };
        assert_eq!(err.to_string(), "endpoint returned HTTP 404: model not found");

        let err = GenerationError::MalformedResponse("expected value".to_string());
        assert_eq!(err.to_string(), "malformed response: expected value");

        assert_eq!(GenerationError::EmptyResponse.to_string(), "response contained no text");
    }
}
