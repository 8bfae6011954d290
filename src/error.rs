use std::path::PathBuf;

use thiserror::Error;

/// Failures of the loading edges: transcript and config files. Scanning,
/// alignment, tracking and highlighting never fail; they degrade to no
/// highlight.
#[derive(Debug, Error)]
pub enum HighlightError {
    #[error("failed to {action} '{}': {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed {document} JSON: {source}")]
    Json {
        document: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("transcript word {index} ({word:?}) {reason}")]
    InvalidTranscript {
        index: usize,
        word: String,
        reason: String,
    },
    #[error("invalid highlight config: {0}")]
    InvalidConfig(String),
}

impl HighlightError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(document: &'static str, source: serde_json::Error) -> Self {
        Self::Json { document, source }
    }

    pub(crate) fn transcript(index: usize, word: &str, reason: impl Into<String>) -> Self {
        Self::InvalidTranscript {
            index,
            word: word.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_error_names_the_word() {
        let err = HighlightError::transcript(3, "late", "ends at 0.5 before it starts at 1");
        assert_eq!(
            err.to_string(),
            r#"transcript word 3 ("late") ends at 0.5 before it starts at 1"#
        );
    }

    #[test]
    fn io_error_keeps_path_and_source() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = HighlightError::io("read transcript", "/tmp/words.json", source);
        assert!(std::error::Error::source(&err).is_some());
        assert!(err
            .to_string()
            .starts_with("failed to read transcript '/tmp/words.json'"));
    }
}
