use std::path::Path;

use serde::Deserialize;

use crate::error::HighlightError;
use crate::types::TranscriptWord;

/// Accepts either a bare word array or a transcription response that wraps
/// the words in a `words` field.
#[derive(Deserialize)]
#[serde(untagged)]
enum TranscriptFile {
    Words(Vec<TranscriptWord>),
    Wrapped { words: Vec<TranscriptWord> },
}

pub fn parse_transcript(json: &str) -> Result<Vec<TranscriptWord>, HighlightError> {
    let file: TranscriptFile =
        serde_json::from_str(json).map_err(|e| HighlightError::json("transcript", e))?;
    let words = match file {
        TranscriptFile::Words(words) => words,
        TranscriptFile::Wrapped { words } => words,
    };
    validate_transcript(&words)?;
    Ok(words)
}

pub fn load_transcript(path: &Path) -> Result<Vec<TranscriptWord>, HighlightError> {
    let data =
        std::fs::read_to_string(path).map_err(|e| HighlightError::io("read transcript", path, e))?;
    parse_transcript(&data)
}

/// Times must be finite, each word must not end before it starts, and
/// words must be ordered by start time.
pub fn validate_transcript(words: &[TranscriptWord]) -> Result<(), HighlightError> {
    let mut prev_start = f64::NEG_INFINITY;
    for (i, w) in words.iter().enumerate() {
        if !w.start.is_finite() || !w.end.is_finite() {
            return Err(HighlightError::transcript(i, &w.word, "has a non-finite time"));
        }
        if w.end < w.start {
            return Err(HighlightError::transcript(
                i,
                &w.word,
                format!("ends at {} before it starts at {}", w.end, w.start),
            ));
        }
        if w.start < prev_start {
            return Err(HighlightError::transcript(
                i,
                &w.word,
                format!("starts at {} before the previous word", w.start),
            ));
        }
        prev_start = w.start;
    }
    Ok(())
}
