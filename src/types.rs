use serde::{Deserialize, Serialize};

use crate::document::NodeId;

/// A word after normalization, paired with the literal text it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordToken {
    pub normalized: String,
    pub original: String,
}

/// One spoken word from the transcription service. Times are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptWord {
    pub word: String,
    pub start: f64,
    pub end: f64,
}

impl TranscriptWord {
    pub fn new(word: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            word: word.into(),
            start,
            end,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Byte span inside a single text node. Offsets always fall on char boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextRange {
    pub text_node: NodeId,
    pub start_offset: usize,
    pub end_offset: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeRecord {
    pub range: TextRange,
    pub original: String,
    pub normalized: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
}

/// A scanned element that directly contains text.
///
/// `start`/`end` stay `None` until the aligner matches at least one of the
/// node's words; such nodes never become active.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRecord {
    pub id: String,
    #[serde(skip)]
    pub element: NodeId,
    pub text: String,
    pub bounding_box: BoundingBox,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
    pub ranges: Vec<RangeRecord>,
}

impl NodeRecord {
    pub fn interval(&self) -> Option<(f64, f64)> {
        Some((self.start?, self.end?))
    }

    /// Interval test with the activation window opened `leeway` seconds early.
    pub fn is_active_at(&self, time: f64, leeway: f64) -> bool {
        self.interval()
            .map(|(start, end)| time >= start - leeway && time <= end)
            .unwrap_or(false)
    }
}

/// One matched word: where it is rendered and when it is spoken.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordPosition {
    pub word: String,
    pub start: f64,
    pub end: f64,
    /// Length of `word` in chars.
    pub spans: usize,
    pub text_node_id: String,
    /// Index of the consumed entry in the transcript handed to the aligner.
    pub transcript_index: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignmentOutput {
    pub nodes: Vec<NodeRecord>,
    pub positions: Vec<WordPosition>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(start: Option<f64>, end: Option<f64>) -> NodeRecord {
        NodeRecord {
            id: "text-node-0".to_string(),
            element: NodeId::from_index(1),
            text: "hello world".to_string(),
            bounding_box: BoundingBox::default(),
            start,
            end,
            ranges: Vec::new(),
        }
    }

    #[test]
    fn active_window_opens_early_by_leeway() {
        let n = node(Some(1.0), Some(2.0));
        assert!(!n.is_active_at(0.9, 0.05));
        assert!(n.is_active_at(0.96, 0.05));
        assert!(n.is_active_at(2.0, 0.05));
        assert!(!n.is_active_at(2.01, 0.05));
    }

    #[test]
    fn unaligned_node_is_never_active() {
        assert!(!node(None, None).is_active_at(0.0, 10.0));
        assert!(!node(Some(0.0), None).is_active_at(0.0, 10.0));
    }

    #[test]
    fn transcript_word_deserializes_from_service_json() {
        let word: TranscriptWord =
            serde_json::from_str(r#"{"word":"hello","start":0.0,"end":0.5}"#).expect("valid json");
        assert_eq!(word, TranscriptWord::new("hello", 0.0, 0.5));
    }
}
