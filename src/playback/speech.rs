//! Highlight tracking when audio comes straight from a speech synthesizer.
//!
//! Synthesizers report progress as boundary events carrying a character
//! index into the utterance, not as media time, so the active node is found
//! by character span instead of by transcript timing.

use thiserror::Error;

use crate::types::NodeRecord;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    #[error("speech interrupted")]
    Interrupted,
    #[error("speech canceled")]
    Canceled,
    #[error("audio output busy")]
    AudioBusy,
    #[error("audio hardware unavailable")]
    AudioHardware,
    #[error("synthesis failed")]
    SynthesisFailed,
    #[error("language unavailable")]
    LanguageUnavailable,
    #[error("voice unavailable")]
    VoiceUnavailable,
    #[error("invalid argument")]
    InvalidArgument,
    #[error("synthesis not allowed")]
    NotAllowed,
    #[error("speech synthesis error: {0}")]
    Other(String),
}

impl SynthesisError {
    /// Map a synthesizer error code (`"interrupted"`, `"audio-busy"`, ...).
    pub fn from_code(code: &str) -> Self {
        match code {
            "interrupted" => Self::Interrupted,
            "canceled" => Self::Canceled,
            "audio-busy" => Self::AudioBusy,
            "audio-hardware" => Self::AudioHardware,
            "synthesis-failed" => Self::SynthesisFailed,
            "language-unavailable" => Self::LanguageUnavailable,
            "voice-unavailable" => Self::VoiceUnavailable,
            "invalid-argument" => Self::InvalidArgument,
            "not-allowed" => Self::NotAllowed,
            other => Self::Other(other.to_string()),
        }
    }

    /// Interruption and cancellation happen whenever speech is stopped on
    /// purpose and are not failures.
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::Interrupted | Self::Canceled)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpeechEvent {
    Start,
    /// `char_index` counts UTF-16 code units into the utterance, as
    /// synthesizer boundary events report it.
    Boundary { char_index: usize },
    Pause,
    Resume,
    End,
    Error(SynthesisError),
}

/// Span `[start, end)` of one node's text inside the utterance, in UTF-16
/// code units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSpan {
    pub node_id: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone)]
pub struct SpeechTracker {
    utterance: String,
    spans: Vec<NodeSpan>,
    speaking: bool,
    active: Option<String>,
}

impl SpeechTracker {
    /// Build the utterance from node texts joined by single spaces.
    pub fn new(nodes: &[NodeRecord]) -> Self {
        let mut utterance = String::new();
        let mut spans = Vec::new();
        let mut cursor = 0usize;
        for node in nodes.iter().filter(|n| !n.text.trim().is_empty()) {
            if !utterance.is_empty() {
                utterance.push(' ');
                cursor += 1;
            }
            let len = node.text.encode_utf16().count();
            utterance.push_str(&node.text);
            spans.push(NodeSpan {
                node_id: node.id.clone(),
                start: cursor,
                end: cursor + len,
            });
            cursor += len;
        }
        Self {
            utterance,
            spans,
            speaking: false,
            active: None,
        }
    }

    pub fn utterance(&self) -> &str {
        &self.utterance
    }

    pub fn spans(&self) -> &[NodeSpan] {
        &self.spans
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Node owning `char_index`. A separator between nodes belongs to the
    /// node that follows it.
    pub fn node_at(&self, char_index: usize) -> Option<&str> {
        self.spans
            .iter()
            .find(|span| char_index < span.end)
            .map(|span| span.node_id.as_str())
    }

    /// Apply one synthesizer event. Returns true when the active node changed.
    pub fn handle(&mut self, event: SpeechEvent) -> bool {
        let next = match event {
            SpeechEvent::Start | SpeechEvent::Resume => {
                self.speaking = true;
                return false;
            }
            SpeechEvent::Pause => {
                self.speaking = false;
                return false;
            }
            SpeechEvent::Boundary { char_index } => {
                self.speaking = true;
                self.node_at(char_index).map(str::to_string)
            }
            SpeechEvent::End => {
                self.speaking = false;
                None
            }
            SpeechEvent::Error(err) => {
                self.speaking = false;
                if err.is_benign() {
                    tracing::debug!(error = %err, "speech: synthesis stopped");
                } else {
                    tracing::warn!(error = %err, "speech: synthesis error");
                }
                None
            }
        };
        if next == self.active {
            return false;
        }
        self.active = next;
        true
    }
}
