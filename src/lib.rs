pub mod alignment;
pub mod config;
pub mod document;
pub mod error;
pub mod highlight;
pub mod pipeline;
pub mod playback;
pub mod types;

pub use alignment::normalize::normalize;
pub use alignment::report::{compute_report, Meta, Report};
pub use alignment::transcript::{load_transcript, parse_transcript, validate_transcript};
pub use config::{HighlightConfig, HighlightStyle, LayoutMetrics};
pub use document::markdown::render_markdown;
pub use document::{Document, NodeId};
pub use error::HighlightError;
pub use highlight::{HighlightRenderer, TextSelection};
pub use pipeline::builder::HighlighterBuilder;
pub use pipeline::runtime::{HighlightSession, Highlighter};
pub use pipeline::traits::{Normalizer, TranscriptAligner};
pub use playback::controller::{PlaybackController, PlaybackPhase, PlaybackState};
pub use playback::media::{ClockMedia, MediaElement, MediaError, MediaEvent};
pub use playback::speech::{SpeechEvent, SpeechTracker, SynthesisError};
pub use playback::timeline::{simulate_playback, TimelineSample, MAX_TIMELINE_SAMPLES};
pub use playback::tracker::{
    active_node_at, FrameHandle, FrameOutcome, FrameScheduler, ManualScheduler, PositionTracker,
};
pub use types::{
    AlignmentOutput, BoundingBox, NodeRecord, RangeRecord, TextRange, TranscriptWord, WordPosition,
    WordToken,
};
