use crate::config::HighlightConfig;
use crate::document::scanner::scan;
use crate::document::Document;
use crate::highlight::{select_word, HighlightRenderer, TextSelection};
use crate::pipeline::traits::{Normalizer, TranscriptAligner};
use crate::playback::controller::{PlaybackController, PlaybackState};
use crate::playback::media::MediaElement;
use crate::playback::tracker::{FrameHandle, FrameOutcome, FrameScheduler, PositionTracker};
use crate::types::{AlignmentOutput, NodeRecord, TranscriptWord, WordPosition};

pub struct Highlighter {
    config: HighlightConfig,
    normalizer: Box<dyn Normalizer>,
    aligner: Box<dyn TranscriptAligner>,
}

pub(crate) struct HighlighterParts {
    pub config: HighlightConfig,
    pub normalizer: Box<dyn Normalizer>,
    pub aligner: Box<dyn TranscriptAligner>,
}

impl Highlighter {
    pub(crate) fn from_parts(parts: HighlighterParts) -> Self {
        Self {
            config: parts.config,
            normalizer: parts.normalizer,
            aligner: parts.aligner,
        }
    }

    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &dyn Normalizer {
        self.normalizer.as_ref()
    }

    pub fn scan(&self, doc: &mut Document) -> Vec<NodeRecord> {
        scan(
            doc,
            &self.config.root_element_id,
            self.normalizer.as_ref(),
            &self.config.id_prefix,
        )
    }

    pub fn align(&self, transcript: &[TranscriptWord], nodes: Vec<NodeRecord>) -> AlignmentOutput {
        self.aligner
            .align(transcript, nodes, self.normalizer.as_ref())
    }

    /// Scan and align in one synchronous step, so tracking never starts
    /// against a half-built alignment. Call again whenever the document or
    /// the transcript changes.
    pub fn prepare(&self, doc: &mut Document, transcript: &[TranscriptWord]) -> HighlightSession {
        let nodes = self.scan(doc);
        let output = self.align(transcript, nodes);
        HighlightSession::new(output, &self.config)
    }
}

/// Aligned nodes plus the tracking and rendering state for one document.
pub struct HighlightSession {
    nodes: Vec<NodeRecord>,
    positions: Vec<WordPosition>,
    tracker: PositionTracker,
    renderer: HighlightRenderer,
}

impl HighlightSession {
    pub fn new(output: AlignmentOutput, config: &HighlightConfig) -> Self {
        Self {
            nodes: output.nodes,
            positions: output.positions,
            tracker: PositionTracker::new(config.leeway_secs),
            renderer: HighlightRenderer::new(config.style.clone()),
        }
    }

    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    pub fn positions(&self) -> &[WordPosition] {
        &self.positions
    }

    pub fn active_node_id(&self) -> Option<&str> {
        self.tracker.active()
    }

    pub fn is_tracking(&self) -> bool {
        self.tracker.is_running()
    }

    pub fn start(&mut self, scheduler: &mut dyn FrameScheduler) {
        self.tracker.start(scheduler);
    }

    pub fn pause(&mut self, scheduler: &mut dyn FrameScheduler) {
        self.tracker.stop(scheduler);
    }

    /// Start or stop polling to match the controller's `playing` flag.
    pub fn follow(&mut self, state: &PlaybackState, scheduler: &mut dyn FrameScheduler) {
        if state.playing {
            self.tracker.start(scheduler);
        } else {
            self.tracker.stop(scheduler);
        }
    }

    pub fn on_frame<M: MediaElement>(
        &mut self,
        doc: &mut Document,
        scheduler: &mut dyn FrameScheduler,
        handle: FrameHandle,
        controller: &PlaybackController<M>,
    ) -> FrameOutcome {
        let outcome = self.tracker.on_frame(
            handle,
            &self.nodes,
            controller.current_time(),
            controller.state().playing,
            scheduler,
        );
        if let FrameOutcome::Changed(active) = &outcome {
            self.renderer.apply(doc, active.as_deref());
        }
        outcome
    }

    /// Word being spoken at `time`, using the same leeway as node tracking.
    pub fn active_word(&self, time: f64) -> Option<&WordPosition> {
        let leeway = self.tracker.leeway();
        self.positions
            .iter()
            .find(|p| time >= p.start - leeway && time <= p.end)
    }

    pub fn select_word(&self, doc: &Document, position: &WordPosition) -> Option<TextSelection> {
        select_word(doc, &self.nodes, position)
    }

    /// Cancel any pending frame and remove the highlight.
    pub fn teardown(&mut self, doc: &mut Document, scheduler: &mut dyn FrameScheduler) {
        self.tracker.stop(scheduler);
        self.tracker.clear_active();
        self.renderer.clear(doc);
    }
}
