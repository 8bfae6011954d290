use crate::types::{AlignmentOutput, NodeRecord, TranscriptWord, WordToken};

pub trait Normalizer: Send + Sync {
    fn normalize(&self, text: &str) -> Vec<WordToken>;
}

pub trait TranscriptAligner: Send + Sync {
    /// Best-effort: must not fail, unmatched words simply get no position.
    fn align(
        &self,
        transcript: &[TranscriptWord],
        nodes: Vec<NodeRecord>,
        normalizer: &dyn Normalizer,
    ) -> AlignmentOutput;
}
