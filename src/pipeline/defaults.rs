use crate::alignment::normalize::normalize;
use crate::alignment::pool::align_with_pool;
use crate::pipeline::traits::{Normalizer, TranscriptAligner};
use crate::types::{AlignmentOutput, NodeRecord, TranscriptWord, WordToken};

pub struct HyphenAwareNormalizer;

impl Normalizer for HyphenAwareNormalizer {
    fn normalize(&self, text: &str) -> Vec<WordToken> {
        normalize(text)
    }
}

pub struct PoolAligner;

impl TranscriptAligner for PoolAligner {
    fn align(
        &self,
        transcript: &[TranscriptWord],
        nodes: Vec<NodeRecord>,
        normalizer: &dyn Normalizer,
    ) -> AlignmentOutput {
        align_with_pool(transcript, nodes, normalizer)
    }
}
