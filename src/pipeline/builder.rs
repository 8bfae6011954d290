use crate::config::HighlightConfig;
use crate::error::HighlightError;
use crate::pipeline::defaults::{HyphenAwareNormalizer, PoolAligner};
use crate::pipeline::runtime::{Highlighter, HighlighterParts};
use crate::pipeline::traits::{Normalizer, TranscriptAligner};

pub struct HighlighterBuilder {
    config: HighlightConfig,
    normalizer: Option<Box<dyn Normalizer>>,
    aligner: Option<Box<dyn TranscriptAligner>>,
}

impl HighlighterBuilder {
    pub fn new(config: HighlightConfig) -> Self {
        Self {
            config,
            normalizer: None,
            aligner: None,
        }
    }

    pub fn with_normalizer(mut self, normalizer: Box<dyn Normalizer>) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    pub fn with_aligner(mut self, aligner: Box<dyn TranscriptAligner>) -> Self {
        self.aligner = Some(aligner);
        self
    }

    pub fn build(self) -> Result<Highlighter, HighlightError> {
        self.config.validate()?;
        Ok(Highlighter::from_parts(HighlighterParts {
            config: self.config,
            normalizer: self
                .normalizer
                .unwrap_or_else(|| Box::new(HyphenAwareNormalizer)),
            aligner: self.aligner.unwrap_or_else(|| Box::new(PoolAligner)),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::markdown::render_markdown;
    use crate::types::{AlignmentOutput, NodeRecord, TranscriptWord, WordToken};

    struct UppercaseNormalizer;

    impl Normalizer for UppercaseNormalizer {
        fn normalize(&self, text: &str) -> Vec<WordToken> {
            text.split_whitespace()
                .map(|w| WordToken {
                    normalized: w.to_uppercase(),
                    original: w.to_string(),
                })
                .collect()
        }
    }

    struct NoopAligner;

    impl TranscriptAligner for NoopAligner {
        fn align(
            &self,
            _transcript: &[TranscriptWord],
            nodes: Vec<NodeRecord>,
            _normalizer: &dyn Normalizer,
        ) -> AlignmentOutput {
            AlignmentOutput {
                nodes,
                positions: Vec::new(),
            }
        }
    }

    #[test]
    fn build_with_defaults() {
        let highlighter = HighlighterBuilder::new(HighlightConfig::default())
            .build()
            .expect("default config is valid");
        assert_eq!(
            highlighter.config().leeway_secs,
            HighlightConfig::DEFAULT_LEEWAY_SECS
        );
    }

    #[test]
    fn build_rejects_invalid_config() {
        let config = HighlightConfig {
            leeway_secs: f64::NAN,
            ..HighlightConfig::default()
        };
        assert!(HighlighterBuilder::new(config).build().is_err());
    }

    #[test]
    fn custom_parts_are_used() {
        let config = HighlightConfig::default();
        let mut doc = render_markdown("hello world", &config.root_element_id, &config.layout);
        let highlighter = HighlighterBuilder::new(config)
            .with_normalizer(Box::new(UppercaseNormalizer))
            .with_aligner(Box::new(NoopAligner))
            .build()
            .expect("build should succeed");
        let session =
            highlighter.prepare(&mut doc, &[TranscriptWord::new("hello", 0.0, 0.5)]);
        assert_eq!(session.nodes().len(), 1);
        assert_eq!(session.nodes()[0].ranges[0].normalized, "HELLO");
        assert!(session.positions().is_empty());
    }
}
