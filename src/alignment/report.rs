use std::collections::HashSet;

use serde::Serialize;

use crate::playback::timeline::TimelineSample;
use crate::types::{AlignmentOutput, BoundingBox, TranscriptWord, WordPosition};

pub const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub schema_version: u32,
    pub meta: Meta,
    pub coverage: CoverageMetrics,
    pub structural: StructuralMetrics,
    pub nodes: Vec<NodeSummary>,
    pub positions: Vec<WordPosition>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub timeline: Vec<TimelineSample>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub generated_at: String,
    pub source: String,
    pub root_element_id: String,
    pub leeway_secs: f64,
    pub transcript_word_count: usize,
    pub node_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoverageMetrics {
    pub dom_word_count: usize,
    pub matched_word_count: usize,
    pub unmatched_words: Vec<String>,
    pub unused_transcript_words: Vec<String>,
    /// matched / rendered words, 0 when nothing was rendered.
    pub coverage_ratio: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct StructuralMetrics {
    pub negative_duration_count: u32,
    pub non_monotonic_count: u32,
    pub unaligned_node_count: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeSummary {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
    pub word_count: usize,
    pub matched_word_count: usize,
    pub bounding_box: BoundingBox,
}

pub fn compute_report(
    meta: Meta,
    transcript: &[TranscriptWord],
    output: &AlignmentOutput,
    timeline: Vec<TimelineSample>,
) -> Report {
    let used: HashSet<usize> = output
        .positions
        .iter()
        .map(|p| p.transcript_index)
        .collect();
    let unused_transcript_words = transcript
        .iter()
        .enumerate()
        .filter(|(i, _)| !used.contains(i))
        .map(|(_, w)| w.word.clone())
        .collect();

    let mut dom_word_count = 0usize;
    let mut unmatched_words = Vec::new();
    let mut nodes = Vec::with_capacity(output.nodes.len());
    for node in &output.nodes {
        dom_word_count += node.ranges.len();
        let mut matched = 0usize;
        for range in &node.ranges {
            if range.start.is_some() {
                matched += 1;
            } else {
                unmatched_words.push(range.original.clone());
            }
        }
        nodes.push(NodeSummary {
            id: node.id.clone(),
            text: node.text.clone(),
            start: node.start,
            end: node.end,
            word_count: node.ranges.len(),
            matched_word_count: matched,
            bounding_box: node.bounding_box,
        });
    }

    let matched_word_count = output.positions.len();
    let coverage_ratio = if dom_word_count == 0 {
        0.0
    } else {
        (matched_word_count as f64 / dom_word_count as f64) as f32
    };

    Report {
        schema_version: REPORT_SCHEMA_VERSION,
        meta,
        coverage: CoverageMetrics {
            dom_word_count,
            matched_word_count,
            unmatched_words,
            unused_transcript_words,
            coverage_ratio,
        },
        structural: structural_metrics(output),
        nodes,
        positions: output.positions.clone(),
        timeline,
    }
}

fn structural_metrics(output: &AlignmentOutput) -> StructuralMetrics {
    let negative_duration_count = output
        .positions
        .iter()
        .filter(|p| p.end < p.start)
        .count() as u32;
    let non_monotonic_count = output
        .positions
        .windows(2)
        .filter(|pair| pair[1].start < pair[0].start)
        .count() as u32;
    let unaligned_node_count = output
        .nodes
        .iter()
        .filter(|n| n.interval().is_none())
        .count() as u32;
    StructuralMetrics {
        negative_duration_count,
        non_monotonic_count,
        unaligned_node_count,
    }
}
