use crate::alignment::normalize::strip_punctuation;
use crate::pipeline::traits::Normalizer;
use crate::types::{AlignmentOutput, NodeRecord, TranscriptWord, WordPosition, WordToken};

/// Transcript entry still available for matching, with its input index.
struct PoolEntry {
    index: usize,
    key: String,
    start: f64,
    end: f64,
}

/// Bind rendered words to transcript timings by first-match pool removal.
///
/// Nodes are visited in document order. A node's words are its scanned
/// ranges, or the normalized node text when it has none. Each word takes the
/// earliest remaining transcript entry with the same normalized text
/// (case-insensitive). Consumed entries leave the pool, so repeated words
/// bind in chronological order. This is a heuristic: if the rendered order
/// diverges from the spoken order, words may bind to the wrong occurrence.
/// Unmatched words are skipped and never fail the pass.
pub fn align_with_pool(
    transcript: &[TranscriptWord],
    mut nodes: Vec<NodeRecord>,
    normalizer: &dyn Normalizer,
) -> AlignmentOutput {
    let mut pool: Vec<PoolEntry> = transcript
        .iter()
        .enumerate()
        .map(|(index, w)| PoolEntry {
            index,
            key: strip_punctuation(&w.word).trim().to_lowercase(),
            start: w.start,
            end: w.end.max(w.start),
        })
        .collect();

    let mut positions = Vec::new();
    let mut unmatched = 0usize;

    for node in &mut nodes {
        // Range i receives the timing of word i, so scanned ranges are the word list.
        let tokens: Vec<WordToken> = if node.ranges.is_empty() {
            normalizer.normalize(&node.text)
        } else {
            node.ranges
                .iter()
                .map(|r| WordToken {
                    normalized: r.normalized.clone(),
                    original: r.original.clone(),
                })
                .collect()
        };

        for (word_idx, token) in tokens.iter().enumerate() {
            let key = token.normalized.to_lowercase();
            let Some(hit) = pool.iter().position(|entry| entry.key == key) else {
                unmatched += 1;
                continue;
            };
            let entry = pool.remove(hit);

            if node.start.is_none() {
                node.start = Some(entry.start);
            }
            node.end = Some(entry.end);
            if let Some(range) = node.ranges.get_mut(word_idx) {
                range.start = Some(entry.start);
                range.end = Some(entry.end);
            }

            positions.push(WordPosition {
                word: token.original.clone(),
                start: entry.start,
                end: entry.end,
                spans: token.original.chars().count(),
                text_node_id: node.id.clone(),
                transcript_index: entry.index,
            });
        }

        // A node whose words arrive out of order can end before it starts.
        if let (Some(start), Some(end)) = (node.start, node.end) {
            if end < start {
                node.end = Some(start);
            }
        }
    }

    tracing::debug!(
        node_count = nodes.len(),
        matched = positions.len(),
        unmatched,
        unused_transcript_words = pool.len(),
        "alignment: pool pass complete"
    );

    AlignmentOutput { nodes, positions }
}
