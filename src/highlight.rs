use serde::Serialize;

use crate::config::HighlightStyle;
use crate::document::{Document, NodeId};
use crate::types::{NodeRecord, TextRange, WordPosition};

/// Applies the highlight style to the active element and resets every
/// element it styled before.
#[derive(Debug, Clone)]
pub struct HighlightRenderer {
    style: HighlightStyle,
    styled: Vec<NodeId>,
    active: Option<String>,
}

impl HighlightRenderer {
    pub fn new(style: HighlightStyle) -> Self {
        Self {
            style,
            styled: Vec::new(),
            active: None,
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Idempotent: the same `active` id twice leaves the document unchanged.
    pub fn apply(&mut self, doc: &mut Document, active: Option<&str>) {
        let target = active.and_then(|id| {
            let element = doc.element_by_id(id);
            if element.is_none() {
                tracing::debug!(node_id = id, "highlight: element not found");
            }
            element
        });

        for element in std::mem::take(&mut self.styled) {
            if Some(element) != target {
                for name in HighlightStyle::PROPERTY_NAMES {
                    doc.remove_style_property(element, name);
                }
            }
        }

        match target {
            Some(element) => {
                for (name, value) in self.style.properties() {
                    doc.set_style_property(element, name, value);
                }
                self.styled.push(element);
                self.active = active.map(str::to_string);
            }
            None => self.active = None,
        }
    }

    pub fn clear(&mut self, doc: &mut Document) {
        self.apply(doc, None);
    }
}

/// A character-level span inside one text node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextSelection {
    pub text_node: NodeId,
    pub start_offset: usize,
    pub end_offset: usize,
    pub text: String,
}

pub fn selection_for_range(doc: &Document, range: &TextRange) -> Option<TextSelection> {
    let text = doc.text(range.text_node)?;
    let slice = text.get(range.start_offset..range.end_offset)?;
    Some(TextSelection {
        text_node: range.text_node,
        start_offset: range.start_offset,
        end_offset: range.end_offset,
        text: slice.to_string(),
    })
}

/// Selection covering exactly one aligned word, using the ranges captured
/// when its node was scanned.
pub fn select_word(
    doc: &Document,
    nodes: &[NodeRecord],
    position: &WordPosition,
) -> Option<TextSelection> {
    let node = nodes.iter().find(|n| n.id == position.text_node_id)?;
    let range = node
        .ranges
        .iter()
        .find(|r| {
            r.original == position.word
                && r.start == Some(position.start)
                && r.end == Some(position.end)
        })
        .or_else(|| node.ranges.iter().find(|r| r.original == position.word))?;
    selection_for_range(doc, &range.range)
}
