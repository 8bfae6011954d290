use crate::document::{Document, NodeId};
use crate::pipeline::traits::Normalizer;
use crate::types::{NodeRecord, RangeRecord, TextRange};

/// Collect every element at or under `root_element_id` that directly owns text.
///
/// Each recorded element gets `id = "{id_prefix}{seq}"` written onto the
/// document, in traversal order. The container is part of the traversal and
/// is recorded like any other element when it owns text directly; its
/// original id is kept as an alias so it stays resolvable. A missing
/// container yields no records.
pub fn scan(
    doc: &mut Document,
    root_element_id: &str,
    normalizer: &dyn Normalizer,
    id_prefix: &str,
) -> Vec<NodeRecord> {
    let Some(root) = doc.element_by_id(root_element_id) else {
        tracing::warn!(
            root_element_id,
            "scan: text container not found, nothing will be highlighted"
        );
        return Vec::new();
    };

    let order: Vec<NodeId> = doc.descendants(root).collect();
    let mut records = Vec::new();

    for element in order {
        if doc.element(element).is_none() {
            continue;
        }
        let text_children: Vec<NodeId> = doc
            .children(element)
            .iter()
            .copied()
            .filter(|&c| doc.text(c).is_some_and(|t| !t.trim().is_empty()))
            .collect();
        if text_children.is_empty() {
            continue;
        }

        let mut pieces = Vec::with_capacity(text_children.len());
        let mut ranges = Vec::new();
        for child in text_children {
            let text = doc.text(child).unwrap_or_default();
            pieces.push(text.trim().to_string());
            ranges.extend(word_ranges(child, text, normalizer));
        }

        let id = format!("{id_prefix}{}", records.len());
        doc.set_attribute(element, "id", &id);
        if element == root {
            doc.alias_id(root_element_id, root);
        }
        records.push(NodeRecord {
            id,
            element,
            text: pieces.join(" "),
            bounding_box: doc.rect(element).unwrap_or_default(),
            start: None,
            end: None,
            ranges,
        });
    }

    tracing::debug!(
        root_element_id,
        node_count = records.len(),
        "scan: recorded text nodes"
    );
    records
}

/// One range per normalized word, located by searching each word's original
/// text forward from a cursor that only moves ahead.
fn word_ranges(text_node: NodeId, text: &str, normalizer: &dyn Normalizer) -> Vec<RangeRecord> {
    let mut cursor = 0usize;
    let mut out = Vec::new();
    for token in normalizer.normalize(text) {
        let start = text[cursor..]
            .find(token.original.as_str())
            .map(|pos| cursor + pos)
            .unwrap_or(cursor);
        let end = floor_char_boundary(text, start + token.original.len());
        out.push(RangeRecord {
            range: TextRange {
                text_node,
                start_offset: start,
                end_offset: end,
            },
            original: token.original,
            normalized: token.normalized,
            start: None,
            end: None,
        });
        cursor = end;
    }
    out
}

fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::defaults::HyphenAwareNormalizer;

    fn container(text_nodes: &[&str]) -> (Document, NodeId) {
        let mut doc = Document::new("body");
        let div = doc.append_element(doc.root(), "div");
        doc.set_attribute(div, "id", "content");
        let p = doc.append_element(div, "p");
        for t in text_nodes {
            doc.append_text(p, t);
        }
        (doc, p)
    }

    fn range_text<'a>(doc: &'a Document, r: &RangeRecord) -> &'a str {
        let text = doc.text(r.range.text_node).expect("text node");
        &text[r.range.start_offset..r.range.end_offset]
    }

    #[test]
    fn missing_container_yields_nothing() {
        let (mut doc, _) = container(&["hello"]);
        let nodes = scan(&mut doc, "absent", &HyphenAwareNormalizer, "text-node-");
        assert!(nodes.is_empty());
    }

    #[test]
    fn records_element_and_writes_id() {
        let (mut doc, p) = container(&["hello world"]);
        let nodes = scan(&mut doc, "content", &HyphenAwareNormalizer, "text-node-");
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].id, "text-node-0");
        assert_eq!(nodes[0].element, p);
        assert_eq!(nodes[0].text, "hello world");
        assert_eq!(doc.element_by_id("text-node-0"), Some(p));
        assert_eq!(doc.element_by_id("content").map(|c| doc.tag(c)), Some(Some("div")));
    }

    #[test]
    fn wrapper_without_direct_text_is_skipped() {
        let mut doc = Document::new("body");
        let div = doc.append_element(doc.root(), "div");
        doc.set_attribute(div, "id", "content");
        let ul = doc.append_element(div, "ul");
        doc.append_text(ul, "\n  ");
        let li1 = doc.append_element(ul, "li");
        doc.append_text(li1, "one");
        let li2 = doc.append_element(ul, "li");
        doc.append_text(li2, "two");

        let nodes = scan(&mut doc, "content", &HyphenAwareNormalizer, "text-node-");
        let ids: Vec<NodeId> = nodes.iter().map(|n| n.element).collect();
        assert_eq!(ids, [li1, li2]);
        assert_eq!(nodes[1].id, "text-node-1");
        assert_eq!(doc.attribute(ul, "id"), None);
    }

    #[test]
    fn nested_inline_elements_are_recorded_separately() {
        let mut doc = Document::new("body");
        let div = doc.append_element(doc.root(), "div");
        doc.set_attribute(div, "id", "content");
        let p = doc.append_element(div, "p");
        doc.append_text(p, "Hello ");
        let strong = doc.append_element(p, "strong");
        doc.append_text(strong, "big");
        doc.append_text(p, " world");

        let nodes = scan(&mut doc, "content", &HyphenAwareNormalizer, "text-node-");
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].text, "Hello world");
        assert_eq!(nodes[0].ranges.len(), 2);
        assert_eq!(nodes[1].element, strong);
        assert_eq!(nodes[1].text, "big");
    }

    #[test]
    fn container_with_direct_text_is_recorded() {
        let mut doc = Document::new("body");
        let div = doc.append_element(doc.root(), "div");
        doc.set_attribute(div, "id", "content");
        doc.append_text(div, "hello world");

        let nodes = scan(&mut doc, "content", &HyphenAwareNormalizer, "text-node-");
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].element, div);
        assert_eq!(nodes[0].text, "hello world");
        assert_eq!(nodes[0].ranges.len(), 2);
        assert_eq!(doc.element_by_id("text-node-0"), Some(div));
        assert_eq!(doc.element_by_id("content"), Some(div));
    }

    #[test]
    fn container_text_beside_blocks_is_recorded_first() {
        let mut doc = Document::new("body");
        let div = doc.append_element(doc.root(), "div");
        doc.set_attribute(div, "id", "content");
        doc.append_text(div, "intro words");
        let p = doc.append_element(div, "p");
        doc.append_text(p, "para");

        let nodes = scan(&mut doc, "content", &HyphenAwareNormalizer, "text-node-");
        let texts: Vec<&str> = nodes.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, ["intro words", "para"]);
        assert_eq!(nodes[0].element, div);
        assert_eq!(nodes[1].id, "text-node-1");

        // Rescanning resolves the container through its kept id.
        let again = scan(&mut doc, "content", &HyphenAwareNormalizer, "text-node-");
        assert_eq!(again.len(), 2);
    }

    #[test]
    fn ranges_cover_each_word() {
        let (mut doc, _) = container(&["Hello, brave  new well-known world."]);
        let nodes = scan(&mut doc, "content", &HyphenAwareNormalizer, "text-node-");
        let words: Vec<&str> = nodes[0].ranges.iter().map(|r| range_text(&doc, r)).collect();
        assert_eq!(
            words,
            ["Hello,", "brave", "new", "well", "-known", "world."]
        );
    }

    #[test]
    fn single_space_offsets_advance_by_length_plus_one() {
        let (mut doc, _) = container(&["go on now"]);
        let nodes = scan(&mut doc, "content", &HyphenAwareNormalizer, "text-node-");
        let offsets: Vec<(usize, usize)> = nodes[0]
            .ranges
            .iter()
            .map(|r| (r.range.start_offset, r.range.end_offset))
            .collect();
        assert_eq!(offsets, [(0, 2), (3, 5), (6, 9)]);
    }

    #[test]
    fn bounding_box_is_captured() {
        let (mut doc, p) = container(&["hello"]);
        let rect = crate::types::BoundingBox {
            top: 10.0,
            right: 200.0,
            bottom: 30.0,
            left: 0.0,
        };
        doc.set_rect(p, rect);
        let nodes = scan(&mut doc, "content", &HyphenAwareNormalizer, "text-node-");
        assert_eq!(nodes[0].bounding_box, rect);
    }
}
