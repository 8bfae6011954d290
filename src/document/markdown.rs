use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};

use crate::config::LayoutMetrics;
use crate::document::{Document, NodeId};
use crate::types::BoundingBox;

const BLOCK_TAGS: [&str; 17] = [
    "div",
    "p",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "ul",
    "ol",
    "li",
    "pre",
    "blockquote",
    "hr",
    "table",
    "tr",
    "td",
];

/// Render Markdown into a document whose content lives under `div#root_id`.
///
/// Raw HTML is dropped. Adjacent text events are merged so each run of
/// inline text is a single text node, which is what the scanner's offsets
/// are computed against.
pub fn render_markdown(markdown: &str, root_id: &str, layout: &LayoutMetrics) -> Document {
    let mut doc = Document::new("body");
    let container = doc.append_element(doc.root(), "div");
    doc.set_attribute(container, "id", root_id);

    let mut stack = vec![container];
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES;
    for event in Parser::new_ext(markdown, options) {
        let parent = stack.last().copied().unwrap_or(container);
        match event {
            Event::Start(tag) => {
                let el = doc.append_element(parent, tag_name(&tag));
                match &tag {
                    Tag::Link { dest_url, .. } => {
                        doc.set_attribute(el, "href", dest_url);
                    }
                    Tag::CodeBlock(CodeBlockKind::Fenced(lang)) if !lang.is_empty() => {
                        doc.set_attribute(el, "class", &format!("language-{lang}"));
                    }
                    Tag::List(Some(first)) if *first != 1 => {
                        doc.set_attribute(el, "start", &first.to_string());
                    }
                    _ => {}
                }
                stack.push(el);
            }
            Event::End(_) => {
                if stack.len() > 1 {
                    stack.pop();
                }
            }
            Event::Text(text) => append_text_merged(&mut doc, parent, &text),
            Event::Code(code) => {
                let el = doc.append_element(parent, "code");
                doc.append_text(el, &code);
            }
            Event::SoftBreak => append_text_merged(&mut doc, parent, " "),
            Event::HardBreak => {
                doc.append_element(parent, "br");
            }
            Event::Rule => {
                doc.append_element(parent, "hr");
            }
            _ => {}
        }
    }

    apply_block_layout(&mut doc, container, layout);
    doc
}

fn tag_name(tag: &Tag<'_>) -> &'static str {
    match tag {
        Tag::Paragraph => "p",
        Tag::Heading { level, .. } => match level {
            HeadingLevel::H1 => "h1",
            HeadingLevel::H2 => "h2",
            HeadingLevel::H3 => "h3",
            HeadingLevel::H4 => "h4",
            HeadingLevel::H5 => "h5",
            HeadingLevel::H6 => "h6",
        },
        Tag::BlockQuote(_) => "blockquote",
        Tag::CodeBlock(_) => "pre",
        Tag::List(Some(_)) => "ol",
        Tag::List(None) => "ul",
        Tag::Item => "li",
        Tag::Emphasis => "em",
        Tag::Strong => "strong",
        Tag::Strikethrough => "del",
        Tag::Link { .. } => "a",
        Tag::Image { .. } => "img",
        Tag::Table(_) => "table",
        Tag::TableHead | Tag::TableRow => "tr",
        Tag::TableCell => "td",
        _ => "span",
    }
}

fn append_text_merged(doc: &mut Document, parent: NodeId, text: &str) {
    if let Some(&last) = doc.children(parent).last() {
        if doc.push_text(last, text) {
            return;
        }
    }
    doc.append_text(parent, text);
}

fn is_block(doc: &Document, id: NodeId) -> bool {
    doc.tag(id).map(|t| BLOCK_TAGS.contains(&t)).unwrap_or(false)
}

/// Chars of inline content directly owned by a block (nested blocks excluded).
fn inline_char_count(doc: &Document, block: NodeId) -> usize {
    doc.children(block)
        .iter()
        .map(|&child| {
            if let Some(text) = doc.text(child) {
                text.chars().count()
            } else if is_block(doc, child) {
                0
            } else {
                doc.text_content(child).chars().count()
            }
        })
        .sum()
}

/// Stack blocks vertically, wrapping inline text at a fixed char width.
/// Inline elements inherit the box of their nearest block ancestor.
fn apply_block_layout(doc: &mut Document, container: NodeId, layout: &LayoutMetrics) {
    let order: Vec<NodeId> = doc.descendants(container).collect();
    let mut cursor_y = 0.0;

    for &id in &order {
        if doc.element(id).is_none() {
            continue;
        }
        if !is_block(doc, id) {
            let rect = doc
                .parent(id)
                .and_then(|p| doc.rect(p))
                .unwrap_or_default();
            doc.set_rect(id, rect);
            continue;
        }

        let depth = block_depth(doc, id, container);
        let left = depth as f64 * layout.indent;
        let right = layout.width.max(left + layout.char_width);
        let chars = inline_char_count(doc, id);
        let lines = if chars == 0 {
            0.0
        } else {
            let per_line = ((right - left) / layout.char_width).floor().max(1.0);
            (chars as f64 / per_line).ceil()
        };
        let top = cursor_y;
        let bottom = top + lines * layout.line_height;
        doc.set_rect(
            id,
            BoundingBox {
                top,
                right,
                bottom,
                left,
            },
        );
        if lines > 0.0 {
            cursor_y = bottom + layout.block_spacing;
        }
    }

    // Grow container blocks to cover their children; children always sit
    // after their parent in the arena.
    for &id in order.iter().rev() {
        let Some(parent) = doc.parent(id) else {
            continue;
        };
        if id == container || !is_block(doc, parent) {
            continue;
        }
        let (Some(child), Some(mut outer)) = (doc.rect(id), doc.rect(parent)) else {
            continue;
        };
        if child.bottom > outer.bottom {
            outer.bottom = child.bottom;
            doc.set_rect(parent, outer);
        }
    }
}

fn block_depth(doc: &Document, id: NodeId, container: NodeId) -> usize {
    let mut depth = 0;
    let mut cur = doc.parent(id);
    while let Some(p) = cur {
        if p == container {
            break;
        }
        if matches!(doc.tag(p), Some("ul" | "ol" | "blockquote")) {
            depth += 1;
        }
        cur = doc.parent(p);
    }
    depth
}
