// ABOUTME: Markdown outline import for the deck editor
// ABOUTME: Parses headings, lists and paragraphs into slides using the comrak AST

use crate::errors::{DeckError, Result};
use crate::slide::{new_slide_id, Slide};
use crate::utils;
use comrak::nodes::{AstNode, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};
use log::{debug, info};
use std::fs;
use std::path::Path;

/// A deck recovered from a Markdown outline
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    pub title: Option<String>,
    pub slides: Vec<Slide>,
}

/// Read and parse an outline file
pub fn parse_outline_file(path: &Path) -> Result<Outline> {
    utils::validate_file_exists(path)?;
    let content = fs::read_to_string(path)?;
    let outline = parse_outline(&content)?;
    info!("Imported {} slides from {:?}", outline.slides.len(), path);
    Ok(outline)
}

/// Parse a Markdown outline.
///
/// Level 1 and 2 headings start slides, list items become bullets and
/// remaining text becomes speaker notes. When a lone level-1 heading sits
/// above level-2 headings it names the deck instead. A leading `% Title`
/// line also names the deck. Text before the first slide is ignored.
pub fn parse_outline(markdown: &str) -> Result<Outline> {
    let (front_title, body) = split_frontmatter(markdown);

    let arena = Arena::new();
    let root = parse_document(&arena, body, &ComrakOptions::default());

    let headings: Vec<u8> = root
        .children()
        .filter_map(|node| match &node.data.borrow().value {
            NodeValue::Heading(h) => Some(h.level),
            _ => None,
        })
        .collect();
    let titled_by_h1 = headings.first() == Some(&1)
        && headings.iter().filter(|&&l| l == 1).count() == 1
        && headings.contains(&2);

    let mut title = front_title;
    let mut slides: Vec<Slide> = Vec::new();
    let mut notes: Vec<Vec<String>> = Vec::new();

    for node in root.children() {
        let data = node.data.borrow();
        match &data.value {
            NodeValue::Heading(h) if h.level <= 2 => {
                let text = collect_text(node);
                let text = text.trim();
                if text.is_empty() {
                    return Err(DeckError::MarkdownError(format!(
                        "Empty heading on line {}",
                        data.sourcepos.start.line
                    )));
                }
                if h.level == 1 && titled_by_h1 {
                    if title.is_none() {
                        title = Some(text.to_string());
                    }
                    continue;
                }
                let mut slide = Slide::new(new_slide_id(), strip_slide_prefix(text));
                slide.order = Some(slides.len() as i64 + 1);
                slides.push(slide);
                notes.push(Vec::new());
            }
            NodeValue::List(_) => {
                if let Some(slide) = slides.last_mut() {
                    collect_items(node, &mut slide.bullets);
                }
            }
            NodeValue::ThematicBreak => {}
            _ => {
                if let Some(slide_notes) = notes.last_mut() {
                    let text = collect_text(node);
                    let text = text.trim();
                    if !text.is_empty() {
                        slide_notes.push(strip_notes_prefix(text).to_string());
                    }
                }
            }
        }
    }

    for (slide, paragraphs) in slides.iter_mut().zip(notes) {
        if !paragraphs.is_empty() {
            slide.notes = Some(paragraphs.join("\n\n"));
        }
    }

    debug!("Parsed outline with {} slides", slides.len());
    Ok(Outline { title, slides })
}

/// Pull `% Title` (and any following `%` lines) off the top of the document
fn split_frontmatter(markdown: &str) -> (Option<String>, &str) {
    let mut title = None;
    let mut rest = markdown;

    while let Some(line) = rest.lines().next() {
        let Some(value) = line.strip_prefix("% ") else {
            break;
        };
        if title.is_none() {
            title = Some(value.trim().to_string());
        }
        rest = rest[line.len()..].trim_start_matches(&['\r', '\n'][..]);
    }

    (title.filter(|t| !t.is_empty()), rest)
}

fn collect_items<'a>(list: &'a AstNode<'a>, bullets: &mut Vec<String>) {
    for item in list.children() {
        let mut text = String::new();
        for child in item.children() {
            if matches!(child.data.borrow().value, NodeValue::List(_)) {
                continue;
            }
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(collect_text(child).trim());
        }
        bullets.push(text);

        for child in item.children() {
            if matches!(child.data.borrow().value, NodeValue::List(_)) {
                collect_items(child, bullets);
            }
        }
    }
}

fn collect_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut out = String::new();
    push_text(node, &mut out);
    out
}

fn push_text<'a>(node: &'a AstNode<'a>, out: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(text) => out.push_str(text),
        NodeValue::Code(code) => out.push_str(&code.literal),
        NodeValue::SoftBreak | NodeValue::LineBreak => out.push(' '),
        _ => {
            for child in node.children() {
                push_text(child, out);
            }
        }
    }
}

// Re-importing our own Markdown export yields "Slide 3: Title" headings.
fn strip_slide_prefix(text: &str) -> &str {
    if let Some(rest) = text.strip_prefix("Slide ") {
        if let Some((number, title)) = rest.split_once(": ") {
            if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()) {
                return title.trim();
            }
        }
    }
    text
}

fn strip_notes_prefix(text: &str) -> &str {
    text.strip_prefix("Notes:").map(str::trim).unwrap_or(text)
}
