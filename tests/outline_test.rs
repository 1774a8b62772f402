use deck_editor::{parse_outline, parse_outline_file, render_markdown, DeckError, Slide};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_headings_start_slides() {
    let markdown = r#"# Why Rust

- Memory safety
- No garbage collector

Mention the borrow checker.

# Getting Started

1. Install rustup
2. Run `cargo new`
"#;

    let outline = parse_outline(markdown).unwrap();
    assert_eq!(outline.title, None);
    assert_eq!(outline.slides.len(), 2);

    let first = &outline.slides[0];
    assert_eq!(first.title, "Why Rust");
    assert_eq!(first.bullets, vec!["Memory safety", "No garbage collector"]);
    assert_eq!(first.notes.as_deref(), Some("Mention the borrow checker."));
    assert_eq!(first.order, Some(1));

    let second = &outline.slides[1];
    assert_eq!(second.bullets, vec!["Install rustup", "Run cargo new"]);
    assert_eq!(second.notes, None);
    assert_ne!(first.id, second.id);
}

#[test]
fn test_single_h1_over_h2_names_the_deck() {
    let markdown = "# Rust Workshop\n\nIntro text\n\n## Part One\n\n- a\n\n## Part Two\n\n- b\n";
    let outline = parse_outline(markdown).unwrap();
    assert_eq!(outline.title.as_deref(), Some("Rust Workshop"));
    let titles: Vec<&str> = outline.slides.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Part One", "Part Two"]);
}

#[test]
fn test_multiple_h1_headings_all_start_slides() {
    let markdown = "# One\n\n## One A\n\n# Two\n\n- b\n";
    let outline = parse_outline(markdown).unwrap();
    assert_eq!(outline.title, None);
    let titles: Vec<&str> = outline.slides.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["One", "One A", "Two"]);
}

#[test]
fn test_frontmatter_title_wins_over_deck_heading() {
    let markdown = "% From Front\n\n# From Heading\n\n## Part\n\n- a\n";
    let outline = parse_outline(markdown).unwrap();
    assert_eq!(outline.title.as_deref(), Some("From Front"));
    assert_eq!(outline.slides.len(), 1);
    assert_eq!(outline.slides[0].title, "Part");
}

#[test]
fn test_frontmatter_title() {
    let markdown = "% Team Offsite\n% Jane Doe\n\n# Agenda\n\n- Coffee\n";
    let outline = parse_outline(markdown).unwrap();
    assert_eq!(outline.title.as_deref(), Some("Team Offsite"));
    assert_eq!(outline.slides.len(), 1);
    assert_eq!(outline.slides[0].bullets, vec!["Coffee"]);
}

#[test]
fn test_nested_lists_flatten_into_bullets() {
    let markdown = "# Plan\n\n- Phase one\n  - Research\n  - Prototype\n- Phase two\n";
    let outline = parse_outline(markdown).unwrap();
    assert_eq!(
        outline.slides[0].bullets,
        vec!["Phase one", "Research", "Prototype", "Phase two"]
    );
}

#[test]
fn test_text_without_headings_yields_no_slides() {
    let outline = parse_outline("Just a paragraph.\n\n- and a list\n").unwrap();
    assert!(outline.slides.is_empty());
}

#[test]
fn test_empty_heading_is_an_error() {
    let err = parse_outline("# Fine\n\n#\n").unwrap_err();
    assert!(matches!(err, DeckError::MarkdownError(_)));
}

#[test]
fn test_markdown_export_layout() {
    let mut first = Slide::new("a", "Intro");
    first.bullets = vec!["Hello".to_string(), "World".to_string()];
    first.notes = Some("Smile".to_string());
    let second = Slide::new("b", "Outro");

    let md = render_markdown("My Talk", &[first, second]);
    assert!(md.starts_with("# My Talk\n\n*Generated presentation with 2 slides*\n\n---\n\n"));
    assert!(md.contains("## Slide 1: Intro\n\n- Hello\n- World\n\n*Notes: Smile*\n\n---\n\n"));
    assert!(md.contains("## Slide 2: Outro\n\n\n---\n\n"));
}

#[test]
fn test_markdown_export_reimports() {
    let mut first = Slide::new("a", "Intro");
    first.bullets = vec!["Hello".to_string()];
    first.notes = Some("Smile".to_string());
    let mut second = Slide::new("b", "Details");
    second.bullets = vec!["One".to_string(), "Two".to_string()];

    let md = render_markdown("My Talk", &[first, second]);
    let outline = parse_outline(&md).unwrap();

    assert_eq!(outline.title.as_deref(), Some("My Talk"));
    assert_eq!(outline.slides.len(), 2);
    assert_eq!(outline.slides[0].title, "Intro");
    assert_eq!(outline.slides[0].bullets, vec!["Hello"]);
    assert_eq!(outline.slides[0].notes.as_deref(), Some("Smile"));
    assert_eq!(outline.slides[1].title, "Details");
    assert_eq!(outline.slides[1].bullets, vec!["One", "Two"]);
}

#[test]
fn test_parse_outline_file() {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(b"# Only Slide\n\n- point\n")
        .expect("Failed to write to temp file");

    let outline = parse_outline_file(file.path()).unwrap();
    assert_eq!(outline.slides.len(), 1);
}

#[test]
fn test_parse_outline_missing_file() {
    let err = parse_outline_file(std::path::Path::new("/definitely/not/here.md")).unwrap_err();
    assert!(matches!(err, DeckError::PathNotFoundError(_)));
}
