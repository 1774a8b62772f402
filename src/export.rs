// ABOUTME: Export helpers for the deck editor
// ABOUTME: Saves exported files under sanitized names and renders Markdown/JSON exports offline

use crate::api::ExportFormat;
use crate::errors::{DeckError, Result};
use crate::slide::Slide;
use crate::utils;
use log::info;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

const MAX_TOPIC_CHARS: usize = 50;

/// Build a file name like `My_Topic_1a2b3c4d.pptx` for an export
pub fn export_file_name(topic: &str, format: ExportFormat) -> String {
    let cleaned: String = topic
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    // Leading spaces survive as underscores; only the tail is trimmed.
    let cleaned: String = cleaned.trim_end().chars().take(MAX_TOPIC_CHARS).collect();
    let stem = if cleaned.is_empty() {
        "slides".to_string()
    } else {
        cleaned.replace(' ', "_")
    };

    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}_{}.{}", stem, &suffix[..8], format.extension())
}

/// Write exported bytes into `dir`, returning the created file's path
pub fn save_export(bytes: &[u8], dir: &Path, topic: &str, format: ExportFormat) -> Result<PathBuf> {
    utils::ensure_directory_exists(dir)?;
    let path = dir.join(export_file_name(topic, format));
    fs::write(&path, bytes)?;
    info!("Exported {} ({} bytes) to {:?}", format, bytes.len(), path);
    Ok(path)
}

/// Render a deck the way the service's Markdown export lays it out
pub fn render_markdown(topic: &str, slides: &[Slide]) -> String {
    let mut md = format!("# {}\n\n", topic);
    md.push_str(&format!(
        "*Generated presentation with {} slides*\n\n",
        slides.len()
    ));
    md.push_str("---\n\n");

    for (i, slide) in slides.iter().enumerate() {
        let title = if slide.title.is_empty() {
            slide.display_heading()
        } else {
            slide.title.as_str()
        };
        md.push_str(&format!("## Slide {}: {}\n\n", i + 1, title));

        for bullet in &slide.bullets {
            md.push_str(&format!("- {}\n", bullet));
        }

        if let Some(notes) = slide.notes.as_deref().filter(|n| !n.is_empty()) {
            md.push_str(&format!("\n*Notes: {}*\n", notes));
        }

        md.push_str("\n---\n\n");
    }

    md
}

#[derive(Serialize)]
struct JsonExport<'a> {
    topic: &'a str,
    total_slides: usize,
    slides: &'a [Slide],
}

/// Render a deck the way the service's JSON export lays it out
pub fn render_json(topic: &str, slides: &[Slide]) -> Result<String> {
    let export = JsonExport {
        topic,
        total_slides: slides.len(),
        slides,
    };
    Ok(serde_json::to_string_pretty(&export)?)
}

/// Produce an export without the remote renderer. Only text formats qualify.
pub fn render_offline(topic: &str, slides: &[Slide], format: ExportFormat) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Md => Ok(render_markdown(topic, slides).into_bytes()),
        ExportFormat::Json => Ok(render_json(topic, slides)?.into_bytes()),
        other => Err(DeckError::ValidationError(format!(
            "{} export requires the remote service",
            other
        ))),
    }
}
