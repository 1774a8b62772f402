// ABOUTME: Request and response types exchanged with the remote outline/export/image service
// ABOUTME: Mirrors the JSON bodies of the slides, images and folders endpoints

use crate::errors::{DeckError, Result};
use crate::slide::Slide;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How much content the outline generator should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Detail {
    Brief,
    #[default]
    Medium,
    Deep,
}

impl FromStr for Detail {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "brief" => Ok(Detail::Brief),
            "medium" => Ok(Detail::Medium),
            "deep" => Ok(Detail::Deep),
            other => Err(DeckError::ValidationError(format!(
                "Unknown detail level: {} (expected brief, medium or deep)",
                other
            ))),
        }
    }
}

/// Export file formats supported by the remote renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pptx,
    Pdf,
    Md,
    Json,
}

impl ExportFormat {
    /// File extension matching the format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pptx => "pptx",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Md => "md",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pptx" => Ok(ExportFormat::Pptx),
            "pdf" => Ok(ExportFormat::Pdf),
            "md" | "markdown" => Ok(ExportFormat::Md),
            "json" => Ok(ExportFormat::Json),
            other => Err(DeckError::ValidationError(format!(
                "Unsupported export format: {}",
                other
            ))),
        }
    }
}

/// Body of `POST slides/generate`: either a free topic or an uploaded document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GenerateRequest {
    Topic {
        topic: String,
        detail: Detail,
        style: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        num_slides: Option<u32>,
    },
    Document {
        document_id: String,
        style: String,
    },
}

impl GenerateRequest {
    pub fn topic(topic: impl Into<String>, detail: Detail, style: impl Into<String>) -> Self {
        GenerateRequest::Topic {
            topic: topic.into(),
            detail,
            style: style.into(),
            num_slides: None,
        }
    }

    pub fn document(document_id: impl Into<String>, style: impl Into<String>) -> Self {
        GenerateRequest::Document {
            document_id: document_id.into(),
            style: style.into(),
        }
    }

    pub fn style(&self) -> &str {
        match self {
            GenerateRequest::Topic { style, .. } | GenerateRequest::Document { style, .. } => style,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeneratedDeck {
    pub presentation_id: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub slides: Vec<Slide>,
}

/// A persisted presentation as returned by `GET slides/presentation/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    pub presentation_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub slides: Vec<Slide>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavePresentationRequest {
    pub presentation_id: String,
    pub title: String,
    pub theme: String,
    pub slides: Vec<Slide>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SaveResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportRequest<'a> {
    pub slides: &'a [Slide],
    pub topic: &'a str,
    pub format: ExportFormat,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageRequest {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// An image produced by the image service, kept in the gallery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub id: String,
    pub url: String,
    pub prompt: String,
    /// Sent as epoch seconds
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub presentations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreateFolderRequest<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct AssignPresentationRequest<'a> {
    pub presentation_id: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FolderPresentations {
    #[serde(default)]
    pub presentation_ids: Vec<String>,
}
