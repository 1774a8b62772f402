// ABOUTME: Editing session that owns one EditorState and talks to the remote service
// ABOUTME: Discards stale loads, builds save/export requests and persists deck documents

use crate::api::{ExportFormat, GenerateRequest, GeneratedImage, SavePresentationRequest};
use crate::client::RemoteClient;
use crate::editor::EditorState;
use crate::errors::{DeckError, Result};
use crate::slide::{DesignPatch, Slide, DEFAULT_THEME};
use crate::utils;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Issued when a load starts; a load only lands if its ticket is still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    sequence: u64,
    revision: u64,
}

/// A deck stored on disk between CLI invocations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_index: Option<usize>,
    #[serde(default)]
    pub slides: Vec<Slide>,
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

/// One open deck. Every local edit goes through `editor_mut`, which lets the
/// session tell whether a network response has been overtaken by the user.
#[derive(Debug, Clone)]
pub struct EditingSession {
    presentation_id: Option<String>,
    title: String,
    theme: String,
    editor: EditorState,
    revision: u64,
    load_sequence: u64,
}

impl Default for EditingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditingSession {
    pub fn new() -> Self {
        Self {
            presentation_id: None,
            title: String::new(),
            theme: DEFAULT_THEME.to_string(),
            editor: EditorState::new(),
            revision: 0,
            load_sequence: 0,
        }
    }

    pub fn presentation_id(&self) -> Option<&str> {
        self.presentation_id.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.revision += 1;
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: impl Into<String>) {
        self.theme = theme.into();
        self.revision += 1;
    }

    pub fn editor(&self) -> &EditorState {
        &self.editor
    }

    /// Mutable access to the deck; counts as a local edit
    pub fn editor_mut(&mut self) -> &mut EditorState {
        self.revision += 1;
        &mut self.editor
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Start a load. Any ticket issued earlier becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_sequence += 1;
        LoadTicket {
            sequence: self.load_sequence,
            revision: self.revision,
        }
    }

    /// Apply the result of a load started with `ticket`.
    ///
    /// Returns `false` and leaves the session untouched when a newer load was
    /// started or the deck was edited locally in the meantime.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        presentation_id: Option<String>,
        title: Option<String>,
        slides: Vec<Slide>,
    ) -> bool {
        if ticket.sequence != self.load_sequence {
            warn!(
                "Discarding superseded load #{} (latest is #{})",
                ticket.sequence, self.load_sequence
            );
            return false;
        }
        if ticket.revision != self.revision {
            warn!("Discarding load #{}: deck was edited locally", ticket.sequence);
            return false;
        }

        info!("Loaded {} slides", slides.len());
        if presentation_id.is_some() {
            self.presentation_id = presentation_id;
        }
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(first) = slides.first() {
            if let Some(theme) = &first.design.theme {
                self.theme = theme.clone();
            }
        }
        self.editor.load(slides);
        true
    }

    /// Generate a new deck remotely and load it
    pub fn generate(&mut self, client: &RemoteClient, request: &GenerateRequest) -> Result<bool> {
        let ticket = self.begin_load();
        let deck = client.generate_outline(request)?;
        let applied = self.finish_load(ticket, Some(deck.presentation_id), deck.topic, deck.slides);
        if applied {
            self.theme = request.style().to_string();
        }
        Ok(applied)
    }

    /// Load a persisted presentation
    pub fn resume(&mut self, client: &RemoteClient, presentation_id: &str) -> Result<bool> {
        let ticket = self.begin_load();
        let presentation = client.fetch_presentation(presentation_id)?;
        Ok(self.finish_load(
            ticket,
            Some(presentation.presentation_id),
            presentation.title,
            presentation.slides,
        ))
    }

    /// Build the bulk-save body from the current deck
    pub fn save_request(&self) -> Result<SavePresentationRequest> {
        let presentation_id = self.presentation_id.clone().ok_or_else(|| {
            DeckError::ValidationError("Deck has no presentation id; generate or fetch it first".to_string())
        })?;
        Ok(SavePresentationRequest {
            presentation_id,
            title: self.title.clone(),
            theme: self.theme.clone(),
            slides: self.editor.snapshot(),
        })
    }

    pub fn save(&self, client: &RemoteClient) -> Result<bool> {
        let request = self.save_request()?;
        let response = client.save_presentation(&request)?;
        if !response.success {
            warn!("Service did not confirm save of {}", request.presentation_id);
        }
        Ok(response.success)
    }

    pub fn export(&self, client: &RemoteClient, format: ExportFormat) -> Result<Vec<u8>> {
        client.export(self.editor.slides(), self.export_topic(), format)
    }

    /// Topic sent with exports; untitled decks fall back to the first slide's title
    pub fn export_topic(&self) -> &str {
        if !self.title.is_empty() {
            return &self.title;
        }
        self.editor
            .slides()
            .first()
            .map(|s| s.title.as_str())
            .filter(|t| !t.is_empty())
            .unwrap_or("Presentation")
    }

    /// Generate an image and attach it to the current slide
    pub fn attach_image(&mut self, client: &RemoteClient, prompt: &str) -> Result<GeneratedImage> {
        if self.editor.current_slide().is_none() {
            return Err(DeckError::ValidationError(
                "No slide selected to attach an image to".to_string(),
            ));
        }
        let image = client.generate_image(prompt, None)?;
        self.apply_image(&image);
        Ok(image)
    }

    /// Point the current slide's design at a generated image
    pub fn apply_image(&mut self, image: &GeneratedImage) {
        let patch = DesignPatch::new()
            .with_image_url(image.url.clone())
            .with_image_prompt(image.prompt.clone());
        self.editor_mut().update_design(&patch);
    }

    /// Close the session, dropping the deck
    pub fn end(&mut self) {
        self.presentation_id = None;
        self.title.clear();
        self.theme = DEFAULT_THEME.to_string();
        self.editor.clear();
        self.revision += 1;
    }

    pub fn to_document(&self) -> DeckDocument {
        DeckDocument {
            presentation_id: self.presentation_id.clone(),
            title: self.title.clone(),
            theme: self.theme.clone(),
            current_index: self.editor.current_index(),
            slides: self.editor.snapshot(),
        }
    }

    pub fn from_document(document: DeckDocument) -> Result<Self> {
        let mut session = Self::new();
        session.presentation_id = document.presentation_id;
        session.title = document.title;
        session.theme = document.theme;
        session.editor.load(document.slides);
        if let Some(index) = document.current_index {
            session.editor.select(index)?;
        }
        Ok(session)
    }

    pub fn read_document(path: &Path) -> Result<Self> {
        utils::validate_file_exists(path)?;
        let content = fs::read_to_string(path)?;
        let document: DeckDocument = serde_json::from_str(&content)?;
        Self::from_document(document)
    }

    pub fn write_document(&self, path: &Path) -> Result<()> {
        utils::ensure_parent_directory_exists(path)?;
        let json = serde_json::to_string_pretty(&self.to_document())?;
        fs::write(path, json)?;
        info!("Deck written to {:?}", path);
        Ok(())
    }
}
