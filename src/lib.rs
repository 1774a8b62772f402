// ABOUTME: Library module for the deck editor.
// ABOUTME: Contains slide editing state, the editing session and the remote service client.

// Reexport modules
pub mod api;
pub mod client;
pub mod config;
pub mod editor;
pub mod errors;
pub mod export;
pub mod outline;
pub mod session;
pub mod slide;
pub mod utils;

// Reexport common types and functions
pub use api::{
    Detail, ExportFormat, Folder, GenerateRequest, GeneratedDeck, GeneratedImage, Presentation,
    SavePresentationRequest, SaveResponse,
};
pub use client::RemoteClient;
pub use config::{ClientConfig, Config};
pub use editor::EditorState;
pub use errors::{DeckError, Result};
pub use export::{export_file_name, render_markdown, render_offline, save_export};
pub use outline::{parse_outline, parse_outline_file, Outline};
pub use session::{DeckDocument, EditingSession, LoadTicket};
pub use slide::{DesignKey, DesignPatch, NewSlide, Slide, SlideDesign};
