// ABOUTME: Slide data model shared by the editor, the session and the remote client
// ABOUTME: Handles wire (de)serialization and design-patch merge semantics

use crate::errors::{DeckError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_LAYOUT: &str = "title_and_body";
pub const DEFAULT_THEME: &str = "corporate";
pub const NEW_SLIDE_TITLE: &str = "New Slide";

/// Generate a fresh client-side slide identifier
pub fn new_slide_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// One page of a deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    #[serde(default = "new_slide_id", deserialize_with = "deserialize_id")]
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,

    #[serde(default, alias = "points")]
    pub bullets: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default)]
    pub design: SlideDesign,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl Slide {
    /// Create a slide with the given id and title and everything else empty
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            heading: None,
            bullets: Vec::new(),
            notes: None,
            design: SlideDesign::default(),
            order: None,
        }
    }

    /// The headline actually rendered; falls back to the title when unset
    pub fn display_heading(&self) -> &str {
        self.heading.as_deref().unwrap_or(&self.title)
    }
}

// The backend numbers slides it generates, so ids arrive as strings or integers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(n) => n.to_string(),
    })
}

/// Per-slide visual metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideDesign {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_prompt: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl SlideDesign {
    pub fn layout(&self) -> &str {
        self.layout.as_deref().unwrap_or(DEFAULT_LAYOUT)
    }

    pub fn theme(&self) -> &str {
        self.theme.as_deref().unwrap_or(DEFAULT_THEME)
    }

    /// Merge a patch key by key. Keys absent from the patch are preserved,
    /// keys explicitly set to null are cleared.
    pub fn apply(&mut self, patch: &DesignPatch) {
        merge_key(&mut self.layout, &patch.layout);
        merge_key(&mut self.theme, &patch.theme);
        merge_key(&mut self.icon, &patch.icon);
        merge_key(&mut self.image_prompt, &patch.image_prompt);
        merge_key(&mut self.image_url, &patch.image_url);
    }
}

fn merge_key(slot: &mut Option<String>, change: &Option<Option<String>>) {
    if let Some(value) = change {
        *slot = value.clone();
    }
}

/// Keys recognised in a slide's design map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesignKey {
    Layout,
    Theme,
    Icon,
    ImagePrompt,
    ImageUrl,
}

impl FromStr for DesignKey {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "layout" => Ok(DesignKey::Layout),
            "theme" => Ok(DesignKey::Theme),
            "icon" => Ok(DesignKey::Icon),
            "image_prompt" => Ok(DesignKey::ImagePrompt),
            "image_url" => Ok(DesignKey::ImageUrl),
            other => Err(DeckError::ValidationError(format!(
                "Unknown design key: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for DesignKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DesignKey::Layout => "layout",
            DesignKey::Theme => "theme",
            DesignKey::Icon => "icon",
            DesignKey::ImagePrompt => "image_prompt",
            DesignKey::ImageUrl => "image_url",
        };
        f.write_str(name)
    }
}

/// A partial design update.
///
/// Each field is tri-state: `None` leaves the key alone, `Some(None)` clears
/// it, `Some(Some(v))` sets it. Over JSON an omitted key is `None` and an
/// explicit `null` is `Some(None)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignPatch {
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub layout: Option<Option<String>>,

    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub theme: Option<Option<String>>,

    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub icon: Option<Option<String>>,

    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_prompt: Option<Option<String>>,

    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<Option<String>>,
}

fn present_or_null<'de, D>(deserializer: D) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl DesignPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear (`None`) a single key
    pub fn set(mut self, key: DesignKey, value: Option<String>) -> Self {
        let slot = match key {
            DesignKey::Layout => &mut self.layout,
            DesignKey::Theme => &mut self.theme,
            DesignKey::Icon => &mut self.icon,
            DesignKey::ImagePrompt => &mut self.image_prompt,
            DesignKey::ImageUrl => &mut self.image_url,
        };
        *slot = Some(value);
        self
    }

    pub fn clear(self, key: DesignKey) -> Self {
        self.set(key, None)
    }

    pub fn with_layout(self, layout: impl Into<String>) -> Self {
        self.set(DesignKey::Layout, Some(layout.into()))
    }

    pub fn with_theme(self, theme: impl Into<String>) -> Self {
        self.set(DesignKey::Theme, Some(theme.into()))
    }

    pub fn with_icon(self, icon: impl Into<String>) -> Self {
        self.set(DesignKey::Icon, Some(icon.into()))
    }

    pub fn with_image_prompt(self, prompt: impl Into<String>) -> Self {
        self.set(DesignKey::ImagePrompt, Some(prompt.into()))
    }

    pub fn with_image_url(self, url: impl Into<String>) -> Self {
        self.set(DesignKey::ImageUrl, Some(url.into()))
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Optional initial fields for a slide created with `EditorState::add_slide`
#[derive(Debug, Clone, Default)]
pub struct NewSlide {
    pub title: Option<String>,
    pub heading: Option<String>,
    pub bullets: Vec<String>,
    pub notes: Option<String>,
    pub design: Option<SlideDesign>,
}
