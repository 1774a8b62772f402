// ABOUTME: In-memory editing state for the deck currently being authored
// ABOUTME: Keeps the slide list and current selection consistent across every mutation

use crate::errors::{DeckError, Result};
use crate::slide::{
    new_slide_id, DesignPatch, NewSlide, Slide, DEFAULT_THEME, NEW_SLIDE_TITLE,
};
use log::debug;

/// The deck under edit plus the selected slide.
///
/// The current slide is always looked up through `current`, so it can never
/// drift from the backing list. Field edits made while nothing is selected
/// are silent no-ops; index validation failures leave the state untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorState {
    slides: Vec<Slide>,
    current: Option<usize>,
}

impl EditorState {
    /// Create an empty state with no selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole deck and select the first slide (if any)
    pub fn load(&mut self, slides: Vec<Slide>) {
        debug!("Loading {} slides into editor", slides.len());
        self.current = if slides.is_empty() { None } else { Some(0) };
        self.slides = slides;
    }

    pub fn select(&mut self, index: usize) -> Result<()> {
        self.check_slide_index(index)?;
        self.current = Some(index);
        Ok(())
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        self.current.and_then(|i| self.slides.get(i))
    }

    /// Copy of the deck as it would be sent to the persistence API
    pub fn snapshot(&self) -> Vec<Slide> {
        self.slides.clone()
    }

    pub fn update_title(&mut self, text: &str) {
        if let Some(slide) = self.current_slide_mut() {
            slide.title = text.to_string();
        }
    }

    pub fn update_heading(&mut self, text: &str) {
        if let Some(slide) = self.current_slide_mut() {
            slide.heading = Some(text.to_string());
        }
    }

    pub fn update_notes(&mut self, text: &str) {
        if let Some(slide) = self.current_slide_mut() {
            slide.notes = Some(text.to_string());
        }
    }

    /// Replace one bullet of the current slide in place
    pub fn update_bullet(&mut self, index: usize, text: &str) -> Result<()> {
        let Some(slide) = self.current_slide_mut() else {
            return Ok(());
        };
        let len = slide.bullets.len();
        match slide.bullets.get_mut(index) {
            Some(bullet) => {
                *bullet = text.to_string();
                Ok(())
            }
            None => Err(DeckError::OutOfRange { index, len }),
        }
    }

    /// Append an empty bullet to the current slide
    pub fn add_bullet(&mut self) {
        if let Some(slide) = self.current_slide_mut() {
            slide.bullets.push(String::new());
        }
    }

    /// Remove one bullet from the current slide. Removing the last bullet is allowed.
    pub fn remove_bullet(&mut self, index: usize) -> Result<()> {
        let Some(slide) = self.current_slide_mut() else {
            return Ok(());
        };
        if index >= slide.bullets.len() {
            return Err(DeckError::OutOfRange {
                index,
                len: slide.bullets.len(),
            });
        }
        slide.bullets.remove(index);
        Ok(())
    }

    pub fn update_design(&mut self, patch: &DesignPatch) {
        if let Some(slide) = self.current_slide_mut() {
            slide.design.apply(patch);
        }
    }

    /// Append a new slide and select it. Returns the new slide's index.
    pub fn add_slide(&mut self, initial: Option<NewSlide>) -> usize {
        let initial = initial.unwrap_or_default();

        let mut design = initial.design.unwrap_or_default();
        if design.theme.is_none() {
            let inherited = self
                .slides
                .first()
                .map(|first| first.design.theme().to_string())
                .unwrap_or_else(|| DEFAULT_THEME.to_string());
            design.theme = Some(inherited);
        }

        let title = initial.title.unwrap_or_else(|| NEW_SLIDE_TITLE.to_string());
        let heading = initial.heading.unwrap_or_else(|| title.clone());

        let slide = Slide {
            id: self.fresh_id(),
            title,
            heading: Some(heading),
            bullets: initial.bullets,
            notes: Some(initial.notes.unwrap_or_default()),
            design,
            order: None,
        };

        debug!("Adding slide {}", slide.id);
        self.slides.push(slide);
        let index = self.slides.len() - 1;
        self.current = Some(index);
        index
    }

    /// Insert a deep copy of `slides[index]` right after it, under a fresh id.
    ///
    /// The selection keeps pointing at the same logical slide; the copy is
    /// not selected. Returns the copy's index.
    pub fn duplicate_slide(&mut self, index: usize) -> Result<usize> {
        self.check_slide_index(index)?;

        let mut copy = self.slides[index].clone();
        copy.id = self.fresh_id();
        debug!("Duplicating slide {} as {}", self.slides[index].id, copy.id);

        let inserted_at = index + 1;
        self.slides.insert(inserted_at, copy);
        if let Some(current) = self.current {
            if current >= inserted_at {
                self.current = Some(current + 1);
            }
        }
        Ok(inserted_at)
    }

    /// Remove `slides[index]`; a deck always keeps at least one slide.
    pub fn delete_slide(&mut self, index: usize) -> Result<()> {
        self.check_slide_index(index)?;
        if self.slides.len() == 1 {
            return Err(DeckError::CannotDeleteLast);
        }

        let removed = self.slides.remove(index);
        debug!("Deleted slide {}", removed.id);

        self.current = self.current.map(|current| {
            if index == current {
                current.saturating_sub(1)
            } else if index < current {
                current - 1
            } else {
                current
            }
        });
        Ok(())
    }

    /// Drop the deck and the selection
    pub fn clear(&mut self) {
        self.slides.clear();
        self.current = None;
    }

    fn current_slide_mut(&mut self) -> Option<&mut Slide> {
        match self.current {
            Some(i) => self.slides.get_mut(i),
            None => {
                debug!("No current slide; edit ignored");
                None
            }
        }
    }

    fn check_slide_index(&self, index: usize) -> Result<()> {
        if index >= self.slides.len() {
            return Err(DeckError::OutOfRange {
                index,
                len: self.slides.len(),
            });
        }
        Ok(())
    }

    // Ids loaded from the backend are arbitrary strings.
    fn fresh_id(&self) -> String {
        loop {
            let id = new_slide_id();
            if !self.slides.iter().any(|s| s.id == id) {
                return id;
            }
        }
    }
}

impl From<Vec<Slide>> for EditorState {
    fn from(slides: Vec<Slide>) -> Self {
        let mut state = Self::new();
        state.load(slides);
        state
    }
}
