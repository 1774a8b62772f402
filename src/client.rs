// ABOUTME: Blocking HTTP client for the remote outline, export, image and folder service
// ABOUTME: Retries idempotent requests with exponential backoff and maps failures to DeckError

use crate::api::{
    AssignPresentationRequest, CreateFolderRequest, ExportFormat, ExportRequest, Folder,
    FolderPresentations, GenerateRequest, GeneratedDeck, GeneratedImage, ImageRequest,
    Presentation, SavePresentationRequest, SaveResponse,
};
use crate::config::ClientConfig;
use crate::errors::{DeckError, Result};
use crate::slide::Slide;
use log::{debug, info, warn};
use reqwest::blocking::{Client, RequestBuilder, Response};
use std::time::Duration;
use url::Url;

/// Client for the remote service. It never touches editor state; callers
/// feed its results into `EditorState::load` themselves.
pub struct RemoteClient {
    http: Client,
    base_url: Url,
    max_retries: u32,
    retry_delay_ms: u64,
}

impl RemoteClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            max_retries: config.max_retries.max(1),
            retry_delay_ms: config.retry_delay_ms,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Generate an outline from a topic or an uploaded document
    pub fn generate_outline(&self, request: &GenerateRequest) -> Result<GeneratedDeck> {
        let url = self.endpoint(&["slides", "generate"])?;
        info!("Requesting outline generation from {}", url);
        let response = check_status(self.http.post(url).json(request).send()?)?;
        let deck: GeneratedDeck = response.json()?;
        info!(
            "Generated presentation {} with {} slides",
            deck.presentation_id,
            deck.slides.len()
        );
        Ok(deck)
    }

    pub fn fetch_presentation(&self, presentation_id: &str) -> Result<Presentation> {
        let url = self.endpoint(&["slides", "presentation", presentation_id])?;
        info!("Fetching presentation {}", presentation_id);
        let response = self.send_with_retry(|| self.http.get(url.clone()))?;
        Ok(response.json()?)
    }

    pub fn save_presentation(&self, request: &SavePresentationRequest) -> Result<SaveResponse> {
        let url = self.endpoint(&["slides", "presentation", &request.presentation_id])?;
        info!(
            "Saving presentation {} ({} slides)",
            request.presentation_id,
            request.slides.len()
        );
        let response = self.send_with_retry(|| self.http.put(url.clone()).json(request))?;
        Ok(response.json()?)
    }

    pub fn delete_presentation(&self, presentation_id: &str) -> Result<()> {
        let url = self.endpoint(&["slides", "presentation", presentation_id])?;
        info!("Deleting presentation {}", presentation_id);
        self.send_with_retry(|| self.http.delete(url.clone()))?;
        Ok(())
    }

    /// Render slides remotely; returns the raw file bytes
    pub fn export(&self, slides: &[Slide], topic: &str, format: ExportFormat) -> Result<Vec<u8>> {
        let url = self.endpoint(&["slides", "export"])?;
        info!("Exporting {} slides as {}", slides.len(), format);
        let request = ExportRequest {
            slides,
            topic,
            format,
        };
        let response = check_status(self.http.post(url).json(&request).send()?)?;
        let bytes = response.bytes()?;
        debug!("Received {} bytes of {} export", bytes.len(), format);
        Ok(bytes.to_vec())
    }

    pub fn generate_image(&self, prompt: &str, model: Option<&str>) -> Result<GeneratedImage> {
        let url = self.endpoint(&["images", "generate"])?;
        info!("Requesting image for prompt {:?}", prompt);
        let request = ImageRequest {
            prompt: prompt.to_string(),
            model: model.map(str::to_string),
        };
        let response = check_status(self.http.post(url).json(&request).send()?)?;
        Ok(response.json()?)
    }

    pub fn list_images(&self) -> Result<Vec<GeneratedImage>> {
        let url = self.endpoint(&["images"])?;
        let response = self.send_with_retry(|| self.http.get(url.clone()))?;
        Ok(response.json()?)
    }

    pub fn delete_image(&self, image_id: &str) -> Result<()> {
        let url = self.endpoint(&["images", image_id])?;
        info!("Deleting image {}", image_id);
        self.send_with_retry(|| self.http.delete(url.clone()))?;
        Ok(())
    }

    pub fn create_folder(&self, name: &str) -> Result<Folder> {
        let url = self.endpoint(&["folders", "create"])?;
        info!("Creating folder {:?}", name);
        let response = check_status(
            self.http
                .post(url)
                .json(&CreateFolderRequest { name })
                .send()?,
        )?;
        Ok(response.json()?)
    }

    pub fn list_folders(&self) -> Result<Vec<Folder>> {
        let url = self.endpoint(&["folders", "all"])?;
        let response = self.send_with_retry(|| self.http.get(url.clone()))?;
        Ok(response.json()?)
    }

    /// Assigning twice is harmless; the service keeps ids unique per folder
    pub fn assign_to_folder(&self, folder_id: &str, presentation_id: &str) -> Result<()> {
        let url = self.endpoint(&["folders", folder_id, "add"])?;
        info!(
            "Adding presentation {} to folder {}",
            presentation_id, folder_id
        );
        let body = AssignPresentationRequest { presentation_id };
        self.send_with_retry(|| self.http.post(url.clone()).json(&body))?;
        Ok(())
    }

    pub fn folder_presentations(&self, folder_id: &str) -> Result<Vec<String>> {
        let url = self.endpoint(&["folders", folder_id, "presentations"])?;
        let response = self.send_with_retry(|| self.http.get(url.clone()))?;
        let listing: FolderPresentations = response.json()?;
        Ok(listing.presentation_ids)
    }

    pub fn delete_folder(&self, folder_id: &str) -> Result<()> {
        let url = self.endpoint(&["folders", folder_id])?;
        info!("Deleting folder {}", folder_id);
        self.send_with_retry(|| self.http.delete(url.clone()))?;
        Ok(())
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                DeckError::ConfigError(format!("Invalid API base URL: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send an idempotent request, retrying transport failures and 5xx responses
    fn send_with_retry<F>(&self, build: F) -> Result<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut retry_delay = self.retry_delay_ms;
        let mut last_error = None;

        for attempt in 1..=self.max_retries {
            match build().send() {
                Ok(response) if response.status().is_server_error() => {
                    last_error = Some(api_error(response));
                }
                Ok(response) => return check_status(response),
                Err(e) => {
                    last_error = Some(DeckError::FetchError(e));
                }
            }

            if attempt < self.max_retries {
                warn!(
                    "Request attempt {} failed, retrying in {} ms",
                    attempt, retry_delay
                );
                std::thread::sleep(Duration::from_millis(retry_delay));
                retry_delay = next_retry_delay(retry_delay);
            }
        }

        Err(last_error.unwrap_or_else(|| {
            DeckError::UnknownError("Request failed without a response".to_string())
        }))
    }
}

/// Exponential backoff, capped at `u64::MAX` milliseconds
pub(crate) fn next_retry_delay(delay_ms: u64) -> u64 {
    delay_ms.saturating_mul(2)
}

fn check_status(response: Response) -> Result<Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(api_error(response))
    }
}

// FastAPI reports failures as {"detail": "..."}; fall back to the raw body.
fn api_error(response: Response) -> DeckError {
    let status = response.status().as_u16();
    let body = response.text().unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| value.get("detail").map(|d| match d.as_str() {
            Some(text) => text.to_string(),
            None => d.to_string(),
        }))
        .unwrap_or(body);
    DeckError::ApiError { status, message }
}
