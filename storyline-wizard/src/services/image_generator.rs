//! Illustrative image generation
//!
//! The prompt is built from the draft; variants are requested from the image
//! API with a random style, composition and seed each, and de-duplicated by
//! URL hash. With the stock provider, or when the API yields nothing, a canned
//! stock photo is chosen by keyword match against the prompt.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use storyline_common::config::{ImageConfig, ImageProvider, LlmConfig};
use thiserror::Error;

use crate::models::{Draft, ImageResult, ImageSource};

const USER_AGENT: &str = concat!("storyline-wizard/", env!("CARGO_PKG_VERSION"));

/// Appended per attempt so variants differ in look
pub const STYLE_MODIFIERS: [&str; 4] = [
    "documentary clinical close-up, natural lighting",
    "editorial style, clean background, soft shadows",
    "isometric vector illustration, flat design, labels",
    "infographic style, minimal icons, high contrast",
];

pub const COMPOSITIONS: [&str; 4] = [
    "centered composition",
    "rule of thirds",
    "45-degree angle",
    "top-down view",
];

const MAX_VARIANTS: usize = 8;

/// Draft terms → scene description. The scene words double as stock keywords.
const SCENES: [(&[&str], &str); 4] = [
    (
        &["검사", "장비", "측정", "exam", "equipment"],
        "optometrist guiding a patient through an eye examination with modern equipment",
    ),
    (
        &["수술", "라식", "라섹", "회복", "surgery", "recovery"],
        "bright treatment room, patient relaxed after surgery, early recovery",
    ),
    (
        &["대기", "접수", "원무", "예약", "reception", "lobby"],
        "welcoming clinic lobby with the reception desk",
    ),
    (
        &["상담", "질문", "설명", "consult"],
        "staff member in a calm consultation with a patient",
    ),
];

const DEFAULT_SCENE: &str = "staff member in a calm consultation with a patient";

/// Image client errors
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image API key is not configured")]
    MissingApiKey,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Image API returned no image")]
    NoImage,
}

/// One generation call
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub prompt: String,
    pub size: String,
    pub seed: Option<u32>,
}

/// Anything that turns a prompt into an image URL
#[async_trait]
pub trait ImageBackend: Send + Sync {
    async fn generate(&self, request: ImageRequest) -> Result<String, ImageError>;
}

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    n: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u32>,
}

#[derive(Deserialize)]
struct WireResponse {
    #[serde(default)]
    data: Vec<WireImage>,
}

#[derive(Deserialize)]
struct WireImage {
    url: Option<String>,
    b64_json: Option<String>,
}

/// OpenAI-compatible `/v1/images/generations` client
pub struct OpenAiImageClient {
    http_client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl OpenAiImageClient {
    pub fn new(llm: &LlmConfig, image: &ImageConfig) -> Result<Self, ImageError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(llm.request_timeout_secs))
            .build()
            .map_err(|e| ImageError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key: llm.api_key.clone().filter(|k| !k.trim().is_empty()),
            base_url: llm.base_url.trim_end_matches('/').to_string(),
            model: image.model.clone(),
        })
    }
}

#[async_trait]
impl ImageBackend for OpenAiImageClient {
    async fn generate(&self, request: ImageRequest) -> Result<String, ImageError> {
        let api_key = self.api_key.as_deref().ok_or(ImageError::MissingApiKey)?;

        let body = WireRequest {
            model: &self.model,
            prompt: &request.prompt,
            size: &request.size,
            n: 1,
            seed: request.seed,
        };

        let response = self
            .http_client
            .post(format!("{}/v1/images/generations", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ImageError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ImageError::ApiError(status.as_u16(), error_text));
        }

        let parsed: WireResponse = response
            .json()
            .await
            .map_err(|e| ImageError::ParseError(e.to_string()))?;

        // Some models only return inline base64; show it as a data URL
        parsed
            .data
            .into_iter()
            .find_map(|img| {
                img.url
                    .or_else(|| img.b64_json.map(|b64| format!("data:image/png;base64,{}", b64)))
            })
            .ok_or(ImageError::NoImage)
    }
}

/// Scene for the draft: first scene whose terms occur in title or body
fn scene_for(draft: &Draft) -> &'static str {
    let text = format!("{} {}", draft.title, draft.content).to_lowercase();
    SCENES
        .iter()
        .find(|(terms, _)| terms.iter().any(|t| text.contains(t)))
        .map(|(_, scene)| *scene)
        .unwrap_or(DEFAULT_SCENE)
}

/// Descriptive prompt for the draft
pub fn build_image_prompt(draft: &Draft, config: &ImageConfig) -> String {
    format!(
        "{}, {}. Lighting: {}. Setting: {}. People: {}. Mood: {}. Blog post: \"{}\". No text or logos.",
        config.base_style,
        scene_for(draft),
        config.lighting,
        config.atmosphere,
        config.people,
        config.emotion,
        draft.title,
    )
}

/// Stock photo whose keywords occur in the prompt, else the first one
pub fn select_stock_image(prompt: &str, config: &ImageConfig) -> Option<ImageResult> {
    let lowered = prompt.to_lowercase();
    let stock = config
        .stock
        .iter()
        .find(|s| s.keywords.iter().any(|k| lowered.contains(&k.to_lowercase())))
        .or_else(|| config.stock.first())?;
    Some(ImageResult {
        url: stock.url.clone(),
        prompt: prompt.to_string(),
        description: stock.description.clone(),
        seed: None,
        source: ImageSource::Stock,
    })
}

fn url_key(url: &str) -> String {
    format!("{:x}", Sha256::digest(url.as_bytes()))
}

/// Style, composition and seed for one attempt
fn pick_variation(allow_seed: bool) -> (&'static str, &'static str, Option<u32>) {
    let mut rng = rand::thread_rng();
    let style = STYLE_MODIFIERS.choose(&mut rng).copied().unwrap_or(STYLE_MODIFIERS[0]);
    let composition = COMPOSITIONS.choose(&mut rng).copied().unwrap_or(COMPOSITIONS[0]);
    let seed = allow_seed.then(|| rng.gen_range(1..=2_000_000));
    (style, composition, seed)
}

/// Result of one image request
#[derive(Debug, Clone)]
pub struct ImageOutcome {
    pub variants: Vec<ImageResult>,
    pub used_stock: bool,
    pub warnings: Vec<String>,
}

/// Image generation stage
pub struct ImageGenerator {
    backend: Option<Arc<dyn ImageBackend>>,
    config: ImageConfig,
}

impl ImageGenerator {
    /// `backend` is ignored when the configured provider is `stock`
    pub fn new(backend: Option<Arc<dyn ImageBackend>>, config: ImageConfig) -> Self {
        Self { backend, config }
    }

    pub fn prompt_for(&self, draft: &Draft) -> String {
        build_image_prompt(draft, &self.config)
    }

    fn stock_outcome(&self, prompt: &str, mut warnings: Vec<String>) -> ImageOutcome {
        let variants: Vec<ImageResult> = select_stock_image(prompt, &self.config).into_iter().collect();
        if variants.is_empty() {
            warnings.push("No stock images are configured.".to_string());
        }
        ImageOutcome {
            variants,
            used_stock: true,
            warnings,
        }
    }

    /// Up to `n` distinct variants (n clamped to 1..=8); stock on failure
    pub async fn generate_variants(&self, prompt: &str, n: usize) -> ImageOutcome {
        let n = n.clamp(1, MAX_VARIANTS);
        let backend = match (&self.config.provider, &self.backend) {
            (ImageProvider::Api, Some(backend)) => backend,
            _ => {
                tracing::info!(stage = "image", "Using stock image provider");
                return self.stock_outcome(prompt, Vec::new());
            }
        };

        let mut seen = HashSet::new();
        let mut variants = Vec::new();
        let mut warnings = Vec::new();

        for attempt in 1..=n * 3 {
            let (style, composition, seed) = pick_variation(self.config.allow_seed);
            let full_prompt = format!("{} | {} | {}", prompt, style, composition);
            let request = ImageRequest {
                prompt: full_prompt.clone(),
                size: self.config.size.clone(),
                seed,
            };

            match backend.generate(request).await {
                Ok(url) => {
                    if !seen.insert(url_key(&url)) {
                        tracing::debug!(stage = "image", attempt, "Duplicate image skipped");
                        continue;
                    }
                    variants.push(ImageResult {
                        url,
                        prompt: full_prompt,
                        description: format!("{} ({})", style, composition),
                        seed,
                        source: ImageSource::Api,
                    });
                    if variants.len() >= n {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(stage = "image", attempt, error = %e, "Image generation failed");
                    warnings.push(format!("Image generation failed ({}).", e));
                    break;
                }
            }
        }

        tracing::info!(stage = "image", requested = n, generated = variants.len(), "Image variants ready");

        if variants.is_empty() {
            warnings.push("No image could be generated; a stock photo is shown instead.".to_string());
            return self.stock_outcome(prompt, warnings);
        }
        ImageOutcome {
            variants,
            used_stock: false,
            warnings,
        }
    }
}
