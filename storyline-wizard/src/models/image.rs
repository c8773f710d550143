//! Illustrative image for the post

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSource {
    /// Produced by the image generation API
    Api,
    /// Canned stock photo
    Stock,
}

/// Image shown next to the draft (preview only, never uploaded as media)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageResult {
    pub url: String,
    pub prompt: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
    pub source: ImageSource,
}
