//! Stage services and external API clients
//!
//! Each stage owns its fallback: extraction, drafting and imaging never fail
//! outright, they return canned content plus a warning instead.

pub mod draft_writer;
pub mod image_generator;
pub mod ingest;
pub mod llm_client;
pub mod material_extractor;
pub mod samples;
pub mod style_checker;
pub mod wordpress_publisher;

pub use draft_writer::{infer_role_name_from_filename, DraftOutcome, DraftWriter, Outline, Speaker};
pub use image_generator::{
    build_image_prompt, select_stock_image, ImageBackend, ImageError, ImageGenerator, ImageOutcome,
    ImageRequest, OpenAiImageClient,
};
pub use ingest::{decode_upload, preview, validate_file_size, IngestError};
pub use llm_client::{ChatBackend, ChatMessage, ChatRequest, LlmError, OpenAiChatClient};
pub use material_extractor::{categorize, ExtractionOutcome, MaterialExtractor};
pub use style_checker::{analyze_style, extract_title, score_style};
pub use wordpress_publisher::{PublishError, PublishSettings, WordPressClient};
