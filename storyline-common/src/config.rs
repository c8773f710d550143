//! Configuration model and TOML loading
//!
//! Every stage of the wizard reads from the single [`TomlConfig`] object. Each
//! section carries serde defaults, so a missing file, a missing section or a
//! missing key all resolve to a working configuration instead of a lookup
//! failure at request time.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root of `storyline.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub llm: LlmConfig,
    pub analysis: AnalysisConfig,
    pub draft: DraftConfig,
    pub brand: BrandConfig,
    pub image: ImageConfig,
    pub wordpress: WordPressConfig,
    pub upload: UploadConfig,
    pub auth: AuthConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 5780,
        }
    }
}

/// Logging configuration (used when `RUST_LOG` is not set)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `storyline_wizard=debug`
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "storyline_wizard=info,tower_http=info".to_string(),
        }
    }
}

/// Chat-completion API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Bearer token; normally supplied through `OPENAI_API_KEY`
    pub api_key: Option<String>,
    /// API root without the `/v1/...` suffix
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub request_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4o".to_string(),
            temperature: 0.7,
            top_p: 0.9,
            request_timeout_secs: 120,
        }
    }
}

/// Material extraction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Interview text beyond this many characters is cut before prompting
    pub max_chars: usize,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Fewer valid items than this and the sample set is used instead
    pub min_valid_items: usize,
    pub min_content_chars: usize,
    pub min_keywords: usize,
    pub rules: CategoryRules,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_chars: 15_000,
            temperature: 0.3,
            max_tokens: 4_000,
            min_valid_items: 4,
            min_content_chars: 120,
            min_keywords: 4,
            rules: CategoryRules::default(),
        }
    }
}

/// Keyword lists used to bucket materials into categories.
///
/// Rules are checked in field order; the first hit wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryRules {
    pub episode: Vec<String>,
    pub episode_audiences: Vec<String>,
    pub exam: Vec<String>,
    pub operations: Vec<String>,
    pub operations_roles: Vec<String>,
    pub growth: Vec<String>,
    pub growth_roles: Vec<String>,
    pub faq: Vec<String>,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self {
            episode: words(&[
                "수술", "회복", "후기", "변화", "감동", "울컥",
                "surgery", "recovery", "testimonial", "life-changing", "tears",
            ]),
            episode_audiences: words(&["예비 환자", "prospective patient"]),
            exam: words(&[
                "검사", "장비", "과정", "측정", "결과", "프로세스", "진단",
                "exam", "equipment", "procedure", "measurement", "diagnos",
            ]),
            operations: words(&[
                "운영", "분위기", "대기시간", "예약", "서비스", "시스템", "원무",
                "operations", "atmosphere", "waiting time", "booking", "front desk",
            ]),
            operations_roles: words(&["원무", "front desk"]),
            growth: words(&[
                "신입", "멘토", "멘토링", "교육", "배움", "첫 수술", "성장",
                "new hire", "mentor", "training", "growth",
            ]),
            growth_roles: words(&["신입", "new hire"]),
            faq: words(&[
                "질문", "언제", "가능", "방법", "주의", "faq", "자주 묻는",
                "question", "how long", "how to", "caution",
            ]),
        }
    }
}

/// Draft generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftConfig {
    pub temperature: f32,
    pub outline_max_tokens: u32,
    /// Material body beyond this many characters is cut before prompting
    pub material_max_chars: usize,
    /// Extra expansion calls allowed for a short draft (clamped to 1..=3)
    pub max_lengthen_passes: u32,
    /// Style score a draft needs before the image stage is suggested
    pub ready_min_score: f32,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            temperature: 0.9,
            outline_max_tokens: 1_200,
            material_max_chars: 8_000,
            max_lengthen_passes: 1,
            ready_min_score: 0.6,
        }
    }
}

impl DraftConfig {
    pub fn lengthen_passes(&self) -> u32 {
        self.max_lengthen_passes.clamp(1, 3)
    }
}

/// Brand voice checklist used by prompts and the style score
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandConfig {
    /// Phrase every post opens and closes with
    pub name: String,
    /// Short form of `name` the sign-off must mention; empty means `name`
    pub stem: String,
    pub default_title: String,
    /// Marker that starts the sign-off paragraph
    pub outro_marker: String,
    pub sentence_endings: Vec<String>,
    pub emotion_markers: Vec<String>,
    pub empathy_words: Vec<String>,
}

impl Default for BrandConfig {
    fn default() -> Self {
        Self {
            name: "BGN밝은눈안과(잠실점)".to_string(),
            stem: "BGN밝은눈안과".to_string(),
            default_title: "BGN 밝은눈안과의 따뜻한 이야기".to_string(),
            outro_marker: "이상으로".to_string(),
            sentence_endings: words(&["해요", "습니다", "죠", "거든요", "더라고요", "라고요", "네요"]),
            emotion_markers: words(&[":)", "ㅠㅠ", "...", "웃음이 나왔", "울컥했"]),
            empathy_words: words(&["괜찮", "이해", "마음", "공감", "함께"]),
        }
    }
}

/// Where illustrative images come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageProvider {
    /// Image generation API
    Api,
    /// Canned stock photo chosen by keyword
    Stock,
}

impl std::str::FromStr for ImageProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "api" => Ok(ImageProvider::Api),
            "stock" => Ok(ImageProvider::Stock),
            other => Err(Error::Config(format!("Unknown image provider: {}", other))),
        }
    }
}

/// One canned stock image; the defaults are placeholders served by the wizard itself
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockImage {
    /// Substrings looked up in the image prompt
    pub keywords: Vec<String>,
    pub url: String,
    pub description: String,
}

/// Image stage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub provider: ImageProvider,
    pub model: String,
    pub size: String,
    /// Variants generated per request (clamped to 1..=8)
    pub variants: u32,
    pub allow_seed: bool,
    pub base_style: String,
    pub lighting: String,
    pub atmosphere: String,
    pub people: String,
    pub emotion: String,
    pub stock: Vec<StockImage>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            provider: ImageProvider::Api,
            model: "gpt-image-1".to_string(),
            size: "1024x1024".to_string(),
            variants: 4,
            allow_seed: true,
            base_style: "warm and professional Korean medical photography".to_string(),
            lighting: "bright and natural".to_string(),
            atmosphere: "clean, modern and caring eye clinic".to_string(),
            people: "Korean patients and clinic staff".to_string(),
            emotion: "warm, trustworthy and professional interaction".to_string(),
            stock: vec![
                StockImage {
                    keywords: words(&["examination", "eye exam", "equipment"]),
                    url: "/static/stock/exam.svg".to_string(),
                    description: "Optometrist running an eye examination".to_string(),
                },
                StockImage {
                    keywords: words(&["consultation", "conversation", "counsel"]),
                    url: "/static/stock/consultation.svg".to_string(),
                    description: "Staff member talking with a patient".to_string(),
                },
                StockImage {
                    keywords: words(&["surgery", "treatment", "recovery"]),
                    url: "/static/stock/treatment.svg".to_string(),
                    description: "Bright treatment room".to_string(),
                },
                StockImage {
                    keywords: words(&["lobby", "reception", "interior"]),
                    url: "/static/stock/reception.svg".to_string(),
                    description: "Clean clinic reception area".to_string(),
                },
            ],
        }
    }
}

/// WordPress REST settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WordPressConfig {
    /// Site root, e.g. `https://blog.example.com/`
    pub url: Option<String>,
    pub username: Option<String>,
    pub application_password: Option<String>,
    pub default_status: String,
    /// Category term IDs
    pub default_categories: Vec<u64>,
    /// Tag term IDs
    pub default_tags: Vec<u64>,
    pub timeout_secs: u64,
}

impl Default for WordPressConfig {
    fn default() -> Self {
        Self {
            url: None,
            username: None,
            application_password: None,
            default_status: "draft".to_string(),
            default_categories: Vec::new(),
            default_tags: Vec::new(),
            timeout_secs: 30,
        }
    }
}

/// Upload limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub max_size_mb: u64,
    pub preview_chars: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_size_mb: 10,
            preview_chars: 500,
        }
    }
}

/// Login session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub session_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: 24,
        }
    }
}

/// Default location of the user's config file: `~/.config/storyline/storyline.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("storyline").join("storyline.toml"))
}

/// Load and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    parse_toml_config(&content)
}

/// Parse TOML text into a config, applying defaults for anything absent
pub fn parse_toml_config(content: &str) -> Result<TomlConfig> {
    toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
}
