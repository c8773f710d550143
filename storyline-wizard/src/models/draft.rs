//! Blog draft and the options that shape it

use serde::{Deserialize, Serialize};

/// Character count as the reader sees it (Unicode scalar values, not bytes)
pub fn count_chars(text: &str) -> usize {
    text.chars().count()
}

/// Staff voice the post is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StylePreset {
    /// Optometrist's everyday stories, friendly first person
    #[default]
    OptometristDiary,
    /// Nurse's warm care story
    NurseCare,
    /// Front desk customer episodes
    FrontDeskEpisode,
    /// Physician's professional yet warm advice
    PhysicianAdvice,
}

impl StylePreset {
    pub const ALL: [StylePreset; 4] = [
        StylePreset::OptometristDiary,
        StylePreset::NurseCare,
        StylePreset::FrontDeskEpisode,
        StylePreset::PhysicianAdvice,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StylePreset::OptometristDiary => "검안사의 일상 경험담 (친근한 1인칭)",
            StylePreset::NurseCare => "간호사의 따뜻한 케어 스토리",
            StylePreset::FrontDeskEpisode => "원무팀의 고객 응대 에피소드",
            StylePreset::PhysicianAdvice => "의료진의 전문적이면서도 따뜻한 조언",
        }
    }

    /// Speaker role
    pub fn role(&self) -> &'static str {
        match self {
            StylePreset::OptometristDiary => "검안사",
            StylePreset::NurseCare => "간호사",
            StylePreset::FrontDeskEpisode => "원무팀",
            StylePreset::PhysicianAdvice => "의료진",
        }
    }

    /// Default speaker name for the role
    pub fn default_name(&self) -> &'static str {
        match self {
            StylePreset::OptometristDiary => "김서연",
            StylePreset::NurseCare => "박지현",
            StylePreset::FrontDeskEpisode => "이미소",
            StylePreset::PhysicianAdvice => "정하늘",
        }
    }

    pub fn tone(&self) -> &'static str {
        match self {
            StylePreset::OptometristDiary => "professional yet friendly",
            StylePreset::NurseCare => "warm and attentive",
            StylePreset::FrontDeskEpisode => "friendly and trustworthy",
            StylePreset::PhysicianAdvice => "professional but warm",
        }
    }
}

/// Length tier: minimum characters, target characters, token budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthPreset {
    #[default]
    Standard,
    High,
    Premium,
}

impl LengthPreset {
    pub const ALL: [LengthPreset; 3] = [LengthPreset::Standard, LengthPreset::High, LengthPreset::Premium];

    pub fn label(&self) -> &'static str {
        match self {
            LengthPreset::Standard => "Standard (2,000+ chars)",
            LengthPreset::High => "High quality (2,500+ chars)",
            LengthPreset::Premium => "Premium (3,000+ chars)",
        }
    }

    pub fn min_chars(&self) -> usize {
        match self {
            LengthPreset::Standard => 2_000,
            LengthPreset::High => 2_500,
            LengthPreset::Premium => 3_000,
        }
    }

    pub fn target_chars(&self) -> usize {
        self.min_chars() + 200
    }

    pub fn max_tokens(&self) -> u32 {
        match self {
            LengthPreset::Standard => 3_500,
            LengthPreset::High => 4_000,
            LengthPreset::Premium => 4_500,
        }
    }
}

/// User choices for the draft stage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftOptions {
    pub style: StylePreset,
    pub length: LengthPreset,
    pub additional_request: String,
    pub use_emotions: bool,
    pub use_casual_talk: bool,
    pub use_empathy: bool,
    /// Uploaded file name; `role_name_*.ext` overrides the speaker
    pub source_filename: Option<String>,
}

impl Default for DraftOptions {
    fn default() -> Self {
        Self {
            style: StylePreset::default(),
            length: LengthPreset::default(),
            additional_request: String::new(),
            use_emotions: true,
            use_casual_talk: true,
            use_empathy: true,
            source_filename: None,
        }
    }
}

/// Result of the stylistic checklist
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleReport {
    pub has_intro: bool,
    pub has_outro: bool,
    /// Distinct configured sentence endings found
    pub ending_variety: usize,
    pub has_emotions: bool,
    pub has_empathy: bool,
}

/// How the current draft text came to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftSource {
    Llm,
    Sample,
    Edited,
}

/// Blog draft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub title: String,
    pub content: String,
    pub char_count: usize,
    /// Heuristic tone score, 0.0-1.0
    pub style_score: f32,
    pub style_report: StyleReport,
    /// Lengthen calls spent on this draft
    pub lengthen_passes: u32,
    pub source: DraftSource,
    /// Length tier the draft was written for; edits keep it
    #[serde(default)]
    pub length: LengthPreset,
}

impl Draft {
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn min_chars(&self) -> usize {
        self.length.min_chars()
    }

    /// Long enough for its length tier and on-tone enough to move on to the image stage
    pub fn ready_for_image(&self, min_score: f32) -> bool {
        self.char_count >= self.min_chars() && self.style_score >= min_score
    }
}
