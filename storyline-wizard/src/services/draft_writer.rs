//! Blog draft generation
//!
//! Three kinds of LLM calls, in order:
//! 1. outline (JSON), replaced by a fixed outline when unreadable
//! 2. full draft from the outline and the material
//! 3. lengthen passes while the draft is shorter than the length preset
//!
//! A failed call degrades to the sample draft with a warning.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use storyline_common::config::{BrandConfig, DraftConfig};

use crate::models::{count_chars, Draft, DraftOptions, DraftSource, LengthPreset, Material};
use crate::services::llm_client::{parse_json_object, ChatBackend, ChatRequest, LlmError};
use crate::services::{samples, style_checker};

/// Lengthen passes never run hotter than this
const LENGTHEN_MAX_TEMPERATURE: f32 = 0.8;

/// One H2 block of the outline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineSection {
    pub h2: String,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(default)]
    pub h3: Vec<String>,
}

/// Post outline returned by the first call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub h2_sections: Vec<OutlineSection>,
}

impl Outline {
    /// Five fixed sections titled after the material
    pub fn fallback(material: &Material) -> Self {
        Self {
            title: material.title.clone(),
            h2_sections: samples::FALLBACK_SECTIONS
                .iter()
                .map(|h2| OutlineSection {
                    h2: h2.to_string(),
                    bullets: Vec::new(),
                    h3: Vec::new(),
                })
                .collect(),
        }
    }

    /// Parse model output; `None` when no usable outline is inside
    pub fn parse(response: &str) -> Option<Self> {
        let value = parse_json_object(response).ok()?;
        let outline: Outline = serde_json::from_value(value).ok()?;
        (!outline.h2_sections.is_empty()).then_some(outline)
    }
}

/// `검안사_김서연_인터뷰.txt` → `("검안사", "김서연")`
///
/// The file stem is split on `_` and `-`; the first two parts are role and
/// name. Directory components of either separator style are ignored.
pub fn infer_role_name_from_filename(filename: &str) -> Option<(String, String)> {
    let base = filename
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename);
    let stem = Path::new(base).file_stem()?.to_str()?;
    let mut parts = stem.split(['_', '-']).filter(|p| !p.is_empty());
    let role = parts.next()?;
    let name = parts.next()?;
    Some((role.to_string(), name.to_string()))
}

/// Speaker the post is written as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Speaker {
    pub role: String,
    pub name: String,
}

impl Speaker {
    /// Preset speaker, overridden by a `role_name_*` upload file name
    pub fn for_options(options: &DraftOptions) -> Self {
        if let Some((role, name)) = options
            .source_filename
            .as_deref()
            .and_then(infer_role_name_from_filename)
        {
            return Self { role, name };
        }
        Self {
            role: options.style.role().to_string(),
            name: options.style.default_name().to_string(),
        }
    }
}

/// Draft plus the notes gathered while producing it
#[derive(Debug, Clone)]
pub struct DraftOutcome {
    pub draft: Draft,
    pub warnings: Vec<String>,
    /// LLM calls made (outline + draft + lengthen passes)
    pub llm_calls: u32,
    /// Why the sample draft replaced the model's, when it did
    pub error: Option<String>,
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Draft generation stage
pub struct DraftWriter {
    llm: Arc<dyn ChatBackend>,
    config: DraftConfig,
    brand: BrandConfig,
    top_p: f32,
}

impl DraftWriter {
    pub fn new(llm: Arc<dyn ChatBackend>, config: DraftConfig, brand: BrandConfig, top_p: f32) -> Self {
        Self {
            llm,
            config,
            brand,
            top_p,
        }
    }

    /// Build a [`Draft`] from finished text: title, count and score are derived
    pub fn finish(
        &self,
        content: String,
        material: Option<&Material>,
        source: DraftSource,
        length: LengthPreset,
        lengthen_passes: u32,
    ) -> Draft {
        Draft {
            title: style_checker::extract_title(&content, material, &self.brand),
            char_count: count_chars(&content),
            style_score: style_checker::score_style(&content, &self.brand),
            style_report: style_checker::analyze_style(&content, &self.brand),
            lengthen_passes,
            source,
            length,
            content,
        }
    }

    /// A user edit; count and score are recomputed, a blank title is re-derived
    pub fn edited(
        &self,
        title: &str,
        content: String,
        material: Option<&Material>,
        length: LengthPreset,
    ) -> Draft {
        let mut draft = self.finish(content, material, DraftSource::Edited, length, 0);
        if !title.trim().is_empty() {
            draft.title = title.trim().to_string();
        }
        draft
    }

    /// Sample post for the material, no API involved
    pub fn sample(&self, material: &Material, options: &DraftOptions) -> Draft {
        let speaker = Speaker::for_options(options);
        let text = samples::sample_draft(material, &self.brand.name, &speaker.role, &speaker.name);
        self.finish(text, Some(material), DraftSource::Sample, options.length, 0)
    }

    fn outline_request(&self, material: &Material, options: &DraftOptions, speaker: &Speaker) -> ChatRequest {
        let extra = if options.additional_request.trim().is_empty() {
            "none"
        } else {
            options.additional_request.trim()
        };
        let prompt = format!(
            r#"Write a blog outline from the material below.
- Clinic: {brand}
- Speaker: {role} {name} (first person)
- Minimum length: {min_chars} characters
- Mood: warm and professional, no exaggeration or sales pitch
- Style: {style} ({tone})
- Material title: {title}
- Key content: {content}
- Usage point: {usage}
- Additional request: {extra}

Output only a JSON outline with H2/H3 headings.
Fields: title, h2_sections[{{"h2": str, "bullets": [str], "h3": [str]}}]"#,
            brand = self.brand.name,
            role = speaker.role,
            name = speaker.name,
            min_chars = options.length.min_chars(),
            style = options.style.label(),
            tone = options.style.tone(),
            title = material.title,
            content = material.content,
            usage = material.usage_point,
            extra = extra,
        );
        ChatRequest::new("Concise editor. Output JSON only.", prompt)
            .temperature(self.config.temperature)
            .top_p(self.top_p)
            .max_tokens(self.config.outline_max_tokens)
    }

    fn draft_request(
        &self,
        outline: &Outline,
        material: &Material,
        options: &DraftOptions,
        speaker: &Speaker,
    ) -> ChatRequest {
        let outline_json = serde_json::to_string(outline).unwrap_or_default();
        let keywords: Vec<&str> = material.keywords.iter().take(8).map(String::as_str).collect();
        let mut tone_rules = Vec::new();
        if options.use_emotions {
            tone_rules.push("- Let small emotional moments show (a laugh, a lump in the throat)");
        }
        if options.use_casual_talk {
            tone_rules.push("- Conversational Korean endings are welcome");
        }
        if options.use_empathy {
            tone_rules.push("- Speak to readers with the same worries");
        }
        let prompt = format!(
            r#"Write a Korean blog draft from the outline and material below.

Rules:
- Open with: "안녕하세요, {brand} {role} {name}입니다."
- Close with a paragraph starting "{outro} {brand} {role} {name}"
- Keep the first person, no exaggeration or sales pitch
- Target length: about {target} characters
- Keep the H2/H3 structure, with the title as a '# ' heading
- Stay with what the interview actually says; general medical background is fine, efficacy claims are not
{tone_rules}

Outline JSON:
{outline_json}

Material:
- Title: {title}
- Content: {content}
- Keywords: {keywords}"#,
            brand = self.brand.name,
            role = speaker.role,
            name = speaker.name,
            outro = self.brand.outro_marker,
            target = options.length.target_chars(),
            tone_rules = tone_rules.join("\n"),
            outline_json = outline_json,
            title = material.title,
            content = material.content,
            keywords = keywords.join(", "),
        );
        ChatRequest::new("Warm, plain-spoken medical content writer.", prompt)
            .temperature(self.config.temperature)
            .top_p(self.top_p)
            .max_tokens(options.length.max_tokens())
    }

    fn lengthen_request(&self, text: &str, shortage: usize, options: &DraftOptions, speaker: &Speaker) -> ChatRequest {
        let prompt = format!(
            r#"Expand the post below in the same voice.
- Clinic: {brand}
- Speaker: {role} {name}, first person
- Goal: add at least {shortage} characters of concrete detail and experience without repetition
- Avoid: definitive treatment claims, testimonial-style promotion, heavy emoticons
- Keep: the existing sentences and flow

Post:
{text}"#,
            brand = self.brand.name,
            role = speaker.role,
            name = speaker.name,
            shortage = shortage,
            text = text,
        );
        ChatRequest::new("Careful copy editor.", prompt)
            .temperature(self.config.temperature.min(LENGTHEN_MAX_TEMPERATURE))
            .top_p(self.top_p)
            .max_tokens(options.length.max_tokens())
    }

    async fn generate_with_llm(
        &self,
        material: &Material,
        options: &DraftOptions,
        speaker: &Speaker,
        warnings: &mut Vec<String>,
        calls: &mut u32,
    ) -> Result<Draft, LlmError> {
        *calls += 1;
        let response = self.llm.complete(self.outline_request(material, options, speaker)).await?;
        let outline = Outline::parse(&response).unwrap_or_else(|| {
            tracing::warn!(stage = "draft", "Outline unreadable, using the default sections");
            warnings.push("The outline could not be read; the default five sections were used.".to_string());
            Outline::fallback(material)
        });

        *calls += 1;
        let mut text = self
            .llm
            .complete(self.draft_request(&outline, material, options, speaker))
            .await?;

        let min_chars = options.length.min_chars();
        let mut passes = 0;
        while count_chars(&text) < min_chars && passes < self.config.lengthen_passes() {
            let shortage = min_chars - count_chars(&text);
            tracing::info!(
                stage = "draft",
                attempt = passes + 1,
                chars = count_chars(&text),
                shortage,
                "Draft short, lengthening"
            );
            *calls += 1;
            text = self
                .llm
                .complete(self.lengthen_request(&text, shortage, options, speaker))
                .await?;
            passes += 1;
        }

        if count_chars(&text) < min_chars {
            warnings.push(format!(
                "The draft has {} characters, below the {} character target.",
                count_chars(&text),
                min_chars
            ));
        }

        Ok(self.finish(text, Some(material), DraftSource::Llm, options.length, passes))
    }

    /// Generate a draft for the selected material
    pub async fn generate(&self, material: &Material, options: &DraftOptions) -> DraftOutcome {
        let speaker = Speaker::for_options(options);
        let mut material = material.clone();
        if count_chars(&material.content) > self.config.material_max_chars {
            material.content = truncate_chars(&material.content, self.config.material_max_chars);
        }

        tracing::info!(
            stage = "draft",
            role = %speaker.role,
            length = ?options.length,
            min_chars = options.length.min_chars(),
            "Generating draft"
        );

        let mut warnings = Vec::new();
        let mut llm_calls = 0;
        let mut error = None;
        let draft = match self
            .generate_with_llm(&material, options, &speaker, &mut warnings, &mut llm_calls)
            .await
        {
            Ok(draft) => draft,
            Err(e) => {
                tracing::warn!(stage = "draft", error = %e, "Draft generation failed, using sample draft");
                warnings.push(format!("Draft generation failed ({}); a sample draft is shown instead.", e));
                error = Some(format!("Draft generation failed: {}", e));
                self.sample(&material, options)
            }
        };

        tracing::info!(
            stage = "draft",
            chars = draft.char_count,
            score = draft.style_score,
            passes = draft.lengthen_passes,
            "Draft ready"
        );

        DraftOutcome {
            draft,
            warnings,
            llm_calls,
            error,
        }
    }
}
