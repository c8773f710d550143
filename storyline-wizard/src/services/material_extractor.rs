//! Blog material extraction
//!
//! One LLM call turns the interview into candidate materials, which are
//! validated against the interview text and bucketed into the five
//! [`MaterialCategory`] tabs by keyword rules. Any failure along the way
//! degrades to the canned sample set; this stage never returns an error.

use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use storyline_common::config::{AnalysisConfig, CategoryRules};

use crate::models::{CategorizedMaterials, Material, MaterialCategory};
use crate::services::llm_client::{parse_json_object, ChatBackend, ChatRequest, LlmError};
use crate::services::samples;

/// Top-level keys the item list may live under
const ITEM_KEYS: [&str; 2] = ["materials", "키워드 기반 소재"];

const SYSTEM_PROMPT: &str = "You are a content planner for a clinic blog. \
    Reply with a single JSON object and nothing else.";

/// Result of one extraction run
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    pub materials: CategorizedMaterials,
    /// The sample set was used instead of LLM output
    pub used_fallback: bool,
    /// Items that passed validation (0 on fallback)
    pub valid_items: usize,
    /// User-facing notes (truncation, fallback reason)
    pub warnings: Vec<String>,
}

/// Item as the model returns it; every field optional until validated
#[derive(Debug, Deserialize)]
struct RawMaterial {
    title: Option<String>,
    content: Option<String>,
    keywords: Option<Vec<String>>,
    timestamp: Option<String>,
    usage_point: Option<String>,
    staff_perspective: Option<String>,
    target_audience: Option<String>,
    direct_quote: Option<String>,
    source_quote: Option<String>,
    evidence_span: Option<Vec<i64>>,
}

fn required(field: &str, value: Option<String>) -> Result<String, String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(format!("missing field `{}`", field)),
    }
}

/// Check one raw item and turn it into a [`Material`]
pub fn validate_material(item: &Value, config: &AnalysisConfig) -> Result<Material, String> {
    let raw: RawMaterial =
        serde_json::from_value(item.clone()).map_err(|e| format!("malformed item: {}", e))?;

    let title = required("title", raw.title)?;
    let content = required("content", raw.content)?;
    let usage_point = required("usage_point", raw.usage_point)?;
    let staff_perspective = required("staff_perspective", raw.staff_perspective)?;
    let source_quote = required("source_quote", raw.source_quote)?;
    let keywords: Vec<String> = raw
        .keywords
        .ok_or_else(|| "missing field `keywords`".to_string())?
        .into_iter()
        .filter(|k| !k.trim().is_empty())
        .collect();

    let content_chars = content.chars().count();
    if content_chars < config.min_content_chars {
        return Err(format!(
            "content too short ({} < {} chars)",
            content_chars, config.min_content_chars
        ));
    }
    if keywords.len() < config.min_keywords {
        return Err(format!(
            "too few keywords ({} < {})",
            keywords.len(),
            config.min_keywords
        ));
    }
    if !content.contains(&source_quote) {
        return Err("source_quote does not occur in content".to_string());
    }

    let span = raw
        .evidence_span
        .ok_or_else(|| "missing field `evidence_span`".to_string())?;
    let evidence_span = check_evidence_span(&span, &content, &source_quote)?;

    Ok(Material {
        title,
        content,
        keywords,
        timestamp: raw.timestamp.filter(|t| !t.trim().is_empty()),
        usage_point,
        staff_perspective,
        target_audience: raw.target_audience.filter(|t| !t.trim().is_empty()),
        direct_quote: raw.direct_quote.filter(|t| !t.trim().is_empty()),
        source_quote,
        evidence_span: Some(evidence_span),
        category: None,
    })
}

/// `[start, end)` in characters, which must slice `content` to exactly `quote`
fn check_evidence_span(span: &[i64], content: &str, quote: &str) -> Result<[usize; 2], String> {
    let [start, end] = span else {
        return Err(format!("evidence_span needs 2 entries, got {}", span.len()));
    };
    let total = content.chars().count() as i64;
    if *start < 0 || start >= end || *end > total {
        return Err(format!("evidence_span [{}, {}) out of range", start, end));
    }
    let (start, end) = (*start as usize, *end as usize);
    let slice: String = content.chars().skip(start).take(end - start).collect();
    if slice != quote {
        return Err("evidence_span does not match source_quote".to_string());
    }
    Ok([start, end])
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles
        .iter()
        .any(|n| !n.is_empty() && haystack.contains(&n.to_lowercase()))
}

/// Pick the category for a material; first matching rule wins
pub fn categorize(material: &Material, rules: &CategoryRules) -> MaterialCategory {
    let text = format!(
        "{} {} {}",
        material.title,
        material.content,
        material.keywords.join(", ")
    )
    .to_lowercase();
    let audience = material
        .target_audience
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();
    let role = material.staff_perspective.to_lowercase();

    if contains_any(&text, &rules.episode) || contains_any(&audience, &rules.episode_audiences) {
        MaterialCategory::PatientEpisode
    } else if contains_any(&text, &rules.exam) {
        MaterialCategory::ExamProcedure
    } else if contains_any(&text, &rules.operations) || contains_any(&role, &rules.operations_roles)
    {
        MaterialCategory::CenterOperations
    } else if contains_any(&text, &rules.growth) || contains_any(&role, &rules.growth_roles) {
        MaterialCategory::StaffGrowth
    } else if contains_any(&text, &rules.faq) {
        MaterialCategory::PatientFaq
    } else {
        MaterialCategory::PatientEpisode
    }
}

/// Bucket materials; the result always holds all five categories
pub fn categorize_all(materials: Vec<Material>, rules: &CategoryRules) -> CategorizedMaterials {
    let mut buckets = CategorizedMaterials::new();
    for material in materials {
        let category = categorize(&material, rules);
        buckets.push(category, material);
    }
    buckets
}

/// Item list from a model response
pub fn parse_items(response: &str) -> Result<Vec<Value>, LlmError> {
    let root = parse_json_object(response)?;
    ITEM_KEYS
        .iter()
        .find_map(|key| root.get(*key).and_then(Value::as_array).cloned())
        .ok_or_else(|| LlmError::ParseError("no `materials` array in response".to_string()))
}

fn build_prompt(interview: &str, config: &AnalysisConfig) -> String {
    format!(
        r#"Read the staff interview below and propose blog materials for the clinic blog.

Return JSON of the form:
{{"materials": [{{
  "title": "one-line topic",
  "content": "at least {min_chars} characters, written in Korean, quoting the interview",
  "keywords": ["at least {min_keywords} keywords"],
  "timestamp": "where in the interview (optional)",
  "usage_point": "how the post should use this material",
  "staff_perspective": "role of the speaker",
  "target_audience": "who the post is for (optional)",
  "direct_quote": "memorable line (optional)",
  "source_quote": "a sentence copied verbatim from content",
  "evidence_span": [start, end]
}}]}}

Rules:
- Only use facts present in the interview.
- source_quote must appear inside content exactly; evidence_span is its character range in content.
- Cover patient episodes, exams and procedures, clinic operations, staff growth and patient questions where the interview allows.

Interview:
{interview}"#,
        min_chars = config.min_content_chars,
        min_keywords = config.min_keywords,
        interview = interview,
    )
}

/// Cut `text` to `max_chars` characters
fn truncate_chars(text: &str, max_chars: usize) -> Option<&str> {
    text.char_indices().nth(max_chars).map(|(idx, _)| &text[..idx])
}

/// Material extraction stage
pub struct MaterialExtractor {
    llm: Arc<dyn ChatBackend>,
    config: AnalysisConfig,
}

impl MaterialExtractor {
    pub fn new(llm: Arc<dyn ChatBackend>, config: AnalysisConfig) -> Self {
        Self { llm, config }
    }

    /// The sample set, bucketed with the configured rules
    pub fn fallback(&self) -> CategorizedMaterials {
        categorize_all(samples::fallback_materials(), &self.config.rules)
    }

    fn fallback_outcome(&self, mut warnings: Vec<String>, reason: String) -> ExtractionOutcome {
        tracing::warn!(stage = "materials", reason = %reason, "Using fallback materials");
        warnings.push(format!("{}; showing sample materials instead.", reason));
        ExtractionOutcome {
            materials: self.fallback(),
            used_fallback: true,
            valid_items: 0,
            warnings,
        }
    }

    /// Run extraction over the interview text
    pub async fn extract(&self, interview: &str) -> ExtractionOutcome {
        let mut warnings = Vec::new();
        let text = match truncate_chars(interview, self.config.max_chars) {
            Some(cut) => {
                warnings.push(format!(
                    "The interview is longer than {} characters; only the beginning was analyzed.",
                    self.config.max_chars
                ));
                cut
            }
            None => interview,
        };

        tracing::info!(stage = "materials", chars = text.chars().count(), "Extracting materials");

        let request = ChatRequest::new(SYSTEM_PROMPT, build_prompt(text, &self.config))
            .temperature(self.config.temperature)
            .max_tokens(self.config.max_tokens);

        let response = match self.llm.complete(request).await {
            Ok(response) => response,
            Err(e) => return self.fallback_outcome(warnings, format!("Material extraction failed ({})", e)),
        };

        let items = match parse_items(&response) {
            Ok(items) => items,
            Err(e) => return self.fallback_outcome(warnings, format!("Could not read the model output ({})", e)),
        };

        let mut valid = Vec::new();
        for (idx, item) in items.iter().enumerate() {
            match validate_material(item, &self.config) {
                Ok(material) => valid.push(material),
                Err(reason) => tracing::debug!(stage = "materials", item = idx, reason = %reason, "Dropping item"),
            }
        }

        tracing::info!(
            stage = "materials",
            returned = items.len(),
            valid = valid.len(),
            "Validated extracted materials"
        );

        if valid.len() < self.config.min_valid_items {
            return self.fallback_outcome(
                warnings,
                format!(
                    "Only {} usable materials found (need {})",
                    valid.len(),
                    self.config.min_valid_items
                ),
            );
        }

        let valid_items = valid.len();
        let materials = categorize_all(valid, &self.config.rules);
        if materials.is_all_empty() {
            return self.fallback_outcome(warnings, "No materials could be categorized".to_string());
        }

        ExtractionOutcome {
            materials,
            used_fallback: false,
            valid_items,
            warnings,
        }
    }
}
