//! Brand tone heuristics for drafts

use storyline_common::config::BrandConfig;

use crate::models::{Material, StyleReport};

fn ending_variety(text: &str, brand: &BrandConfig) -> usize {
    brand
        .sentence_endings
        .iter()
        .filter(|e| !e.is_empty() && text.contains(e.as_str()))
        .count()
}

fn has_any(text: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| !n.is_empty() && text.contains(n.as_str()))
}

/// Heuristic tone score in `[0.0, 1.0]`
pub fn score_style(text: &str, brand: &BrandConfig) -> f32 {
    let mut score: f32 = 0.5;
    if !brand.name.is_empty() && text.contains(&brand.name) {
        score += 0.2;
    }
    match ending_variety(text, brand) {
        n if n >= 4 => score += 0.2,
        n if n >= 2 => score += 0.1,
        _ => {}
    }
    if has_any(text, &brand.emotion_markers) {
        score += 0.1;
    }
    score.min(1.0)
}

fn head(text: &str, n: usize) -> String {
    text.chars().take(n).collect()
}

fn tail(text: &str, n: usize) -> String {
    let total = text.chars().count();
    text.chars().skip(total.saturating_sub(n)).collect()
}

fn outro_brand(brand: &BrandConfig) -> &str {
    if brand.stem.trim().is_empty() {
        &brand.name
    } else {
        &brand.stem
    }
}

/// Checklist breakdown behind the score
pub fn analyze_style(text: &str, brand: &BrandConfig) -> StyleReport {
    let has_brand = !brand.name.is_empty() && text.contains(&brand.name);
    StyleReport {
        has_intro: has_brand && head(text, 200).contains("입니다."),
        has_outro: text.contains(&brand.outro_marker) && tail(text, 200).contains(outro_brand(brand)),
        ending_variety: ending_variety(text, brand),
        has_emotions: has_any(text, &brand.emotion_markers),
        has_empathy: has_any(text, &brand.empathy_words),
    }
}

/// First `# ` heading, else the material title, else the configured default
pub fn extract_title(text: &str, material: Option<&Material>, brand: &BrandConfig) -> String {
    text.lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("# "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(|| {
            material
                .map(|m| m.title.trim().to_string())
                .filter(|t| !t.is_empty())
        })
        .unwrap_or_else(|| brand.default_title.clone())
}
