//! Blog materials extracted from an interview

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The five fixed content categories.
///
/// Extractor output, tab rendering and selection all go through this enum,
/// so producer and consumer can never disagree on a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MaterialCategory {
    #[serde(rename = "Patient Episode")]
    PatientEpisode,
    #[serde(rename = "Exam & Procedure")]
    ExamProcedure,
    #[serde(rename = "Center Operations")]
    CenterOperations,
    #[serde(rename = "Staff Growth")]
    StaffGrowth,
    #[serde(rename = "Patient FAQ")]
    PatientFaq,
}

impl MaterialCategory {
    /// All categories in tab order
    pub const ALL: [MaterialCategory; 5] = [
        MaterialCategory::PatientEpisode,
        MaterialCategory::ExamProcedure,
        MaterialCategory::CenterOperations,
        MaterialCategory::StaffGrowth,
        MaterialCategory::PatientFaq,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MaterialCategory::PatientEpisode => "Patient Episode",
            MaterialCategory::ExamProcedure => "Exam & Procedure",
            MaterialCategory::CenterOperations => "Center Operations",
            MaterialCategory::StaffGrowth => "Staff Growth",
            MaterialCategory::PatientFaq => "Patient FAQ",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MaterialCategory::PatientEpisode => "Real treatment stories and memorable patient cases",
            MaterialCategory::ExamProcedure => "Exams, procedures and equipment seen from the patient's side",
            MaterialCategory::CenterOperations => "Clinic culture, services and day-to-day atmosphere",
            MaterialCategory::StaffGrowth => "Mistakes, lessons, mentoring and teamwork",
            MaterialCategory::PatientFaq => "Questions patients ask most and friendly answers",
        }
    }
}

impl std::fmt::Display for MaterialCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One validated material item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub title: String,
    pub content: String,
    pub keywords: Vec<String>,
    /// Interview segment, e.g. "first 10-15 minutes"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub usage_point: String,
    /// Attribution role (optometrist, nurse, front desk, ...)
    pub staff_perspective: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_quote: Option<String>,
    /// Interview sentence backing this material
    pub source_quote: String,
    /// Character range of `source_quote` inside `content`; always set on
    /// extracted items, absent on the canned samples
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_span: Option<[usize; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<MaterialCategory>,
}

/// Materials bucketed by category; always holds all five keys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorizedMaterials(BTreeMap<MaterialCategory, Vec<Material>>);

impl Default for CategorizedMaterials {
    fn default() -> Self {
        Self::new()
    }
}

impl CategorizedMaterials {
    pub fn new() -> Self {
        Self(MaterialCategory::ALL.into_iter().map(|c| (c, Vec::new())).collect())
    }

    /// Append a material to a bucket, stamping its category
    pub fn push(&mut self, category: MaterialCategory, mut material: Material) {
        material.category = Some(category);
        self.0.entry(category).or_default().push(material);
    }

    pub fn get(&self, category: MaterialCategory) -> &[Material] {
        self.0.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn categories(&self) -> impl Iterator<Item = MaterialCategory> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MaterialCategory, &[Material])> {
        self.0.iter().map(|(c, items)| (*c, items.as_slice()))
    }

    pub fn total(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_all_empty(&self) -> bool {
        self.total() == 0
    }
}

/// The material the user picked for drafting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedMaterial {
    pub category: MaterialCategory,
    /// Zero-based position inside the category
    pub index: usize,
    pub material: Material,
}
