//! Wizard workflow state
//!
//! Five stages, strictly linear:
//! UPLOAD → MATERIALS → DRAFT → IMAGE → PUBLISH
//!
//! Every artifact is an `Option`, so a stage that has not run yet reads as
//! `None` rather than failing on a missing key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    CategorizedMaterials, Draft, ImageResult, IngestedFile, PublishResult, SelectedMaterial,
};

/// Wizard stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Stage {
    /// Interview upload
    Upload,
    /// Material extraction and selection
    Materials,
    /// Draft generation and editing
    Draft,
    /// Illustrative image
    Image,
    /// WordPress publish
    Publish,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Upload,
        Stage::Materials,
        Stage::Draft,
        Stage::Image,
        Stage::Publish,
    ];

    /// 1-based stage number
    pub fn number(&self) -> u8 {
        match self {
            Stage::Upload => 1,
            Stage::Materials => 2,
            Stage::Draft => 3,
            Stage::Image => 4,
            Stage::Publish => 5,
        }
    }

    /// Stage for a 1-based number, clamped into 1..=5
    pub fn from_number_clamped(n: i64) -> Stage {
        let idx = n.clamp(1, 5) as usize - 1;
        Self::ALL[idx]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Stage::Upload => "1. Upload interview",
            Stage::Materials => "2. Find blog materials",
            Stage::Draft => "3. Write the post",
            Stage::Image => "4. Generate image",
            Stage::Publish => "5. Publish to WordPress",
        }
    }
}

/// Labels for the sidebar, in stage order
pub fn step_labels() -> Vec<&'static str> {
    Stage::ALL.iter().map(Stage::label).collect()
}

/// Stage change record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageTransition {
    pub old_stage: Stage,
    pub new_stage: Stage,
    pub transitioned_at: DateTime<Utc>,
}

/// Per-session workflow state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowState {
    pub stage: Stage,
    pub interview: Option<IngestedFile>,
    pub materials: Option<CategorizedMaterials>,
    pub materials_from_fallback: bool,
    pub selected_material: Option<SelectedMaterial>,
    pub draft: Option<Draft>,
    pub image_variants: Vec<ImageResult>,
    pub image: Option<ImageResult>,
    pub publish_result: Option<PublishResult>,
    /// Most recent user-facing warning (fallback used, input truncated, ...)
    pub last_warning: Option<String>,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowState {
    pub fn new() -> Self {
        Self {
            stage: Stage::Upload,
            interview: None,
            materials: None,
            materials_from_fallback: false,
            selected_material: None,
            draft: None,
            image_variants: Vec::new(),
            image: None,
            publish_result: None,
            last_warning: None,
        }
    }

    fn transition_to(&mut self, new_stage: Stage) -> StageTransition {
        let transition = StageTransition {
            old_stage: self.stage,
            new_stage,
            transitioned_at: Utc::now(),
        };
        self.stage = new_stage;
        transition
    }

    /// Advance one stage (stays on PUBLISH)
    pub fn next_step(&mut self) -> StageTransition {
        let next = Stage::from_number_clamped(self.stage.number() as i64 + 1);
        self.transition_to(next)
    }

    /// Go back one stage (stays on UPLOAD)
    pub fn previous_step(&mut self) -> StageTransition {
        let prev = Stage::from_number_clamped(self.stage.number() as i64 - 1);
        self.transition_to(prev)
    }

    /// Jump to a 1-based stage number, clamped into range
    pub fn move_to_step(&mut self, n: i64) -> StageTransition {
        self.transition_to(Stage::from_number_clamped(n))
    }

    /// Whether the artifacts a stage needs are present
    pub fn is_step_accessible(&self, stage: Stage) -> bool {
        match stage {
            Stage::Upload => true,
            Stage::Materials => self.interview.is_some(),
            Stage::Draft => self.materials.is_some(),
            Stage::Image => self.draft.as_ref().is_some_and(|d| !d.is_empty()),
            Stage::Publish => self
                .draft
                .as_ref()
                .is_some_and(|d| !d.is_empty() && !d.title.trim().is_empty()),
        }
    }

    /// Drop every artifact and return to UPLOAD
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Store a new interview; everything derived from the old one is stale
    pub fn set_interview(&mut self, file: IngestedFile) {
        let stage = self.stage;
        self.reset();
        self.stage = stage;
        self.interview = Some(file);
    }

    /// Store freshly extracted materials, clearing downstream artifacts
    pub fn set_materials(&mut self, materials: CategorizedMaterials, from_fallback: bool) {
        self.materials = Some(materials);
        self.materials_from_fallback = from_fallback;
        self.selected_material = None;
        self.draft = None;
        self.image_variants.clear();
        self.image = None;
        self.publish_result = None;
    }

    /// Store a draft; a new draft invalidates any earlier publish result,
    /// and images made for different text are dropped
    pub fn set_draft(&mut self, draft: Draft) {
        let content_changed = self
            .draft
            .as_ref()
            .map_or(true, |old| old.content != draft.content);
        if content_changed {
            self.image_variants.clear();
            self.image = None;
        }
        self.draft = Some(draft);
        self.publish_result = None;
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.last_warning = Some(message.into());
    }
}
