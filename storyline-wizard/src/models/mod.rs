//! Data models for the Storyline wizard
//!
//! - Workflow state: current stage and accumulated artifacts
//! - Stage artifacts: interview, materials, draft, image, publish result

pub mod draft;
pub mod image;
pub mod interview;
pub mod material;
pub mod publish;
pub mod workflow;

pub use draft::{count_chars, Draft, DraftOptions, DraftSource, LengthPreset, StylePreset, StyleReport};
pub use image::{ImageResult, ImageSource};
pub use interview::{FileKind, IngestedFile};
pub use material::{CategorizedMaterials, Material, MaterialCategory, SelectedMaterial};
pub use publish::{PublishRequest, PublishResult};
pub use workflow::{step_labels, Stage, StageTransition, WorkflowState};
