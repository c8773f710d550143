//! HTTP API handlers for storyline-wizard
//!
//! One route group per wizard stage, plus login, health and the UI page.
//! Everything except the UI, `/health` and `/api/login` sits behind
//! [`auth_middleware`].

pub mod auth;
pub mod draft;
pub mod health;
pub mod image;
pub mod materials;
pub mod publish;
pub mod ui;
pub mod upload;
pub mod workflow;

pub use auth::{auth_middleware, login_routes, session_routes};
pub use draft::draft_routes;
pub use health::health_routes;
pub use image::image_routes;
pub use materials::materials_routes;
pub use publish::publish_routes;
pub use ui::ui_routes;
pub use upload::upload_routes;
pub use workflow::workflow_routes;
