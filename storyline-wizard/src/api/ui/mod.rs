//! UI routes: the wizard page and its static assets
//!
//! Plain HTML/CSS/JS, no frontend framework. The page talks to the JSON API
//! and re-renders from `/api/session` after every action.

use axum::{routing::get, Router};

use crate::AppState;

mod root;
mod static_assets;

use root::root_page;
use static_assets::{serve_stock_image, serve_wizard_css, serve_wizard_js};

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root_page))
        .route("/static/wizard.js", get(serve_wizard_js))
        .route("/static/wizard.css", get(serve_wizard_css))
        .route("/static/stock/:name", get(serve_stock_image))
}
