//! Static asset handlers, embedded at compile time

use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
};

const WIZARD_JS: &str = include_str!("../../../static/wizard.js");
const WIZARD_CSS: &str = include_str!("../../../static/wizard.css");

fn asset(content_type: &'static str, body: impl IntoResponse) -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", content_type),
            ("cache-control", "no-cache, no-store, must-revalidate"),
        ],
        body,
    )
        .into_response()
}

/// GET /static/wizard.js
pub async fn serve_wizard_js() -> Response {
    asset("application/javascript", WIZARD_JS)
}

/// GET /static/wizard.css
pub async fn serve_wizard_css() -> Response {
    asset("text/css", WIZARD_CSS)
}

/// Placeholder scenes for the stock image provider: (file name, colour, caption)
const STOCK_SCENES: [(&str, &str, &str); 4] = [
    ("exam.svg", "#4f86c6", "Eye examination"),
    ("consultation.svg", "#5aa17f", "Patient consultation"),
    ("treatment.svg", "#c98b4f", "Treatment room"),
    ("reception.svg", "#8a6fb8", "Clinic reception"),
];

fn stock_svg(colour: &str, caption: &str) -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="1024" height="1024" viewBox="0 0 1024 1024">
<rect width="1024" height="1024" fill="{colour}"/>
<circle cx="512" cy="430" r="150" fill="#ffffff" fill-opacity="0.25"/>
<text x="512" y="700" font-family="sans-serif" font-size="56" fill="#ffffff" text-anchor="middle">{caption}</text>
</svg>"##
    )
}

/// GET /static/stock/:name
pub async fn serve_stock_image(Path(name): Path<String>) -> Response {
    match STOCK_SCENES.iter().find(|(file, _, _)| *file == name) {
        Some((_, colour, caption)) => asset("image/svg+xml", stock_svg(colour, caption)),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
