//! Wizard page handler

use axum::{
    extract::State,
    response::{Html, IntoResponse},
};

use crate::models::{LengthPreset, StylePreset};
use crate::AppState;

fn serde_name<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

fn style_options() -> String {
    StylePreset::ALL
        .iter()
        .map(|s| format!(r#"<option value="{}">{}</option>"#, serde_name(s), s.label()))
        .collect()
}

fn length_options() -> String {
    LengthPreset::ALL
        .iter()
        .map(|l| format!(r#"<option value="{}">{}</option>"#, serde_name(l), l.label()))
        .collect()
}

/// GET /
///
/// Login form plus the five stage panels; wizard.js drives them.
pub async fn root_page(State(state): State<AppState>) -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = env!("GIT_HASH");
    let build_timestamp = env!("BUILD_TIMESTAMP");
    let build_profile = env!("BUILD_PROFILE");
    let brand = &state.config.brand.name;
    let max_mb = state.config.upload.max_size_mb;

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="ko">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{brand} · Interview to Blog</title>
    <link rel="stylesheet" href="/static/wizard.css">
</head>
<body>
    <header>
        <div class="header-left">
            <h1>Interview to Blog</h1>
            <div class="subtitle">{brand}</div>
        </div>
        <div class="header-right">
            <div>v{version} ({git_hash})</div>
            <div>{build_timestamp} · {build_profile}</div>
            <div id="user-box" class="hidden"><span id="user-name"></span> <button id="logout-btn" class="link">Log out</button></div>
        </div>
    </header>

    <section id="login-panel" class="card narrow">
        <h2>Log in</h2>
        <form id="login-form">
            <label>Username <input name="username" autocomplete="username" required></label>
            <label>Password <input name="password" type="password" autocomplete="current-password" required></label>
            <button type="submit" class="primary">Log in</button>
        </form>
        <div id="login-error" class="error hidden"></div>
    </section>

    <main id="wizard" class="hidden">
        <nav id="steps"></nav>
        <div class="content">
            <div id="warning" class="warning hidden"></div>
            <div id="error" class="error hidden"></div>

            <section class="stage card" data-stage="UPLOAD">
                <h2>1. Upload interview</h2>
                <p>TXT, MD, DOCX or PDF, up to {max_mb} MB. HWP is accepted but cannot be read yet.</p>
                <form id="upload-form">
                    <input type="file" name="file" accept=".txt,.md,.docx,.pdf,.hwp" required>
                    <button type="submit" class="primary">Upload</button>
                    <button type="button" id="sample-interview-btn">Try the sample interview</button>
                </form>
                <div id="upload-result"></div>
            </section>

            <section class="stage card" data-stage="MATERIALS">
                <h2>2. Find blog materials</h2>
                <button id="analyze-btn" class="primary">Analyze interview</button>
                <div id="material-tabs" class="tabs"></div>
                <div id="material-list"></div>
            </section>

            <section class="stage card" data-stage="DRAFT">
                <h2>3. Write the post</h2>
                <div id="selected-material"></div>
                <form id="draft-form" class="grid">
                    <label>Voice <select name="style">{style_options}</select></label>
                    <label>Length <select name="length">{length_options}</select></label>
                    <label class="wide">Additional request <input name="additional_request"></label>
                    <label><input type="checkbox" name="use_emotions" checked> Emotional moments</label>
                    <label><input type="checkbox" name="use_casual_talk" checked> Conversational tone</label>
                    <label><input type="checkbox" name="use_empathy" checked> Empathy</label>
                    <div class="wide">
                        <button type="submit" class="primary">Generate draft</button>
                        <button type="button" id="sample-draft-btn">Use sample draft</button>
                    </div>
                </form>
                <div id="draft-stats"></div>
                <input id="draft-title" placeholder="Title">
                <textarea id="draft-content" rows="24"></textarea>
                <button id="save-draft-btn">Save edits</button>
            </section>

            <section class="stage card" data-stage="IMAGE">
                <h2>4. Generate image</h2>
                <label>Prompt override <textarea id="image-prompt" rows="3" placeholder="Built from the draft when empty"></textarea></label>
                <label>Variants <input id="image-count" type="number" min="1" max="8" value="{variants}"></label>
                <button id="image-btn" class="primary">Generate</button>
                <div id="image-grid" class="image-grid"></div>
            </section>

            <section class="stage card" data-stage="PUBLISH">
                <h2>5. Publish to WordPress</h2>
                <div id="publish-settings"></div>
                <form id="publish-form" class="grid">
                    <label>Status
                        <select name="status">
                            <option value="">Default</option>
                            <option value="draft">draft</option>
                            <option value="pending">pending</option>
                            <option value="publish">publish</option>
                        </select>
                    </label>
                    <label>Category IDs <input name="categories" placeholder="e.g. 3, 7"></label>
                    <label>Tag IDs <input name="tags" placeholder="e.g. 12"></label>
                    <div class="wide"><button type="submit" class="primary">Publish</button></div>
                </form>
                <div id="publish-result"></div>
            </section>

            <div class="nav-buttons">
                <button id="prev-btn">Previous</button>
                <button id="reset-btn" class="danger">Start over</button>
                <button id="next-btn" class="primary">Next</button>
            </div>
        </div>
    </main>

    <script src="/static/wizard.js"></script>
</body>
</html>
"#,
        brand = brand,
        version = version,
        git_hash = git_hash,
        build_timestamp = build_timestamp,
        build_profile = build_profile,
        max_mb = max_mb,
        style_options = style_options(),
        length_options = length_options(),
        variants = state.config.image.variants,
    );

    Html(html)
}
