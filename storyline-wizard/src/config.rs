//! Configuration resolution for storyline-wizard
//!
//! Settings come from three tiers with ENV → TOML → compiled default
//! priority. Secrets and endpoints may live in the environment; everything
//! else is TOML-only.

use std::path::{Path, PathBuf};
use storyline_common::config::{default_config_path, load_toml_config, ImageProvider, TomlConfig};
use storyline_common::Result;
use tracing::{info, warn};

pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const OPENAI_BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const IMAGE_PROVIDER_VAR: &str = "STORYLINE_IMAGE_PROVIDER";
pub const WORDPRESS_URL_VAR: &str = "WORDPRESS_URL";
pub const WORDPRESS_USERNAME_VAR: &str = "WORDPRESS_USERNAME";
pub const WORDPRESS_APP_PASSWORD_VAR: &str = "WORDPRESS_APP_PASSWORD";

/// Validate a key or setting (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Resolve one optional setting, ENV first, then TOML
///
/// `label` is only used for logging; values are never logged.
pub fn resolve_setting(label: &str, env_var: &str, toml_value: Option<&str>) -> Option<String> {
    let env_value = std::env::var(env_var).ok().filter(|v| is_valid_key(v));
    let toml_value = toml_value.filter(|v| is_valid_key(v));

    if env_value.is_some() && toml_value.is_some() {
        warn!(
            "{} found in both environment and TOML. Using environment (highest priority).",
            label
        );
    }

    if let Some(value) = env_value {
        info!("{} loaded from environment variable {}", label, env_var);
        return Some(value);
    }
    if let Some(value) = toml_value {
        info!("{} loaded from TOML config", label);
        return Some(value.to_string());
    }
    None
}

/// Path of the TOML file to read, if any
///
/// An explicit path is used as given; otherwise the default location is used
/// only when the file exists.
pub fn config_file_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    default_config_path().filter(|p| p.exists())
}

/// Apply environment overrides on top of a loaded configuration
fn apply_env_overrides(config: &mut TomlConfig) {
    config.llm.api_key = resolve_setting("LLM API key", OPENAI_API_KEY_VAR, config.llm.api_key.as_deref());
    if config.llm.api_key.is_none() {
        warn!(
            "LLM API key not configured; extraction and drafting will use sample content. \
             Set {} or [llm] api_key in the TOML config.",
            OPENAI_API_KEY_VAR
        );
    }

    if let Some(base_url) = resolve_setting("LLM base URL", OPENAI_BASE_URL_VAR, Some(&config.llm.base_url)) {
        config.llm.base_url = base_url;
    }

    if let Ok(raw) = std::env::var(IMAGE_PROVIDER_VAR) {
        match raw.parse::<ImageProvider>() {
            Ok(provider) => {
                info!("Image provider {:?} loaded from environment variable", provider);
                config.image.provider = provider;
            }
            Err(e) => warn!("Ignoring {}: {}", IMAGE_PROVIDER_VAR, e),
        }
    }

    let wp = &mut config.wordpress;
    wp.url = resolve_setting("WordPress URL", WORDPRESS_URL_VAR, wp.url.as_deref());
    wp.username = resolve_setting("WordPress username", WORDPRESS_USERNAME_VAR, wp.username.as_deref());
    wp.application_password = resolve_setting(
        "WordPress application password",
        WORDPRESS_APP_PASSWORD_VAR,
        wp.application_password.as_deref(),
    );
}

/// Load TOML (or defaults) and apply environment overrides
pub fn resolve_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    let mut config = match config_file_path(explicit) {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            load_toml_config(&path)?
        }
        None => {
            info!("No configuration file found, using defaults");
            TomlConfig::default()
        }
    };
    apply_env_overrides(&mut config);
    Ok(config)
}
