//! WordPress post creation

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /wp-json/wp/v2/posts`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishRequest {
    pub title: String,
    pub content: String,
    pub status: String,
    /// Category term IDs
    pub categories: Vec<u64>,
    /// Tag term IDs
    pub tags: Vec<u64>,
}

/// Created post, as reported by WordPress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishResult {
    pub post_id: u64,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Full response body
    pub raw: Value,
}

impl PublishResult {
    /// Pull the interesting fields out of a WordPress post object
    pub fn from_response(raw: Value) -> Self {
        let post_id = raw.get("id").and_then(Value::as_u64).unwrap_or(0);
        let status = raw
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        let link = raw.get("link").and_then(Value::as_str).map(str::to_string);
        Self {
            post_id,
            status,
            link,
            raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_response() {
        let result = PublishResult::from_response(json!({
            "id": 42,
            "status": "draft",
            "link": "https://blog.example.com/?p=42",
            "title": {"rendered": "Hello"}
        }));
        assert_eq!(result.post_id, 42);
        assert_eq!(result.status, "draft");
        assert_eq!(result.link.as_deref(), Some("https://blog.example.com/?p=42"));
        assert_eq!(result.raw["title"]["rendered"], "Hello");
    }

    #[test]
    fn test_from_response_missing_fields() {
        let result = PublishResult::from_response(json!({}));
        assert_eq!(result.post_id, 0);
        assert_eq!(result.status, "unknown");
        assert!(result.link.is_none());
    }
}
