use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub id: i64,
    pub title: String,
    /// Parsed resume body; its shape is defined by the backend parser.
    #[serde(default)]
    pub content: Value,
    #[serde(default)]
    pub original_file_path: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumeCreate {
    pub title: String,
    pub content: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_file_path: Option<String>,
}

/// Partial update; unset fields are left out of the body.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResumeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_file_path: Option<String>,
}
