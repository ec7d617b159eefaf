use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Optimization {
    pub id: i64,
    pub resume_id: i64,
    pub job_description_id: i64,
    /// Optimized sections (summary, experience, education, skills).
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct OptimizationCreate {
    pub resume_id: i64,
    pub job_description_id: i64,
}

/// Document format for optimization and cover letter exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Docx,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ExportRequest {
    pub format: ExportFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_request_serializes_lowercase() {
        let body = serde_json::to_value(ExportRequest {
            format: ExportFormat::Pdf,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"format": "pdf"}));
        assert_eq!(ExportFormat::Docx.to_string(), "docx");
    }
}
