use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::{MultipartForm, UploadFile};

/// Input for `career-tools/generate-cover-letter-upload`.
#[derive(Debug, Clone)]
pub struct CoverLetterRequest {
    pub resume_file: UploadFile,
    pub job_description_text: String,
    pub company_name: Option<String>,
    pub hiring_manager: Option<String>,
    pub additional_notes: Option<String>,
}

impl CoverLetterRequest {
    pub fn into_form(self) -> MultipartForm {
        MultipartForm::new()
            .file("resume_file", self.resume_file)
            .text("job_description_text", self.job_description_text)
            .optional_text("company_name", self.company_name.as_deref())
            .optional_text("hiring_manager", self.hiring_manager.as_deref())
            .optional_text("additional_notes", self.additional_notes.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverLetter {
    pub id: i64,
    /// Generated letter; `full_text` holds the rendered body.
    #[serde(default)]
    pub cover_letter_data: Value,
}

impl CoverLetter {
    pub fn full_text(&self) -> Option<&str> {
        self.cover_letter_data.get("full_text").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SkillsGapRequest {
    pub resume_id: i64,
    pub job_description_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillsGapAnalysis {
    pub id: i64,
    #[serde(default)]
    pub analysis_data: Value,
}

/// Skill name → how the user has used it.
pub type UserSkills = BTreeMap<String, String>;

/// Resume regenerated with the user's extra skills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedResume {
    pub id: i64,
    #[serde(default)]
    pub optimized_data: Value,
}
