use serde::{Deserialize, Serialize};

/// Requirements the backend extracted from a job posting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedJobData {
    pub skills: Vec<String>,
    pub experience_level: Option<String>,
    pub education: Vec<String>,
    pub responsibilities: Vec<String>,
    pub requirements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub parsed_data: Option<ParsedJobData>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobDescriptionCreate<'a> {
    pub title: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct JobDescriptionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_data_tolerates_partial_payload() {
        let json = r#"{
            "id": 2,
            "title": "Platform Engineer",
            "content": "Rust, Kubernetes",
            "parsed_data": {"skills": ["Rust", "Kubernetes"]}
        }"#;
        let jd: JobDescription = serde_json::from_str(json).unwrap();
        let parsed = jd.parsed_data.unwrap();
        assert_eq!(parsed.skills, vec!["Rust", "Kubernetes"]);
        assert!(parsed.requirements.is_empty());
        assert_eq!(parsed.experience_level, None);
    }
}
