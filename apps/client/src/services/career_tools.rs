use bytes::Bytes;

use crate::api::{endpoints, ApiClient};
use crate::errors::ClientError;
use crate::models::career::{
    CoverLetter, CoverLetterRequest, OptimizedResume, SkillsGapAnalysis, SkillsGapRequest,
    UserSkills,
};
use crate::models::optimization::ExportFormat;

#[derive(Clone)]
pub struct CareerToolsService {
    client: ApiClient,
}

impl CareerToolsService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Generates a cover letter from an uploaded resume and pasted job text.
    pub async fn generate_cover_letter(
        &self,
        request: CoverLetterRequest,
    ) -> Result<CoverLetter, ClientError> {
        self.client
            .post_multipart(
                endpoints::career_tools::GENERATE_COVER_LETTER,
                request.into_form(),
            )
            .await
    }

    pub async fn get_cover_letter(&self, id: i64) -> Result<CoverLetter, ClientError> {
        self.client
            .get(&endpoints::career_tools::cover_letter(id))
            .await
    }

    /// Downloads the cover letter rendered as `format`.
    pub async fn export_cover_letter(
        &self,
        id: i64,
        format: ExportFormat,
    ) -> Result<Bytes, ClientError> {
        self.client
            .get_bytes(&endpoints::career_tools::export_cover_letter(id, format))
            .await
    }

    pub async fn analyze_skills_gap(
        &self,
        resume_id: i64,
        job_description_id: i64,
    ) -> Result<SkillsGapAnalysis, ClientError> {
        self.client
            .post(
                endpoints::career_tools::ANALYZE_SKILLS_GAP,
                &SkillsGapRequest {
                    resume_id,
                    job_description_id,
                },
            )
            .await
    }

    /// Folds skills the user vouches for into the analysed resume.
    pub async fn add_user_skills(
        &self,
        analysis_id: i64,
        skills: &UserSkills,
    ) -> Result<OptimizedResume, ClientError> {
        self.client
            .post(&endpoints::career_tools::add_user_skills(analysis_id), skills)
            .await
    }
}

#[cfg(test)]
mod tests {
    use axum::extract::{Multipart, Path, Query};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde::Deserialize;
    use serde_json::{json, Value};

    use super::*;
    use crate::api::UploadFile;
    use crate::test_support::{fresh_token, harness};

    #[derive(Deserialize)]
    struct FormatQuery {
        format: String,
    }

    fn backend() -> Router {
        Router::new()
            .route(
                "/api/v1/career-tools/generate-cover-letter-upload",
                post(|mut multipart: Multipart| async move {
                    let mut fields = Vec::new();
                    while let Some(field) = multipart.next_field().await.unwrap() {
                        fields.push(field.name().unwrap_or_default().to_string());
                    }
                    Json(json!({
                        "id": 21,
                        "cover_letter_data": {"full_text": "Dear team,", "fields": fields}
                    }))
                }),
            )
            .route(
                "/api/v1/career-tools/cover-letter/:id",
                get(|Path(id): Path<i64>| async move {
                    Json(json!({"id": id, "cover_letter_data": {"full_text": "Dear team,"}}))
                }),
            )
            .route(
                "/api/v1/career-tools/export-cover-letter/:id",
                get(
                    |Path(id): Path<i64>, Query(q): Query<FormatQuery>| async move {
                        format!("cover_letter_{id}.{}", q.format).into_bytes()
                    },
                ),
            )
            .route(
                "/api/v1/career-tools/analyze-skills-gap",
                post(|Json(body): Json<Value>| async move {
                    Json(json!({
                        "id": 31,
                        "analysis_data": {
                            "resume_id": body["resume_id"],
                            "job_description_id": body["job_description_id"],
                            "missing_skills": ["Kubernetes"]
                        }
                    }))
                }),
            )
            .route(
                "/api/v1/career-tools/add-user-skills/:id",
                post(|Path(id): Path<i64>, Json(skills): Json<Value>| async move {
                    Json(json!({"id": id + 100, "optimized_data": {"added": skills}}))
                }),
            )
    }

    #[tokio::test]
    async fn test_generate_cover_letter_sends_multipart_fields() {
        let h = harness(backend(), Some(fresh_token()), "/cover-letter").await;
        let service = CareerToolsService::new(h.client.clone());

        let letter = service
            .generate_cover_letter(CoverLetterRequest {
                resume_file: UploadFile::new("cv.pdf", &b"%PDF"[..]),
                job_description_text: "Senior Rust Engineer".to_string(),
                company_name: Some("Acme".to_string()),
                hiring_manager: None,
                additional_notes: Some("Remote only".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(letter.id, 21);
        assert_eq!(letter.full_text(), Some("Dear team,"));
        assert_eq!(
            letter.cover_letter_data["fields"],
            json!(["resume_file", "job_description_text", "company_name", "additional_notes"])
        );
    }

    #[tokio::test]
    async fn test_get_and_export_cover_letter() {
        let h = harness(backend(), Some(fresh_token()), "/cover-letter/4").await;
        let service = CareerToolsService::new(h.client.clone());

        assert_eq!(service.get_cover_letter(4).await.unwrap().id, 4);
        let bytes = service
            .export_cover_letter(4, ExportFormat::Docx)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"cover_letter_4.docx");
    }

    #[tokio::test]
    async fn test_skills_gap_then_add_skills() {
        let h = harness(backend(), Some(fresh_token()), "/skills-gap").await;
        let service = CareerToolsService::new(h.client.clone());

        let analysis = service.analyze_skills_gap(1, 2).await.unwrap();
        assert_eq!(analysis.id, 31);
        assert_eq!(analysis.analysis_data["resume_id"], 1);
        assert_eq!(analysis.analysis_data["job_description_id"], 2);

        let mut skills = UserSkills::new();
        skills.insert(
            "Kubernetes".to_string(),
            "Ran staging clusters for two years".to_string(),
        );
        let optimized = service.add_user_skills(analysis.id, &skills).await.unwrap();
        assert_eq!(optimized.id, 131);
        assert_eq!(
            optimized.optimized_data["added"]["Kubernetes"],
            "Ran staging clusters for two years"
        );
    }
}
