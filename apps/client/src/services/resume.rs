use crate::api::{endpoints, ApiClient, MultipartForm, UploadFile};
use crate::errors::ClientError;
use crate::models::resume::{Resume, ResumeCreate, ResumeUpdate};

#[derive(Clone)]
pub struct ResumeService {
    client: ApiClient,
}

impl ResumeService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Uploads a resume document; the title defaults to the file name
    /// without its extension.
    pub async fn upload(&self, file: UploadFile) -> Result<Resume, ClientError> {
        let title = file.title().to_string();
        let form = MultipartForm::new().file("file", file).text("title", title);
        self.client
            .post_multipart(endpoints::resumes::UPLOAD, form)
            .await
    }

    pub async fn list(&self) -> Result<Vec<Resume>, ClientError> {
        self.client.get(endpoints::resumes::LIST).await
    }

    pub async fn get(&self, id: i64) -> Result<Resume, ClientError> {
        self.client.get(&endpoints::resumes::detail(id)).await
    }

    pub async fn create(&self, resume: &ResumeCreate) -> Result<Resume, ClientError> {
        self.client.post(endpoints::resumes::CREATE, resume).await
    }

    pub async fn update(&self, id: i64, update: &ResumeUpdate) -> Result<Resume, ClientError> {
        self.client.put(&endpoints::resumes::detail(id), update).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        self.client.delete(&endpoints::resumes::detail(id)).await
    }
}

#[cfg(test)]
mod tests {
    use axum::extract::{Multipart, Path};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::test_support::{fresh_token, harness};

    fn resume_json(id: i64, title: &str) -> Value {
        json!({
            "id": id,
            "title": title,
            "content": {"summary": "Systems engineer"},
            "original_file_path": null,
            "created_at": "2024-05-01T10:00:00",
            "updated_at": "2024-05-01T10:00:00"
        })
    }

    fn backend() -> Router {
        Router::new()
            .route(
                "/api/v1/resumes",
                get(|| async { Json(json!([resume_json(1, "Backend"), resume_json(2, "Platform")])) })
                    .post(|Json(body): Json<Value>| async move {
                        Json(resume_json(3, body["title"].as_str().unwrap_or_default()))
                    }),
            )
            .route(
                "/api/v1/resumes/upload",
                post(|mut multipart: Multipart| async move {
                    let mut title = String::new();
                    let mut file_name = String::new();
                    while let Some(field) = multipart.next_field().await.unwrap() {
                        let name = field.name().map(str::to_string);
                        match name.as_deref() {
                            Some("title") => title = field.text().await.unwrap(),
                            Some("file") => {
                                file_name = field.file_name().unwrap_or_default().to_string()
                            }
                            _ => {}
                        }
                    }
                    Json(json!({
                        "id": 9,
                        "title": title,
                        "content": {},
                        "original_file_path": format!("uploads/{file_name}")
                    }))
                }),
            )
            .route(
                "/api/v1/resumes/:id",
                get(|Path(id): Path<i64>| async move { Json(resume_json(id, "Backend")) })
                    .put(|Path(id): Path<i64>, Json(body): Json<Value>| async move {
                        Json(resume_json(id, body["title"].as_str().unwrap_or("unchanged")))
                    })
                    .delete(|| async { axum::http::StatusCode::NO_CONTENT }),
            )
    }

    #[tokio::test]
    async fn test_upload_sends_file_and_derived_title() {
        let h = harness(backend(), Some(fresh_token()), "/resume-upload").await;
        let service = ResumeService::new(h.client.clone());

        let resume = service
            .upload(UploadFile::new("jane_doe.pdf", &b"%PDF-1.4"[..]).with_mime("application/pdf"))
            .await
            .unwrap();

        assert_eq!(resume.id, 9);
        assert_eq!(resume.title, "jane_doe");
        assert_eq!(resume.original_file_path.as_deref(), Some("uploads/jane_doe.pdf"));
    }

    #[tokio::test]
    async fn test_crud_round() {
        let h = harness(backend(), Some(fresh_token()), "/dashboard").await;
        let service = ResumeService::new(h.client.clone());

        let all = service.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].title, "Platform");

        let one = service.get(5).await.unwrap();
        assert_eq!(one.id, 5);
        assert_eq!(one.content["summary"], "Systems engineer");

        let created = service
            .create(&ResumeCreate {
                title: "New".to_string(),
                content: json!({}),
                original_file_path: None,
            })
            .await
            .unwrap();
        assert_eq!(created.title, "New");

        let updated = service
            .update(
                5,
                &ResumeUpdate {
                    title: Some("Renamed".to_string()),
                    ..ResumeUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Renamed");

        service.delete(5).await.unwrap();
    }
}
