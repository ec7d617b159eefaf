use bytes::Bytes;

use crate::api::{endpoints, ApiClient};
use crate::errors::ClientError;
use crate::models::optimization::{ExportFormat, ExportRequest, Optimization, OptimizationCreate};

#[derive(Clone)]
pub struct OptimizationService {
    client: ApiClient,
}

impl OptimizationService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Starts optimizing a resume against a job description.
    pub async fn optimize(
        &self,
        resume_id: i64,
        job_description_id: i64,
    ) -> Result<Optimization, ClientError> {
        self.client
            .post(
                endpoints::optimizations::CREATE,
                &OptimizationCreate {
                    resume_id,
                    job_description_id,
                },
            )
            .await
    }

    pub async fn get(&self, id: i64) -> Result<Optimization, ClientError> {
        self.client.get(&endpoints::optimizations::detail(id)).await
    }

    pub async fn list(&self) -> Result<Vec<Optimization>, ClientError> {
        self.client.get(endpoints::optimizations::LIST).await
    }

    /// Renders the optimized resume; returns the document bytes.
    pub async fn export(&self, id: i64, format: ExportFormat) -> Result<Bytes, ClientError> {
        self.client
            .post_bytes(&endpoints::optimizations::export(id), &ExportRequest { format })
            .await
    }
}

#[cfg(test)]
mod tests {
    use axum::extract::Path;
    use axum::http::header;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::test_support::{fresh_token, harness};

    fn optimization_json(id: i64, resume_id: i64, jd_id: i64) -> Value {
        json!({
            "id": id,
            "resume_id": resume_id,
            "job_description_id": jd_id,
            "result": {"sections": {"summary": "Rust engineer", "skills": ["Rust"]}},
            "status": "completed"
        })
    }

    fn backend() -> Router {
        Router::new()
            .route(
                "/api/v1/optimizations",
                post(|Json(body): Json<Value>| async move {
                    Json(optimization_json(
                        1,
                        body["resume_id"].as_i64().unwrap_or_default(),
                        body["job_description_id"].as_i64().unwrap_or_default(),
                    ))
                })
                .get(|| async { Json(json!([optimization_json(1, 2, 3)])) }),
            )
            .route(
                "/api/v1/optimizations/:id",
                get(|Path(id): Path<i64>| async move { Json(optimization_json(id, 2, 3)) }),
            )
            .route(
                "/api/v1/optimizations/export/:id",
                post(|Json(body): Json<Value>| async move {
                    let format = body["format"].as_str().unwrap_or_default().to_string();
                    (
                        [(header::CONTENT_TYPE, format!("application/{format}"))],
                        format!("%{format} document").into_bytes(),
                    )
                }),
            )
    }

    #[tokio::test]
    async fn test_optimize_posts_ids() {
        let h = harness(backend(), Some(fresh_token()), "/optimize").await;
        let service = OptimizationService::new(h.client.clone());

        let opt = service.optimize(12, 34).await.unwrap();
        assert_eq!(opt.resume_id, 12);
        assert_eq!(opt.job_description_id, 34);
        assert_eq!(opt.status, "completed");
        assert_eq!(opt.result["sections"]["summary"], "Rust engineer");
    }

    #[tokio::test]
    async fn test_get_and_list() {
        let h = harness(backend(), Some(fresh_token()), "/optimize").await;
        let service = OptimizationService::new(h.client.clone());
        assert_eq!(service.get(6).await.unwrap().id, 6);
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_export_returns_document_bytes() {
        let h = harness(backend(), Some(fresh_token()), "/optimize").await;
        let service = OptimizationService::new(h.client.clone());

        let pdf = service.export(6, ExportFormat::Pdf).await.unwrap();
        assert_eq!(&pdf[..], b"%pdf document");

        let docx = service.export(6, ExportFormat::Docx).await.unwrap();
        assert_eq!(&docx[..], b"%docx document");
    }
}
