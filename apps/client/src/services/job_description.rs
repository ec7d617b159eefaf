use crate::api::{endpoints, ApiClient, MultipartForm, UploadFile};
use crate::errors::ClientError;
use crate::models::job_description::{JobDescription, JobDescriptionCreate, JobDescriptionUpdate};

#[derive(Clone)]
pub struct JobDescriptionService {
    client: ApiClient,
}

impl JobDescriptionService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Creates a job description from pasted text.
    pub async fn create(&self, title: &str, content: &str) -> Result<JobDescription, ClientError> {
        self.client
            .post(
                endpoints::job_descriptions::CREATE,
                &JobDescriptionCreate { title, content },
            )
            .await
    }

    /// Uploads a job posting document for server-side parsing.
    pub async fn upload(&self, file: UploadFile) -> Result<JobDescription, ClientError> {
        let title = file.title().to_string();
        let form = MultipartForm::new().file("file", file).text("title", title);
        self.client
            .post_multipart(endpoints::job_descriptions::UPLOAD, form)
            .await
    }

    pub async fn list(&self) -> Result<Vec<JobDescription>, ClientError> {
        self.client.get(endpoints::job_descriptions::LIST).await
    }

    pub async fn get(&self, id: i64) -> Result<JobDescription, ClientError> {
        self.client
            .get(&endpoints::job_descriptions::detail(id))
            .await
    }

    pub async fn update(
        &self,
        id: i64,
        update: &JobDescriptionUpdate,
    ) -> Result<JobDescription, ClientError> {
        self.client
            .put(&endpoints::job_descriptions::detail(id), update)
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        self.client
            .delete(&endpoints::job_descriptions::detail(id))
            .await
    }
}
