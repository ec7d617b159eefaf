// Thin per-resource wrappers over `ApiClient`. Every method is fallible and
// returns the client error unchanged.

pub mod auth;
pub mod career_tools;
pub mod job_description;
pub mod optimization;
pub mod payment;
pub mod resume;

pub use auth::AuthService;
pub use career_tools::CareerToolsService;
pub use job_description::JobDescriptionService;
pub use optimization::OptimizationService;
pub use payment::PaymentService;
pub use resume::ResumeService;

use std::sync::Arc;

use crate::api::ApiClient;
use crate::auth::{FileTokenStore, Navigator};
use crate::config::Config;
use crate::errors::ClientError;

/// Every domain service, sharing one client (and so one credential store).
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub resumes: ResumeService,
    pub job_descriptions: JobDescriptionService,
    pub optimizations: OptimizationService,
    pub career_tools: CareerToolsService,
    pub payments: PaymentService,
}

impl Services {
    pub fn new(client: ApiClient) -> Self {
        Self {
            auth: AuthService::new(client.clone()),
            resumes: ResumeService::new(client.clone()),
            job_descriptions: JobDescriptionService::new(client.clone()),
            optimizations: OptimizationService::new(client.clone()),
            career_tools: CareerToolsService::new(client.clone()),
            payments: PaymentService::new(client),
        }
    }

    /// Services whose token persists in the file at `config.token_path`.
    pub fn with_file_store(
        config: &Config,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ClientError> {
        let store = Arc::new(FileTokenStore::new(&config.token_path));
        Ok(Self::new(ApiClient::new(config, store, navigator)?))
    }
}
