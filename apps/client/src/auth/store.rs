use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::debug;

use crate::errors::TokenError;

/// Source of the bearer credential for outgoing requests.
///
/// The client holds an `Arc<dyn CredentialProvider>` and asks it for the
/// token on every call; nothing caches the value between calls.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn token(&self) -> Result<Option<String>, TokenError>;

    async fn store(&self, token: &str) -> Result<(), TokenError>;

    async fn clear(&self) -> Result<(), TokenError>;
}

/// Process-local token store. Lost on exit.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

#[async_trait]
impl CredentialProvider for MemoryTokenStore {
    async fn token(&self) -> Result<Option<String>, TokenError> {
        Ok(self.token.read().await.clone())
    }

    async fn store(&self, token: &str) -> Result<(), TokenError> {
        *self.token.write().await = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenError> {
        self.token.write().await.take();
        Ok(())
    }
}

/// Token persisted as a single file, surviving restarts.
/// A missing or blank file means "no token".
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "token".to_string());
        self.path
            .with_file_name(format!(".{name}.{}.tmp", std::process::id()))
    }
}

async fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    let _ = tokio::fs::remove_file(path).await;

    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(contents.as_bytes()).await?;
    file.sync_all().await
}

#[async_trait]
impl CredentialProvider for FileTokenStore {
    async fn token(&self) -> Result<Option<String>, TokenError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes a sibling temp file (owner-only on unix) and renames it over
    /// the token file, so readers see either the old or the new token.
    async fn store(&self, token: &str) -> Result<(), TokenError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let staging = self.staging_path();
        if let Err(e) = write_private(&staging, token).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(e.into());
        }
        tokio::fs::rename(&staging, &self.path).await?;

        debug!("Stored bearer token at {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!("Removed bearer token at {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
