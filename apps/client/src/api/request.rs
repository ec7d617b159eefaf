use std::path::Path;

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde_json::Value;

use crate::errors::ClientError;

/// A file attached to a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Bytes,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Reads a file from disk, naming the part after the file.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime = mime_for_extension(&file_name).map(str::to_string);
        Ok(Self {
            file_name,
            mime,
            bytes: bytes.into(),
        })
    }

    /// File name without its last extension: `cv.final.pdf` → `cv.final`.
    pub fn title(&self) -> &str {
        match self.file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => stem,
            _ => &self.file_name,
        }
    }
}

fn mime_for_extension(file_name: &str) -> Option<&'static str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "pdf" => Some("application/pdf"),
        "docx" => Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        "doc" => Some("application/msword"),
        "txt" => Some("text/plain"),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub enum FormValue {
    Text(String),
    File(UploadFile),
}

/// Multipart body kept as plain data until the request is sent, so it can
/// be inspected (and signed) before `reqwest` takes ownership of it.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    parts: Vec<(String, FormValue)>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push((name.into(), FormValue::Text(value.into())));
        self
    }

    /// Adds a text part only when a value is present.
    pub fn optional_text(self, name: impl Into<String>, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.text(name, value),
            None => self,
        }
    }

    pub fn file(mut self, name: impl Into<String>, file: UploadFile) -> Self {
        self.parts.push((name.into(), FormValue::File(file)));
        self
    }

    pub fn parts(&self) -> &[(String, FormValue)] {
        &self.parts
    }

    fn into_reqwest(self) -> Result<Form, ClientError> {
        let mut form = Form::new();
        for (name, value) in self.parts {
            form = match value {
                FormValue::Text(text) => form.text(name, text),
                FormValue::File(file) => {
                    let mut part = Part::bytes(file.bytes.to_vec()).file_name(file.file_name);
                    if let Some(mime) = file.mime {
                        part = part.mime_str(&mime)?;
                    }
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    /// `application/x-www-form-urlencoded` pairs.
    Form(Vec<(String, String)>),
    Multipart(MultipartForm),
}

/// One fully resolved outgoing call. Built fresh for every request.
#[derive(Debug, Clone)]
pub struct NormalizedRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

impl NormalizedRequest {
    pub fn new(method: Method, url: String, body: RequestBody) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body,
        }
    }

    pub(crate) fn into_reqwest(
        self,
        client: &reqwest::Client,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        let builder = client.request(self.method, self.url).headers(self.headers);
        Ok(match self.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.body(serde_json::to_vec(&value)?),
            RequestBody::Form(pairs) => builder.form(&pairs),
            RequestBody::Multipart(form) => builder.multipart(form.into_reqwest()?),
        })
    }
}
