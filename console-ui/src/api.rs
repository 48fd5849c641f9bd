use std::future::Future;

use async_trait::async_trait;
use dioxus_logger::tracing::debug;
use futures_util::future::{select, Either};
use gloo_net::http::{Request, RequestBuilder, Response};
use gloo_timers::future::TimeoutFuture;
use serde::de::DeserializeOwned;
use shared_types::{Document, DocumentFile, FileDescriptor, Page};
use thiserror::Error;

use crate::config::ConsoleConfig;
use crate::viewers::source::PreviewBackend;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Request timed out after {0} ms")]
    Timeout(u32),

    #[error("HTTP error: {status}{detail}")]
    Http { status: u16, detail: String },

    #[error("Not found")]
    NotFound,

    #[error("File too large to preview ({size} bytes, limit {limit})")]
    TooLarge { size: u64, limit: u64 },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Failed to encode request: {0}")]
    Encode(String),
}

/// Turn a non-2xx response into an error, pulling a message out of the
/// usual JSON error keys when present.
async fn describe_http_error(response: Response) -> ApiError {
    let status = response.status();
    if status == 404 {
        return ApiError::NotFound;
    }
    let body = response.text().await.unwrap_or_default();
    ApiError::Http {
        status,
        detail: describe_error_body(&body),
    }
}

fn describe_error_body(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return String::new();
    }
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["detail", "error", "message"] {
            if let Some(message) = json.get(key).and_then(|v| v.as_str()) {
                return format!(" ({message})");
            }
        }
    }
    format!(" ({body})")
}

/// REST client for the document-management server.
#[derive(Debug, Clone, PartialEq)]
pub struct MayanClient {
    base: String,
    token: Option<String>,
    timeout_ms: u32,
    max_text_bytes: u64,
}

impl MayanClient {
    pub fn new(config: &ConsoleConfig) -> Self {
        Self {
            base: config.api_base(),
            token: config.token.clone(),
            timeout_ms: config.request_timeout_ms,
            max_text_bytes: config.max_text_preview_bytes,
        }
    }

    pub fn api_base(&self) -> &str {
        &self.base
    }

    fn file_url(&self, document_id: u64, file_id: u64, suffix: &str) -> String {
        format!(
            "{}/documents/{document_id}/files/{file_id}/{suffix}",
            self.base
        )
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let request = Request::get(url).header("Accept", "application/json");
        match &self.token {
            Some(token) => request.header("Authorization", &format!("Token {token}")),
            None => request,
        }
    }

    async fn with_timeout<T>(
        &self,
        work: impl Future<Output = Result<T, ApiError>>,
    ) -> Result<T, ApiError> {
        let work = Box::pin(work);
        let timer = TimeoutFuture::new(self.timeout_ms);
        match select(work, timer).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => Err(ApiError::Timeout(self.timeout_ms)),
        }
    }

    async fn send(&self, url: &str) -> Result<Response, ApiError> {
        debug!("GET {url}");
        let response = self
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        if !response.ok() {
            return Err(describe_http_error(response).await);
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        self.with_timeout(async {
            self.send(url)
                .await?
                .json::<T>()
                .await
                .map_err(|e| ApiError::Decode(e.to_string()))
        })
        .await
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        self.with_timeout(async {
            self.send(url)
                .await?
                .binary()
                .await
                .map_err(|e| ApiError::Request(e.to_string()))
        })
        .await
    }

    pub async fn list_documents(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Page<Document>, ApiError> {
        let url = format!(
            "{}/documents/?page={}&page_size={}",
            self.base,
            page.max(1),
            page_size.clamp(1, 100)
        );
        self.get_json(&url).await
    }

    pub async fn list_document_files(
        &self,
        document_id: u64,
    ) -> Result<Vec<DocumentFile>, ApiError> {
        let url = format!("{}/documents/{document_id}/files/", self.base);
        let page: Page<DocumentFile> = self.get_json(&url).await?;
        Ok(page.results)
    }
}

/// Decode text bytes, refusing anything over `limit`.
pub fn decode_text(bytes: Vec<u8>, limit: u64) -> Result<String, ApiError> {
    let size = bytes.len() as u64;
    if size > limit {
        return Err(ApiError::TooLarge { size, limit });
    }
    String::from_utf8(bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait(?Send)]
impl PreviewBackend for MayanClient {
    async fn fetch_file_metadata(
        &self,
        document_id: u64,
        file_id: u64,
    ) -> Result<FileDescriptor, ApiError> {
        let file: DocumentFile = self.get_json(&self.file_url(document_id, file_id, "")).await?;
        Ok(FileDescriptor::from(file))
    }

    /// Confirms the file exists before handing out its preview locator.
    async fn fetch_renderable_location(
        &self,
        document_id: u64,
        file_id: u64,
    ) -> Result<String, ApiError> {
        let _: DocumentFile = self.get_json(&self.file_url(document_id, file_id, "")).await?;
        Ok(self.file_url(document_id, file_id, "preview/"))
    }

    async fn fetch_file_bytes_as_text(
        &self,
        document_id: u64,
        file_id: u64,
    ) -> Result<String, ApiError> {
        let bytes = self
            .get_bytes(&self.file_url(document_id, file_id, "download/"))
            .await?;
        decode_text(bytes, self.max_text_bytes)
    }

    async fn fetch_file_bytes_as_binary(
        &self,
        document_id: u64,
        file_id: u64,
    ) -> Result<Vec<u8>, ApiError> {
        self.get_bytes(&self.file_url(document_id, file_id, "download/"))
            .await
    }

    fn download_location(&self, document_id: u64, file_id: u64) -> String {
        self.file_url(document_id, file_id, "download/")
    }
}
