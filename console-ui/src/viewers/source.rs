//! Preview source resolution
//!
//! Decides, per category, whether a window renders from a locator or from
//! inline text, and tracks the temporary browser resources that come with it.
//! Resources are owned `ResourceHandle`s: they can only be released by value,
//! so a handle is released at most once.

use async_trait::async_trait;
use dioxus_logger::tracing::debug;
use shared_types::FileDescriptor;
use thiserror::Error;

use crate::api::ApiError;
use crate::viewers::classify::FileCategory;

/// Remote collaborator the preview windows read from.
#[async_trait(?Send)]
pub trait PreviewBackend {
    async fn fetch_file_metadata(
        &self,
        document_id: u64,
        file_id: u64,
    ) -> Result<FileDescriptor, ApiError>;

    /// Locator of the previewable form, usable directly by `<img>`/`<iframe>`.
    async fn fetch_renderable_location(
        &self,
        document_id: u64,
        file_id: u64,
    ) -> Result<String, ApiError>;

    async fn fetch_file_bytes_as_text(
        &self,
        document_id: u64,
        file_id: u64,
    ) -> Result<String, ApiError>;

    /// Only used by the manual download action.
    async fn fetch_file_bytes_as_binary(
        &self,
        document_id: u64,
        file_id: u64,
    ) -> Result<Vec<u8>, ApiError>;

    fn download_location(&self, document_id: u64, file_id: u64) -> String;
}

/// A temporary object URL. Not `Clone`: releasing consumes it.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "object URLs leak unless released"]
pub struct ResourceHandle {
    url: String,
}

impl ResourceHandle {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn into_url(self) -> String {
        self.url
    }
}

/// Browser-side temporary resources (blob object URLs).
pub trait ObjectUrls {
    fn create_text_url(&self, text: &str) -> Option<ResourceHandle>;

    fn create_binary_url(&self, bytes: &[u8], mime: &str) -> Option<ResourceHandle>;

    /// Hand the resource to the browser as a file download.
    fn offer_download(&self, handle: &ResourceHandle, filename: &str) -> bool;

    fn release(&self, handle: ResourceHandle);
}

/// What a window renders once resolution succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewContent {
    Location(String),
    Text { text: String, raw_url: Option<String> },
    DownloadOnly(String),
}

#[derive(Debug, PartialEq, Eq)]
pub enum ResolvedSource {
    Location(String),
    InlineText {
        text: String,
        raw: Option<ResourceHandle>,
    },
    DownloadOnly(String),
}

impl ResolvedSource {
    /// Split into render data and the resource the window must track.
    pub fn into_parts(self) -> (PreviewContent, Option<ResourceHandle>) {
        match self {
            ResolvedSource::Location(url) => (PreviewContent::Location(url), None),
            ResolvedSource::DownloadOnly(url) => (PreviewContent::DownloadOnly(url), None),
            ResolvedSource::InlineText { text, raw } => {
                let raw_url = raw.as_ref().map(|handle| handle.url().to_string());
                (PreviewContent::Text { text, raw_url }, raw)
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Could not load {filename}: {source}")]
    Fetch { filename: String, source: ApiError },

    #[error("Could not read {filename} as text: {source}")]
    Decode { filename: String, source: ApiError },
}

impl ResolveError {
    fn from_fetch(descriptor: &FileDescriptor, source: ApiError) -> Self {
        ResolveError::Fetch {
            filename: descriptor.filename.clone(),
            source,
        }
    }

    fn from_text_fetch(descriptor: &FileDescriptor, source: ApiError) -> Self {
        let filename = descriptor.filename.clone();
        match source {
            ApiError::Decode(_) | ApiError::TooLarge { .. } => {
                ResolveError::Decode { filename, source }
            }
            other => ResolveError::Fetch {
                filename,
                source: other,
            },
        }
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, ResolveError::Decode { .. })
    }
}

pub async fn resolve<B, U>(
    backend: &B,
    urls: &U,
    document_id: u64,
    descriptor: &FileDescriptor,
    category: FileCategory,
) -> Result<ResolvedSource, ResolveError>
where
    B: PreviewBackend + ?Sized,
    U: ObjectUrls + ?Sized,
{
    match category {
        FileCategory::Document | FileCategory::Image | FileCategory::MedicalImage => {
            let url = backend
                .fetch_renderable_location(document_id, descriptor.id)
                .await
                .map_err(|e| ResolveError::from_fetch(descriptor, e))?;
            Ok(ResolvedSource::Location(url))
        }
        FileCategory::PlainText => {
            let text = backend
                .fetch_file_bytes_as_text(document_id, descriptor.id)
                .await
                .map_err(|e| ResolveError::from_text_fetch(descriptor, e))?;
            let raw = urls.create_text_url(&text);
            if raw.is_none() {
                debug!("no raw-text URL for {}", descriptor.filename);
            }
            Ok(ResolvedSource::InlineText { text, raw })
        }
        FileCategory::Unsupported => Ok(ResolvedSource::DownloadOnly(
            backend.download_location(document_id, descriptor.id),
        )),
    }
}

pub fn download_filename(document_id: u64, descriptor: &FileDescriptor) -> String {
    let name = descriptor.filename.trim();
    if name.is_empty() {
        format!("document-{document_id}.bin")
    } else {
        name.to_string()
    }
}

/// Fetch the original bytes and offer them as a download. The temporary
/// object URL is released before returning, whatever the outcome.
pub async fn download<B, U>(
    backend: &B,
    urls: &U,
    document_id: u64,
    descriptor: &FileDescriptor,
) -> Result<(), ApiError>
where
    B: PreviewBackend + ?Sized,
    U: ObjectUrls + ?Sized,
{
    let bytes = backend
        .fetch_file_bytes_as_binary(document_id, descriptor.id)
        .await?;
    let mime = descriptor
        .mimetype
        .as_deref()
        .unwrap_or("application/octet-stream");
    let handle = urls
        .create_binary_url(&bytes, mime)
        .ok_or_else(|| ApiError::Encode("could not create download URL".to_string()))?;
    let offered = urls.offer_download(&handle, &download_filename(document_id, descriptor));
    urls.release(handle);
    if offered {
        Ok(())
    } else {
        Err(ApiError::Encode("browser refused the download".to_string()))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    use super::*;

    /// In-memory backend keyed by file id.
    #[derive(Default)]
    pub struct FakeBackend {
        pub files: HashMap<u64, FileDescriptor>,
        pub texts: HashMap<u64, Result<String, ApiError>>,
        pub binaries: HashMap<u64, Vec<u8>>,
        pub failing_locations: Vec<u64>,
        pub location_calls: Cell<usize>,
    }

    #[async_trait(?Send)]
    impl PreviewBackend for FakeBackend {
        async fn fetch_file_metadata(
            &self,
            _document_id: u64,
            file_id: u64,
        ) -> Result<FileDescriptor, ApiError> {
            self.files.get(&file_id).cloned().ok_or(ApiError::NotFound)
        }

        async fn fetch_renderable_location(
            &self,
            document_id: u64,
            file_id: u64,
        ) -> Result<String, ApiError> {
            self.location_calls.set(self.location_calls.get() + 1);
            if self.failing_locations.contains(&file_id) {
                return Err(ApiError::Request("connection reset".to_string()));
            }
            Ok(format!("/documents/{document_id}/files/{file_id}/preview/"))
        }

        async fn fetch_file_bytes_as_text(
            &self,
            _document_id: u64,
            file_id: u64,
        ) -> Result<String, ApiError> {
            match self.texts.get(&file_id) {
                Some(Ok(text)) => Ok(text.clone()),
                Some(Err(ApiError::Decode(m))) => Err(ApiError::Decode(m.clone())),
                Some(Err(_)) => Err(ApiError::Request("connection reset".to_string())),
                None => Err(ApiError::NotFound),
            }
        }

        async fn fetch_file_bytes_as_binary(
            &self,
            _document_id: u64,
            file_id: u64,
        ) -> Result<Vec<u8>, ApiError> {
            self.binaries.get(&file_id).cloned().ok_or(ApiError::NotFound)
        }

        fn download_location(&self, document_id: u64, file_id: u64) -> String {
            format!("/documents/{document_id}/files/{file_id}/download/")
        }
    }

    /// Counts object URL allocations and releases.
    #[derive(Default)]
    pub struct FakeUrls {
        next: Cell<u32>,
        pub live: RefCell<Vec<String>>,
        pub released: RefCell<Vec<String>>,
        pub offered: RefCell<Vec<String>>,
    }

    impl FakeUrls {
        fn allocate(&self) -> ResourceHandle {
            let n = self.next.get() + 1;
            self.next.set(n);
            let url = format!("blob:test/{n}");
            self.live.borrow_mut().push(url.clone());
            ResourceHandle::new(url)
        }
    }

    impl ObjectUrls for FakeUrls {
        fn create_text_url(&self, _text: &str) -> Option<ResourceHandle> {
            Some(self.allocate())
        }

        fn create_binary_url(&self, _bytes: &[u8], _mime: &str) -> Option<ResourceHandle> {
            Some(self.allocate())
        }

        fn offer_download(&self, _handle: &ResourceHandle, filename: &str) -> bool {
            self.offered.borrow_mut().push(filename.to_string());
            true
        }

        fn release(&self, handle: ResourceHandle) {
            let url = handle.into_url();
            self.live.borrow_mut().retain(|u| u != &url);
            self.released.borrow_mut().push(url);
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::testing::{FakeBackend, FakeUrls};
    use super::*;
    use crate::viewers::classify::classify;

    #[test]
    fn visual_categories_resolve_to_a_location() {
        let backend = FakeBackend::default();
        let urls = FakeUrls::default();
        let scan = FileDescriptor::new(11, "scan.dcm").with_mimetype("application/dicom");

        let resolved = block_on(resolve(&backend, &urls, 7, &scan, classify(&scan))).unwrap();
        assert_eq!(
            resolved,
            ResolvedSource::Location("/documents/7/files/11/preview/".to_string())
        );
        assert!(urls.live.borrow().is_empty());
    }

    #[test]
    fn text_resolves_inline_and_allocates_raw_url() {
        let mut backend = FakeBackend::default();
        backend.texts.insert(3, Ok("hello".to_string()));
        let urls = FakeUrls::default();
        let notes = FileDescriptor::new(3, "notes.txt").with_mimetype("text/plain");

        let resolved = block_on(resolve(&backend, &urls, 1, &notes, FileCategory::PlainText)).unwrap();
        let (content, handle) = resolved.into_parts();
        assert_eq!(
            content,
            PreviewContent::Text {
                text: "hello".to_string(),
                raw_url: Some("blob:test/1".to_string())
            }
        );
        assert_eq!(backend.location_calls.get(), 0);
        urls.release(handle.unwrap());
        assert!(urls.live.borrow().is_empty());
    }

    #[test]
    fn unsupported_never_fetches() {
        let backend = FakeBackend::default();
        let urls = FakeUrls::default();
        let doc = FileDescriptor::new(5, "letter.docx");

        let resolved = block_on(resolve(&backend, &urls, 2, &doc, FileCategory::Unsupported)).unwrap();
        assert_eq!(
            resolved,
            ResolvedSource::DownloadOnly("/documents/2/files/5/download/".to_string())
        );
        assert_eq!(backend.location_calls.get(), 0);
    }

    #[test]
    fn decode_failure_is_reported_as_decode() {
        let mut backend = FakeBackend::default();
        backend
            .texts
            .insert(3, Err(ApiError::Decode("invalid utf-8".to_string())));
        let urls = FakeUrls::default();
        let notes = FileDescriptor::new(3, "notes.txt");

        let err = block_on(resolve(&backend, &urls, 1, &notes, FileCategory::PlainText)).unwrap_err();
        assert!(err.is_decode());
        assert!(err.to_string().contains("notes.txt"));
        assert!(urls.live.borrow().is_empty());
    }

    #[test]
    fn fetch_failure_carries_filename() {
        let mut backend = FakeBackend::default();
        backend.failing_locations.push(9);
        let urls = FakeUrls::default();
        let pdf = FileDescriptor::new(9, "b.pdf");

        let err = block_on(resolve(&backend, &urls, 1, &pdf, FileCategory::Document)).unwrap_err();
        assert!(!err.is_decode());
        assert!(err.to_string().starts_with("Could not load b.pdf"));
    }

    #[test]
    fn download_releases_its_object_url() {
        let mut backend = FakeBackend::default();
        backend.binaries.insert(4, vec![1, 2, 3]);
        let urls = FakeUrls::default();
        let file = FileDescriptor::new(4, "  ");

        block_on(download(&backend, &urls, 8, &file)).unwrap();
        assert_eq!(urls.offered.borrow().as_slice(), ["document-8.bin"]);
        assert_eq!(urls.released.borrow().len(), 1);
        assert!(urls.live.borrow().is_empty());
    }

    #[test]
    fn download_failure_allocates_nothing() {
        let backend = FakeBackend::default();
        let urls = FakeUrls::default();
        let file = FileDescriptor::new(4, "a.bin");

        let err = block_on(download(&backend, &urls, 8, &file)).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
        assert!(urls.released.borrow().is_empty());
    }
}
