//! # Document Fetchers
//!
//! A [`DocumentFetcher`] turns a [`DocumentRef`] into plain text: it retrieves the raw
//! bytes and runs them through [`extract_text`]. Two implementations are provided, one
//! over HTTP for uploaded files and one over the local file system, plus
//! [`DocumentLoader`] which picks between them per reference.

use async_trait::async_trait;
use common::config::FetchConfig;
use reqwest::Client;
use std::time::Duration;

use crate::document::{DocumentKind, DocumentRef, extract_text};
use crate::error::FetchError;

#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Retrieve a document and extract its plain text.
    async fn fetch_text(&self, document: &DocumentRef) -> Result<String, FetchError>;
}

/// Downloads documents over HTTP(S).
pub struct HttpDocumentFetcher {
    client: Client,
    max_bytes: u64,
}

impl HttpDocumentFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            max_bytes: config.max_bytes,
        })
    }
}

#[async_trait]
impl DocumentFetcher for HttpDocumentFetcher {
    async fn fetch_text(&self, document: &DocumentRef) -> Result<String, FetchError> {
        let DocumentRef::Url(url) = document else {
            return Err(FetchError::UnsupportedLocation(document.to_string()));
        };

        tracing::debug!(%url, "downloading document");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        if response
            .content_length()
            .is_some_and(|len| len > self.max_bytes)
        {
            return Err(FetchError::TooLarge {
                limit: self.max_bytes,
            });
        }

        let bytes = response.bytes().await?;
        if bytes.len() as u64 > self.max_bytes {
            return Err(FetchError::TooLarge {
                limit: self.max_bytes,
            });
        }

        let name = document.file_name();
        let kind = DocumentKind::detect(name.as_deref(), &bytes)?;
        Ok(extract_text(bytes.to_vec(), kind)?)
    }
}

/// Reads documents from the local file system.
pub struct FsDocumentFetcher {
    max_bytes: u64,
}

impl FsDocumentFetcher {
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            max_bytes: config.max_bytes,
        }
    }
}

#[async_trait]
impl DocumentFetcher for FsDocumentFetcher {
    async fn fetch_text(&self, document: &DocumentRef) -> Result<String, FetchError> {
        let DocumentRef::Path(path) = document else {
            return Err(FetchError::UnsupportedLocation(document.to_string()));
        };

        let io_err = |source| FetchError::Io {
            path: path.display().to_string(),
            source,
        };

        let metadata = tokio::fs::metadata(path).await.map_err(io_err)?;
        if metadata.len() > self.max_bytes {
            return Err(FetchError::TooLarge {
                limit: self.max_bytes,
            });
        }

        let bytes = tokio::fs::read(path).await.map_err(io_err)?;
        let name = document.file_name();
        let kind = DocumentKind::detect(name.as_deref(), &bytes)?;
        Ok(extract_text(bytes, kind)?)
    }
}

/// Dispatches URLs to [`HttpDocumentFetcher`] and paths to [`FsDocumentFetcher`].
pub struct DocumentLoader {
    http: HttpDocumentFetcher,
    fs: FsDocumentFetcher,
}

impl DocumentLoader {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        Ok(Self {
            http: HttpDocumentFetcher::new(config)?,
            fs: FsDocumentFetcher::new(config),
        })
    }
}

#[async_trait]
impl DocumentFetcher for DocumentLoader {
    async fn fetch_text(&self, document: &DocumentRef) -> Result<String, FetchError> {
        match document {
            DocumentRef::Url(_) => self.http.fetch_text(document).await,
            DocumentRef::Path(_) => self.fs.fetch_text(document).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::test_support::docx_bytes;
    use axum::{Router, http::StatusCode, routing::get};
    use std::path::PathBuf;

    fn fetch_config(max_bytes: u64) -> FetchConfig {
        FetchConfig {
            timeout_secs: 5,
            max_bytes,
            concurrency: 4,
        }
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn test_router() -> Router {
        Router::new()
            .route("/files/essay.docx", get(|| async { docx_bytes(&["Hello", "World"]) }))
            .route("/files/notes.txt", get(|| async { "plain notes" }))
            .route("/files/big.txt", get(|| async { "x".repeat(64) }))
            .route(
                "/files/missing.docx",
                get(|| async { (StatusCode::NOT_FOUND, "gone") }),
            )
    }

    #[tokio::test]
    async fn test_http_fetch_docx() {
        let base = serve(test_router()).await;
        let fetcher = HttpDocumentFetcher::new(&fetch_config(1024 * 1024)).unwrap();
        let text = fetcher
            .fetch_text(&DocumentRef::Url(format!("{base}/files/essay.docx?dl=1")))
            .await
            .unwrap();
        assert_eq!(text, "Hello\nWorld");
    }

    #[tokio::test]
    async fn test_http_fetch_text() {
        let base = serve(test_router()).await;
        let fetcher = HttpDocumentFetcher::new(&fetch_config(1024)).unwrap();
        let text = fetcher
            .fetch_text(&DocumentRef::Url(format!("{base}/files/notes.txt")))
            .await
            .unwrap();
        assert_eq!(text, "plain notes");
    }

    #[tokio::test]
    async fn test_http_status_error() {
        let base = serve(test_router()).await;
        let fetcher = HttpDocumentFetcher::new(&fetch_config(1024)).unwrap();
        let err = fetcher
            .fetch_text(&DocumentRef::Url(format!("{base}/files/missing.docx")))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status(404)));
    }

    #[tokio::test]
    async fn test_http_size_limit() {
        let base = serve(test_router()).await;
        let fetcher = HttpDocumentFetcher::new(&fetch_config(16)).unwrap();
        let err = fetcher
            .fetch_text(&DocumentRef::Url(format!("{base}/files/big.txt")))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::TooLarge { limit: 16 }));
    }

    #[tokio::test]
    async fn test_http_rejects_paths() {
        let fetcher = HttpDocumentFetcher::new(&fetch_config(16)).unwrap();
        let err = fetcher
            .fetch_text(&DocumentRef::Path(PathBuf::from("essay.docx")))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::UnsupportedLocation(_)));
    }

    #[tokio::test]
    async fn test_fs_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let docx = dir.path().join("essay.docx");
        std::fs::write(&docx, docx_bytes(&["From disk"])).unwrap();

        let fetcher = FsDocumentFetcher::new(&fetch_config(1024 * 1024));
        assert_eq!(
            fetcher.fetch_text(&DocumentRef::Path(docx)).await.unwrap(),
            "From disk"
        );
    }

    #[tokio::test]
    async fn test_fs_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = FsDocumentFetcher::new(&fetch_config(1024));
        let err = fetcher
            .fetch_text(&DocumentRef::Path(dir.path().join("nope.docx")))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Io { .. }));
    }

    #[tokio::test]
    async fn test_fs_unsupported_format_is_extract_error() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("essay.pdf");
        std::fs::write(&pdf, b"%PDF-1.7").unwrap();
        let fetcher = FsDocumentFetcher::new(&fetch_config(1024));
        let err = fetcher.fetch_text(&DocumentRef::Path(pdf)).await.unwrap_err();
        assert!(matches!(err, FetchError::Extract(_)));
    }

    #[tokio::test]
    async fn test_loader_dispatches_by_location() {
        let base = serve(test_router()).await;
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("local.txt");
        std::fs::write(&local, "on disk").unwrap();

        let loader = DocumentLoader::new(&fetch_config(1024)).unwrap();
        let remote = DocumentRef::parse(&format!("{base}/files/notes.txt"));
        let local = DocumentRef::parse(local.to_str().unwrap());
        assert_eq!(loader.fetch_text(&remote).await.unwrap(), "plain notes");
        assert_eq!(loader.fetch_text(&local).await.unwrap(), "on disk");
    }
}
