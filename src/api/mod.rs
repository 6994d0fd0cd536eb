use futures::future::join_all;
use serde::{Deserialize, Serialize};

/// Default backend; can be overridden via the `api_base_url` setting.
pub const DEFAULT_BASE_URL: &str = "https://marthanote.onrender.com/api";

/// Header naming the installation a request belongs to.
pub const DEVICE_ID_HEADER: &str = "X-Device-Id";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Document {
    pub id: String,
    pub filename: String,
    pub summary: String,
    pub upload_time: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UploadResponse {
    pub id: String,
    pub filename: String,
    pub summary: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AskResponse {
    pub answer: String,
    pub source_chunks: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteResponse {
    pub deleted: u64,
}

#[derive(Serialize)]
struct AskRequest<'a> {
    question: &'a str,
    document_ids: Option<Vec<String>>,
    use_chat_history: bool,
}

#[derive(Serialize)]
struct BulkDeleteRequest<'a> {
    document_ids: &'a [String],
}

/// A file picked for upload, already read from disk.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Serialize for ApiError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Typed client for the document/chat backend. Every request carries the
/// device identifier in the `X-Device-Id` header.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    device_id: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, device_id: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            device_id: device_id.into(),
        }
    }

    pub async fn fetch_documents(&self) -> Result<Vec<Document>, ApiError> {
        let resp = self
            .http
            .get(format!("{}/documents", self.base_url))
            .header(DEVICE_ID_HEADER, &self.device_id)
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    pub async fn upload_file(&self, file: FileUpload) -> Result<UploadResponse, ApiError> {
        let part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.filename);
        let form = reqwest::multipart::Form::new().part("file", part);
        let resp = self
            .http
            .post(format!("{}/upload", self.base_url))
            .header(DEVICE_ID_HEADER, &self.device_id)
            .multipart(form)
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    /// One request per file, all in flight at once. The first failure is
    /// reported after every request settles; files that made it stay on the
    /// server.
    pub async fn upload_files(
        &self,
        files: Vec<FileUpload>,
    ) -> Result<Vec<UploadResponse>, ApiError> {
        let results = join_all(files.into_iter().map(|f| self.upload_file(f))).await;
        results.into_iter().collect()
    }

    pub async fn delete_document(&self, id: &str) -> Result<(), ApiError> {
        let resp = self
            .http
            .delete(format!("{}/documents/{}", self.base_url, id))
            .header(DEVICE_ID_HEADER, &self.device_id)
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    pub async fn bulk_delete(&self, ids: &[String]) -> Result<BulkDeleteResponse, ApiError> {
        let resp = self
            .http
            .post(format!("{}/documents/bulk-delete", self.base_url))
            .header(DEVICE_ID_HEADER, &self.device_id)
            .json(&BulkDeleteRequest { document_ids: ids })
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    /// `document_ids == None` asks across all documents (global scope).
    pub async fn ask(
        &self,
        question: &str,
        document_ids: Option<Vec<String>>,
    ) -> Result<AskResponse, ApiError> {
        let body = AskRequest {
            question,
            document_ids,
            use_chat_history: true,
        };
        let resp = self
            .http
            .post(format!("{}/ask", self.base_url))
            .header(DEVICE_ID_HEADER, &self.device_id)
            .json(&body)
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }
}

async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let text = resp.text().await.unwrap_or_default();
        return Err(ApiError::Api {
            status,
            message: text,
        });
    }
    Ok(resp)
}
