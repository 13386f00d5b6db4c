use super::types::{
    AuthStatus, AuthUrlResponse, CreateFolderRequest, CreatedFolder, FinishAuthRequest,
    FinishAuthResponse, FolderPage, StructureResponse, UploadResponse,
};
use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::structure::StructureSpec;
use crate::upload::{DocumentUpload, LocalFile};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::{SystemTime, UNIX_EPOCH};

/// File name given to descriptors built in the structure editor.
const STRUCTURE_FILE_NAME: &str = "structure.json";

/// REST client for the upload backend.
///
/// Cloning is cheap and clones share the cookie store, so the session cookie
/// set by `/auth/finish` is sent with every later request.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    page_size: u32,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let client = Client::builder().cookie_store(true).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            page_size: config.folder_page_size,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn parse<T: DeserializeOwned>(path: &str, response: Response) -> ApiResult<T> {
        let status = response.status();
        if status.is_success() {
            let body = response.json::<T>().await?;
            tracing::debug!(path, %status, "Request succeeded");
            return Ok(body);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_body(status, &body);
        tracing::warn!(path, %status, error = %err, "Backend reported an error");
        Err(err)
    }

    pub async fn auth_status(&self) -> ApiResult<AuthStatus> {
        let path = "/auth/status";
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();

        tracing::debug!(path, "Checking session");
        let response = self
            .client
            .get(self.url(path))
            .query(&[("_t", stamp.to_string())])
            .send()
            .await?;
        Self::parse(path, response).await
    }

    pub async fn auth_url(&self) -> ApiResult<AuthUrlResponse> {
        let path = "/auth/dropbox";
        tracing::debug!(path, "Requesting authorization URL");
        let response = self.client.get(self.url(path)).send().await?;
        Self::parse(path, response).await
    }

    pub async fn finish_auth(&self, code: &str) -> ApiResult<FinishAuthResponse> {
        let path = "/auth/finish";
        tracing::debug!(path, "Exchanging authorization code");
        let response = self
            .client
            .post(self.url(path))
            .json(&FinishAuthRequest { code })
            .send()
            .await?;
        Self::parse(path, response).await
    }

    /// Fetches one page of folders. `None` asks for the first page.
    pub async fn list_folders(&self, cursor: Option<&str>) -> ApiResult<FolderPage> {
        let path = "/folders";
        let mut query = vec![("limit", self.page_size.to_string())];
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.to_string()));
        }

        tracing::debug!(path, continuation = cursor.is_some(), "Listing folders");
        let response = self
            .client
            .get(self.url(path))
            .query(&query)
            .send()
            .await?;
        Self::parse(path, response).await
    }

    pub async fn create_folder(&self, folder_name: &str) -> ApiResult<CreatedFolder> {
        let path = "/folders/create";
        tracing::debug!(path, folder_name, "Creating folder");
        let response = self
            .client
            .post(self.url(path))
            .json(&CreateFolderRequest { folder_name })
            .send()
            .await?;
        Self::parse(path, response).await
    }

    pub async fn upload_document(&self, upload: DocumentUpload) -> ApiResult<UploadResponse> {
        let path = "/upload";
        tracing::debug!(
            path,
            file = %upload.file.file_name,
            folder = %upload.folder,
            "Uploading document"
        );

        let form = Form::new()
            .part("file", file_part(upload.file)?)
            .text("clientName", upload.client_name)
            .text("documentType", upload.document_type)
            .text("date", upload.date)
            .text("folder", upload.folder);

        let response = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await?;
        Self::parse(path, response).await
    }

    pub async fn upload_to_root(&self, file: LocalFile) -> ApiResult<UploadResponse> {
        let path = "/upload-root";
        tracing::debug!(path, file = %file.file_name, "Uploading to root");
        let form = Form::new().part("file", file_part(file)?);
        let response = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await?;
        Self::parse(path, response).await
    }

    /// Sends a structure built in the editor as a JSON descriptor file.
    pub async fn create_structure(&self, structure: &StructureSpec) -> ApiResult<StructureResponse> {
        let file = LocalFile {
            file_name: STRUCTURE_FILE_NAME.to_string(),
            bytes: structure.to_json()?.into_bytes(),
            mime: "application/json",
        };
        self.upload_structure_file(file).await
    }

    /// Sends an existing descriptor file picked from disk.
    pub async fn upload_structure_file(&self, file: LocalFile) -> ApiResult<StructureResponse> {
        let path = "/structure/create";
        tracing::debug!(path, file = %file.file_name, "Creating folder structure");
        let form = Form::new().part("file", file_part(file)?);
        let response = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await?;
        Self::parse(path, response).await
    }
}

fn file_part(file: LocalFile) -> ApiResult<Part> {
    let part = Part::bytes(file.bytes)
        .file_name(file.file_name)
        .mime_str(file.mime)?;
    Ok(part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// Serves one canned reply per connection and hands back the raw
    /// requests it received.
    struct Backend {
        base_url: String,
        requests: JoinHandle<Vec<String>>,
    }

    impl Backend {
        async fn start(replies: Vec<String>) -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let base_url = format!("http://{}/api", listener.local_addr().unwrap());
            let requests = tokio::spawn(async move {
                let mut seen = Vec::new();
                for reply in replies {
                    let (mut stream, _) = listener.accept().await.unwrap();
                    seen.push(read_request(&mut stream).await);
                    stream.write_all(reply.as_bytes()).await.unwrap();
                    let _ = stream.shutdown().await;
                }
                seen
            });
            Self { base_url, requests }
        }

        fn client(&self) -> ApiClient {
            ApiClient::new(&ApiConfig {
                base_url: self.base_url.clone(),
                folder_page_size: 25,
            })
            .unwrap()
        }

        async fn requests(self) -> Vec<String> {
            self.requests.await.unwrap()
        }
    }

    fn reply(status: &str, headers: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n{}\r\n{}",
            status,
            body.len(),
            headers,
            body
        )
    }

    async fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        while !request_complete(&buf) {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn request_complete(buf: &[u8]) -> bool {
        let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
        if head.contains("transfer-encoding: chunked") {
            return buf.ends_with(b"0\r\n\r\n");
        }
        let length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        buf.len() >= end + 4 + length
    }

    fn request_line(request: &str) -> &str {
        request.lines().next().unwrap_or_default()
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let client = ApiClient::new(&ApiConfig {
            base_url: "http://localhost:5000/api/".to_string(),
            folder_page_size: 25,
        })
        .unwrap();
        assert_eq!(client.url("/folders"), "http://localhost:5000/api/folders");
        assert_eq!(client.page_size, 25);
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let client = ApiClient::new(&ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            folder_page_size: 10,
        })
        .unwrap();

        let err = client.list_folders(None).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[tokio::test]
    async fn folder_pages_send_limit_and_cursor() {
        let body = r#"{"folders":[{"id":"id:1","name":"Contracts","path":"/Contracts"}],"cursor":"c2","has_more":true}"#;
        let backend = Backend::start(vec![
            reply("200 OK", "", body),
            reply("200 OK", "", r#"{"folders":[],"cursor":null,"has_more":false}"#),
        ])
        .await;
        let client = backend.client();

        let first = client.list_folders(None).await.unwrap();
        assert_eq!(first.folders[0].path, "/Contracts");
        assert_eq!(first.cursor.as_deref(), Some("c2"));
        assert!(first.has_more);

        let last = client.list_folders(Some("c2")).await.unwrap();
        assert!(last.folders.is_empty());
        assert!(!last.has_more);

        let requests = backend.requests().await;
        assert_eq!(request_line(&requests[0]), "GET /api/folders?limit=25 HTTP/1.1");
        assert_eq!(
            request_line(&requests[1]),
            "GET /api/folders?limit=25&cursor=c2 HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn create_folder_posts_folder_name() {
        let body = r#"{"message":"Folder created","path":"/Invoices","id":"id:9","name":"Invoices"}"#;
        let backend = Backend::start(vec![reply("200 OK", "", body)]).await;

        let created = backend.client().create_folder("Invoices").await.unwrap();
        assert_eq!(created.path, "/Invoices");

        let requests = backend.requests().await;
        assert_eq!(request_line(&requests[0]), "POST /api/folders/create HTTP/1.1");
        assert!(requests[0]
            .to_ascii_lowercase()
            .contains("content-type: application/json"));
        assert!(requests[0].ends_with(r#"{"folderName":"Invoices"}"#));
    }

    #[tokio::test]
    async fn document_upload_sends_multipart_fields() {
        let body = r#"{"message":"File uploaded","filename":"ACME_Contract_2024-05-01.pdf","path":"/Contracts/ACME_Contract_2024-05-01.pdf"}"#;
        let backend = Backend::start(vec![reply("200 OK", "", body)]).await;

        let upload = DocumentUpload {
            file: LocalFile {
                file_name: "contract.pdf".to_string(),
                bytes: b"%PDF-1.4 test".to_vec(),
                mime: "application/pdf",
            },
            client_name: "ACME".to_string(),
            document_type: "Contract".to_string(),
            date: "2024-05-01".to_string(),
            folder: "/Contracts".to_string(),
        };
        let response = backend.client().upload_document(upload).await.unwrap();
        assert_eq!(
            response.filename.as_deref(),
            Some("ACME_Contract_2024-05-01.pdf")
        );

        let requests = backend.requests().await;
        let request = &requests[0];
        assert_eq!(request_line(request), "POST /api/upload HTTP/1.1");
        assert!(request
            .to_ascii_lowercase()
            .contains("content-type: multipart/form-data; boundary="));
        assert!(request.contains(r#"name="file"; filename="contract.pdf""#));
        assert!(request.contains("%PDF-1.4 test"));
        for (field, value) in [
            ("clientName", "ACME"),
            ("documentType", "Contract"),
            ("date", "2024-05-01"),
            ("folder", "/Contracts"),
        ] {
            let part = format!("name=\"{}\"\r\n\r\n{}\r\n", field, value);
            assert!(request.contains(&part), "missing field {}", field);
        }
    }

    #[tokio::test]
    async fn backend_error_body_becomes_backend_error() {
        let backend = Backend::start(vec![reply(
            "409 Conflict",
            "",
            r#"{"error":"A folder with that name already exists"}"#,
        )])
        .await;

        let err = backend.client().create_folder("Invoices").await.unwrap_err();
        match err {
            ApiError::Backend { status, message } => {
                assert_eq!(status, StatusCode::CONFLICT);
                assert_eq!(message, "A folder with that name already exists");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        backend.requests().await;
    }

    #[tokio::test]
    async fn session_cookie_is_sent_after_login() {
        let backend = Backend::start(vec![
            reply(
                "200 OK",
                "Set-Cookie: session=abc123; Path=/; HttpOnly\r\n",
                r#"{"status":"success","message":"Authenticated"}"#,
            ),
            reply(
                "200 OK",
                "",
                r#"{"status":"authenticated","user":{"name":"Ana","email":"ana@example.com"}}"#,
            ),
        ])
        .await;
        let client = backend.client();

        let finished = client.finish_auth("code-42").await.unwrap();
        assert!(finished.succeeded());
        // a clone shares the cookie store
        let status = client.clone().auth_status().await.unwrap();
        assert!(status.is_authenticated());

        let requests = backend.requests().await;
        assert_eq!(request_line(&requests[0]), "POST /api/auth/finish HTTP/1.1");
        assert!(requests[0].ends_with(r#"{"code":"code-42"}"#));
        assert!(request_line(&requests[1]).starts_with("GET /api/auth/status?_t="));
        assert!(requests[1]
            .to_ascii_lowercase()
            .contains("cookie: session=abc123"));
    }
}
