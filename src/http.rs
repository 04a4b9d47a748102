use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{ImageOptions, LiveResponse, MediaSource, TextOptions, VideoOptions};
use crate::utils::{determine_content_type, file_name_from_url, is_valid_url};
use log::debug;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

/// Constants for API paths
pub mod api_paths {
    /// Health check
    pub const LIVE: &str = "/v1/system/live";
    /// Synchronous image report
    pub const IMAGE_REPORT: &str = "/v2/image/sync";
    /// Synchronous video report
    pub const VIDEO_REPORT: &str = "/v2/video/sync";
    /// Voice report
    pub const VOICE_REPORT: &str = "/v1/reports/voice";
    /// Music report
    pub const MUSIC_REPORT: &str = "/v1/reports/music";
    /// Synchronous text report
    pub const TEXT_REPORT: &str = "/v2/text/sync";
}

/// Timeout for the health check, independent of the client timeout
pub const LIVE_TIMEOUT: Duration = Duration::from_secs(5);

const USER_AGENT: &str = concat!("aiornot-rust/", env!("CARGO_PKG_VERSION"));

/// Media content ready to be sent as a multipart file part
#[derive(Debug, Clone)]
pub(crate) struct Upload {
    pub data: Vec<u8>,
    pub file_name: String,
    pub content_type: &'static str,
}

impl Upload {
    pub fn new(data: Vec<u8>, file_name: Option<String>, default_name: &str) -> Self {
        let file_name = file_name.unwrap_or_else(|| default_name.to_string());
        let content_type = determine_content_type(Path::new(&file_name));
        Self {
            data,
            file_name,
            content_type,
        }
    }
}

/// Request body of a report call
#[derive(Debug, Clone)]
pub(crate) enum RequestBody {
    File {
        field: &'static str,
        upload: Upload,
    },
    Form(Vec<(&'static str, String)>),
}

/// A fully described report request, independent of the transport executing it
#[derive(Debug, Clone)]
pub(crate) struct ApiRequest {
    pub path: &'static str,
    pub query: Vec<(&'static str, String)>,
    pub body: RequestBody,
    /// Media label used in timeout messages
    pub label: &'static str,
}

pub(crate) fn image_request(upload: Upload, options: &ImageOptions) -> Result<ApiRequest> {
    let mut query = options.filter.query_pairs()?;
    if let Some(external_id) = &options.external_id {
        query.push(("external_id", external_id.clone()));
    }

    Ok(ApiRequest {
        path: api_paths::IMAGE_REPORT,
        query,
        body: RequestBody::File {
            field: "image",
            upload,
        },
        label: "Image",
    })
}

pub(crate) fn video_request(upload: Upload, options: &VideoOptions) -> Result<ApiRequest> {
    let mut query = options.filter.query_pairs()?;
    if let Some(external_id) = &options.external_id {
        query.push(("external_id", external_id.clone()));
    }

    Ok(ApiRequest {
        path: api_paths::VIDEO_REPORT,
        query,
        body: RequestBody::File {
            field: "video",
            upload,
        },
        label: "Video",
    })
}

pub(crate) fn voice_request(upload: Upload) -> ApiRequest {
    ApiRequest {
        path: api_paths::VOICE_REPORT,
        query: Vec::new(),
        body: RequestBody::File {
            field: "file",
            upload,
        },
        label: "Voice",
    }
}

pub(crate) fn music_request(upload: Upload) -> ApiRequest {
    ApiRequest {
        path: api_paths::MUSIC_REPORT,
        query: Vec::new(),
        body: RequestBody::File {
            field: "file",
            upload,
        },
        label: "Music",
    }
}

pub(crate) fn text_request(text: &str, options: &TextOptions) -> Result<ApiRequest> {
    crate::models::validate_text(text)?;

    let mut query = vec![(
        "include_annotations",
        options.include_annotations.to_string(),
    )];
    if let Some(external_id) = &options.external_id {
        query.push(("external_id", external_id.clone()));
    }

    Ok(ApiRequest {
        path: api_paths::TEXT_REPORT,
        query,
        body: RequestBody::Form(vec![("text", text.to_string())]),
        label: "Text",
    })
}

/// Parse a successful body, or map a failed one to the matching error
pub(crate) fn decode_response<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T> {
    if status.is_success() {
        return Ok(serde_json::from_slice(body)?);
    }
    Err(error_from_response(status.as_u16(), body))
}

/// Map a non-2xx response to an error by status code
pub(crate) fn error_from_response(status: u16, body: &[u8]) -> Error {
    let text = String::from_utf8_lossy(body).trim().to_string();
    let response = serde_json::from_slice::<Value>(body)
        .unwrap_or_else(|_| serde_json::json!({ "detail": text }));

    let message = match response.get("detail") {
        Some(detail) => detail_message(detail),
        None => text,
    };
    let message = if message.trim().is_empty() {
        default_message(status)
    } else {
        message
    };
    let response = Some(response);

    match status {
        401 => Error::Authentication {
            status_code: status,
            message,
            response,
        },
        422 => Error::Validation {
            status_code: Some(status),
            message,
            response,
        },
        429 => Error::RateLimit {
            status_code: status,
            message,
            response,
        },
        s if s >= 500 => Error::Server {
            status_code: status,
            message,
            response,
        },
        _ => Error::Api {
            status_code: status,
            message,
            response,
        },
    }
}

/// `detail` is either a plain message or a list of `{loc, msg}` validation entries
fn detail_message(detail: &Value) -> String {
    match detail {
        Value::String(message) => message.clone(),
        Value::Array(entries) => entries
            .iter()
            .map(|entry| {
                let loc = entry
                    .get("loc")
                    .and_then(Value::as_array)
                    .map(|parts| {
                        parts
                            .iter()
                            .map(|part| match part {
                                Value::String(s) => s.clone(),
                                other => other.to_string(),
                            })
                            .collect::<Vec<_>>()
                            .join(".")
                    })
                    .unwrap_or_default();
                let msg = entry.get("msg").and_then(Value::as_str).unwrap_or_default();
                format!("{loc}: {msg}")
            })
            .collect::<Vec<_>>()
            .join("; "),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn default_message(status: u16) -> String {
    match status {
        401 => "Invalid or missing API key".to_string(),
        422 => "Request validation failed".to_string(),
        429 => "Rate limit exceeded".to_string(),
        s if s >= 500 => "Server error".to_string(),
        s => format!("API error: {s}"),
    }
}

pub(crate) fn decode_is_live(status: StatusCode, body: &[u8]) -> bool {
    if !status.is_success() {
        return false;
    }
    serde_json::from_slice::<LiveResponse>(body)
        .map(|live| live.is_live)
        .unwrap_or(false)
}

fn transport_error(label: &str, error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::Timeout(format!("{label} analysis timed out: {error}"))
    } else {
        Error::RequestError(error)
    }
}

fn download_error(url: &str, error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::Timeout(format!("Fetching {url} timed out: {error}"))
    } else {
        Error::RequestError(error)
    }
}

fn missing_file(path: &Path) -> Error {
    Error::FileNotFound(path.display().to_string())
}

fn path_file_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.to_string())
}

/// Asynchronous HTTP transport
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    config: Config,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let client = reqwest::ClientBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.get_timeout_seconds()))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.get_base_url(), path)
    }

    /// Check the health endpoint; any failure counts as not live
    pub async fn is_live(&self) -> bool {
        let response = self
            .client
            .get(self.url(api_paths::LIVE))
            .bearer_auth(&self.config.api_key)
            .timeout(LIVE_TIMEOUT)
            .send()
            .await;

        match response {
            Ok(response) => {
                let status = response.status();
                match response.bytes().await {
                    Ok(body) => decode_is_live(status, &body),
                    Err(_) => false,
                }
            }
            Err(e) => {
                debug!("Health check failed: {e}");
                false
            }
        }
    }

    /// Execute a report request and parse the response
    pub(crate) async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let ApiRequest {
            path,
            query,
            body,
            label,
        } = request;
        debug!("POST {path} ({label})");

        let builder = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.config.api_key)
            .header("Accept", "application/json")
            .query(&query);

        let builder = match body {
            RequestBody::File { field, upload } => {
                let part = reqwest::multipart::Part::bytes(upload.data)
                    .file_name(upload.file_name)
                    .mime_str(upload.content_type)?;
                builder.multipart(reqwest::multipart::Form::new().part(field, part))
            }
            RequestBody::Form(pairs) => builder.form(&pairs),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(label, e))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(label, e))?;
        debug!("{path} responded with {status}");

        decode_response(status, &body)
    }

    /// Resolve a media source into uploadable content
    pub(crate) async fn load(&self, source: MediaSource, default_name: &str) -> Result<Upload> {
        match source {
            MediaSource::Path(path) => {
                if !path.is_file() {
                    return Err(missing_file(&path));
                }
                let data = tokio::fs::read(&path).await?;
                Ok(Upload::new(data, path_file_name(&path), default_name))
            }
            MediaSource::Bytes { data, file_name } => {
                Ok(Upload::new(data, file_name, default_name))
            }
            MediaSource::Url(url) => {
                let data = self.fetch_url(&url).await?;
                Ok(Upload::new(data, file_name_from_url(&url), default_name))
            }
        }
    }

    /// Download remote media; the API key is never sent to third-party hosts
    async fn fetch_url(&self, url: &str) -> Result<Vec<u8>> {
        is_valid_url(url)?;
        debug!("Fetching media from {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| download_error(url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::InvalidRequest(format!(
                "Failed to fetch {url}: HTTP {status}"
            )));
        }
        let body = response.bytes().await.map_err(|e| download_error(url, e))?;
        Ok(body.to_vec())
    }
}

/// Blocking HTTP transport
#[derive(Debug, Clone)]
pub struct BlockingHttpClient {
    client: reqwest::blocking::Client,
    config: Config,
}

impl BlockingHttpClient {
    /// Create a new blocking HTTP client with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let client = reqwest::blocking::ClientBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.get_timeout_seconds()))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.get_base_url(), path)
    }

    /// Check the health endpoint; any failure counts as not live
    pub fn is_live(&self) -> bool {
        let response = self
            .client
            .get(self.url(api_paths::LIVE))
            .bearer_auth(&self.config.api_key)
            .timeout(LIVE_TIMEOUT)
            .send();

        match response {
            Ok(response) => {
                let status = response.status();
                match response.bytes() {
                    Ok(body) => decode_is_live(status, &body),
                    Err(_) => false,
                }
            }
            Err(e) => {
                debug!("Health check failed: {e}");
                false
            }
        }
    }

    /// Execute a report request and parse the response
    pub(crate) fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let ApiRequest {
            path,
            query,
            body,
            label,
        } = request;
        debug!("POST {path} ({label})");

        let builder = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.config.api_key)
            .header("Accept", "application/json")
            .query(&query);

        let builder = match body {
            RequestBody::File { field, upload } => {
                let part = reqwest::blocking::multipart::Part::bytes(upload.data)
                    .file_name(upload.file_name)
                    .mime_str(upload.content_type)?;
                builder.multipart(reqwest::blocking::multipart::Form::new().part(field, part))
            }
            RequestBody::Form(pairs) => builder.form(&pairs),
        };

        let response = builder.send().map_err(|e| transport_error(label, e))?;
        let status = response.status();
        let body = response.bytes().map_err(|e| transport_error(label, e))?;
        debug!("{path} responded with {status}");

        decode_response(status, &body)
    }

    /// Resolve a media source into uploadable content
    pub(crate) fn load(&self, source: MediaSource, default_name: &str) -> Result<Upload> {
        match source {
            MediaSource::Path(path) => {
                if !path.is_file() {
                    return Err(missing_file(&path));
                }
                let data = std::fs::read(&path)?;
                Ok(Upload::new(data, path_file_name(&path), default_name))
            }
            MediaSource::Bytes { data, file_name } => {
                Ok(Upload::new(data, file_name, default_name))
            }
            MediaSource::Url(url) => {
                let data = self.fetch_url(&url)?;
                Ok(Upload::new(data, file_name_from_url(&url), default_name))
            }
        }
    }

    fn fetch_url(&self, url: &str) -> Result<Vec<u8>> {
        is_valid_url(url)?;
        debug!("Fetching media from {url}");

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| download_error(url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::InvalidRequest(format!(
                "Failed to fetch {url}: HTTP {status}"
            )));
        }
        let body = response.bytes().map_err(|e| download_error(url, e))?;
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisFilter, ImageAnalysisType};
    use mockito::Matcher;
    use serde_json::json;

    fn test_config(url: String) -> Config {
        Config {
            api_key: "test_api_key".to_string(),
            base_url: Some(url),
            ..Default::default()
        }
    }

    #[test]
    fn test_http_client_new() {
        assert!(HttpClient::new(test_config("https://api.aiornot.com".to_string())).is_ok());

        let invalid_config = Config {
            api_key: "".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            HttpClient::new(invalid_config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_error_mapping_by_status() {
        let cases = [
            (401, "AuthenticationError"),
            (422, "ValidationError"),
            (429, "RateLimitError"),
            (500, "ServerError"),
            (502, "ServerError"),
            (503, "ServerError"),
            (403, "APIError"),
            (404, "APIError"),
        ];

        for (status, kind) in cases {
            let error = error_from_response(status, br#"{"detail": "boom"}"#);
            assert_eq!(error.kind(), kind, "status {status}");
            assert_eq!(error.status_code(), Some(status));
            assert_eq!(error.to_string(), format!("[{status}] boom"));
        }
    }

    #[test]
    fn test_error_detail_list() {
        let body = json!({
            "detail": [
                {"loc": ["body", "image"], "msg": "field required"},
                {"loc": ["query", "only", 0], "msg": "invalid format"}
            ]
        });
        let error = error_from_response(422, body.to_string().as_bytes());

        match error {
            Error::Validation {
                status_code,
                message,
                response,
            } => {
                assert_eq!(status_code, Some(422));
                assert_eq!(
                    message,
                    "body.image: field required; query.only.0: invalid format"
                );
                assert_eq!(response, Some(body));
            }
            other => panic!("Unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_error_plain_text_body() {
        let error = error_from_response(500, b"Plain text error message");
        assert_eq!(error.to_string(), "[500] Plain text error message");
        assert_eq!(
            error.response(),
            Some(&json!({"detail": "Plain text error message"}))
        );
    }

    #[test]
    fn test_error_empty_body_uses_default_message() {
        assert_eq!(
            error_from_response(401, b"").to_string(),
            "[401] Invalid or missing API key"
        );
        assert_eq!(
            error_from_response(418, b"").to_string(),
            "[418] API error: 418"
        );
    }

    #[test]
    fn test_decode_is_live() {
        assert!(decode_is_live(StatusCode::OK, br#"{"is_live": true}"#));
        assert!(!decode_is_live(StatusCode::OK, br#"{"is_live": false}"#));
        assert!(!decode_is_live(StatusCode::OK, b"{}"));
        assert!(!decode_is_live(StatusCode::OK, b"not json"));
        assert!(!decode_is_live(
            StatusCode::SERVICE_UNAVAILABLE,
            br#"{"is_live": true}"#
        ));
    }

    #[test]
    fn test_image_request_query() {
        let options = ImageOptions {
            filter: AnalysisFilter::Excluding(vec![ImageAnalysisType::ReverseSearch]),
            external_id: Some("order-42".to_string()),
        };
        let upload = Upload::new(b"data".to_vec(), Some("cat.png".to_string()), "upload");
        let request = image_request(upload, &options).unwrap();

        assert_eq!(request.path, api_paths::IMAGE_REPORT);
        assert_eq!(
            request.query,
            vec![
                ("excluding", "reverse_search".to_string()),
                ("external_id", "order-42".to_string())
            ]
        );
        match request.body {
            RequestBody::File { field, upload } => {
                assert_eq!(field, "image");
                assert_eq!(upload.file_name, "cat.png");
                assert_eq!(upload.content_type, "image/png");
            }
            other => panic!("Unexpected body: {:?}", other),
        }
    }

    #[test]
    fn test_text_request_rejects_short_text() {
        let result = text_request("too short", &TextOptions::default());
        assert!(matches!(result, Err(Error::Validation { status_code: None, .. })));
    }

    #[tokio::test]
    async fn test_send_text_request() {
        let mut server = mockito::Server::new_async().await;

        let _m = server
            .mock("POST", "/v2/text/sync")
            .match_header("authorization", "Bearer test_api_key")
            .match_query(Matcher::UrlEncoded(
                "include_annotations".into(),
                "true".into(),
            ))
            .match_body(Matcher::UrlEncoded(
                "text".into(),
                "Some text that is long enough".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"ok": true}).to_string())
            .create_async()
            .await;

        let client = HttpClient::new(test_config(server.url())).unwrap();
        let options = TextOptions {
            include_annotations: true,
            external_id: None,
        };
        let request = text_request("Some text that is long enough", &options).unwrap();
        let value: Value = client.send(request).await.unwrap();
        assert_eq!(value, json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_send_maps_api_error() {
        let mut server = mockito::Server::new_async().await;

        let _m = server
            .mock("POST", "/v1/reports/voice")
            .with_status(429)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail": "Rate limit exceeded"}"#)
            .create_async()
            .await;

        let client = HttpClient::new(test_config(server.url())).unwrap();
        let upload = Upload::new(b"mp3".to_vec(), None, "audio.mp3");
        let result: Result<Value> = client.send(voice_request(upload)).await;

        match result {
            Err(Error::RateLimit {
                status_code,
                message,
                ..
            }) => {
                assert_eq!(status_code, 429);
                assert_eq!(message, "Rate limit exceeded");
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_is_live() {
        let mut server = mockito::Server::new_async().await;

        let _m = server
            .mock("GET", "/v1/system/live")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"is_live": true}"#)
            .create_async()
            .await;

        let client = HttpClient::new(test_config(server.url())).unwrap();
        assert!(client.is_live().await);
    }

    #[tokio::test]
    async fn test_is_live_unreachable_host() {
        // Nothing listens on the discard port
        let client = HttpClient::new(test_config("http://127.0.0.1:9".to_string())).unwrap();
        assert!(!client.is_live().await);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let client = HttpClient::new(test_config("https://api.aiornot.com".to_string())).unwrap();
        let result = client
            .load(MediaSource::Path("/no/such/file.jpg".into()), "upload")
            .await;
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }

    #[tokio::test]
    async fn test_load_url_source() {
        let mut server = mockito::Server::new_async().await;

        let _m = server
            .mock("GET", "/media/cat.png")
            .with_status(200)
            .with_body("png bytes")
            .create_async()
            .await;

        let client = HttpClient::new(test_config(server.url())).unwrap();
        let upload = client
            .load(
                MediaSource::Url(format!("{}/media/cat.png", server.url())),
                "upload",
            )
            .await
            .unwrap();

        assert_eq!(upload.data, b"png bytes");
        assert_eq!(upload.file_name, "cat.png");
        assert_eq!(upload.content_type, "image/png");
    }

    #[test]
    fn test_blocking_send_image_request() {
        let mut server = mockito::Server::new();

        let _m = server
            .mock("POST", "/v2/image/sync")
            .match_header("authorization", "Bearer test_api_key")
            .match_query(Matcher::UrlEncoded("only".into(), "nsfw".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": "abc"}"#)
            .create();

        let client = BlockingHttpClient::new(test_config(server.url())).unwrap();
        let options = ImageOptions {
            filter: AnalysisFilter::Only(vec![ImageAnalysisType::Nsfw]),
            external_id: None,
        };
        let upload = Upload::new(b"jpg".to_vec(), None, "upload");
        let value: Value = client.send(image_request(upload, &options).unwrap()).unwrap();
        assert_eq!(value["id"], "abc");
    }
}
