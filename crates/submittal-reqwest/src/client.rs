//! Renderer client implementation using reqwest.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use submittal_core::{Error, PacketRequest, Renderer, RendererService, ServiceHealth};
use url::Url;

use crate::TRACING_TARGET;
use crate::config::RendererConfig;

/// Upper bound for the health check, independent of the render deadline.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

/// Inner client that holds the HTTP client and resolved endpoints.
struct ReqwestRendererInner {
    http: Client,
    config: RendererConfig,
    generate_url: Url,
    health_url: Url,
}

/// HTTP client for the remote packet renderer.
///
/// Cheap to clone; clones share one connection pool.
///
/// # Examples
///
/// ```rust,ignore
/// use submittal_reqwest::{ReqwestRenderer, RendererConfig};
///
/// let renderer = ReqwestRenderer::new(RendererConfig::new("https://render.example.com"))?;
/// let pdf = renderer.render(&request).await?;
/// ```
#[derive(Clone)]
pub struct ReqwestRenderer {
    inner: Arc<ReqwestRendererInner>,
}

impl std::fmt::Debug for ReqwestRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestRenderer")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestRenderer {
    /// Creates a new renderer client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the renderer URL is invalid or the HTTP client
    /// cannot be created.
    pub fn new(config: RendererConfig) -> crate::Result<Self> {
        let generate_url = config.generate_url()?;
        let health_url = config.health_url()?;
        let timeout = config.effective_timeout();

        tracing::debug!(
            target: TRACING_TARGET,
            endpoint = %generate_url,
            timeout_ms = timeout.as_millis(),
            "Creating renderer client"
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(config.effective_user_agent())
            .build()?;

        let inner = ReqwestRendererInner {
            http,
            config,
            generate_url,
            health_url,
        };

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &RendererConfig {
        &self.inner.config
    }

    /// Converts this client into a [`RendererService`].
    pub fn into_service(self) -> RendererService {
        RendererService::new(self)
    }

    /// Maps a reqwest failure onto the packet error taxonomy.
    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            return Error::Timeout {
                operation: "render",
                after: self.inner.config.effective_timeout(),
            };
        }

        let endpoint = self.inner.generate_url.as_str();
        if err.is_connect() {
            return Error::renderer_unreachable(endpoint, err);
        }

        Error::transport(endpoint, err)
    }
}

/// Extracts a human-readable message from a failure body.
///
/// A JSON body contributes its `message` (or `error`) string when present and
/// its full text otherwise; anything else is used verbatim.
fn failure_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_owned();
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => ["message", "error"]
            .iter()
            .find_map(|key| value.get(key).and_then(|v| v.as_str()))
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| value.to_string()),
        Err(_) => body.to_owned(),
    }
}

#[async_trait::async_trait]
impl Renderer for ReqwestRenderer {
    async fn render(&self, request: &PacketRequest) -> submittal_core::Result<Bytes> {
        let started_at = Instant::now();
        let payload = serde_json::to_vec(request)?;

        tracing::debug!(
            target: TRACING_TARGET,
            endpoint = %self.inner.generate_url,
            documents = request.documents.len(),
            payload_bytes = payload.len(),
            "Submitting packet to renderer"
        );

        let response = self
            .inner
            .http
            .post(self.inner.generate_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .timeout(self.inner.config.effective_timeout())
            .body(payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            // A body that cannot be read still leaves the status to report.
            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    tracing::debug!(
                        target: TRACING_TARGET,
                        status = status.as_u16(),
                        error = %err,
                        "Failed to read renderer failure body"
                    );
                    String::new()
                }
            };
            let message = failure_message(status, &body);

            tracing::warn!(
                target: TRACING_TARGET,
                status = status.as_u16(),
                message = %message,
                "Renderer rejected packet"
            );

            return Err(Error::render(status.as_u16(), message));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        if bytes.is_empty() {
            tracing::warn!(
                target: TRACING_TARGET,
                status = status.as_u16(),
                "Renderer returned an empty body"
            );
            return Err(Error::EmptyArtifact);
        }

        tracing::debug!(
            target: TRACING_TARGET,
            status = status.as_u16(),
            size = bytes.len(),
            elapsed_ms = started_at.elapsed().as_millis(),
            "Renderer returned packet"
        );

        Ok(bytes)
    }

    fn endpoint(&self) -> &str {
        self.inner.generate_url.as_str()
    }

    async fn health_check(&self) -> submittal_core::Result<ServiceHealth> {
        let started_at = Instant::now();
        let timeout = self.inner.config.effective_timeout().min(HEALTH_TIMEOUT);

        let result = self
            .inner
            .http
            .get(self.inner.health_url.clone())
            .timeout(timeout)
            .send()
            .await;

        let health = match result {
            Ok(response) if response.status().is_success() => ServiceHealth::healthy(),
            Ok(response) => {
                ServiceHealth::degraded(format!("health endpoint returned {}", response.status()))
            }
            Err(err) if err.is_timeout() => ServiceHealth::unhealthy("health check timed out"),
            Err(err) => ServiceHealth::unhealthy(format!("renderer unreachable: {err}")),
        };

        Ok(health.with_response_time(started_at.elapsed()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use axum::Json;
    use axum::Router;
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::{get, post};
    use serde_json::{Value, json};
    use submittal_core::{ProjectData, ServiceStatus};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    use super::*;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn unused_address() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }

    fn renderer(base: &str) -> ReqwestRenderer {
        ReqwestRenderer::new(RendererConfig::new(base).with_timeout(1)).unwrap()
    }

    fn request() -> PacketRequest {
        PacketRequest::new(
            &ProjectData::default()
                .with_field("projectName", "Tower A")
                .unwrap(),
            Vec::new(),
            vec!["Warranty".to_owned()],
        )
    }

    #[test]
    fn test_failure_message() {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        assert_eq!(failure_message(status, r#"{"message":"boom"}"#), "boom");
        assert_eq!(failure_message(status, r#"{"error":"bad"}"#), "bad");
        assert_eq!(failure_message(status, r#"{"code":7}"#), r#"{"code":7}"#);
        assert_eq!(failure_message(status, "plain failure\n"), "plain failure");
        assert_eq!(failure_message(status, ""), "Internal Server Error");
    }

    #[tokio::test]
    async fn test_render_success_sends_wire_contract() {
        let seen = Arc::new(Mutex::new(None::<Value>));
        let captured = seen.clone();
        let router = Router::new().route(
            "/generate-packet",
            post(move |Json(body): Json<Value>| {
                let captured = captured.clone();
                async move {
                    *captured.lock().unwrap() = Some(body);
                    (
                        [(axum::http::header::CONTENT_TYPE, "application/pdf")],
                        b"%PDF-1.7 packet".to_vec(),
                    )
                }
            }),
        );
        let base = serve(router).await;

        let bytes = renderer(&base).render(&request()).await.unwrap();
        assert_eq!(&bytes[..], b"%PDF-1.7 packet");

        let body = seen.lock().unwrap().take().unwrap();
        assert_eq!(body["projectData"]["projectName"], "Tower A");
        assert_eq!(body["projectData"]["status"]["forRecord"], false);
        assert_eq!(body["projectData"]["submittalType"]["msds"], false);
        assert_eq!(body["documents"], json!([]));
        assert_eq!(body["selectedDocumentNames"], json!([]));
        assert_eq!(body["allAvailableDocuments"], json!(["Warranty"]));
    }

    #[tokio::test]
    async fn test_render_json_failure() {
        let router = Router::new().route(
            "/generate-packet",
            post(|| async {
                (
                    AxumStatus::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "boom" })),
                )
            }),
        );
        let base = serve(router).await;

        let error = renderer(&base).render(&request()).await.unwrap_err();
        match &error {
            Error::Render { status, message } => {
                assert_eq!(*status, 500);
                assert!(message.contains("boom"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(error.to_string().contains("boom"));
    }

    #[tokio::test]
    async fn test_render_text_failure() {
        let router = Router::new().route(
            "/generate-packet",
            post(|| async { (AxumStatus::UNPROCESSABLE_ENTITY, "missing project name") }),
        );
        let base = serve(router).await;

        let error = renderer(&base).render(&request()).await.unwrap_err();
        assert!(matches!(
            error,
            Error::Render { status: 422, ref message } if message == "missing project name"
        ));
    }

    #[tokio::test]
    async fn test_render_empty_body() {
        let router = Router::new().route("/generate-packet", post(|| async { AxumStatus::OK }));
        let base = serve(router).await;

        let error = renderer(&base).render(&request()).await.unwrap_err();
        assert!(matches!(error, Error::EmptyArtifact));
    }

    #[tokio::test]
    async fn test_render_unreachable() {
        let base = unused_address().await;
        let renderer = renderer(&base);

        let error = renderer.render(&request()).await.unwrap_err();
        match error {
            Error::RendererUnreachable { endpoint, .. } => {
                assert_eq!(endpoint, format!("{base}/generate-packet"));
                assert_eq!(endpoint, renderer.endpoint());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_render_truncated_body_is_transport_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Type: application/pdf\r\nContent-Length: 100\r\n\r\n%PDF-")
                .await
                .unwrap();
            socket.shutdown().await.unwrap();
        });

        let error = renderer(&base).render(&request()).await.unwrap_err();
        match &error {
            Error::Transport { endpoint, .. } => {
                assert_eq!(*endpoint, format!("{base}/generate-packet"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(error.kind_str(), "transport");
    }

    /// Reads one request with a `Content-Length` body off the socket.
    async fn read_request(socket: &mut tokio::net::TcpStream) {
        let mut buffer = Vec::new();
        let mut chunk = [0_u8; 4096];
        loop {
            let read = socket.read(&mut chunk).await.unwrap();
            assert_ne!(read, 0, "client closed before sending the request");
            buffer.extend_from_slice(&chunk[..read]);

            let text = String::from_utf8_lossy(&buffer);
            let Some(header_end) = text.find("\r\n\r\n") else {
                continue;
            };
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buffer.len() >= header_end + 4 + content_length {
                return;
            }
        }
    }

    #[tokio::test]
    async fn test_render_deadline() {
        let router = Router::new().route(
            "/generate-packet",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                b"%PDF-late".to_vec()
            }),
        );
        let base = serve(router).await;

        let error = renderer(&base).render(&request()).await.unwrap_err();
        assert!(matches!(
            error,
            Error::Timeout {
                operation: "render",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_health_check() {
        let router = Router::new().route("/health", get(|| async { "ok" }));
        let base = serve(router).await;
        let health = renderer(&base).health_check().await.unwrap();
        assert_eq!(health.status, ServiceStatus::Healthy);

        let base = serve(Router::new()).await;
        let health = renderer(&base).health_check().await.unwrap();
        assert_eq!(health.status, ServiceStatus::Degraded);

        let base = unused_address().await;
        let health = renderer(&base).health_check().await.unwrap();
        assert_eq!(health.status, ServiceStatus::Unhealthy);
    }

    #[test]
    fn test_invalid_config() {
        assert!(ReqwestRenderer::new(RendererConfig::new("not a url")).is_err());
    }
}
