//! HTTP client for the host's workspace API.
//!
//! Each operation is a `POST {base_url}/workspaces/{command}` with a JSON
//! body naming the workspace id and file path. File contents travel as
//! standard base64 in both directions. The response body is
//! `{"stdout": ..., "stderr": ...}`; a non-empty `stderr` is a failure even
//! on HTTP 200.

use super::WorkspaceStore;
use crate::error::Pdf2PngError;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileCommand<'a> {
    id: &'a str,
    file_path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    contents: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CommandResponse {
    #[serde(default)]
    stdout: Option<String>,
    #[serde(default)]
    stderr: Option<String>,
}

/// Why a command failed, before it is mapped onto a read or write error.
enum CommandError {
    NotFound,
    Failed(String),
}

/// Workspace store backed by the host's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpWorkspace {
    client: reqwest::Client,
    base_url: String,
    workspace_id: String,
}

impl HttpWorkspace {
    /// Create a client for `workspace_id` on the API at `base_url`.
    ///
    /// No request timeout is set; calls wait as long as the host takes.
    pub fn new(
        base_url: impl Into<String>,
        workspace_id: impl Into<String>,
    ) -> Result<Self, Pdf2PngError> {
        let base_url = base_url.into();
        let workspace_id = workspace_id.into();

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Pdf2PngError::InvalidConfig(format!(
                "workspace URL must be http:// or https://, got '{base_url}'"
            )));
        }
        if workspace_id.trim().is_empty() {
            return Err(Pdf2PngError::MissingSetting {
                name: "workspace_id",
                env: "GPTSCRIPT_WORKSPACE_ID",
            });
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("pdf2png/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Pdf2PngError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            workspace_id,
        })
    }

    /// Full URL of a workspace command.
    fn command_url(&self, command: &str) -> String {
        format!("{}/workspaces/{}", self.base_url, command)
    }

    async fn run_command(
        &self,
        command: &str,
        body: &FileCommand<'_>,
    ) -> Result<CommandResponse, CommandError> {
        let url = self.command_url(command);
        debug!("POST {} ({})", url, body.file_path);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| CommandError::Failed(format!("POST {url}: {e}")))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CommandError::NotFound);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(CommandError::Failed(format!("HTTP {status}: {}", text.trim())));
        }

        let parsed: CommandResponse = response
            .json()
            .await
            .map_err(|e| CommandError::Failed(format!("malformed response: {e}")))?;

        match parsed.stderr.as_deref().map(str::trim) {
            Some(err) if !err.is_empty() => {
                if err.to_ascii_lowercase().contains("not found") {
                    Err(CommandError::NotFound)
                } else {
                    Err(CommandError::Failed(err.to_string()))
                }
            }
            _ => Ok(parsed),
        }
    }
}

#[async_trait]
impl WorkspaceStore for HttpWorkspace {
    fn name(&self) -> &str {
        "http"
    }

    async fn read_file(&self, path: &str) -> Result<Vec<u8>, Pdf2PngError> {
        let body = FileCommand {
            id: &self.workspace_id,
            file_path: path,
            contents: None,
        };

        let response = self
            .run_command("read-file", &body)
            .await
            .map_err(|e| match e {
                CommandError::NotFound => Pdf2PngError::WorkspaceNotFound {
                    path: path.to_string(),
                },
                CommandError::Failed(reason) => Pdf2PngError::WorkspaceReadFailed {
                    path: path.to_string(),
                    reason,
                },
            })?;

        let encoded = response.stdout.unwrap_or_default();
        STANDARD
            .decode(encoded.trim())
            .map_err(|e| Pdf2PngError::WorkspaceReadFailed {
                path: path.to_string(),
                reason: format!("invalid base64 content: {e}"),
            })
    }

    async fn write_file(&self, path: &str, contents: &[u8]) -> Result<(), Pdf2PngError> {
        let body = FileCommand {
            id: &self.workspace_id,
            file_path: path,
            contents: Some(STANDARD.encode(contents)),
        };

        self.run_command("write-file", &body)
            .await
            .map(|_| ())
            .map_err(|e| Pdf2PngError::WorkspaceWriteFailed {
                path: path.to_string(),
                reason: match e {
                    CommandError::NotFound => "workspace not found".to_string(),
                    CommandError::Failed(reason) => reason,
                },
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_http_url() {
        let err = HttpWorkspace::new("ftp://host", "ws-1").unwrap_err();
        assert!(matches!(err, Pdf2PngError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_blank_workspace_id() {
        let err = HttpWorkspace::new("http://127.0.0.1:9090", " ").unwrap_err();
        assert!(matches!(
            err,
            Pdf2PngError::MissingSetting {
                env: "GPTSCRIPT_WORKSPACE_ID",
                ..
            }
        ));
    }

    #[test]
    fn command_url_trims_trailing_slash() {
        let ws = HttpWorkspace::new("http://127.0.0.1:9090/", "ws-1").unwrap();
        assert_eq!(
            ws.command_url("read-file"),
            "http://127.0.0.1:9090/workspaces/read-file"
        );
    }

    #[test]
    fn write_body_carries_base64_contents() {
        let body = FileCommand {
            id: "ws-1",
            file_path: "files/a_page_0.png",
            contents: Some(STANDARD.encode(b"\x89PNG")),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["id"], "ws-1");
        assert_eq!(json["filePath"], "files/a_page_0.png");
        assert_eq!(json["contents"], "iVBORw==");
    }

    #[test]
    fn read_body_omits_contents() {
        let body = FileCommand {
            id: "ws-1",
            file_path: "files/a.pdf",
            contents: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("contents").is_none());
    }

    #[test]
    fn response_fields_are_optional() {
        let r: CommandResponse = serde_json::from_str("{}").unwrap();
        assert!(r.stdout.is_none());
        assert!(r.stderr.is_none());
    }

    // ── One-shot workspace server ────────────────────────────────────────

    /// A captured request: request line and JSON body.
    struct Captured {
        request_line: String,
        body: serde_json::Value,
    }

    /// Serve exactly one request with `status` and `body`, then close.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<Captured>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];

            let header_end = loop {
                let n = sock.read(&mut chunk).await.unwrap();
                assert!(n > 0, "client closed before headers");
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };

            let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
            let content_length = head
                .lines()
                .find_map(|l| {
                    let (name, value) = l.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            while buf.len() < header_end + content_length {
                let n = sock.read(&mut chunk).await.unwrap();
                assert!(n > 0, "client closed before body");
                buf.extend_from_slice(&chunk[..n]);
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            sock.write_all(response.as_bytes()).await.unwrap();
            sock.shutdown().await.ok();

            Captured {
                request_line: head.lines().next().unwrap_or_default().to_string(),
                body: serde_json::from_slice(&buf[header_end..header_end + content_length])
                    .unwrap(),
            }
        });

        (base_url, handle)
    }

    #[tokio::test]
    async fn read_decodes_base64_stdout() {
        let (url, server) = serve_once("200 OK", r#"{"stdout":"JVBERg=="}"#).await;
        let ws = HttpWorkspace::new(url, "ws-1").unwrap();

        let bytes = ws.read_file("files/a.pdf").await.unwrap();
        assert_eq!(bytes, b"%PDF");

        let req = server.await.unwrap();
        assert_eq!(req.request_line, "POST /workspaces/read-file HTTP/1.1");
        assert_eq!(req.body["id"], "ws-1");
        assert_eq!(req.body["filePath"], "files/a.pdf");
        assert!(req.body.get("contents").is_none());
    }

    #[tokio::test]
    async fn read_404_is_not_found() {
        let (url, server) = serve_once("404 Not Found", "{}").await;
        let ws = HttpWorkspace::new(url, "ws-1").unwrap();

        let err = ws.read_file("files/a.pdf").await.unwrap_err();
        assert!(
            matches!(err, Pdf2PngError::WorkspaceNotFound { ref path } if path == "files/a.pdf"),
            "got: {err:?}"
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn read_stderr_not_found_is_not_found() {
        let (url, server) =
            serve_once("200 OK", r#"{"stderr":"file files/a.pdf not found"}"#).await;
        let ws = HttpWorkspace::new(url, "ws-1").unwrap();

        let err = ws.read_file("files/a.pdf").await.unwrap_err();
        assert!(matches!(err, Pdf2PngError::WorkspaceNotFound { .. }), "got: {err:?}");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn read_other_stderr_is_read_failure() {
        let (url, server) = serve_once("200 OK", r#"{"stderr":"permission denied"}"#).await;
        let ws = HttpWorkspace::new(url, "ws-1").unwrap();

        let err = ws.read_file("files/a.pdf").await.unwrap_err();
        assert!(
            matches!(err, Pdf2PngError::WorkspaceReadFailed { ref reason, .. } if reason == "permission denied"),
            "got: {err:?}"
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn read_server_error_is_read_failure() {
        let (url, server) = serve_once("500 Internal Server Error", "boom").await;
        let ws = HttpWorkspace::new(url, "ws-1").unwrap();

        let err = ws.read_file("files/a.pdf").await.unwrap_err();
        assert!(
            matches!(err, Pdf2PngError::WorkspaceReadFailed { ref reason, .. } if reason.contains("500") && reason.contains("boom")),
            "got: {err:?}"
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn read_invalid_base64_is_read_failure() {
        let (url, server) = serve_once("200 OK", r#"{"stdout":"not base64!"}"#).await;
        let ws = HttpWorkspace::new(url, "ws-1").unwrap();

        let err = ws.read_file("files/a.pdf").await.unwrap_err();
        assert!(
            matches!(err, Pdf2PngError::WorkspaceReadFailed { ref reason, .. } if reason.contains("invalid base64")),
            "got: {err:?}"
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn write_sends_base64_contents() {
        let (url, server) = serve_once("200 OK", r#"{"stdout":""}"#).await;
        let ws = HttpWorkspace::new(url, "ws-1").unwrap();

        ws.write_file("files/a_page_0.png", b"\x89PNG").await.unwrap();

        let req = server.await.unwrap();
        assert_eq!(req.request_line, "POST /workspaces/write-file HTTP/1.1");
        assert_eq!(req.body["id"], "ws-1");
        assert_eq!(req.body["filePath"], "files/a_page_0.png");
        assert_eq!(req.body["contents"], "iVBORw==");
    }

    #[tokio::test]
    async fn write_stderr_is_write_failure() {
        let (url, server) = serve_once("200 OK", r#"{"stderr":"disk full"}"#).await;
        let ws = HttpWorkspace::new(url, "ws-1").unwrap();

        let err = ws.write_file("files/a_page_0.png", b"x").await.unwrap_err();
        assert!(
            matches!(err, Pdf2PngError::WorkspaceWriteFailed { ref path, ref reason } if path == "files/a_page_0.png" && reason == "disk full"),
            "got: {err:?}"
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn write_404_is_write_failure() {
        let (url, server) = serve_once("404 Not Found", "{}").await;
        let ws = HttpWorkspace::new(url, "ws-1").unwrap();

        let err = ws.write_file("files/a_page_0.png", b"x").await.unwrap_err();
        assert!(
            matches!(err, Pdf2PngError::WorkspaceWriteFailed { ref reason, .. } if reason == "workspace not found"),
            "got: {err:?}"
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_host_is_a_read_failure() {
        // Port 9 (discard) on localhost is closed on any sane test host.
        let ws = HttpWorkspace::new("http://127.0.0.1:9", "ws-1").unwrap();
        let err = ws.read_file("files/a.pdf").await.unwrap_err();
        assert!(
            matches!(err, Pdf2PngError::WorkspaceReadFailed { .. }),
            "got: {err:?}"
        );
    }
}
