//! Outbound chat relay to the automation webhook.
//!
//! [`WebhookRelay`] performs one `POST` round trip. [`RelayClient`] runs it on
//! the tokio runtime and posts the outcome back to the UI thread as an
//! [`AppEvent::RelayCompleted`].

use crate::config::RelaySettings;
use crate::error::{Error, Result};
use crate::event::AppEvent;
use eframe::egui;
use serde::Serialize;
use serde_json::Value;
use std::sync::{mpsc, Arc};
use thiserror::Error;
use tokio::runtime::Handle;
use uuid::Uuid;

/// Metadata sent alongside each message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayContext {
    pub current_module: Option<String>,
    pub module_title: Option<String>,
    pub user_id: String,
    /// RFC 3339, UTC, millisecond precision.
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelayPayload {
    pub message: String,
    pub context: RelayContext,
}

/// One outbound call, tagged with the widget and request that issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayRequest {
    pub widget_id: Uuid,
    pub request_id: Uuid,
    pub payload: RelayPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error("invalid relay endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("relay request failed: {0}")]
    Transport(String),

    #[error("relay returned status {status}")]
    Status { status: u16 },

    #[error("relay response was not JSON: {0}")]
    Decode(String),
}

/// `Ok(None)` means the call succeeded but carried no usable reply text.
pub type RelayOutcome = std::result::Result<Option<String>, RelayError>;

/// Reads the reply text out of a webhook response body.
///
/// A missing, `null` or empty field yields `None`. Non-string values are
/// rendered as JSON text.
pub fn extract_reply(body: &Value, field: &str) -> Option<String> {
    match body.get(field)? {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Clone)]
pub struct WebhookRelay {
    http: reqwest::Client,
    endpoint: String,
    response_field: String,
}

impl WebhookRelay {
    pub fn new(settings: &RelaySettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: settings.endpoint.clone(),
            response_field: settings.response_field.clone(),
        })
    }

    pub async fn relay(&self, payload: &RelayPayload) -> RelayOutcome {
        let url = reqwest::Url::parse(&self.endpoint).map_err(|e| RelayError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            reason: e.to_string(),
        })?;

        let response = self
            .http
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| RelayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Status {
                status: status.as_u16(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| RelayError::Decode(e.to_string()))?;

        Ok(extract_reply(&body, &self.response_field))
    }
}

/// Dispatches relay requests onto the runtime and reports back over `tx`.
pub struct RelayClient {
    relay: Arc<WebhookRelay>,
    tx: mpsc::Sender<AppEvent>,
    runtime_handle: Handle,
    repaint: Option<egui::Context>,
}

impl RelayClient {
    pub fn new(settings: &RelaySettings, tx: mpsc::Sender<AppEvent>) -> Result<Self> {
        let runtime_handle = Handle::try_current()
            .map_err(|err| Error::runtime(format!("tokio runtime unavailable: {err}")))?;

        Ok(Self {
            relay: Arc::new(WebhookRelay::new(settings)?),
            tx,
            runtime_handle,
            repaint: None,
        })
    }

    /// Wake the UI when a reply lands instead of waiting for the next input.
    pub fn attach_repaint(&mut self, ctx: egui::Context) {
        self.repaint = Some(ctx);
    }

    pub fn dispatch(&self, request: RelayRequest) {
        let relay = Arc::clone(&self.relay);
        let tx = self.tx.clone();
        let repaint = self.repaint.clone();

        self.runtime_handle.spawn(async move {
            let RelayRequest {
                widget_id,
                request_id,
                payload,
            } = request;

            tracing::debug!(%request_id, "relaying chat message");
            let outcome = relay.relay(&payload).await;
            if let Err(err) = &outcome {
                tracing::warn!(%request_id, "chat relay failed: {err}");
            }

            let event = AppEvent::RelayCompleted {
                widget_id,
                request_id,
                outcome,
            };
            if tx.send(event).is_err() {
                tracing::debug!(%request_id, "UI gone, dropping relay outcome");
                return;
            }
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn payload(message: &str) -> RelayPayload {
        RelayPayload {
            message: message.to_string(),
            context: RelayContext {
                current_module: Some("mod-1".to_string()),
                module_title: Some("Módulo 1 · Fundamentos".to_string()),
                user_id: "user-123".to_string(),
                timestamp: "2026-10-17T12:00:00.000Z".to_string(),
            },
        }
    }

    fn settings_for(endpoint: String) -> RelaySettings {
        RelaySettings {
            endpoint,
            timeout_secs: 5,
            ..RelaySettings::default()
        }
    }

    /// Serves one canned HTTP response and hands back the raw request.
    async fn serve_once(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("loopback listener should bind");
        let addr = listener.local_addr().expect("listener should have an address");
        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("client should connect");
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.expect("request should read");
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request_complete(&request) {
                    break;
                }
            }
            socket
                .write_all(response.as_bytes())
                .await
                .expect("response should write");
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).to_string()
        });

        (format!("http://{addr}/webhook/test"), handle)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(split) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..split]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        raw.len() >= split + 4 + content_length
    }

    #[test]
    fn payload_serializes_with_camel_case_context() {
        let value = serde_json::to_value(payload("Hola")).expect("payload should encode");
        assert_eq!(
            value,
            json!({
                "message": "Hola",
                "context": {
                    "currentModule": "mod-1",
                    "moduleTitle": "Módulo 1 · Fundamentos",
                    "userId": "user-123",
                    "timestamp": "2026-10-17T12:00:00.000Z"
                }
            })
        );
    }

    #[test]
    fn extract_reply_reads_configured_field() {
        let body = json!({"response": "¡Hola!", "output": "other"});
        assert_eq!(extract_reply(&body, "response").as_deref(), Some("¡Hola!"));
        assert_eq!(extract_reply(&body, "output").as_deref(), Some("other"));
    }

    #[test]
    fn extract_reply_treats_missing_null_and_empty_as_absent() {
        assert_eq!(extract_reply(&json!({}), "response"), None);
        assert_eq!(extract_reply(&json!({"response": null}), "response"), None);
        assert_eq!(extract_reply(&json!({"response": ""}), "response"), None);
        assert_eq!(extract_reply(&json!(["response"]), "response"), None);
    }

    #[test]
    fn extract_reply_renders_non_string_values() {
        assert_eq!(
            extract_reply(&json!({"response": 42}), "response").as_deref(),
            Some("42")
        );
    }

    #[tokio::test]
    async fn relay_posts_json_and_returns_reply() {
        let (endpoint, server) = serve_once("200 OK", r#"{"response":"¡Hola!"}"#).await;
        let relay = WebhookRelay::new(&settings_for(endpoint)).expect("relay should build");

        let outcome = relay.relay(&payload("Hola")).await;
        assert_eq!(outcome, Ok(Some("¡Hola!".to_string())));

        let request = server.await.expect("server task should finish");
        assert!(request.starts_with("POST /webhook/test"));
        assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
        assert!(request.contains(r#""currentModule":"mod-1""#));
        assert!(request.contains(r#""message":"Hola""#));
    }

    #[tokio::test]
    async fn relay_without_reply_field_is_soft_success() {
        let (endpoint, server) = serve_once("200 OK", r#"{"ok":true}"#).await;
        let relay = WebhookRelay::new(&settings_for(endpoint)).expect("relay should build");

        assert_eq!(relay.relay(&payload("Hola")).await, Ok(None));
        server.await.expect("server task should finish");
    }

    #[tokio::test]
    async fn relay_maps_non_success_status_to_error() {
        let (endpoint, server) =
            serve_once("500 Internal Server Error", r#"{"error":"boom"}"#).await;
        let relay = WebhookRelay::new(&settings_for(endpoint)).expect("relay should build");

        assert_eq!(
            relay.relay(&payload("Hola")).await,
            Err(RelayError::Status { status: 500 })
        );
        server.await.expect("server task should finish");
    }

    #[tokio::test]
    async fn relay_maps_non_json_body_to_decode_error() {
        let (endpoint, server) = serve_once("200 OK", "Workflow was started").await;
        let relay = WebhookRelay::new(&settings_for(endpoint)).expect("relay should build");

        assert!(matches!(
            relay.relay(&payload("Hola")).await,
            Err(RelayError::Decode(_))
        ));
        server.await.expect("server task should finish");
    }

    #[tokio::test]
    async fn relay_maps_refused_connection_to_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("loopback listener should bind");
        let addr = listener.local_addr().expect("listener should have an address");
        drop(listener);

        let relay = WebhookRelay::new(&settings_for(format!("http://{addr}/webhook")))
            .expect("relay should build");
        assert!(matches!(
            relay.relay(&payload("Hola")).await,
            Err(RelayError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn relay_rejects_unparsable_endpoint() {
        let relay = WebhookRelay::new(&settings_for("not a url".to_string()))
            .expect("relay should build");
        assert!(matches!(
            relay.relay(&payload("Hola")).await,
            Err(RelayError::InvalidEndpoint { .. })
        ));
    }

    #[tokio::test]
    async fn client_reports_outcome_over_channel() {
        let (endpoint, server) = serve_once("200 OK", r#"{"response":"listo"}"#).await;
        let (tx, rx) = mpsc::channel();
        let client = RelayClient::new(&settings_for(endpoint), tx).expect("client should build");

        let widget_id = Uuid::new_v4();
        let request_id = Uuid::new_v4();
        client.dispatch(RelayRequest {
            widget_id,
            request_id,
            payload: payload("Hola"),
        });

        server.await.expect("server task should finish");
        let event = tokio::task::spawn_blocking(move || rx.recv())
            .await
            .expect("blocking recv should join")
            .expect("relay event should arrive");

        match event {
            AppEvent::RelayCompleted {
                widget_id: got_widget,
                request_id: got_request,
                outcome,
            } => {
                assert_eq!(got_widget, widget_id);
                assert_eq!(got_request, request_id);
                assert_eq!(outcome, Ok(Some("listo".to_string())));
            }
        }
    }
}
