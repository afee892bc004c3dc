use crate::catalog::Module;
use crate::chat::ConversationLog;
use crate::config::RelaySettings;
use crate::relay::{RelayContext, RelayOutcome, RelayPayload, RelayRequest};
use chrono::{SecondsFormat, Utc};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    Idle,
    AwaitingResponse { request_id: Uuid },
}

/// Assistant texts used when the relay gives no usable reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyTexts {
    pub fallback: String,
    pub error: String,
}

impl From<&RelaySettings> for ReplyTexts {
    fn from(settings: &RelaySettings) -> Self {
        Self {
            fallback: settings.fallback_reply.clone(),
            error: settings.error_reply.clone(),
        }
    }
}

/// Chat panel state for one course-view session.
///
/// At most one request is in flight. Each accepted submission appends the user
/// message at once and exactly one assistant message when its outcome is
/// resolved. Outcomes for any other request id are dropped.
#[derive(Debug)]
pub struct ChatWidget {
    id: Uuid,
    user_id: String,
    replies: ReplyTexts,
    log: ConversationLog,
    input_buffer: String,
    state: RelayState,
    open: bool,
}

impl ChatWidget {
    pub fn new(user_id: impl Into<String>, replies: ReplyTexts) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            replies,
            log: ConversationLog::default(),
            input_buffer: String::new(),
            state: RelayState::Idle,
            open: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> RelayState {
        self.state
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(self.state(), RelayState::AwaitingResponse { .. })
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn input_mut(&mut self) -> &mut String {
        &mut self.input_buffer
    }

    pub fn can_submit(&self) -> bool {
        !self.is_awaiting() && !self.input_buffer.trim().is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    /// Takes the input buffer as a new message.
    ///
    /// Returns the request to relay, or `None` when the buffer is blank or a
    /// reply is still pending.
    pub fn submit(&mut self, active: Option<&Module>) -> Option<RelayRequest> {
        if !self.can_submit() {
            return None;
        }

        let message = self.input_buffer.trim().to_string();
        let now = Utc::now();
        self.log.push_user(message.clone(), now);
        self.input_buffer.clear();

        let request_id = Uuid::new_v4();
        self.state = RelayState::AwaitingResponse { request_id };

        Some(RelayRequest {
            widget_id: self.id,
            request_id,
            payload: RelayPayload {
                message,
                context: RelayContext {
                    current_module: active.map(|module| module.id.clone()),
                    module_title: active.map(|module| module.title.clone()),
                    user_id: self.user_id.clone(),
                    timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
                },
            },
        })
    }

    /// Applies the outcome of the pending request. Returns whether it was
    /// accepted.
    pub fn resolve(&mut self, request_id: Uuid, outcome: RelayOutcome) -> bool {
        if self.state != (RelayState::AwaitingResponse { request_id }) {
            debug!(%request_id, "ignoring outcome for a request that is not pending");
            return false;
        }

        let text = match outcome {
            Ok(Some(reply)) => reply,
            Ok(None) => self.replies.fallback.clone(),
            Err(_) => self.replies.error.clone(),
        };
        self.log.push_assistant(text, Utc::now());
        self.state = RelayState::Idle;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::VideoRef;
    use crate::chat::Sender;
    use crate::relay::RelayError;

    fn widget() -> ChatWidget {
        ChatWidget::new(
            "user-123",
            ReplyTexts {
                fallback: "fallback".to_string(),
                error: "error".to_string(),
            },
        )
    }

    fn module() -> Module {
        Module {
            id: "mod-2".to_string(),
            title: "Técnica".to_string(),
            duration_minutes: Some(26),
            video: VideoRef::EmbeddedStream {
                url: "https://video.example/2".to_string(),
            },
            summary: None,
            body: None,
            resources: Vec::new(),
        }
    }

    fn submit(widget: &mut ChatWidget, text: &str) -> Option<RelayRequest> {
        *widget.input_mut() = text.to_string();
        widget.submit(None)
    }

    fn texts(widget: &ChatWidget) -> Vec<(Sender, &str)> {
        widget
            .log()
            .messages()
            .iter()
            .map(|message| (message.sender, message.text.as_str()))
            .collect()
    }

    #[test]
    fn blank_submissions_are_ignored() {
        let mut chat = widget();
        for text in ["", "   ", "\n\t"] {
            assert!(submit(&mut chat, text).is_none());
        }
        assert!(chat.log().is_empty());
        assert_eq!(chat.state(), RelayState::Idle);
    }

    #[test]
    fn successful_reply_appends_user_then_assistant() {
        let mut chat = widget();
        let request = submit(&mut chat, "Hola").expect("submission should be accepted");
        assert_eq!(request.payload.message, "Hola");
        assert_eq!(request.widget_id, chat.id());
        assert!(chat.input_mut().is_empty());
        assert!(chat.is_awaiting());

        assert!(chat.resolve(request.request_id, Ok(Some("¡Hola!".to_string()))));
        assert_eq!(
            texts(&chat),
            vec![(Sender::User, "Hola"), (Sender::Assistant, "¡Hola!")]
        );
        assert_eq!(chat.state(), RelayState::Idle);
    }

    #[test]
    fn submitted_text_is_trimmed() {
        let mut chat = widget();
        let request = submit(&mut chat, "  ¿Cuántas series?  ").expect("should be accepted");
        assert_eq!(request.payload.message, "¿Cuántas series?");
        assert_eq!(texts(&chat), vec![(Sender::User, "¿Cuántas series?")]);
    }

    #[test]
    fn missing_reply_uses_fallback() {
        let mut chat = widget();
        let request = submit(&mut chat, "Hola").expect("should be accepted");
        chat.resolve(request.request_id, Ok(None));
        assert_eq!(texts(&chat)[1], (Sender::Assistant, "fallback"));
    }

    #[test]
    fn failure_appends_error_and_allows_resubmission() {
        let mut chat = widget();
        let request = submit(&mut chat, "Hola").expect("should be accepted");
        chat.resolve(
            request.request_id,
            Err(RelayError::Transport("connection refused".to_string())),
        );
        assert_eq!(
            texts(&chat),
            vec![(Sender::User, "Hola"), (Sender::Assistant, "error")]
        );
        assert_eq!(chat.state(), RelayState::Idle);

        assert!(submit(&mut chat, "¿Otra vez?").is_some());
        assert_eq!(chat.log().len(), 3);
    }

    #[test]
    fn second_submission_while_awaiting_is_rejected() {
        let mut chat = widget();
        let first = submit(&mut chat, "Hola").expect("should be accepted");
        assert!(submit(&mut chat, "¿Hay alguien?").is_none());
        assert_eq!(chat.log().len(), 1);
        assert!(!chat.can_submit());
        assert_eq!(
            chat.state(),
            RelayState::AwaitingResponse {
                request_id: first.request_id
            }
        );

        chat.resolve(first.request_id, Ok(Some("Sí".to_string())));
        assert!(chat.can_submit());
    }

    #[test]
    fn stale_or_duplicate_outcomes_are_ignored() {
        let mut chat = widget();
        let request = submit(&mut chat, "Hola").expect("should be accepted");
        assert!(!chat.resolve(Uuid::new_v4(), Ok(Some("otro".to_string()))));
        assert!(chat.resolve(request.request_id, Ok(Some("uno".to_string()))));
        assert!(!chat.resolve(request.request_id, Ok(Some("dos".to_string()))));
        assert_eq!(chat.log().len(), 2);
    }

    #[test]
    fn payload_carries_active_module_context() {
        let mut chat = widget();
        let active = module();
        *chat.input_mut() = "Hola".to_string();
        let request = chat.submit(Some(&active)).expect("should be accepted");

        let context = &request.payload.context;
        assert_eq!(context.current_module.as_deref(), Some("mod-2"));
        assert_eq!(context.module_title.as_deref(), Some("Técnica"));
        assert_eq!(context.user_id, "user-123");
        assert!(chrono::DateTime::parse_from_rfc3339(&context.timestamp).is_ok());
        assert!(context.timestamp.ends_with('Z'));
    }

    #[test]
    fn closing_the_panel_keeps_the_log() {
        let mut chat = widget();
        chat.set_open(true);
        let request = submit(&mut chat, "Hola").expect("should be accepted");
        chat.set_open(false);
        chat.resolve(request.request_id, Ok(Some("¡Hola!".to_string())));
        assert!(!chat.is_open());
        assert_eq!(chat.log().len(), 2);
    }
}
