use crate::relay::RelayOutcome;
use uuid::Uuid;

/// Events posted from runtime tasks to the UI thread.
#[derive(Debug, Clone)]
pub enum AppEvent {
    RelayCompleted {
        widget_id: Uuid,
        request_id: Uuid,
        outcome: RelayOutcome,
    },
}
