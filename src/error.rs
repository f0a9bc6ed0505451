//! Unified error handling for locoview.
//!
//! Most of the display layer is total over its inputs; the error surface is
//! limited to settings (de)serialization, recording-state transitions, and
//! events that reference timeline items this session has never seen.

use thiserror::Error;

/// Unified error type for locoview operations.
#[derive(Debug, Error)]
pub enum ViewError {
    /// Settings JSON could not be encoded or decoded
    #[error("settings codec error: {0}")]
    SettingsCodec(#[from] serde_json::Error),

    /// A recording-state transition that the session does not allow
    #[error("cannot {action} while recording state is {state}")]
    RecordingState {
        action: &'static str,
        state: String,
    },

    /// An event referenced a timeline item this session has never seen
    #[error("unknown timeline item '{item_id}'")]
    UnknownTimelineItem { item_id: String },
}

/// Result type alias for locoview operations.
pub type Result<T> = std::result::Result<T, ViewError>;
