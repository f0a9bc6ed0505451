//! The in-memory event log shown by the log panel.

use chrono::Utc;
use log::info;

use crate::format::log_time;

/// Timestamped log lines for the log panel.
///
/// Lines also go to the `log` facade so they reach whatever logger the host
/// installed; this buffer only exists because the panel renders the session's
/// history verbatim.
#[derive(Debug, Default)]
pub struct EventLog {
    lines: Vec<String>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line, stamped with the current clock time.
    pub fn append(&mut self, message: &str) {
        info!("{}", message);
        self.lines.push(format!("{} {}", log_time(Utc::now()), message));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Drop the session's log history.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
