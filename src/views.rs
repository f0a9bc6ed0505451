//! View models for the demo surface.
//!
//! Each submodule turns current session/timeline state into plain data the
//! host UI renders directly: the map scene, the scrollable detail and
//! timeline panels, and the log. Nothing here holds state of its own except
//! the log's line buffer.

pub mod log;
pub mod map;
pub mod results;
pub mod timeline;

use serde::{Deserialize, Serialize};

/// One row of a scrollable panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PanelRow {
    Heading { title: String },
    Subheading { title: String },
    Entry {
        left: String,
        right: String,
        /// Render de-emphasized (negligible classifier scores)
        dimmed: bool,
    },
    Divider,
}

impl PanelRow {
    pub fn heading(title: impl Into<String>) -> Self {
        PanelRow::Heading {
            title: title.into(),
        }
    }

    pub fn subheading(title: impl Into<String>) -> Self {
        PanelRow::Subheading {
            title: title.into(),
        }
    }

    pub fn entry(left: impl Into<String>, right: impl Into<String>) -> Self {
        PanelRow::Entry {
            left: left.into(),
            right: right.into(),
            dimmed: false,
        }
    }

    pub fn dimmed_entry(left: impl Into<String>, right: impl Into<String>) -> Self {
        PanelRow::Entry {
            left: left.into(),
            right: right.into(),
            dimmed: true,
        }
    }
}
