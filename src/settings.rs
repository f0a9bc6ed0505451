//! Display settings.
//!
//! The host's settings panel flips these toggles and publishes a
//! [`crate::Event::SettingsChanged`]; the JSON round-trip is for whatever
//! persistence the host app uses between launches.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Toggles controlling what the map and panels show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Draw the unfiltered location stream (red)
    pub show_raw_locations: bool,
    /// Draw the filtered location stream (purple)
    pub show_filtered_locations: bool,
    /// Draw per-movement-state sample polylines
    pub show_locomotion_samples: bool,
    /// Show the engine's Visits and Paths instead of low-level streams
    pub show_timeline_items: bool,
    pub show_satellite_map: bool,
    pub show_user_location: bool,
    /// Keep the visible map rect fitted to the drawn overlays
    pub auto_zoom_map: bool,
    pub enable_the_classifier: bool,
    /// Transport classification also requires the main classifier toggle
    pub enable_transport_classifier: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_raw_locations: false,
            show_filtered_locations: false,
            show_locomotion_samples: true,
            show_timeline_items: true,
            show_satellite_map: false,
            show_user_location: true,
            auto_zoom_map: true,
            enable_the_classifier: true,
            enable_transport_classifier: true,
        }
    }
}

impl Settings {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
