//! # Locoview
//!
//! Display-model layer for an external location/motion engine.
//!
//! The engine owns the hard parts: location filtering, timeline segmentation
//! into Visits and Paths, and ML-based activity classification. This crate
//! owns everything a host UI needs to *show* that output:
//!
//! - Movement-state segmentation of samples for per-state polyline rendering
//! - A recording session holding the accumulated engine output
//! - Typed events connecting the engine to the display layer
//! - Transient view models: map scene, timeline rows, detail rows, log lines
//!
//! Derived models are recomputed on every refresh and never persisted.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::Utc;
//! use locoview::{sample_segments, GpsPoint, LocomotionSample, MovingState};
//!
//! let samples = vec![
//!     LocomotionSample::new(Utc::now(), Some(GpsPoint::new(51.5074, -0.1278)), MovingState::Moving),
//!     LocomotionSample::new(Utc::now(), Some(GpsPoint::new(51.5080, -0.1290)), MovingState::Moving),
//!     LocomotionSample::new(Utc::now(), Some(GpsPoint::new(51.5081, -0.1291)), MovingState::Stationary),
//! ];
//!
//! let segments = sample_segments(&samples);
//! assert_eq!(segments.len(), 2);
//! assert_eq!(segments[0].dominant_state(), MovingState::Moving);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{Result, ViewError};

// Geographic utilities (distance calculations)
pub mod geo_utils;

// Movement-state segmentation (the map's per-state polyline source)
pub mod segments;
pub use segments::{sample_segments, MovingState, Segment};

// Recording-session state
pub mod session;
pub use session::{DesiredAccuracy, ReceivingSummary, RecordingSession, RecordingState};

// Typed engine events and the subscription bus
pub mod events;
pub use events::{Event, EventBus};

// Timeline item mirror (Paths and Visits)
pub mod timeline;
pub use timeline::{PathItem, Timeline, TimelineItem, TimelineItemKind, VisitItem};

// Activity classifier seam and cache policy
pub mod classifier;
pub use classifier::{
    ActivityClassifier, ClassifierCache, ClassifierKind, ClassifierProvider, ClassifierResult,
};

// Display toggles
pub mod settings;
pub use settings::Settings;

// Value formatting for panel rows
pub mod format;

// View models (map scene and the scrollable panels)
pub mod views;
pub use views::{
    log::EventLog,
    map::{MapOverlay, MapScene, MapStyle, OverlayColor},
    PanelRow,
};

// Event wiring and view-model ownership
pub mod dashboard;
pub use dashboard::Dashboard;

// ============================================================================
// Core Types
// ============================================================================

/// A GPS coordinate with latitude and longitude.
///
/// # Example
/// ```
/// use locoview::GpsPoint;
/// let point = GpsPoint::new(51.5074, -0.1278); // London
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPoint {
    /// Create a new GPS point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// Bounding box over GPS coordinates, used for the map's auto-zoom rect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Create bounds from GPS points. Returns `None` for an empty slice.
    pub fn from_points(points: &[GpsPoint]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut min_lat = f64::MAX;
        let mut max_lat = f64::MIN;
        let mut min_lng = f64::MAX;
        let mut max_lng = f64::MIN;

        for p in points {
            min_lat = min_lat.min(p.latitude);
            max_lat = max_lat.max(p.latitude);
            min_lng = min_lng.min(p.longitude);
            max_lng = max_lng.max(p.longitude);
        }

        Some(Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        })
    }

    /// Get the center point of the bounds.
    pub fn center(&self) -> GpsPoint {
        GpsPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }

    /// Smallest bounds containing both `self` and `other`.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_lat: self.min_lat.min(other.min_lat),
            max_lat: self.max_lat.max(other.max_lat),
            min_lng: self.min_lng.min(other.min_lng),
            max_lng: self.max_lng.max(other.max_lng),
        }
    }
}

/// One location fix from the engine's raw or filtered stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLocation {
    pub coordinate: GpsPoint,
    /// Horizontal accuracy in meters (lower is better)
    pub horizontal_accuracy: f64,
    pub recorded_at: DateTime<Utc>,
}

impl RawLocation {
    pub fn new(coordinate: GpsPoint, horizontal_accuracy: f64, recorded_at: DateTime<Utc>) -> Self {
        Self {
            coordinate,
            horizontal_accuracy,
            recorded_at,
        }
    }
}

/// One engine observation: an optional location plus a movement-state tag
/// and whatever optional motion channels the engine had switched on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocomotionSample {
    pub recorded_at: DateTime<Utc>,
    /// Absent when the engine produced the sample without a usable fix
    pub location: Option<GpsPoint>,
    /// Horizontal accuracy of the sample's fix, in meters
    pub horizontal_accuracy: Option<f64>,
    pub moving_state: MovingState,
    /// Pedometer cadence in Hz, when pedometer events are recorded
    pub step_hz: Option<f64>,
    /// Lateral device acceleration in g, when accelerometer events are recorded
    pub xy_acceleration: Option<f64>,
    /// Vertical device acceleration in g
    pub z_acceleration: Option<f64>,
    /// The device platform's own coarse motion activity name, if reported
    pub motion_activity: Option<String>,
}

impl LocomotionSample {
    /// Create a sample with only the required channels.
    pub fn new(
        recorded_at: DateTime<Utc>,
        location: Option<GpsPoint>,
        moving_state: MovingState,
    ) -> Self {
        Self {
            recorded_at,
            location,
            horizontal_accuracy: None,
            moving_state,
            step_hz: None,
            xy_acceleration: None,
            z_acceleration: None,
            motion_activity: None,
        }
    }

    /// One-line description for the details panel.
    pub fn summary(&self) -> String {
        match self.location {
            Some(loc) => format!(
                "{} ({:.4}, {:.4})",
                self.moving_state.as_str(),
                loc.latitude,
                loc.longitude
            ),
            None => format!("{} (no location)", self.moving_state.as_str()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
