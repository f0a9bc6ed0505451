//! Mirror of the engine's timeline items.
//!
//! The engine owns the lifecycle of Visits and Paths (creation, merging,
//! finalisation); this module only mirrors the items it announces so the map
//! and timeline panel can be rebuilt from local state. The two concrete kinds
//! form a closed set, so they are a tagged union matched exhaustively rather
//! than downcast at runtime.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewError};
use crate::geo_utils::path_distance;
use crate::{GpsPoint, LocomotionSample};

/// The two kinds of timeline item the engine produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimelineItemKind {
    Path,
    Visit,
}

impl TimelineItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimelineItemKind::Path => "Path",
            TimelineItemKind::Visit => "Visit",
        }
    }
}

/// A stretch of movement between visits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathItem {
    pub item_id: String,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    /// The item this one follows in the engine's timeline, if any
    pub previous_item_id: Option<String>,
    pub samples: Vec<LocomotionSample>,
    /// Best single activity type the classifier settled on (e.g. "walking")
    pub best_activity_type: Option<String>,
    /// Most frequent per-sample activity type across the path
    pub mode_activity_type: Option<String>,
}

impl PathItem {
    /// Coordinates of the path's location-bearing samples, in order.
    pub fn coordinates(&self) -> Vec<GpsPoint> {
        self.samples.iter().filter_map(|s| s.location).collect()
    }

    /// Traveled distance in meters, derived from the mirrored samples.
    pub fn distance_meters(&self) -> f64 {
        path_distance(&self.coordinates())
    }

    /// Average speed in m/s. `None` without a measurable duration.
    pub fn meters_per_second(&self) -> Option<f64> {
        let (start, end) = (self.started_at?, self.ended_at?);
        let seconds = (end - start).num_milliseconds() as f64 / 1000.0;
        if seconds <= 0.0 {
            return None;
        }
        Some(self.distance_meters() / seconds)
    }
}

/// A stay in one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitItem {
    pub item_id: String,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub previous_item_id: Option<String>,
    pub center: Option<GpsPoint>,
    /// One-standard-deviation radius of the visit's samples, in meters
    pub radius_meters: f64,
}

/// A timeline item: either a Path or a Visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TimelineItem {
    Path(PathItem),
    Visit(VisitItem),
}

impl TimelineItem {
    pub fn kind(&self) -> TimelineItemKind {
        match self {
            TimelineItem::Path(_) => TimelineItemKind::Path,
            TimelineItem::Visit(_) => TimelineItemKind::Visit,
        }
    }

    pub fn item_id(&self) -> &str {
        match self {
            TimelineItem::Path(p) => &p.item_id,
            TimelineItem::Visit(v) => &v.item_id,
        }
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        match self {
            TimelineItem::Path(p) => p.started_at,
            TimelineItem::Visit(v) => v.started_at,
        }
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        match self {
            TimelineItem::Path(p) => p.ended_at,
            TimelineItem::Visit(v) => v.ended_at,
        }
    }

    pub fn previous_item_id(&self) -> Option<&str> {
        match self {
            TimelineItem::Path(p) => p.previous_item_id.as_deref(),
            TimelineItem::Visit(v) => v.previous_item_id.as_deref(),
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        Some(self.ended_at()? - self.started_at()?)
    }

    /// Gap between this item's start and the end of the item it follows.
    pub fn gap_from(&self, previous: &TimelineItem) -> Option<Duration> {
        Some(self.started_at()? - previous.ended_at()?)
    }
}

/// Local store of the engine's active and finalised timeline items.
///
/// Items arrive through events and replace any earlier version of themselves;
/// the engine remains the source of truth for their contents.
#[derive(Debug, Default)]
pub struct Timeline {
    active: Vec<TimelineItem>,
    finalised: Vec<TimelineItem>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> &[TimelineItem] {
        &self.active
    }

    pub fn finalised(&self) -> &[TimelineItem] {
        &self.finalised
    }

    /// The item currently being recorded into, if any.
    pub fn current(&self) -> Option<&TimelineItem> {
        self.active.last()
    }

    pub fn is_current(&self, item_id: &str) -> bool {
        self.current().map(|i| i.item_id() == item_id).unwrap_or(false)
    }

    pub fn is_active(&self, item_id: &str) -> bool {
        self.active.iter().any(|i| i.item_id() == item_id)
    }

    /// Find an item in either list by id.
    pub fn item(&self, item_id: &str) -> Option<&TimelineItem> {
        self.active
            .iter()
            .chain(self.finalised.iter())
            .find(|i| i.item_id() == item_id)
    }

    /// Insert a new active item, or replace the stored version of it.
    pub fn upsert_active(&mut self, item: TimelineItem) {
        if let Some(existing) = self
            .active
            .iter_mut()
            .find(|i| i.item_id() == item.item_id())
        {
            *existing = item;
        } else {
            self.active.push(item);
        }
    }

    /// Move an active item into the finalised list, returning its kind.
    pub fn mark_finalised(&mut self, item_id: &str) -> Result<TimelineItemKind> {
        let position = self
            .active
            .iter()
            .position(|i| i.item_id() == item_id)
            .ok_or_else(|| ViewError::UnknownTimelineItem {
                item_id: item_id.to_string(),
            })?;

        let item = self.active.remove(position);
        let kind = item.kind();
        self.finalised.push(item);
        Ok(kind)
    }

    pub fn clear(&mut self) {
        self.active.clear();
        self.finalised.clear();
    }
}
