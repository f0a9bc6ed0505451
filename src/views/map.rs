//! Map scene building.
//!
//! Rebuilds the full overlay set from current state on every refresh, the
//! same way the original surface cleared and re-added all overlays. Two
//! modes: timeline items (Visits and Paths), or the low-level streams with
//! one polyline per movement-state segment.

use serde::{Deserialize, Serialize};

use crate::segments::{sample_segments, MovingState};
use crate::session::{RecordingSession, RecordingState};
use crate::settings::Settings;
use crate::timeline::{Timeline, TimelineItem};
use crate::{Bounds, GpsPoint};

/// Meters per degree of latitude (approximately constant)
const METERS_PER_LAT_DEGREE: f64 = 111_319.0;

/// Fixed display palette, one name per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayColor {
    /// Raw location stream
    Red,
    /// Filtered location stream
    Purple,
    /// Moving samples
    Blue,
    /// Stationary samples
    Orange,
    /// Uncertain samples
    Magenta,
    /// Active paths
    Brown,
    /// Finalised paths and visits
    DarkGray,
}

impl OverlayColor {
    /// The polyline color for a movement state.
    pub fn for_state(state: MovingState) -> Self {
        match state {
            MovingState::Moving => OverlayColor::Blue,
            MovingState::Stationary => OverlayColor::Orange,
            MovingState::Uncertain => OverlayColor::Magenta,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapStyle {
    Standard,
    Satellite,
}

/// One drawable item on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MapOverlay {
    Polyline {
        coordinates: Vec<GpsPoint>,
        color: OverlayColor,
    },
    Circle {
        center: GpsPoint,
        radius_meters: f64,
        color: OverlayColor,
    },
    /// A visit marker; inactive markers render with the dimmed dot
    Annotation { coordinate: GpsPoint, active: bool },
}

impl MapOverlay {
    /// Bounding box of the overlay, for the auto-zoom rect.
    fn bounds(&self) -> Option<Bounds> {
        match self {
            MapOverlay::Polyline { coordinates, .. } => Bounds::from_points(coordinates),
            MapOverlay::Circle {
                center,
                radius_meters,
                ..
            } => {
                let lat_pad = radius_meters / METERS_PER_LAT_DEGREE;
                let lng_pad =
                    radius_meters / (METERS_PER_LAT_DEGREE * center.latitude.to_radians().cos());
                Some(Bounds {
                    min_lat: center.latitude - lat_pad,
                    max_lat: center.latitude + lat_pad,
                    min_lng: center.longitude - lng_pad,
                    max_lng: center.longitude + lng_pad,
                })
            }
            MapOverlay::Annotation { coordinate, .. } => {
                Bounds::from_points(std::slice::from_ref(coordinate))
            }
        }
    }
}

/// Everything the host needs to redraw the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapScene {
    pub overlays: Vec<MapOverlay>,
    pub style: MapStyle,
    pub shows_user_location: bool,
    /// Rect to fit the viewport to, when auto-zoom is on and something is drawn
    pub zoom_rect: Option<Bounds>,
}

impl MapScene {
    /// An empty standard-style scene.
    pub fn empty() -> Self {
        Self {
            overlays: Vec::new(),
            style: MapStyle::Standard,
            shows_user_location: false,
            zoom_rect: None,
        }
    }
}

/// Build the scene for the current session, timeline and settings.
pub fn build_scene(
    session: &RecordingSession,
    timeline: &Timeline,
    settings: &Settings,
) -> MapScene {
    let mut overlays = Vec::new();

    if settings.show_timeline_items {
        for item in timeline.finalised() {
            add_timeline_item(&mut overlays, item, false);
        }
        for item in timeline.active() {
            add_timeline_item(&mut overlays, item, true);
        }
    } else {
        if settings.show_raw_locations {
            add_polyline(
                &mut overlays,
                session.raw_locations().iter().map(|l| l.coordinate).collect(),
                OverlayColor::Red,
            );
        }

        if settings.show_filtered_locations {
            add_polyline(
                &mut overlays,
                session
                    .filtered_locations()
                    .iter()
                    .map(|l| l.coordinate)
                    .collect(),
                OverlayColor::Purple,
            );
        }

        if settings.show_locomotion_samples {
            for segment in sample_segments(session.samples()) {
                add_polyline(
                    &mut overlays,
                    segment.coordinates(),
                    OverlayColor::for_state(segment.dominant_state()),
                );
            }
        }
    }

    let zoom_rect = if settings.auto_zoom_map {
        overlays
            .iter()
            .filter_map(MapOverlay::bounds)
            .reduce(|a, b| a.union(&b))
    } else {
        None
    };

    MapScene {
        overlays,
        style: if settings.show_satellite_map {
            MapStyle::Satellite
        } else {
            MapStyle::Standard
        },
        shows_user_location: settings.show_user_location
            && session.state() == RecordingState::Recording,
        zoom_rect,
    }
}

fn add_polyline(overlays: &mut Vec<MapOverlay>, coordinates: Vec<GpsPoint>, color: OverlayColor) {
    if coordinates.is_empty() {
        return;
    }
    overlays.push(MapOverlay::Polyline { coordinates, color });
}

fn add_timeline_item(overlays: &mut Vec<MapOverlay>, item: &TimelineItem, active: bool) {
    match item {
        TimelineItem::Path(path) => {
            add_polyline(
                overlays,
                path.coordinates(),
                if active {
                    OverlayColor::Brown
                } else {
                    OverlayColor::DarkGray
                },
            );
        }
        TimelineItem::Visit(visit) => {
            if let Some(center) = visit.center {
                overlays.push(MapOverlay::Annotation {
                    coordinate: center,
                    active,
                });
                overlays.push(MapOverlay::Circle {
                    center,
                    radius_meters: visit.radius_meters,
                    color: if active {
                        OverlayColor::Orange
                    } else {
                        OverlayColor::DarkGray
                    },
                });
            }
        }
    }
}
