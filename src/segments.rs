//! Movement-state segmentation of locomotion samples.
//!
//! The map draws one polyline per contiguous run of same-state samples, so a
//! walk to the shops renders as a blue line, the browse inside as orange, and
//! the engine's undecided stretches as magenta. This module derives those runs.
//!
//! Segmentation is recomputed from scratch on every map refresh; nothing here
//! is cached or persisted.

use serde::{Deserialize, Serialize};

use crate::{GpsPoint, LocomotionSample};

/// Movement-state classification the engine attaches to every sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovingState {
    Moving,
    Stationary,
    Uncertain,
}

impl MovingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovingState::Moving => "moving",
            MovingState::Stationary => "stationary",
            MovingState::Uncertain => "uncertain",
        }
    }
}

/// A run of consecutive same-state samples, plus one trailing linking sample.
///
/// The linking sample is the first sample of the next differing-state run,
/// duplicated onto the end of this segment so adjacent polylines share an
/// endpoint and render without visual gaps. Only the very last segment of a
/// stream has no linking sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Never empty; every sample has a location by construction.
    pub samples: Vec<LocomotionSample>,
}

impl Segment {
    /// The state this segment renders as: the state of its first sample.
    ///
    /// The trailing linking sample may carry a different state; it belongs to
    /// the next segment's run and is only here to join the lines up.
    pub fn dominant_state(&self) -> MovingState {
        self.samples[0].moving_state
    }

    /// Coordinates of the segment's samples, in order.
    pub fn coordinates(&self) -> Vec<GpsPoint> {
        self.samples.iter().filter_map(|s| s.location).collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Partition a chronological sample stream into state-homogeneous segments.
///
/// Samples without a location are skipped entirely: they join no segment and
/// never influence a boundary decision. When the incoming sample's state
/// differs from the most recently appended sample's state, the incoming sample
/// closes the open segment as its linking sample and also starts the next one.
///
/// Total over its input: empty input (or input with no locations) yields an
/// empty vector, and the input is never mutated.
///
/// # Example
/// ```
/// use chrono::Utc;
/// use locoview::{sample_segments, GpsPoint, LocomotionSample, MovingState};
///
/// let samples = vec![
///     LocomotionSample::new(Utc::now(), Some(GpsPoint::new(51.50, -0.12)), MovingState::Moving),
///     LocomotionSample::new(Utc::now(), Some(GpsPoint::new(51.51, -0.13)), MovingState::Stationary),
/// ];
///
/// let segments = sample_segments(&samples);
/// assert_eq!(segments.len(), 2);
/// assert_eq!(segments[0].len(), 2); // the moving sample plus its stationary link
/// assert_eq!(segments[1].len(), 1); // the link also starts the stationary run
/// ```
pub fn sample_segments(samples: &[LocomotionSample]) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    let mut current: Vec<LocomotionSample> = Vec::new();

    for sample in samples.iter().filter(|s| s.location.is_some()) {
        // state changed? close the open segment with the incoming sample as
        // its link, and start a fresh one
        if let Some(previous) = current.last() {
            if previous.moving_state != sample.moving_state {
                current.push(sample.clone());
                segments.push(Segment {
                    samples: std::mem::take(&mut current),
                });
            }
        }

        current.push(sample.clone());
    }

    if !current.is_empty() {
        segments.push(Segment { samples: current });
    }

    segments
}
