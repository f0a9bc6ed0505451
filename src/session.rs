//! Recording-session state.
//!
//! The engine exposes its recording surface through process-wide managers on
//! the device; here the accumulation lives in an explicit session object that
//! the host constructs for each recording and passes wherever it is needed.
//! Samples and fixes arrive through [`crate::Event`]s and stay in memory for
//! the life of the session.

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewError};
use crate::{LocomotionSample, RawLocation};

/// How many trailing filtered fixes feed the receiving-rate estimate.
const RECEIVING_WINDOW: usize = 10;

/// Recording state as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingState {
    Off,
    Recording,
    Sleeping,
}

impl RecordingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordingState::Off => "off",
            RecordingState::Recording => "recording",
            RecordingState::Sleeping => "sleeping",
        }
    }
}

/// The location accuracy level requested from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DesiredAccuracy {
    /// Best the hardware can do. Excessive for most uses; the default
    /// trades accuracy against battery.
    Best,
    /// A specific accuracy target in meters
    Meters(f64),
    /// No accuracy requirement at all
    Unlimited,
}

/// Latest receiving quality, for the details panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivingSummary {
    /// Horizontal accuracy of the newest filtered fix, in meters
    pub horizontal_accuracy: f64,
    /// Observed fix rate over the trailing window, in Hz
    pub fix_hz: f64,
}

/// Per-session accumulation of engine output.
///
/// Owns the raw and filtered location streams and the locomotion samples for
/// one recording. Everything derived from this state (segments, map scenes,
/// panel rows) is recomputed on demand and never stored here.
#[derive(Debug)]
pub struct RecordingSession {
    raw_locations: Vec<RawLocation>,
    filtered_locations: Vec<RawLocation>,
    samples: Vec<LocomotionSample>,
    state: RecordingState,
    desired_accuracy: DesiredAccuracy,
    started_at: Option<DateTime<Utc>>,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self {
            raw_locations: Vec::new(),
            filtered_locations: Vec::new(),
            samples: Vec::new(),
            state: RecordingState::Off,
            desired_accuracy: DesiredAccuracy::Meters(30.0),
            started_at: None,
        }
    }

    // ========================================================================
    // Recording control
    // ========================================================================

    /// Begin recording. Only valid while off.
    pub fn start(&mut self) -> Result<()> {
        if self.state != RecordingState::Off {
            return Err(ViewError::RecordingState {
                action: "start recording",
                state: self.state.as_str().to_string(),
            });
        }
        self.state = RecordingState::Recording;
        self.started_at = Some(Utc::now());
        info!("recording started");
        Ok(())
    }

    /// Stop recording, from either recording or sleep.
    pub fn stop(&mut self) -> Result<()> {
        if self.state == RecordingState::Off {
            return Err(ViewError::RecordingState {
                action: "stop recording",
                state: self.state.as_str().to_string(),
            });
        }
        self.state = RecordingState::Off;
        info!("recording stopped");
        Ok(())
    }

    /// Drop all accumulated data. Recording state is unchanged.
    pub fn clear(&mut self) {
        self.raw_locations.clear();
        self.filtered_locations.clear();
        self.samples.clear();
    }

    /// Mirror an engine-reported state change (sleep mode starts/ends).
    pub fn set_state(&mut self, state: RecordingState) {
        self.state = state;
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn desired_accuracy(&self) -> DesiredAccuracy {
        self.desired_accuracy
    }

    pub fn set_desired_accuracy(&mut self, accuracy: DesiredAccuracy) {
        self.desired_accuracy = accuracy;
    }

    // ========================================================================
    // Accumulation
    // ========================================================================

    pub fn push_raw(&mut self, location: RawLocation) {
        self.raw_locations.push(location);
    }

    pub fn push_filtered(&mut self, location: RawLocation) {
        self.filtered_locations.push(location);
    }

    pub fn push_sample(&mut self, sample: LocomotionSample) {
        self.samples.push(sample);
    }

    /// Drop the raw and filtered buffers, keeping the samples.
    ///
    /// The low-quality streams are display-only; the host calls this when it
    /// leaves the foreground and they become dead weight.
    pub fn trim_location_buffers(&mut self) {
        self.raw_locations.clear();
        self.filtered_locations.clear();
    }

    // ========================================================================
    // Read access
    // ========================================================================

    pub fn raw_locations(&self) -> &[RawLocation] {
        &self.raw_locations
    }

    pub fn filtered_locations(&self) -> &[RawLocation] {
        &self.filtered_locations
    }

    pub fn samples(&self) -> &[LocomotionSample] {
        &self.samples
    }

    pub fn latest_sample(&self) -> Option<&LocomotionSample> {
        self.samples.last()
    }

    /// Coordinate of the newest filtered fix, used to pick classifiers.
    pub fn latest_fix_coordinate(&self) -> Option<crate::GpsPoint> {
        self.filtered_locations.last().map(|l| l.coordinate)
    }

    /// Accuracy and observed rate of the filtered stream.
    ///
    /// Returns `None` until at least one filtered fix has arrived. The rate
    /// is measured over the trailing window of fixes; a single fix reports
    /// 0 Hz rather than a guess.
    pub fn receiving_summary(&self) -> Option<ReceivingSummary> {
        let newest = self.filtered_locations.last()?;

        let window_start = self.filtered_locations.len().saturating_sub(RECEIVING_WINDOW);
        let window = &self.filtered_locations[window_start..];

        let mut fix_hz = 0.0;
        if window.len() >= 2 {
            let span = window[window.len() - 1].recorded_at - window[0].recorded_at;
            let seconds = span.num_milliseconds() as f64 / 1000.0;
            if seconds > 0.0 {
                fix_hz = (window.len() - 1) as f64 / seconds;
            }
        }

        Some(ReceivingSummary {
            horizontal_accuracy: newest.horizontal_accuracy,
            fix_hz,
        })
    }
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self::new()
    }
}
