//! Activity classifier seam and cache policy.
//!
//! Classification itself is the engine's job: models are region-specific,
//! fetched on demand, and go stale. This module owns only the client-side
//! policy for when to keep a fetched classifier and when to ask for a new
//! one, behind traits so the display layer never touches model internals.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::{GpsPoint, LocomotionSample};

/// Which of the engine's classifier families to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierKind {
    /// Coarse types: stationary, walking, running, cycling, vehicle
    Base,
    /// Fine-grained transport types: car, train, bus, boat, ...
    Transport,
}

impl ClassifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassifierKind::Base => "base",
            ClassifierKind::Transport => "transport",
        }
    }
}

/// One scored activity type from a classification pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierResult {
    pub name: String,
    /// Probability-like score in 0..=1
    pub score: f64,
}

/// A fetched, region-specific classifier.
pub trait ActivityClassifier {
    /// Score the sample against every activity type this classifier knows,
    /// best first.
    fn classify(&self, sample: &LocomotionSample) -> Vec<ClassifierResult>;

    /// Whether the classifier's model region covers the coordinate.
    fn contains(&self, coordinate: GpsPoint) -> bool;

    /// Whether the model data is old enough to warrant a refetch.
    fn is_stale(&self) -> bool;

    /// How well the model covers its region, 0..=1.
    fn coverage_score(&self) -> f64;
}

/// Source of classifiers, typically backed by the engine's model store.
///
/// Returns `None` while models for the coordinate are still being fetched;
/// asking is itself the trigger for the fetch.
pub trait ClassifierProvider {
    fn classifier_for(
        &self,
        kind: ClassifierKind,
        coordinate: GpsPoint,
    ) -> Option<Box<dyn ActivityClassifier>>;
}

/// At most one classifier per kind, refreshed against the latest coordinate.
#[derive(Default)]
pub struct ClassifierCache {
    base: Option<Box<dyn ActivityClassifier>>,
    transport: Option<Box<dyn ActivityClassifier>>,
}

impl ClassifierCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: ClassifierKind) -> Option<&dyn ActivityClassifier> {
        match kind {
            ClassifierKind::Base => self.base.as_deref(),
            ClassifierKind::Transport => self.transport.as_deref(),
        }
    }

    /// Refresh both classifiers for the latest fix coordinate.
    ///
    /// Per kind: disabled in settings → leave as-is; no coordinate → leave
    /// as-is; current classifier still covers the coordinate and is not
    /// stale → keep it; otherwise ask the provider (which may return `None`
    /// until its models arrive).
    pub fn refresh(
        &mut self,
        provider: &dyn ClassifierProvider,
        settings: &Settings,
        coordinate: Option<GpsPoint>,
    ) {
        let Some(coordinate) = coordinate else {
            return;
        };

        if settings.enable_the_classifier {
            Self::refresh_slot(&mut self.base, provider, ClassifierKind::Base, coordinate);
        }

        if settings.enable_the_classifier && settings.enable_transport_classifier {
            Self::refresh_slot(
                &mut self.transport,
                provider,
                ClassifierKind::Transport,
                coordinate,
            );
        }
    }

    fn refresh_slot(
        slot: &mut Option<Box<dyn ActivityClassifier>>,
        provider: &dyn ClassifierProvider,
        kind: ClassifierKind,
        coordinate: GpsPoint,
    ) {
        if let Some(current) = slot {
            if current.contains(coordinate) && !current.is_stale() {
                return;
            }
        }
        *slot = provider.classifier_for(kind, coordinate);
    }

    pub fn clear(&mut self) {
        self.base = None;
        self.transport = None;
    }
}
