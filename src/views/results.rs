//! Details panel rows.
//!
//! Mirrors the original results view: engine status at the top, the latest
//! sample's channels in the middle, then one section per classifier with its
//! scored activity types.

use crate::classifier::{ClassifierCache, ClassifierKind};
use crate::format::{accuracy_string, age_string, hertz_string};
use crate::session::{DesiredAccuracy, RecordingSession, RecordingState};
use crate::settings::Settings;
use crate::views::PanelRow;
use chrono::{DateTime, Utc};

/// Scores below this render de-emphasized.
const DIM_SCORE: f64 = 0.01;

/// Build the full details panel from current state.
pub fn build_rows(
    session: &RecordingSession,
    classifiers: &ClassifierCache,
    settings: &Settings,
    now: DateTime<Utc>,
) -> Vec<PanelRow> {
    let mut rows = Vec::new();

    push_engine_rows(&mut rows, session);
    push_sample_rows(&mut rows, session, now);
    push_classifier_rows(
        &mut rows,
        session,
        classifiers,
        ClassifierKind::Base,
        settings.enable_the_classifier,
    );
    push_classifier_rows(
        &mut rows,
        session,
        classifiers,
        ClassifierKind::Transport,
        settings.enable_the_classifier && settings.enable_transport_classifier,
    );

    rows
}

fn push_engine_rows(rows: &mut Vec<PanelRow>, session: &RecordingSession) {
    rows.push(PanelRow::subheading("Locomotion Engine"));
    rows.push(PanelRow::entry(
        "Recording state",
        session.state().as_str(),
    ));

    let requesting = if session.state() == RecordingState::Off {
        "-".to_string()
    } else {
        match session.desired_accuracy() {
            DesiredAccuracy::Best => "best possible".to_string(),
            DesiredAccuracy::Unlimited => "unlimited".to_string(),
            DesiredAccuracy::Meters(m) => accuracy_string(m),
        }
    };
    rows.push(PanelRow::entry("Requesting accuracy", requesting));

    let receiving = match session.receiving_summary() {
        Some(summary) if session.state() == RecordingState::Recording => format!(
            "{} @ {}",
            accuracy_string(summary.horizontal_accuracy),
            hertz_string(summary.fix_hz)
        ),
        _ => "-".to_string(),
    };
    rows.push(PanelRow::entry("Receiving accuracy", receiving));
}

fn push_sample_rows(rows: &mut Vec<PanelRow>, session: &RecordingSession, now: DateTime<Utc>) {
    rows.push(PanelRow::subheading("Locomotion Sample"));

    let Some(sample) = session.latest_sample() else {
        rows.push(PanelRow::entry("Latest sample", "-"));
        return;
    };

    rows.push(PanelRow::entry("Latest sample", sample.summary()));
    rows.push(PanelRow::entry(
        "Behind now",
        age_string(sample.recorded_at, now),
    ));
    rows.push(PanelRow::entry("Moving state", sample.moving_state.as_str()));

    if let Some(step_hz) = sample.step_hz {
        rows.push(PanelRow::entry("Steps per second", hertz_string(step_hz)));
    }
    if let Some(xy) = sample.xy_acceleration {
        rows.push(PanelRow::entry("XY Acceleration", format!("{:.2} g", xy)));
    }
    if let Some(z) = sample.z_acceleration {
        rows.push(PanelRow::entry("Z Acceleration", format!("{:.2} g", z)));
    }
    if let Some(activity) = &sample.motion_activity {
        rows.push(PanelRow::entry("Device motion activity", activity.clone()));
    }
}

fn push_classifier_rows(
    rows: &mut Vec<PanelRow>,
    session: &RecordingSession,
    classifiers: &ClassifierCache,
    kind: ClassifierKind,
    enabled: bool,
) {
    rows.push(PanelRow::subheading(format!(
        "Activity Type Classifier ({})",
        kind.as_str()
    )));

    let classifier = classifiers.get(kind);

    let coverage = match classifier {
        Some(c) => format!("{:.2}", c.coverage_score()),
        None => "-".to_string(),
    };
    rows.push(PanelRow::entry("Region coverage", coverage));

    // scored rows only make sense against a live sample
    if session.state() != RecordingState::Recording {
        return;
    }
    let Some(sample) = session.latest_sample() else {
        return;
    };

    match classifier {
        Some(classifier) => {
            for result in classifier.classify(sample) {
                let name = capitalized(&result.name);
                let score = format!("{:.4}", result.score);
                if result.score < DIM_SCORE {
                    rows.push(PanelRow::dimmed_entry(name, score));
                } else {
                    rows.push(PanelRow::entry(name, score));
                }
            }
        }
        None if enabled => rows.push(PanelRow::entry("Fetching ML models...", "")),
        None => rows.push(PanelRow::entry("Classifier is turned off", "")),
    }
}

fn capitalized(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
