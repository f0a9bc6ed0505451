//! Event wiring and view-model ownership.
//!
//! The dashboard owns one recording's worth of display state: the session,
//! the timeline mirror, settings, classifier cache and log, plus the derived
//! map scene and panel rows. It consumes [`Event`]s and refreshes only the
//! view models each event can have changed, the same selective refreshes the
//! original surface performed from its observation closures.

use chrono::Utc;
use log::warn;

use crate::classifier::{ClassifierCache, ClassifierProvider};
use crate::error::Result;
use crate::events::Event;
use crate::session::{DesiredAccuracy, RecordingSession, RecordingState};
use crate::settings::Settings;
use crate::timeline::Timeline;
use crate::views::log::EventLog;
use crate::views::map::{self, MapScene};
use crate::views::{results, timeline as timeline_view, PanelRow};

pub struct Dashboard {
    session: RecordingSession,
    timeline: Timeline,
    settings: Settings,
    classifiers: ClassifierCache,
    provider: Box<dyn ClassifierProvider>,
    event_log: EventLog,
    foreground: bool,

    // derived view models, rebuilt by the refresh methods
    map: MapScene,
    results_rows: Vec<PanelRow>,
    timeline_rows: Vec<PanelRow>,
}

impl Dashboard {
    pub fn new(provider: Box<dyn ClassifierProvider>) -> Self {
        Self::with_settings(provider, Settings::default())
    }

    pub fn with_settings(provider: Box<dyn ClassifierProvider>, settings: Settings) -> Self {
        let mut dashboard = Self {
            session: RecordingSession::new(),
            timeline: Timeline::new(),
            settings,
            classifiers: ClassifierCache::new(),
            provider,
            event_log: EventLog::new(),
            foreground: true,
            map: MapScene::empty(),
            results_rows: Vec::new(),
            timeline_rows: Vec::new(),
        };
        dashboard.refresh_all();
        dashboard
    }

    // ========================================================================
    // Host controls
    // ========================================================================

    /// The Start button: request full accuracy and begin recording.
    pub fn start_recording(&mut self) -> Result<()> {
        // excessive for real use; the demo wants the richest possible stream
        self.session.set_desired_accuracy(DesiredAccuracy::Best);
        self.session.start()?;
        self.event_log.append("recording started");
        self.refresh_map();
        self.refresh_results();
        Ok(())
    }

    /// The Stop button.
    pub fn stop_recording(&mut self) -> Result<()> {
        self.session.stop()?;
        self.event_log.append("recording stopped");
        self.refresh_map();
        self.refresh_results();
        Ok(())
    }

    /// The Clear button: drop the log and all accumulated session data.
    pub fn clear(&mut self) {
        self.event_log.clear();
        self.session.clear();
        self.refresh_map();
        self.refresh_results();
    }

    /// The raw and filtered buffers are only worth keeping on screen.
    pub fn entered_background(&mut self) {
        self.foreground = false;
        self.session.trim_location_buffers();
    }

    pub fn entered_foreground(&mut self) {
        self.foreground = true;
        self.refresh_all();
    }

    // ========================================================================
    // Event handling
    // ========================================================================

    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::NewTimelineItem { item } => {
                self.event_log
                    .append(&format!(".newTimelineItem ({})", item.kind().as_str()));
                self.timeline.upsert_active(item.clone());
                self.refresh_map();
                self.refresh_timeline();
            }

            Event::UpdatedTimelineItem { item } => {
                self.timeline.upsert_active(item.clone());
                self.refresh_map();
                self.refresh_timeline();
            }

            Event::FinalisedTimelineItem { item_id } => {
                match self.timeline.mark_finalised(item_id) {
                    Ok(kind) => self
                        .event_log
                        .append(&format!(".finalisedTimelineItem ({})", kind.as_str())),
                    Err(err) => warn!("ignoring finalise event: {}", err),
                }
                self.refresh_timeline();
            }

            Event::MergedTimelineItems { description } => {
                self.event_log
                    .append(&format!(".mergedItems ({})", description));
                self.refresh_timeline();
            }

            Event::SampleUpdated {
                sample,
                raw,
                filtered,
            } => {
                // the low-quality streams are display noise in the background
                if self.foreground {
                    if let Some(raw) = raw {
                        self.session.push_raw(*raw);
                    }
                    if let Some(filtered) = filtered {
                        self.session.push_filtered(*filtered);
                    }
                }

                self.session.push_sample(sample.clone());

                self.classifiers.refresh(
                    self.provider.as_ref(),
                    &self.settings,
                    self.session.latest_fix_coordinate().or(sample.location),
                );

                self.refresh_results();

                // the map only tracks fresh samples in low-level mode
                if !self.settings.show_timeline_items {
                    self.refresh_map();
                }
            }

            Event::RecordingStateChanged { state } => {
                self.session.set_state(*state);
                // logging every transition gets noisy; these two matter
                if matches!(state, RecordingState::Recording | RecordingState::Off) {
                    self.event_log
                        .append(&format!(".recordingStateChanged ({})", state.as_str()));
                }
                self.refresh_map();
                self.refresh_results();
            }

            Event::StartedSleepMode => {
                self.event_log.append(".startedSleepMode");
                self.session.set_state(RecordingState::Sleeping);
                self.refresh_map();
            }

            Event::StoppedSleepMode => {
                self.event_log.append(".stoppedSleepMode");
            }

            Event::MovingStateChanged { state } => {
                self.event_log
                    .append(&format!(".movingStateChanged ({})", state.as_str()));
            }

            Event::SettingsChanged { settings } => {
                self.settings = settings.clone();
                self.refresh_map();
            }
        }
    }

    // ========================================================================
    // View-model access
    // ========================================================================

    pub fn map(&self) -> &MapScene {
        &self.map
    }

    pub fn results_rows(&self) -> &[PanelRow] {
        &self.results_rows
    }

    pub fn timeline_rows(&self) -> &[PanelRow] {
        &self.timeline_rows
    }

    pub fn log_lines(&self) -> &[String] {
        self.event_log.lines()
    }

    pub fn session(&self) -> &RecordingSession {
        &self.session
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ========================================================================
    // Refreshes
    // ========================================================================

    fn refresh_all(&mut self) {
        self.refresh_map();
        self.refresh_results();
        self.refresh_timeline();
    }

    fn refresh_map(&mut self) {
        // skip the rebuild off screen; entering the foreground redraws
        if !self.foreground {
            return;
        }
        self.map = map::build_scene(&self.session, &self.timeline, &self.settings);
    }

    fn refresh_results(&mut self) {
        if !self.foreground {
            return;
        }
        self.results_rows =
            results::build_rows(&self.session, &self.classifiers, &self.settings, Utc::now());
    }

    fn refresh_timeline(&mut self) {
        if !self.foreground {
            return;
        }
        self.timeline_rows = timeline_view::build_rows(&self.timeline, Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{ActivityClassifier, ClassifierKind, ClassifierResult};
    use crate::timeline::{PathItem, TimelineItem, VisitItem};
    use crate::views::map::{MapOverlay, OverlayColor};
    use crate::{GpsPoint, LocomotionSample, MovingState, RawLocation};
    use chrono::{TimeZone, Utc};

    struct NoClassifiers;

    impl ClassifierProvider for NoClassifiers {
        fn classifier_for(
            &self,
            _kind: ClassifierKind,
            _coordinate: GpsPoint,
        ) -> Option<Box<dyn ActivityClassifier>> {
            None
        }
    }

    struct FixedClassifier;

    impl ActivityClassifier for FixedClassifier {
        fn classify(&self, _sample: &LocomotionSample) -> Vec<ClassifierResult> {
            vec![ClassifierResult {
                name: "walking".to_string(),
                score: 0.9,
            }]
        }
        fn contains(&self, _coordinate: GpsPoint) -> bool {
            true
        }
        fn is_stale(&self) -> bool {
            false
        }
        fn coverage_score(&self) -> f64 {
            0.9
        }
    }

    struct FixedProvider;

    impl ClassifierProvider for FixedProvider {
        fn classifier_for(
            &self,
            _kind: ClassifierKind,
            _coordinate: GpsPoint,
        ) -> Option<Box<dyn ActivityClassifier>> {
            Some(Box::new(FixedClassifier))
        }
    }

    fn sample_event(lat: f64, state: MovingState) -> Event {
        let time = Utc.with_ymd_and_hms(2017, 7, 10, 9, 0, 0).unwrap();
        let coordinate = GpsPoint::new(lat, -0.1278);
        Event::SampleUpdated {
            sample: LocomotionSample::new(time, Some(coordinate), state),
            raw: Some(RawLocation::new(coordinate, 15.0, time)),
            filtered: Some(RawLocation::new(coordinate, 6.0, time)),
        }
    }

    fn low_level_dashboard() -> Dashboard {
        Dashboard::with_settings(
            Box::new(NoClassifiers),
            Settings {
                show_timeline_items: false,
                show_locomotion_samples: true,
                ..Settings::default()
            },
        )
    }

    #[test]
    fn test_samples_drive_the_map_in_low_level_mode() {
        let mut dashboard = low_level_dashboard();
        dashboard.start_recording().unwrap();

        dashboard.handle_event(&sample_event(51.50, MovingState::Moving));
        dashboard.handle_event(&sample_event(51.51, MovingState::Moving));
        dashboard.handle_event(&sample_event(51.52, MovingState::Stationary));

        let segment_colors: Vec<OverlayColor> = dashboard
            .map()
            .overlays
            .iter()
            .filter_map(|o| match o {
                MapOverlay::Polyline { color, .. } => Some(*color),
                _ => None,
            })
            .collect();
        assert!(segment_colors.contains(&OverlayColor::Blue));
        assert!(segment_colors.contains(&OverlayColor::Orange));
        assert_eq!(dashboard.session().samples().len(), 3);
    }

    #[test]
    fn test_timeline_mode_ignores_sample_map_refreshes() {
        let mut dashboard = Dashboard::new(Box::new(NoClassifiers));
        dashboard.start_recording().unwrap();
        dashboard.handle_event(&sample_event(51.50, MovingState::Moving));

        // timeline mode with no items: the sample must not appear on the map
        assert!(dashboard.map().overlays.is_empty());
    }

    #[test]
    fn test_timeline_events_flow_through() {
        let mut dashboard = Dashboard::new(Box::new(NoClassifiers));
        let time = Utc.with_ymd_and_hms(2017, 7, 10, 9, 0, 0).unwrap();

        dashboard.handle_event(&Event::NewTimelineItem {
            item: TimelineItem::Visit(VisitItem {
                item_id: "v1".to_string(),
                started_at: Some(time),
                ended_at: None,
                previous_item_id: None,
                center: Some(GpsPoint::new(51.5074, -0.1278)),
                radius_meters: 30.0,
            }),
        });

        assert_eq!(dashboard.timeline().active().len(), 1);
        assert_eq!(dashboard.map().overlays.len(), 2); // annotation + circle
        assert!(dashboard.log_lines()[0].ends_with(".newTimelineItem (Visit)"));

        dashboard.handle_event(&Event::FinalisedTimelineItem {
            item_id: "v1".to_string(),
        });
        assert_eq!(dashboard.timeline().finalised().len(), 1);
        assert!(dashboard
            .log_lines()
            .last()
            .unwrap()
            .ends_with(".finalisedTimelineItem (Visit)"));

        // finalising an unknown item is logged and ignored, not fatal
        dashboard.handle_event(&Event::FinalisedTimelineItem {
            item_id: "ghost".to_string(),
        });
        assert_eq!(dashboard.timeline().finalised().len(), 1);
    }

    #[test]
    fn test_updated_item_replaces_in_place() {
        let mut dashboard = Dashboard::new(Box::new(NoClassifiers));
        let time = Utc.with_ymd_and_hms(2017, 7, 10, 9, 0, 0).unwrap();

        let path = |end_minute: u32| {
            TimelineItem::Path(PathItem {
                item_id: "p1".to_string(),
                started_at: Some(time),
                ended_at: Some(
                    Utc.with_ymd_and_hms(2017, 7, 10, 9, end_minute, 0).unwrap(),
                ),
                previous_item_id: None,
                samples: vec![],
                best_activity_type: None,
                mode_activity_type: None,
            })
        };

        dashboard.handle_event(&Event::NewTimelineItem { item: path(5) });
        dashboard.handle_event(&Event::UpdatedTimelineItem { item: path(9) });

        assert_eq!(dashboard.timeline().active().len(), 1);
        assert_eq!(
            dashboard.timeline().active()[0].duration().unwrap().num_minutes(),
            9
        );
    }

    #[test]
    fn test_background_drops_location_buffers() {
        let mut dashboard = low_level_dashboard();
        dashboard.start_recording().unwrap();
        dashboard.handle_event(&sample_event(51.50, MovingState::Moving));
        assert_eq!(dashboard.session().raw_locations().len(), 1);

        dashboard.entered_background();
        assert!(dashboard.session().raw_locations().is_empty());
        assert!(dashboard.session().filtered_locations().is_empty());

        // background samples keep accumulating, without the noise streams
        dashboard.handle_event(&sample_event(51.51, MovingState::Moving));
        assert_eq!(dashboard.session().samples().len(), 2);
        assert!(dashboard.session().raw_locations().is_empty());
    }

    #[test]
    fn test_settings_change_redraws_map() {
        let mut dashboard = low_level_dashboard();
        dashboard.handle_event(&sample_event(51.50, MovingState::Moving));
        assert!(!dashboard.map().overlays.is_empty());

        dashboard.handle_event(&Event::SettingsChanged {
            settings: Settings {
                show_timeline_items: false,
                show_locomotion_samples: false,
                ..Settings::default()
            },
        });
        assert!(dashboard.map().overlays.is_empty());
    }

    #[test]
    fn test_clear_resets_session_and_log() {
        let mut dashboard = low_level_dashboard();
        dashboard.start_recording().unwrap();
        dashboard.handle_event(&sample_event(51.50, MovingState::Moving));
        assert!(!dashboard.log_lines().is_empty());

        dashboard.clear();
        assert!(dashboard.session().samples().is_empty());
        assert!(dashboard.log_lines().is_empty());
        assert!(dashboard.map().overlays.is_empty());
    }

    #[test]
    fn test_selective_state_change_logging() {
        let mut dashboard = Dashboard::new(Box::new(FixedProvider));

        dashboard.handle_event(&Event::RecordingStateChanged {
            state: RecordingState::Recording,
        });
        dashboard.handle_event(&Event::RecordingStateChanged {
            state: RecordingState::Sleeping,
        });
        dashboard.handle_event(&Event::RecordingStateChanged {
            state: RecordingState::Off,
        });

        let state_lines: Vec<_> = dashboard
            .log_lines()
            .iter()
            .filter(|l| l.contains(".recordingStateChanged"))
            .collect();
        assert_eq!(state_lines.len(), 2);
    }

    #[test]
    fn test_classifier_rows_appear_once_models_arrive() {
        let mut dashboard = Dashboard::new(Box::new(FixedProvider));
        dashboard.start_recording().unwrap();
        dashboard.handle_event(&sample_event(51.50, MovingState::Moving));

        assert!(dashboard.results_rows().iter().any(
            |row| matches!(row, PanelRow::Entry { left, .. } if left == "Walking")
        ));
    }
}
