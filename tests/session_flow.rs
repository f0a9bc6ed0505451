//! End-to-end flow: engine events through the bus into a dashboard,
//! checked against the map scene and panels a host would render.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{Duration, TimeZone, Utc};
use locoview::{
    ActivityClassifier, ClassifierKind, ClassifierProvider, ClassifierResult, Dashboard, Event,
    EventBus, GpsPoint, LocomotionSample, MapOverlay, MovingState, OverlayColor, PanelRow,
    PathItem, RawLocation, Settings, TimelineItem, VisitItem,
};

struct DemoClassifier;

impl ActivityClassifier for DemoClassifier {
    fn classify(&self, sample: &LocomotionSample) -> Vec<ClassifierResult> {
        let walking_score = match sample.moving_state {
            MovingState::Moving => 0.9,
            _ => 0.05,
        };
        vec![
            ClassifierResult {
                name: "walking".to_string(),
                score: walking_score,
            },
            ClassifierResult {
                name: "airplane".to_string(),
                score: 0.001,
            },
        ]
    }

    fn contains(&self, _coordinate: GpsPoint) -> bool {
        true
    }

    fn is_stale(&self) -> bool {
        false
    }

    fn coverage_score(&self) -> f64 {
        0.82
    }
}

struct DemoProvider;

impl ClassifierProvider for DemoProvider {
    fn classifier_for(
        &self,
        _kind: ClassifierKind,
        _coordinate: GpsPoint,
    ) -> Option<Box<dyn ActivityClassifier>> {
        Some(Box::new(DemoClassifier))
    }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn sample_event(minute: u32, lat: f64, state: MovingState) -> Event {
    let time = Utc.with_ymd_and_hms(2017, 7, 10, 9, minute, 0).unwrap();
    let coordinate = GpsPoint::new(lat, -0.1278);
    let mut sample = LocomotionSample::new(time, Some(coordinate), state);
    sample.horizontal_accuracy = Some(8.0);
    Event::SampleUpdated {
        sample,
        raw: Some(RawLocation::new(coordinate, 15.0, time)),
        filtered: Some(RawLocation::new(coordinate, 8.0, time)),
    }
}

#[test]
fn low_level_walk_renders_linked_state_polylines() {
    init_logging();

    let settings = Settings {
        show_timeline_items: false,
        show_raw_locations: true,
        show_filtered_locations: true,
        show_locomotion_samples: true,
        ..Settings::default()
    };
    let mut dashboard = Dashboard::with_settings(Box::new(DemoProvider), settings);
    dashboard.start_recording().unwrap();

    // walk, pause at the shop, walk on
    let walk = [
        (0, 51.500, MovingState::Moving),
        (1, 51.501, MovingState::Moving),
        (2, 51.502, MovingState::Moving),
        (3, 51.502, MovingState::Stationary),
        (4, 51.502, MovingState::Stationary),
        (5, 51.503, MovingState::Moving),
    ];
    for (minute, lat, state) in walk {
        dashboard.handle_event(&sample_event(minute, lat, state));
    }

    let polylines: Vec<(&Vec<GpsPoint>, OverlayColor)> = dashboard
        .map()
        .overlays
        .iter()
        .filter_map(|overlay| match overlay {
            MapOverlay::Polyline { coordinates, color } => Some((coordinates, *color)),
            _ => None,
        })
        .collect();

    // raw + filtered + three movement segments (moving, stationary, moving)
    assert_eq!(polylines.len(), 5);
    assert_eq!(polylines[0].1, OverlayColor::Red);
    assert_eq!(polylines[1].1, OverlayColor::Purple);

    let segments: Vec<_> = polylines[2..].to_vec();
    assert_eq!(
        segments.iter().map(|s| s.1).collect::<Vec<_>>(),
        vec![OverlayColor::Blue, OverlayColor::Orange, OverlayColor::Blue]
    );

    // adjacent segments share their linking endpoint
    assert_eq!(segments[0].0.last(), segments[1].0.first());
    assert_eq!(segments[1].0.last(), segments[2].0.first());

    // auto-zoom covers the whole walk
    let rect = dashboard.map().zoom_rect.unwrap();
    assert!(rect.min_lat <= 51.500 && rect.max_lat >= 51.503);

    // the details panel reflects the live stream and the classifier
    assert!(dashboard.results_rows().iter().any(
        |row| matches!(row, PanelRow::Entry { left, right, .. }
            if left == "Receiving accuracy" && right.starts_with("8 metres"))
    ));
    assert!(dashboard.results_rows().iter().any(
        |row| matches!(row, PanelRow::Entry { left, dimmed: false, .. } if left == "Walking")
    ));
    assert!(dashboard.results_rows().iter().any(
        |row| matches!(row, PanelRow::Entry { left, dimmed: true, .. } if left == "Airplane")
    ));
}

#[test]
fn timeline_items_flow_from_bus_to_panels() {
    init_logging();

    let dashboard = Rc::new(RefCell::new(Dashboard::new(Box::new(DemoProvider))));
    let mut bus = EventBus::new();

    let sink = dashboard.clone();
    bus.when(move |event| sink.borrow_mut().handle_event(event));

    let start = Utc.with_ymd_and_hms(2017, 7, 10, 9, 0, 0).unwrap();

    let home = TimelineItem::Visit(VisitItem {
        item_id: "home".to_string(),
        started_at: Some(start),
        ended_at: Some(start + Duration::minutes(10)),
        previous_item_id: None,
        center: Some(GpsPoint::new(51.5074, -0.1278)),
        radius_meters: 35.0,
    });
    bus.publish(&Event::NewTimelineItem { item: home });

    let commute_samples: Vec<LocomotionSample> = (0..5)
        .map(|i| {
            LocomotionSample::new(
                start + Duration::minutes(10 + i),
                Some(GpsPoint::new(51.5074 + i as f64 * 0.002, -0.1278)),
                MovingState::Moving,
            )
        })
        .collect();
    let commute = TimelineItem::Path(PathItem {
        item_id: "commute".to_string(),
        started_at: Some(start + Duration::minutes(10)),
        ended_at: Some(start + Duration::minutes(25)),
        previous_item_id: Some("home".to_string()),
        samples: commute_samples,
        best_activity_type: Some("walking".to_string()),
        mode_activity_type: Some("walking".to_string()),
    });
    bus.publish(&Event::NewTimelineItem { item: commute });

    bus.publish(&Event::FinalisedTimelineItem {
        item_id: "home".to_string(),
    });

    let dashboard = dashboard.borrow();

    // map: finalised visit (annotation + gray circle) and active path (brown)
    let overlays = &dashboard.map().overlays;
    assert!(overlays
        .iter()
        .any(|o| matches!(o, MapOverlay::Annotation { active: false, .. })));
    assert!(overlays.iter().any(|o| matches!(
        o,
        MapOverlay::Circle {
            color: OverlayColor::DarkGray,
            ..
        }
    )));
    assert!(overlays.iter().any(|o| matches!(
        o,
        MapOverlay::Polyline {
            color: OverlayColor::Brown,
            ..
        }
    )));

    // timeline panel: current path titled and linked without a gap
    let subheadings: Vec<&str> = dashboard
        .timeline_rows()
        .iter()
        .filter_map(|row| match row {
            PanelRow::Subheading { title } => Some(title.as_str()),
            _ => None,
        })
        .collect();
    assert!(subheadings
        .contains(&"[09:10] Current Path (best: walking, mode: walking)"));
    assert!(subheadings.contains(&"[09:00] Visit"));
    assert!(!subheadings.contains(&"Timeline Gap"));

    // the log recorded the engine's announcements in order
    let lines = dashboard.log_lines();
    assert!(lines[0].ends_with(".newTimelineItem (Visit)"));
    assert!(lines[1].ends_with(".newTimelineItem (Path)"));
    assert!(lines[2].ends_with(".finalisedTimelineItem (Visit)"));
}

#[test]
fn merged_and_sleep_events_only_touch_the_log() {
    init_logging();

    let mut dashboard = Dashboard::new(Box::new(DemoProvider));

    dashboard.handle_event(&Event::MergedTimelineItems {
        description: "visit absorbed a 40 second path".to_string(),
    });
    dashboard.handle_event(&Event::StartedSleepMode);
    dashboard.handle_event(&Event::StoppedSleepMode);
    dashboard.handle_event(&Event::MovingStateChanged {
        state: MovingState::Stationary,
    });

    let lines = dashboard.log_lines();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].contains(".mergedItems (visit absorbed a 40 second path)"));
    assert!(lines[1].ends_with(".startedSleepMode"));
    assert!(lines[2].ends_with(".stoppedSleepMode"));
    assert!(lines[3].ends_with(".movingStateChanged (stationary)"));
    assert!(dashboard.map().overlays.is_empty());
}

#[test]
fn clear_resets_the_whole_surface() {
    init_logging();

    let mut dashboard = Dashboard::with_settings(
        Box::new(DemoProvider),
        Settings {
            show_timeline_items: false,
            show_locomotion_samples: true,
            ..Settings::default()
        },
    );
    dashboard.start_recording().unwrap();
    dashboard.handle_event(&sample_event(0, 51.500, MovingState::Moving));
    dashboard.handle_event(&sample_event(1, 51.501, MovingState::Moving));
    assert!(!dashboard.map().overlays.is_empty());

    dashboard.clear();
    assert!(dashboard.map().overlays.is_empty());
    assert!(dashboard.log_lines().is_empty());
    assert!(dashboard.session().samples().is_empty());

    dashboard.stop_recording().unwrap();
    assert!(dashboard
        .log_lines()
        .last()
        .unwrap()
        .ends_with("recording stopped"));
}
