//! Timeline panel rows.
//!
//! Active items first, then finalised, each newest-first. Items whose
//! engine-side predecessor is not the item displayed below them get a
//! data-gap separator, continuing across the active/finalised boundary.

use chrono::{DateTime, Utc};

use crate::format::{age_string, clock_time, duration_string, meters_per_second_string, meters_string};
use crate::timeline::{Timeline, TimelineItem};
use crate::views::PanelRow;

/// Build the full timeline panel from the mirrored items.
pub fn build_rows(timeline: &Timeline, now: DateTime<Utc>) -> Vec<PanelRow> {
    let mut rows = Vec::new();
    // the previously rendered item, for gap detection across sections
    let mut item_above: Option<&TimelineItem> = None;

    rows.push(PanelRow::heading("Active Timeline Items"));
    if timeline.active().is_empty() {
        rows.push(PanelRow::entry("-", ""));
    } else {
        for item in timeline.active().iter().rev() {
            push_item(&mut rows, timeline, item, &mut item_above, now);
        }
    }

    rows.push(PanelRow::heading("Finalised Timeline Items"));
    if timeline.finalised().is_empty() {
        rows.push(PanelRow::entry("-", ""));
    } else {
        for item in timeline.finalised().iter().rev() {
            push_item(&mut rows, timeline, item, &mut item_above, now);
        }
    }

    rows
}

fn push_item<'a>(
    rows: &mut Vec<PanelRow>,
    timeline: &Timeline,
    item: &'a TimelineItem,
    item_above: &mut Option<&'a TimelineItem>,
    now: DateTime<Utc>,
) {
    if let Some(above) = item_above {
        if above.previous_item_id() != Some(item.item_id()) {
            push_data_gap(rows);
        }
    }
    *item_above = Some(item);

    let is_current = timeline.is_current(item.item_id());
    rows.push(PanelRow::subheading(item_title(item, is_current)));

    // the current item is still growing, so its duration runs to now
    let duration = if is_current {
        item.started_at().map(|start| now - start)
    } else {
        item.duration()
    };
    if let Some(duration) = duration {
        rows.push(PanelRow::entry("Duration", duration_string(duration)));
    }

    match item {
        TimelineItem::Path(path) => {
            rows.push(PanelRow::entry(
                "Distance",
                meters_string(path.distance_meters()),
            ));
            if let Some(speed) = path.meters_per_second() {
                rows.push(PanelRow::entry("Speed", meters_per_second_string(speed)));
            }
        }
        TimelineItem::Visit(visit) => {
            rows.push(PanelRow::entry(
                "Radius",
                meters_string(visit.radius_meters),
            ));
        }
    }

    if !is_current {
        if let Some(end) = item.ended_at() {
            rows.push(PanelRow::entry(
                "Ended",
                format!("{} ago", age_string(end, now)),
            ));
        }
    }

    if let Some(previous) = item.previous_item_id().and_then(|id| timeline.item(id)) {
        if let Some(gap) = item.gap_from(previous) {
            rows.push(PanelRow::entry("Gap from previous", duration_string(gap)));
        }
    }
}

fn item_title(item: &TimelineItem, is_current: bool) -> String {
    let mut title = String::new();
    if let Some(start) = item.started_at() {
        title.push_str(&format!("[{}] ", clock_time(start)));
    }
    if is_current {
        title.push_str("Current ");
    }
    title.push_str(item.kind().as_str());

    if let TimelineItem::Path(path) = item {
        if let Some(best) = &path.best_activity_type {
            title.push_str(&format!(" (best: {}", best));
            if let Some(mode) = &path.mode_activity_type {
                title.push_str(&format!(", mode: {}", mode));
            }
            title.push(')');
        }
    }

    title
}

fn push_data_gap(rows: &mut Vec<PanelRow>) {
    rows.push(PanelRow::Divider);
    rows.push(PanelRow::subheading("Timeline Gap"));
    rows.push(PanelRow::Divider);
}
