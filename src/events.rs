//! Typed events connecting the engine to the display layer.
//!
//! The engine announces what happened; each event carries its own payload so
//! handlers never have to reach back into shared managers. Dispatch is
//! synchronous and single-threaded: `publish` runs every registered handler
//! in registration order before returning.

use crate::segments::MovingState;
use crate::session::RecordingState;
use crate::settings::Settings;
use crate::timeline::TimelineItem;
use crate::{LocomotionSample, RawLocation};

/// Everything the engine or host can announce to the display layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The engine opened a new timeline item
    NewTimelineItem { item: TimelineItem },
    /// An existing timeline item changed (grew, reclassified, ...)
    UpdatedTimelineItem { item: TimelineItem },
    /// Post-processing finished an item; it will not change again
    FinalisedTimelineItem { item_id: String },
    /// The engine merged timeline items together
    MergedTimelineItems { description: String },
    /// A fresh locomotion sample, with the raw/filtered fixes behind it
    SampleUpdated {
        sample: LocomotionSample,
        raw: Option<RawLocation>,
        filtered: Option<RawLocation>,
    },
    /// The engine's recording state changed
    RecordingStateChanged { state: RecordingState },
    StartedSleepMode,
    StoppedSleepMode,
    /// The engine's moving/stationary determination flipped
    MovingStateChanged { state: MovingState },
    /// The host changed display settings
    SettingsChanged { settings: Settings },
}

type Handler = Box<dyn FnMut(&Event)>;

/// Synchronous publish/subscribe bus for [`Event`]s.
///
/// # Example
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use locoview::{Event, EventBus};
///
/// let mut bus = EventBus::new();
/// let seen = Rc::new(RefCell::new(0));
///
/// let counter = seen.clone();
/// bus.when(move |event| {
///     if matches!(event, Event::StartedSleepMode) {
///         *counter.borrow_mut() += 1;
///     }
/// });
///
/// bus.publish(&Event::StartedSleepMode);
/// assert_eq!(*seen.borrow(), 1);
/// ```
#[derive(Default)]
pub struct EventBus {
    handlers: Vec<Handler>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. Handlers see every event and match what they need.
    pub fn when<F>(&mut self, handler: F)
    where
        F: FnMut(&Event) + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    /// Deliver an event to every handler, in registration order.
    pub fn publish(&mut self, event: &Event) {
        for handler in &mut self.handlers {
            handler(event);
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}
