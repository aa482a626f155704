//! Edge detection shared by the progress widgets.
//!
//! A tracker remembers the last value it observed and fires its callbacks
//! only on transitions, never on repeated observations of the same state.

use std::fmt;

/// Called with the new raw value whenever it differs from the previous one.
pub type ChangeCallback = Box<dyn FnMut(f64) + Send>;

/// Called when a value crosses up to or past its maximum.
pub type CompleteCallback = Box<dyn FnMut() + Send>;

/// Called with the index of every segment that became full.
pub type SegmentCallback = Box<dyn FnMut(usize) + Send>;

/// What a single observation triggered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Edges {
    /// The value differed from the previous observation.
    pub changed: bool,
    /// The value crossed from below `max` to `max` or above.
    pub completed: bool,
}

/// Previous-value memo with change and completion callbacks.
pub(crate) struct ValueTracker {
    previous: f64,
    pub(crate) on_change: Option<ChangeCallback>,
    pub(crate) on_complete: Option<CompleteCallback>,
}

impl ValueTracker {
    pub(crate) fn new(initial: f64) -> Self {
        Self {
            previous: initial,
            on_change: None,
            on_complete: None,
        }
    }

    /// Compares `value` against the memo, fires callbacks, then stores it.
    pub(crate) fn observe(&mut self, value: f64, max: f64) -> Edges {
        if value == self.previous {
            return Edges::default();
        }

        let completed = self.previous < max && value >= max;

        if let Some(on_change) = self.on_change.as_mut() {
            on_change(value);
        }
        if completed {
            if let Some(on_complete) = self.on_complete.as_mut() {
                on_complete();
            }
        }

        self.previous = value;
        Edges {
            changed: true,
            completed,
        }
    }
}

impl fmt::Debug for ValueTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueTracker")
            .field("previous", &self.previous)
            .field("on_change", &self.on_change.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// Completed-segment memo for segmented bars.
pub(crate) struct SegmentTracker {
    previous: usize,
    pub(crate) on_segment_complete: Option<SegmentCallback>,
}

impl SegmentTracker {
    pub(crate) fn new(initial: usize) -> Self {
        Self {
            previous: initial,
            on_segment_complete: None,
        }
    }

    pub(crate) fn reset(&mut self, index: usize) {
        self.previous = index;
    }

    /// Fires once per segment in `previous..current`, ascending, and returns
    /// that range. A lower `current` only moves the memo down.
    pub(crate) fn observe(&mut self, current: usize) -> std::ops::Range<usize> {
        let crossed = self.previous..current.max(self.previous);
        if let Some(on_segment_complete) = self.on_segment_complete.as_mut() {
            for index in crossed.clone() {
                on_segment_complete(index);
            }
        }
        self.previous = current;
        crossed
    }
}

impl fmt::Debug for SegmentTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentTracker")
            .field("previous", &self.previous)
            .field("on_segment_complete", &self.on_segment_complete.is_some())
            .finish()
    }
}
