#![warn(missing_docs)]

//! # bubbletea-progress
//!
//! Progress indicators for [bubbletea-rs](https://github.com/joshka/bubbletea-rs)
//! applications: a linear progress bar, a circular ring gauge and a countdown
//! timer, plus a marker registry that lets a grid host swap widgets into
//! cells by name.
//!
//! ## Overview
//!
//! Each widget follows the Elm Architecture with `init()`, `update()` and
//! `view()`. On top of rendering, the widgets share a behavioral contract:
//!
//! - **Value-change detection**: `on_change` fires only when the value differs
//!   from the last one observed.
//! - **Completion edges**: `on_complete` fires once per upward crossing of
//!   `max`; dropping below re-arms it.
//! - **Segment edges**: segmented bars report every segment that filled, in
//!   ascending order, even when one update jumps several segments.
//! - **Tickers**: message animation (500ms) and countdown ticks (1s) are
//!   bubbletea commands tagged with the widget's id, so pausing or replacing
//!   a widget stops them.
//!
//! ## Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`Progress`] | Horizontal or vertical bar: determinate, indeterminate, buffer, segmented |
//! | [`CircularProgress`] | Ring gauge with a center label |
//! | [`Countdown`] | Days/hours/minutes/seconds timer with pause, resume and reset |
//! | [`Registry`] | Marker to component lookup for grid hosts |
//!
//! ## Quick Start
//!
//! ```rust
//! use bubbletea_progress::progress::{new, with_label, with_segments};
//!
//! let mut bar = new(30.0, &[with_label(true), with_segments(10)])
//!     .unwrap()
//!     .on_segment_complete(|i| println!("segment {} done", i));
//!
//! assert_eq!(bar.label_text(), "30%");
//! bar.set_value(55.0); // prints segments 3 and 4
//! ```
//!
//! ## Grid hosts
//!
//! ```rust
//! use bubbletea_progress::cell::{build_cell, default_registry};
//! use serde_json::json;
//!
//! let registry = default_registry();
//! let cell = build_cell(&registry, "__PROGRESS__", &json!({ "value": 75, "showLabel": true }))
//!     .unwrap()
//!     .expect("marker is registered");
//! assert!(cell.view().contains("75%"));
//! ```

pub mod cell;
pub mod circular;
pub mod countdown;
pub mod edge;
pub mod error;
pub mod math;
mod paint;
pub mod progress;
pub mod registry;
pub mod time;

/// Role a widget plays for assistive tooling and host renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// A determinate or indeterminate progress indicator.
    ProgressBar,
    /// A countdown or other timer.
    Timer,
}

/// Accessibility facts a widget exposes to its host.
#[derive(Debug, Clone, PartialEq)]
pub struct Semantics {
    /// The widget's role.
    pub role: Role,
    /// Current raw value, unclamped.
    pub value_now: f64,
    /// Lower bound, always 0.
    pub value_min: f64,
    /// Upper bound.
    pub value_max: f64,
    /// Accessible name.
    pub label: String,
    /// Human-readable value, present when the widget shows a label.
    pub value_text: Option<String>,
}

/// Widgets that can describe themselves to a host.
///
/// ```rust
/// use bubbletea_progress::{progress, Role, Semantic};
///
/// let bar = progress::new(150.0, &[]).unwrap();
/// let facts = bar.semantics();
/// assert_eq!(facts.role, Role::ProgressBar);
/// assert_eq!(facts.value_now, 150.0); // raw value, not clamped
/// assert_eq!(facts.value_max, 100.0);
/// ```
pub trait Semantic {
    /// Returns the widget's current semantic facts.
    fn semantics(&self) -> Semantics;
}

pub use cell::{build_cell, default_registry, CellFactory, CellWidget};
pub use circular::Model as CircularProgress;
pub use countdown::Model as Countdown;
pub use edge::Edges;
pub use error::{Error, Result};
pub use progress::Model as Progress;
pub use registry::Registry;
pub use time::{remaining, reformat, Clock, ManualClock, SystemClock, TargetDate, TimeRemaining};

/// Prelude module for convenient imports.
///
/// ```rust
/// use bubbletea_progress::prelude::*;
///
/// let ring = CircularProgress::default();
/// assert_eq!(ring.semantics().role, Role::ProgressBar);
/// ```
pub mod prelude {
    pub use crate::cell::{build_cell, default_registry, CellWidget};
    pub use crate::circular::{Direction, Model as CircularProgress};
    pub use crate::countdown::{Model as Countdown, RenderState, Renderer};
    pub use crate::progress::{
        Anchor, MessageAnimation, Model as Progress, Orientation, Thickness, Variant,
    };
    pub use crate::registry::Registry;
    pub use crate::time::{Clock, ManualClock, SystemClock, TargetDate, TimeRemaining};
    pub use crate::{Error, Result, Role, Semantic, Semantics};
}
