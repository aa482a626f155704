//! Linear progress bar component for Bubble Tea applications.
//!
//! The bar tracks a raw `value` out of `max`, renders a clamped fill, and
//! reports edges to the host through callbacks: value changes, completion
//! (crossing `max`) and, for segmented bars, every segment that filled.
//!
//! # Basic Usage
//!
//! ```rust
//! use bubbletea_progress::progress::{new, with_label, with_max, with_width};
//!
//! let bar = new(3.0, &[with_max(12.0), with_width(24), with_label(true)]).unwrap();
//! assert_eq!(bar.label_text(), "25%");
//! ```
//!
//! # Callbacks
//!
//! ```rust
//! use bubbletea_progress::progress::new;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let done = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&done);
//! let mut bar = new(50.0, &[])
//!     .unwrap()
//!     .on_complete(move || {
//!         counter.fetch_add(1, Ordering::SeqCst);
//!     });
//!
//! bar.set_value(100.0);
//! bar.set_value(100.0); // unchanged, nothing fires
//! assert_eq!(done.load(Ordering::SeqCst), 1);
//! ```
//!
//! # Message Animation
//!
//! A bar can carry a short message animated by a 500ms ticker. Start it with
//! the command returned from [`Model::init`] or [`Model::set_message`] and
//! forward [`FrameMsg`] values back through [`Model::update`].
//!
//! ```rust
//! use bubbletea_progress::progress::{new, with_message};
//!
//! let mut bar = new(10.0, &[with_message("Uploading".to_string())]).unwrap();
//! assert_eq!(bar.message_text().as_deref(), Some("... Uploading ..."));
//! let _ticker = bar.init();
//! ```

use crate::edge::{
    ChangeCallback, CompleteCallback, Edges, SegmentCallback, SegmentTracker, ValueTracker,
};
use crate::error::{Error, Result};
use crate::math::{self, SegmentFill};
use crate::paint::{self, Align};
use crate::{Role, Semantic, Semantics};
use bubbletea_rs::{tick as bubbletea_tick, Cmd, Model as BubbleTeaModel, Msg};
use serde::Deserialize;
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tracing::debug;

// Internal ID management for progress instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

const DEFAULT_MAX: f64 = 100.0;
const DEFAULT_WIDTH: usize = 40;
const ANIMATION_INTERVAL: Duration = Duration::from_millis(500);
const ANIMATION_PHASES: usize = 3;
const PIXELS_PER_ROW: f64 = 20.0;
const MAX_LENGTH: usize = 1024;
const MAX_THICKNESS: usize = 32;
const DEFAULT_ARIA_LABEL: &str = "Progress indicator";

const FILL: char = '█';
const BUFFER: char = '▒';
const TRACK: char = '░';

/// Custom label text from `(value, max)`.
pub type LabelFormatter = Box<dyn Fn(f64, f64) -> String + Send>;

/// Direction the bar fills in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    /// Fills left to right.
    #[default]
    Horizontal,
    /// Fills bottom to top.
    Vertical,
}

/// How the bar interprets its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// A known, bounded percentage.
    #[default]
    Determinate,
    /// No computable percentage; the host shows perpetual motion.
    Indeterminate,
    /// A primary level over a secondary buffered level.
    Buffer,
}

/// Thickness of the bar across its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Thickness {
    /// 20 pixels.
    Thin,
    /// 40 pixels.
    #[default]
    Normal,
    /// 60 pixels.
    Thick,
    /// An explicit pixel count.
    Pixels(u32),
}

impl Thickness {
    /// Effective thickness in pixels.
    pub fn pixels(&self) -> u32 {
        match self {
            Thickness::Thin => 20,
            Thickness::Normal => 40,
            Thickness::Thick => 60,
            Thickness::Pixels(px) => *px,
        }
    }

    /// Terminal rows (or double-width columns when vertical) for this thickness.
    fn cells(&self) -> usize {
        ((self.pixels() as f64 / PIXELS_PER_ROW).round() as usize).clamp(1, MAX_THICKNESS)
    }
}

/// One of seven anchor points for labels and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    /// Above the bar, left aligned.
    TopLeft,
    /// Above the bar, centered.
    TopCenter,
    /// Above the bar, right aligned.
    TopRight,
    /// Over the middle of the bar.
    Center,
    /// Below the bar, left aligned.
    BottomLeft,
    /// Below the bar, centered.
    BottomCenter,
    /// Below the bar, right aligned.
    BottomRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Above,
    Over,
    Below,
}

impl Anchor {
    fn slot(&self) -> Slot {
        match self {
            Anchor::TopLeft | Anchor::TopCenter | Anchor::TopRight => Slot::Above,
            Anchor::Center => Slot::Over,
            Anchor::BottomLeft | Anchor::BottomCenter | Anchor::BottomRight => Slot::Below,
        }
    }

    fn align(&self) -> Align {
        match self {
            Anchor::TopLeft | Anchor::BottomLeft => Align::Left,
            Anchor::TopCenter | Anchor::Center | Anchor::BottomCenter => Align::Center,
            Anchor::TopRight | Anchor::BottomRight => Align::Right,
        }
    }
}

/// How the message text is animated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageAnimation {
    /// Dots sweep around the message.
    #[default]
    DotsWave,
    /// One to three trailing dots.
    DotsPulse,
    /// One to three trailing dots.
    Ellipsis,
    /// Static message, no ticker.
    None,
}

/// Configuration options for [`new`].
#[derive(Debug, Clone)]
pub enum ProgressOption {
    /// Sets the maximum value.
    WithMax(f64),
    /// Sets the fill direction.
    WithOrientation(Orientation),
    /// Sets the variant.
    WithVariant(Variant),
    /// Sets the secondary level shown by [`Variant::Buffer`].
    WithBufferValue(f64),
    /// Splits the bar into this many segments.
    WithSegments(usize),
    /// Leaves a gap between segments.
    WithSegmentSpacing(bool),
    /// Sets the thickness.
    WithThickness(Thickness),
    /// Sets the fill color.
    WithColor(String),
    /// Sets the track color.
    WithTrackColor(String),
    /// Sets the buffer color.
    WithBufferColor(String),
    /// Shows or hides the label.
    WithLabel(bool),
    /// Sets where the label is drawn.
    WithLabelPosition(Anchor),
    /// Sets the message text.
    WithMessage(String),
    /// Sets where the message is drawn.
    WithMessagePosition(Anchor),
    /// Sets the message animation.
    WithMessageAnimation(MessageAnimation),
    /// Overrides the accessible name.
    WithAriaLabel(String),
    /// Sets the track length in terminal cells.
    WithWidth(usize),
}

impl ProgressOption {
    fn apply(&self, m: &mut Model) -> Result<()> {
        match self {
            ProgressOption::WithMax(max) => m.max = math::validate_max(*max)?,
            ProgressOption::WithOrientation(orientation) => m.orientation = *orientation,
            ProgressOption::WithVariant(variant) => m.variant = *variant,
            ProgressOption::WithBufferValue(buffer) => m.buffer_value = Some(*buffer),
            ProgressOption::WithSegments(segments) => m.segments = Some(validate_segments(*segments)?),
            ProgressOption::WithSegmentSpacing(spacing) => m.segment_spacing = *spacing,
            ProgressOption::WithThickness(thickness) => m.thickness = *thickness,
            ProgressOption::WithColor(color) => m.color = color.clone(),
            ProgressOption::WithTrackColor(color) => m.track_color = color.clone(),
            ProgressOption::WithBufferColor(color) => m.buffer_color = color.clone(),
            ProgressOption::WithLabel(show) => m.show_label = *show,
            ProgressOption::WithLabelPosition(anchor) => m.label_position = *anchor,
            ProgressOption::WithMessage(message) => m.message = Some(message.clone()),
            ProgressOption::WithMessagePosition(anchor) => m.message_position = *anchor,
            ProgressOption::WithMessageAnimation(animation) => m.message_animation = *animation,
            ProgressOption::WithAriaLabel(label) => m.aria_label = Some(label.clone()),
            ProgressOption::WithWidth(width) => m.width = *width,
        }
        Ok(())
    }
}

fn validate_segments(segments: usize) -> Result<usize> {
    if segments == 0 {
        return Err(Error::invalid_configuration(
            "segments",
            "must be a positive integer",
        ));
    }
    Ok(segments)
}

/// Sets the maximum value (default 100). Must be finite and greater than 0.
pub fn with_max(max: f64) -> ProgressOption {
    ProgressOption::WithMax(max)
}

/// Sets the fill direction.
pub fn with_orientation(orientation: Orientation) -> ProgressOption {
    ProgressOption::WithOrientation(orientation)
}

/// Sets the variant.
pub fn with_variant(variant: Variant) -> ProgressOption {
    ProgressOption::WithVariant(variant)
}

/// Sets the buffered level, only drawn with [`Variant::Buffer`].
pub fn with_buffer_value(buffer: f64) -> ProgressOption {
    ProgressOption::WithBufferValue(buffer)
}

/// Splits the bar into `segments` equal cells.
pub fn with_segments(segments: usize) -> ProgressOption {
    ProgressOption::WithSegments(segments)
}

/// Leaves a one cell gap between segments.
pub fn with_segment_spacing(spacing: bool) -> ProgressOption {
    ProgressOption::WithSegmentSpacing(spacing)
}

/// Sets the thickness.
pub fn with_thickness(thickness: Thickness) -> ProgressOption {
    ProgressOption::WithThickness(thickness)
}

/// Sets the fill color.
pub fn with_color(color: String) -> ProgressOption {
    ProgressOption::WithColor(color)
}

/// Sets the track color.
pub fn with_track_color(color: String) -> ProgressOption {
    ProgressOption::WithTrackColor(color)
}

/// Sets the color of the buffered level.
pub fn with_buffer_color(color: String) -> ProgressOption {
    ProgressOption::WithBufferColor(color)
}

/// Shows or hides the label.
pub fn with_label(show: bool) -> ProgressOption {
    ProgressOption::WithLabel(show)
}

/// Sets where the label is drawn (default top-right).
pub fn with_label_position(anchor: Anchor) -> ProgressOption {
    ProgressOption::WithLabelPosition(anchor)
}

/// Sets the message text.
pub fn with_message(message: String) -> ProgressOption {
    ProgressOption::WithMessage(message)
}

/// Sets where the message is drawn (default bottom-left).
pub fn with_message_position(anchor: Anchor) -> ProgressOption {
    ProgressOption::WithMessagePosition(anchor)
}

/// Sets the message animation (default dots-wave).
pub fn with_message_animation(animation: MessageAnimation) -> ProgressOption {
    ProgressOption::WithMessageAnimation(animation)
}

/// Overrides the accessible name.
pub fn with_aria_label(label: String) -> ProgressOption {
    ProgressOption::WithAriaLabel(label)
}

/// Sets the track length in terminal cells (default 40).
pub fn with_width(width: usize) -> ProgressOption {
    ProgressOption::WithWidth(width)
}

/// Message advancing the message animation by one phase.
#[derive(Debug, Clone)]
pub struct FrameMsg {
    id: i64,
    tag: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Fill,
    Buffer,
    Track,
    Gap,
}

impl Tone {
    fn glyph(&self) -> char {
        match self {
            Tone::Fill => FILL,
            Tone::Buffer => BUFFER,
            Tone::Track => TRACK,
            Tone::Gap => ' ',
        }
    }
}

/// A linear progress bar.
pub struct Model {
    id: i64,
    tag: i64,

    value: f64,
    max: f64,

    /// Fill direction.
    pub orientation: Orientation,
    /// Variant.
    pub variant: Variant,
    buffer_value: Option<f64>,
    segments: Option<usize>,
    /// Leave a gap between segments.
    pub segment_spacing: bool,
    /// Thickness across the bar.
    pub thickness: Thickness,
    /// Track length in terminal cells.
    pub width: usize,

    /// Fill color.
    pub color: String,
    /// Track color.
    pub track_color: String,
    /// Buffer color.
    pub buffer_color: String,

    /// Whether the label is drawn.
    pub show_label: bool,
    /// Where the label is drawn.
    pub label_position: Anchor,
    label_formatter: Option<LabelFormatter>,

    message: Option<String>,
    /// Where the message is drawn.
    pub message_position: Anchor,
    message_animation: MessageAnimation,
    animation_frame: usize,

    aria_label: Option<String>,

    values: ValueTracker,
    segment_memo: SegmentTracker,
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("id", &self.id)
            .field("value", &self.value)
            .field("max", &self.max)
            .field("orientation", &self.orientation)
            .field("variant", &self.variant)
            .field("segments", &self.segments)
            .field("message", &self.message)
            .field("animation_frame", &self.animation_frame)
            .field("values", &self.values)
            .field("segment_memo", &self.segment_memo)
            .finish_non_exhaustive()
    }
}

/// Creates a progress bar at `value` with the given options applied in order.
///
/// # Defaults
///
/// - **max**: 100
/// - **orientation**: horizontal, **variant**: determinate
/// - **thickness**: normal (40px), **width**: 40 cells
/// - **label**: hidden, top-right
/// - **message**: none, bottom-left, dots-wave
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`] for a `max` that is not a finite
/// number above 0 or for zero segments.
///
/// ```rust
/// use bubbletea_progress::progress::{new, with_max, with_segments};
///
/// assert!(new(5.0, &[with_max(0.0)]).is_err());
/// assert!(new(5.0, &[with_segments(0)]).is_err());
/// assert_eq!(new(5.0, &[with_max(10.0)]).unwrap().percentage(), 50.0);
/// ```
pub fn new(value: f64, opts: &[ProgressOption]) -> Result<Model> {
    let mut m = Model::with_value(value);
    for opt in opts {
        opt.apply(&mut m)?;
    }
    let index = m.segment_index();
    m.segment_memo.reset(index);
    Ok(m)
}

impl Model {
    fn with_value(value: f64) -> Self {
        Self {
            id: next_id(),
            tag: 0,
            value,
            max: DEFAULT_MAX,
            orientation: Orientation::default(),
            variant: Variant::default(),
            buffer_value: None,
            segments: None,
            segment_spacing: false,
            thickness: Thickness::default(),
            width: DEFAULT_WIDTH,
            color: "#7571F9".to_string(),
            track_color: "#606060".to_string(),
            buffer_color: "#B7B4FB".to_string(),
            show_label: false,
            label_position: Anchor::TopRight,
            label_formatter: None,
            message: None,
            message_position: Anchor::BottomLeft,
            message_animation: MessageAnimation::default(),
            animation_frame: 0,
            aria_label: None,
            values: ValueTracker::new(value),
            segment_memo: SegmentTracker::new(0),
        }
    }

    /// Registers the value-change callback.
    pub fn on_change(mut self, f: impl FnMut(f64) + Send + 'static) -> Self {
        self.values.on_change = Some(Box::new(f) as ChangeCallback);
        self
    }

    /// Registers the completion callback.
    pub fn on_complete(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.values.on_complete = Some(Box::new(f) as CompleteCallback);
        self
    }

    /// Registers the segment-completion callback.
    pub fn on_segment_complete(mut self, f: impl FnMut(usize) + Send + 'static) -> Self {
        self.segment_memo.on_segment_complete = Some(Box::new(f) as SegmentCallback);
        self
    }

    /// Replaces the default `"NN%"` label.
    pub fn with_label_formatter(mut self, f: impl Fn(f64, f64) -> String + Send + 'static) -> Self {
        self.label_formatter = Some(Box::new(f));
        self
    }

    /// Unique id used to route [`FrameMsg`] values.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Raw value as last set, unclamped.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Maximum value.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Updates the value and fires edge callbacks.
    ///
    /// In order: `on_change` if the value differs from the previous one,
    /// `on_complete` if it crossed up to `max`, then `on_segment_complete`
    /// for each newly filled segment in ascending order. A callback that
    /// panics aborts the rest of the update.
    pub fn set_value(&mut self, value: f64) -> Edges {
        self.value = value;
        let edges = self.values.observe(value, self.max);

        let crossed = match self.segments {
            Some(_) => {
                let index = self.segment_index();
                self.segment_memo.observe(index)
            }
            std::option::Option::None => 0..0,
        };

        if edges.changed {
            debug!(
                id = self.id,
                value,
                max = self.max,
                completed = edges.completed,
                "progress value changed"
            );
        }
        if !crossed.is_empty() {
            debug!(
                id = self.id,
                from = crossed.start,
                to = crossed.end,
                "progress segments completed"
            );
        }

        edges
    }

    /// Adds `delta` to the value.
    pub fn incr_value(&mut self, delta: f64) -> Edges {
        self.set_value(self.value + delta)
    }

    /// Subtracts `delta` from the value.
    pub fn decr_value(&mut self, delta: f64) -> Edges {
        self.set_value(self.value - delta)
    }

    /// Changes the maximum without firing callbacks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] and keeps the old maximum when
    /// `max` is not a finite number above 0.
    pub fn set_max(&mut self, max: f64) -> Result<()> {
        self.max = math::validate_max(max)?;
        let index = self.segment_index();
        self.segment_memo.reset(index);
        Ok(())
    }

    /// Number of segments, if segmented.
    pub fn segments(&self) -> Option<usize> {
        self.segments
    }

    /// Switches segmented rendering on or off.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for `Some(0)`.
    pub fn set_segments(&mut self, segments: Option<usize>) -> Result<()> {
        self.segments = segments.map(validate_segments).transpose()?;
        let index = self.segment_index();
        self.segment_memo.reset(index);
        Ok(())
    }

    /// Sets the buffered level.
    pub fn set_buffer_value(&mut self, buffer: Option<f64>) {
        self.buffer_value = buffer;
    }

    /// Clamped fill percentage, 0 to 100.
    pub fn percentage(&self) -> f64 {
        math::percentage(self.value, self.max).unwrap_or(0.0)
    }

    /// Clamped buffer percentage when the buffer variant has a buffer value.
    pub fn buffer_percentage(&self) -> Option<f64> {
        if self.variant != Variant::Buffer {
            return std::option::Option::None;
        }
        self.buffer_value
            .map(|buffer| math::percentage(buffer, self.max).unwrap_or(0.0))
    }

    /// Filled and partial segments, if segmented.
    pub fn segment_fill(&self) -> Option<SegmentFill> {
        self.segments
            .map(|segments| math::segment_fill(self.percentage(), segments))
    }

    fn segment_index(&self) -> usize {
        self.segment_fill().map(|fill| fill.filled).unwrap_or(0)
    }

    /// Effective thickness in pixels.
    pub fn thickness_px(&self) -> u32 {
        self.thickness.pixels()
    }

    /// Returns `true` for the indeterminate variant, where the host draws
    /// perpetual motion instead of a fixed-length fill.
    pub fn is_indeterminate(&self) -> bool {
        self.variant == Variant::Indeterminate
    }

    /// Label text: the custom formatter's output or the rounded percentage.
    pub fn label_text(&self) -> String {
        match &self.label_formatter {
            Some(formatter) => formatter(self.value, self.max),
            std::option::Option::None => format!("{}%", self.percentage().round() as i64),
        }
    }

    /// The raw message, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Replaces the message and restarts the animation ticker if needed.
    pub fn set_message(&mut self, message: Option<String>) -> Option<Cmd> {
        self.message = message;
        self.animation_frame = 0;
        self.restart_animation()
    }

    /// Message animation kind.
    pub fn message_animation(&self) -> MessageAnimation {
        self.message_animation
    }

    /// Changes the animation kind and restarts the ticker if needed.
    pub fn set_message_animation(&mut self, animation: MessageAnimation) -> Option<Cmd> {
        self.message_animation = animation;
        self.animation_frame = 0;
        self.restart_animation()
    }

    /// Current animation phase, `0..3`.
    pub fn animation_frame(&self) -> usize {
        self.animation_frame
    }

    /// Whether the message ticker should be running.
    pub fn is_animating(&self) -> bool {
        self.message.as_deref().is_some_and(|m| !m.is_empty())
            && self.message_animation != MessageAnimation::None
    }

    /// Message combined with the current animation phase.
    ///
    /// ```rust
    /// use bubbletea_progress::progress::{new, with_message, with_message_animation, MessageAnimation};
    ///
    /// let bar = new(0.0, &[
    ///     with_message("Saving".to_string()),
    ///     with_message_animation(MessageAnimation::Ellipsis),
    /// ]).unwrap();
    /// assert_eq!(bar.message_text().as_deref(), Some("Saving."));
    /// ```
    pub fn message_text(&self) -> Option<String> {
        let message = self.message.as_deref().filter(|m| !m.is_empty())?;
        let phase = self.animation_frame % ANIMATION_PHASES;

        let text = match self.message_animation {
            MessageAnimation::DotsWave => match phase {
                0 => format!("... {} ...", message),
                1 => format!("... ... {} ", message),
                _ => format!(" {} ... ...", message),
            },
            MessageAnimation::DotsPulse | MessageAnimation::Ellipsis => {
                format!("{}{}", message, ".".repeat(phase + 1))
            }
            MessageAnimation::None => message.to_string(),
        };
        Some(text)
    }

    /// Starts the message ticker when a message is animated.
    ///
    /// Each call supersedes the ticker started by an earlier one.
    pub fn init(&mut self) -> Option<Cmd> {
        self.tag += 1;
        if self.is_animating() {
            Some(self.next_frame())
        } else {
            std::option::Option::None
        }
    }

    /// Handles [`FrameMsg`] values addressed to this bar.
    ///
    /// Frames from another bar, from a superseded ticker, or arriving after
    /// the message stopped animating are dropped, which ends that ticker.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(frame) = msg.downcast_ref::<FrameMsg>() {
            if frame.id != self.id || frame.tag != self.tag || !self.is_animating() {
                return std::option::Option::None;
            }

            self.animation_frame = (self.animation_frame + 1) % ANIMATION_PHASES;
            return Some(self.next_frame());
        }

        std::option::Option::None
    }

    fn next_frame(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(ANIMATION_INTERVAL, move |_| Box::new(FrameMsg { id, tag }) as Msg)
    }

    fn restart_animation(&mut self) -> Option<Cmd> {
        let cmd = self.init();
        debug!(
            id = self.id,
            tag = self.tag,
            running = cmd.is_some(),
            "progress message ticker restarted"
        );
        cmd
    }

    /// Renders the bar with its label and message.
    pub fn view(&self) -> String {
        let cells = self.cells();
        let rows = self.thickness.cells();
        let across = match self.orientation {
            Orientation::Horizontal => cells.len(),
            Orientation::Vertical => rows * 2,
        };

        let label = self.show_label.then(|| self.label_text());
        let message = self.message_text();

        let mut lines = Vec::new();
        let mut over = Vec::new();
        let mut below = Vec::new();
        for (text, anchor) in [(label, self.label_position), (message, self.message_position)] {
            let Some(text) = text else { continue };
            match anchor.slot() {
                Slot::Above => lines.push(paint::align(&text, across, anchor.align())),
                Slot::Over => over.push(text),
                Slot::Below => below.push(paint::align(&text, across, anchor.align())),
            }
        }
        let over = (!over.is_empty()).then(|| over.join(" "));

        match self.orientation {
            Orientation::Horizontal => {
                for row in 0..rows {
                    match &over {
                        Some(text) if row == rows / 2 => lines.push(self.paint_over(&cells, text)),
                        _ => lines.push(self.paint(&cells)),
                    }
                }
            }
            Orientation::Vertical => {
                let length = cells.len();
                for row in 0..length {
                    let tone = cells[length - 1 - row];
                    let mut line = self.paint(&vec![tone; across]);
                    if let Some(text) = &over {
                        if row == length / 2 {
                            line.push(' ');
                            line.push_str(text);
                        }
                    }
                    lines.push(line);
                }
            }
        }

        lines.extend(below);
        lines.join("\n")
    }

    fn cells(&self) -> Vec<Tone> {
        let length = self.width.min(MAX_LENGTH);
        if self.is_indeterminate() {
            return vec![Tone::Track; length];
        }
        if let Some(segments) = self.segments {
            return self.segment_cells(length, segments);
        }

        let filled = cells_for(self.percentage(), length);
        let buffered = self
            .buffer_percentage()
            .map(|buffer| cells_for(buffer, length))
            .unwrap_or(0)
            .max(filled);

        (0..length)
            .map(|i| {
                if i < filled {
                    Tone::Fill
                } else if i < buffered {
                    Tone::Buffer
                } else {
                    Tone::Track
                }
            })
            .collect()
    }

    fn segment_cells(&self, length: usize, segments: usize) -> Vec<Tone> {
        let fill = math::segment_fill(self.percentage(), segments);
        let gaps = if self.segment_spacing {
            segments.saturating_sub(1)
        } else {
            0
        };
        let available = length.saturating_sub(gaps);
        let base = available / segments;
        let extra = available % segments;

        let mut cells = Vec::with_capacity(length);
        for i in 0..segments {
            if cells.len() >= length {
                break;
            }
            if i > 0 && self.segment_spacing {
                cells.push(Tone::Gap);
            }
            let segment_width = base + usize::from(i < extra);
            let lit = ((segment_width as f64) * fill.ratio(i)).round() as usize;
            cells.extend((0..segment_width).map(|c| if c < lit { Tone::Fill } else { Tone::Track }));
        }
        cells.truncate(length);
        cells
    }

    fn paint(&self, cells: &[Tone]) -> String {
        paint::runs(cells, &|tone, run| self.paint_run(tone, run))
    }

    fn paint_over(&self, cells: &[Tone], text: &str) -> String {
        paint::overlay(cells, text, &|tone, run| self.paint_run(tone, run))
    }

    fn paint_run(&self, tone: Tone, run: usize) -> String {
        let glyphs = tone.glyph().to_string().repeat(run);
        match tone {
            Tone::Fill => paint::colored(&glyphs, &self.color),
            Tone::Buffer => paint::colored(&glyphs, &self.buffer_color),
            Tone::Track => paint::colored(&glyphs, &self.track_color),
            Tone::Gap => glyphs,
        }
    }
}

fn cells_for(percentage: f64, length: usize) -> usize {
    (((length as f64) * percentage / 100.0).round() as usize).min(length)
}

impl Semantic for Model {
    fn semantics(&self) -> Semantics {
        Semantics {
            role: Role::ProgressBar,
            value_now: self.value,
            value_min: 0.0,
            value_max: self.max,
            label: self
                .aria_label
                .clone()
                .unwrap_or_else(|| DEFAULT_ARIA_LABEL.to_string()),
            value_text: self.show_label.then(|| self.label_text()),
        }
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, std::option::Option<Cmd>) {
        (Model::default(), std::option::Option::None)
    }

    fn update(&mut self, msg: Msg) -> std::option::Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::with_value(0.0)
    }
}
