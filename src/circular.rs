//! Circular progress component for Bubble Tea applications.
//!
//! Draws a ring whose stroke length follows the clamped percentage, with an
//! optional label or custom content in the center. The value contract is the
//! same as the linear bar: `on_change` on every distinct value and
//! `on_complete` once per upward crossing of `max`.
//!
//! ```rust
//! use bubbletea_progress::circular::{new, with_label, with_size};
//!
//! let ring = new(60.0, &[with_size(80.0), with_label(true)]).unwrap();
//! assert_eq!(ring.geometry().radius, 36.0);
//! assert_eq!(ring.center_text().as_deref(), Some("60%"));
//! println!("{}", ring.view());
//! ```

use crate::edge::{ChangeCallback, CompleteCallback, Edges, ValueTracker};
use crate::error::Result;
use crate::math::{self, RingGeometry};
use crate::paint;
use crate::progress::LabelFormatter;
use crate::{Role, Semantic, Semantics};
use bubbletea_rs::{Cmd, Model as BubbleTeaModel, Msg};
use serde::Deserialize;
use std::f64::consts::{PI, TAU};
use std::fmt;
use tracing::debug;

const DEFAULT_MAX: f64 = 100.0;
const DEFAULT_SIZE: f64 = 100.0;
const DEFAULT_STROKE_WIDTH: f64 = 8.0;
const PIXELS_PER_ROW: f64 = 10.0;
const MIN_ROWS: usize = 3;
const MAX_ROWS: usize = 64;
const START_ROTATION_DEG: f64 = -90.0;
const DEFAULT_ARIA_LABEL: &str = "Circular progress indicator";

const ARC: char = '●';
const TRACK: char = '·';

/// Which way the stroke grows from the top of the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Grows to the right.
    #[default]
    Clockwise,
    /// Grows to the left.
    CounterClockwise,
}

/// Whether the ring shows a known percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Stroke length follows the percentage.
    #[default]
    Determinate,
    /// No dash offset or start rotation; the host spins the ring.
    Indeterminate,
}

/// Start transform applied to a determinate stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingTransform {
    /// Rotation of the stroke origin in degrees (-90 puts it at the top).
    pub rotate_deg: f64,
    /// Whether the stroke is mirrored to run counter-clockwise.
    pub mirrored: bool,
}

/// Configuration options for [`new`].
#[derive(Debug, Clone)]
pub enum CircularOption {
    /// Sets the maximum value.
    WithMax(f64),
    /// Sets the box size in pixels.
    WithSize(f64),
    /// Sets the stroke width in pixels.
    WithStrokeWidth(f64),
    /// Sets the growth direction.
    WithDirection(Direction),
    /// Sets the variant.
    WithVariant(Variant),
    /// Sets the stroke color.
    WithColor(String),
    /// Sets the track color.
    WithTrackColor(String),
    /// Shows or hides the center label.
    WithLabel(bool),
    /// Sets custom center content, shown instead of the label.
    WithCenterContent(String),
    /// Overrides the accessible name.
    WithAriaLabel(String),
}

impl CircularOption {
    fn apply(&self, m: &mut Model) -> Result<()> {
        match self {
            CircularOption::WithMax(max) => m.max = math::validate_max(*max)?,
            CircularOption::WithSize(size) => m.size = *size,
            CircularOption::WithStrokeWidth(width) => m.stroke_width = *width,
            CircularOption::WithDirection(direction) => m.direction = *direction,
            CircularOption::WithVariant(variant) => m.variant = *variant,
            CircularOption::WithColor(color) => m.color = color.clone(),
            CircularOption::WithTrackColor(color) => m.track_color = color.clone(),
            CircularOption::WithLabel(show) => m.show_label = *show,
            CircularOption::WithCenterContent(content) => m.center_content = Some(content.clone()),
            CircularOption::WithAriaLabel(label) => m.aria_label = Some(label.clone()),
        }
        Ok(())
    }
}

/// Sets the maximum value (default 100).
pub fn with_max(max: f64) -> CircularOption {
    CircularOption::WithMax(max)
}

/// Sets the box size in pixels (default 100).
pub fn with_size(size: f64) -> CircularOption {
    CircularOption::WithSize(size)
}

/// Sets the stroke width in pixels (default 8).
pub fn with_stroke_width(width: f64) -> CircularOption {
    CircularOption::WithStrokeWidth(width)
}

/// Sets the growth direction (default clockwise).
pub fn with_direction(direction: Direction) -> CircularOption {
    CircularOption::WithDirection(direction)
}

/// Sets the variant.
pub fn with_variant(variant: Variant) -> CircularOption {
    CircularOption::WithVariant(variant)
}

/// Sets the stroke color.
pub fn with_color(color: String) -> CircularOption {
    CircularOption::WithColor(color)
}

/// Sets the track color.
pub fn with_track_color(color: String) -> CircularOption {
    CircularOption::WithTrackColor(color)
}

/// Shows or hides the center label.
pub fn with_label(show: bool) -> CircularOption {
    CircularOption::WithLabel(show)
}

/// Sets custom center content.
pub fn with_center_content(content: String) -> CircularOption {
    CircularOption::WithCenterContent(content)
}

/// Overrides the accessible name.
pub fn with_aria_label(label: String) -> CircularOption {
    CircularOption::WithAriaLabel(label)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Arc,
    Track,
    Blank,
}

/// A circular progress ring.
pub struct Model {
    value: f64,
    max: f64,
    size: f64,
    stroke_width: f64,
    geometry: RingGeometry,

    /// Growth direction.
    pub direction: Direction,
    /// Variant.
    pub variant: Variant,
    /// Stroke color.
    pub color: String,
    /// Track color.
    pub track_color: String,
    /// Whether the default label is shown.
    pub show_label: bool,
    label_formatter: Option<LabelFormatter>,
    center_content: Option<String>,
    aria_label: Option<String>,

    values: ValueTracker,
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("value", &self.value)
            .field("max", &self.max)
            .field("size", &self.size)
            .field("stroke_width", &self.stroke_width)
            .field("direction", &self.direction)
            .field("variant", &self.variant)
            .field("values", &self.values)
            .finish_non_exhaustive()
    }
}

/// Creates a ring at `value` with the given options applied in order.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidConfiguration`] for an invalid `max` or a
/// stroke wider than the ring's box.
pub fn new(value: f64, opts: &[CircularOption]) -> Result<Model> {
    let mut m = Model::with_value(value);
    for opt in opts {
        opt.apply(&mut m)?;
    }
    m.geometry = math::ring_geometry(m.size, m.stroke_width)?;
    Ok(m)
}

impl Model {
    fn with_value(value: f64) -> Self {
        let radius = (DEFAULT_SIZE - DEFAULT_STROKE_WIDTH) / 2.0;
        Self {
            value,
            max: DEFAULT_MAX,
            size: DEFAULT_SIZE,
            stroke_width: DEFAULT_STROKE_WIDTH,
            geometry: RingGeometry {
                radius,
                circumference: 2.0 * PI * radius,
            },
            direction: Direction::default(),
            variant: Variant::default(),
            color: "#7571F9".to_string(),
            track_color: "#606060".to_string(),
            show_label: false,
            label_formatter: None,
            center_content: None,
            aria_label: None,
            values: ValueTracker::new(value),
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

    /// Replaces the default `"NN%"` label.
    pub fn with_label_formatter(mut self, f: impl Fn(f64, f64) -> String + Send + 'static) -> Self {
        self.label_formatter = Some(Box::new(f));
        self
    }

    /// Raw value as last set.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Maximum value.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Updates the value, firing `on_change` then `on_complete` as needed.
    pub fn set_value(&mut self, value: f64) -> Edges {
        self.value = value;
        let edges = self.values.observe(value, self.max);
        if edges.changed {
            debug!(
                value,
                max = self.max,
                completed = edges.completed,
                "circular progress value changed"
            );
        }
        edges
    }

    /// Changes the maximum without firing callbacks.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] and keeps the old maximum
    /// when `max` is not a finite number above 0.
    pub fn set_max(&mut self, max: f64) -> Result<()> {
        self.max = math::validate_max(max)?;
        Ok(())
    }

    /// Changes the box size and stroke width together.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] and keeps the old
    /// geometry when the stroke does not fit.
    pub fn set_size(&mut self, size: f64, stroke_width: f64) -> Result<()> {
        self.geometry = math::ring_geometry(size, stroke_width)?;
        self.size = size;
        self.stroke_width = stroke_width;
        Ok(())
    }

    /// Box size in pixels.
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Stroke width in pixels.
    pub fn stroke_width(&self) -> f64 {
        self.stroke_width
    }

    /// Clamped percentage, 0 to 100.
    pub fn percentage(&self) -> f64 {
        math::percentage(self.value, self.max).unwrap_or(0.0)
    }

    /// Radius and circumference of the ring.
    pub fn geometry(&self) -> RingGeometry {
        self.geometry
    }

    /// Dash array for the stroke, absent when indeterminate.
    pub fn dash_array(&self) -> Option<f64> {
        match self.variant {
            Variant::Determinate => Some(self.geometry.circumference),
            Variant::Indeterminate => None,
        }
    }

    /// Dash offset for the stroke, absent when indeterminate.
    pub fn stroke_offset(&self) -> Option<f64> {
        match self.variant {
            Variant::Determinate => Some(math::stroke_offset(
                self.percentage(),
                self.geometry.circumference,
            )),
            Variant::Indeterminate => None,
        }
    }

    /// Start transform of the stroke, absent when indeterminate.
    pub fn rotation(&self) -> Option<RingTransform> {
        match self.variant {
            Variant::Determinate => Some(RingTransform {
                rotate_deg: START_ROTATION_DEG,
                mirrored: self.direction == Direction::CounterClockwise,
            }),
            Variant::Indeterminate => None,
        }
    }

    /// Default label text.
    pub fn label_text(&self) -> String {
        match &self.label_formatter {
            Some(formatter) => formatter(self.value, self.max),
            None => format!("{}%", self.percentage().round() as i64),
        }
    }

    /// Replaces the custom center content.
    pub fn set_center_content(&mut self, content: Option<String>) {
        self.center_content = content;
    }

    /// Text drawn in the center: custom content first, then the label if shown.
    pub fn center_text(&self) -> Option<String> {
        if let Some(content) = self.center_content.as_deref().filter(|c| !c.is_empty()) {
            return Some(content.to_string());
        }
        self.show_label.then(|| self.label_text())
    }

    /// The ring has no tickers; present for symmetry with the other widgets.
    pub fn init(&self) -> Option<Cmd> {
        None
    }

    /// The ring reacts to no messages.
    pub fn update(&mut self, _msg: Msg) -> Option<Cmd> {
        None
    }

    /// Renders the ring on a character grid, two columns per row for a
    /// roughly round shape in a terminal.
    pub fn view(&self) -> String {
        let rows = ((self.size / PIXELS_PER_ROW).round() as usize).clamp(MIN_ROWS, MAX_ROWS);
        let cols = rows * 2;
        let outer = rows as f64 / 2.0;
        let band = (self.stroke_width / self.size * rows as f64).max(1.0);
        let filled = match self.variant {
            Variant::Determinate => self.percentage() / 100.0,
            Variant::Indeterminate => 0.0,
        };

        let grid: Vec<Vec<Tone>> = (0..rows)
            .map(|row| {
                (0..cols)
                    .map(|col| {
                        let x = (col as f64 + 0.5) / 2.0 - outer;
                        let y = row as f64 + 0.5 - outer;
                        let distance = x.hypot(y);
                        if distance > outer || distance < outer - band - 0.5 {
                            return Tone::Blank;
                        }
                        if self.sweep(x, y) < filled {
                            Tone::Arc
                        } else {
                            Tone::Track
                        }
                    })
                    .collect()
            })
            .collect();

        let paint_run = |tone: Tone, run: usize| match tone {
            Tone::Arc => paint::colored(&ARC.to_string().repeat(run), &self.color),
            Tone::Track => paint::colored(&TRACK.to_string().repeat(run), &self.track_color),
            Tone::Blank => " ".repeat(run),
        };

        let center = self.center_text();
        grid.iter()
            .enumerate()
            .map(|(row, cells)| match &center {
                Some(text) if row == rows / 2 => paint::overlay(cells, text, &paint_run),
                _ => paint::runs(cells, &paint_run),
            })
            .map(|line| line.trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Fraction of a full turn from the top of the ring to `(x, y)`, in the
    /// ring's growth direction.
    fn sweep(&self, x: f64, y: f64) -> f64 {
        let angle = x.atan2(-y).rem_euclid(TAU);
        let turn = angle / TAU;
        match self.direction {
            Direction::Clockwise => turn,
            Direction::CounterClockwise if turn == 0.0 => 0.0,
            Direction::CounterClockwise => 1.0 - turn,
        }
    }
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
    fn init() -> (Self, Option<Cmd>) {
        (Model::default(), None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use lipgloss_extras::lipgloss;
    use std::sync::{Arc, Mutex};

    fn visible(view: &str) -> String {
        lipgloss::strip_ansi(view).to_string()
    }

    fn count(view: &str, glyph: char) -> usize {
        visible(view).chars().filter(|&c| c == glyph).count()
    }

    #[test]
    fn test_defaults() {
        let ring = new(0.0, &[]).unwrap();
        assert_eq!(ring.size(), 100.0);
        assert_eq!(ring.stroke_width(), 8.0);
        assert_eq!(ring.direction, Direction::Clockwise);
        assert_eq!(ring.variant, Variant::Determinate);
        assert_eq!(ring.geometry(), math::ring_geometry(100.0, 8.0).unwrap());
        assert_eq!(Model::default().geometry(), ring.geometry());
    }

    #[test]
    fn test_stroke_offset_follows_percentage() {
        let ring = new(25.0, &[]).unwrap();
        let c = ring.geometry().circumference;
        assert_eq!(ring.dash_array(), Some(c));
        assert!((ring.stroke_offset().unwrap() - 0.75 * c).abs() < 1e-9);

        let full = new(150.0, &[]).unwrap();
        assert_eq!(full.stroke_offset(), Some(0.0));

        let empty = new(-5.0, &[]).unwrap();
        assert_eq!(empty.stroke_offset(), Some(c));
    }

    #[test]
    fn test_indeterminate_drops_dash_and_rotation() {
        let ring = new(40.0, &[with_variant(Variant::Indeterminate)]).unwrap();
        assert!(ring.dash_array().is_none());
        assert!(ring.stroke_offset().is_none());
        assert!(ring.rotation().is_none());
    }

    #[test]
    fn test_direction_only_changes_transform() {
        let cw = new(30.0, &[]).unwrap();
        let ccw = new(30.0, &[with_direction(Direction::CounterClockwise)]).unwrap();
        assert_eq!(cw.stroke_offset(), ccw.stroke_offset());
        assert_eq!(cw.rotation().unwrap().rotate_deg, -90.0);
        assert!(!cw.rotation().unwrap().mirrored);
        assert!(ccw.rotation().unwrap().mirrored);
    }

    #[test]
    fn test_invalid_geometry_and_max() {
        assert!(new(0.0, &[with_stroke_width(120.0)])
            .unwrap_err()
            .is_invalid_configuration());
        assert!(new(0.0, &[with_max(0.0)]).is_err());

        let mut ring = new(0.0, &[]).unwrap();
        assert!(ring.set_size(10.0, 20.0).is_err());
        assert_eq!(ring.size(), 100.0);
        assert!(ring.set_size(60.0, 4.0).is_ok());
        assert_eq!(ring.geometry().radius, 28.0);
    }

    #[test]
    fn test_value_edges() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let change_log = Arc::clone(&log);
        let complete_log = Arc::clone(&log);
        let mut ring = new(50.0, &[])
            .unwrap()
            .on_change(move |v| change_log.lock().unwrap().push(format!("change {}", v)))
            .on_complete(move || complete_log.lock().unwrap().push("complete".to_string()));

        ring.set_value(100.0);
        ring.set_value(100.0);
        ring.set_value(50.0);
        ring.set_value(100.0);

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "change 100",
                "complete",
                "change 50",
                "change 100",
                "complete"
            ]
        );
    }

    #[test]
    fn test_center_content_overrides_label() {
        let ring = new(42.0, &[]).unwrap();
        assert!(ring.center_text().is_none());

        let ring = new(42.0, &[with_label(true)]).unwrap();
        assert_eq!(ring.center_text().as_deref(), Some("42%"));

        let mut ring = new(42.0, &[with_label(true), with_center_content("CPU".to_string())]).unwrap();
        assert_eq!(ring.center_text().as_deref(), Some("CPU"));
        ring.set_center_content(None);
        assert_eq!(ring.center_text().as_deref(), Some("42%"));
        ring.set_center_content(Some(String::new()));
        assert_eq!(ring.center_text().as_deref(), Some("42%"));

        let ring = new(3.0, &[with_max(4.0), with_label(true)])
            .unwrap()
            .with_label_formatter(|v, m| format!("{} of {}", v, m));
        assert_eq!(ring.center_text().as_deref(), Some("3 of 4"));
    }

    #[test]
    fn test_view_fills_with_percentage() {
        let empty = new(0.0, &[]).unwrap();
        let half = new(50.0, &[]).unwrap();
        let full = new(100.0, &[]).unwrap();

        let ring_cells = count(&full.view(), ARC);
        assert!(ring_cells > 0);
        assert_eq!(count(&empty.view(), ARC), 0);
        assert_eq!(count(&empty.view(), TRACK), ring_cells);

        let half_arc = count(&half.view(), ARC);
        assert!(half_arc > 0 && half_arc < ring_cells);
        assert_eq!(half_arc + count(&half.view(), TRACK), ring_cells);
    }

    #[test]
    fn test_view_direction_mirrors_arc() {
        let cw = visible(&new(25.0, &[]).unwrap().view());
        let ccw = visible(
            &new(25.0, &[with_direction(Direction::CounterClockwise)])
                .unwrap()
                .view(),
        );
        let top_cw: &str = cw.lines().next().unwrap();
        let top_ccw: &str = ccw.lines().next().unwrap();

        let first_arc = |line: &str| line.chars().position(|c| c == ARC);
        let first_track = |line: &str| line.chars().position(|c| c == TRACK);
        // clockwise starts right of the top center, counter-clockwise left of it
        assert!(first_arc(top_cw) > first_track(top_cw));
        assert!(first_arc(top_ccw) < first_track(top_ccw));
    }

    #[test]
    fn test_view_shows_center_text() {
        let ring = new(64.0, &[with_label(true)]).unwrap();
        let view = visible(&ring.view());
        let rows: Vec<&str> = view.lines().collect();
        assert_eq!(rows.len(), 10);
        assert!(rows[5].contains("64%"));
    }

    #[test]
    fn test_view_size_is_capped() {
        let ring = new(50.0, &[with_size(1e7)]).unwrap();
        let view = visible(&ring.view());
        assert_eq!(view.lines().count(), MAX_ROWS);
        assert!(view.lines().all(|line| line.chars().count() <= MAX_ROWS * 2));
    }

    #[test]
    fn test_semantics() {
        let ring = new(120.0, &[with_aria_label("Disk".to_string())]).unwrap();
        let facts = ring.semantics();
        assert_eq!(facts.role, Role::ProgressBar);
        assert_eq!(facts.value_now, 120.0);
        assert_eq!(facts.value_max, 100.0);
        assert_eq!(facts.label, "Disk");
        assert_eq!(new(0.0, &[]).unwrap().semantics().label, DEFAULT_ARIA_LABEL);
    }
}
