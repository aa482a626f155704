//! Widgets built from grid cell data.
//!
//! Grid hosts describe cells as JSON objects. A cell whose marker names a
//! registered widget is turned into a live [`CellWidget`] from the remaining
//! keys; unknown markers yield `None` so the host can draw the cell itself.
//! Keys are camelCase and unknown keys are ignored, so whole rows can be
//! passed through unchanged.
//!
//! ```rust
//! use bubbletea_progress::cell::{build_cell, default_registry, CellWidget};
//! use serde_json::json;
//!
//! let registry = default_registry();
//! let row = json!({
//!     "id": 5,
//!     "name": "Upload Progress",
//!     "value": 45,
//!     "variant": "buffer",
//!     "bufferValue": 70,
//!     "showLabel": true,
//! });
//!
//! match build_cell(&registry, "__PROGRESS__", &row).unwrap() {
//!     Some(CellWidget::Progress(bar)) => assert_eq!(bar.buffer_percentage(), Some(70.0)),
//!     _ => unreachable!(),
//! }
//! assert!(build_cell(&registry, "__PHOTO__", &row).unwrap().is_none());
//! ```

use crate::circular;
use crate::countdown::{self, UnitLabels};
use crate::error::Result;
use crate::progress::{self, Anchor, MessageAnimation, Orientation, Thickness};
use crate::registry::Registry;
use crate::{Semantic, Semantics};
use bubbletea_rs::{Cmd, Msg};
use serde::Deserialize;
use serde_json::Value;
use tracing::trace;

/// Marker for the linear progress bar.
pub const PROGRESS_MARKER: &str = "__PROGRESS__";
/// Marker for the circular progress ring.
pub const CIRCULAR_MARKER: &str = "__CIRCULAR__";
/// Marker for the countdown.
pub const COUNTDOWN_MARKER: &str = "__COUNTDOWN__";

/// A widget living in a grid cell.
#[derive(Debug)]
pub enum CellWidget {
    /// A linear progress bar.
    Progress(progress::Model),
    /// A circular progress ring.
    Circular(circular::Model),
    /// A countdown.
    Countdown(countdown::Model),
}

impl CellWidget {
    /// Starts the widget's tickers, if it has any.
    pub fn init(&mut self) -> Option<Cmd> {
        match self {
            CellWidget::Progress(m) => m.init(),
            CellWidget::Circular(m) => m.init(),
            CellWidget::Countdown(m) => m.init(),
        }
    }

    /// Forwards a message to the widget.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        match self {
            CellWidget::Progress(m) => m.update(msg),
            CellWidget::Circular(m) => m.update(msg),
            CellWidget::Countdown(m) => m.update(msg),
        }
    }

    /// Renders the widget.
    pub fn view(&self) -> String {
        match self {
            CellWidget::Progress(m) => m.view(),
            CellWidget::Circular(m) => m.view(),
            CellWidget::Countdown(m) => m.view(),
        }
    }
}

impl Semantic for CellWidget {
    fn semantics(&self) -> Semantics {
        match self {
            CellWidget::Progress(m) => m.semantics(),
            CellWidget::Circular(m) => m.semantics(),
            CellWidget::Countdown(m) => m.semantics(),
        }
    }
}

/// Builds a widget from a cell's JSON props.
pub type CellFactory = fn(&Value) -> Result<CellWidget>;

/// A registry with the three built-in markers registered.
pub fn default_registry() -> Registry<CellFactory> {
    let mut registry: Registry<CellFactory> = Registry::new();
    registry.register(PROGRESS_MARKER, progress_cell as CellFactory);
    registry.register(CIRCULAR_MARKER, circular_cell as CellFactory);
    registry.register(COUNTDOWN_MARKER, countdown_cell as CellFactory);
    registry
}

/// Builds the widget registered under `marker` from `props`.
///
/// Returns `Ok(None)` when nothing is registered under `marker`.
///
/// # Errors
///
/// Returns [`crate::Error::Props`] when `props` does not match the widget's
/// shape, or the widget's own configuration error.
pub fn build_cell(
    registry: &Registry<CellFactory>,
    marker: &str,
    props: &Value,
) -> Result<Option<CellWidget>> {
    match registry.get(marker) {
        Some(factory) => factory(props).map(Some),
        None => {
            trace!(marker, "no widget registered for cell marker");
            Ok(None)
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum NamedThickness {
    Thin,
    Normal,
    Thick,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum ThicknessProp {
    Named(NamedThickness),
    Pixels(u32),
}

impl From<ThicknessProp> for Thickness {
    fn from(prop: ThicknessProp) -> Self {
        match prop {
            ThicknessProp::Named(NamedThickness::Thin) => Thickness::Thin,
            ThicknessProp::Named(NamedThickness::Normal) => Thickness::Normal,
            ThicknessProp::Named(NamedThickness::Thick) => Thickness::Thick,
            ThicknessProp::Pixels(px) => Thickness::Pixels(px),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgressProps {
    value: f64,
    #[serde(default)]
    max: Option<f64>,
    #[serde(default)]
    orientation: Option<Orientation>,
    #[serde(default)]
    variant: Option<progress::Variant>,
    #[serde(default)]
    buffer_value: Option<f64>,
    #[serde(default)]
    segments: Option<usize>,
    #[serde(default)]
    segment_spacing: Option<bool>,
    #[serde(default)]
    thickness: Option<ThicknessProp>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    track_color: Option<String>,
    #[serde(default)]
    buffer_color: Option<String>,
    #[serde(default)]
    show_label: Option<bool>,
    #[serde(default)]
    label_position: Option<Anchor>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    message_position: Option<Anchor>,
    #[serde(default)]
    message_animation: Option<MessageAnimation>,
    #[serde(default)]
    aria_label: Option<String>,
    #[serde(default)]
    width: Option<usize>,
}

fn progress_cell(props: &Value) -> Result<CellWidget> {
    let p = ProgressProps::deserialize(props)?;
    let opts: Vec<progress::ProgressOption> = [
        p.max.map(progress::with_max),
        p.orientation.map(progress::with_orientation),
        p.variant.map(progress::with_variant),
        p.buffer_value.map(progress::with_buffer_value),
        p.segments.map(progress::with_segments),
        p.segment_spacing.map(progress::with_segment_spacing),
        p.thickness.map(|t| progress::with_thickness(t.into())),
        p.color.map(progress::with_color),
        p.track_color.map(progress::with_track_color),
        p.buffer_color.map(progress::with_buffer_color),
        p.show_label.map(progress::with_label),
        p.label_position.map(progress::with_label_position),
        p.message.map(progress::with_message),
        p.message_position.map(progress::with_message_position),
        p.message_animation.map(progress::with_message_animation),
        p.aria_label.map(progress::with_aria_label),
        p.width.map(progress::with_width),
    ]
    .into_iter()
    .flatten()
    .collect();
    Ok(CellWidget::Progress(progress::new(p.value, &opts)?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CircularProps {
    value: f64,
    #[serde(default)]
    max: Option<f64>,
    #[serde(default)]
    size: Option<f64>,
    #[serde(default)]
    stroke_width: Option<f64>,
    #[serde(default)]
    direction: Option<circular::Direction>,
    #[serde(default)]
    variant: Option<circular::Variant>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    track_color: Option<String>,
    #[serde(default)]
    show_label: Option<bool>,
    #[serde(default)]
    center_content: Option<String>,
    #[serde(default)]
    aria_label: Option<String>,
}

fn circular_cell(props: &Value) -> Result<CellWidget> {
    let p = CircularProps::deserialize(props)?;
    let opts: Vec<circular::CircularOption> = [
        p.max.map(circular::with_max),
        p.size.map(circular::with_size),
        p.stroke_width.map(circular::with_stroke_width),
        p.direction.map(circular::with_direction),
        p.variant.map(circular::with_variant),
        p.color.map(circular::with_color),
        p.track_color.map(circular::with_track_color),
        p.show_label.map(circular::with_label),
        p.center_content.map(circular::with_center_content),
        p.aria_label.map(circular::with_aria_label),
    ]
    .into_iter()
    .flatten()
    .collect();
    Ok(CellWidget::Circular(circular::new(p.value, &opts)?))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum TargetProp {
    EpochMillis(i64),
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CountdownProps {
    target_date: TargetProp,
    #[serde(default)]
    format: Option<String>,
    #[serde(default)]
    auto_start: Option<bool>,
    #[serde(default)]
    show_labels: Option<bool>,
    #[serde(default)]
    labels: Option<UnitLabels>,
    #[serde(default)]
    aria_label: Option<String>,
}

fn countdown_cell(props: &Value) -> Result<CellWidget> {
    let p = CountdownProps::deserialize(props)?;
    let opts: Vec<countdown::CountdownOption> = [
        p.format.as_deref().map(countdown::with_format),
        p.auto_start.map(countdown::with_auto_start),
        p.show_labels.map(countdown::with_show_labels),
        p.labels.map(countdown::with_labels),
        p.aria_label.map(countdown::with_aria_label),
    ]
    .into_iter()
    .flatten()
    .collect();
    let model = match p.target_date {
        TargetProp::EpochMillis(ms) => countdown::new(ms, &opts),
        TargetProp::Text(text) => countdown::new(text, &opts),
    };
    Ok(CellWidget::Countdown(model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;
    use serde_json::json;

    fn grid() -> Vec<Value> {
        vec![
            json!({ "id": 1, "name": "Task Progress", "imageUrl": "__PROGRESS__", "value": 75, "showLabel": true }),
            json!({ "id": 2, "name": "Circular Status", "imageUrl": "__CIRCULAR__", "value": 60, "size": 80, "showLabel": true, "color": "#10b981" }),
            json!({ "id": 3, "name": "Deadline", "imageUrl": "__COUNTDOWN__", "targetDate": "2025-12-31T23:59:59", "showLabels": true }),
            json!({ "id": 4, "name": "Loading State", "imageUrl": "__PROGRESS__", "value": 0, "variant": "indeterminate" }),
            json!({ "id": 5, "name": "Upload Progress", "imageUrl": "__PROGRESS__", "value": 45, "variant": "buffer", "bufferValue": 70, "showLabel": true }),
        ]
    }

    fn build(row: &Value) -> CellWidget {
        let registry = default_registry();
        let marker = row["imageUrl"].as_str().unwrap();
        build_cell(&registry, marker, row).unwrap().unwrap()
    }

    #[test]
    fn test_default_registry_markers() {
        let registry = default_registry();
        assert_eq!(
            registry.markers(),
            vec![PROGRESS_MARKER, CIRCULAR_MARKER, COUNTDOWN_MARKER]
        );
    }

    #[test]
    fn test_grid_rows_build_matching_widgets() {
        let cells: Vec<CellWidget> = grid().iter().map(build).collect();

        match &cells[0] {
            CellWidget::Progress(bar) => {
                assert_eq!(bar.value(), 75.0);
                assert!(bar.show_label);
            }
            other => panic!("unexpected {:?}", other),
        }
        match &cells[1] {
            CellWidget::Circular(ring) => {
                assert_eq!(ring.size(), 80.0);
                assert_eq!(ring.color, "#10b981");
                assert_eq!(ring.center_text().as_deref(), Some("60%"));
            }
            other => panic!("unexpected {:?}", other),
        }
        match &cells[2] {
            CellWidget::Countdown(countdown) => assert!(countdown.target().is_some()),
            other => panic!("unexpected {:?}", other),
        }
        match &cells[3] {
            CellWidget::Progress(bar) => assert!(bar.is_indeterminate()),
            other => panic!("unexpected {:?}", other),
        }
        match &cells[4] {
            CellWidget::Progress(bar) => assert_eq!(bar.buffer_percentage(), Some(70.0)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_cell_view_and_semantics() {
        let mut cells: Vec<CellWidget> = grid().iter().map(build).collect();
        assert!(cells[0].view().contains("75%"));
        assert_eq!(cells[0].semantics().role, Role::ProgressBar);
        assert_eq!(cells[2].semantics().role, Role::Timer);
        assert!(cells[1].init().is_none());
    }

    #[test]
    fn test_unknown_marker_falls_back() {
        let registry = default_registry();
        let row = json!({ "name": "Photo" });
        assert!(build_cell(&registry, "__PHOTO__", &row).unwrap().is_none());
    }

    #[test]
    fn test_bad_props_are_errors() {
        let registry = default_registry();

        let err = build_cell(&registry, PROGRESS_MARKER, &json!({ "value": "lots" })).unwrap_err();
        assert!(matches!(err, crate::Error::Props(_)));

        let err = build_cell(&registry, PROGRESS_MARKER, &json!({ "value": 5, "max": 0 })).unwrap_err();
        assert!(err.is_invalid_configuration());

        let err = build_cell(&registry, COUNTDOWN_MARKER, &json!({ "showLabels": true })).unwrap_err();
        assert!(matches!(err, crate::Error::Props(_)));

        for marker in [PROGRESS_MARKER, CIRCULAR_MARKER] {
            let err = build_cell(&registry, marker, &json!({})).unwrap_err();
            assert!(matches!(err, crate::Error::Props(_)), "{} without value", marker);
        }
        let err = build_cell(&registry, PROGRESS_MARKER, &json!({ "showLabel": true })).unwrap_err();
        assert!(matches!(err, crate::Error::Props(_)));
    }

    #[test]
    fn test_thickness_and_target_forms() {
        let bar = match build(&json!({ "imageUrl": "__PROGRESS__", "value": 10, "thickness": "thick" })) {
            CellWidget::Progress(bar) => bar,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(bar.thickness_px(), 60);

        let bar = match build(&json!({ "imageUrl": "__PROGRESS__", "value": 10, "thickness": 25 })) {
            CellWidget::Progress(bar) => bar,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(bar.thickness_px(), 25);

        let countdown = match build(&json!({ "imageUrl": "__COUNTDOWN__", "targetDate": 1_000 })) {
            CellWidget::Countdown(countdown) => countdown,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(countdown.target().map(|t| t.timestamp_millis()), Some(1_000));
        assert!(countdown.remaining().is_zero());
    }

    #[test]
    fn test_custom_registration() {
        fn always_ring(_: &Value) -> Result<CellWidget> {
            Ok(CellWidget::Circular(circular::Model::default()))
        }

        let mut registry = default_registry();
        registry.register("__GAUGE__", always_ring as CellFactory);
        let cell = build_cell(&registry, "__GAUGE__", &json!({})).unwrap();
        assert!(matches!(cell, Some(CellWidget::Circular(_))));
    }
}
