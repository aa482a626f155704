//! Countdown component for Bubble Tea applications.
//!
//! Counts down towards a target instant, ticking once a second while it is
//! running. Every tick recomputes the remaining time against a [`Clock`], so a
//! paused countdown that resumes later jumps straight to the current wall
//! clock instead of continuing from where it stopped.
//!
//! # Basic Usage
//!
//! ```rust
//! use bubbletea_progress::countdown::{new, with_show_labels};
//! use chrono::{Duration, Utc};
//!
//! let target = Utc::now() + Duration::minutes(5);
//! let countdown = new(target, &[with_show_labels(true)])
//!     .on_tick(|left| println!("{}s to go", left.total / 1000))
//!     .on_complete(|| println!("done"));
//!
//! assert!(countdown.is_running());
//! ```
//!
//! # bubbletea-rs Integration
//!
//! ```rust
//! use bubbletea_rs::{Cmd, Model as BubbleTeaModel, Msg};
//! use bubbletea_progress::countdown::{new, Model};
//! use chrono::{Duration, Utc};
//!
//! struct Launch {
//!     countdown: Model,
//! }
//!
//! impl BubbleTeaModel for Launch {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let mut countdown = new(Utc::now() + Duration::seconds(10), &[]);
//!         let cmd = countdown.init();
//!         (Self { countdown }, cmd)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         self.countdown.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         format!("T-minus {}", self.countdown.view())
//!     }
//! }
//! ```
//!
//! # Custom rendering
//!
//! A [`Renderer`] replaces the default view. Any
//! `Fn(&RenderState) -> String` closure is a renderer, and the
//! [`Controls`] it receives build pause, resume and reset commands for key
//! bindings.
//!
//! ```rust
//! use bubbletea_progress::countdown::{new, RenderState};
//! use chrono::{Duration, Utc};
//!
//! let countdown = new(Utc::now() + Duration::hours(2), &[]).with_renderer(
//!     |state: &RenderState| {
//!         if state.is_complete {
//!             "Liftoff!".to_string()
//!         } else {
//!             format!("{}h left", state.remaining.hours + 24 * state.remaining.days)
//!         }
//!     },
//! );
//! assert!(countdown.view().ends_with("h left"));
//! ```

use crate::time::{self, Clock, SystemClock, TargetDate, TimeRemaining};
use crate::{Role, Semantic, Semantics};
use bubbletea_rs::{tick as bubbletea_tick, Cmd, Model as BubbleTeaModel, Msg};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};

const TICK_INTERVAL: Duration = Duration::from_millis(1000);
const DEFAULT_FORMAT: &str = "DHms";
const DEFAULT_ARIA_LABEL: &str = "Countdown timer";

// Internal ID management for countdown instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Callback invoked with the freshly computed remaining time on every tick.
pub type TickCallback = Box<dyn FnMut(TimeRemaining) + Send>;

/// Message sent once a second while a countdown is running.
#[derive(Debug, Clone)]
pub struct TickMsg {
    /// Id of the countdown this tick belongs to.
    pub id: i64,
    tag: i64,
}

/// What a [`ControlMsg`] asks the countdown to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop ticking.
    Pause,
    /// Start ticking again.
    Resume,
    /// Go back to the initial state.
    Reset,
}

/// Message produced by the commands built from [`Controls`].
#[derive(Debug, Clone)]
pub struct ControlMsg {
    /// Id of the countdown to control.
    pub id: i64,
    /// Requested action.
    pub action: Action,
}

/// Builds commands that pause, resume or reset one countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    id: i64,
}

impl Controls {
    /// Command that pauses the countdown.
    pub fn pause(&self) -> Cmd {
        self.send(Action::Pause)
    }

    /// Command that resumes the countdown.
    pub fn resume(&self) -> Cmd {
        self.send(Action::Resume)
    }

    /// Command that resets the countdown.
    pub fn reset(&self) -> Cmd {
        self.send(Action::Reset)
    }

    fn send(&self, action: Action) -> Cmd {
        let id = self.id;
        bubbletea_tick(Duration::from_nanos(1), move |_| {
            Box::new(ControlMsg { id, action }) as Msg
        })
    }
}

/// Everything a [`Renderer`] gets to draw a countdown.
#[derive(Debug, Clone)]
pub struct RenderState {
    /// Remaining time as of the last tick.
    pub remaining: TimeRemaining,
    /// Whether the countdown is paused.
    pub is_paused: bool,
    /// Whether the countdown reached zero.
    pub is_complete: bool,
    /// Command builders for this countdown.
    pub controls: Controls,
}

/// Draws a countdown in place of the default view.
pub trait Renderer: Send {
    /// Renders the countdown.
    fn render(&self, state: &RenderState) -> String;
}

impl<F> Renderer for F
where
    F: Fn(&RenderState) -> String + Send,
{
    fn render(&self, state: &RenderState) -> String {
        self(state)
    }
}

/// Unit suffixes used by the default view when labels are shown.
///
/// Missing or empty fields fall back to `d`, `h`, `m` and `s`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UnitLabels {
    /// Suffix after the days value.
    pub days: String,
    /// Suffix after the hours value.
    pub hours: String,
    /// Suffix after the minutes value.
    pub minutes: String,
    /// Suffix after the seconds value.
    pub seconds: String,
}

impl Default for UnitLabels {
    fn default() -> Self {
        Self {
            days: "d".to_string(),
            hours: "h".to_string(),
            minutes: "m".to_string(),
            seconds: "s".to_string(),
        }
    }
}

impl UnitLabels {
    /// Replaces empty suffixes with the defaults.
    fn or_defaults(&self) -> Self {
        let defaults = UnitLabels::default();
        let pick = |label: &str, fallback: String| {
            if label.is_empty() {
                fallback
            } else {
                label.to_string()
            }
        };
        Self {
            days: pick(&self.days, defaults.days),
            hours: pick(&self.hours, defaults.hours),
            minutes: pick(&self.minutes, defaults.minutes),
            seconds: pick(&self.seconds, defaults.seconds),
        }
    }
}

/// Configuration options for [`new`].
#[derive(Debug, Clone)]
pub enum CountdownOption {
    /// Sets which units the default view shows.
    WithFormat(String),
    /// Starts running immediately or waits for a resume.
    WithAutoStart(bool),
    /// Shows unit suffixes in the default view.
    WithShowLabels(bool),
    /// Replaces the unit suffixes.
    WithLabels(UnitLabels),
    /// Replaces the clock used to measure remaining time.
    WithClock(Arc<dyn Clock>),
    /// Overrides the accessible name.
    WithAriaLabel(String),
}

impl CountdownOption {
    fn apply(&self, m: &mut Model) {
        match self {
            CountdownOption::WithFormat(format) => m.format = format.clone(),
            CountdownOption::WithAutoStart(auto_start) => m.auto_start = *auto_start,
            CountdownOption::WithShowLabels(show) => m.show_labels = *show,
            CountdownOption::WithLabels(labels) => m.labels = labels.or_defaults(),
            CountdownOption::WithClock(clock) => m.clock = Arc::clone(clock),
            CountdownOption::WithAriaLabel(label) => m.aria_label = Some(label.clone()),
        }
    }
}

/// Sets the unit format: `D` days, `H` hours, `M`/`m` minutes, `S`/`s`
/// seconds (default `"DHms"`).
pub fn with_format(format: &str) -> CountdownOption {
    CountdownOption::WithFormat(format.to_string())
}

/// Sets whether the countdown starts running (default true).
pub fn with_auto_start(auto_start: bool) -> CountdownOption {
    CountdownOption::WithAutoStart(auto_start)
}

/// Shows unit suffixes in the default view.
pub fn with_show_labels(show: bool) -> CountdownOption {
    CountdownOption::WithShowLabels(show)
}

/// Replaces the unit suffixes.
pub fn with_labels(labels: UnitLabels) -> CountdownOption {
    CountdownOption::WithLabels(labels)
}

/// Replaces the clock.
pub fn with_clock(clock: Arc<dyn Clock>) -> CountdownOption {
    CountdownOption::WithClock(clock)
}

/// Overrides the accessible name.
pub fn with_aria_label(label: String) -> CountdownOption {
    CountdownOption::WithAriaLabel(label)
}

/// A countdown timer.
pub struct Model {
    id: i64,
    tag: i64,

    target: Option<DateTime<Utc>>,
    clock: Arc<dyn Clock>,
    remaining: TimeRemaining,
    initial_total: u64,
    is_paused: bool,
    is_complete: bool,

    auto_start: bool,
    format: String,
    show_labels: bool,
    labels: UnitLabels,
    aria_label: Option<String>,

    on_tick: Option<TickCallback>,
    on_complete: Option<Box<dyn FnMut() + Send>>,
    renderer: Option<Box<dyn Renderer>>,
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("id", &self.id)
            .field("tag", &self.tag)
            .field("target", &self.target)
            .field("remaining", &self.remaining)
            .field("is_paused", &self.is_paused)
            .field("is_complete", &self.is_complete)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

/// Creates a countdown towards `target`.
///
/// An unresolvable target is not an error: it is logged and treated as
/// already reached, so the countdown completes on its first tick.
pub fn new(target: impl Into<TargetDate>, opts: &[CountdownOption]) -> Model {
    let target = match target.into().resolve() {
        Ok(at) => Some(at),
        Err(err) => {
            warn!(error = %err, "countdown target rejected, treating as reached");
            None
        }
    };

    let mut m = Model {
        id: next_id(),
        tag: 0,
        target,
        clock: Arc::new(SystemClock),
        remaining: TimeRemaining::default(),
        initial_total: 0,
        is_paused: false,
        is_complete: false,
        auto_start: true,
        format: DEFAULT_FORMAT.to_string(),
        show_labels: false,
        labels: UnitLabels::default(),
        aria_label: None,
        on_tick: None,
        on_complete: None,
        renderer: None,
    };
    for opt in opts {
        opt.apply(&mut m);
    }
    m.remaining = m.measure();
    m.initial_total = m.remaining.total;
    m.is_paused = !m.auto_start;
    m
}

impl Model {
    /// Registers the per-tick callback.
    pub fn on_tick(mut self, f: impl FnMut(TimeRemaining) + Send + 'static) -> Self {
        self.on_tick = Some(Box::new(f));
        self
    }

    /// Registers the completion callback, invoked once after the final tick.
    pub fn on_complete(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    /// Replaces the default view.
    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// Unique id used to route [`TickMsg`] and [`ControlMsg`] values.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The resolved target, absent when it could not be parsed.
    pub fn target(&self) -> Option<DateTime<Utc>> {
        self.target
    }

    /// Remaining time as of the last tick.
    pub fn remaining(&self) -> TimeRemaining {
        self.remaining
    }

    /// Whether the countdown is paused.
    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    /// Whether the countdown reached zero.
    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    /// Whether ticks are being accepted.
    pub fn is_running(&self) -> bool {
        !self.is_paused && !self.is_complete
    }

    /// Command builders for this countdown.
    pub fn controls(&self) -> Controls {
        Controls { id: self.id }
    }

    /// Stops ticking. Does nothing once complete or already paused.
    pub fn pause(&mut self) {
        if !self.is_running() {
            return;
        }
        self.is_paused = true;
        self.tag += 1;
        debug!(id = self.id, "countdown paused");
    }

    /// Starts ticking again. Does nothing once complete or when not paused.
    pub fn resume(&mut self) -> Option<Cmd> {
        if self.is_complete || !self.is_paused {
            return None;
        }
        self.is_paused = false;
        self.tag += 1;
        debug!(id = self.id, "countdown resumed");
        Some(self.tick())
    }

    /// Recomputes against the original target, clears completion and restores
    /// the initial pause state.
    pub fn reset(&mut self) -> Option<Cmd> {
        self.remaining = self.measure();
        self.initial_total = self.remaining.total;
        self.is_complete = false;
        self.is_paused = !self.auto_start;
        self.tag += 1;
        debug!(id = self.id, total = self.remaining.total, "countdown reset");
        if self.is_paused {
            None
        } else {
            Some(self.tick())
        }
    }

    /// Starts the ticker when the countdown is running.
    ///
    /// Each call supersedes the ticker started by an earlier one.
    pub fn init(&mut self) -> Option<Cmd> {
        self.tag += 1;
        if self.is_running() {
            Some(self.tick())
        } else {
            None
        }
    }

    /// Handles [`TickMsg`] and [`ControlMsg`] values addressed to this
    /// countdown.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(control) = msg.downcast_ref::<ControlMsg>() {
            if control.id != self.id {
                return None;
            }
            return match control.action {
                Action::Pause => {
                    self.pause();
                    None
                }
                Action::Resume => self.resume(),
                Action::Reset => self.reset(),
            };
        }

        if let Some(tick) = msg.downcast_ref::<TickMsg>() {
            if tick.id != self.id || tick.tag != self.tag || !self.is_running() {
                return None;
            }

            self.remaining = self.measure();
            trace!(id = self.id, total = self.remaining.total, "countdown tick");
            if let Some(on_tick) = self.on_tick.as_mut() {
                on_tick(self.remaining);
            }

            if self.remaining.is_zero() {
                self.is_complete = true;
                self.tag += 1;
                debug!(id = self.id, "countdown complete");
                if let Some(on_complete) = self.on_complete.as_mut() {
                    on_complete();
                }
                return None;
            }
            return Some(self.tick());
        }

        None
    }

    /// Renders through the custom renderer, or the default unit display.
    pub fn view(&self) -> String {
        match &self.renderer {
            Some(renderer) => renderer.render(&self.render_state()),
            None => self.default_view(),
        }
    }

    /// Snapshot handed to a [`Renderer`].
    pub fn render_state(&self) -> RenderState {
        RenderState {
            remaining: self.remaining,
            is_paused: self.is_paused,
            is_complete: self.is_complete,
            controls: self.controls(),
        }
    }

    /// Shows the units named by the format, each padded to two digits.
    ///
    /// Units are joined with `:`, or with spaces when suffixes are shown.
    fn default_view(&self) -> String {
        let r = &self.remaining;
        let has = |units: &[char]| self.format.chars().any(|c| units.contains(&c));
        let units = [
            (has(&['D']), r.days, &self.labels.days),
            (has(&['H']), r.hours, &self.labels.hours),
            (has(&['M', 'm']), r.minutes, &self.labels.minutes),
            (has(&['S', 's']), r.seconds, &self.labels.seconds),
        ];

        let parts: Vec<String> = units
            .iter()
            .filter(|(shown, _, _)| *shown)
            .map(|(_, value, label)| {
                if self.show_labels {
                    format!("{:02}{}", value, label)
                } else {
                    format!("{:02}", value)
                }
            })
            .collect();
        parts.join(if self.show_labels { " " } else { ":" })
    }

    fn measure(&self) -> TimeRemaining {
        match self.target {
            Some(target) => time::remaining(target, self.clock.now()),
            None => TimeRemaining::default(),
        }
    }

    fn tick(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(TICK_INTERVAL, move |_| Box::new(TickMsg { id, tag }) as Msg)
    }
}

impl Semantic for Model {
    /// Values are in seconds; `value_max` is the remaining time at creation
    /// or the last reset.
    fn semantics(&self) -> Semantics {
        Semantics {
            role: Role::Timer,
            value_now: (self.remaining.total / 1000) as f64,
            value_min: 0.0,
            value_max: (self.initial_total / 1000) as f64,
            label: self
                .aria_label
                .clone()
                .unwrap_or_else(|| DEFAULT_ARIA_LABEL.to_string()),
            value_text: Some(self.default_view()),
        }
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, std::option::Option<Cmd>) {
        let mut model = Model::default();
        let cmd = model.init();
        (model, cmd)
    }

    fn update(&mut self, msg: Msg) -> std::option::Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}

impl Default for Model {
    /// A one minute countdown on the system clock.
    fn default() -> Self {
        new(Utc::now() + chrono::Duration::seconds(60), &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::ManualClock;
    use chrono::TimeZone;
    use std::sync::Mutex;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap()
    }

    fn countdown(secs: i64, opts: &[CountdownOption]) -> (Model, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start()));
        let mut all = vec![with_clock(clock.clone() as Arc<dyn Clock>)];
        all.extend_from_slice(opts);
        let m = new(start() + chrono::Duration::seconds(secs), &all);
        (m, clock)
    }

    fn tick_msg(m: &Model) -> Msg {
        Box::new(TickMsg {
            id: m.id(),
            tag: m.tag,
        })
    }

    #[test]
    fn test_new_computes_remaining() {
        let (mut m, _) = countdown(125, &[]);
        let r = m.remaining();
        assert_eq!(
            (r.days, r.hours, r.minutes, r.seconds, r.total),
            (0, 0, 2, 5, 125_000)
        );
        assert!(m.is_running());
        assert!(m.id() > 0);
        assert!(m.init().is_some());
    }

    #[test]
    fn test_second_init_supersedes_first_ticker() {
        let (mut m, clock) = countdown(10, &[]);
        assert!(m.init().is_some());
        let stale = tick_msg(&m);
        assert!(m.init().is_some());

        clock.advance(Duration::from_secs(1));
        assert!(m.update(stale).is_none());
        assert_eq!(m.remaining().total, 10_000);

        let current = tick_msg(&m);
        assert!(m.update(current).is_some());
        assert_eq!(m.remaining().total, 9_000);
    }

    #[test]
    fn test_unique_ids() {
        let (a, _) = countdown(10, &[]);
        let (b, _) = countdown(10, &[]);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_auto_start_false_starts_paused() {
        let (mut m, clock) = countdown(10, &[with_auto_start(false)]);
        assert!(m.is_paused());
        assert!(m.init().is_none());

        clock.advance(Duration::from_secs(2));
        let msg = tick_msg(&m);
        assert!(m.update(msg).is_none());
        assert_eq!(m.remaining().total, 10_000);
    }

    #[test]
    fn test_ticks_then_completes_once() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let tick_events = Arc::clone(&events);
        let done_events = Arc::clone(&events);
        let (m, clock) = countdown(3, &[]);
        let mut m = m
            .on_tick(move |r| tick_events.lock().unwrap().push(format!("tick {}", r.seconds)))
            .on_complete(move || done_events.lock().unwrap().push("complete".to_string()));

        for _ in 0..3 {
            clock.advance(Duration::from_secs(1));
            let msg = tick_msg(&m);
            m.update(msg);
        }
        assert!(m.is_complete());
        assert!(!m.is_running());

        clock.advance(Duration::from_secs(1));
        let msg = tick_msg(&m);
        assert!(m.update(msg).is_none());

        assert_eq!(
            *events.lock().unwrap(),
            vec!["tick 2", "tick 1", "tick 0", "complete"]
        );
    }

    #[test]
    fn test_tick_returns_next_tick_until_complete() {
        let (mut m, clock) = countdown(2, &[]);
        clock.advance(Duration::from_secs(1));
        let msg = tick_msg(&m);
        assert!(m.update(msg).is_some());
        clock.advance(Duration::from_secs(1));
        let msg = tick_msg(&m);
        assert!(m.update(msg).is_none());
        assert!(m.is_complete());
    }

    #[test]
    fn test_rejects_foreign_and_stale_ticks() {
        let (mut m, clock) = countdown(10, &[]);
        clock.advance(Duration::from_secs(1));

        let foreign = TickMsg {
            id: m.id() + 999,
            tag: m.tag,
        };
        assert!(m.update(Box::new(foreign)).is_none());

        let stale = TickMsg {
            id: m.id(),
            tag: m.tag + 1,
        };
        assert!(m.update(Box::new(stale)).is_none());
        assert_eq!(m.remaining().total, 10_000);
    }

    #[test]
    fn test_pause_stops_ticks_and_resume_uses_wall_clock() {
        let ticks = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&ticks);
        let (m, clock) = countdown(60, &[]);
        let mut m = m.on_tick(move |_| *counter.lock().unwrap() += 1);

        let before_pause = tick_msg(&m);
        m.pause();
        assert!(m.is_paused());
        clock.advance(Duration::from_secs(5));
        assert!(m.update(before_pause).is_none());
        assert_eq!(*ticks.lock().unwrap(), 0);

        assert!(m.resume().is_some());
        assert!(m.resume().is_none());
        let msg = tick_msg(&m);
        m.update(msg);
        assert_eq!(*ticks.lock().unwrap(), 1);
        assert_eq!(m.remaining().total, 55_000);
    }

    #[test]
    fn test_pause_and_resume_noop_when_complete() {
        let (mut m, clock) = countdown(1, &[]);
        clock.advance(Duration::from_secs(1));
        let msg = tick_msg(&m);
        m.update(msg);
        assert!(m.is_complete());

        m.pause();
        assert!(!m.is_paused());
        assert!(m.resume().is_none());
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let (mut m, clock) = countdown(2, &[]);
        clock.advance(Duration::from_secs(2));
        let msg = tick_msg(&m);
        m.update(msg);
        assert!(m.is_complete());

        clock.set(start());
        assert!(m.reset().is_some());
        assert!(!m.is_complete());
        assert!(m.is_running());
        assert_eq!(m.remaining().total, 2_000);

        let (mut paused, _) = countdown(5, &[with_auto_start(false)]);
        assert!(paused.resume().is_some());
        assert!(paused.reset().is_none());
        assert!(paused.is_paused());
    }

    #[test]
    fn test_invalid_target_completes_on_first_tick() {
        let completed = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&completed);
        let mut m = new("not a date", &[]).on_complete(move || *counter.lock().unwrap() += 1);

        assert!(m.target().is_none());
        assert!(m.remaining().is_zero());
        let msg = tick_msg(&m);
        assert!(m.update(msg).is_none());
        assert!(m.is_complete());
        assert_eq!(*completed.lock().unwrap(), 1);
    }

    #[test]
    fn test_control_messages() {
        let (mut m, _) = countdown(30, &[]);
        let pause = ControlMsg {
            id: m.id(),
            action: Action::Pause,
        };
        assert!(m.update(Box::new(pause)).is_none());
        assert!(m.is_paused());

        let foreign = ControlMsg {
            id: m.id() + 1,
            action: Action::Resume,
        };
        assert!(m.update(Box::new(foreign)).is_none());
        assert!(m.is_paused());

        let resume = ControlMsg {
            id: m.id(),
            action: Action::Resume,
        };
        assert!(m.update(Box::new(resume)).is_some());
        assert!(m.is_running());
    }

    #[tokio::test]
    async fn test_controls_command_delivers_message() {
        let (mut m, _) = countdown(30, &[]);
        let cmd = m.controls().pause();
        let msg = cmd.await.expect("control produces a message");
        m.update(msg);
        assert!(m.is_paused());
    }

    #[test]
    fn test_default_view_format() {
        let secs = 2 * 86_400 + 3 * 3_600 + 4 * 60 + 5;
        let (m, _) = countdown(secs, &[]);
        assert_eq!(m.view(), "02:03:04:05");

        let (m, _) = countdown(secs, &[with_format("ms")]);
        assert_eq!(m.view(), "04:05");

        let (m, _) = countdown(secs, &[with_format("HMS"), with_show_labels(true)]);
        assert_eq!(m.view(), "03h 04m 05s");
    }

    #[test]
    fn test_custom_labels() {
        let labels = UnitLabels {
            days: " days".to_string(),
            ..UnitLabels::default()
        };
        let (m, _) = countdown(86_400 + 1, &[with_labels(labels), with_show_labels(true)]);
        assert_eq!(m.view(), "01 days 00h 00m 01s");

        let parsed: UnitLabels = serde_json::from_str(r#"{"hours":"hrs"}"#).unwrap();
        assert_eq!(parsed.hours, "hrs");
        assert_eq!(parsed.days, "d");
    }

    #[test]
    fn test_empty_labels_use_defaults() {
        let labels = UnitLabels {
            days: String::new(),
            seconds: String::new(),
            ..UnitLabels::default()
        };
        let (m, _) = countdown(86_400 + 1, &[with_labels(labels), with_show_labels(true)]);
        assert_eq!(m.view(), "01d 00h 00m 01s");
    }

    #[test]
    fn test_renderer_override() {
        let (m, _) = countdown(90, &[with_auto_start(false)]);
        let m = m.with_renderer(|state: &RenderState| {
            format!(
                "{}m{}s paused={}",
                state.remaining.minutes, state.remaining.seconds, state.is_paused
            )
        });
        assert_eq!(m.view(), "1m30s paused=true");
        assert_eq!(m.render_state().controls, m.controls());
    }

    #[test]
    fn test_semantics() {
        let (m, _) = countdown(90, &[with_aria_label("Sale ends".to_string())]);
        let facts = m.semantics();
        assert_eq!(facts.role, Role::Timer);
        assert_eq!(facts.value_now, 90.0);
        assert_eq!(facts.value_max, 90.0);
        assert_eq!(facts.label, "Sale ends");
        assert_eq!(facts.value_text.as_deref(), Some("00:00:01:30"));

        let (m, _) = countdown(1, &[]);
        assert_eq!(m.semantics().label, DEFAULT_ARIA_LABEL);
    }
}
