//! Marker to component lookup for grid hosts.
//!
//! A grid host that finds a marker string such as `__PROGRESS__` in a cell
//! asks the registry for the component to draw there. The registry is a plain
//! owned value: create one, register components, and pass it to whatever
//! renders the grid.
//!
//! ```rust
//! use bubbletea_progress::Registry;
//!
//! let mut registry: Registry<&str> = Registry::new();
//! registry.register("__GAUGE__", "gauge");
//! registry.register("__CLOCK__", "clock");
//!
//! assert_eq!(registry.get("__GAUGE__"), Some(&"gauge"));
//! assert_eq!(registry.markers(), vec!["__GAUGE__", "__CLOCK__"]);
//! ```

use tracing::debug;

/// Ordered map from marker strings to components.
///
/// Markers keep their first registration position, so [`Registry::markers`]
/// lists them in insertion order even after a component is replaced.
#[derive(Debug, Clone)]
pub struct Registry<C> {
    entries: Vec<(String, C)>,
}

impl<C> Default for Registry<C> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<C> Registry<C> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `component` under `marker`, replacing any previous one.
    pub fn register(&mut self, marker: impl Into<String>, component: C) {
        let marker = marker.into();
        match self.position(&marker) {
            Some(index) => {
                debug!(marker = %marker, "replacing registered component");
                self.entries[index].1 = component;
            }
            None => {
                debug!(marker = %marker, "registering component");
                self.entries.push((marker, component));
            }
        }
    }

    /// Removes the component under `marker`, returning it if present.
    pub fn unregister(&mut self, marker: &str) -> Option<C> {
        let index = self.position(marker)?;
        debug!(marker, "unregistering component");
        Some(self.entries.remove(index).1)
    }

    /// Looks up the component under `marker`.
    pub fn get(&self, marker: &str) -> Option<&C> {
        self.position(marker).map(|index| &self.entries[index].1)
    }

    /// Returns `true` if `marker` is registered.
    pub fn has(&self, marker: &str) -> bool {
        self.position(marker).is_some()
    }

    /// Registered markers in insertion order.
    pub fn markers(&self) -> Vec<&str> {
        self.entries.iter().map(|(marker, _)| marker.as_str()).collect()
    }

    /// Removes every component.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of registered markers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, marker: &str) -> Option<usize> {
        self.entries.iter().position(|(m, _)| m == marker)
    }
}
