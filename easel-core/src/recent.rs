//! Recently used colors, one list per color role.
//!
//! Entries keep the text they were committed with; matching is case-insensitive.
//! A color that is already present is never duplicated and keeps its position.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::hex_eq;

pub const DEFAULT_RECENT_CAPACITY: usize = 5;

/// Which color a control feeds: the fill used by the Fill button, or the brush stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorRole {
    Fill,
    Stroke,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentSwatch {
    pub color: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentColors {
    entries: Vec<RecentSwatch>,
    capacity: usize,
}

impl Default for RecentColors {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_RECENT_CAPACITY)
    }
}

impl RecentColors {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Record a committed color. Appends it (evicting the oldest entry when full)
    /// unless a case-insensitive match already exists, then marks the matching
    /// entry as the only selected one. Returns true if a new entry was created.
    pub fn commit(&mut self, color: &str) -> bool {
        let exists = self.position(color).is_some();

        if !exists {
            if self.entries.len() >= self.capacity {
                let evicted = self.entries.remove(0);
                debug!(evicted = %evicted.color, "recent colors full, dropping oldest");
            }
            self.entries.push(RecentSwatch {
                color: color.to_string(),
                selected: false,
            });
        }

        for entry in self.entries.iter_mut() {
            entry.selected = hex_eq(&entry.color, color);
        }

        !exists
    }

    /// Mark the entry at `index` as selected and unmark the rest. This is the
    /// swatch-click path; unlike `commit` it selects by position, not by value.
    /// Returns the color at that index, or None when out of range.
    pub fn select_at(&mut self, index: usize) -> Option<&str> {
        if index >= self.entries.len() {
            return None;
        }

        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.selected = i == index;
        }

        Some(self.entries[index].color.as_str())
    }

    /// Unmark every entry (e.g. when the eraser is chosen).
    pub fn clear_selection(&mut self) {
        for entry in self.entries.iter_mut() {
            entry.selected = false;
        }
    }

    pub fn position(&self, color: &str) -> Option<usize> {
        self.entries.iter().position(|e| hex_eq(&e.color, color))
    }

    pub fn selected(&self) -> Option<&RecentSwatch> {
        self.entries.iter().find(|e| e.selected)
    }

    pub fn entries(&self) -> &[RecentSwatch] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
