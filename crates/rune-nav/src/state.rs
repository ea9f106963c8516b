//! Navigation state: current/previous index, current item and history.
//!
//! Direction is a numeric comparison of flat indices, not a back stack.
//! Moving to a lower index is `Backward` even if that item was never visited,
//! and re-navigating to the same index is `Backward` because the comparison
//! is strict. [`classify_direction`] is the only place that rule lives.

use crate::registry::NavigationItem;

/// Index both current and previous start at.
pub const INITIAL_INDEX: usize = 0;

/// Classification of a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

/// `Forward` iff `next > previous`.
pub fn classify_direction(previous: usize, next: usize) -> Direction {
    if next > previous {
        Direction::Forward
    } else {
        Direction::Backward
    }
}

/// One visited destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEntry {
    /// A registered item, by tag.
    Tag(String),
    /// Externally navigated content (page title, type name or URL).
    External(String),
}

impl HistoryEntry {
    pub fn label(&self) -> &str {
        match self {
            Self::Tag(tag) | Self::External(tag) => tag,
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, Self::External(_))
    }
}

/// Logical navigation state, owned and written by the manager.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationState {
    current: Option<NavigationItem>,
    current_index: usize,
    previous_index: usize,
    history: Vec<HistoryEntry>,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            current: None,
            current_index: INITIAL_INDEX,
            previous_index: INITIAL_INDEX,
            history: Vec::new(),
        }
    }
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registered item currently displayed. `None` before the first
    /// navigation, after a flush, and while external content is shown.
    pub fn current(&self) -> Option<&NavigationItem> {
        self.current.as_ref()
    }

    pub fn current_tag(&self) -> Option<&str> {
        self.current.as_ref().map(NavigationItem::tag)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn previous_index(&self) -> usize {
        self.previous_index
    }

    /// Every visited destination in order. Never popped.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Record a navigation to `index` and classify it.
    pub fn advance(
        &mut self,
        index: usize,
        entry: HistoryEntry,
        item: Option<NavigationItem>,
    ) -> Direction {
        self.previous_index = self.current_index;
        self.current_index = index;
        self.current = item;
        self.history.push(entry);
        classify_direction(self.previous_index, self.current_index)
    }

    /// Index for externally navigated content: above every registered index
    /// (`registered_len`) and above the current index, so it is always
    /// classified `Forward`.
    pub fn next_external_index(&self, registered_len: usize) -> usize {
        self.current_index.saturating_add(1).max(registered_len)
    }

    /// Forget the current item without touching indices or history. Used
    /// when the current item is unregistered.
    pub fn clear_current(&mut self) {
        self.current = None;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
