//! Navigation events.
//!
//! Every successful navigation queues `Navigated` followed by exactly one of
//! `NavigatedForward` / `NavigatedBackward`. Events are polled from the
//! manager after the call returns:
//!
//! ```ignore
//! manager.navigate("settings", None)?;
//! for event in manager.drain_events() {
//!     if let NavigationEvent::NavigatedBackward(args) = event {
//!         println!("back to {:?}", args.tag);
//!     }
//! }
//! ```

use std::collections::VecDeque;

use crate::page::PageHandle;
use crate::state::Direction;

/// Payload shared by all navigation events.
#[derive(Debug, Clone)]
pub struct NavigatedArgs {
    /// Tag of the resolved item; `None` for external navigation.
    pub tag: Option<String>,
    /// Flat index used for direction classification.
    pub index: usize,
    /// The page now displayed.
    pub page: PageHandle,
}

#[derive(Debug, Clone)]
pub enum NavigationEvent {
    Navigated(NavigatedArgs),
    NavigatedForward(NavigatedArgs),
    NavigatedBackward(NavigatedArgs),
}

impl NavigationEvent {
    pub fn args(&self) -> &NavigatedArgs {
        match self {
            Self::Navigated(args) | Self::NavigatedForward(args) | Self::NavigatedBackward(args) => {
                args
            }
        }
    }

    /// The direction event for `direction`.
    pub fn directional(direction: Direction, args: NavigatedArgs) -> Self {
        match direction {
            Direction::Forward => Self::NavigatedForward(args),
            Direction::Backward => Self::NavigatedBackward(args),
        }
    }

    /// `None` for `Navigated`.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Self::Navigated(_) => None,
            Self::NavigatedForward(_) => Some(Direction::Forward),
            Self::NavigatedBackward(_) => Some(Direction::Backward),
        }
    }

    pub fn tag(&self) -> Option<&str> {
        self.args().tag.as_deref()
    }
}

/// FIFO of pending navigation events.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<NavigationEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: NavigationEvent) {
        self.events.push_back(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn pop(&mut self) -> Option<NavigationEvent> {
        self.events.pop_front()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = NavigationEvent> + '_ {
        self.events.drain(..)
    }

    pub fn peek(&self) -> Option<&NavigationEvent> {
        self.events.front()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
