//! Transition requests handed to the playback collaborator.
//!
//! The manager only asks for a transition; it never waits for one. Each
//! request carries the navigation generation it belongs to, so a player can
//! tell when a newer navigation has superseded the animation it is running.

use std::cell::RefCell;
use std::rc::Rc;

pub use rune_config::TransitionKind;

/// A single fire-and-forget transition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRequest {
    pub kind: TransitionKind,
    pub duration_ms: u32,
    /// Generation of the navigation that issued this request.
    pub generation: u64,
}

impl TransitionRequest {
    /// Returns true if `other` was issued by a later navigation.
    pub fn is_superseded_by(&self, other: &TransitionRequest) -> bool {
        other.generation > self.generation
    }
}

/// Plays visual transitions. Results are ignored by the manager.
pub trait TransitionPlayer {
    fn play(&mut self, request: &TransitionRequest);
}

impl<P: TransitionPlayer> TransitionPlayer for Rc<RefCell<P>> {
    fn play(&mut self, request: &TransitionRequest) {
        self.borrow_mut().play(request);
    }
}
