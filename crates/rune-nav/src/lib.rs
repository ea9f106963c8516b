//! Single-region page navigation for Rune.
//!
//! This crate resolves a navigation key (tag, page type or flat index) to a
//! page instance, decides whether that instance is reused or recreated, swaps
//! it into the one visible host region and keeps track of direction and
//! history.
//!
//! # Architecture
//!
//! ```text
//! NavigationManager
//!   ├── NavigationRegistry  (primary + footer items, lookups)
//!   ├── PageCache           (tag → page instance, per-item policy)
//!   ├── NavigationState     (current/previous index, history)
//!   └── EventQueue          (Navigated / NavigatedForward / NavigatedBackward)
//!
//! Collaborators (traits)
//!   ContentFactory, PageService, SourceLoader, NavigationHost, TransitionPlayer
//! ```
//!
//! Everything here runs on the UI thread. Pages are shared through `Rc` and
//! nothing is `Send`.

pub mod cache;
pub mod error;
pub mod events;
pub mod host;
pub mod manager;
pub mod page;
pub mod registry;
pub mod state;
pub mod transition;

pub use cache::{CacheEntry, PageCache};
pub use error::{NavigationError, Result};
pub use events::{EventQueue, NavigatedArgs, NavigationEvent};
pub use host::{ContentFactory, NavigationHost, PageService, PageTypeRegistry, SlotHost, SourceLoader};
pub use manager::{ExternalTarget, NavigationKey, NavigationManager};
pub use page::{
    AsAny, DataContext, DataContextHandle, NavigationAware, Page, PageHandle, PageInstance, PageType,
};
pub use registry::{ItemGroup, NavigationItem, NavigationRegistry, PageTarget, RegistryChange};
pub use state::{Direction, HistoryEntry, NavigationState, classify_direction};
pub use transition::{TransitionKind, TransitionPlayer, TransitionRequest};
