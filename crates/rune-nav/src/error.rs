//! Error types for the navigation core.
//!
//! Unknown keys and a missing host are not errors: those calls return
//! `Ok(false)`. Everything here is either a programming mistake in how the
//! manager was configured or a page that failed to construct.

use thiserror::Error;

use crate::registry::ItemGroup;

/// Result type for navigation operations.
pub type Result<T> = std::result::Result<T, NavigationError>;

/// Errors that can occur while configuring the manager or navigating.
#[derive(Error, Debug)]
pub enum NavigationError {
    /// A page service was attached while eager precaching is enabled, or the
    /// other way around.
    #[error("a page service cannot be used while precaching is enabled")]
    PrecacheWithPageService,

    /// The attached page service has no mapping for the requested page type.
    #[error("page service has no mapping for page type `{0}`")]
    UnmappedPageType(String),

    /// An item with an external source was navigated to without a loader.
    #[error("no source loader configured for `{0}`")]
    MissingSourceLoader(String),

    /// An item with an external source was handed to the instance cache.
    #[error("item `{0}` is backed by an external source and cannot be cached")]
    NotInstantiable(String),

    /// A tag is already registered in the primary or footer group.
    #[error("navigation tag `{0}` is already registered")]
    DuplicateTag(String),

    /// An insert position is past the end of the group.
    #[error("position {position} is out of range for the {group:?} group (len {len})")]
    InvalidPosition {
        group: ItemGroup,
        position: usize,
        len: usize,
    },

    /// The content factory, page service or source loader failed.
    #[error("failed to instantiate page `{target}`")]
    Instantiation {
        target: String,
        #[source]
        source: anyhow::Error,
    },
}

impl NavigationError {
    /// Returns true for errors caused by configuring the manager incorrectly,
    /// as opposed to a page failing to construct.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::Instantiation { .. })
    }
}
