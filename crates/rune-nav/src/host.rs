//! Collaborator traits the manager delegates to.
//!
//! - `ContentFactory`: builds a page for a registered page type
//! - `PageService`: optional external provider that replaces the cache
//! - `SourceLoader`: builds a page from an external source URL
//! - `NavigationHost`: the single region that shows one page at a time

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::anyhow;
use url::Url;

use crate::page::{Page, PageHandle, PageType};

/// Produces page instances for registered page types.
pub trait ContentFactory {
    fn create(&self, page_type: &PageType) -> anyhow::Result<Box<dyn Page>>;
}

impl<F> ContentFactory for F
where
    F: Fn(&PageType) -> anyhow::Result<Box<dyn Page>>,
{
    fn create(&self, page_type: &PageType) -> anyhow::Result<Box<dyn Page>> {
        self(page_type)
    }
}

type Constructor = Box<dyn Fn() -> anyhow::Result<Box<dyn Page>>>;

/// Content factory backed by a map of page type to constructor.
#[derive(Default)]
pub struct PageTypeRegistry {
    constructors: HashMap<PageType, Constructor>,
}

impl PageTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page type built with `Default`.
    pub fn register<T: Page + Default + 'static>(&mut self) -> &mut Self {
        self.constructors.insert(
            PageType::of::<T>(),
            Box::new(|| -> anyhow::Result<Box<dyn Page>> { Ok(Box::new(T::default())) }),
        );
        self
    }

    /// Register a page type with a custom, possibly failing constructor.
    pub fn register_with<T, F>(&mut self, constructor: F) -> &mut Self
    where
        T: Page + 'static,
        F: Fn() -> anyhow::Result<T> + 'static,
    {
        self.constructors.insert(
            PageType::of::<T>(),
            Box::new(move || -> anyhow::Result<Box<dyn Page>> {
                Ok(Box::new(constructor()?))
            }),
        );
        self
    }

    pub fn contains(&self, page_type: &PageType) -> bool {
        self.constructors.contains_key(page_type)
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl ContentFactory for PageTypeRegistry {
    fn create(&self, page_type: &PageType) -> anyhow::Result<Box<dyn Page>> {
        let constructor = self
            .constructors
            .get(page_type)
            .ok_or_else(|| anyhow!("no constructor registered for {}", page_type.name()))?;
        constructor()
    }
}

/// External provider of page instances (e.g. a dependency container).
///
/// Returning `Ok(None)` means the service has no mapping for the type.
/// The manager never caches what a service returns; a service that wants
/// singletons hands out the same handle itself.
pub trait PageService {
    fn resolve(&self, page_type: &PageType) -> anyhow::Result<Option<PageHandle>>;
}

/// Builds pages for items and external targets that point at a URL.
pub trait SourceLoader {
    fn load(&self, source: &Url) -> anyhow::Result<Box<dyn Page>>;
}

impl<F> SourceLoader for F
where
    F: Fn(&Url) -> anyhow::Result<Box<dyn Page>>,
{
    fn load(&self, source: &Url) -> anyhow::Result<Box<dyn Page>> {
        self(source)
    }
}

/// The single display region.
pub trait NavigationHost {
    /// Replace the visible content.
    fn display(&mut self, page: PageHandle);

    /// The content currently shown, if any.
    fn current_content(&self) -> Option<PageHandle>;
}

impl<H: NavigationHost> NavigationHost for Rc<RefCell<H>> {
    fn display(&mut self, page: PageHandle) {
        self.borrow_mut().display(page);
    }

    fn current_content(&self) -> Option<PageHandle> {
        self.borrow().current_content()
    }
}

/// In-memory host that keeps the displayed page and a display counter.
#[derive(Debug, Default)]
pub struct SlotHost {
    current: Option<PageHandle>,
    display_count: usize,
}

impl SlotHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `display` has been called.
    pub fn display_count(&self) -> usize {
        self.display_count
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

impl NavigationHost for SlotHost {
    fn display(&mut self, page: PageHandle) {
        self.current = Some(page);
        self.display_count += 1;
    }

    fn current_content(&self) -> Option<PageHandle> {
        self.current.clone()
    }
}
