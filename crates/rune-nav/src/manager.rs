//! Navigation manager: the public entry point.
//!
//! The manager resolves keys through the registry, obtains an instance from
//! the page service, source loader or cache, runs lifecycle hooks, hands the
//! page to the host, updates state and queues events.
//!
//! # Ordering
//!
//! For a successful navigation:
//! 1. instantiate (the only fallible step; nothing is mutated before it)
//! 2. `on_navigated_from` on the page currently in the host
//! 3. bind the data context, if one was supplied
//! 4. `on_navigated_to` on the incoming page
//! 5. host `display`, then a fire-and-forget transition request
//! 6. state advance and active flags
//! 7. `Navigated`, then `NavigatedForward` or `NavigatedBackward`
//!
//! Logical state is updated before the call returns, never deferred to the
//! end of a transition, so back-to-back navigations always leave the state of
//! the most recent one.
//!
//! # Usage
//!
//! ```ignore
//! let mut pages = PageTypeRegistry::new();
//! pages.register::<HomePage>().register::<SettingsPage>();
//!
//! let mut manager = NavigationManager::new(pages);
//! manager.set_host(SlotHost::new());
//! manager.add_item(ItemGroup::Primary, NavigationItem::page::<HomePage>("home"))?;
//! manager.navigate("home", None)?;
//! ```

use tracing::{debug, warn};
use url::Url;

use crate::cache::PageCache;
use crate::error::{NavigationError, Result};
use crate::events::{EventQueue, NavigatedArgs, NavigationEvent};
use crate::host::{ContentFactory, NavigationHost, PageService, SourceLoader};
use crate::page::{DataContextHandle, Page, PageHandle, PageInstance, PageType};
use crate::registry::{ItemGroup, NavigationItem, NavigationRegistry, PageTarget, RegistryChange};
use crate::state::{HistoryEntry, NavigationState};
use crate::transition::{TransitionKind, TransitionPlayer, TransitionRequest};
use rune_config::NavigationConfig;

/// How a destination is looked up.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationKey {
    Tag(String),
    Type(PageType),
    /// Flat index across primary then footer.
    Index(usize),
}

impl From<&str> for NavigationKey {
    fn from(tag: &str) -> Self {
        Self::Tag(tag.to_string())
    }
}

impl From<String> for NavigationKey {
    fn from(tag: String) -> Self {
        Self::Tag(tag)
    }
}

impl From<usize> for NavigationKey {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<PageType> for NavigationKey {
    fn from(page_type: PageType) -> Self {
        Self::Type(page_type)
    }
}

/// Content navigated to without going through the registry.
pub enum ExternalTarget {
    Page(Box<dyn Page>),
    Source(Url),
}

impl ExternalTarget {
    pub fn page<P: Page + 'static>(page: P) -> Self {
        Self::Page(Box::new(page))
    }
}

/// Single-region navigation manager.
pub struct NavigationManager {
    registry: NavigationRegistry,
    cache: PageCache,
    state: NavigationState,
    events: EventQueue,
    factory: Box<dyn ContentFactory>,
    page_service: Option<Box<dyn PageService>>,
    source_loader: Option<Box<dyn SourceLoader>>,
    host: Option<Box<dyn NavigationHost>>,
    transition_player: Option<Box<dyn TransitionPlayer>>,
    transition: TransitionKind,
    transition_duration_ms: u32,
    precache: bool,
    generation: u64,
}

impl NavigationManager {
    /// Create a manager with default navigation settings.
    pub fn new(factory: impl ContentFactory + 'static) -> Self {
        Self::from_config(&NavigationConfig::default(), factory)
    }

    /// Create a manager from the `[navigation]` configuration section.
    ///
    /// `precache` takes effect as items are registered.
    pub fn from_config(config: &NavigationConfig, factory: impl ContentFactory + 'static) -> Self {
        Self {
            registry: NavigationRegistry::new(config.cache_by_default),
            cache: PageCache::new(),
            state: NavigationState::new(),
            events: EventQueue::new(),
            factory: Box::new(factory),
            page_service: None,
            source_loader: None,
            host: None,
            transition_player: None,
            transition: config.transition,
            transition_duration_ms: config.transition_duration_ms,
            precache: config.precache,
            generation: 0,
        }
    }

    // --- collaborators ---

    pub fn set_host(&mut self, host: impl NavigationHost + 'static) {
        self.host = Some(Box::new(host));
    }

    /// Detach the host. Navigation returns `Ok(false)` until a new one is set.
    pub fn take_host(&mut self) -> Option<Box<dyn NavigationHost>> {
        self.host.take()
    }

    pub fn has_host(&self) -> bool {
        self.host.is_some()
    }

    pub fn set_content_factory(&mut self, factory: impl ContentFactory + 'static) {
        self.factory = Box::new(factory);
    }

    pub fn set_source_loader(&mut self, loader: impl SourceLoader + 'static) {
        self.source_loader = Some(Box::new(loader));
    }

    pub fn set_transition_player(&mut self, player: impl TransitionPlayer + 'static) {
        self.transition_player = Some(Box::new(player));
    }

    pub fn set_transition(&mut self, kind: TransitionKind, duration_ms: u32) {
        self.transition = kind;
        self.transition_duration_ms = duration_ms;
    }

    pub fn transition(&self) -> (TransitionKind, u32) {
        (self.transition, self.transition_duration_ms)
    }

    /// Hand instantiation of page types over to `service`.
    ///
    /// Fails if eager precaching is enabled. Entries already in the cache are
    /// dropped, since the cache no longer governs instantiation.
    pub fn attach_page_service(&mut self, service: impl PageService + 'static) -> Result<()> {
        if self.precache {
            warn!("refusing to attach a page service while precaching is enabled");
            return Err(NavigationError::PrecacheWithPageService);
        }
        self.cache.clear();
        self.page_service = Some(Box::new(service));
        Ok(())
    }

    pub fn detach_page_service(&mut self) -> Option<Box<dyn PageService>> {
        self.page_service.take()
    }

    pub fn has_page_service(&self) -> bool {
        self.page_service.is_some()
    }

    /// Enable or disable eager instantiation of every cacheable item.
    /// Enabling it precaches the items already registered; if that fails,
    /// precaching stays disabled.
    pub fn set_precache(&mut self, precache: bool) -> Result<()> {
        if precache && self.page_service.is_some() {
            warn!("refusing to enable precaching while a page service is attached");
            return Err(NavigationError::PrecacheWithPageService);
        }
        if precache {
            self.precache_all()?;
        }
        self.precache = precache;
        Ok(())
    }

    pub fn precache_enabled(&self) -> bool {
        self.precache
    }

    /// Instantiate and cache every cacheable item that isn't cached yet.
    /// Either every instance is stored or, on error, none is.
    pub fn precache_all(&mut self) -> Result<()> {
        if self.page_service.is_some() {
            return Err(NavigationError::PrecacheWithPageService);
        }
        let prepared = self
            .cache
            .prepare(self.registry.iter(), self.factory.as_ref())?;
        debug!(count = prepared.len(), "precached pages");
        self.cache.store(prepared);
        Ok(())
    }

    // --- registry editing ---
    //
    // Each edit snapshots the registry first. If precaching the added items
    // fails, the snapshot is restored and neither the cache nor the state
    // has been touched.

    pub fn add_item(&mut self, group: ItemGroup, item: NavigationItem) -> Result<()> {
        let previous = self.registry.clone();
        let change = self.registry.push(group, item)?;
        self.apply_change(previous, change)
    }

    pub fn insert_item(
        &mut self,
        group: ItemGroup,
        position: usize,
        item: NavigationItem,
    ) -> Result<()> {
        let previous = self.registry.clone();
        let change = self.registry.insert(group, position, item)?;
        self.apply_change(previous, change)
    }

    /// Remove an item and drop its cached instance. Returns false if the
    /// group has no item with `tag`. If the item is the current one,
    /// `state().current()` becomes `None`; the host keeps showing the page
    /// until the next navigation.
    pub fn remove_item(&mut self, group: ItemGroup, tag: &str) -> Result<bool> {
        let previous = self.registry.clone();
        match self.registry.remove(group, tag) {
            Some((_, change)) => {
                self.apply_change(previous, change)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Replace a group's items. Tags that disappear lose their cache entries.
    pub fn set_items(&mut self, group: ItemGroup, items: Vec<NavigationItem>) -> Result<()> {
        let previous = self.registry.clone();
        let change = self.registry.replace(group, items)?;
        self.apply_change(previous, change)
    }

    fn apply_change(&mut self, previous: NavigationRegistry, change: RegistryChange) -> Result<()> {
        if change.is_empty() {
            return Ok(());
        }
        if self.precache && self.page_service.is_none() {
            let added = change
                .added
                .iter()
                .filter_map(|tag| self.registry.resolve_by_tag(tag));
            match self.cache.prepare(added, self.factory.as_ref()) {
                Ok(prepared) => self.cache.store(prepared),
                Err(err) => {
                    warn!(%err, "registry change rolled back: precache failed");
                    self.registry = previous;
                    return Err(err);
                }
            }
        }

        for tag in &change.removed {
            if self.cache.invalidate(tag) {
                debug!(tag = tag.as_str(), "dropped cached page for removed item");
            }
            if self.state.current_tag() == Some(tag.as_str()) {
                debug!(tag = tag.as_str(), "current item removed");
                self.state.clear_current();
            }
        }
        Ok(())
    }

    // --- navigation ---

    /// Navigate to a registered item.
    ///
    /// Returns `Ok(false)` without touching any state if there is no host or
    /// the key does not resolve. Instantiation and configuration errors are
    /// returned before anything is mutated, so a retry is safe.
    pub fn navigate(
        &mut self,
        key: impl Into<NavigationKey>,
        data_context: Option<DataContextHandle>,
    ) -> Result<bool> {
        let key = key.into();
        if self.host.is_none() {
            debug!(?key, "navigation skipped: no host attached");
            return Ok(false);
        }
        let Some(item) = self.resolve(&key).cloned() else {
            debug!(?key, "navigation skipped: key did not resolve");
            return Ok(false);
        };

        let page = self.instantiate(&item)?;
        let index = self.registry.flat_index(&item);
        let entry = HistoryEntry::Tag(item.tag().to_string());
        Ok(self.commit(page, data_context, index, entry, Some(item)))
    }

    /// Navigate to content that is not in the registry. It is never cached,
    /// never marked active and always classified as forward.
    pub fn navigate_external(
        &mut self,
        target: ExternalTarget,
        data_context: Option<DataContextHandle>,
    ) -> Result<bool> {
        if self.host.is_none() {
            debug!("external navigation skipped: no host attached");
            return Ok(false);
        }

        let (page, label) = match target {
            ExternalTarget::Page(page) => {
                let page = PageInstance::new(page, None);
                let label = page.label();
                (page, label)
            }
            ExternalTarget::Source(url) => (self.load_source(&url)?, url.to_string()),
        };

        let index = self.state.next_external_index(self.registry.len());
        Ok(self.commit(page, data_context, index, HistoryEntry::External(label), None))
    }

    /// Navigate to the item at `position` in `group`, as if it was clicked.
    pub fn invoke_item(&mut self, group: ItemGroup, position: usize) -> Result<bool> {
        let Some(item) = self.registry.items(group).get(position) else {
            return Ok(false);
        };
        let tag = item.tag().to_string();
        self.navigate(NavigationKey::Tag(tag), None)
    }

    /// Bind a data context without navigating.
    ///
    /// Cacheable items are bound on their cached instance, which is created
    /// if needed. With a page service the service's instance is bound. Other
    /// items can only be bound while they are displayed; otherwise this
    /// returns `Ok(false)`.
    pub fn set_context(
        &mut self,
        key: impl Into<NavigationKey>,
        data_context: DataContextHandle,
    ) -> Result<bool> {
        let key = key.into();
        if self.host.is_none() {
            return Ok(false);
        }
        let Some(item) = self.resolve(&key).cloned() else {
            return Ok(false);
        };

        let page = match (item.target(), self.page_service.as_deref()) {
            (PageTarget::Type(page_type), Some(service)) => resolve_from_service(service, page_type)?,
            (PageTarget::Type(_), None) if item.is_cacheable() => {
                self.cache.get(&item, self.factory.as_ref())?
            }
            _ => match self.displayed_instance_of(&item) {
                Some(page) => page,
                None => {
                    debug!(tag = item.tag(), "set_context skipped: item is not cached or displayed");
                    return Ok(false);
                }
            },
        };

        page.bind_data_context(data_context);
        Ok(true)
    }

    /// Empty both item groups and reset navigation state. Cache entries are
    /// kept: re-registering a tag exposes its cached instance again.
    pub fn flush(&mut self) {
        self.registry.clear_all();
        self.state.reset();
        debug!(cached = self.cache.len(), "navigation flushed");
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    // --- queries ---

    pub fn registry(&self) -> &NavigationRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// The page shown by the host.
    pub fn current_page(&self) -> Option<PageHandle> {
        self.host.as_ref().and_then(|host| host.current_content())
    }

    /// Number of successful navigations so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Lets a transition player drop work for superseded navigations.
    pub fn is_current_generation(&self, generation: u64) -> bool {
        generation == self.generation
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = NavigationEvent> + '_ {
        self.events.drain()
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    // --- internals ---

    fn resolve(&self, key: &NavigationKey) -> Option<&NavigationItem> {
        match key {
            NavigationKey::Tag(tag) => self.registry.resolve_by_tag(tag),
            NavigationKey::Type(page_type) => self.registry.resolve_by_type(page_type),
            NavigationKey::Index(index) => self.registry.resolve_by_index(*index),
        }
    }

    fn instantiate(&mut self, item: &NavigationItem) -> Result<PageHandle> {
        match (item.target(), self.page_service.as_deref()) {
            (PageTarget::Source(url), _) => self.load_source(url),
            (PageTarget::Type(page_type), Some(service)) => resolve_from_service(service, page_type),
            (PageTarget::Type(_), None) => self.cache.get(item, self.factory.as_ref()),
        }
    }

    fn load_source(&self, url: &Url) -> Result<PageHandle> {
        let loader = self
            .source_loader
            .as_ref()
            .ok_or_else(|| NavigationError::MissingSourceLoader(url.to_string()))?;
        let page = loader
            .load(url)
            .map_err(|source| NavigationError::Instantiation {
                target: url.to_string(),
                source,
            })?;
        Ok(PageInstance::new(page, None))
    }

    fn displayed_instance_of(&self, item: &NavigationItem) -> Option<PageHandle> {
        if self.state.current_tag() != Some(item.tag()) {
            return None;
        }
        self.current_page()
    }

    /// Infallible tail of a navigation. Returns false only if the host
    /// disappeared, which callers have already ruled out.
    fn commit(
        &mut self,
        page: PageHandle,
        data_context: Option<DataContextHandle>,
        index: usize,
        entry: HistoryEntry,
        item: Option<NavigationItem>,
    ) -> bool {
        let Some(host) = self.host.as_mut() else {
            return false;
        };

        if let Some(outgoing) = host.current_content() {
            outgoing.notify_navigated_from();
        }
        if let Some(context) = data_context {
            page.bind_data_context(context);
        }
        page.notify_navigated_to();

        host.display(page.clone());
        self.generation += 1;
        if self.transition != TransitionKind::None
            && let Some(player) = self.transition_player.as_mut()
        {
            player.play(&TransitionRequest {
                kind: self.transition,
                duration_ms: self.transition_duration_ms,
                generation: self.generation,
            });
        }

        let tag = item.as_ref().map(|item| item.tag().to_string());
        match &tag {
            Some(tag) => {
                self.registry.set_active(tag);
            }
            None => self.registry.clear_active(),
        }

        let label = entry.label().to_string();
        let direction = self.state.advance(index, entry, item);
        debug!(
            target_label = label.as_str(),
            index,
            previous = self.state.previous_index(),
            ?direction,
            generation = self.generation,
            "navigated"
        );

        let args = NavigatedArgs { tag, index, page };
        self.events.push(NavigationEvent::Navigated(args.clone()));
        self.events.push(NavigationEvent::directional(direction, args));
        true
    }
}

/// The service's instance for `page_type`. A missing mapping is a
/// configuration error, not a resolution failure.
fn resolve_from_service(service: &dyn PageService, page_type: &PageType) -> Result<PageHandle> {
    match service.resolve(page_type) {
        Ok(Some(page)) => Ok(page),
        Ok(None) => Err(NavigationError::UnmappedPageType(page_type.name().to_string())),
        Err(source) => Err(NavigationError::Instantiation {
            target: page_type.name().to_string(),
            source,
        }),
    }
}
