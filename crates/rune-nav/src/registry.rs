//! Registry of navigation items.
//!
//! Items live in two ordered groups, primary and footer. Lookups scan the
//! logical concatenation `primary ++ footer`, so the flat index of a footer
//! item is `primary.len() + item.index()`.
//!
//! Every mutation reindexes the affected group and returns a
//! [`RegistryChange`] listing the tags that appeared and disappeared, which the
//! manager uses to keep the page cache in sync.

use url::Url;

use crate::error::{NavigationError, Result};
use crate::page::{Page, PageType};

/// Which of the two item groups an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemGroup {
    Primary,
    Footer,
}

/// What an item instantiates when navigated to.
#[derive(Debug, Clone, PartialEq)]
pub enum PageTarget {
    /// Built by the content factory, page service or cache.
    Type(PageType),
    /// Built by the source loader; never cached.
    Source(Url),
}

/// A registered destination.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationItem {
    tag: String,
    title: Option<String>,
    target: PageTarget,
    /// `None` until registered; the registry stamps in its default.
    cache: Option<bool>,
    index: usize,
    group: ItemGroup,
    active: bool,
}

impl NavigationItem {
    /// An item that instantiates page type `T`.
    pub fn page<T: Page + 'static>(tag: impl Into<String>) -> Self {
        Self::new(tag, PageTarget::Type(PageType::of::<T>()))
    }

    /// An item resolved through the source loader.
    pub fn source(tag: impl Into<String>, source: Url) -> Self {
        Self::new(tag, PageTarget::Source(source))
    }

    pub fn new(tag: impl Into<String>, target: PageTarget) -> Self {
        Self {
            tag: tag.into(),
            title: None,
            target,
            cache: None,
            index: 0,
            group: ItemGroup::Primary,
            active: false,
        }
    }

    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn target(&self) -> &PageTarget {
        &self.target
    }

    pub fn page_type(&self) -> Option<&PageType> {
        match &self.target {
            PageTarget::Type(page_type) => Some(page_type),
            PageTarget::Source(_) => None,
        }
    }

    /// The item's cache policy. Unregistered items report `true`.
    pub fn cache_enabled(&self) -> bool {
        self.cache.unwrap_or(true)
    }

    /// Cache enabled and backed by a page type.
    pub fn is_cacheable(&self) -> bool {
        self.cache_enabled() && matches!(self.target, PageTarget::Type(_))
    }

    /// Position within its group.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn group(&self) -> ItemGroup {
        self.group
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Tags added to and removed from the registry by one mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryChange {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl RegistryChange {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Ordered primary and footer items.
#[derive(Debug, Clone)]
pub struct NavigationRegistry {
    primary: Vec<NavigationItem>,
    footer: Vec<NavigationItem>,
    cache_by_default: bool,
}

impl Default for NavigationRegistry {
    fn default() -> Self {
        Self::new(true)
    }
}

impl NavigationRegistry {
    /// Create an empty registry. Items registered without an explicit cache
    /// policy get `cache_by_default`.
    pub fn new(cache_by_default: bool) -> Self {
        Self {
            primary: Vec::new(),
            footer: Vec::new(),
            cache_by_default,
        }
    }

    pub fn cache_by_default(&self) -> bool {
        self.cache_by_default
    }

    pub fn items(&self, group: ItemGroup) -> &[NavigationItem] {
        match group {
            ItemGroup::Primary => &self.primary,
            ItemGroup::Footer => &self.footer,
        }
    }

    fn items_mut(&mut self, group: ItemGroup) -> &mut Vec<NavigationItem> {
        match group {
            ItemGroup::Primary => &mut self.primary,
            ItemGroup::Footer => &mut self.footer,
        }
    }

    /// All items, primary first.
    pub fn iter(&self) -> impl Iterator<Item = &NavigationItem> {
        self.primary.iter().chain(self.footer.iter())
    }

    pub fn len(&self) -> usize {
        self.primary.len() + self.footer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.footer.is_empty()
    }

    pub fn contains_tag(&self, tag: &str) -> bool {
        self.iter().any(|item| item.tag == tag)
    }

    pub fn resolve_by_tag(&self, tag: &str) -> Option<&NavigationItem> {
        self.iter().find(|item| item.tag == tag)
    }

    pub fn resolve_by_type(&self, page_type: &PageType) -> Option<&NavigationItem> {
        self.iter()
            .find(|item| item.page_type() == Some(page_type))
    }

    pub fn resolve_by_index(&self, index: usize) -> Option<&NavigationItem> {
        self.iter().nth(index)
    }

    /// Position of `item` in the concatenation of both groups.
    pub fn flat_index(&self, item: &NavigationItem) -> usize {
        match item.group {
            ItemGroup::Primary => item.index,
            ItemGroup::Footer => self.primary.len() + item.index,
        }
    }

    /// Append an item to a group.
    pub fn push(&mut self, group: ItemGroup, item: NavigationItem) -> Result<RegistryChange> {
        let position = self.items(group).len();
        self.insert(group, position, item)
    }

    /// Insert an item at `position` within a group.
    pub fn insert(
        &mut self,
        group: ItemGroup,
        position: usize,
        mut item: NavigationItem,
    ) -> Result<RegistryChange> {
        let len = self.items(group).len();
        if position > len {
            return Err(NavigationError::InvalidPosition {
                group,
                position,
                len,
            });
        }
        if self.contains_tag(&item.tag) {
            return Err(NavigationError::DuplicateTag(item.tag));
        }

        self.prepare(group, &mut item);
        let tag = item.tag.clone();
        self.items_mut(group).insert(position, item);
        self.reindex(group);

        Ok(RegistryChange {
            added: vec![tag],
            removed: Vec::new(),
        })
    }

    /// Remove the item with `tag` from a group. Returns the removed item, or
    /// `None` if the group has no such tag.
    pub fn remove(
        &mut self,
        group: ItemGroup,
        tag: &str,
    ) -> Option<(NavigationItem, RegistryChange)> {
        let items = self.items_mut(group);
        let position = items.iter().position(|item| item.tag == tag)?;
        let removed = items.remove(position);
        self.reindex(group);

        let change = RegistryChange {
            added: Vec::new(),
            removed: vec![removed.tag.clone()],
        };
        Some((removed, change))
    }

    /// Replace the whole contents of a group.
    ///
    /// Tags present both before and after are neither added nor removed, so
    /// their cache entries survive the replacement.
    pub fn replace(
        &mut self,
        group: ItemGroup,
        items: Vec<NavigationItem>,
    ) -> Result<RegistryChange> {
        let other = match group {
            ItemGroup::Primary => ItemGroup::Footer,
            ItemGroup::Footer => ItemGroup::Primary,
        };
        let mut seen: Vec<&str> = self.items(other).iter().map(|item| item.tag()).collect();
        for item in &items {
            if seen.contains(&item.tag()) {
                return Err(NavigationError::DuplicateTag(item.tag.clone()));
            }
            seen.push(item.tag());
        }

        let old: Vec<String> = self.items(group).iter().map(|item| item.tag.clone()).collect();
        let new: Vec<String> = items.iter().map(|item| item.tag.clone()).collect();

        let mut prepared = items;
        for item in &mut prepared {
            self.prepare(group, item);
        }
        *self.items_mut(group) = prepared;
        self.reindex(group);

        Ok(RegistryChange {
            added: new.iter().filter(|tag| !old.contains(tag)).cloned().collect(),
            removed: old.into_iter().filter(|tag| !new.contains(tag)).collect(),
        })
    }

    /// Remove every item from a group.
    pub fn clear(&mut self, group: ItemGroup) -> RegistryChange {
        let removed = self
            .items_mut(group)
            .drain(..)
            .map(|item| item.tag)
            .collect();
        RegistryChange {
            added: Vec::new(),
            removed,
        }
    }

    /// Remove every item from both groups.
    pub fn clear_all(&mut self) -> RegistryChange {
        let mut change = self.clear(ItemGroup::Primary);
        change.removed.extend(self.clear(ItemGroup::Footer).removed);
        change
    }

    /// Mark every item with `tag` active and every other item inactive.
    /// Returns the number of items marked active.
    pub fn set_active(&mut self, tag: &str) -> usize {
        let mut count = 0;
        for item in self.primary.iter_mut().chain(self.footer.iter_mut()) {
            item.active = item.tag == tag;
            if item.active {
                count += 1;
            }
        }
        count
    }

    pub fn clear_active(&mut self) {
        for item in self.primary.iter_mut().chain(self.footer.iter_mut()) {
            item.active = false;
        }
    }

    /// The active item, if any.
    pub fn active(&self) -> Option<&NavigationItem> {
        self.iter().find(|item| item.active)
    }

    fn prepare(&self, group: ItemGroup, item: &mut NavigationItem) {
        item.group = group;
        item.active = false;
        item.cache.get_or_insert(self.cache_by_default);
    }

    fn reindex(&mut self, group: ItemGroup) {
        for (index, item) in self.items_mut(group).iter_mut().enumerate() {
            item.index = index;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Home;
    impl Page for Home {}

    struct Settings;
    impl Page for Settings {}

    struct About;
    impl Page for About {}

    fn sample() -> NavigationRegistry {
        let mut registry = NavigationRegistry::default();
        registry
            .push(ItemGroup::Primary, NavigationItem::page::<Home>("home"))
            .unwrap();
        registry
            .push(
                ItemGroup::Primary,
                NavigationItem::page::<Settings>("settings").with_cache(false),
            )
            .unwrap();
        registry
            .push(ItemGroup::Footer, NavigationItem::page::<About>("about"))
            .unwrap();
        registry
    }

    #[test]
    fn test_lookup_order() {
        let registry = sample();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.resolve_by_index(0).unwrap().tag(), "home");
        assert_eq!(registry.resolve_by_index(2).unwrap().tag(), "about");
        assert!(registry.resolve_by_index(3).is_none());
        assert_eq!(
            registry
                .resolve_by_type(&PageType::of::<Settings>())
                .unwrap()
                .tag(),
            "settings"
        );
        assert!(registry.resolve_by_tag("missing").is_none());
    }

    #[test]
    fn test_flat_index_spans_groups() {
        let registry = sample();
        let about = registry.resolve_by_tag("about").unwrap();
        assert_eq!(about.group(), ItemGroup::Footer);
        assert_eq!(about.index(), 0);
        assert_eq!(registry.flat_index(about), 2);
    }

    #[test]
    fn test_insert_reindexes_group() {
        let mut registry = sample();
        struct Docs;
        impl Page for Docs {}

        let change = registry
            .insert(ItemGroup::Primary, 0, NavigationItem::page::<Docs>("docs"))
            .unwrap();
        assert_eq!(change.added, vec!["docs".to_string()]);
        assert!(!change.is_empty());

        let indices: Vec<usize> = registry
            .items(ItemGroup::Primary)
            .iter()
            .map(|item| item.index())
            .collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(registry.resolve_by_tag("home").unwrap().index(), 1);
        assert_eq!(
            registry.flat_index(registry.resolve_by_tag("about").unwrap()),
            3
        );
    }

    #[test]
    fn test_insert_out_of_range() {
        let mut registry = sample();
        let err = registry
            .insert(ItemGroup::Footer, 5, NavigationItem::page::<Home>("x"))
            .unwrap_err();
        assert!(matches!(
            err,
            NavigationError::InvalidPosition { position: 5, len: 1, .. }
        ));
    }

    #[test]
    fn test_duplicate_tags_rejected_across_groups() {
        let mut registry = sample();
        let err = registry
            .push(ItemGroup::Footer, NavigationItem::page::<Home>("home"))
            .unwrap_err();
        assert!(matches!(err, NavigationError::DuplicateTag(tag) if tag == "home"));

        let err = registry
            .replace(
                ItemGroup::Footer,
                vec![
                    NavigationItem::page::<About>("a"),
                    NavigationItem::page::<About>("a"),
                ],
            )
            .unwrap_err();
        assert!(matches!(err, NavigationError::DuplicateTag(_)));
        // Rejected replacement leaves the group untouched
        assert_eq!(registry.items(ItemGroup::Footer).len(), 1);
    }

    #[test]
    fn test_remove_reports_change() {
        let mut registry = sample();
        let (item, change) = registry.remove(ItemGroup::Primary, "home").unwrap();
        assert_eq!(item.tag(), "home");
        assert_eq!(change.removed, vec!["home".to_string()]);
        assert_eq!(registry.resolve_by_tag("settings").unwrap().index(), 0);
        assert!(registry.remove(ItemGroup::Footer, "home").is_none());
    }

    #[test]
    fn test_replace_diff_keeps_shared_tags() {
        let mut registry = sample();
        struct Docs;
        impl Page for Docs {}

        let change = registry
            .replace(
                ItemGroup::Primary,
                vec![
                    NavigationItem::page::<Docs>("docs"),
                    NavigationItem::page::<Home>("home"),
                ],
            )
            .unwrap();
        assert_eq!(change.added, vec!["docs".to_string()]);
        assert_eq!(change.removed, vec!["settings".to_string()]);
        assert_eq!(registry.resolve_by_tag("home").unwrap().index(), 1);

        // Same tags again: nothing appears or disappears
        let unchanged = registry
            .replace(
                ItemGroup::Primary,
                vec![
                    NavigationItem::page::<Docs>("docs"),
                    NavigationItem::page::<Home>("home"),
                ],
            )
            .unwrap();
        assert!(unchanged.is_empty());
    }

    #[test]
    fn test_cache_policy_defaults() {
        let registry = sample();
        assert!(registry.resolve_by_tag("home").unwrap().is_cacheable());
        assert!(!registry.resolve_by_tag("settings").unwrap().is_cacheable());

        let mut no_cache = NavigationRegistry::new(false);
        no_cache
            .push(ItemGroup::Primary, NavigationItem::page::<Home>("home"))
            .unwrap();
        no_cache
            .push(
                ItemGroup::Primary,
                NavigationItem::source("web", Url::parse("https://example.com").unwrap())
                    .with_cache(true),
            )
            .unwrap();
        assert!(!no_cache.resolve_by_tag("home").unwrap().is_cacheable());
        // Source items are never cacheable
        assert!(!no_cache.resolve_by_tag("web").unwrap().is_cacheable());
    }

    #[test]
    fn test_set_active_is_exclusive() {
        let mut registry = sample();
        assert_eq!(registry.set_active("settings"), 1);
        assert_eq!(registry.active().unwrap().tag(), "settings");

        assert_eq!(registry.set_active("about"), 1);
        assert!(!registry.resolve_by_tag("settings").unwrap().is_active());

        registry.clear_active();
        assert!(registry.active().is_none());
    }

    #[test]
    fn test_clear_all() {
        let mut registry = sample();
        let change = registry.clear_all();
        assert_eq!(change.removed.len(), 3);
        assert!(registry.is_empty());
    }
}
