//! Page instance cache keyed by navigation tag.
//!
//! At most one instance exists per cacheable tag. Non-cacheable items are
//! instantiated on every request and never stored. There is no eviction:
//! entries only go away through [`PageCache::clear`] or
//! [`PageCache::invalidate`].

use std::collections::HashMap;

use tracing::trace;

use crate::error::{NavigationError, Result};
use crate::host::ContentFactory;
use crate::page::{DataContextHandle, PageHandle, PageInstance, PageType};
use crate::registry::{NavigationItem, PageTarget};

/// A cached page instance.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    instance: PageHandle,
}

impl CacheEntry {
    pub fn instance(&self) -> &PageHandle {
        &self.instance
    }

    /// The data context last bound to the cached instance.
    pub fn data_context(&self) -> Option<DataContextHandle> {
        self.instance.data_context()
    }
}

/// Tag-keyed store of page instances.
#[derive(Debug, Default)]
pub struct PageCache {
    entries: HashMap<String, CacheEntry>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply an instance for `item` under its cache policy.
    ///
    /// A factory failure is returned as [`NavigationError::Instantiation`]
    /// and leaves the cache unchanged.
    pub fn get(&mut self, item: &NavigationItem, factory: &dyn ContentFactory) -> Result<PageHandle> {
        let page_type = match item.target() {
            PageTarget::Type(page_type) => page_type,
            PageTarget::Source(_) => {
                return Err(NavigationError::NotInstantiable(item.tag().to_string()));
            }
        };

        if !item.cache_enabled() {
            trace!(tag = item.tag(), "cache bypass");
            return instantiate(page_type, factory);
        }

        if let Some(entry) = self.entries.get(item.tag()) {
            trace!(tag = item.tag(), "cache hit");
            return Ok(entry.instance.clone());
        }

        trace!(tag = item.tag(), "cache miss");
        let instance = instantiate(page_type, factory)?;
        self.entries.insert(
            item.tag().to_string(),
            CacheEntry {
                instance: instance.clone(),
            },
        );
        Ok(instance)
    }

    /// Build instances for the items in `items` that are cacheable and not
    /// cached yet, without storing them. Fails on the first factory error;
    /// pair with [`PageCache::store`] so a failure leaves the cache untouched.
    pub(crate) fn prepare<'a>(
        &self,
        items: impl IntoIterator<Item = &'a NavigationItem>,
        factory: &dyn ContentFactory,
    ) -> Result<Vec<(String, PageHandle)>> {
        let mut prepared: Vec<(String, PageHandle)> = Vec::new();
        for item in items {
            let Some(page_type) = item.page_type() else {
                continue;
            };
            let tag = item.tag();
            if !item.cache_enabled()
                || self.entries.contains_key(tag)
                || prepared.iter().any(|(seen, _)| seen == tag)
            {
                continue;
            }
            prepared.push((tag.to_string(), instantiate(page_type, factory)?));
        }
        Ok(prepared)
    }

    /// Store instances built by [`PageCache::prepare`].
    pub(crate) fn store(&mut self, prepared: Vec<(String, PageHandle)>) {
        for (tag, instance) in prepared {
            trace!(tag = tag.as_str(), "precached");
            self.entries.insert(tag, CacheEntry { instance });
        }
    }

    pub fn entry(&self, tag: &str) -> Option<&CacheEntry> {
        self.entries.get(tag)
    }

    pub fn peek(&self, tag: &str) -> Option<&PageHandle> {
        self.entries.get(tag).map(|entry| &entry.instance)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    /// Drop the entry for `tag`. Returns true if one existed.
    pub fn invalidate(&mut self, tag: &str) -> bool {
        self.entries.remove(tag).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

pub(crate) fn instantiate(page_type: &PageType, factory: &dyn ContentFactory) -> Result<PageHandle> {
    let page = factory
        .create(page_type)
        .map_err(|source| NavigationError::Instantiation {
            target: page_type.name().to_string(),
            source,
        })?;
    Ok(PageInstance::new(page, Some(*page_type)))
}
