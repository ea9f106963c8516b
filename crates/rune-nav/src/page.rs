//! Page content types and the optional lifecycle capability.
//!
//! A page is any `'static` type implementing [`Page`]. The manager never works
//! with bare pages; it wraps every instance in a [`PageInstance`] (shared as a
//! [`PageHandle`]) which also carries the bound data context. Two handles refer
//! to the same instance iff [`PageInstance::same`] returns true.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Access to `dyn Any` for trait objects.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Entry/exit notifications for pages and data contexts that opt in.
pub trait NavigationAware {
    /// Called after the page has been bound and before it is displayed.
    fn on_navigated_to(&self);

    /// Called on the outgoing page before the next one is displayed.
    fn on_navigated_from(&self);
}

/// Content that can be displayed in the navigation host.
pub trait Page: AsAny {
    /// Returns the lifecycle capability if this page implements it.
    fn navigation_aware(&self) -> Option<&dyn NavigationAware> {
        None
    }

    /// Human-readable title, used for history entries of external pages.
    fn title(&self) -> Option<&str> {
        None
    }
}

/// Data bound to a page instance (the page's view model).
pub trait DataContext: AsAny {
    /// Returns the lifecycle capability if this data context implements it.
    fn navigation_aware(&self) -> Option<&dyn NavigationAware> {
        None
    }
}

/// Shared data context handle.
pub type DataContextHandle = Rc<dyn DataContext>;

/// Identity of a page type, used as the instantiation key.
#[derive(Clone, Copy)]
pub struct PageType {
    id: TypeId,
    name: &'static str,
}

impl PageType {
    pub fn of<T: Page + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Fully qualified type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path.
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }

    pub fn is<T: Page + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for PageType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PageType {}

impl Hash for PageType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PageType({})", self.short_name())
    }
}

/// A realized page together with its bound data context.
pub struct PageInstance {
    page: Box<dyn Page>,
    page_type: Option<PageType>,
    data_context: RefCell<Option<DataContextHandle>>,
}

/// Shared handle to a page instance. Identity is pointer identity.
pub type PageHandle = Rc<PageInstance>;

impl PageInstance {
    /// Wrap a page. `page_type` is `None` for externally supplied content.
    pub fn new(page: Box<dyn Page>, page_type: Option<PageType>) -> PageHandle {
        Rc::new(Self {
            page,
            page_type,
            data_context: RefCell::new(None),
        })
    }

    /// Wrap a concrete page, recording its type.
    pub fn of<T: Page + 'static>(page: T) -> PageHandle {
        Self::new(Box::new(page), Some(PageType::of::<T>()))
    }

    pub fn page(&self) -> &dyn Page {
        self.page.as_ref()
    }

    pub fn page_type(&self) -> Option<PageType> {
        self.page_type
    }

    /// Borrow the page as its concrete type.
    pub fn downcast_ref<T: Page + 'static>(&self) -> Option<&T> {
        AsAny::as_any(&*self.page).downcast_ref::<T>()
    }

    pub fn is<T: Page + 'static>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }

    /// The data context last bound to this instance.
    pub fn data_context(&self) -> Option<DataContextHandle> {
        self.data_context.borrow().clone()
    }

    /// Returns true if the bound data context is a `T`.
    pub fn data_context_is<T: DataContext + 'static>(&self) -> bool {
        self.data_context
            .borrow()
            .as_ref()
            .is_some_and(|ctx| AsAny::as_any(&**ctx).is::<T>())
    }

    /// Returns true if both handles point at the same instance.
    pub fn same(a: &PageHandle, b: &PageHandle) -> bool {
        Rc::ptr_eq(a, b)
    }

    pub(crate) fn bind_data_context(&self, context: DataContextHandle) {
        *self.data_context.borrow_mut() = Some(context);
    }

    /// Page first, then its data context.
    pub(crate) fn notify_navigated_to(&self) {
        self.notify(|aware| aware.on_navigated_to());
    }

    pub(crate) fn notify_navigated_from(&self) {
        self.notify(|aware| aware.on_navigated_from());
    }

    /// Runs `hook` on the page, then on the data context unless both expose
    /// the same object (a page forwarding to its own view model).
    fn notify(&self, hook: impl Fn(&dyn NavigationAware)) {
        let page_aware = self.page.navigation_aware();
        if let Some(aware) = page_aware {
            hook(aware);
        }
        // Clone out of the cell so the hook may rebind the context.
        if let Some(context) = self.data_context()
            && let Some(aware) = context.navigation_aware()
            && !page_aware.is_some_and(|page| std::ptr::addr_eq(page, aware))
        {
            hook(aware);
        }
    }

    /// Label used in history entries and logs.
    pub fn label(&self) -> String {
        if let Some(title) = self.page.title() {
            return title.to_string();
        }
        match self.page_type {
            Some(page_type) => page_type.short_name().to_string(),
            None => "external".to_string(),
        }
    }
}

impl fmt::Debug for PageInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageInstance")
            .field("label", &self.label())
            .field("page_type", &self.page_type)
            .field("has_data_context", &self.data_context.borrow().is_some())
            .finish()
    }
}
