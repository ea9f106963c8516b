#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anyhow::anyhow;
use rune_nav::{
    DataContext, ItemGroup, NavigationAware, NavigationItem, NavigationManager, Page,
    PageTypeRegistry, SlotHost, TransitionPlayer, TransitionRequest,
};

pub type Log = Rc<RefCell<Vec<String>>>;

#[derive(Default)]
pub struct HomePage;
impl Page for HomePage {}

#[derive(Default)]
pub struct SettingsPage;
impl Page for SettingsPage {}

#[derive(Default)]
pub struct AboutPage;
impl Page for AboutPage {}

#[derive(Default)]
pub struct ExternalPage;
impl Page for ExternalPage {
    fn title(&self) -> Option<&str> {
        Some("Release notes")
    }
}

/// Page whose constructor fails while the shared switch is on.
pub struct FlakyPage;
impl Page for FlakyPage {}

/// Page that records lifecycle calls into a shared log.
pub struct LoggedPage {
    name: &'static str,
    log: Log,
}

impl NavigationAware for LoggedPage {
    fn on_navigated_to(&self) {
        self.log.borrow_mut().push(format!("to:{}", self.name));
    }

    fn on_navigated_from(&self) {
        self.log.borrow_mut().push(format!("from:{}", self.name));
    }
}

impl Page for LoggedPage {
    fn navigation_aware(&self) -> Option<&dyn NavigationAware> {
        Some(self)
    }
}

/// Second lifecycle-aware page type, so both can be registered.
pub struct OtherLoggedPage(pub LoggedPage);

impl Page for OtherLoggedPage {
    fn navigation_aware(&self) -> Option<&dyn NavigationAware> {
        Some(&self.0)
    }
}

/// View model that records lifecycle calls.
pub struct LoggedModel {
    pub name: &'static str,
    pub log: Log,
}

impl NavigationAware for LoggedModel {
    fn on_navigated_to(&self) {
        self.log.borrow_mut().push(format!("to:{}", self.name));
    }

    fn on_navigated_from(&self) {
        self.log.borrow_mut().push(format!("from:{}", self.name));
    }
}

impl DataContext for LoggedModel {
    fn navigation_aware(&self) -> Option<&dyn NavigationAware> {
        Some(self)
    }
}

/// Plain view model without lifecycle hooks.
pub struct Model(pub u32);
impl DataContext for Model {}

/// Transition player that records every request.
#[derive(Default)]
pub struct RecordingPlayer {
    pub requests: Vec<TransitionRequest>,
}

impl TransitionPlayer for RecordingPlayer {
    fn play(&mut self, request: &TransitionRequest) {
        self.requests.push(*request);
    }
}

/// Test fixture: a manager with a shared host and counters.
pub struct Fixture {
    pub manager: NavigationManager,
    pub host: Rc<RefCell<SlotHost>>,
    pub created: Rc<Cell<usize>>,
    pub fail_flaky: Rc<Cell<bool>>,
    pub log: Log,
}

pub fn page_types(created: &Rc<Cell<usize>>, fail_flaky: &Rc<Cell<bool>>, log: &Log) -> PageTypeRegistry {
    let mut pages = PageTypeRegistry::new();

    let counter = created.clone();
    pages.register_with(move || {
        counter.set(counter.get() + 1);
        Ok(HomePage)
    });
    let counter = created.clone();
    pages.register_with(move || {
        counter.set(counter.get() + 1);
        Ok(SettingsPage)
    });
    pages.register::<AboutPage>();

    let fail = fail_flaky.clone();
    pages.register_with(move || {
        if fail.get() {
            Err(anyhow!("flaky page refused to build"))
        } else {
            Ok(FlakyPage)
        }
    });

    let home_log = log.clone();
    pages.register_with(move || {
        Ok(LoggedPage {
            name: "logged",
            log: home_log.clone(),
        })
    });
    let other_log = log.clone();
    pages.register_with(move || {
        Ok(OtherLoggedPage(LoggedPage {
            name: "other",
            log: other_log.clone(),
        }))
    });
    pages
}

impl Fixture {
    /// Empty manager with a host attached and every test page type known.
    pub fn empty() -> Self {
        let created = Rc::new(Cell::new(0));
        let fail_flaky = Rc::new(Cell::new(false));
        let log: Log = Rc::default();

        let mut manager = NavigationManager::new(page_types(&created, &fail_flaky, &log));
        let host = Rc::new(RefCell::new(SlotHost::new()));
        manager.set_host(host.clone());

        Self {
            manager,
            host,
            created,
            fail_flaky,
            log,
        }
    }

    /// The home/settings/about layout used by most tests:
    /// primary `[home (cached), settings (not cached)]`, footer `[about]`.
    pub fn standard() -> Self {
        let mut fixture = Self::empty();
        fixture
            .manager
            .set_items(
                ItemGroup::Primary,
                vec![
                    NavigationItem::page::<HomePage>("home").with_title("Home"),
                    NavigationItem::page::<SettingsPage>("settings").with_cache(false),
                ],
            )
            .unwrap();
        fixture
            .manager
            .add_item(ItemGroup::Footer, NavigationItem::page::<AboutPage>("about"))
            .unwrap();
        fixture
    }

    pub fn display_count(&self) -> usize {
        self.host.borrow().display_count()
    }

    pub fn log_entries(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    pub fn clear_log(&self) {
        self.log.borrow_mut().clear();
    }
}
