use std::rc::Rc;

use anyhow::Result;
use rune_config::RuneConfig;
use rune_nav::{
    DataContext, ExternalTarget, ItemGroup, NavigationAware, NavigationEvent, NavigationHost,
    NavigationItem, NavigationManager, Page, PageHandle, PageTypeRegistry, TransitionPlayer,
    TransitionRequest,
};
use tracing::info;
use url::Url;

/// Host that prints whatever it is asked to display.
#[derive(Default)]
struct ConsoleHost {
    current: Option<PageHandle>,
}

impl NavigationHost for ConsoleHost {
    fn display(&mut self, page: PageHandle) {
        println!("  [host] showing {}", page.label());
        self.current = Some(page);
    }

    fn current_content(&self) -> Option<PageHandle> {
        self.current.clone()
    }
}

/// Transition player that logs requests instead of animating.
struct LogPlayer;

impl TransitionPlayer for LogPlayer {
    fn play(&mut self, request: &TransitionRequest) {
        info!(
            kind = request.kind.as_str(),
            duration_ms = request.duration_ms,
            generation = request.generation,
            "transition"
        );
    }
}

#[derive(Default)]
struct HomePage;

impl NavigationAware for HomePage {
    fn on_navigated_to(&self) {
        println!("  [home] navigated to");
    }

    fn on_navigated_from(&self) {
        println!("  [home] navigated from");
    }
}

impl Page for HomePage {
    fn navigation_aware(&self) -> Option<&dyn NavigationAware> {
        Some(self)
    }

    fn title(&self) -> Option<&str> {
        Some("Home")
    }
}

#[derive(Default)]
struct SettingsPage;

impl Page for SettingsPage {
    fn title(&self) -> Option<&str> {
        Some("Settings")
    }
}

#[derive(Default)]
struct AboutPage;

impl Page for AboutPage {
    fn title(&self) -> Option<&str> {
        Some("About")
    }
}

struct DocumentPage {
    source: String,
}

impl Page for DocumentPage {
    fn title(&self) -> Option<&str> {
        Some(self.source.as_str())
    }
}

struct SettingsModel {
    user: String,
}

impl NavigationAware for SettingsModel {
    fn on_navigated_to(&self) {
        println!("  [settings model] loading settings for {}", self.user);
    }

    fn on_navigated_from(&self) {
        println!("  [settings model] saving settings for {}", self.user);
    }
}

impl DataContext for SettingsModel {
    fn navigation_aware(&self) -> Option<&dyn NavigationAware> {
        Some(self)
    }
}

fn print_events(manager: &mut NavigationManager) {
    for event in manager.drain_events() {
        let kind = match &event {
            NavigationEvent::Navigated(_) => "navigated",
            NavigationEvent::NavigatedForward(_) => "forward",
            NavigationEvent::NavigatedBackward(_) => "backward",
        };
        let args = event.args();
        println!(
            "  [event] {kind} tag={} index={}",
            args.tag.as_deref().unwrap_or("<external>"),
            args.index
        );
    }
}

fn report(
    manager: &mut NavigationManager,
    label: &str,
    step: impl FnOnce(&mut NavigationManager) -> rune_nav::Result<bool>,
) -> rune_nav::Result<()> {
    println!("navigate -> {label}");
    if !step(manager)? {
        println!("  (not navigated)");
    }
    print_events(manager);
    Ok(())
}

fn main() -> Result<()> {
    let config = RuneConfig::load();
    env_logger::Builder::new()
        .parse_filters(&config.logging.filter)
        .init();

    let mut pages = PageTypeRegistry::new();
    pages
        .register::<HomePage>()
        .register::<SettingsPage>()
        .register::<AboutPage>();

    let mut manager = NavigationManager::from_config(&config.navigation, pages);
    manager.set_host(ConsoleHost::default());
    manager.set_transition_player(LogPlayer);
    manager.set_source_loader(|source: &Url| -> anyhow::Result<Box<dyn Page>> {
        Ok(Box::new(DocumentPage {
            source: source.to_string(),
        }))
    });

    manager.set_items(
        ItemGroup::Primary,
        vec![
            NavigationItem::page::<HomePage>("home").with_title("Home"),
            NavigationItem::page::<SettingsPage>("settings")
                .with_title("Settings")
                .with_cache(false),
        ],
    )?;
    manager.add_item(
        ItemGroup::Footer,
        NavigationItem::page::<AboutPage>("about").with_title("About"),
    )?;
    manager.add_item(
        ItemGroup::Footer,
        NavigationItem::source("docs", Url::parse("https://example.com/docs")?),
    )?;

    report(&mut manager, "home", |m| m.navigate("home", None))?;
    report(&mut manager, "settings", |m| {
        let model = Rc::new(SettingsModel {
            user: "demo".to_string(),
        });
        m.navigate("settings", Some(model))
    })?;
    report(&mut manager, "footer item 0", |m| m.invoke_item(ItemGroup::Footer, 0))?;
    report(&mut manager, "docs", |m| m.navigate("docs", None))?;
    report(&mut manager, "external page", |m| {
        let page = DocumentPage {
            source: "release notes".to_string(),
        };
        m.navigate_external(ExternalTarget::page(page), None)
    })?;
    report(&mut manager, "index 0", |m| m.navigate(0usize, None))?;
    report(&mut manager, "missing", |m| m.navigate("missing", None))?;

    let history: Vec<&str> = manager
        .state()
        .history()
        .iter()
        .map(|entry| entry.label())
        .collect();
    println!("history: {}", history.join(" -> "));
    println!("cached pages: {}", manager.cache().len());
    Ok(())
}
