use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::config::PageConfig;
use crate::page::{Page, ScriptMount};
use crate::scripts::site_scripts;
use crate::storage::StorageHandle;
use crate::{Error, Result};

/// A browser tab: one page at a time, with session and local storage that
/// outlive each load. Use it to walk the booking flow across pages.
pub struct BrowserTab {
    config: PageConfig,
    clock: Rc<dyn Clock>,
    session_storage: StorageHandle,
    local_storage: StorageHandle,
    mounts: Vec<ScriptMount>,
    current: Option<Page>,
    visited: Vec<String>,
}

impl fmt::Debug for BrowserTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrowserTab")
            .field("current_url", &self.current.as_ref().map(Page::url))
            .field("visited", &self.visited)
            .field("session_storage", &self.session_storage)
            .field("local_storage", &self.local_storage)
            .finish_non_exhaustive()
    }
}

impl Default for BrowserTab {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserTab {
    /// An empty tab that mounts every site script on each load.
    pub fn new() -> Self {
        Self::with_mounts(site_scripts())
    }

    pub fn with_mounts(mounts: Vec<ScriptMount>) -> Self {
        Self {
            config: PageConfig::default(),
            clock: Rc::new(SystemClock),
            session_storage: StorageHandle::in_memory(),
            local_storage: StorageHandle::in_memory(),
            mounts,
            current: None,
            visited: Vec::new(),
        }
    }

    pub fn config(mut self, config: PageConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Rc::new(clock);
        self
    }

    pub fn session_storage_handle(mut self, storage: StorageHandle) -> Self {
        self.session_storage = storage;
        self
    }

    pub fn local_storage_handle(mut self, storage: StorageHandle) -> Self {
        self.local_storage = storage;
        self
    }

    /// Loads `html` as the document at `url`, replacing the current page.
    pub fn navigate(&mut self, url: &str, html: &str) -> Result<&mut Page> {
        debug!(url, "tab navigate");
        let page = Page::builder(url, html)
            .config(self.config.clone())
            .shared_clock(Rc::clone(&self.clock))
            .session_storage(self.session_storage.clone())
            .local_storage(self.local_storage.clone())
            .mounts(self.mounts.iter().cloned())
            .load()?;
        self.visited.push(page.url().to_string());
        Ok(self.current.insert(page))
    }

    /// Completes the latest navigation the current page requested (a link
    /// click or a form submission) by loading `html` at its target.
    pub fn follow_navigation(&mut self, html: &str) -> Result<&mut Page> {
        let target = self
            .page()?
            .last_navigation()
            .map(|navigation| navigation.to.clone())
            .ok_or_else(|| Error::ScriptRuntime("current page requested no navigation".into()))?;
        self.navigate(&target, html)
    }

    pub fn page(&self) -> Result<&Page> {
        self.current
            .as_ref()
            .ok_or_else(|| Error::ScriptRuntime("tab has no page".into()))
    }

    pub fn page_mut(&mut self) -> Result<&mut Page> {
        self.current
            .as_mut()
            .ok_or_else(|| Error::ScriptRuntime("tab has no page".into()))
    }

    pub fn current_url(&self) -> Result<&str> {
        self.page().map(Page::url)
    }

    /// URLs of every document loaded in this tab, oldest first.
    pub fn visited(&self) -> &[String] {
        &self.visited
    }

    pub fn session_storage(&self) -> &StorageHandle {
        &self.session_storage
    }

    pub fn local_storage(&self) -> &StorageHandle {
        &self.local_storage
    }

    pub fn click(&mut self, selector: &str) -> Result<()> {
        self.page_mut()?.click(selector)
    }

    pub fn submit(&mut self, selector: &str) -> Result<()> {
        self.page_mut()?.submit(selector)
    }

    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        self.page_mut()?.type_text(selector, text)
    }

    pub fn select_option(&mut self, selector: &str, value: &str) -> Result<()> {
        self.page_mut()?.select_option(selector, value)
    }

    pub fn set_checked(&mut self, selector: &str, checked: bool) -> Result<()> {
        self.page_mut()?.set_checked(selector, checked)
    }

    pub fn assert_value(&self, selector: &str, expected: &str) -> Result<()> {
        self.page()?.assert_value(selector, expected)
    }

    pub fn assert_checked(&self, selector: &str, expected: bool) -> Result<()> {
        self.page()?.assert_checked(selector, expected)
    }

    pub fn assert_disabled(&self, selector: &str, expected: bool) -> Result<()> {
        self.page()?.assert_disabled(selector, expected)
    }
}
