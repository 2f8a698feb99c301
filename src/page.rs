use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::config::PageConfig;
use crate::dom::{Dom, NodeId};
use crate::event::{Event, EventKind, PageScript, TimerId};
use crate::html::parse_html;
use crate::location::LocationHistory;
use crate::storage::StorageHandle;
use crate::{Error, Result};

mod actions;
mod assertions;

/// Builds a page script once the document is parsed. Returning `None` means
/// the feature has nothing to attach to on this page.
pub type ScriptMount =
    Rc<dyn Fn(&mut BrowserEnv, &PageConfig) -> Result<Option<Box<dyn PageScript>>>>;

const DEFAULT_STEP_LIMIT: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTimer {
    pub id: TimerId,
    pub due_at: i64,
    pub order: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationNavigationKind {
    Link,
    FormSubmit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationNavigation {
    pub kind: LocationNavigationKind,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub form_id: Option<String>,
    pub method: String,
    pub action: String,
    pub fields: Vec<(String, String)>,
}

impl FormSubmission {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollRequest {
    /// `#id` of the element, or its tag name when it has no id.
    pub target: String,
    pub smooth: bool,
}

#[derive(Debug, Default)]
pub(crate) struct PlatformMockState {
    pub(crate) alert_messages: Vec<String>,
    pub(crate) scroll_requests: Vec<ScrollRequest>,
    pub(crate) navigations: Vec<LocationNavigation>,
    pub(crate) submissions: Vec<FormSubmission>,
}

#[derive(Debug, Clone)]
pub(crate) struct ScheduledTask {
    pub(crate) id: TimerId,
    pub(crate) due_at: i64,
    pub(crate) order: i64,
}

#[derive(Debug)]
pub(crate) struct SchedulerState {
    pub(crate) now_ms: i64,
    pub(crate) next_timer_id: i64,
    pub(crate) next_order: i64,
    pub(crate) tasks: Vec<ScheduledTask>,
    pub(crate) step_limit: usize,
}

impl Default for SchedulerState {
    fn default() -> Self {
        Self {
            now_ms: 0,
            next_timer_id: 1,
            next_order: 0,
            tasks: Vec::new(),
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }
}

impl SchedulerState {
    fn next_due(&self, until: i64) -> Option<usize> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.due_at <= until)
            .min_by_key(|(_, task)| (task.due_at, task.order))
            .map(|(index, _)| index)
    }
}

#[derive(Debug)]
pub(crate) enum DeferredAction {
    Click(NodeId),
    Dispatch(Event),
}

/// Everything a page script may touch: the document, location and history,
/// both storage areas, the clock, timers and the dialog/scroll mocks.
pub struct BrowserEnv {
    pub(crate) dom: Dom,
    pub(crate) location: LocationHistory,
    pub(crate) session_storage: StorageHandle,
    pub(crate) local_storage: StorageHandle,
    pub(crate) clock: Rc<dyn Clock>,
    pub(crate) scheduler: SchedulerState,
    pub(crate) platform_mocks: PlatformMockState,
    pub(crate) deferred: VecDeque<DeferredAction>,
}

impl fmt::Debug for BrowserEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrowserEnv")
            .field("url", &self.location.href())
            .field("session_storage", &self.session_storage)
            .field("local_storage", &self.local_storage)
            .field("clock", &self.clock)
            .field("now_ms", &self.scheduler.now_ms)
            .finish_non_exhaustive()
    }
}

impl BrowserEnv {
    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut Dom {
        &mut self.dom
    }

    pub fn location(&self) -> &LocationHistory {
        &self.location
    }

    /// `history.replaceState(state, "", url)`.
    pub fn replace_state(&mut self, state: Value, url: &str) -> Result<()> {
        debug!(from = self.location.href(), to = url, "history.replaceState");
        self.location.replace_state(state, url)
    }

    pub fn session_storage(&self) -> &StorageHandle {
        &self.session_storage
    }

    pub fn session_storage_mut(&mut self) -> &mut StorageHandle {
        &mut self.session_storage
    }

    pub fn local_storage(&self) -> &StorageHandle {
        &self.local_storage
    }

    pub fn local_storage_mut(&mut self) -> &mut StorageHandle {
        &mut self.local_storage
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// `window.alert`: recorded and answered immediately.
    pub fn alert(&mut self, message: &str) {
        debug!(message, "window.alert");
        self.platform_mocks.alert_messages.push(message.to_string());
    }

    pub fn scroll_into_view(&mut self, node: NodeId, smooth: bool) {
        let target = node_label(&self.dom, node);
        self.platform_mocks
            .scroll_requests
            .push(ScrollRequest { target, smooth });
    }

    pub fn focus(&mut self, node: NodeId) {
        if self.dom.is_connected(node) && !self.dom.is_effectively_disabled(node) {
            self.dom.set_active_element(Some(node));
        }
    }

    /// Scrolls `node` horizontally and queues a `scroll` event if it moved.
    pub fn scroll_element_by(&mut self, node: NodeId, delta: i64) -> Result<()> {
        if self.dom.scroll_by(node, delta)? {
            self.request_dispatch(Event::new(EventKind::Scroll, Some(node)));
        }
        Ok(())
    }

    pub fn set_timeout(&mut self, delay_ms: i64) -> TimerId {
        let id = TimerId(self.scheduler.next_timer_id);
        self.scheduler.next_timer_id += 1;
        let order = self.scheduler.next_order;
        self.scheduler.next_order += 1;
        self.scheduler.tasks.push(ScheduledTask {
            id,
            due_at: self.scheduler.now_ms.saturating_add(delay_ms.max(0)),
            order,
        });
        id
    }

    pub fn clear_timeout(&mut self, id: TimerId) -> bool {
        let before = self.scheduler.tasks.len();
        self.scheduler.tasks.retain(|task| task.id != id);
        before != self.scheduler.tasks.len()
    }

    /// `element.click()`: runs after the current event finishes dispatching.
    pub fn request_click(&mut self, node: NodeId) {
        self.deferred.push_back(DeferredAction::Click(node));
    }

    pub fn request_dispatch(&mut self, event: Event) {
        self.deferred.push_back(DeferredAction::Dispatch(event));
    }
}

pub(crate) fn node_label(dom: &Dom, node: NodeId) -> String {
    match dom.attr(node, "id") {
        Some(id) if !id.is_empty() => format!("#{id}"),
        _ => dom.tag_name(node).unwrap_or("#node").to_string(),
    }
}

pub struct PageBuilder {
    url: String,
    html: String,
    config: PageConfig,
    clock: Rc<dyn Clock>,
    session_storage: Option<StorageHandle>,
    local_storage: Option<StorageHandle>,
    mounts: Vec<ScriptMount>,
}

impl PageBuilder {
    pub fn config(mut self, config: PageConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock(self, clock: impl Clock + 'static) -> Self {
        self.shared_clock(Rc::new(clock))
    }

    pub fn shared_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn session_storage(mut self, storage: StorageHandle) -> Self {
        self.session_storage = Some(storage);
        self
    }

    pub fn local_storage(mut self, storage: StorageHandle) -> Self {
        self.local_storage = Some(storage);
        self
    }

    pub fn mount(mut self, mount: ScriptMount) -> Self {
        self.mounts.push(mount);
        self
    }

    pub fn mounts(mut self, mounts: impl IntoIterator<Item = ScriptMount>) -> Self {
        self.mounts.extend(mounts);
        self
    }

    /// Mounts every behavior of the site, in the order the site initializes them.
    pub fn site_scripts(self) -> Self {
        self.mounts(crate::scripts::site_scripts())
    }

    /// Parses the document, mounts scripts (DOMContentLoaded) and then fires
    /// the window `load` event.
    pub fn load(self) -> Result<Page> {
        self.config.validate()?;
        let dom = parse_html(&self.html)?;
        let location = LocationHistory::new(&self.url)?;
        let env = BrowserEnv {
            dom,
            location,
            session_storage: self.session_storage.unwrap_or_else(StorageHandle::in_memory),
            local_storage: self.local_storage.unwrap_or_else(StorageHandle::in_memory),
            clock: self.clock,
            scheduler: SchedulerState::default(),
            platform_mocks: PlatformMockState::default(),
            deferred: VecDeque::new(),
        };
        let mut page = Page {
            env,
            config: self.config,
            scripts: Vec::new(),
        };

        for mount in &self.mounts {
            if let Some(script) = mount(&mut page.env, &page.config)? {
                debug!(script = script.name(), url = page.url(), "mounted page script");
                page.scripts.push(script);
            }
        }
        page.drain_deferred()?;
        page.dispatch(Event::new(EventKind::Load, None))?;
        page.drain_deferred()?;
        Ok(page)
    }
}

/// A loaded document with its mounted scripts, driven like a user would.
pub struct Page {
    pub(crate) env: BrowserEnv,
    pub(crate) config: PageConfig,
    pub(crate) scripts: Vec<Box<dyn PageScript>>,
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("env", &self.env)
            .field("scripts", &self.script_names())
            .finish_non_exhaustive()
    }
}

impl Page {
    pub fn builder(url: &str, html: &str) -> PageBuilder {
        PageBuilder {
            url: url.to_string(),
            html: html.to_string(),
            config: PageConfig::default(),
            clock: Rc::new(SystemClock),
            session_storage: None,
            local_storage: None,
            mounts: Vec::new(),
        }
    }

    /// A page at `http://localhost/` with every site script mounted.
    pub fn from_html(html: &str) -> Result<Self> {
        Self::builder("http://localhost/", html).site_scripts().load()
    }

    pub fn url(&self) -> &str {
        self.env.location.href()
    }

    pub fn location(&self) -> &LocationHistory {
        &self.env.location
    }

    pub fn dom(&self) -> &Dom {
        &self.env.dom
    }

    pub fn env(&self) -> &BrowserEnv {
        &self.env
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn session_storage(&self) -> &StorageHandle {
        &self.env.session_storage
    }

    pub fn local_storage(&self) -> &StorageHandle {
        &self.env.local_storage
    }

    pub fn script_names(&self) -> Vec<&'static str> {
        self.scripts.iter().map(|script| script.name()).collect()
    }

    pub fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.env
            .dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    pub fn take_alert_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.env.platform_mocks.alert_messages)
    }

    pub fn take_scroll_requests(&mut self) -> Vec<ScrollRequest> {
        std::mem::take(&mut self.env.platform_mocks.scroll_requests)
    }

    pub fn take_navigations(&mut self) -> Vec<LocationNavigation> {
        std::mem::take(&mut self.env.platform_mocks.navigations)
    }

    pub fn take_submissions(&mut self) -> Vec<FormSubmission> {
        std::mem::take(&mut self.env.platform_mocks.submissions)
    }

    pub(crate) fn last_navigation(&self) -> Option<&LocationNavigation> {
        self.env.platform_mocks.navigations.last()
    }

    pub fn set_step_limit(&mut self, max_steps: usize) -> Result<()> {
        if max_steps == 0 {
            return Err(Error::ScriptRuntime(
                "set_step_limit requires at least 1 step".into(),
            ));
        }
        self.env.scheduler.step_limit = max_steps;
        Ok(())
    }

    pub(crate) fn dispatch(&mut self, mut event: Event) -> Result<Event> {
        for script in &mut self.scripts {
            script.on_event(&mut self.env, &mut event)?;
        }
        Ok(event)
    }

    pub(crate) fn drain_deferred(&mut self) -> Result<()> {
        let mut steps = 0usize;
        while let Some(action) = self.env.deferred.pop_front() {
            steps += 1;
            if steps > self.env.scheduler.step_limit {
                self.env.deferred.clear();
                return Err(Error::ScriptRuntime(format!(
                    "deferred action limit exceeded ({} steps)",
                    self.env.scheduler.step_limit
                )));
            }
            match action {
                DeferredAction::Click(node) => self.click_node(node)?,
                DeferredAction::Dispatch(event) => {
                    self.dispatch(event)?;
                }
            }
        }
        Ok(())
    }

    // Timers

    pub fn now_ms(&self) -> i64 {
        self.env.scheduler.now_ms
    }

    pub fn pending_timers(&self) -> Vec<PendingTimer> {
        let mut timers = self
            .env
            .scheduler
            .tasks
            .iter()
            .map(|task| PendingTimer {
                id: task.id,
                due_at: task.due_at,
                order: task.order,
            })
            .collect::<Vec<_>>();
        timers.sort_by_key(|timer| (timer.due_at, timer.order));
        timers
    }

    /// Moves the virtual clock forward, running every timer that falls due.
    pub fn advance_time(&mut self, delta_ms: i64) -> Result<()> {
        if delta_ms < 0 {
            return Err(Error::ScriptRuntime(
                "advance_time requires a non-negative delta".into(),
            ));
        }
        let target = self.env.scheduler.now_ms.saturating_add(delta_ms);
        self.run_timers_until(target)?;
        self.env.scheduler.now_ms = target;
        Ok(())
    }

    /// Runs timers already due at the current time; returns how many ran.
    pub fn run_due_timers(&mut self) -> Result<usize> {
        let now = self.env.scheduler.now_ms;
        self.run_timers_until(now)
    }

    fn run_timers_until(&mut self, until: i64) -> Result<usize> {
        let mut ran = 0usize;
        while let Some(index) = self.env.scheduler.next_due(until) {
            if ran >= self.env.scheduler.step_limit {
                return Err(Error::ScriptRuntime(format!(
                    "timer step limit exceeded ({} steps)",
                    self.env.scheduler.step_limit
                )));
            }
            let task = self.env.scheduler.tasks.remove(index);
            self.env.scheduler.now_ms = self.env.scheduler.now_ms.max(task.due_at);
            self.dispatch(Event::timer(task.id))?;
            self.drain_deferred()?;
            ran += 1;
        }
        Ok(ran)
    }
}
