use std::fmt;

use crate::Result;
use crate::dom::{Dom, NodeId};
use crate::page::BrowserEnv;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub(crate) i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Submit,
    Input,
    Change,
    Scroll,
    Resize,
    KeyDown,
    /// Window `load`, dispatched once every script has been mounted.
    Load,
    Timer,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Submit => "submit",
            Self::Input => "input",
            Self::Change => "change",
            Self::Scroll => "scroll",
            Self::Resize => "resize",
            Self::KeyDown => "keydown",
            Self::Load => "load",
            Self::Timer => "timer",
        }
    }

    fn cancelable(self) -> bool {
        matches!(self, Self::Click | Self::Submit | Self::KeyDown)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event delivered to every mounted script. `target` is `None` for
/// window-level events (load, resize, timers, document keydown).
#[derive(Debug, Clone)]
pub struct Event {
    kind: EventKind,
    target: Option<NodeId>,
    key: Option<String>,
    timer: Option<TimerId>,
    default_prevented: bool,
}

impl Event {
    pub fn new(kind: EventKind, target: Option<NodeId>) -> Self {
        Self {
            kind,
            target,
            key: None,
            timer: None,
            default_prevented: false,
        }
    }

    pub fn key_down(key: &str, target: Option<NodeId>) -> Self {
        let mut event = Self::new(EventKind::KeyDown, target);
        event.key = Some(key.to_string());
        event
    }

    pub(crate) fn timer(id: TimerId) -> Self {
        let mut event = Self::new(EventKind::Timer, None);
        event.timer = Some(id);
        event
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn timer_id(&self) -> Option<TimerId> {
        self.timer
    }

    pub fn prevent_default(&mut self) {
        if self.kind.cancelable() {
            self.default_prevented = true;
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// True when the event is of `kind` and its target is `node` or sits
    /// inside it, the way a bubbling listener on `node` would see it.
    pub fn hits(&self, dom: &Dom, kind: EventKind, node: Option<NodeId>) -> bool {
        match (self.target, node) {
            (Some(target), Some(node)) => self.kind == kind && dom.is_descendant_of(target, node),
            _ => false,
        }
    }
}

/// A page behavior mounted on load. Scripts see every event in mount order
/// and act through the [`BrowserEnv`].
pub trait PageScript: fmt::Debug {
    fn name(&self) -> &'static str;

    fn on_event(&mut self, env: &mut BrowserEnv, event: &mut Event) -> Result<()>;
}
