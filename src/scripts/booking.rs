//! Booking-form persistence across the detour to the health & safety
//! guidelines page, and the acknowledgment gate on submission.
//!
//! Load order is fixed: the visit date is seeded with today first, then the
//! stored draft is restored over it, then the checkbox is locked and the gate
//! flag in the URL is consumed. Seeding first means a date the user already
//! picked always wins over today's default.

use chrono::NaiveDate;
use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, error, warn};

use crate::Result;
use crate::config::{BookingConfig, PageConfig};
use crate::dom::{Dom, NodeId};
use crate::event::{Event, EventKind, PageScript};
use crate::page::BrowserEnv;
use crate::storage::{KeyValueStore, StorageSlot};

/// Field values of the booking form saved while the user reads the
/// guidelines. Empty strings stand for fields that were blank or missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDraft {
    #[serde(default, deserialize_with = "field_text")]
    pub park_id: String,
    #[serde(default, deserialize_with = "field_text")]
    pub date: String,
    #[serde(default, deserialize_with = "field_text")]
    pub num_tickets: String,
}

impl BookingDraft {
    pub fn new(park_id: &str, date: &str, num_tickets: &str) -> Self {
        Self {
            park_id: park_id.to_string(),
            date: date.to_string(),
            num_tickets: num_tickets.to_string(),
        }
    }
}

// Each field decodes on its own and never fails, so one odd value only
// blanks that field. Falsy values and nested objects read as empty.
fn field_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Null | Value::Bool(false) | Value::Object(_) => String::new(),
        Value::Number(number) if number.as_f64() == Some(0.0) => String::new(),
        other => control_text(other),
    })
}

/// The text a form control receives when assigned `value`.
fn control_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(flag) => flag.to_string(),
        Value::String(text) => text.clone(),
        Value::Number(number) => number_text(number),
        Value::Array(items) => items
            .iter()
            .map(control_text)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

// Whole-valued floats print without a fractional part: 2.0 is "2".
fn number_text(number: &serde_json::Number) -> String {
    if number.is_i64() || number.is_u64() {
        return number.to_string();
    }
    match number.as_f64() {
        Some(float) if float.is_finite() && float.fract() == 0.0 && float.abs() < 1e21 => {
            format!("{float:.0}")
        }
        _ => number.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The session-storage slot the draft lives in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftSlot {
    slot: StorageSlot,
}

impl DraftSlot {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            slot: StorageSlot::new(key),
        }
    }

    pub fn key(&self) -> &str {
        self.slot.key()
    }

    /// `Ok(None)` when no draft is stored (an empty string counts as none) or
    /// the stored value has no fields to offer. Only text that is not JSON
    /// at all, or a JSON `null`, is reported as malformed.
    pub fn load(&self, store: &dyn KeyValueStore) -> serde_json::Result<Option<BookingDraft>> {
        let Some(raw) = self.slot.read_raw(store).filter(|raw| !raw.is_empty()) else {
            return Ok(None);
        };
        match serde_json::from_str::<Value>(&raw)? {
            Value::Null => Err(serde_json::Error::custom("booking draft is null")),
            value @ Value::Object(_) => serde_json::from_value(value).map(Some),
            other => {
                debug!(key = self.key(), kind = json_kind(&other), "booking draft has no fields");
                Ok(None)
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore, draft: &BookingDraft) -> Result<()> {
        self.slot.write_json(store, draft)
    }

    pub fn clear(&self, store: &mut dyn KeyValueStore) {
        self.slot.clear(store);
    }
}

/// Handles to the booking page's elements. Every one is optional; the
/// controller skips whatever a page does not render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookingElements {
    pub form: Option<NodeId>,
    pub park_select: Option<NodeId>,
    pub visit_date: Option<NodeId>,
    pub num_tickets: Option<NodeId>,
    pub checkbox: Option<NodeId>,
    pub date_input: Option<NodeId>,
    pub guidelines_link: Option<NodeId>,
    pub back_link: Option<NodeId>,
    pub return_button: Option<NodeId>,
}

impl BookingElements {
    pub fn locate(dom: &Dom, config: &BookingConfig) -> Result<Self> {
        Ok(Self {
            form: dom.by_id(&config.form_id),
            park_select: dom.by_id(&config.park_select_id),
            visit_date: dom.by_id(&config.visit_date_id),
            num_tickets: dom.by_id(&config.num_tickets_id),
            checkbox: dom.by_id(&config.checkbox_id),
            date_input: dom.query_selector(&config.date_input_selector)?,
            guidelines_link: dom.by_id(&config.guidelines_link_id),
            back_link: dom.by_id(&config.back_link_id),
            return_button: dom.by_id(&config.return_button_id),
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone)]
pub struct BookingDraftController {
    config: BookingConfig,
    elements: BookingElements,
    slot: DraftSlot,
}

impl BookingDraftController {
    pub fn new(dom: &Dom, config: &BookingConfig) -> Result<Self> {
        Ok(Self {
            elements: BookingElements::locate(dom, config)?,
            slot: DraftSlot::new(config.draft_key.clone()),
            config: config.clone(),
        })
    }

    pub fn elements(&self) -> &BookingElements {
        &self.elements
    }

    pub fn slot(&self) -> &DraftSlot {
        &self.slot
    }

    pub fn mount(env: &mut BrowserEnv, config: &PageConfig) -> Result<Option<Box<dyn PageScript>>> {
        let controller = Self::new(&env.dom, &config.booking)?;
        if controller.elements.is_empty() {
            return Ok(None);
        }
        controller.initialize(env)?;
        Ok(Some(Box::new(controller)))
    }

    /// The page-load sequence.
    pub fn initialize(&self, env: &mut BrowserEnv) -> Result<()> {
        let today = env.today();
        self.default_visit_date(&mut env.dom, today)?;
        self.restore(&mut env.dom, &mut env.session_storage)?;
        self.lock_checkbox(&mut env.dom)?;
        self.apply_acknowledgment_gate(env)?;
        self.mark_guidelines_read(env);
        Ok(())
    }

    /// Current values of the three draft fields; missing controls read as empty.
    pub fn read_form(&self, dom: &Dom) -> BookingDraft {
        let read = |node: Option<NodeId>| {
            node.and_then(|node| dom.value(node).ok())
                .unwrap_or_default()
        };
        BookingDraft {
            park_id: read(self.elements.park_select),
            date: read(self.elements.visit_date),
            num_tickets: read(self.elements.num_tickets),
        }
    }

    /// Saves the form into the draft slot. A failed write is logged and the
    /// navigation goes ahead regardless.
    pub fn capture(&self, dom: &Dom, store: &mut dyn KeyValueStore) -> BookingDraft {
        let draft = self.read_form(dom);
        match self.slot.save(store, &draft) {
            Ok(()) => debug!(key = self.slot.key(), ?draft, "booking draft saved"),
            Err(err) => warn!(key = self.slot.key(), error = %err, "booking draft not saved"),
        }
        draft
    }

    /// Applies the stored draft to the form. Returns the draft that was
    /// applied, or `None` when there was none or it could not be read.
    pub fn restore(
        &self,
        dom: &mut Dom,
        store: &mut dyn KeyValueStore,
    ) -> Result<Option<BookingDraft>> {
        let draft = match self.slot.load(store) {
            Ok(None) => return Ok(None),
            Ok(Some(draft)) => draft,
            Err(err) => {
                error!(key = self.slot.key(), error = %err, "error parsing saved booking draft");
                if self.config.clear_corrupt_draft {
                    self.slot.clear(store);
                }
                return Ok(None);
            }
        };

        let fields = [
            (self.elements.park_select, &draft.park_id),
            (self.elements.visit_date, &draft.date),
            (self.elements.num_tickets, &draft.num_tickets),
        ];
        for (node, value) in fields {
            match node {
                Some(node) if !value.is_empty() => dom.set_value(node, value)?,
                _ => {}
            }
        }
        debug!(key = self.slot.key(), ?draft, "booking draft restored");
        Ok(Some(draft))
    }

    pub fn lock_checkbox(&self, dom: &mut Dom) -> Result<()> {
        if let Some(checkbox) = self.elements.checkbox {
            dom.set_disabled(checkbox, true)?;
            dom.set_checked(checkbox, false)?;
        }
        Ok(())
    }

    /// Unlocks and checks the checkbox when the URL carries the gate flag,
    /// then rewrites the URL to the bare path. Returns whether the gate opened.
    pub fn apply_acknowledgment_gate(&self, env: &mut BrowserEnv) -> Result<bool> {
        let Some(checkbox) = self.elements.checkbox else {
            return Ok(false);
        };
        let flag = env.location().query_param(&self.config.gate_param);
        if flag.as_deref() != Some(self.config.gate_value.as_str()) {
            return Ok(false);
        }

        env.dom.set_disabled(checkbox, false)?;
        env.dom.set_checked(checkbox, true)?;
        let path = env.location().pathname().to_string();
        env.replace_state(json!({}), &path)?;
        Ok(true)
    }

    /// Sets `min` on the date input to `today` and seeds it when empty.
    pub fn default_visit_date(&self, dom: &mut Dom, today: NaiveDate) -> Result<()> {
        let Some(input) = self.elements.date_input else {
            return Ok(());
        };
        let today = today.format("%Y-%m-%d").to_string();
        dom.set_attr(input, "min", &today)?;
        if dom.value(input)?.is_empty() {
            dom.set_value(input, &today)?;
        }
        Ok(())
    }

    /// Blocks submission while the acknowledgment is unchecked; otherwise the
    /// detour is over and the draft is dropped.
    pub fn handle_submit(&self, env: &mut BrowserEnv, event: &mut Event) -> Result<()> {
        let acknowledged = match self.elements.checkbox {
            Some(checkbox) => env.dom.checked(checkbox)?,
            None => true,
        };
        if !acknowledged {
            event.prevent_default();
            env.alert(&self.config.acknowledgment_message);
            if let Some(link) = self.elements.guidelines_link {
                env.scroll_into_view(link, true);
            }
            debug!("booking submission blocked until guidelines are acknowledged");
            return Ok(());
        }
        if event.default_prevented() {
            return Ok(());
        }
        self.slot.clear(&mut env.session_storage);
        Ok(())
    }

    pub fn handle_back_navigation(&self, store: &mut dyn KeyValueStore) {
        self.slot.clear(store);
        debug!(key = self.slot.key(), "booking draft discarded");
    }

    /// On the guidelines page, remembers in local storage that it was shown.
    pub fn mark_guidelines_read(&self, env: &mut BrowserEnv) {
        if self.elements.return_button.is_none() {
            return;
        }
        if let Err(err) = env
            .local_storage
            .set_item(&self.config.guidelines_read_key, "true")
        {
            warn!(key = %self.config.guidelines_read_key, error = %err, "guidelines flag not saved");
        }
    }
}

impl PageScript for BookingDraftController {
    fn name(&self) -> &'static str {
        "booking"
    }

    fn on_event(&mut self, env: &mut BrowserEnv, event: &mut Event) -> Result<()> {
        if event.hits(&env.dom, EventKind::Click, self.elements.guidelines_link) {
            self.capture(&env.dom, &mut env.session_storage);
        }
        if event.hits(&env.dom, EventKind::Click, self.elements.back_link) {
            self.handle_back_navigation(&mut env.session_storage);
        }
        if event.kind() == EventKind::Submit
            && event.target().is_some()
            && event.target() == self.elements.form
        {
            self.handle_submit(env, event)?;
        }
        Ok(())
    }
}
