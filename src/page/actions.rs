use serde_json::Value;
use tracing::debug;

use super::{FormSubmission, LocationNavigation, LocationNavigationKind, Page, node_label};
use crate::dom::{NodeId, is_anchor_with_href, is_checkbox_input, is_radio_input, is_submit_control};
use crate::event::{Event, EventKind};
use crate::{Error, Result};

impl Page {
    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.click_node(target)?;
        self.drain_deferred()
    }

    /// Submits the form `selector` names (or the form owning that control),
    /// the way `form.requestSubmit()` would.
    pub fn submit(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let form = self
            .env
            .dom
            .form_owner(target)
            .ok_or_else(|| Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "form or form control".into(),
                actual: self.env.dom.tag_name(target).unwrap_or("#node").to_string(),
            })?;
        self.request_form_submit(form)?;
        self.drain_deferred()
    }

    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.env.dom.is_effectively_disabled(target) || self.env.dom.readonly(target) {
            return Ok(());
        }
        let tag = self
            .env
            .dom
            .tag_name(target)
            .unwrap_or_default()
            .to_ascii_lowercase();
        if tag != "input" && tag != "textarea" {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input or textarea".into(),
                actual: tag,
            });
        }
        if self
            .env
            .dom
            .input_type(target)
            .is_some_and(|kind| kind == "hidden" || kind == "checkbox" || kind == "radio")
        {
            return Ok(());
        }

        self.env.dom.set_value(target, text)?;
        self.dispatch(Event::new(EventKind::Input, Some(target)))?;
        self.drain_deferred()
    }

    /// Picks an `<option>` by value and fires `input` then `change`.
    pub fn select_option(&mut self, selector: &str, value: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.env.dom.is_effectively_disabled(target) {
            return Ok(());
        }
        let tag = self
            .env
            .dom
            .tag_name(target)
            .unwrap_or_default()
            .to_ascii_lowercase();
        if tag != "select" {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "select".into(),
                actual: tag,
            });
        }
        self.env.dom.set_value(target, value)?;
        self.dispatch(Event::new(EventKind::Input, Some(target)))?;
        self.dispatch(Event::new(EventKind::Change, Some(target)))?;
        self.drain_deferred()
    }

    pub fn set_checked(&mut self, selector: &str, checked: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.env.dom.is_effectively_disabled(target) {
            return Ok(());
        }
        if !is_checkbox_input(&self.env.dom, target) && !is_radio_input(&self.env.dom, target) {
            let actual = match self.env.dom.input_type(target) {
                Some(kind) => format!("input[type={kind}]"),
                None => self.env.dom.tag_name(target).unwrap_or("#node").to_string(),
            };
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input[type=checkbox|radio]".into(),
                actual,
            });
        }

        if self.env.dom.checked(target)? != checked {
            self.env.dom.set_checked(target, checked)?;
            self.dispatch(Event::new(EventKind::Input, Some(target)))?;
            self.dispatch(Event::new(EventKind::Change, Some(target)))?;
        }
        self.drain_deferred()
    }

    /// Fires `keydown` at the focused element, or at the document when
    /// nothing has focus.
    pub fn press_key(&mut self, key: &str) -> Result<()> {
        let target = self.env.dom.active_element();
        self.dispatch(Event::key_down(key, target))?;
        self.drain_deferred()
    }

    pub fn focus(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.env.focus(target);
        Ok(())
    }

    /// Sets the horizontal scroll position of a scroll container, firing
    /// `scroll` if it moved.
    pub fn scroll_to(&mut self, selector: &str, left: i64) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.env.dom.scroll_to(target, left)? {
            self.dispatch(Event::new(EventKind::Scroll, Some(target)))?;
        }
        self.drain_deferred()
    }

    /// Declares the rendered and scrollable widths of an element.
    pub fn set_layout(&mut self, selector: &str, client_width: i64, scroll_width: i64) -> Result<()> {
        let target = self.select_one(selector)?;
        self.env.dom.set_layout(target, client_width, scroll_width)
    }

    /// Fires the window `resize` event.
    pub fn resize(&mut self) -> Result<()> {
        self.dispatch(Event::new(EventKind::Resize, None))?;
        self.drain_deferred()
    }

    pub(crate) fn click_node(&mut self, target: NodeId) -> Result<()> {
        if !self.env.dom.is_connected(target) || self.env.dom.is_effectively_disabled(target) {
            return Ok(());
        }
        debug!(target = %node_label(&self.env.dom, target), "click");

        let checkbox = is_checkbox_input(&self.env.dom, target);
        let radio = is_radio_input(&self.env.dom, target);
        let was_checked = self.env.dom.checked(target)?;
        if checkbox {
            self.env.dom.set_checked(target, !was_checked)?;
        } else if radio {
            self.env.dom.set_checked(target, true)?;
        }

        let click = self.dispatch(Event::new(EventKind::Click, Some(target)))?;
        if click.default_prevented() {
            if checkbox || radio {
                self.env.dom.set_checked(target, was_checked)?;
            }
            return Ok(());
        }

        if (checkbox || radio) && was_checked != self.env.dom.checked(target)? {
            self.dispatch(Event::new(EventKind::Input, Some(target)))?;
            self.dispatch(Event::new(EventKind::Change, Some(target)))?;
            return Ok(());
        }

        if is_submit_control(&self.env.dom, target) {
            if let Some(form) = self.env.dom.form_owner(target) {
                self.request_form_submit(form)?;
            }
            return Ok(());
        }

        let mut cursor = Some(target);
        while let Some(node) = cursor {
            if is_anchor_with_href(&self.env.dom, node) {
                return self.follow_link(node);
            }
            cursor = self.env.dom.parent(node);
        }
        Ok(())
    }

    pub(crate) fn request_form_submit(&mut self, form: NodeId) -> Result<()> {
        let submit = self.dispatch(Event::new(EventKind::Submit, Some(form)))?;
        if submit.default_prevented() {
            debug!(form = %node_label(&self.env.dom, form), "submission cancelled");
            return Ok(());
        }

        let method = self
            .env
            .dom
            .attr(form, "method")
            .map(|method| method.trim().to_ascii_lowercase())
            .filter(|method| method == "post" || method == "dialog")
            .unwrap_or_else(|| "get".to_string());
        let action = self
            .env
            .dom
            .attr(form, "action")
            .filter(|action| !action.trim().is_empty())
            .unwrap_or_else(|| self.env.location.href().to_string());
        let mut target = self.env.location.resolve(&action)?;
        let fields = self.env.dom.form_data(form)?;
        if method == "get" {
            target.set_fragment(None);
            if fields.is_empty() {
                target.set_query(None);
            } else {
                target.query_pairs_mut().clear().extend_pairs(&fields);
            }
        }

        let submission = FormSubmission {
            form_id: self.env.dom.attr(form, "id"),
            method,
            action: target.to_string(),
            fields,
        };
        debug!(
            method = %submission.method,
            action = %submission.action,
            fields = submission.fields.len(),
            "form submitted"
        );
        self.record_navigation(LocationNavigationKind::FormSubmit, submission.action.clone());
        self.env.platform_mocks.submissions.push(submission);
        Ok(())
    }

    fn follow_link(&mut self, anchor: NodeId) -> Result<()> {
        let href = self.env.dom.attr(anchor, "href").unwrap_or_default();
        let target = self.env.location.resolve(&href)?;

        let mut current = self.env.location.url().clone();
        current.set_fragment(None);
        let mut bare_target = target.clone();
        bare_target.set_fragment(None);
        if bare_target == current && target.fragment().is_some() {
            // Same-document fragment: history moves, the page stays.
            return self.env.location.push_state(Value::Null, target.as_str());
        }

        self.record_navigation(LocationNavigationKind::Link, target.to_string());
        Ok(())
    }

    fn record_navigation(&mut self, kind: LocationNavigationKind, to: String) {
        let from = self.env.location.href().to_string();
        debug!(?kind, %from, %to, "navigation requested");
        self.env
            .platform_mocks
            .navigations
            .push(LocationNavigation { kind, from, to });
    }
}
