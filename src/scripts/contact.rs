//! First-pass validation of the contact form. The server validates again;
//! this layer only gives instant feedback next to the offending field.

use std::fmt;

use fancy_regex::Regex;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use crate::config::{ContactConfig, PageConfig};
use crate::dom::{Dom, NodeId};
use crate::event::{Event, EventKind, PageScript};
use crate::page::BrowserEnv;
use crate::{Error, Result};

const ERROR_CLASS: &str = "error";
const ERROR_BOX_CLASS: &str = "contact-error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    Name,
    Email,
    Message,
}

impl ContactField {
    pub fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Message => "message",
        }
    }

    fn control_selector(self) -> &'static str {
        match self {
            Self::Name => r#"input[name="name"]"#,
            Self::Email => r#"input[name="email"]"#,
            Self::Message => r#"textarea[name="message"]"#,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactFieldError {
    pub field: ContactField,
    pub message: String,
}

impl fmt::Display for ContactFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field.name(), self.message)
    }
}

#[derive(Debug)]
pub struct ContactFormController {
    config: ContactConfig,
    form: NodeId,
    submit_button: Option<NodeId>,
    email: Regex,
}

impl ContactFormController {
    pub fn new(dom: &Dom, config: &ContactConfig) -> Result<Option<Self>> {
        let Some(form) = dom.by_id(&config.form_id) else {
            return Ok(None);
        };
        let email = Regex::new(&config.email_pattern)
            .map_err(|err| Error::Config(format!("contact.email_pattern: {err}")))?;
        Ok(Some(Self {
            submit_button: dom.query_selector_from(form, &config.submit_button_selector)?,
            config: config.clone(),
            form,
            email,
        }))
    }

    pub fn mount(env: &mut BrowserEnv, config: &PageConfig) -> Result<Option<Box<dyn PageScript>>> {
        Ok(Self::new(&env.dom, &config.contact)?
            .map(|controller| Box::new(controller) as Box<dyn PageScript>))
    }

    /// Trimmed, NFC-normalized value of a field, or `None` when the form has
    /// no such control.
    fn field_value(&self, dom: &Dom, field: ContactField) -> Result<Option<String>> {
        let Some(control) = dom.query_selector_from(self.form, field.control_selector())? else {
            return Ok(None);
        };
        let raw = dom.value(control)?;
        Ok(Some(raw.trim().nfc().collect()))
    }

    /// The first rule the form breaks, checked in field order.
    pub fn validate(&self, dom: &Dom) -> Result<Option<ContactFieldError>> {
        let fail = |field, message: &str| {
            Ok(Some(ContactFieldError {
                field,
                message: message.to_string(),
            }))
        };

        let name = self.field_value(dom, ContactField::Name)?.unwrap_or_default();
        if name.encode_utf16().count() < self.config.min_name_chars.max(1) {
            return fail(
                ContactField::Name,
                &format!(
                    "Name must be at least {} characters long",
                    self.config.min_name_chars
                ),
            );
        }

        let email = self.field_value(dom, ContactField::Email)?.unwrap_or_default();
        if email.is_empty() {
            return fail(ContactField::Email, "Email is required");
        }
        let email_ok = self
            .email
            .is_match(&email)
            .map_err(|err| Error::ScriptRuntime(format!("email pattern failed: {err}")))?;
        if !email_ok {
            return fail(
                ContactField::Email,
                "Please enter a valid email address (example@domain.com)",
            );
        }

        let message = self
            .field_value(dom, ContactField::Message)?
            .unwrap_or_default();
        if message.encode_utf16().count() < self.config.min_message_chars.max(1) {
            return fail(
                ContactField::Message,
                &format!(
                    "Message must be at least {} characters long",
                    self.config.min_message_chars
                ),
            );
        }
        Ok(None)
    }

    /// Shows `error` right after its field, or at the top of the form when
    /// the field is missing.
    pub fn show_error(&self, env: &mut BrowserEnv, error: &ContactFieldError) -> Result<()> {
        self.remove_errors(&mut env.dom, None)?;

        let dom = &mut env.dom;
        let error_box = dom.create_detached_element("div");
        dom.set_attr(error_box, "class", ERROR_BOX_CLASS)?;
        let text = dom.create_detached_element("span");
        dom.set_text_content(text, &error.message)?;
        dom.append_child(error_box, text)?;

        let selector = format!(r#"[name="{}"]"#, error.field.name());
        match dom.query_selector_from(self.form, &selector)? {
            Some(control) => {
                dom.class_add(control, ERROR_CLASS)?;
                dom.insert_after(control, error_box)?;
                env.focus(control);
            }
            None => {
                let first = dom.first_child(self.form);
                dom.insert_before(self.form, error_box, first)?;
            }
        }
        debug!(%error, "contact form rejected");
        Ok(())
    }

    /// Drops every error box; clears the `error` class on `field` only, or on
    /// all inputs when `field` is `None`.
    pub fn remove_errors(&self, dom: &mut Dom, field: Option<NodeId>) -> Result<()> {
        for error_box in dom.query_selector_all_from(self.form, &format!(".{ERROR_BOX_CLASS}"))? {
            dom.remove_node(error_box)?;
        }
        let targets = match field {
            Some(field) => vec![field],
            None => dom.query_selector_all_from(self.form, "input, textarea")?,
        };
        for target in targets {
            dom.class_remove(target, ERROR_CLASS)?;
        }
        Ok(())
    }

    /// Puts the send button into its loading state for the real submission.
    pub fn show_loading(&self, dom: &mut Dom) -> Result<()> {
        let Some(button) = self.submit_button else {
            return Ok(());
        };
        if dom
            .dataset(button, "originalText")
            .is_none_or(|text| text.is_empty())
        {
            let original = dom.text_content(button).trim().to_string();
            dom.set_dataset(button, "originalText", &original)?;
        }
        dom.set_disabled(button, true)?;
        dom.set_text_content(button, &self.config.loading_label)
    }
}

impl PageScript for ContactFormController {
    fn name(&self) -> &'static str {
        "contact"
    }

    fn on_event(&mut self, env: &mut BrowserEnv, event: &mut Event) -> Result<()> {
        match event.kind() {
            EventKind::Submit if event.target() == Some(self.form) => {
                match self.validate(&env.dom)? {
                    Some(error) => {
                        event.prevent_default();
                        self.show_error(env, &error)?;
                    }
                    None if !event.default_prevented() => self.show_loading(&mut env.dom)?,
                    None => {}
                }
            }
            EventKind::Input => {
                let Some(target) = event.target() else {
                    return Ok(());
                };
                if target != self.form
                    && env.dom.is_descendant_of(target, self.form)
                    && env.dom.matches_selector(target, "input, textarea")?
                {
                    self.remove_errors(&mut env.dom, Some(target))?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}
