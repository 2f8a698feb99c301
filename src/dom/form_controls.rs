use super::{Dom, Element, NodeId};
use crate::{Error, Result};

fn input_type_of(element: &Element) -> String {
    element
        .attrs
        .get("type")
        .map(|kind| kind.to_ascii_lowercase())
        .unwrap_or_else(|| "text".to_string())
}

fn is_checkbox_or_radio_input_element(element: &Element) -> bool {
    element.is_tag("input") && matches!(input_type_of(element).as_str(), "checkbox" | "radio")
}

pub(crate) fn is_checkbox_input(dom: &Dom, node_id: NodeId) -> bool {
    dom.element(node_id)
        .is_some_and(|element| element.is_tag("input") && input_type_of(element) == "checkbox")
}

pub(crate) fn is_radio_input(dom: &Dom, node_id: NodeId) -> bool {
    dom.element(node_id)
        .is_some_and(|element| element.is_tag("input") && input_type_of(element) == "radio")
}

pub(crate) fn is_form_control(dom: &Dom, node_id: NodeId) -> bool {
    dom.element(node_id).is_some_and(|element| {
        element.is_tag("input")
            || element.is_tag("select")
            || element.is_tag("textarea")
            || element.is_tag("button")
    })
}

pub(crate) fn is_submit_control(dom: &Dom, node_id: NodeId) -> bool {
    let Some(element) = dom.element(node_id) else {
        return false;
    };

    if element.is_tag("button") {
        return element
            .attrs
            .get("type")
            .map(|kind| kind.eq_ignore_ascii_case("submit"))
            .unwrap_or(true);
    }

    if element.is_tag("input") {
        return matches!(input_type_of(element).as_str(), "submit" | "image");
    }

    false
}

pub(crate) fn is_anchor_with_href(dom: &Dom, node_id: NodeId) -> bool {
    dom.element(node_id)
        .is_some_and(|element| element.is_tag("a") && element.attrs.contains_key("href"))
}

/// A valid date string per the HTML `type=date` value sanitization rules.
pub(crate) fn is_valid_date_string(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit())
        && chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

/// A valid floating-point number per the HTML `type=number` sanitization rules.
pub(crate) fn is_valid_floating_point_number(value: &str) -> bool {
    let bytes = value.as_bytes();
    let mut i = 0usize;
    if bytes.get(i) == Some(&b'-') {
        i += 1;
    }
    let int_start = i;
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    let has_int = i > int_start;
    let mut has_frac = false;
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        let frac_start = i;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        has_frac = i > frac_start;
        if !has_frac {
            return false;
        }
    }
    if !has_int && !has_frac {
        return false;
    }
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_start = i;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }
    i == bytes.len()
}

fn sanitize_value(element: &Element, value: &str) -> String {
    if !element.is_tag("input") {
        return value.to_string();
    }
    match input_type_of(element).as_str() {
        "date" if !value.is_empty() && !is_valid_date_string(value) => String::new(),
        "number" if !value.is_empty() && !is_valid_floating_point_number(value) => String::new(),
        "text" | "search" | "email" | "tel" | "password" | "url" => {
            value.replace(['\r', '\n'], "")
        }
        _ => value.to_string(),
    }
}

impl Dom {
    pub fn input_type(&self, node_id: NodeId) -> Option<String> {
        self.element(node_id)
            .filter(|element| element.is_tag("input"))
            .map(input_type_of)
    }

    pub fn value(&self, node_id: NodeId) -> Result<String> {
        let element = self.element_or_err(node_id, "value")?;
        if is_checkbox_or_radio_input_element(element) && !element.attrs.contains_key("value") {
            return Ok("on".to_string());
        }
        Ok(element.value.clone())
    }

    /// Assigns `.value`, applying the sanitization the control's type imposes.
    pub fn set_value(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        if self
            .tag_name(node_id)
            .is_some_and(|tag| tag.eq_ignore_ascii_case("select"))
        {
            return self.set_select_value(node_id, value);
        }

        let element = self.element_mut_or_err(node_id, "value")?;
        if is_checkbox_or_radio_input_element(element) {
            element.attrs.insert("value".to_string(), value.to_string());
        }
        element.value = sanitize_value(element, value);
        Ok(())
    }

    pub fn checked(&self, node_id: NodeId) -> Result<bool> {
        Ok(self.element_or_err(node_id, "checked")?.checked)
    }

    pub fn set_checked(&mut self, node_id: NodeId, checked: bool) -> Result<()> {
        if checked && is_radio_input(self, node_id) {
            self.uncheck_radio_group_peers(node_id)?;
        }
        self.element_mut_or_err(node_id, "checked")?.checked = checked;
        Ok(())
    }

    pub fn disabled(&self, node_id: NodeId) -> bool {
        self.element(node_id).is_some_and(|element| element.disabled)
    }

    /// Reflects the `disabled` IDL attribute onto the content attribute.
    pub fn set_disabled(&mut self, node_id: NodeId, disabled: bool) -> Result<()> {
        if disabled {
            self.set_attr(node_id, "disabled", "")
        } else {
            self.remove_attr(node_id, "disabled")
        }
    }

    pub fn readonly(&self, node_id: NodeId) -> bool {
        self.element(node_id).is_some_and(|element| element.readonly)
    }

    /// Disabled directly or through an ancestor `<fieldset disabled>`.
    pub fn is_effectively_disabled(&self, node_id: NodeId) -> bool {
        if self.disabled(node_id) {
            return true;
        }
        if !is_form_control(self, node_id) {
            return false;
        }

        let mut cursor = self.parent(node_id);
        while let Some(parent) = cursor {
            if self
                .tag_name(parent)
                .is_some_and(|tag| tag.eq_ignore_ascii_case("fieldset"))
                && self.disabled(parent)
            {
                return true;
            }
            cursor = self.parent(parent);
        }
        false
    }

    /// The form a control submits with: its `form` attribute target, else the
    /// nearest ancestor `<form>`.
    pub fn form_owner(&self, node_id: NodeId) -> Option<NodeId> {
        if self
            .tag_name(node_id)
            .is_some_and(|tag| tag.eq_ignore_ascii_case("form"))
        {
            return Some(node_id);
        }
        if let Some(form_id) = self.attr(node_id, "form") {
            return self
                .by_id(&form_id)
                .filter(|form| self.tag_name(*form).is_some_and(|tag| tag == "form"));
        }
        self.find_ancestor_by_tag(node_id, "form")
    }

    /// Name/value pairs a successful submission of `form` would carry.
    pub fn form_data(&self, form: NodeId) -> Result<Vec<(String, String)>> {
        let mut controls = Vec::new();
        self.collect_elements_dfs(self.root, &mut controls);

        let mut entries = Vec::new();
        for control in controls {
            if self.form_owner(control) != Some(form) || control == form {
                continue;
            }
            let Some(element) = self.element(control) else {
                continue;
            };
            let Some(name) = element.attrs.get("name").filter(|name| !name.is_empty()) else {
                continue;
            };
            if self.is_effectively_disabled(control) {
                continue;
            }
            if element.is_tag("input") {
                let kind = input_type_of(element);
                if matches!(
                    kind.as_str(),
                    "submit" | "image" | "reset" | "button" | "file"
                ) {
                    continue;
                }
                if (kind == "checkbox" || kind == "radio") && !element.checked {
                    continue;
                }
            } else if !element.is_tag("select") && !element.is_tag("textarea") {
                continue;
            }
            entries.push((name.clone(), self.value(control)?));
        }
        Ok(entries)
    }

    fn uncheck_radio_group_peers(&mut self, node_id: NodeId) -> Result<()> {
        let Some(name) = self.attr(node_id, "name") else {
            return Ok(());
        };
        let form = self.form_owner(node_id);
        let mut radios = Vec::new();
        self.collect_elements_dfs(self.root, &mut radios);
        for radio in radios {
            if radio != node_id
                && is_radio_input(self, radio)
                && self.attr(radio, "name").as_deref() == Some(name.as_str())
                && self.form_owner(radio) == form
            {
                self.element_mut_or_err(radio, "checked")?.checked = false;
            }
        }
        Ok(())
    }

    pub(crate) fn initialize_form_control_values(&mut self) -> Result<()> {
        let mut nodes = Vec::new();
        self.collect_elements_dfs(self.root, &mut nodes);
        for node in nodes {
            let (is_textarea, is_select, is_input) = match self.element(node) {
                Some(element) => (
                    element.is_tag("textarea"),
                    element.is_tag("select"),
                    element.is_tag("input"),
                ),
                None => continue,
            };
            if is_textarea {
                let text = self.text_content(node);
                self.element_mut_or_err(node, "textarea")?.value = text;
            } else if is_select {
                self.sync_select_value(node)?;
            } else if is_input {
                let element = self.element_mut_or_err(node, "input")?;
                element.value = sanitize_value(element, &element.value);
            }
        }
        Ok(())
    }

    fn set_select_value(&mut self, select_node: NodeId, requested: &str) -> Result<()> {
        let mut options = Vec::new();
        self.collect_select_options(select_node, &mut options);

        let mut option_values = Vec::with_capacity(options.len());
        for option in options {
            option_values.push((option, self.option_effective_value(option)?));
        }

        let matched = option_values
            .iter()
            .find(|(_, value)| value == requested)
            .map(|(node, value)| (*node, value.clone()));

        for (option, _) in &option_values {
            let option_element = self.element_mut_or_err(*option, "option")?;
            if Some(*option) == matched.as_ref().map(|(node, _)| *node) {
                option_element
                    .attrs
                    .insert("selected".to_string(), String::new());
            } else {
                option_element.attrs.remove("selected");
            }
        }

        let element = self.element_mut_or_err(select_node, "select")?;
        element.value = matched.map(|(_, value)| value).unwrap_or_default();
        Ok(())
    }

    fn sync_select_value(&mut self, select_node: NodeId) -> Result<()> {
        let mut options = Vec::new();
        self.collect_select_options(select_node, &mut options);
        let value = match options
            .iter()
            .copied()
            .find(|option| self.has_attr(*option, "selected"))
            .or_else(|| options.first().copied())
        {
            Some(selected) => self.option_effective_value(selected)?,
            None => String::new(),
        };
        self.element_mut_or_err(select_node, "select")?.value = value;
        Ok(())
    }

    fn collect_select_options(&self, node: NodeId, out: &mut Vec<NodeId>) {
        for child in self.children(node) {
            if self
                .tag_name(*child)
                .is_some_and(|tag| tag.eq_ignore_ascii_case("option"))
            {
                out.push(*child);
            }
            self.collect_select_options(*child, out);
        }
    }

    fn option_effective_value(&self, option_node: NodeId) -> Result<String> {
        let element = self.element_or_err(option_node, "option")?;
        if !element.is_tag("option") {
            return Err(Error::ScriptRuntime(
                "option target is not an option".into(),
            ));
        }
        if let Some(value) = element.attrs.get("value") {
            return Ok(value.clone());
        }
        Ok(self.text_content(option_node).trim().to_string())
    }
}
