use std::collections::HashMap;

use crate::{Error, Result};

mod class_and_query;
mod dump;
mod form_controls;
mod layout;
mod nodes;

pub(crate) use form_controls::{
    is_anchor_with_href, is_checkbox_input, is_radio_input, is_submit_control,
};

/// Handle to a node inside a [`Dom`]. Handles stay valid for the life of the
/// page; removed nodes keep their id but are no longer connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone)]
pub(crate) enum NodeType {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) node_type: NodeType,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ScrollMetrics {
    pub(crate) scroll_left: i64,
    pub(crate) client_width: i64,
    pub(crate) scroll_width: i64,
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    pub(crate) attrs: HashMap<String, String>,
    pub(crate) value: String,
    pub(crate) checked: bool,
    pub(crate) disabled: bool,
    pub(crate) readonly: bool,
    pub(crate) scroll: ScrollMetrics,
}

impl Element {
    fn new(tag_name: String, attrs: HashMap<String, String>) -> Self {
        let value = attrs.get("value").cloned().unwrap_or_default();
        let checked = attrs.contains_key("checked");
        let disabled = attrs.contains_key("disabled");
        let readonly = attrs.contains_key("readonly");
        Self {
            tag_name,
            attrs,
            value,
            checked,
            disabled,
            readonly,
            scroll: ScrollMetrics::default(),
        }
    }

    pub(crate) fn is_tag(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }
}

/// Arena-backed document tree.
#[derive(Debug, Clone)]
pub struct Dom {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    pub(crate) id_index: HashMap<String, Vec<NodeId>>,
    pub(crate) active_element: Option<NodeId>,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    pub(crate) fn element_or_err(&self, node_id: NodeId, what: &str) -> Result<&Element> {
        self.element(node_id)
            .ok_or_else(|| Error::ScriptRuntime(format!("{what} target is not an element")))
    }

    pub(crate) fn element_mut_or_err(
        &mut self,
        node_id: NodeId,
        what: &str,
    ) -> Result<&mut Element> {
        self.element_mut(node_id)
            .ok_or_else(|| Error::ScriptRuntime(format!("{what} target is not an element")))
    }
}
