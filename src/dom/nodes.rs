use std::collections::HashMap;

use super::{Dom, Element, Node, NodeId, NodeType};
use crate::{Error, Result};

impl Dom {
    pub fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Document,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            id_index: HashMap::new(),
            active_element: None,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn create_node(&mut self, parent: Option<NodeId>, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            node_type,
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        id
    }

    pub(crate) fn create_element(
        &mut self,
        parent: NodeId,
        tag_name: String,
        attrs: HashMap<String, String>,
    ) -> NodeId {
        let id = self.create_node(Some(parent), NodeType::Element(Element::new(tag_name, attrs)));
        if let Some(id_attr) = self.attr(id, "id") {
            self.index_id(&id_attr, id);
        }
        id
    }

    /// Creates an element that is not yet part of the document.
    pub fn create_detached_element(&mut self, tag_name: &str) -> NodeId {
        self.create_node(
            None,
            NodeType::Element(Element::new(tag_name.to_ascii_lowercase(), HashMap::new())),
        )
    }

    pub(crate) fn create_text(&mut self, parent: NodeId, text: String) -> NodeId {
        self.create_node(Some(parent), NodeType::Text(text))
    }

    pub(crate) fn element(&self, node_id: NodeId) -> Option<&Element> {
        match &self.nodes.get(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, node_id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_element(&self, node_id: NodeId) -> bool {
        self.element(node_id).is_some()
    }

    pub fn tag_name(&self, node_id: NodeId) -> Option<&str> {
        self.element(node_id).map(|element| element.tag_name.as_str())
    }

    pub fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes.get(node_id.0)?.parent
    }

    pub fn children(&self, node_id: NodeId) -> &[NodeId] {
        self.nodes
            .get(node_id.0)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn first_child(&self, node_id: NodeId) -> Option<NodeId> {
        self.children(node_id).first().copied()
    }

    pub fn next_sibling(&self, node_id: NodeId) -> Option<NodeId> {
        let parent = self.parent(node_id)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|child| *child == node_id)?;
        siblings.get(pos + 1).copied()
    }

    pub fn is_descendant_of(&self, node_id: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = Some(node_id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    pub fn is_connected(&self, node_id: NodeId) -> bool {
        self.is_descendant_of(node_id, self.root)
    }

    pub(crate) fn find_ancestor_by_tag(&self, node_id: NodeId, tag: &str) -> Option<NodeId> {
        let mut cursor = self.parent(node_id);
        while let Some(current) = cursor {
            if self
                .tag_name(current)
                .is_some_and(|name| name.eq_ignore_ascii_case(tag))
            {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    pub fn active_element(&self) -> Option<NodeId> {
        self.active_element
    }

    pub(crate) fn set_active_element(&mut self, node: Option<NodeId>) {
        self.active_element = node;
    }

    /// First connected element carrying `id`, in insertion order.
    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id)?.first().copied()
    }

    fn index_id(&mut self, id: &str, node_id: NodeId) {
        let entries = self.id_index.entry(id.to_string()).or_default();
        if !entries.contains(&node_id) {
            entries.push(node_id);
        }
    }

    fn unindex_id(&mut self, id: &str, node_id: NodeId) {
        if let Some(entries) = self.id_index.get_mut(id) {
            entries.retain(|entry| *entry != node_id);
            if entries.is_empty() {
                self.id_index.remove(id);
            }
        }
    }

    fn reindex_subtree(&mut self, node_id: NodeId, connect: bool) {
        let mut subtree = vec![node_id];
        self.collect_elements_dfs(node_id, &mut subtree);
        for node in subtree {
            if let Some(id_attr) = self.attr(node, "id") {
                if connect {
                    self.index_id(&id_attr, node);
                } else {
                    self.unindex_id(&id_attr, node);
                }
            }
        }
    }

    pub fn attr(&self, node_id: NodeId, name: &str) -> Option<String> {
        self.element(node_id)?.attrs.get(name).cloned()
    }

    pub fn has_attr(&self, node_id: NodeId, name: &str) -> bool {
        self.element(node_id)
            .is_some_and(|element| element.attrs.contains_key(name))
    }

    pub fn set_attr(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let name = name.to_ascii_lowercase();
        let connected = self.is_connected(node_id);
        let previous_id = if name == "id" { self.attr(node_id, "id") } else { None };

        let element = self.element_mut_or_err(node_id, "setAttribute")?;
        element.attrs.insert(name.clone(), value.to_string());
        match name.as_str() {
            "disabled" => element.disabled = true,
            "readonly" => element.readonly = true,
            _ => {}
        }

        if name == "id" && connected {
            if let Some(previous) = previous_id {
                self.unindex_id(&previous, node_id);
            }
            self.index_id(value, node_id);
        }
        Ok(())
    }

    pub fn remove_attr(&mut self, node_id: NodeId, name: &str) -> Result<()> {
        let name = name.to_ascii_lowercase();
        let connected = self.is_connected(node_id);
        let element = self.element_mut_or_err(node_id, "removeAttribute")?;
        let removed = element.attrs.remove(&name);
        match name.as_str() {
            "disabled" => element.disabled = false,
            "readonly" => element.readonly = false,
            _ => {}
        }
        if let (true, Some(previous)) = (name == "id" && connected, removed) {
            self.unindex_id(&previous, node_id);
        }
        Ok(())
    }

    /// Reads `data-*` attributes using the camelCase key of `element.dataset`.
    pub fn dataset(&self, node_id: NodeId, key: &str) -> Option<String> {
        self.attr(node_id, &dataset_attr_name(key))
    }

    pub fn set_dataset(&mut self, node_id: NodeId, key: &str, value: &str) -> Result<()> {
        self.set_attr(node_id, &dataset_attr_name(key), value)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.insert_before(parent, child, None)
    }

    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<()> {
        if self.is_descendant_of(parent, child) {
            return Err(Error::ScriptRuntime(
                "insertBefore would create a cycle".into(),
            ));
        }
        if let Some(reference) = reference {
            if self.parent(reference) != Some(parent) {
                return Err(Error::ScriptRuntime(
                    "insertBefore reference is not a child of parent".into(),
                ));
            }
        }
        if child.0 >= self.nodes.len() || parent.0 >= self.nodes.len() {
            return Err(Error::ScriptRuntime("unknown node".into()));
        }

        self.detach(child);

        let position = reference
            .and_then(|reference| {
                self.nodes[parent.0]
                    .children
                    .iter()
                    .position(|node| *node == reference)
            })
            .unwrap_or(self.nodes[parent.0].children.len());
        self.nodes[parent.0].children.insert(position, child);
        self.nodes[child.0].parent = Some(parent);

        if self.is_connected(parent) {
            self.reindex_subtree(child, true);
        }
        Ok(())
    }

    /// Inserts `child` right after `node` under the same parent.
    pub fn insert_after(&mut self, node: NodeId, child: NodeId) -> Result<()> {
        let parent = self
            .parent(node)
            .ok_or_else(|| Error::ScriptRuntime("insert target has no parent".into()))?;
        self.detach(child);
        let next = self.next_sibling(node);
        self.insert_before(parent, child, next)
    }

    pub fn remove_node(&mut self, node_id: NodeId) -> Result<()> {
        if node_id == self.root {
            return Err(Error::ScriptRuntime("cannot remove the document".into()));
        }
        self.detach(node_id);
        Ok(())
    }

    fn detach(&mut self, node_id: NodeId) {
        let Some(parent) = self.parent(node_id) else {
            return;
        };
        if self.is_connected(node_id) {
            self.reindex_subtree(node_id, false);
            if self
                .active_element
                .is_some_and(|active| self.is_descendant_of(active, node_id))
            {
                self.active_element = None;
            }
        }
        self.nodes[parent.0].children.retain(|child| *child != node_id);
        self.nodes[node_id.0].parent = None;
    }

    pub fn text_content(&self, node_id: NodeId) -> String {
        let Some(node) = self.nodes.get(node_id.0) else {
            return String::new();
        };
        match &node.node_type {
            NodeType::Text(text) => text.clone(),
            _ => node
                .children
                .iter()
                .map(|child| self.text_content(*child))
                .collect(),
        }
    }

    pub fn set_text_content(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        self.element_or_err(node_id, "textContent")?;
        for child in self.children(node_id).to_vec() {
            self.detach(child);
        }
        if !value.is_empty() {
            self.create_text(node_id, value.to_string());
        }
        Ok(())
    }

    pub(crate) fn collect_elements_dfs(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        for child in self.children(node_id) {
            if self.element(*child).is_some() {
                out.push(*child);
            }
            self.collect_elements_dfs(*child, out);
        }
    }
}

fn dataset_attr_name(key: &str) -> String {
    let mut out = String::from("data-");
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
