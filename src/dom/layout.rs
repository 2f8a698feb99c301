use super::{Dom, NodeId};
use crate::Result;

// Layout is not computed; pages declare element metrics through
// `Page::set_layout` and scripts move `scroll_left` within them.
impl Dom {
    pub fn scroll_left(&self, node_id: NodeId) -> i64 {
        self.element(node_id)
            .map(|element| element.scroll.scroll_left)
            .unwrap_or_default()
    }

    pub fn client_width(&self, node_id: NodeId) -> i64 {
        self.element(node_id)
            .map(|element| element.scroll.client_width)
            .unwrap_or_default()
    }

    pub fn scroll_width(&self, node_id: NodeId) -> i64 {
        self.element(node_id)
            .map(|element| element.scroll.scroll_width)
            .unwrap_or_default()
    }

    pub fn set_layout(&mut self, node_id: NodeId, client_width: i64, scroll_width: i64) -> Result<()> {
        let element = self.element_mut_or_err(node_id, "layout")?;
        element.scroll.client_width = client_width.max(0);
        element.scroll.scroll_width = scroll_width.max(element.scroll.client_width);
        let max_left = element.scroll.scroll_width - element.scroll.client_width;
        element.scroll.scroll_left = element.scroll.scroll_left.clamp(0, max_left);
        Ok(())
    }

    /// Moves `scroll_left` to `left`, clamped to the scrollable range.
    /// Returns whether the position changed.
    pub fn scroll_to(&mut self, node_id: NodeId, left: i64) -> Result<bool> {
        let element = self.element_mut_or_err(node_id, "scroll")?;
        let max_left = (element.scroll.scroll_width - element.scroll.client_width).max(0);
        let next = left.clamp(0, max_left);
        let changed = next != element.scroll.scroll_left;
        element.scroll.scroll_left = next;
        Ok(changed)
    }

    pub fn scroll_by(&mut self, node_id: NodeId, delta: i64) -> Result<bool> {
        let current = self.scroll_left(node_id);
        self.scroll_to(node_id, current.saturating_add(delta))
    }
}
