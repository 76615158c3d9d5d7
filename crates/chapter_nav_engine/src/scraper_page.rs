use std::collections::HashMap;

use ego_tree::{NodeId, NodeRef, Tree};
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

use crate::widget::{
    container_markup, rows_markup, toggle_glyph, CONTAINER_ID, LIST_ID, TOGGLE_ID,
};
use crate::{HostPage, Overflow, PageError, ScrollMetrics};

/// A scroll request recorded by [`ScraperPage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollRecord {
    CenteredOn(NodeId),
    ContainerToBottom(NodeId),
    PageToBottom,
}

/// Sidebar presentation state that has no markup of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidebarChrome {
    pub visible: bool,
    pub collapsed: bool,
    pub list_scroll: i32,
    /// Bumped every time the rows are replaced.
    pub row_generation: u64,
}

impl Default for SidebarChrome {
    fn default() -> Self {
        Self {
            visible: true,
            collapsed: false,
            list_scroll: 0,
            row_generation: 0,
        }
    }
}

/// In-memory host page over a parsed HTML document.
///
/// There is no layout engine, so scroll geometry comes from markup:
/// `overflow-y` (or `overflow`) in the inline `style` attribute, and
/// `data-scroll-height` / `data-client-height` for the extents.
pub struct ScraperPage {
    document: Html,
    chrome: SidebarChrome,
    backgrounds: HashMap<NodeId, String>,
    scroll_log: Vec<ScrollRecord>,
}

impl ScraperPage {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
            chrome: SidebarChrome::default(),
            backgrounds: HashMap::new(),
            scroll_log: Vec::new(),
        }
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    pub fn chrome(&self) -> SidebarChrome {
        self.chrome
    }

    pub fn scroll_log(&self) -> &[ScrollRecord] {
        &self.scroll_log
    }

    /// Number of elements matching `query` that are attached to the document.
    pub fn count(&self, query: &str) -> Result<usize, PageError> {
        Ok(self.query_all(query)?.len())
    }

    /// Text of every rendered row, in order.
    pub fn row_labels(&self) -> Vec<String> {
        let Some(list) = self.element_by_id(LIST_ID) else {
            return Vec::new();
        };
        self.document
            .tree
            .get(list)
            .into_iter()
            .flat_map(|node| node.children())
            .filter_map(ElementRef::wrap)
            .map(|row| row.text().collect::<String>())
            .collect()
    }

    /// Current toggle indicator text.
    pub fn toggle_indicator(&self) -> Option<String> {
        let id = self.element_by_id(TOGGLE_ID)?;
        let node = self.document.tree.get(id)?;
        ElementRef::wrap(node).map(|el| el.text().collect())
    }

    /// Appends `fragment` inside the first element matching `parent_query`.
    pub fn append_html(&mut self, parent_query: &str, fragment: &str) -> Result<(), PageError> {
        let parent = self
            .query_all(parent_query)?
            .into_iter()
            .next()
            .ok_or_else(|| PageError::Unavailable(format!("no element matches {parent_query:?}")))?;
        self.graft_fragment(parent, fragment);
        Ok(())
    }

    /// Detaches every element matching `query`; returns how many were removed.
    pub fn remove_matching(&mut self, query: &str) -> Result<usize, PageError> {
        let targets = self.query_all(query)?;
        for id in &targets {
            if let Some(mut node) = self.document.tree.get_mut(*id) {
                node.detach();
            }
        }
        Ok(targets.len())
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let selector = Selector::parse(&format!("#{id}")).ok()?;
        self.document
            .root_element()
            .select(&selector)
            .next()
            .map(|el| el.id())
    }

    fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.document.tree.get(id).and_then(ElementRef::wrap)
    }

    fn graft_fragment(&mut self, parent: NodeId, fragment: &str) {
        let parsed = Html::parse_fragment(fragment);
        for child in parsed.root_element().children() {
            graft(&mut self.document.tree, parent, child);
        }
    }

    fn clear_children(&mut self, parent: NodeId) {
        let children: Vec<NodeId> = match self.document.tree.get(parent) {
            Some(node) => node.children().map(|child| child.id()).collect(),
            None => return,
        };
        for child in children {
            if let Some(mut node) = self.document.tree.get_mut(child) {
                node.detach();
            }
        }
    }

    fn style_property(&self, id: NodeId, name: &str) -> Option<String> {
        let style = self.element(id)?.value().attr("style")?;
        style_property(style, name).map(str::to_owned)
    }

    fn data_i32(&self, id: NodeId, name: &str) -> i32 {
        self.element(id)
            .and_then(|el| el.value().attr(name))
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(0)
    }
}

impl HostPage for ScraperPage {
    type Element = NodeId;

    fn query_all(&self, query: &str) -> Result<Vec<NodeId>, PageError> {
        let selector = Selector::parse(query).map_err(|err| PageError::InvalidSelector {
            query: query.to_string(),
            message: format!("{err:?}"),
        })?;
        // Selecting from the root element skips detached nodes.
        Ok(self
            .document
            .root_element()
            .select(&selector)
            .map(|el| el.id())
            .collect())
    }

    fn text_of(&self, element: &NodeId) -> String {
        self.element(*element)
            .map(|el| el.text().collect())
            .unwrap_or_default()
    }

    fn ensure_container(&mut self) -> Result<bool, PageError> {
        if self.element_by_id(CONTAINER_ID).is_some() {
            return Ok(false);
        }
        let body = self
            .query_all("body")?
            .into_iter()
            .next()
            .ok_or_else(|| PageError::Unavailable("document has no body".to_string()))?;
        self.graft_fragment(body, &container_markup());
        self.chrome = SidebarChrome::default();
        Ok(true)
    }

    fn rendered_rows(&self) -> Option<usize> {
        let list = self.element_by_id(LIST_ID)?;
        let node = self.document.tree.get(list)?;
        Some(node.children().filter(|child| child.value().is_element()).count())
    }

    fn list_scroll(&self) -> Option<i32> {
        self.element_by_id(LIST_ID).map(|_| self.chrome.list_scroll)
    }

    fn set_list_scroll(&mut self, offset: i32) -> Result<(), PageError> {
        self.element_by_id(LIST_ID).ok_or(PageError::ListMissing)?;
        self.chrome.list_scroll = offset;
        Ok(())
    }

    fn set_sidebar_visible(&mut self, visible: bool) -> Result<(), PageError> {
        self.element_by_id(CONTAINER_ID)
            .ok_or(PageError::ContainerMissing)?;
        self.chrome.visible = visible;
        Ok(())
    }

    fn set_collapsed(&mut self, collapsed: bool) -> Result<(), PageError> {
        let toggle = self
            .element_by_id(TOGGLE_ID)
            .ok_or(PageError::ContainerMissing)?;
        self.clear_children(toggle);
        self.graft_fragment(toggle, toggle_glyph(collapsed));
        self.chrome.collapsed = collapsed;
        Ok(())
    }

    fn replace_rows(&mut self, labels: &[String]) -> Result<(), PageError> {
        let list = self.element_by_id(LIST_ID).ok_or(PageError::ListMissing)?;
        self.clear_children(list);
        self.graft_fragment(list, &rows_markup(labels));
        self.chrome.list_scroll = 0;
        self.chrome.row_generation += 1;
        Ok(())
    }

    fn scroll_into_center(&mut self, element: &NodeId) {
        self.scroll_log.push(ScrollRecord::CenteredOn(*element));
    }

    fn inline_background(&self, element: &NodeId) -> String {
        match self.backgrounds.get(element) {
            Some(value) => value.clone(),
            None => self
                .style_property(*element, "background-color")
                .unwrap_or_default(),
        }
    }

    fn set_inline_background(&mut self, element: &NodeId, value: &str) {
        self.backgrounds.insert(*element, value.to_string());
    }

    fn parent_of(&self, element: &NodeId) -> Option<NodeId> {
        let parent = self.document.tree.get(*element)?.parent()?;
        ElementRef::wrap(parent).map(|el| el.id())
    }

    fn scroll_metrics(&self, element: &NodeId) -> Option<ScrollMetrics> {
        self.element(*element)?;
        let overflow = self
            .style_property(*element, "overflow-y")
            .or_else(|| self.style_property(*element, "overflow"))
            .map(|value| Overflow::parse(&value))
            .unwrap_or_default();
        Some(ScrollMetrics {
            overflow_y: overflow,
            scroll_height: self.data_i32(*element, "data-scroll-height"),
            client_height: self.data_i32(*element, "data-client-height"),
        })
    }

    fn scroll_to_bottom(&mut self, element: &NodeId) {
        self.scroll_log.push(ScrollRecord::ContainerToBottom(*element));
    }

    fn scroll_page_to_bottom(&mut self) {
        self.scroll_log.push(ScrollRecord::PageToBottom);
    }
}

fn graft(tree: &mut Tree<Node>, parent: NodeId, source: NodeRef<'_, Node>) {
    let Some(mut parent_node) = tree.get_mut(parent) else {
        return;
    };
    let id = parent_node.append(source.value().clone()).id();
    for child in source.children() {
        graft(tree, id, child);
    }
}

/// Looks up `name` in an inline style declaration list.
fn style_property<'a>(style: &'a str, name: &str) -> Option<&'a str> {
    style.split(';').find_map(|decl| {
        let (key, value) = decl.split_once(':')?;
        key.trim()
            .eq_ignore_ascii_case(name)
            .then(|| value.trim())
    })
}

#[cfg(test)]
mod tests {
    use super::style_property;

    #[test]
    fn style_property_finds_declarations() {
        let style = "color: red; Overflow-Y : auto ;background-color:#fff";
        assert_eq!(style_property(style, "overflow-y"), Some("auto"));
        assert_eq!(style_property(style, "background-color"), Some("#fff"));
        assert_eq!(style_property(style, "margin"), None);
    }
}
