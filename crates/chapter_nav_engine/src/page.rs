use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("invalid selector {query:?}: {message}")]
    InvalidSelector { query: String, message: String },
    #[error("sidebar container is missing")]
    ContainerMissing,
    #[error("sidebar list region is missing")]
    ListMissing,
    #[error("document unavailable: {0}")]
    Unavailable(String),
}

/// Computed `overflow-y` of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    Clip,
    Auto,
    Scroll,
}

impl Overflow {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Overflow::Auto,
            "scroll" => Overflow::Scroll,
            "hidden" => Overflow::Hidden,
            "clip" => Overflow::Clip,
            _ => Overflow::Visible,
        }
    }

    pub fn scrolls(self) -> bool {
        matches!(self, Overflow::Auto | Overflow::Scroll)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollMetrics {
    pub overflow_y: Overflow,
    pub scroll_height: i32,
    pub client_height: i32,
}

impl ScrollMetrics {
    /// Independently scrollable and actually overflowing.
    pub fn is_scroll_container(&self) -> bool {
        self.overflow_y.scrolls() && self.scroll_height > self.client_height
    }
}

/// The rendered page as seen by the synchronizer.
///
/// Message elements are borrowed handles; implementations must tolerate
/// handles whose element has since been removed by the host page.
pub trait HostPage {
    type Element: Clone + PartialEq;

    /// All elements matching `query`, in document order.
    fn query_all(&self, query: &str) -> Result<Vec<Self::Element>, PageError>;
    fn text_of(&self, element: &Self::Element) -> String;

    /// Creates the sidebar container; returns `false` if it already existed.
    fn ensure_container(&mut self) -> Result<bool, PageError>;
    /// Number of rows in the list region, `None` if the region is gone.
    fn rendered_rows(&self) -> Option<usize>;
    fn list_scroll(&self) -> Option<i32>;
    fn set_list_scroll(&mut self, offset: i32) -> Result<(), PageError>;
    fn set_sidebar_visible(&mut self, visible: bool) -> Result<(), PageError>;
    fn set_collapsed(&mut self, collapsed: bool) -> Result<(), PageError>;
    /// Clears the list region and renders one clickable row per label.
    fn replace_rows(&mut self, labels: &[String]) -> Result<(), PageError>;

    /// Smooth-scrolls `element` to the vertical center of the viewport.
    fn scroll_into_center(&mut self, element: &Self::Element);
    /// Inline `background-color`; empty when unset.
    fn inline_background(&self, element: &Self::Element) -> String;
    fn set_inline_background(&mut self, element: &Self::Element, value: &str);

    /// Parent element, `None` once the document root is reached.
    fn parent_of(&self, element: &Self::Element) -> Option<Self::Element>;
    fn scroll_metrics(&self, element: &Self::Element) -> Option<ScrollMetrics>;
    /// Smooth-scrolls `element` to its maximum scroll extent.
    fn scroll_to_bottom(&mut self, element: &Self::Element);
    /// Smooth-scrolls the whole page to its maximum extent.
    fn scroll_page_to_bottom(&mut self);
}
