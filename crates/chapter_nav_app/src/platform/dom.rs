use chapter_nav_core::Msg;
use chapter_nav_engine::widget::{
    container_markup, rows_markup, toggle_glyph, COLLAPSED_CLASS, CONTAINER_ID, HEADER_ID,
    JUMP_ID, LIST_ID, ROW_CLASS, STYLESHEET, STYLE_ID, TOGGLE_ID,
};
use chapter_nav_engine::{HostPage, Overflow, PageError, ScrollMetrics};
use nav_logging::nav_debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlElement, MouseEvent, ScrollBehavior, ScrollIntoViewOptions,
    ScrollLogicalPosition, ScrollToOptions, Window,
};

use super::port::Port;

type ClickListener = Closure<dyn FnMut(MouseEvent)>;

/// The live document. Message elements are plain DOM handles.
pub struct WebPage {
    window: Window,
    document: Document,
    port: Port,
    listeners: Vec<ClickListener>,
}

impl WebPage {
    pub fn new(window: Window, document: Document, port: Port) -> Self {
        Self {
            window,
            document,
            port,
            listeners: Vec::new(),
        }
    }

    fn by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn html_by_id(&self, id: &str) -> Option<HtmlElement> {
        self.by_id(id)?.dyn_into::<HtmlElement>().ok()
    }

    fn install_stylesheet(&self, head: &Element) -> Result<(), PageError> {
        if self.by_id(STYLE_ID).is_some() {
            return Ok(());
        }
        let style = self.document.create_element("style").map_err(js_error)?;
        style.set_id(STYLE_ID);
        style.set_text_content(Some(STYLESHEET));
        head.append_child(&style).map_err(js_error)?;
        Ok(())
    }

    fn listen(&mut self, target: &Element, handler: impl FnMut(MouseEvent) + 'static) {
        let listener = ClickListener::new(handler);
        match target.add_event_listener_with_callback("click", listener.as_ref().unchecked_ref()) {
            Ok(()) => self.listeners.push(listener),
            Err(err) => nav_debug!("click listener not attached: {:?}", err),
        }
    }

    fn wire_controls(&mut self) {
        if let Some(header) = self.by_id(HEADER_ID) {
            let port = self.port.clone();
            self.listen(&header, move |_| port.post(Msg::HeaderClicked));
        }
        if let Some(jump) = self.by_id(JUMP_ID) {
            let port = self.port.clone();
            self.listen(&jump, move |event| {
                // The button sits inside the header; keep it from toggling.
                event.stop_propagation();
                port.post(Msg::JumpToLatestClicked);
            });
        }
        if let Some(list) = self.by_id(LIST_ID) {
            let port = self.port.clone();
            let rows = list.clone();
            self.listen(&list, move |event| {
                if let Some(row) = clicked_row(&rows, &event) {
                    event.stop_propagation();
                    port.post(Msg::EntryClicked { row });
                }
            });
        }
    }
}

fn clicked_row(list: &Element, event: &MouseEvent) -> Option<usize> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let button = target.closest(&format!(".{ROW_CLASS}")).ok()??;
    let rows = list.children();
    (0..rows.length()).find_map(|index| {
        let row = rows.item(index)?;
        (row == button).then_some(index as usize)
    })
}

fn js_error(err: JsValue) -> PageError {
    PageError::Unavailable(format!("{err:?}"))
}

impl HostPage for WebPage {
    type Element = Element;

    fn query_all(&self, query: &str) -> Result<Vec<Element>, PageError> {
        let nodes = self
            .document
            .query_selector_all(query)
            .map_err(|err| PageError::InvalidSelector {
                query: query.to_string(),
                message: format!("{err:?}"),
            })?;
        Ok((0..nodes.length())
            .filter_map(|index| nodes.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect())
    }

    fn text_of(&self, element: &Element) -> String {
        match element.dyn_ref::<HtmlElement>() {
            Some(html) => html.inner_text(),
            None => element.text_content().unwrap_or_default(),
        }
    }

    fn ensure_container(&mut self) -> Result<bool, PageError> {
        if self.by_id(CONTAINER_ID).is_some() {
            return Ok(false);
        }
        let body = self
            .document
            .body()
            .ok_or_else(|| PageError::Unavailable("document has no body".to_string()))?;
        match self.document.head() {
            Some(head) => self.install_stylesheet(&head)?,
            None => self.install_stylesheet(&body)?,
        }

        let scratch = self.document.create_element("div").map_err(js_error)?;
        scratch.set_inner_html(&container_markup());
        let container = scratch
            .first_element_child()
            .ok_or(PageError::ContainerMissing)?;
        body.append_child(&container).map_err(js_error)?;
        self.wire_controls();
        Ok(true)
    }

    fn rendered_rows(&self) -> Option<usize> {
        self.by_id(LIST_ID)
            .map(|list| list.child_element_count() as usize)
    }

    fn list_scroll(&self) -> Option<i32> {
        self.by_id(LIST_ID).map(|list| list.scroll_top())
    }

    fn set_list_scroll(&mut self, offset: i32) -> Result<(), PageError> {
        self.by_id(LIST_ID)
            .ok_or(PageError::ListMissing)?
            .set_scroll_top(offset);
        Ok(())
    }

    fn set_sidebar_visible(&mut self, visible: bool) -> Result<(), PageError> {
        let container = self
            .html_by_id(CONTAINER_ID)
            .ok_or(PageError::ContainerMissing)?;
        container
            .style()
            .set_property("display", if visible { "flex" } else { "none" })
            .map_err(js_error)
    }

    fn set_collapsed(&mut self, collapsed: bool) -> Result<(), PageError> {
        let container = self
            .by_id(CONTAINER_ID)
            .ok_or(PageError::ContainerMissing)?;
        container
            .class_list()
            .toggle_with_force(COLLAPSED_CLASS, collapsed)
            .map_err(js_error)?;
        if let Some(toggle) = self.by_id(TOGGLE_ID) {
            toggle.set_text_content(Some(toggle_glyph(collapsed)));
        }
        Ok(())
    }

    fn replace_rows(&mut self, labels: &[String]) -> Result<(), PageError> {
        let list = self.by_id(LIST_ID).ok_or(PageError::ListMissing)?;
        list.set_inner_html(&rows_markup(labels));
        Ok(())
    }

    fn scroll_into_center(&mut self, element: &Element) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Center);
        element.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn inline_background(&self, element: &Element) -> String {
        element
            .dyn_ref::<HtmlElement>()
            .and_then(|html| html.style().get_property_value("background-color").ok())
            .unwrap_or_default()
    }

    fn set_inline_background(&mut self, element: &Element, value: &str) {
        let Some(html) = element.dyn_ref::<HtmlElement>() else {
            return;
        };
        let style = html.style();
        let result = if value.is_empty() {
            style.remove_property("background-color").map(drop)
        } else {
            style.set_property("background-color", value)
        };
        if let Err(err) = result {
            nav_debug!("background not applied: {:?}", err);
        }
    }

    fn parent_of(&self, element: &Element) -> Option<Element> {
        element.parent_element()
    }

    fn scroll_metrics(&self, element: &Element) -> Option<ScrollMetrics> {
        let computed = self.window.get_computed_style(element).ok()??;
        let overflow_y = computed
            .get_property_value("overflow-y")
            .map(|value| Overflow::parse(&value))
            .unwrap_or_default();
        Some(ScrollMetrics {
            overflow_y,
            scroll_height: element.scroll_height(),
            client_height: element.client_height(),
        })
    }

    fn scroll_to_bottom(&mut self, element: &Element) {
        let options = ScrollToOptions::new();
        options.set_top(f64::from(element.scroll_height()));
        options.set_behavior(ScrollBehavior::Smooth);
        element.scroll_to_with_scroll_to_options(&options);
    }

    fn scroll_page_to_bottom(&mut self) {
        let height = self
            .document
            .document_element()
            .map(|root| root.scroll_height())
            .unwrap_or_default();
        let options = ScrollToOptions::new();
        options.set_top(f64::from(height));
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }
}
