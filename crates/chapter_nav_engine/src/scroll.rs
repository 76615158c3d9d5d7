use nav_logging::nav_debug;

use crate::{HostPage, PageError};

/// Where jump-to-latest ended up scrolling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollTarget<E> {
    /// Nearest scrollable ancestor of the latest message.
    Container(E),
    /// No such ancestor; the page itself.
    Page,
}

/// Walks up from `start` to the first ancestor that scrolls and overflows.
///
/// At most `max_depth` ancestors are inspected.
pub fn find_scroll_target<P: HostPage>(
    page: &P,
    start: &P::Element,
    max_depth: usize,
) -> ScrollTarget<P::Element> {
    let mut current = page.parent_of(start);
    let mut depth = 0;
    while let Some(ancestor) = current {
        if depth >= max_depth {
            nav_debug!("ancestor scan stopped at depth {}", depth);
            break;
        }
        if page
            .scroll_metrics(&ancestor)
            .is_some_and(|metrics| metrics.is_scroll_container())
        {
            return ScrollTarget::Container(ancestor);
        }
        current = page.parent_of(&ancestor);
        depth += 1;
    }
    ScrollTarget::Page
}

/// Scrolls the conversation holding the last match to its end.
///
/// With no matches the page itself is scrolled.
pub fn jump_to_latest<P: HostPage>(
    page: &mut P,
    query: &str,
    max_depth: usize,
) -> Result<ScrollTarget<P::Element>, PageError> {
    let matches = page.query_all(query)?;
    let target = match matches.last() {
        Some(last) => find_scroll_target(page, last, max_depth),
        None => ScrollTarget::Page,
    };
    match &target {
        ScrollTarget::Container(element) => page.scroll_to_bottom(element),
        ScrollTarget::Page => page.scroll_page_to_bottom(),
    }
    Ok(target)
}
