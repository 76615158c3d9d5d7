use chapter_nav_core::{Msg, SyncConfig};
use chapter_nav_engine::{
    find_scroll_target, jump_to_latest, HostPage, ScraperPage, ScrollRecord, ScrollTarget,
    Synchronizer, SyntheticMutationFeed,
};
use pretty_assertions::assert_eq;

const NESTED: &str = r#"<html><body>
<div id="app" style="overflow-y: hidden" data-scroll-height="800" data-client-height="800">
  <div id="scroller" style="overflow-y: auto" data-scroll-height="3000" data-client-height="700">
    <div class="turn"><div class="select-text">first</div></div>
    <div class="turn"><div class="select-text">latest</div></div>
  </div>
</div>
</body></html>"#;

const FITTING: &str = r#"<html><body>
<div id="scroller" style="overflow: scroll" data-scroll-height="700" data-client-height="700">
  <div class="select-text">only</div>
</div>
</body></html>"#;

fn id_of(page: &ScraperPage, query: &str) -> ego_tree::NodeId {
    page.query_all(query).unwrap()[0]
}

#[test]
fn nearest_overflowing_scroll_container_wins() {
    let mut page = ScraperPage::parse(NESTED);
    let scroller = id_of(&page, "#scroller");

    let target = jump_to_latest(&mut page, ".select-text", 64).unwrap();

    assert_eq!(target, ScrollTarget::Container(scroller));
    assert_eq!(page.scroll_log(), &[ScrollRecord::ContainerToBottom(scroller)]);
}

#[test]
fn non_overflowing_container_falls_back_to_page() {
    let mut page = ScraperPage::parse(FITTING);

    let target = jump_to_latest(&mut page, ".select-text", 64).unwrap();

    assert_eq!(target, ScrollTarget::Page);
    assert_eq!(page.scroll_log(), &[ScrollRecord::PageToBottom]);
}

#[test]
fn ancestor_scan_respects_depth_cap() {
    let page = ScraperPage::parse(NESTED);
    let latest = page.query_all(".select-text").unwrap()[1];

    // Only the `.turn` wrapper is inspected.
    assert_eq!(find_scroll_target(&page, &latest, 1), ScrollTarget::Page);
    assert!(matches!(
        find_scroll_target(&page, &latest, 2),
        ScrollTarget::Container(_)
    ));
}

#[test]
fn no_messages_scrolls_the_page() {
    let mut page = ScraperPage::parse("<html><body></body></html>");
    let target = jump_to_latest(&mut page, ".select-text", 64).unwrap();
    assert_eq!(target, ScrollTarget::Page);
}

#[test]
fn jump_control_routes_through_the_synchronizer() {
    let mut sync = Synchronizer::with_manual_clock(
        SyncConfig::default(),
        ScraperPage::parse(NESTED),
        SyntheticMutationFeed::new(),
    );
    sync.start("www.perplexity.ai");
    sync.settle();
    let scroller = id_of(sync.page(), "#scroller");

    sync.dispatch(Msg::JumpToLatestClicked);

    assert_eq!(
        sync.page().scroll_log(),
        &[ScrollRecord::ContainerToBottom(scroller)]
    );
}
