//! Chapter navigator engine: applies core effects to a host page through
//! the `HostPage`, `Scheduler` and `MutationFeed` seams.
mod mutation;
mod page;
mod schedule;
mod scraper_page;
mod scroll;
mod synchronizer;
pub mod widget;

pub use mutation::{MutationFeed, MutationSink, Subscription, SyntheticMutationFeed};
pub use page::{HostPage, Overflow, PageError, ScrollMetrics};
pub use schedule::{ManualScheduler, Scheduler, TimerId};
pub use scraper_page::{ScraperPage, ScrollRecord, SidebarChrome};
pub use scroll::{find_scroll_target, jump_to_latest, ScrollTarget};
pub use synchronizer::{Mailbox, NavigationEntry, Synchronizer};
