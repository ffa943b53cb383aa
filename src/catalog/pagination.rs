//! Pagination controls for the catalog listing.
//!
//! Wide terminals get numbered page buttons, narrow ones get an
//! infinite-scroll sentinel at the end of the list. The choice is made on
//! every render from the current width and never touches loaded state.

use crate::catalog::state::{CatalogState, FetchRequest, Phase};

/// Pages always shown at the start of the button bar
const LEFT_EDGE: u32 = 2;
/// Pages shown before the current one
const LEFT_CURRENT: u32 = 2;
/// Pages shown after the current one
const RIGHT_CURRENT: u32 = 4;
/// Pages always shown at the end of the button bar
const RIGHT_EDGE: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationStrategy {
    PageButtons,
    InfiniteScroll,
}

impl PaginationStrategy {
    /// Pick the control for a viewport `width` columns wide
    pub fn for_width(width: u16, breakpoint: u16) -> Self {
        if width < breakpoint {
            PaginationStrategy::InfiniteScroll
        } else {
            PaginationStrategy::PageButtons
        }
    }
}

/// One entry of the button bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot {
    Page(u32),
    Gap,
}

/// Windowed page-button bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageButtons {
    pub current: u32,
    pub total_pages: u32,
    pub slots: Vec<PageSlot>,
    pub prev: Option<u32>,
    pub next: Option<u32>,
}

impl PageButtons {
    pub fn new(current: u32, total_pages: u32) -> Self {
        if total_pages == 0 {
            return Self {
                current: 1,
                total_pages,
                slots: Vec::new(),
                prev: None,
                next: None,
            };
        }

        let current = current.clamp(1, total_pages);
        Self {
            current,
            total_pages,
            slots: window(total_pages, current),
            prev: (current > 1).then(|| current - 1),
            next: (current < total_pages).then(|| current + 1),
        }
    }

    pub fn from_state(state: &CatalogState) -> Self {
        Self::new(state.page(), state.total_pages())
    }

    /// Every page the bar can navigate to
    pub fn targets(&self) -> impl Iterator<Item = u32> + '_ {
        self.slots
            .iter()
            .filter_map(|slot| match slot {
                PageSlot::Page(p) => Some(*p),
                PageSlot::Gap => None,
            })
            .chain(self.prev)
            .chain(self.next)
    }
}

fn window(last: u32, current: u32) -> Vec<PageSlot> {
    let mut slots = Vec::new();

    let left_end = (1 + LEFT_EDGE).min(last + 1);
    slots.extend((1..left_end).map(PageSlot::Page));

    let mid_start = left_end.max(current.saturating_sub(LEFT_CURRENT));
    let mid_end = (current + RIGHT_CURRENT + 1).min(last + 1);
    if mid_start > left_end {
        slots.push(PageSlot::Gap);
    }
    slots.extend((mid_start..mid_end).map(PageSlot::Page));

    let right_start = mid_end.max(last.saturating_sub(RIGHT_EDGE) + 1);
    if right_start > mid_end {
        slots.push(PageSlot::Gap);
    }
    slots.extend((right_start..=last).map(PageSlot::Page));

    slots
}

/// Infinite-scroll trigger at the bottom of the list
pub struct Sentinel;

impl Sentinel {
    /// Whether the sentinel being on screen should fetch the next page.
    ///
    /// A failed fetch disarms the sentinel; only an explicit request for the
    /// next page retries it.
    pub fn should_load(visible: bool, state: &CatalogState) -> bool {
        visible && state.has_more() && !matches!(state.phase(), Phase::Loading | Phase::Error)
    }

    /// The append request to dispatch for this render, if any
    pub fn next_request(visible: bool, state: &mut CatalogState) -> Option<FetchRequest> {
        if !Self::should_load(visible, state) {
            return None;
        }
        state.load_more()
    }
}
