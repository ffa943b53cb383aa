//! Key-to-action mapping for the catalog browser.
//!
//! Converts raw `(KeyCode, KeyModifiers)` pairs into [`BrowseAction`]s so
//! that event handling stays a pure function of the key and the focus.

use iocraft::prelude::{KeyCode, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseAction {
    MoveUp,
    MoveDown,
    GoToTop,
    GoToBottom,
    PageUp,
    PageDown,

    /// Next page, or load more in infinite-scroll mode
    NextPage,
    PrevPage,
    JumpToPage(u32),

    FocusSearch,
    /// Leave the search box and search immediately
    SubmitSearch,
    ClearSearchAndExit,

    CycleSort,
    ToggleSortOrder,
    ClearFilters,
    Refresh,
    ToggleSidebar,
    DismissToast,

    Quit,
}

/// Map a key press. `None` lets the focused widget handle the key.
pub fn key_to_action(
    code: KeyCode,
    modifiers: KeyModifiers,
    search_focused: bool,
) -> Option<BrowseAction> {
    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') | KeyCode::Char('q') => Some(BrowseAction::Quit),
            KeyCode::Char('d') => Some(BrowseAction::PageDown),
            KeyCode::Char('u') => Some(BrowseAction::PageUp),
            _ => None,
        };
    }

    if search_focused {
        return match code {
            KeyCode::Enter | KeyCode::Tab => Some(BrowseAction::SubmitSearch),
            KeyCode::Esc => Some(BrowseAction::ClearSearchAndExit),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('j') | KeyCode::Down => Some(BrowseAction::MoveDown),
        KeyCode::Char('k') | KeyCode::Up => Some(BrowseAction::MoveUp),
        KeyCode::Char('g') | KeyCode::Home => Some(BrowseAction::GoToTop),
        KeyCode::Char('G') | KeyCode::End => Some(BrowseAction::GoToBottom),
        KeyCode::PageDown => Some(BrowseAction::PageDown),
        KeyCode::PageUp => Some(BrowseAction::PageUp),
        KeyCode::Char('n') | KeyCode::Right => Some(BrowseAction::NextPage),
        KeyCode::Char('p') | KeyCode::Left => Some(BrowseAction::PrevPage),
        KeyCode::Char(d @ '1'..='9') => d.to_digit(10).map(BrowseAction::JumpToPage),
        KeyCode::Char('/') => Some(BrowseAction::FocusSearch),
        KeyCode::Char('s') => Some(BrowseAction::CycleSort),
        KeyCode::Char('o') => Some(BrowseAction::ToggleSortOrder),
        KeyCode::Char('c') => Some(BrowseAction::ClearFilters),
        KeyCode::Char('r') => Some(BrowseAction::Refresh),
        KeyCode::Char('b') => Some(BrowseAction::ToggleSidebar),
        KeyCode::Esc => Some(BrowseAction::DismissToast),
        KeyCode::Char('q') => Some(BrowseAction::Quit),
        _ => None,
    }
}
