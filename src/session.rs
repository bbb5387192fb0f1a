//! Per-visitor presentation state. Nothing here is persisted; a session lives
//! as long as whatever front-end holds it and never touches `ContentStore`.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use crate::error::ParseEnumError;

/// Clicks on the disguised control needed to reveal the admin area.
pub const UNLOCK_CLICKS: u32 = 3;
/// Longest gap allowed between consecutive unlock clicks.
pub const UNLOCK_WINDOW: Duration = Duration::from_secs(5);

/// Public tabs, in navigation order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tab {
    #[default]
    Home,
    Music,
    Films,
    Events,
    Gallery,
    Press,
    Bookings,
    Contact,
    Subscribe,
}

impl Tab {
    pub const ALL: [Tab; 9] = [
        Tab::Home,
        Tab::Music,
        Tab::Films,
        Tab::Events,
        Tab::Gallery,
        Tab::Press,
        Tab::Bookings,
        Tab::Contact,
        Tab::Subscribe,
    ];

    /// Navigation label shown for the tab.
    pub fn label(self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Music => "Music",
            Tab::Films => "Films",
            Tab::Events => "Events",
            Tab::Gallery => "Gallery",
            Tab::Press => "Press",
            Tab::Bookings => "Bookings",
            Tab::Contact => "Contact",
            Tab::Subscribe => "Subscribe",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tab {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Tab::ALL
            .into_iter()
            .find(|tab| tab.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseEnumError::new("tab", trimmed))
    }
}

/// Counts clicks on the hidden admin control. Each click must land within
/// [`UNLOCK_WINDOW`] of the previous one or the count restarts.
#[derive(Debug, Clone, Default)]
pub struct AdminUnlock {
    clicks: u32,
    last_click: Option<Instant>,
}

impl AdminUnlock {
    /// Register a click at `now`. Returns `true` on the click that completes
    /// the gesture, after which the counter starts over.
    pub fn register_click(&mut self, now: Instant) -> bool {
        let within_window = self
            .last_click
            .is_some_and(|last| now.saturating_duration_since(last) < UNLOCK_WINDOW);

        self.clicks = if within_window { self.clicks + 1 } else { 1 };
        self.last_click = Some(now);

        if self.clicks >= UNLOCK_CLICKS {
            self.reset();
            true
        } else {
            false
        }
    }

    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    pub fn reset(&mut self) {
        self.clicks = 0;
        self.last_click = None;
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub active_tab: Tab,
    pub admin_unlocked: bool,
    unlock: AdminUnlock,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch the visible tab. Admin state is unaffected.
    pub fn select_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    /// Feed a click on the disguised control. Returns whether the admin area
    /// is unlocked afterwards.
    pub fn click_admin_control(&mut self, now: Instant) -> bool {
        if self.unlock.register_click(now) {
            self.admin_unlocked = true;
        }
        self.admin_unlocked
    }

    /// Lock the admin area again and forget any partial unlock gesture.
    pub fn logout(&mut self) {
        self.admin_unlocked = false;
        self.unlock.reset();
    }
}
