//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::time::Instant;

use chrono::{DateTime, Local};
use ratatui::layout::Rect;

use swipe_deck::core::{CardStack, ItemProvider, SwipeDirection, SwipeItemProvider};

use super::cards::Card;
use crate::config::AppConfig;

pub type Deck = SwipeItemProvider<Vec<Card>>;

/// The most recent committed swipe, as reported by the deck.
#[derive(Debug, Clone)]
pub struct SwipeRecord {
    pub caption: String,
    pub direction: SwipeDirection,
    pub at: DateTime<Local>,
}

/// Top-level application state.
pub struct AppState {
    /// Swipe state machine for the deck.
    pub stack: CardStack,
    /// The cards, behind the provider interface the stack consumes.
    pub deck: Deck,
    /// User-configurable keybindings and deck settings.
    pub config: AppConfig,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    pub last_swipe: Option<SwipeRecord>,
    /// Swipes committed this session.
    pub swipe_count: usize,
    /// Side an undone card flies back in from: that of the last commit.
    pub undo_direction: SwipeDirection,
    /// Deck pane from the last draw, for mouse hit-testing.
    pub deck_area: Rect,
    /// Origin for pointer timestamps.
    pub started: Instant,
    pub last_frame: Instant,
}

impl AppState {
    pub fn new(stack: CardStack, deck: Deck, config: AppConfig) -> Self {
        let now = Instant::now();
        Self {
            stack,
            deck,
            config,
            should_quit: false,
            status_message: None,
            last_swipe: None,
            swipe_count: 0,
            undo_direction: SwipeDirection::Right,
            deck_area: Rect::default(),
            started: now,
            last_frame: now,
        }
    }

    /// Remember a swipe delivered by the deck's `on_swiped` callback.
    pub fn record_swipe(&mut self, caption: String, direction: SwipeDirection) {
        self.swipe_count += 1;
        self.last_swipe = Some(SwipeRecord {
            caption,
            direction,
            at: Local::now(),
        });
    }

    /// Position and motion readout for the status bar.
    pub fn deck_summary(&self) -> String {
        let s = self.stack.state();
        let count = self.deck.count();
        let position = if self.stack.config().endless {
            format!("card #{}", s.selected_index() + 1)
        } else if s.selected_index() >= count {
            format!("done ({count} cards)")
        } else {
            format!("card {}/{count}", s.selected_index() + 1)
        };
        let mut summary = format!(
            "{position} | offset {:+.1} ratio {:+.2} {}",
            s.offset(),
            s.ratio(),
            s.swiping_direction().label()
        );
        if let Some(last) = &self.last_swipe {
            summary.push_str(&format!(
                " | {} {} at {}",
                last.direction.label(),
                last.caption,
                last.at.format("%H:%M:%S")
            ));
        }
        summary
    }
}
