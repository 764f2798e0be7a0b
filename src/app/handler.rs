//! Input handling — maps key/mouse events and frame ticks to state mutations.

use std::time::Instant;

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use tracing::trace;

use swipe_deck::core::{PointerId, SwipeDirection};

use super::state::AppState;
use crate::config::Action;

/// The terminal reports a single mouse; it is always this pointer.
const MOUSE: PointerId = PointerId(0);

/// Process a key event.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    // Ctrl+c always quits.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };
    state.status_message = None;

    match action {
        Action::SwipeLeft => swipe(state, SwipeDirection::Left),
        Action::SwipeRight => swipe(state, SwipeDirection::Right),
        Action::Undo => {
            let direction = state.undo_direction;
            if !state.stack.animate_back_swipe(&mut state.deck, direction, 0.0) {
                state.status_message = Some("Nothing to undo".to_string());
            }
        }
        Action::Restart => {
            state.stack.snap_to(0);
            state.status_message = Some("Back to the first card".to_string());
        }
        Action::Quit => state.should_quit = true,
    }
}

fn swipe(state: &mut AppState, direction: SwipeDirection) {
    if !state.stack.animate_swipe(&state.deck, direction, 0.0) {
        state.status_message = Some("No more cards".to_string());
    }
}

/// Process a mouse event read at `at`.  Left-button press, drag and release
/// drive the front card; a press outside the deck pane is ignored.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent, at: Instant) {
    let timestamp = at.saturating_duration_since(state.started);
    let x = f32::from(mouse.column);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if point_in_rect(state.deck_area, mouse.column, mouse.row) {
                state.status_message = None;
                state.stack.pointer_down(&state.deck, MOUSE, x, timestamp);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            state.stack.pointer_move(&mut state.deck, MOUSE, x, timestamp);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if let Some(resolution) = state.stack.pointer_up(&mut state.deck, MOUSE, x, timestamp)
            {
                trace!("mouse release resolved to {resolution:?}");
            }
        }
        _ => {}
    }
}

/// Advance animations to `now`.  Called once per loop iteration, before
/// drawing.
pub fn advance_frame(state: &mut AppState, now: Instant) {
    let dt = now.saturating_duration_since(state.last_frame);
    state.last_frame = now;
    if let Some(swiped) = state.stack.tick(&mut state.deck, dt) {
        state.undo_direction = swiped.direction;
    }
}

fn point_in_rect(area: Rect, col: u16, row: u16) -> bool {
    col >= area.x
        && col < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}
