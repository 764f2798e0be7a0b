//! A stack of swipeable cards for the terminal.
//!
//! The [`core`] layer holds the gesture state machine and the transform math
//! and knows nothing about terminals.  The [`ui`] layer renders a deck into a
//! Ratatui buffer from that state, once per frame.

pub mod core;
pub mod ui;
