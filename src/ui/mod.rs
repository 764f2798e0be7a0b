//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! This layer takes the *core* card stack and turns it into cells on the
//! terminal.  It measures the stack as it draws, so the core always sees
//! the current viewport before the next input arrives.

pub mod card_stack;
pub mod layout;
pub mod theme;
