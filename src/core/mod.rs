//! Core algorithms – swipe lifecycle, physics, and stacking transforms.
//!
//! Nothing in this module depends on any TUI or rendering crate.  Offsets
//! are in layout units (terminal columns when driven by the binary), times
//! are [`std::time::Duration`]s measured from an arbitrary origin.

pub mod config;
pub mod controller;
pub mod direction;
pub mod gesture;
pub mod motion;
pub mod policy;
pub mod provider;
pub mod saved;
pub mod state;
pub mod transform;
pub mod velocity;

pub use config::{ConfigError, SwipeConfig};
pub use controller::{CardStack, Swiped};
pub use direction::{calculate_ratio, SwipeDirection};
pub use gesture::PointerId;
pub use provider::{ItemProvider, ItemSource, SwipeItemProvider};
pub use saved::SavedState;
pub use transform::{CardTransform, StackGeometry};
