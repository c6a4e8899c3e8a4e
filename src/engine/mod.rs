//! The state-transition engine: a pure reducer over [`AppState`].
//!
//! [`AppState`]: crate::domain::AppState

pub mod action;
pub mod collections;
pub mod gamification;
pub mod reducer;

pub use action::{Action, FocusRequest};
pub use reducer::{apply, apply_at};
