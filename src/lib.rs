//! Gamified personal productivity: notes, tasks, focus sessions and a
//! four-level planning hierarchy, driven by a pure reducer and persisted
//! as a single JSON snapshot.

pub mod app;
pub mod domain;
pub mod engine;
pub mod persistence;
pub mod report;
pub mod ticker;
