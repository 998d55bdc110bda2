//! Core logic – weighted selection, spin animation, groups and sharing.
//!
//! Nothing in this module depends on any TUI or rendering crate.
//! Randomness and time are injected so every algorithm is testable without
//! a real clock.

pub mod animator;
pub mod geometry;
pub mod group;
pub mod selector;
pub mod share;
pub mod store;
pub mod workflow;
