//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! This layer takes the *core* data structures and turns them into cells on
//! the terminal.  No storage I/O happens here.

pub mod dialog;
pub mod group_list;
pub mod layout;
pub mod spinner;
pub mod theme;
pub mod wheel;
