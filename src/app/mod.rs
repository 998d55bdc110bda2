//! Application orchestration — state management, event loop plumbing, input
//! handling and the spin task.

pub mod event;
pub mod handler;
pub mod spin_runtime;
pub mod state;
