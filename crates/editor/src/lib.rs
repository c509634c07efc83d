//! Edit core of the WallSim3D construction editor.
//!
//! Snapshot-based undo/redo, an element clipboard with collision-free paste
//! placement, and the command surface (menu actions, shortcuts, JSON protocol)
//! on top of them. The scene engine, the UI and the quantity take-off are
//! reached through the traits in [`ports`].

pub mod command;
pub mod editor;
pub mod error;
pub mod fixtures;
pub mod harness;
pub mod keyboard;
pub mod notify;
pub mod ports;
pub mod state;
