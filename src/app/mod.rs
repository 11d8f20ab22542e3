// src/app/mod.rs
//! Application module - picker session state and the event reducer.

pub mod state;

// Re-export the dialog types
pub use state::{Effect, Focus, Modal, Mode, Picker, PickerEvent};
