// src/ui/mod.rs
//! UI module - terminal rendering, layout and key handling.

pub mod keybindings;
pub mod layout;
pub mod tui;
pub mod widgets;

pub use tui::{run_load, run_save, DialogOptions};
