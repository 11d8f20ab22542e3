// src/ui/widgets/mod.rs
//! Widgets of the picker dialog.

pub mod breadcrumb;
pub mod file_table;
pub mod filename_field;
pub mod modal;

// Re-export widget rendering functions
pub use breadcrumb::render_breadcrumb;
pub use file_table::{format_modtime, render_file_table};
pub use filename_field::render_filename_field;
pub use modal::render_modal;
