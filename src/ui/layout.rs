// src/ui/layout.rs
//! Layout computation for the dialog panes.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Computed areas of the picker dialog.
pub struct DialogLayout {
    /// Folder breadcrumb line.
    pub breadcrumb: Rect,
    /// Sortable file table.
    pub table: Rect,
    /// "Save as" input, save mode only.
    pub filename: Option<Rect>,
    /// Key hint line.
    pub hints: Rect,
}

/// Split the dialog area top to bottom: breadcrumb, table, optional
/// filename field, hint line.
pub fn compute_layout(area: Rect, save_mode: bool) -> DialogLayout {
    let mut constraints = vec![Constraint::Length(1), Constraint::Min(3)];
    if save_mode {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    if save_mode {
        DialogLayout {
            breadcrumb: chunks[0],
            table: chunks[1],
            filename: Some(chunks[2]),
            hints: chunks[3],
        }
    } else {
        DialogLayout {
            breadcrumb: chunks[0],
            table: chunks[1],
            filename: None,
            hints: chunks[2],
        }
    }
}

/// Centered overlay rectangle for modal prompts, clamped to the area.
pub fn centered_modal(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
