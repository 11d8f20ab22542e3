// src/ui/widgets/modal.rs
//! Overlay prompts: alerts, the new-folder input and the overwrite
//! confirmation.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::Modal;
use crate::ui::layout::centered_modal;

pub fn render_modal(f: &mut Frame<'_>, area: Rect, modal: &Modal) {
    let (title, text) = match modal {
        Modal::Alert(message) => ("Message", format!("{}\n\n[Enter] OK", message)),
        Modal::NewFolder { input } => ("New folder", format!("{}█\n\n[Enter] Create  [Esc] Cancel", input)),
        Modal::ConfirmOverwrite { path } => (
            "Overwrite?",
            format!("File {} exists. Overwrite it?\n\n[y] Yes  [n] No", path),
        ),
    };
    let overlay = centered_modal(area, 60, 6);
    f.render_widget(Clear, overlay);
    let body = Paragraph::new(text).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title),
    );
    f.render_widget(body, overlay);
}
