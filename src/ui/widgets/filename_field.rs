// src/ui/widgets/filename_field.rs
//! "Save as" input below the table, save mode only.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render_filename_field(f: &mut Frame<'_>, area: Rect, value: &str, focused: bool) {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let mut spans = vec![Span::raw(value.to_string())];
    if focused {
        spans.push(Span::styled(
            "█",
            Style::default().add_modifier(Modifier::SLOW_BLINK),
        ));
    }
    let field = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title("Save as"),
    );
    f.render_widget(field, area);
}
