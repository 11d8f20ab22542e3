// src/ui/widgets/breadcrumb.rs
//! Folder breadcrumb line above the table.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    Frame,
};

/// Render the browsed path as `/ data / runs`, current folder bold.
pub fn render_breadcrumb(f: &mut Frame<'_>, area: Rect, segments: &[&str]) {
    let mut spans = vec![Span::raw("/ ")];
    for (i, segment) in segments.iter().enumerate() {
        let style = if i + 1 == segments.len() {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(segment.to_string(), style));
        spans.push(Span::raw(" / "));
    }
    f.render_widget(Line::from(spans), area);
}
