// src/ui/widgets/file_table.rs
//! Sortable file table: Name / Modified / Size columns, single-row
//! selection, type-ahead prefix highlighting.

use chrono::DateTime;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Row as TableRow, Table, TableState},
    Frame,
};

use crate::{
    listing::{Row, SortKey, SortOrder, SortState},
    typeahead::highlight_len,
};

/// Epoch seconds rendered as a calendar timestamp, UTC.
pub fn format_modtime(secs: u64) -> String {
    DateTime::from_timestamp(secs as i64, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| secs.to_string())
}

fn header_cell(label: &str, key: SortKey, sort: SortState) -> Cell<'static> {
    // exactly one column carries the direction indicator
    let text = if sort.key == key {
        let arrow = match sort.order {
            SortOrder::Ascending => "▲",
            SortOrder::Descending => "▼",
        };
        format!("{} {}", label, arrow)
    } else {
        label.to_string()
    };
    Cell::from(text).style(Style::default().add_modifier(Modifier::BOLD))
}

fn name_cell(row: &Row, selected: bool, typed: &str) -> Cell<'static> {
    let name = row.display_name();
    if selected && !typed.is_empty() {
        if let Some(bare) = row.name() {
            let n = highlight_len(bare, typed);
            // dir brackets shift the highlighted span one to the right
            let split = if row.is_dir() { 1 + n } else { n };
            let head: String = name.chars().take(split).collect();
            let tail: String = name.chars().skip(split).collect();
            return Cell::from(Line::from(vec![
                Span::styled(
                    head,
                    Style::default()
                        .bg(Color::Yellow)
                        .fg(Color::Black)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(tail),
            ]));
        }
    }
    Cell::from(name)
}

/// Render the listing. `typed` is the live type-ahead sequence used to
/// highlight the matched prefix of the selected row.
pub fn render_file_table(
    f: &mut Frame<'_>,
    area: Rect,
    rows: &[Row],
    sort: SortState,
    selected: Option<usize>,
    typed: &str,
    loading: bool,
    state: &mut TableState,
) {
    let header = TableRow::new(vec![
        header_cell("Name", SortKey::Name, sort),
        header_cell("Modified", SortKey::Modified, sort),
        header_cell("Size", SortKey::Size, sort),
    ]);

    let body: Vec<TableRow> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let first = name_cell(row, selected == Some(i), typed);
            match row {
                Row::File { modtime, size, .. } => TableRow::new(vec![
                    first,
                    Cell::from(format_modtime(*modtime)),
                    Cell::from(size.to_string()),
                ]),
                _ => TableRow::new(vec![first, Cell::from(""), Cell::from("")]),
            }
        })
        .collect();

    let title = if loading { "Files (loading…)" } else { "Files" };
    let table = Table::new(
        body,
        [
            Constraint::Percentage(45),
            Constraint::Percentage(40),
            Constraint::Percentage(15),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(title))
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .highlight_symbol(">> ");

    state.select(selected);
    f.render_stateful_widget(table, area, state);
}
