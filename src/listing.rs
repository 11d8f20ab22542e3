// src/listing.rs
//! Directory listing rows, extension filtering and column sorting.

use std::cmp::Ordering;

use crate::rpc::protocol::{FileEntry, ListFilesReply};

/// Text of the row shown when a listing comes back empty.
pub const NO_FILES_PLACEHOLDER: &str = "No files found!";

/// One rendered row of the picker table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    File {
        name: String,
        /// Modification time, epoch seconds.
        modtime: u64,
        /// Size in bytes.
        size: u64,
    },
    Dir {
        name: String,
    },
    /// Informational row ("No files found!"). Never selectable, never sorted.
    Placeholder {
        text: String,
    },
}

impl Row {
    /// Name used for type-ahead matching (without the dir brackets).
    pub fn name(&self) -> Option<&str> {
        match self {
            Row::File { name, .. } | Row::Dir { name } => Some(name),
            Row::Placeholder { .. } => None,
        }
    }

    /// Display text of the first column; subdirectories are bracket-wrapped.
    pub fn display_name(&self) -> String {
        match self {
            Row::File { name, .. } => name.clone(),
            Row::Dir { name } => format!("[{}]", name),
            Row::Placeholder { text } => text.clone(),
        }
    }

    /// Only well-formed file rows take part in the sort comparison.
    pub fn is_sortable(&self) -> bool {
        matches!(self, Row::File { .. })
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Row::Dir { .. })
    }
}

/// Column to sort the table on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Modified,
    Size,
}

impl SortKey {
    /// Direction used when a column is clicked for the first time.
    /// Modified defaults to most-recent-first, the others to ascending.
    pub fn default_order(self) -> SortOrder {
        match self {
            SortKey::Modified => SortOrder::Descending,
            SortKey::Name | SortKey::Size => SortOrder::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// Current sort column and direction. Exactly one column carries the
/// direction indicator at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub order: SortOrder,
}

impl SortState {
    /// Sort applied to every fresh listing: modification time, newest first.
    pub fn initial() -> Self {
        Self {
            key: SortKey::Modified,
            order: SortOrder::Descending,
        }
    }

    /// Header click: repeat click toggles direction, a different column
    /// switches to that column's default direction.
    pub fn clicked(self, key: SortKey) -> Self {
        if key == self.key {
            Self {
                key,
                order: self.order.flipped(),
            }
        } else {
            Self {
                key,
                order: key.default_order(),
            }
        }
    }
}

/// Merge a listing reply into rows: subdirectories first (bracket-marked),
/// then files, then a placeholder if both were empty.
pub fn build_rows(reply: &ListFilesReply) -> Vec<Row> {
    let mut rows: Vec<Row> = reply
        .subdirs
        .iter()
        .map(|name| Row::Dir { name: name.clone() })
        .collect();
    rows.extend(reply.files.iter().map(|f: &FileEntry| Row::File {
        name: f.filename.clone(),
        modtime: f.modtime,
        size: f.size,
    }));
    if rows.is_empty() {
        rows.push(Row::Placeholder {
            text: NO_FILES_PLACEHOLDER.to_string(),
        });
    }
    rows
}

/// Reorder file rows in place. Non-sortable rows (subdirectories, the
/// placeholder) keep their exact indices; file rows are permuted across
/// the index slots they already occupy.
pub fn sort_rows(rows: &mut [Row], sort: SortState) {
    let slots: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, r)| r.is_sortable())
        .map(|(i, _)| i)
        .collect();

    let mut files: Vec<Row> = slots.iter().map(|&i| rows[i].clone()).collect();
    files.sort_by(|a, b| compare_files(a, b, sort.key));
    if sort.order == SortOrder::Descending {
        files.reverse();
    }

    for (slot, row) in slots.into_iter().zip(files) {
        rows[slot] = row;
    }
}

fn compare_files(a: &Row, b: &Row, key: SortKey) -> Ordering {
    match (a, b) {
        (
            Row::File {
                name: an,
                modtime: am,
                size: asz,
            },
            Row::File {
                name: bn,
                modtime: bm,
                size: bsz,
            },
        ) => match key {
            SortKey::Name => an.to_lowercase().cmp(&bn.to_lowercase()),
            SortKey::Modified => am.cmp(bm),
            SortKey::Size => asz.cmp(bsz),
        },
        _ => Ordering::Equal,
    }
}

/// Extension filter match, `"*.json"` style. `"*"`, `"*.*"` and the empty
/// pattern accept everything; a pattern without a wildcard must match the
/// whole name. Comparison is case-insensitive.
pub fn ext_matches(pattern: &str, name: &str) -> bool {
    if pattern.is_empty() || pattern == "*" || pattern == "*.*" {
        return true;
    }
    match pattern.strip_prefix('*') {
        Some(suffix) => name.to_lowercase().ends_with(&suffix.to_lowercase()),
        None => name.eq_ignore_ascii_case(pattern),
    }
}

/// Bare extension from a filter pattern: `"*.json"` -> `"json"`,
/// `"*.*"`/`"*"` -> `""`.
pub fn filter_extension(pattern: &str) -> &str {
    if pattern == "*.*" || pattern == "*" {
        return "";
    }
    match pattern.find('.') {
        Some(i) => &pattern[i + 1..],
        None => "",
    }
}

/// Default save filename for a filter, e.g. `"fname.json"` for `"*.json"`.
pub fn default_filename(pattern: &str) -> String {
    let ext = filter_extension(pattern);
    if ext.is_empty() {
        "fname.".to_string()
    } else {
        format!("fname.{}", ext)
    }
}

/// Force `name` to carry the filter's extension, keeping the stem.
pub fn apply_extension(name: &str, pattern: &str) -> String {
    let ext = filter_extension(pattern);
    match name.find('.') {
        Some(i) => format!("{}.{}", &name[..i], ext),
        None if !ext.is_empty() => format!("{}.{}", name, ext),
        None => name.to_string(),
    }
}

/// Join a sandbox-relative directory and a name, collapsing any doubled
/// slashes left over from trailing separators.
pub fn join_path(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        return name.to_string();
    }
    let mut joined = format!("{}/{}", dir, name);
    while joined.contains("//") {
        joined = joined.replace("//", "/");
    }
    joined
}

/// Parent of a sandbox-relative path, `None` at the root.
pub fn parent_path(path: &str) -> Option<String> {
    let trimmed = path.trim_end_matches('/');
    trimmed.rfind('/').map(|i| trimmed[..i].to_string())
}

/// Sanitize a new-folder name: `..` segments and embedded slashes are
/// stripped before the request goes out. The server stays authoritative.
pub fn sanitize_folder_name(name: &str) -> String {
    name.replace("..", "").replace(['/', '\\'], "").trim().to_string()
}
