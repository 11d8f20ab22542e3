// src/app/state.rs
//! Picker session state and the event reducer.
//!
//! One `Picker` is one open dialog. The host feeds it discriminated input
//! events (key presses already mapped, RPC completions, clock ticks) and
//! applies the returned effects: RPC calls to queue, a resolved path to
//! hand to the caller, or a close. All session state lives here; nothing
//! is ambient, so several pickers can coexist in one process.

use std::time::Instant;

use log::{debug, error};

use crate::{
    cache::SessionCache,
    listing::{
        apply_extension, build_rows, default_filename, join_path, parent_path,
        sanitize_folder_name, sort_rows, Row, SortKey, SortState,
    },
    rpc::protocol::{ListFilesReply, RpcRequest, STATUS_OK},
    typeahead::{find_prefix_match, TypeAhead},
};

/// Load dialogs resolve a selected row; save dialogs resolve the typed
/// filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Load,
    Save,
}

/// Which part of the dialog receives printable keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Table,
    Filename,
}

/// Overlay shown on top of the table, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    Alert(String),
    NewFolder { input: String },
    ConfirmOverwrite { path: String },
}

/// Input events, one per user gesture or asynchronous completion.
#[derive(Debug, Clone)]
pub enum PickerEvent {
    ListingArrived { generation: u64, reply: ListFilesReply },
    RpcFailed { generation: u64, error: String },
    RowClicked(usize),
    RowDoubleClicked(usize),
    HeaderClicked(SortKey),
    CharTyped(char),
    Backspace,
    Tab,
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
    ConfirmPressed,
    CancelPressed,
    UpDirectory,
    NewFolderRequested,
    Tick,
}

/// Side effects for the host to carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Queue an RPC. Listing calls are tagged with the navigation
    /// generation so stale replies can be discarded.
    Rpc { tag: u64, request: RpcRequest },
    /// Hand the chosen sandbox-relative path to the caller.
    Resolve(String),
    /// Tear the dialog down; no further events will be dispatched.
    Close,
}

pub struct Picker {
    pub mode: Mode,
    /// Sandbox-relative directory currently browsed.
    pub path: String,
    /// Extension filter, `"*.json"` style.
    pub ext: String,
    pub rows: Vec<Row>,
    pub selected: Option<usize>,
    pub sort: SortState,
    pub typeahead: TypeAhead,
    /// Save-mode filename field.
    pub filename: String,
    pub focus: Focus,
    pub modal: Option<Modal>,
    pub allow_mkdir: bool,
    /// True while a listing for the current generation is outstanding.
    pub loading: bool,
    generation: u64,
    /// One automatic create-then-retry per navigation, never more.
    auto_created: bool,
    closed: bool,
}

impl Picker {
    /// Open a dialog rooted at `path`. Returns the session plus the
    /// initial listing effect.
    pub fn open(
        path: &str,
        ext: &str,
        mode: Mode,
        allow_mkdir: bool,
        cache: &SessionCache,
    ) -> (Self, Vec<Effect>) {
        let filename = match mode {
            Mode::Save => {
                let name = cache
                    .file_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| default_filename(ext));
                apply_extension(&name, ext)
            }
            Mode::Load => String::new(),
        };
        let mut picker = Self {
            mode,
            path: path.trim_matches('/').to_string(),
            ext: ext.to_string(),
            rows: Vec::new(),
            selected: None,
            sort: SortState::initial(),
            typeahead: TypeAhead::default(),
            filename,
            focus: match mode {
                Mode::Save => Focus::Filename,
                Mode::Load => Focus::Table,
            },
            modal: None,
            allow_mkdir,
            loading: false,
            generation: 0,
            auto_created: false,
            closed: false,
        };
        let effects = picker.request_listing();
        (picker, effects)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Breadcrumb segments of the current path, root first.
    pub fn breadcrumb(&self) -> Vec<&str> {
        self.path.split('/').filter(|s| !s.is_empty()).collect()
    }

    fn depth(&self) -> usize {
        self.breadcrumb().len()
    }

    fn request_listing(&mut self) -> Vec<Effect> {
        self.generation += 1;
        self.loading = true;
        self.selected = None;
        self.rows.clear();
        self.typeahead.clear();
        vec![Effect::Rpc {
            tag: self.generation,
            request: RpcRequest::ExtListFiles {
                subdir: self.path.clone(),
                fileext: self.ext.clone(),
            },
        }]
    }

    /// Re-query the listing for `path`. Idempotent: navigating to the
    /// current path just refreshes it.
    pub fn navigate(&mut self, path: &str) -> Vec<Effect> {
        self.path = path.trim_matches('/').to_string();
        self.auto_created = false;
        self.request_listing()
    }

    /// Single selection; re-selecting the same row is a no-op. In save
    /// mode a selected file's name is copied into the filename field.
    fn select(&mut self, index: usize) {
        if !matches!(self.rows.get(index), Some(Row::File { .. })) {
            return;
        }
        self.selected = Some(index);
        if self.mode == Mode::Save {
            if let Some(name) = self.rows[index].name() {
                self.filename = name.to_string();
            }
        }
    }

    fn selected_file_name(&self) -> Option<&str> {
        match self.selected.and_then(|i| self.rows.get(i)) {
            Some(Row::File { name, .. }) => Some(name),
            _ => None,
        }
    }

    pub fn dispatch(
        &mut self,
        event: PickerEvent,
        now: Instant,
        cache: &mut SessionCache,
    ) -> Vec<Effect> {
        if self.closed {
            return Vec::new();
        }
        match event {
            PickerEvent::ListingArrived { generation, reply } => self.on_listing(generation, reply),
            PickerEvent::RpcFailed { generation, error } => {
                if generation == self.generation {
                    self.loading = false;
                }
                error!("rpc failed (gen {}): {}", generation, error);
                Vec::new()
            }
            PickerEvent::RowClicked(i) => self.on_row_clicked(i, cache),
            PickerEvent::RowDoubleClicked(i) => {
                // select + confirm in one gesture
                self.select(i);
                if self.selected == Some(i) {
                    self.confirm_selected_row(cache)
                } else {
                    self.on_row_clicked(i, cache)
                }
            }
            PickerEvent::HeaderClicked(key) => {
                self.sort = self.sort.clicked(key);
                let keep = self.selected.map(|i| self.rows[i].display_name());
                sort_rows(&mut self.rows, self.sort);
                if let Some(name) = keep {
                    self.selected = self.rows.iter().position(|r| r.display_name() == name);
                }
                Vec::new()
            }
            PickerEvent::CharTyped(c) => self.on_char(c, now),
            PickerEvent::Backspace => {
                match &mut self.modal {
                    Some(Modal::NewFolder { input }) => {
                        input.pop();
                    }
                    None if self.focus == Focus::Filename => {
                        self.filename.pop();
                    }
                    _ => {}
                }
                Vec::new()
            }
            PickerEvent::Tab => {
                if self.mode == Mode::Save && self.modal.is_none() {
                    self.focus = match self.focus {
                        Focus::Table => Focus::Filename,
                        Focus::Filename => Focus::Table,
                    };
                }
                Vec::new()
            }
            PickerEvent::ArrowUp => {
                self.move_selection(-1);
                Vec::new()
            }
            PickerEvent::ArrowDown => {
                self.move_selection(1);
                Vec::new()
            }
            PickerEvent::Enter => self.on_enter(cache),
            PickerEvent::Escape => self.on_escape(cache),
            PickerEvent::ConfirmPressed => self.confirm(cache),
            PickerEvent::CancelPressed => self.close_cancelled(cache),
            PickerEvent::UpDirectory => {
                // Left in the filename field moves the cursor, not the
                // browsed folder.
                if self.modal.is_some() || self.focus == Focus::Filename {
                    return Vec::new();
                }
                match parent_path(&self.path) {
                    Some(parent) => {
                        cache.set_depth_dir(self.depth().saturating_sub(1));
                        self.navigate(&parent)
                    }
                    None => Vec::new(),
                }
            }
            PickerEvent::NewFolderRequested => {
                if self.allow_mkdir && self.modal.is_none() {
                    self.modal = Some(Modal::NewFolder {
                        input: "New Folder".to_string(),
                    });
                }
                Vec::new()
            }
            PickerEvent::Tick => {
                self.typeahead.tick(now);
                Vec::new()
            }
        }
    }

    fn on_listing(&mut self, generation: u64, reply: ListFilesReply) -> Vec<Effect> {
        if generation != self.generation {
            // A slow reply from before the last navigation; the rendered
            // path no longer matches it.
            debug!(
                "discarding stale listing (gen {} != {})",
                generation, self.generation
            );
            return Vec::new();
        }
        if reply.status != STATUS_OK {
            if !self.auto_created {
                // Missing directory: create it and query again, once.
                self.auto_created = true;
                let path = self.path.clone();
                let mut effects = self.mkdir_segments(&path);
                effects.extend(self.request_listing());
                return effects;
            }
            error!("listing of {:?} failed even after mkdir", self.path);
            self.loading = false;
            return Vec::new();
        }
        self.loading = false;
        self.rows = build_rows(&reply);
        self.sort = SortState::initial();
        sort_rows(&mut self.rows, self.sort);
        self.selected = None;
        Vec::new()
    }

    /// One make_subdir per accumulated path segment, shallow first.
    fn mkdir_segments(&self, path: &str) -> Vec<Effect> {
        let mut effects = Vec::new();
        let mut prefix = String::new();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            prefix = join_path(&prefix, segment);
            effects.push(Effect::Rpc {
                tag: self.generation,
                request: RpcRequest::MakeSubdir {
                    subdir: prefix.clone(),
                },
            });
        }
        effects
    }

    fn on_row_clicked(&mut self, index: usize, cache: &mut SessionCache) -> Vec<Effect> {
        if self.modal.is_some() {
            return Vec::new();
        }
        match self.rows.get(index) {
            Some(Row::Dir { name }) => {
                let next = join_path(&self.path, &name.clone());
                cache.set_depth_dir(self.depth() + 1);
                self.navigate(&next)
            }
            Some(Row::File { .. }) => {
                self.focus = Focus::Table;
                self.select(index);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn on_char(&mut self, c: char, now: Instant) -> Vec<Effect> {
        match &mut self.modal {
            Some(Modal::NewFolder { input }) => {
                input.push(c);
                return Vec::new();
            }
            Some(_) => return Vec::new(),
            None => {}
        }
        // Printable keys go to the filename field whenever it has focus.
        if self.focus == Focus::Filename {
            self.filename.push(c);
            return Vec::new();
        }
        if !c.is_alphanumeric() && !c.is_ascii_punctuation() {
            return Vec::new();
        }
        let prefix = self.typeahead.push(c, now).to_string();
        if let Some(found) = find_prefix_match(&self.rows, self.selected, &prefix) {
            self.selected = Some(found);
        }
        // On no match the previous selection stays highlighted while the
        // buffer keeps the extended sequence until it expires.
        Vec::new()
    }

    fn move_selection(&mut self, step: i64) {
        if self.modal.is_some() || self.rows.is_empty() {
            return;
        }
        self.focus = Focus::Table;
        let n = self.rows.len() as i64;
        let next = match self.selected {
            Some(i) => (i as i64 + step).rem_euclid(n),
            None => {
                if step > 0 {
                    0
                } else {
                    n - 1
                }
            }
        };
        self.selected = Some(next as usize);
    }

    fn on_enter(&mut self, cache: &mut SessionCache) -> Vec<Effect> {
        self.typeahead.clear();
        match self.modal.take() {
            Some(Modal::Alert(_)) => return Vec::new(),
            Some(Modal::NewFolder { input }) => return self.create_subdirectory(&input),
            Some(m @ Modal::ConfirmOverwrite { .. }) => {
                // decided by the host-driven save flow, not here
                self.modal = Some(m);
                return Vec::new();
            }
            None => {}
        }
        if self.focus == Focus::Filename {
            return self.confirm(cache);
        }
        match self.selected.and_then(|i| self.rows.get(i)) {
            Some(Row::Dir { name }) => {
                let next = join_path(&self.path, &name.clone());
                cache.set_depth_dir(self.depth() + 1);
                self.navigate(&next)
            }
            Some(Row::File { .. }) => self.confirm_selected_row(cache),
            _ => self.confirm(cache),
        }
    }

    fn on_escape(&mut self, cache: &mut SessionCache) -> Vec<Effect> {
        self.typeahead.clear();
        if self.modal.take().is_some() {
            return Vec::new();
        }
        self.close_cancelled(cache)
    }

    /// Resolve the dialog. Load mode needs a selected row; save mode needs
    /// a non-empty filename. Either failure warns and keeps the dialog up.
    pub fn confirm(&mut self, cache: &mut SessionCache) -> Vec<Effect> {
        match self.mode {
            Mode::Load => match self.selected_file_name() {
                Some(_) => self.confirm_selected_row(cache),
                None => {
                    self.modal = Some(Modal::Alert("Please select a file.".to_string()));
                    Vec::new()
                }
            },
            Mode::Save => {
                if self.filename.is_empty() {
                    self.modal = Some(Modal::Alert(
                        "Please select a file or provide a name.".to_string(),
                    ));
                    return Vec::new();
                }
                let chosen = join_path(&self.path, &self.filename.clone());
                let filename = self.filename.clone();
                cache.set_file_name(&filename);
                self.resolve(chosen, cache)
            }
        }
    }

    fn confirm_selected_row(&mut self, cache: &mut SessionCache) -> Vec<Effect> {
        match self.selected_file_name().map(str::to_string) {
            Some(name) => {
                if self.mode == Mode::Save {
                    self.filename = name.clone();
                }
                cache.set_file_name(&name);
                let chosen = join_path(&self.path, &name);
                self.resolve(chosen, cache)
            }
            None => self.confirm(cache),
        }
    }

    fn resolve(&mut self, path: String, cache: &mut SessionCache) -> Vec<Effect> {
        cache.clear_depth();
        self.closed = true;
        vec![Effect::Resolve(path), Effect::Close]
    }

    fn close_cancelled(&mut self, cache: &mut SessionCache) -> Vec<Effect> {
        cache.clear_depth();
        self.closed = true;
        vec![Effect::Close]
    }

    /// Create `name` under the current path and refresh. Escape attempts
    /// are stripped client-side; the server enforces the sandbox anyway.
    pub fn create_subdirectory(&mut self, name: &str) -> Vec<Effect> {
        let clean = sanitize_folder_name(name);
        if clean.is_empty() {
            return Vec::new();
        }
        let mut effects = vec![Effect::Rpc {
            tag: self.generation,
            request: RpcRequest::MakeSubdir {
                subdir: join_path(&self.path, &clean),
            },
        }];
        effects.extend(self.request_listing());
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::protocol::FileEntry;

    fn listing(files: &[(&str, u64, u64)], subdirs: &[&str]) -> ListFilesReply {
        ListFilesReply {
            status: STATUS_OK,
            files: files
                .iter()
                .map(|(n, m, s)| FileEntry {
                    filename: n.to_string(),
                    modtime: *m,
                    size: *s,
                })
                .collect(),
            subdirs: subdirs.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn open_load(path: &str, ext: &str) -> (Picker, SessionCache) {
        let cache = SessionCache::default();
        let (picker, effects) = Picker::open(path, ext, Mode::Load, false, &cache);
        assert!(matches!(
            effects.as_slice(),
            [Effect::Rpc {
                request: RpcRequest::ExtListFiles { .. },
                ..
            }]
        ));
        (picker, cache)
    }

    fn deliver(picker: &mut Picker, cache: &mut SessionCache, reply: ListFilesReply) {
        let generation = picker.generation();
        picker.dispatch(
            PickerEvent::ListingArrived { generation, reply },
            Instant::now(),
            cache,
        );
    }

    #[test]
    fn select_is_idempotent() {
        let (mut picker, mut cache) = open_load("data", "*.csv");
        deliver(
            &mut picker,
            &mut cache,
            listing(&[("b.csv", 1, 1), ("a.csv", 2, 2)], &[]),
        );
        let now = Instant::now();
        picker.dispatch(PickerEvent::RowClicked(0), now, &mut cache);
        picker.dispatch(PickerEvent::RowClicked(0), now, &mut cache);
        assert_eq!(picker.selected, Some(0));
    }

    #[test]
    fn stale_listing_is_discarded() {
        let (mut picker, mut cache) = open_load("data", "*");
        let stale = picker.generation();
        // navigate away before the first reply lands
        picker.navigate("data/runs");
        picker.dispatch(
            PickerEvent::ListingArrived {
                generation: stale,
                reply: listing(&[("old.csv", 1, 1)], &[]),
            },
            Instant::now(),
            &mut cache,
        );
        assert!(picker.rows.is_empty());
        assert!(picker.loading);
        deliver(&mut picker, &mut cache, listing(&[("new.csv", 1, 1)], &[]));
        assert_eq!(picker.rows[0].display_name(), "new.csv");
        assert!(!picker.loading);
    }

    #[test]
    fn missing_directory_is_created_then_retried_once() {
        let (mut picker, mut cache) = open_load("data/runs", "*");
        let generation = picker.generation();
        let effects = picker.dispatch(
            PickerEvent::ListingArrived {
                generation,
                reply: ListFilesReply::default(),
            },
            Instant::now(),
            &mut cache,
        );
        let mkdirs: Vec<_> = effects
            .iter()
            .filter_map(|e| match e {
                Effect::Rpc {
                    request: RpcRequest::MakeSubdir { subdir },
                    ..
                } => Some(subdir.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(mkdirs, ["data", "data/runs"]);
        assert!(matches!(
            effects.last(),
            Some(Effect::Rpc {
                request: RpcRequest::ExtListFiles { .. },
                ..
            })
        ));

        // a second failure only logs
        let generation = picker.generation();
        let effects = picker.dispatch(
            PickerEvent::ListingArrived {
                generation,
                reply: ListFilesReply::default(),
            },
            Instant::now(),
            &mut cache,
        );
        assert!(effects.is_empty());
    }

    #[test]
    fn double_click_resolves_load_dialog() {
        let (mut picker, mut cache) = open_load("data", "*.csv");
        deliver(&mut picker, &mut cache, listing(&[("a.csv", 100, 10)], &[]));
        let effects =
            picker.dispatch(PickerEvent::RowDoubleClicked(0), Instant::now(), &mut cache);
        assert_eq!(effects, vec![
            Effect::Resolve("data/a.csv".to_string()),
            Effect::Close,
        ]);
        assert!(picker.is_closed());
        assert_eq!(cache.file_name(), Some("a.csv"));
    }

    #[test]
    fn confirm_without_selection_warns_and_stays_open() {
        let (mut picker, mut cache) = open_load("data", "*.csv");
        deliver(&mut picker, &mut cache, listing(&[("a.csv", 1, 1)], &[]));
        let effects = picker.dispatch(PickerEvent::ConfirmPressed, Instant::now(), &mut cache);
        assert!(effects.is_empty());
        assert!(matches!(picker.modal, Some(Modal::Alert(_))));
        assert!(!picker.is_closed());
    }

    #[test]
    fn save_mode_defaults_filename_from_filter() {
        let cache = SessionCache::default();
        let (picker, _) = Picker::open("data", "*.json", Mode::Save, false, &cache);
        assert_eq!(picker.filename, "fname.json");
        assert_eq!(picker.focus, Focus::Filename);
    }

    #[test]
    fn save_mode_reuses_cached_filename_with_filter_extension() {
        let mut cache = SessionCache::default();
        cache.set_file_name("run7.csv");
        let (picker, _) = Picker::open("data", "*.json", Mode::Save, false, &cache);
        assert_eq!(picker.filename, "run7.json");
    }

    #[test]
    fn save_confirm_resolves_typed_path() {
        let mut cache = SessionCache::default();
        let (mut picker, effects) = Picker::open("data", "*.json", Mode::Save, false, &cache);
        assert_eq!(effects.len(), 1);
        deliver(&mut picker, &mut cache, listing(&[], &[]));
        picker.filename = "out.json".to_string();
        let effects = picker.dispatch(PickerEvent::ConfirmPressed, Instant::now(), &mut cache);
        assert_eq!(effects, vec![
            Effect::Resolve("data/out.json".to_string()),
            Effect::Close,
        ]);
        assert_eq!(cache.file_name(), Some("out.json"));
    }

    #[test]
    fn typeahead_sequence_walks_prefix_matches() {
        let (mut picker, mut cache) = open_load("data", "*.json");
        deliver(
            &mut picker,
            &mut cache,
            listing(&[("abc.json", 2, 1), ("abd.json", 1, 1)], &[]),
        );
        // modified-descending initial sort puts abc.json first
        assert_eq!(picker.rows[0].display_name(), "abc.json");
        let t0 = Instant::now();
        picker.dispatch(PickerEvent::CharTyped('a'), t0, &mut cache);
        assert_eq!(picker.selected, Some(0));
        picker.dispatch(PickerEvent::CharTyped('b'), t0, &mut cache);
        let name = picker.rows[picker.selected.unwrap()].display_name();
        assert!(name.starts_with("ab"));
    }

    #[test]
    fn typeahead_no_match_keeps_previous_selection() {
        let (mut picker, mut cache) = open_load("data", "*.json");
        deliver(&mut picker, &mut cache, listing(&[("abc.json", 1, 1)], &[]));
        let t0 = Instant::now();
        picker.dispatch(PickerEvent::CharTyped('a'), t0, &mut cache);
        assert_eq!(picker.selected, Some(0));
        picker.dispatch(PickerEvent::CharTyped('x'), t0, &mut cache);
        assert_eq!(picker.selected, Some(0));
        assert_eq!(picker.typeahead.buffer(), "ax");
    }

    #[test]
    fn arrows_wrap_without_touching_the_sequence() {
        let (mut picker, mut cache) = open_load("data", "*");
        deliver(
            &mut picker,
            &mut cache,
            listing(&[("a", 1, 1), ("b", 2, 1)], &[]),
        );
        let t0 = Instant::now();
        picker.dispatch(PickerEvent::CharTyped('a'), t0, &mut cache);
        let buffered = picker.typeahead.buffer().to_string();
        let before = picker.selected;
        picker.dispatch(PickerEvent::ArrowDown, t0, &mut cache);
        picker.dispatch(PickerEvent::ArrowDown, t0, &mut cache);
        assert_eq!(picker.typeahead.buffer(), buffered);
        assert_eq!(picker.selected, before);
    }

    #[test]
    fn clicking_a_directory_navigates_into_it() {
        let (mut picker, mut cache) = open_load("data", "*.csv");
        deliver(&mut picker, &mut cache, listing(&[], &["runs"]));
        let effects = picker.dispatch(PickerEvent::RowClicked(0), Instant::now(), &mut cache);
        assert_eq!(picker.path, "data/runs");
        assert_eq!(cache.depth_dir(), 2);
        assert!(matches!(
            effects.as_slice(),
            [Effect::Rpc {
                request: RpcRequest::ExtListFiles { subdir, .. },
                ..
            }] if subdir == "data/runs"
        ));
    }

    #[test]
    fn new_folder_name_is_sanitized_before_the_request() {
        let (mut picker, _cache) = open_load("data", "*");
        picker.allow_mkdir = true;
        let effects = picker.create_subdirectory("../esc/ape");
        assert!(matches!(
            effects.first(),
            Some(Effect::Rpc {
                request: RpcRequest::MakeSubdir { subdir },
                ..
            }) if subdir == "data/escape"
        ));
    }

    #[test]
    fn sort_keeps_selection_on_the_same_row() {
        let (mut picker, mut cache) = open_load("data", "*");
        deliver(
            &mut picker,
            &mut cache,
            listing(&[("b.csv", 1, 1), ("a.csv", 2, 2)], &[]),
        );
        let now = Instant::now();
        // modified-descending puts a.csv first
        picker.dispatch(PickerEvent::RowClicked(0), now, &mut cache);
        assert_eq!(picker.rows[0].display_name(), "a.csv");
        picker.dispatch(PickerEvent::HeaderClicked(SortKey::Name), now, &mut cache);
        let i = picker.selected.unwrap();
        assert_eq!(picker.rows[i].display_name(), "a.csv");
    }

    #[test]
    fn cancel_closes_without_resolving() {
        let (mut picker, mut cache) = open_load("data", "*");
        let effects = picker.dispatch(PickerEvent::CancelPressed, Instant::now(), &mut cache);
        assert_eq!(effects, vec![Effect::Close]);
        assert!(picker.is_closed());
    }
}
