// src/files.rs
//! Caller-facing load/save flows.
//!
//! Each flow is a small reducer the host drives with RPC completions:
//! saving checks for an existing file first and asks for overwrite
//! confirmation, loading checks existence before reading. The gap between
//! the existence check and the actual write is a check-then-act race the
//! server resolves last-write-wins; the flows make no attempt to close it.

use log::error;

use crate::rpc::protocol::{RpcReply, RpcRequest, STATUS_OK};

/// What a flow asks the host to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEffect {
    Rpc(RpcRequest),
    /// Ask the user whether to overwrite the named file; answer comes
    /// back as `FlowEvent::OverwriteDecision`.
    AskOverwrite(String),
    /// User-facing alert; the flow is over.
    Warn(String),
    Done(FlowOutcome),
}

/// Input to a running flow.
#[derive(Debug, Clone)]
pub enum FlowEvent {
    Reply(RpcReply),
    Failed(String),
    OverwriteDecision(bool),
}

/// Terminal state of a flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    Saved(String),
    Loaded(String),
    LoadedBinary(Vec<u8>),
    /// Overwrite declined; nothing was written.
    Cancelled,
    NotFound,
    Failed,
}

/// Split a full sandbox-relative filename into (directory, bare name,
/// `"*.<ext>"` filter), the shape the existence check needs.
fn split_target(filename: &str) -> (String, String, String) {
    let (dir, name) = match filename.rfind('/') {
        Some(i) => (filename[..i].to_string(), filename[i + 1..].to_string()),
        None => (String::new(), filename.to_string()),
    };
    let ext = match name.rfind('.') {
        Some(i) => format!("*{}", &name[i..]),
        None => "*".to_string(),
    };
    (dir, name, ext)
}

fn list_request(dir: &str, ext: &str) -> RpcRequest {
    RpcRequest::ExtListFiles {
        subdir: dir.to_string(),
        fileext: ext.to_string(),
    }
}

/// Per-segment make_subdir requests for a directory path, shallow first.
fn mkdir_requests(dir: &str) -> Vec<FlowEffect> {
    let mut out = Vec::new();
    let mut prefix = String::new();
    for segment in dir.split('/').filter(|s| !s.is_empty()) {
        if prefix.is_empty() {
            prefix = segment.to_string();
        } else {
            prefix = format!("{}/{}", prefix, segment);
        }
        out.push(FlowEffect::Rpc(RpcRequest::MakeSubdir {
            subdir: prefix.clone(),
        }));
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaveState {
    CheckingExists,
    AwaitingDecision,
    Saving,
    Finished,
}

/// Save plain-text content to a sandbox-relative path, with the
/// existence check / overwrite confirmation in front of the write.
pub struct SaveAscii {
    filename: String,
    text: String,
    /// Message surfaced on success, if any.
    alert: Option<String>,
    dir: String,
    name: String,
    state: SaveState,
}

impl SaveAscii {
    pub fn start(
        filename: &str,
        text: &str,
        alert: Option<String>,
    ) -> Result<(Self, Vec<FlowEffect>), FlowEffect> {
        if filename.is_empty() {
            return Err(FlowEffect::Warn(
                "Illegal empty file name! Please provide a file name.".to_string(),
            ));
        }
        let (dir, name, ext) = split_target(filename);
        let effects = vec![FlowEffect::Rpc(list_request(&dir, &ext))];
        Ok((
            Self {
                filename: filename.to_string(),
                text: text.to_string(),
                alert,
                dir,
                name,
                state: SaveState::CheckingExists,
            },
            effects,
        ))
    }

    fn save_request(&self) -> FlowEffect {
        FlowEffect::Rpc(RpcRequest::ExtSaveFile {
            filename: self.filename.clone(),
            script: self.text.clone(),
        })
    }

    pub fn on_event(&mut self, event: FlowEvent) -> Vec<FlowEffect> {
        match (self.state, event) {
            (SaveState::CheckingExists, FlowEvent::Reply(RpcReply::ListFiles(reply))) => {
                if reply.status != STATUS_OK {
                    // Target directory is missing: create it and write
                    // straight away, the file cannot exist yet.
                    self.state = SaveState::Saving;
                    let mut effects = mkdir_requests(&self.dir);
                    effects.push(self.save_request());
                    return effects;
                }
                let exists = reply.files.iter().any(|f| f.filename == self.name);
                if exists {
                    self.state = SaveState::AwaitingDecision;
                    vec![FlowEffect::AskOverwrite(self.filename.clone())]
                } else {
                    self.state = SaveState::Saving;
                    vec![self.save_request()]
                }
            }
            (SaveState::AwaitingDecision, FlowEvent::OverwriteDecision(true)) => {
                self.state = SaveState::Saving;
                vec![self.save_request()]
            }
            (SaveState::AwaitingDecision, FlowEvent::OverwriteDecision(false)) => {
                self.state = SaveState::Finished;
                vec![FlowEffect::Done(FlowOutcome::Cancelled)]
            }
            (SaveState::Saving, FlowEvent::Reply(RpcReply::SaveFile(reply))) => {
                self.state = SaveState::Finished;
                if reply.status != STATUS_OK {
                    error!(
                        "cannot save {}: {}",
                        self.filename,
                        reply.error.as_deref().unwrap_or("unknown error")
                    );
                    return vec![FlowEffect::Done(FlowOutcome::Failed)];
                }
                let mut effects = Vec::new();
                if let Some(alert) = &self.alert {
                    effects.push(FlowEffect::Warn(alert.clone()));
                }
                effects.push(FlowEffect::Done(FlowOutcome::Saved(self.filename.clone())));
                effects
            }
            // mkdir acknowledgements while saving need no reaction
            (SaveState::Saving, FlowEvent::Reply(RpcReply::MakeSubdir(_))) => Vec::new(),
            (_, FlowEvent::Failed(err)) => {
                self.state = SaveState::Finished;
                error!("save of {} failed: {}", self.filename, err);
                vec![FlowEffect::Done(FlowOutcome::Failed)]
            }
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadState {
    CheckingExists,
    Reading,
    Finished,
}

/// Load plain-text content from a sandbox-relative path.
pub struct LoadAscii {
    filename: String,
    name: String,
    state: LoadState,
}

impl LoadAscii {
    pub fn start(filename: &str) -> Result<(Self, Vec<FlowEffect>), FlowEffect> {
        if filename.is_empty() {
            return Err(FlowEffect::Warn(
                "Illegal empty file name! Please provide a file name.".to_string(),
            ));
        }
        let (dir, name, ext) = split_target(filename);
        let effects = vec![FlowEffect::Rpc(list_request(&dir, &ext))];
        Ok((
            Self {
                filename: filename.to_string(),
                name,
                state: LoadState::CheckingExists,
            },
            effects,
        ))
    }

    pub fn on_event(&mut self, event: FlowEvent) -> Vec<FlowEffect> {
        match (self.state, event) {
            (LoadState::CheckingExists, FlowEvent::Reply(RpcReply::ListFiles(reply))) => {
                let exists = reply.status == STATUS_OK
                    && reply.files.iter().any(|f| f.filename == self.name);
                if !exists {
                    self.state = LoadState::Finished;
                    return vec![FlowEffect::Done(FlowOutcome::NotFound)];
                }
                self.state = LoadState::Reading;
                vec![FlowEffect::Rpc(RpcRequest::ExtReadFile {
                    filename: self.filename.clone(),
                })]
            }
            (LoadState::Reading, FlowEvent::Reply(RpcReply::ReadFile(reply))) => {
                self.state = LoadState::Finished;
                if reply.status != STATUS_OK {
                    let err = reply.error.as_deref().unwrap_or("unknown error");
                    error!("cannot read {}: {}", self.filename, err);
                    return vec![FlowEffect::Warn(format!(
                        "Cannot read file, error: {}",
                        err
                    ))];
                }
                vec![FlowEffect::Done(FlowOutcome::Loaded(reply.content))]
            }
            (_, FlowEvent::Failed(err)) => {
                self.state = LoadState::Finished;
                error!("load of {} failed: {}", self.filename, err);
                vec![FlowEffect::Done(FlowOutcome::Failed)]
            }
            _ => Vec::new(),
        }
    }
}

/// Binary variant of [`LoadAscii`], over `read_binary_file`.
pub struct LoadBinary {
    filename: String,
    name: String,
    state: LoadState,
}

impl LoadBinary {
    pub fn start(filename: &str) -> Result<(Self, Vec<FlowEffect>), FlowEffect> {
        if filename.is_empty() {
            return Err(FlowEffect::Warn(
                "Illegal empty file name! Please provide a file name.".to_string(),
            ));
        }
        let (dir, name, ext) = split_target(filename);
        let effects = vec![FlowEffect::Rpc(list_request(&dir, &ext))];
        Ok((
            Self {
                filename: filename.to_string(),
                name,
                state: LoadState::CheckingExists,
            },
            effects,
        ))
    }

    pub fn on_event(&mut self, event: FlowEvent) -> Vec<FlowEffect> {
        match (self.state, event) {
            (LoadState::CheckingExists, FlowEvent::Reply(RpcReply::ListFiles(reply))) => {
                let exists = reply.status == STATUS_OK
                    && reply.files.iter().any(|f| f.filename == self.name);
                if !exists {
                    self.state = LoadState::Finished;
                    return vec![FlowEffect::Done(FlowOutcome::NotFound)];
                }
                self.state = LoadState::Reading;
                vec![FlowEffect::Rpc(RpcRequest::ReadBinaryFile {
                    filename: self.filename.clone(),
                })]
            }
            (LoadState::Reading, FlowEvent::Reply(RpcReply::Binary(bytes))) => {
                self.state = LoadState::Finished;
                if bytes.is_empty() {
                    error!("cannot read {} or file is empty", self.filename);
                    return vec![FlowEffect::Done(FlowOutcome::Failed)];
                }
                vec![FlowEffect::Done(FlowOutcome::LoadedBinary(bytes))]
            }
            (_, FlowEvent::Failed(err)) => {
                self.state = LoadState::Finished;
                error!("load of {} failed: {}", self.filename, err);
                vec![FlowEffect::Done(FlowOutcome::Failed)]
            }
            _ => Vec::new(),
        }
    }
}

/// Parse loaded content as JSON; callers surface the parse error verbatim
/// in an alert instead of applying anything partially.
pub fn parse_json_content(content: &str) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::from_str(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::ext_matches;
    use crate::rpc::protocol::{FileEntry, ListFilesReply, ReadFileReply, SaveFileReply};

    fn listing_with(names: &[&str]) -> RpcReply {
        RpcReply::ListFiles(ListFilesReply {
            status: STATUS_OK,
            files: names
                .iter()
                .map(|n| FileEntry {
                    filename: n.to_string(),
                    modtime: 0,
                    size: 0,
                })
                .collect(),
            subdirs: Vec::new(),
        })
    }

    #[test]
    fn split_target_extracts_dir_name_and_filter() {
        let (dir, name, ext) = split_target("data/runs/out.json");
        assert_eq!(dir, "data/runs");
        assert_eq!(name, "out.json");
        assert_eq!(ext, "*.json");
        assert!(ext_matches(&ext, &name));
    }

    #[test]
    fn empty_filename_aborts_before_any_rpc() {
        assert!(matches!(
            SaveAscii::start("", "x", None),
            Err(FlowEffect::Warn(_))
        ));
        assert!(matches!(LoadAscii::start(""), Err(FlowEffect::Warn(_))));
    }

    #[test]
    fn save_asks_before_overwriting() {
        let (mut flow, effects) = SaveAscii::start("data/out.json", "{}", None).unwrap();
        assert!(matches!(
            effects.as_slice(),
            [FlowEffect::Rpc(RpcRequest::ExtListFiles { subdir, fileext })]
                if subdir == "data" && fileext == "*.json"
        ));

        let effects = flow.on_event(FlowEvent::Reply(listing_with(&["out.json"])));
        assert_eq!(effects, vec![FlowEffect::AskOverwrite(
            "data/out.json".to_string()
        )]);
    }

    #[test]
    fn declined_overwrite_sends_no_save_rpc() {
        let (mut flow, _) = SaveAscii::start("data/out.json", "{}", None).unwrap();
        flow.on_event(FlowEvent::Reply(listing_with(&["out.json"])));
        let effects = flow.on_event(FlowEvent::OverwriteDecision(false));
        assert_eq!(effects, vec![FlowEffect::Done(FlowOutcome::Cancelled)]);
    }

    #[test]
    fn accepted_overwrite_saves() {
        let (mut flow, _) = SaveAscii::start("data/out.json", "{}", None).unwrap();
        flow.on_event(FlowEvent::Reply(listing_with(&["out.json"])));
        let effects = flow.on_event(FlowEvent::OverwriteDecision(true));
        assert!(matches!(
            effects.as_slice(),
            [FlowEffect::Rpc(RpcRequest::ExtSaveFile { filename, script })]
                if filename == "data/out.json" && script == "{}"
        ));
        let effects = flow.on_event(FlowEvent::Reply(RpcReply::SaveFile(SaveFileReply {
            status: STATUS_OK,
            error: None,
        })));
        assert_eq!(
            effects,
            vec![FlowEffect::Done(FlowOutcome::Saved(
                "data/out.json".to_string()
            ))]
        );
    }

    #[test]
    fn absent_file_saves_without_asking() {
        let (mut flow, _) = SaveAscii::start("data/out.json", "{}", None).unwrap();
        let effects = flow.on_event(FlowEvent::Reply(listing_with(&["other.json"])));
        assert!(matches!(
            effects.as_slice(),
            [FlowEffect::Rpc(RpcRequest::ExtSaveFile { .. })]
        ));
    }

    #[test]
    fn missing_directory_is_created_before_the_write() {
        let (mut flow, _) = SaveAscii::start("data/runs/out.json", "{}", None).unwrap();
        let effects = flow.on_event(FlowEvent::Reply(RpcReply::ListFiles(
            ListFilesReply::default(),
        )));
        assert!(matches!(
            effects.as_slice(),
            [
                FlowEffect::Rpc(RpcRequest::MakeSubdir { .. }),
                FlowEffect::Rpc(RpcRequest::MakeSubdir { .. }),
                FlowEffect::Rpc(RpcRequest::ExtSaveFile { .. }),
            ]
        ));
    }

    #[test]
    fn success_alert_is_surfaced() {
        let (mut flow, _) =
            SaveAscii::start("data/out.json", "{}", Some("Saved!".to_string())).unwrap();
        flow.on_event(FlowEvent::Reply(listing_with(&[])));
        let effects = flow.on_event(FlowEvent::Reply(RpcReply::SaveFile(SaveFileReply {
            status: STATUS_OK,
            error: None,
        })));
        assert_eq!(effects[0], FlowEffect::Warn("Saved!".to_string()));
    }

    #[test]
    fn load_checks_existence_then_reads() {
        let (mut flow, effects) = LoadAscii::start("data/a.csv").unwrap();
        assert!(matches!(
            effects.as_slice(),
            [FlowEffect::Rpc(RpcRequest::ExtListFiles { .. })]
        ));
        let effects = flow.on_event(FlowEvent::Reply(listing_with(&["a.csv"])));
        assert!(matches!(
            effects.as_slice(),
            [FlowEffect::Rpc(RpcRequest::ExtReadFile { filename })] if filename == "data/a.csv"
        ));
        let effects = flow.on_event(FlowEvent::Reply(RpcReply::ReadFile(ReadFileReply {
            status: STATUS_OK,
            content: "1,2\n".to_string(),
            error: None,
        })));
        assert_eq!(
            effects,
            vec![FlowEffect::Done(FlowOutcome::Loaded("1,2\n".to_string()))]
        );
    }

    #[test]
    fn load_of_missing_file_stops_quietly() {
        let (mut flow, _) = LoadAscii::start("data/a.csv").unwrap();
        let effects = flow.on_event(FlowEvent::Reply(listing_with(&["b.csv"])));
        assert_eq!(effects, vec![FlowEffect::Done(FlowOutcome::NotFound)]);
    }

    #[test]
    fn read_error_is_surfaced() {
        let (mut flow, _) = LoadAscii::start("data/a.csv").unwrap();
        flow.on_event(FlowEvent::Reply(listing_with(&["a.csv"])));
        let effects = flow.on_event(FlowEvent::Reply(RpcReply::ReadFile(ReadFileReply {
            status: 0,
            content: String::new(),
            error: Some("permission denied".to_string()),
        })));
        assert!(matches!(
            effects.as_slice(),
            [FlowEffect::Warn(msg)] if msg.contains("permission denied")
        ));
    }

    #[test]
    fn binary_load_round_trip() {
        let (mut flow, _) = LoadBinary::start("data/raw.bin").unwrap();
        flow.on_event(FlowEvent::Reply(listing_with(&["raw.bin"])));
        let effects = flow.on_event(FlowEvent::Reply(RpcReply::Binary(vec![1, 2, 3])));
        assert_eq!(
            effects,
            vec![FlowEffect::Done(FlowOutcome::LoadedBinary(vec![1, 2, 3]))]
        );
    }

    #[test]
    fn malformed_json_content_names_the_error() {
        let err = parse_json_content("{not json").unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
