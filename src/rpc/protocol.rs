// src/rpc/protocol.rs
//! JSON wire types for the file-service RPC surface.
//!
//! Method names and reply shapes follow the server contract: a `status`
//! field of 1 means success, anything else is a server-side failure with
//! an optional `error` message.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Server success status.
pub const STATUS_OK: i32 = 1;

/// One file of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub filename: String,
    /// Modification time, epoch seconds.
    pub modtime: u64,
    /// Size in bytes.
    pub size: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListFilesReply {
    pub status: i32,
    #[serde(default)]
    pub files: Vec<FileEntry>,
    #[serde(default)]
    pub subdirs: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReadFileReply {
    pub status: i32,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveFileReply {
    pub status: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MakeSubdirReply {
    pub status: i32,
}

/// The five methods of the RPC surface. Serializes as
/// `{"method": "ext_list_files", "params": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params", rename_all = "snake_case")]
pub enum RpcRequest {
    ExtListFiles { subdir: String, fileext: String },
    ExtReadFile { filename: String },
    ExtSaveFile { filename: String, script: String },
    MakeSubdir { subdir: String },
    ReadBinaryFile { filename: String },
}

impl RpcRequest {
    /// Method name as it appears on the wire, for logs.
    pub fn method(&self) -> &'static str {
        match self {
            RpcRequest::ExtListFiles { .. } => "ext_list_files",
            RpcRequest::ExtReadFile { .. } => "ext_read_file",
            RpcRequest::ExtSaveFile { .. } => "ext_save_file",
            RpcRequest::MakeSubdir { .. } => "make_subdir",
            RpcRequest::ReadBinaryFile { .. } => "read_binary_file",
        }
    }
}

/// Reply to one request. The binary read returns raw bytes outside the
/// JSON envelope, mirroring the arraybuffer variant of the transport.
#[derive(Debug, Clone)]
pub enum RpcReply {
    ListFiles(ListFilesReply),
    ReadFile(ReadFileReply),
    SaveFile(SaveFileReply),
    MakeSubdir(MakeSubdirReply),
    Binary(Vec<u8>),
}

/// Transport and framing failures. Server-side failures travel inside the
/// reply `status`/`error` fields instead.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("rpc channel closed")]
    ChannelClosed,
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("malformed request: {0}")]
    BadRequest(#[from] serde_json::Error),
    #[error("path escapes the sandbox: {0}")]
    SandboxViolation(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_method_names_match_the_wire() {
        let req = RpcRequest::ExtListFiles {
            subdir: "data".into(),
            fileext: "*.csv".into(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["method"], "ext_list_files");
        assert_eq!(json["params"]["subdir"], "data");
        assert_eq!(json["params"]["fileext"], "*.csv");

        let req = RpcRequest::ExtSaveFile {
            filename: "data/out.json".into(),
            script: "{}".into(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["method"], "ext_save_file");
        assert_eq!(json["params"]["script"], "{}");
    }

    #[test]
    fn listing_reply_tolerates_missing_arrays() {
        let reply: ListFilesReply = serde_json::from_str(r#"{"status": 0}"#).unwrap();
        assert_eq!(reply.status, 0);
        assert!(reply.files.is_empty());
        assert!(reply.subdirs.is_empty());
    }

    #[test]
    fn read_reply_carries_server_error() {
        let reply: ReadFileReply =
            serde_json::from_str(r#"{"status": 0, "error": "no such file"}"#).unwrap();
        assert_ne!(reply.status, STATUS_OK);
        assert_eq!(reply.error.as_deref(), Some("no such file"));
    }
}
