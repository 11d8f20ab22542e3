// src/rpc/mod.rs
//! RPC module - wire protocol, channel client and the local backend.

pub mod client;
pub mod local;
pub mod protocol;

// Re-export commonly used types
pub use client::{Completion, FileService, RpcClient, DEFAULT_TIMEOUT};
pub use local::LocalSandbox;
pub use protocol::{
    FileEntry, ListFilesReply, MakeSubdirReply, ReadFileReply, RpcError, RpcReply, RpcRequest,
    SaveFileReply, STATUS_OK,
};
