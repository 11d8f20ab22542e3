// src/rpc/local.rs
//! Local-directory implementation of the file service.
//!
//! Serves the RPC surface straight from a sandbox root on disk. Every
//! incoming path is resolved component by component and anything that
//! would step outside the root is rejected here, whatever the client
//! already stripped.

use std::{
    fs,
    path::{Path, PathBuf},
    time::UNIX_EPOCH,
};

use log::warn;

use crate::{
    listing::ext_matches,
    rpc::client::FileService,
    rpc::protocol::{
        FileEntry, ListFilesReply, MakeSubdirReply, ReadFileReply, RpcError, RpcReply, RpcRequest,
        SaveFileReply, STATUS_OK,
    },
};

pub struct LocalSandbox {
    root: PathBuf,
}

impl LocalSandbox {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a sandbox-relative path onto the root. `..` and absolute
    /// components are refused outright.
    fn resolve(&self, rel: &str) -> Result<PathBuf, RpcError> {
        let mut out = self.root.clone();
        for part in rel.split('/') {
            match part {
                "" | "." => continue,
                ".." => return Err(RpcError::SandboxViolation(rel.to_string())),
                part if Path::new(part).is_absolute() => {
                    return Err(RpcError::SandboxViolation(rel.to_string()));
                }
                part => out.push(part),
            }
        }
        Ok(out)
    }

    fn list(&self, subdir: &str, fileext: &str) -> Result<ListFilesReply, RpcError> {
        let dir = self.resolve(subdir)?;
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("list {:?}: {}", dir, err);
                return Ok(ListFilesReply {
                    status: 0,
                    ..Default::default()
                });
            }
        };

        let mut reply = ListFilesReply {
            status: STATUS_OK,
            ..Default::default()
        };
        for entry in entries.filter_map(Result::ok) {
            let name = entry.file_name().to_string_lossy().into_owned();
            let meta = match entry.metadata() {
                Ok(meta) => meta,
                Err(_) => continue,
            };
            if meta.is_dir() {
                reply.subdirs.push(name);
            } else if ext_matches(fileext, &name) {
                let modtime = meta
                    .modified()
                    .ok()
                    .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                    .map(|d| d.as_secs())
                    .unwrap_or(0);
                reply.files.push(FileEntry {
                    filename: name,
                    modtime,
                    size: meta.len(),
                });
            }
        }
        Ok(reply)
    }

    fn read(&self, filename: &str) -> Result<ReadFileReply, RpcError> {
        let path = self.resolve(filename)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(ReadFileReply {
                status: STATUS_OK,
                content,
                error: None,
            }),
            Err(err) => Ok(ReadFileReply {
                status: 0,
                content: String::new(),
                error: Some(err.to_string()),
            }),
        }
    }

    fn save(&self, filename: &str, script: &str) -> Result<SaveFileReply, RpcError> {
        let path = self.resolve(filename)?;
        match fs::write(&path, script) {
            Ok(()) => Ok(SaveFileReply {
                status: STATUS_OK,
                error: None,
            }),
            Err(err) => Ok(SaveFileReply {
                status: 0,
                error: Some(err.to_string()),
            }),
        }
    }

    fn mkdir(&self, subdir: &str) -> Result<MakeSubdirReply, RpcError> {
        let path = self.resolve(subdir)?;
        // idempotent: an existing directory is a success
        match fs::create_dir_all(&path) {
            Ok(()) => Ok(MakeSubdirReply { status: STATUS_OK }),
            Err(err) => {
                warn!("mkdir {:?}: {}", path, err);
                Ok(MakeSubdirReply { status: 0 })
            }
        }
    }

    fn read_binary(&self, filename: &str) -> Result<Vec<u8>, RpcError> {
        let path = self.resolve(filename)?;
        Ok(fs::read(&path)?)
    }
}

impl FileService for LocalSandbox {
    fn call(&mut self, request: &RpcRequest) -> Result<RpcReply, RpcError> {
        match request {
            RpcRequest::ExtListFiles { subdir, fileext } => {
                Ok(RpcReply::ListFiles(self.list(subdir, fileext)?))
            }
            RpcRequest::ExtReadFile { filename } => Ok(RpcReply::ReadFile(self.read(filename)?)),
            RpcRequest::ExtSaveFile { filename, script } => {
                Ok(RpcReply::SaveFile(self.save(filename, script)?))
            }
            RpcRequest::MakeSubdir { subdir } => Ok(RpcReply::MakeSubdir(self.mkdir(subdir)?)),
            RpcRequest::ReadBinaryFile { filename } => {
                Ok(RpcReply::Binary(self.read_binary(filename)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sandbox() -> (TempDir, LocalSandbox) {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("data")).unwrap();
        fs::write(dir.path().join("data/a.csv"), "1,2\n").unwrap();
        fs::write(dir.path().join("data/b.json"), "{}").unwrap();
        let sandbox = LocalSandbox::new(dir.path());
        (dir, sandbox)
    }

    #[test]
    fn listing_filters_by_extension_and_splits_dirs() {
        let (dir, sandbox) = sandbox();
        fs::create_dir(dir.path().join("data/runs")).unwrap();
        let reply = sandbox.list("data", "*.csv").unwrap();
        assert_eq!(reply.status, STATUS_OK);
        assert_eq!(reply.files.len(), 1);
        assert_eq!(reply.files[0].filename, "a.csv");
        assert!(reply.files[0].size > 0);
        assert_eq!(reply.subdirs, vec!["runs".to_string()]);
    }

    #[test]
    fn missing_directory_reports_failed_status() {
        let (_dir, sandbox) = sandbox();
        let reply = sandbox.list("nothere", "*").unwrap();
        assert_ne!(reply.status, STATUS_OK);
    }

    #[test]
    fn escaping_paths_are_rejected() {
        let (_dir, sandbox) = sandbox();
        assert!(matches!(
            sandbox.resolve("../outside"),
            Err(RpcError::SandboxViolation(_))
        ));
        assert!(matches!(
            sandbox.resolve("data/../../outside"),
            Err(RpcError::SandboxViolation(_))
        ));
    }

    #[test]
    fn read_write_round_trip() {
        let (_dir, mut sandbox) = sandbox();
        let reply = sandbox
            .call(&RpcRequest::ExtSaveFile {
                filename: "data/out.json".into(),
                script: "{\"run\": 7}".into(),
            })
            .unwrap();
        assert!(matches!(reply, RpcReply::SaveFile(r) if r.status == STATUS_OK));

        let reply = sandbox.read("data/out.json").unwrap();
        assert_eq!(reply.status, STATUS_OK);
        assert_eq!(reply.content, "{\"run\": 7}");
    }

    #[test]
    fn read_missing_file_is_a_soft_failure() {
        let (_dir, sandbox) = sandbox();
        let reply = sandbox.read("data/nope.json").unwrap();
        assert_ne!(reply.status, STATUS_OK);
        assert!(reply.error.is_some());
    }

    #[test]
    fn mkdir_is_idempotent() {
        let (_dir, sandbox) = sandbox();
        assert_eq!(sandbox.mkdir("data/new").unwrap().status, STATUS_OK);
        assert_eq!(sandbox.mkdir("data/new").unwrap().status, STATUS_OK);
    }
}
