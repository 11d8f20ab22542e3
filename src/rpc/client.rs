// src/rpc/client.rs
//! Channel-based RPC client.
//!
//! The service runs on its own thread behind an mpsc request/response
//! pair; the UI thread sends JSON-framed requests and polls replies with
//! `try_recv` on every tick, so no call ever blocks rendering. Replies
//! carry the caller's tag; nothing guarantees ordering between two
//! in-flight calls. Each request gets a deadline, and an expired request
//! surfaces as a synthetic timeout failure instead of leaving the dialog
//! silently static.

use std::{
    collections::HashMap,
    sync::mpsc::{Receiver, Sender, TryRecvError, channel},
    thread,
    time::{Duration, Instant},
};

use log::debug;

use crate::rpc::protocol::{RpcError, RpcReply, RpcRequest};

/// Default per-request deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Anything that can answer the five RPC methods. Implementations run on
/// the service thread.
pub trait FileService: Send + 'static {
    fn call(&mut self, request: &RpcRequest) -> Result<RpcReply, RpcError>;

    /// Entry point used by the transport: parse a JSON frame, dispatch it.
    fn dispatch_json(&mut self, frame: &str) -> Result<RpcReply, RpcError> {
        let request: RpcRequest = serde_json::from_str(frame)?;
        self.call(&request)
    }
}

struct Frame {
    tag: u64,
    body: String,
}

/// A completed call, tagged with the caller's request tag.
pub struct Completion {
    pub tag: u64,
    pub result: Result<RpcReply, RpcError>,
}

pub struct RpcClient {
    tx: Sender<Frame>,
    rx: Receiver<Completion>,
    pending: HashMap<u64, Instant>,
    timeout: Duration,
}

impl RpcClient {
    /// Move `service` onto its own thread and return the client half.
    pub fn spawn<S: FileService>(mut service: S) -> Self {
        let (req_tx, req_rx) = channel::<Frame>();
        let (reply_tx, reply_rx) = channel::<Completion>();

        thread::spawn(move || {
            while let Ok(frame) = req_rx.recv() {
                let result = service.dispatch_json(&frame.body);
                if reply_tx
                    .send(Completion {
                        tag: frame.tag,
                        result,
                    })
                    .is_err()
                {
                    // Client side is gone, stop serving.
                    break;
                }
            }
        });

        Self {
            tx: req_tx,
            rx: reply_rx,
            pending: HashMap::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Queue one request. `tag` comes back with the reply; reusing a tag
    /// while a call is in flight replaces its deadline.
    pub fn send(&mut self, tag: u64, request: &RpcRequest, now: Instant) -> Result<(), RpcError> {
        let body = serde_json::to_string(request)?;
        debug!("rpc -> {} (tag {})", request.method(), tag);
        self.tx
            .send(Frame { tag, body })
            .map_err(|_| RpcError::ChannelClosed)?;
        self.pending.insert(tag, now + self.timeout);
        Ok(())
    }

    /// Drain completed calls and expire overdue ones.
    pub fn poll(&mut self, now: Instant) -> Vec<Completion> {
        let mut out = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(completion) => {
                    self.pending.remove(&completion.tag);
                    out.push(completion);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    for (tag, _) in self.pending.drain() {
                        out.push(Completion {
                            tag,
                            result: Err(RpcError::ChannelClosed),
                        });
                    }
                    return out;
                }
            }
        }

        let expired: Vec<u64> = self
            .pending
            .iter()
            .filter(|(_, deadline)| now >= **deadline)
            .map(|(tag, _)| *tag)
            .collect();
        for tag in expired {
            self.pending.remove(&tag);
            out.push(Completion {
                tag,
                result: Err(RpcError::Timeout(self.timeout)),
            });
        }
        out
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
