// src/lib.rs
//! fpick - a terminal file picker over a sandboxed file RPC surface.
//!
//! The dialog browses one folder of a server-side sandbox at a time,
//! with sortable Name/Modified/Size columns, type-ahead selection and
//! load/save modes. All file access goes through the request/reply
//! protocol in [`rpc`]; the picker itself is a pure reducer in [`app`].

pub mod app;
pub mod cache;
pub mod files;
pub mod listing;
pub mod rpc;
pub mod typeahead;
pub mod ui;
