//! Async client for the Redmine issue tracker.
//!
//! This crate provides the remote-API access layer used by the redmine MCP
//! server: typed views of the tracker's entities, request payloads, and the
//! [`RedmineApi`](api::RedmineApi) trait with a reqwest-backed
//! implementation.
//!
//! # Architecture
//!
//! Callers depend on the object-safe [`api::RedmineApi`] trait rather than on
//! [`client::HttpClient`] directly, so the transport can be swapped for the
//! in-memory `FakeRedmine` in tests (enable the `test-util` feature).

#![forbid(unsafe_code)]

pub mod api;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;

#[cfg(any(test, feature = "test-util"))]
pub mod fake;

pub use api::{MAX_PAGE_SIZE, RedmineApi, list_all_projects};
pub use client::HttpClient;
pub use config::Config;
pub use error::{Error, Result};
