#![forbid(unsafe_code)]
#![allow(clippy::missing_panics_doc)]

//! Shared test utilities for the vidra workspace.

pub mod http_server;
pub mod manifests;

pub use http_server::TestHttpServer;
