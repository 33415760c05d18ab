// Fallible APIs in this crate share one concrete error contract
// (`BoardError`); per-function `# Errors` sections would restate it.
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type"
)]

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod pages;
pub(crate) mod retry;
pub mod session;

pub use api::{HttpCatalog, PostCatalog};
pub use config::BoardConfig;
pub use error::{BoardError, Result};
pub use models::{Cursor, PageInfo, Post, Search};
pub use session::BoardSession;
