//! Core plumbing shared by the Azure Stack sample crates.
//!
//! This crate carries the pieces every client crate needs: the workspace
//! error type, bearer-token credentials for the management plane, the
//! RFC 1123 date formatting required by storage headers, and small HTTP
//! response helpers.

pub mod auth;
pub mod date;
pub mod error;
pub mod http;

pub use error::{Error, ErrorKind, Result};
