//! Core types and traits for the Strata benchmark harness
//!
//! This crate defines the narrow contract between the load generator and
//! the storage engine it drives:
//! - Error: `StrataError` / `StrataResult`
//! - Traits: `Engine`, `Transaction` (open/close, implicit and explicit
//!   transactions, point and range access)
//! - Options: `EngineOptions`, `SyncMode`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod options;
pub mod traits;

pub use error::{StrataError, StrataResult};
pub use options::{EngineOptions, SyncMode};
pub use traits::{Engine, Entry, Transaction};
