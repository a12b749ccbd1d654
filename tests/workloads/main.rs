//! End-to-end workload suite
//!
//! Drives the public harness API against the reference engine:
//! - catalogue: every benchmark honors its operation budget
//! - orchestration: ordered runs, stats, fatal config errors
//! - persistence: reads in a later run find earlier writes

#[path = "../common/mod.rs"]
mod common;

mod catalogue;
mod orchestration;
mod persistence;
