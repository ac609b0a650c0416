//! CLI module for farmascan
//!
//! Each subcommand lives in its own module with an `Args` struct and a
//! `run` function; `error` and `output` hold shared formatting.

pub mod classify;
pub mod config;
pub mod error;
pub mod output;
pub mod replay;
