//! Core infrastructure shared by the resolver, the patcher and the CLI
//!
//! Error types and console output.

pub mod error;
pub mod output;
