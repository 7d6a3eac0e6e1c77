//! Helper functions used by the resolver, the patcher and the CLI
//!
//! - **http**: blocking GET with a per-request deadline, GitHub endpoints
//! - **url_utils**: filename extraction from download URLs
//! - **fs**: reading and atomically rewriting recipe files

pub mod fs;
pub mod http;
pub mod url_utils;
