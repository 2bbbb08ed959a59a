//! Terminal front-end for Luigi poker.
//!
//! Command parsing, text rendering, and the solo and network event loops
//! used by the `lp_client` binary.

pub mod app;
pub mod commands;
pub mod render;
