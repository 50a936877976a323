//! routeviz CLI library.
//!
//! Terminal rendering, output formatting and logging setup for the
//! `routeviz-cli` binary.

pub mod logging;
pub mod output;
pub mod terminal;
