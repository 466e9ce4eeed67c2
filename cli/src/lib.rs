//! hours-signer library, exposed for integration tests.

pub mod app;
pub mod commands;
pub mod flow;
pub mod tui;
