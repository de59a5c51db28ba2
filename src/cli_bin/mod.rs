//! Binary-only command-line layer

pub mod args;
pub mod commands;
