//! Library half of the `qexp` binary: argument definitions and commands.

pub mod cli;
pub mod commands;
