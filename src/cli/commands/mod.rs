//! Command implementations for the CLI.

pub mod analyze;
pub mod init;
pub mod serve;
