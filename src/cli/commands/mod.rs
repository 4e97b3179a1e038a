//! Command implementations for the CLI.

pub mod build;
pub mod init;
pub mod query;
pub mod serve;
