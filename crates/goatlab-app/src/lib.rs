// Library root: re-exports all modules so integration tests and the binary
// share the same API.

pub mod cli;
pub mod config;
pub mod report;
pub mod session;
