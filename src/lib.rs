// Library module for savesync
// Re-exports modules for use in integration tests and the binary

pub mod cli;
pub mod config;
pub mod console;
pub mod device;
pub mod merge;
