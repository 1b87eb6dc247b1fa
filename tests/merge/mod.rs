// Test module entry point for merge-engine tests
// All merge-related tests organized here

mod backup_tests;
mod executor_tests;
mod inventory_tests;
