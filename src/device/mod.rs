//! Device shuttle: adb transport and emulator port discovery.

pub mod bridge;
pub mod emulator;

pub use bridge::{Bridge, Direction, TransferOutcome};
