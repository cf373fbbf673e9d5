//! Adapter implementations for application ports.

mod system_clock;

pub use system_clock::SystemClock;
