//! Cross-thread plumbing shared by every subsystem.

pub mod bus;
