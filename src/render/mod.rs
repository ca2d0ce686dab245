//! Window and presentation of the logic thread's render snapshots.

pub mod app;
