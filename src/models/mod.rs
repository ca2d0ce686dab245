pub mod chart;
pub mod engine;
pub mod result;
pub mod settings;
pub mod stats;
