//! Core type definitions for the Kokoro pipeline

pub mod confidence;
pub mod emotion;
pub mod history;
pub mod sentiment;

// Re-export commonly used types
pub use confidence::*;
pub use emotion::*;
pub use history::*;
pub use sentiment::*;
