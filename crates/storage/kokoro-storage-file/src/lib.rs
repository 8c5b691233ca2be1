//! Kokoro File Storage
//!
//! JSON-file-backed implementation of the core session store contract: one
//! file per session under a storage directory, corrupted files quarantined
//! instead of poisoning reads.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod file;

pub use file::{FileSessionStore, StoreStats};
