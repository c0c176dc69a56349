//! Key/value storage subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP handler (shared Store handle via axum State)
//!     → memory.rs (single reader/writer lock over the whole map)
//!         read lock:  get, exists, len
//!         write lock: set, insert_if_absent
//! ```
//!
//! # Design Decisions
//! - One coarse lock, no sharding: writers serialize, readers run together
//! - Check-and-insert happens under one write guard, never as get + set
//! - Presence is explicit (`Option`), never inferred from an empty value
//! - The store cannot fail; lock acquisition is the only suspension point

pub mod memory;

pub use memory::{Insertion, Store, DEFAULT_CAPACITY};
