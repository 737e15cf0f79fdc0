//! Storage layer for the persisted directory envelope.
//!
//! This module provides the durable side of the entity store: a minimal keyed
//! backend abstraction, the envelope format, and the migration chain that
//! upgrades older envelopes before they are served.
//!
//! # Modules
//!
//! - `backend`: Storage trait abstraction for backend implementations
//! - `json`: JSON file-based storage implementation
//! - `memory`: Shared in-memory storage with failure injection
//! - `models`: Persisted envelope format
//! - `migration`: Ordered schema migrations

pub mod backend;
pub mod json;
pub mod memory;
pub mod migration;
pub mod models;

pub use backend::Storage;
pub use json::JsonFileStorage;
pub use memory::MemoryStorage;
pub use migration::{decode, Decoded, Migration, MIGRATIONS};
pub use models::{Envelope, CURRENT_VERSION};
