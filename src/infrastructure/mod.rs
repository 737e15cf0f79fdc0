//! Infrastructure layer for filesystem and environment interactions.
//!
//! Resolves where the directory keeps its data, where exports go and where
//! the configuration file lives, using the platform conventions reported by
//! the `dirs` crate.

pub mod paths;

pub use paths::{default_config_file, default_data_dir, default_export_dir, expand_tilde, FALLBACK_DATA_DIR};
