//! # anyfile - compression-aware file access and deterministic key ordering
//!
//! Two small, independent components:
//!
//! - **File resolution**: a logical filename is mapped to whichever physical
//!   variant exists (`name`, `name.xz`, `name.gz`, `name.bz2`, `name.zip`) and
//!   read through the matching decoder or decompression pipe.
//! - **Key ordering**: the keys of a map are returned ordered by key, by value,
//!   or by absolute value, ascending or descending.
//!
//! ## Architecture
//!
//! - [`error`] - Centralized error types and handling
//! - [`config`] - External tool locations and buffer sizing
//! - [`file_handler`] - Resolution, readers, writers and line counting
//! - [`ordering`] - Generic key ordering over map types
//!
//! ## Failure styles
//!
//! Entry points come in pairs. `try_*` functions return [`Result`]; the plain
//! versions (`open_any`, `count_lines`) panic with a descriptive message,
//! which suits scripts that cannot continue without their input.

// Core modules
pub mod config;
pub mod error;

// Components
pub mod file_handler;
pub mod ordering;

// Re-export commonly used types for convenience
pub use error::{AnyfileError, Result};

pub use config::ToolConfig;
pub use file_handler::{
    count_lines, open_any, resolve_readable, resolve_writable, try_count_lines, try_open_any,
    AccessMethod, AnyReader, AnyWriter, ReaderFactory, Resolution,
};
pub use ordering::{sorted_keys, SortRule, SortValue};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
