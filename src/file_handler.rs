//! Compression-aware file resolution and access.
//!
//! A logical filename such as `trades.csv` may be stored as `trades.csv`,
//! `trades.csv.xz`, `trades.csv.gz`, `trades.csv.bz2`, or `trades.csv.zip`.
//! This module decides which physical file serves the name and exposes the
//! content as a buffered stream, decompressing transparently.
//!
//! - [`resolution`] - priority search over compression variants
//! - [`reader`] - buffered readers, in-process decoders and child pipes
//! - [`line_count`] - streaming line counts
//! - [`writer`] - writers that clear stale compressed siblings
//! - [`compression`] - suffix detection and variant naming

pub mod compression;
pub mod line_count;
pub mod reader;
pub mod resolution;
pub mod validation;
pub mod writer;

pub use compression::{compression_basename, remove_compression_variants, CompressionType};
pub use line_count::{
    count_lines, count_reader_lines, try_count_lines, try_count_lines_excluding, CommentRule,
};
pub use reader::{open_any, try_open_any, AnyReader, ReaderFactory};
pub use resolution::{
    any_path_ok, resolve_readable, resolve_writable, AccessMethod, DecodeKind, PipeKind,
    Resolution, NULL_DEVICE,
};
pub use validation::{is_executable, path_ok};
pub use writer::AnyWriter;
