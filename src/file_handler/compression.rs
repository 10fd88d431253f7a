//! Compression suffix detection and compression-variant naming.
//!
//! A logical filename may refer to itself or to any of its compressed siblings
//! (`foo`, `foo.xz`, `foo.gz`, `foo.bz2`, `foo.zip`). This module knows the
//! suffixes, the fixed order in which siblings are preferred, and how each
//! format is read.

use crate::file_handler::resolution::{remove_or_die, AccessMethod, DecodeKind, PipeKind};
use crate::file_handler::validation::path_ok;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Supported compression formats, identified by filename suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionType {
    /// No compression - plain file
    None,
    /// XZ compression (.xz files), read through `xzcat`
    Xz,
    /// Gzip compression (.gz files), decoded in-process
    Gzip,
    /// Bzip2 compression (.bz2 files), decoded in-process
    Bzip2,
    /// Zip archive (.zip files), first entry read through `unzip -p`
    Zip,
}

impl CompressionType {
    /// Compressed siblings in the order they are preferred
    pub const VARIANTS: [CompressionType; 4] = [
        CompressionType::Xz,
        CompressionType::Gzip,
        CompressionType::Bzip2,
        CompressionType::Zip,
    ];

    /// Get human-readable name for the compression type
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Xz => "xz",
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Zip => "zip",
        }
    }

    /// Check if this type represents a compressed format
    pub fn is_compressed(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Filename suffix, including the dot
    pub fn suffix(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Xz => Some(".xz"),
            Self::Gzip => Some(".gz"),
            Self::Bzip2 => Some(".bz2"),
            Self::Zip => Some(".zip"),
        }
    }

    /// Detect the format from the filename suffix (case-sensitive)
    pub fn from_name(name: &Path) -> Self {
        Self::VARIANTS
            .into_iter()
            .find(|variant| variant.suffix().is_some_and(|suffix| has_suffix(name, suffix)))
            .unwrap_or(Self::None)
    }

    /// How content stored in this format is read
    pub fn access_method(&self) -> AccessMethod {
        match self {
            Self::None => AccessMethod::DirectRead,
            Self::Xz => AccessMethod::ExternalPipe(PipeKind::Xz),
            Self::Gzip => AccessMethod::InProcessDecode(DecodeKind::Gzip),
            Self::Bzip2 => AccessMethod::InProcessDecode(DecodeKind::Bzip2),
            Self::Zip => AccessMethod::ExternalPipe(PipeKind::Zip),
        }
    }
}

/// True when the UTF-8 text of `name` ends with `suffix`
pub(crate) fn has_suffix(name: &Path, suffix: &str) -> bool {
    name.to_str().is_some_and(|text| text.ends_with(suffix))
}

/// `name` with `suffix` appended verbatim (no extension replacement)
pub(crate) fn with_suffix(name: &Path, suffix: &str) -> PathBuf {
    let mut text = OsString::from(name.as_os_str());
    text.push(suffix);
    PathBuf::from(text)
}

/// Strip at most one compression suffix
pub fn strip_compression_suffix(name: &Path) -> PathBuf {
    let compression = CompressionType::from_name(name);
    match (compression.suffix(), name.to_str()) {
        (Some(suffix), Some(text)) => PathBuf::from(&text[..text.len() - suffix.len()]),
        _ => name.to_path_buf(),
    }
}

/// Strip every trailing compression suffix, including the upper-case `.ZIP`
///
/// `logs/app.log.gz.xz` becomes `logs/app.log`.
pub fn compression_basename(name: impl AsRef<Path>) -> PathBuf {
    const SUFFIXES: [&str; 5] = [".xz", ".gz", ".bz2", ".zip", ".ZIP"];

    let Some(mut text) = name.as_ref().to_str() else {
        return name.as_ref().to_path_buf();
    };
    while let Some(stripped) = SUFFIXES
        .iter()
        .find_map(|suffix| text.strip_suffix(suffix))
    {
        text = stripped;
    }
    PathBuf::from(text)
}

/// Remove the base file and every compressed sibling that exists
///
/// With `keep_base` the uncompressed base file is left in place.
///
/// # Panics
/// Panics if an existing variant cannot be removed.
pub fn remove_compression_variants(name: impl AsRef<Path>, keep_base: bool) {
    let base = compression_basename(name);
    for suffix in ["", ".xz", ".gz", ".bz2", ".zip", ".ZIP"] {
        if keep_base && suffix.is_empty() {
            continue;
        }
        let candidate = with_suffix(&base, suffix);
        if path_ok(&candidate) {
            remove_or_die(&candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_suffix() {
        assert_eq!(
            CompressionType::from_name(Path::new("file.gz")),
            CompressionType::Gzip
        );
        assert_eq!(
            CompressionType::from_name(Path::new("file.bz2")),
            CompressionType::Bzip2
        );
        assert_eq!(
            CompressionType::from_name(Path::new("dir/file.txt.xz")),
            CompressionType::Xz
        );
        assert_eq!(
            CompressionType::from_name(Path::new("file.zip")),
            CompressionType::Zip
        );
        assert_eq!(
            CompressionType::from_name(Path::new("file.GZ")),
            CompressionType::None
        );
        assert_eq!(
            CompressionType::from_name(Path::new("run.bash")),
            CompressionType::None
        );
    }

    #[test]
    fn test_compression_type_methods() {
        assert!(!CompressionType::None.is_compressed());
        assert!(CompressionType::Zip.is_compressed());
        assert_eq!(CompressionType::Bzip2.name(), "bzip2");
        assert_eq!(CompressionType::Xz.suffix(), Some(".xz"));
        assert_eq!(CompressionType::None.suffix(), None);
        assert_eq!(
            CompressionType::Gzip.access_method(),
            AccessMethod::InProcessDecode(DecodeKind::Gzip)
        );
        assert_eq!(
            CompressionType::Zip.access_method(),
            AccessMethod::ExternalPipe(PipeKind::Zip)
        );
    }

    #[test]
    fn test_strip_single_suffix() {
        assert_eq!(
            strip_compression_suffix(Path::new("a/b.txt.gz")),
            PathBuf::from("a/b.txt")
        );
        assert_eq!(
            strip_compression_suffix(Path::new("b.gz.bz2")),
            PathBuf::from("b.gz")
        );
        assert_eq!(
            strip_compression_suffix(Path::new("plain.txt")),
            PathBuf::from("plain.txt")
        );
    }

    #[test]
    fn test_with_suffix_appends() {
        assert_eq!(
            with_suffix(Path::new("data.csv"), ".xz"),
            PathBuf::from("data.csv.xz")
        );
    }

    #[test]
    fn test_compression_basename_is_recursive() {
        assert_eq!(
            compression_basename("logs/app.log.gz.xz"),
            PathBuf::from("logs/app.log")
        );
        assert_eq!(compression_basename("REPORT.ZIP"), PathBuf::from("REPORT"));
        assert_eq!(compression_basename("notes"), PathBuf::from("notes"));
    }

    #[test]
    fn test_remove_compression_variants() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("table.csv");
        for suffix in ["", ".xz", ".gz", ".ZIP"] {
            std::fs::write(with_suffix(&base, suffix), b"x").unwrap();
        }

        remove_compression_variants(with_suffix(&base, ".gz"), true);
        assert!(base.exists());
        assert!(!with_suffix(&base, ".xz").exists());
        assert!(!with_suffix(&base, ".gz").exists());
        assert!(!with_suffix(&base, ".ZIP").exists());

        remove_compression_variants(&base, false);
        assert!(!base.exists());
    }
}
