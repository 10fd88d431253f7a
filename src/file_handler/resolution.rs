//! Mapping a logical filename onto a physical file and an access method.
//!
//! Resolution searches in a fixed order and stops at the first hit:
//!
//! 1. The name exactly as given. Its own suffix picks the access method;
//!    `.bash` names are executed and must carry an execute bit.
//! 2. With one compression suffix stripped, the base name followed by
//!    `.xz`, `.gz`, `.bz2`, `.zip`, then the bare base name.
//! 3. Otherwise [`AccessMethod::NotFound`] at the null device.
//!
//! Read resolution never touches the filesystem. Write resolution removes the
//! file it finds so a fresh file can be created without a stale compressed
//! sibling shadowing it.

use crate::error::AnyfileError;
use crate::file_handler::compression::{strip_compression_suffix, with_suffix, CompressionType};
use crate::file_handler::validation::{is_executable, is_script_name, path_ok};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Placeholder path carried by a not-found resolution
#[cfg(not(windows))]
pub const NULL_DEVICE: &str = "/dev/null";
#[cfg(windows)]
pub const NULL_DEVICE: &str = "NUL";

/// Formats read through an external program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipeKind {
    /// `xzcat <file>`
    Xz,
    /// `unzip -p <file> <first entry>`
    Zip,
}

/// Formats decoded inside the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeKind {
    Gzip,
    Bzip2,
}

/// How bytes are obtained from a resolved file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessMethod {
    /// Plain file, read as is
    DirectRead,
    /// Decompressed by a child process whose stdout is read
    ExternalPipe(PipeKind),
    /// Decompressed by a streaming decoder over the file
    InProcessDecode(DecodeKind),
    /// The file is an executable script; its stdout is the content
    ScriptExec,
    /// No candidate exists
    NotFound,
}

impl AccessMethod {
    /// Short label used in logs and CLI output
    pub fn name(&self) -> &'static str {
        match self {
            Self::DirectRead => "direct",
            Self::ExternalPipe(PipeKind::Xz) => "xz-pipe",
            Self::ExternalPipe(PipeKind::Zip) => "zip-pipe",
            Self::InProcessDecode(DecodeKind::Gzip) => "gzip",
            Self::InProcessDecode(DecodeKind::Bzip2) => "bzip2",
            Self::ScriptExec => "script",
            Self::NotFound => "not-found",
        }
    }

    /// True when reading requires a child process
    pub fn spawns_process(&self) -> bool {
        matches!(self, Self::ExternalPipe(_) | Self::ScriptExec)
    }
}

impl fmt::Display for AccessMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of resolving a logical filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Physical file chosen, or [`NULL_DEVICE`] when nothing matched
    pub path: PathBuf,
    /// How its content is obtained
    pub method: AccessMethod,
    /// Whether the name matched as given rather than through a sibling
    pub exact: bool,
}

impl Resolution {
    fn not_found() -> Self {
        Self {
            path: PathBuf::from(NULL_DEVICE),
            method: AccessMethod::NotFound,
            exact: false,
        }
    }

    /// True unless the method is [`AccessMethod::NotFound`]
    pub fn is_found(&self) -> bool {
        self.method != AccessMethod::NotFound
    }

    /// Modification time of the resolved file; `None` when not found
    pub fn modified(&self) -> Option<SystemTime> {
        if !self.is_found() {
            return None;
        }
        std::fs::metadata(&self.path).and_then(|m| m.modified()).ok()
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}",
            self.path.display(),
            self.method,
            if self.exact { "exact" } else { "variant" }
        )
    }
}

/// Siblings tried when the name itself is missing, in priority order
fn variant_candidates(name: &Path) -> impl Iterator<Item = (PathBuf, AccessMethod)> {
    let base = strip_compression_suffix(name);
    let compressed = CompressionType::VARIANTS.into_iter().filter_map({
        let base = base.clone();
        move |variant| {
            let suffix = variant.suffix()?;
            Some((with_suffix(&base, suffix), variant.access_method()))
        }
    });
    compressed.chain(std::iter::once((base, AccessMethod::DirectRead)))
}

/// First existing candidate, with the method implied by its compression suffix
fn locate(name: &Path) -> Option<Resolution> {
    if path_ok(name) {
        return Some(Resolution {
            path: name.to_path_buf(),
            method: CompressionType::from_name(name).access_method(),
            exact: true,
        });
    }
    variant_candidates(name)
        .find(|(candidate, _)| path_ok(candidate))
        .map(|(path, method)| Resolution {
            path,
            method,
            exact: false,
        })
}

/// Resolve `name` for reading.
///
/// A missing file is reported as [`AccessMethod::NotFound`], never as an error.
///
/// # Panics
/// Panics if `name` is an existing `.bash` script without execute permission.
pub fn resolve_readable(name: impl AsRef<Path>) -> Resolution {
    let name = name.as_ref();
    let resolution = match locate(name) {
        Some(mut found) if found.exact && is_script_name(&found.path) => {
            if !is_executable(&found.path) {
                panic!(
                    "{}",
                    AnyfileError::NotExecutable {
                        path: found.path.clone()
                    }
                );
            }
            found.method = AccessMethod::ScriptExec;
            found
        }
        Some(found) => found,
        None => Resolution::not_found(),
    };
    log::debug!("resolve_readable({}) -> {}", name.display(), resolution);
    resolution
}

/// Resolve `name` for writing, removing the file that read resolution would find.
///
/// Only the first candidate in priority order is removed. The returned value
/// describes the removed file, or is not-found when nothing was removed.
///
/// # Panics
/// Panics if the candidate cannot be removed.
pub fn resolve_writable(name: impl AsRef<Path>) -> Resolution {
    let name = name.as_ref();
    let Some(found) = locate(name) else {
        log::debug!("resolve_writable({}) -> nothing to remove", name.display());
        return Resolution::not_found();
    };
    remove_or_die(&found.path);
    log::debug!("resolve_writable({}) removed {}", name.display(), found);
    found
}

/// True when read resolution finds any candidate for `name`
pub fn any_path_ok(name: impl AsRef<Path>) -> bool {
    locate(name.as_ref()).is_some()
}

/// Remove a file, treating failure as a broken deployment assumption
///
/// # Panics
/// Panics with the path and the OS error if removal fails.
pub(crate) fn remove_or_die(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        panic!("failed to remove {}: {}", path.display(), e);
    }
}
