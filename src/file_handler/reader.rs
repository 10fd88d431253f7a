//! Buffered readers over resolved files.
//!
//! [`ReaderFactory`] turns a logical filename into an [`AnyReader`]: a plain
//! file, an in-process gzip/bzip2 decoder, or the stdout of a child process
//! (`xzcat`, `unzip -p`, or an executable script). Two call styles exist:
//! `try_open` returns errors, `open` panics on them.

use crate::config::ToolConfig;
use crate::error::{AnyfileError, Result};
use crate::file_handler::resolution::{
    resolve_readable, AccessMethod, DecodeKind, PipeKind, Resolution,
};
use bzip2::read::MultiBzDecoder;
use flate2::read::MultiGzDecoder;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

/// Line-oriented reader over the content of a resolved file
///
/// Owns the child process when the content comes from one. Dropping the
/// reader closes the pipe and reaps the child; [`AnyReader::finish`] does the
/// same but reports a failed exit status.
pub struct AnyReader {
    inner: Option<Box<dyn BufRead + Send>>,
    child: Option<Child>,
    program: String,
    resolution: Resolution,
}

impl AnyReader {
    /// The resolution this reader was opened from
    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    /// Close the stream and wait for the child process, if any
    ///
    /// Call this after reading to the end; closing early makes most
    /// decompressors exit on a broken pipe, which is reported as a failure.
    pub fn finish(mut self) -> Result<()> {
        self.inner.take();
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        let status = child
            .wait()
            .map_err(|e| AnyfileError::file_error(format!("Failed to wait for {}", self.program), e))?;
        if status.success() {
            Ok(())
        } else {
            Err(AnyfileError::SubprocessFailed {
                program: self.program.clone(),
                status,
            })
        }
    }
}

impl std::fmt::Debug for AnyReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnyReader")
            .field("resolution", &self.resolution)
            .field("child", &self.child.as_ref().map(Child::id))
            .finish()
    }
}

impl Read for AnyReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.inner.as_mut() {
            Some(reader) => reader.read(buf),
            None => Ok(0),
        }
    }
}

impl BufRead for AnyReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self.inner.as_mut() {
            Some(reader) => reader.fill_buf(),
            None => Ok(&[]),
        }
    }

    fn consume(&mut self, amt: usize) {
        if let Some(reader) = self.inner.as_mut() {
            reader.consume(amt);
        }
    }
}

impl Drop for AnyReader {
    fn drop(&mut self) {
        // Pipe first, so a child blocked on write sees EPIPE.
        self.inner.take();
        if let Some(mut child) = self.child.take() {
            match child.try_wait() {
                Ok(Some(_)) => {}
                Ok(None) => {
                    let _ = child.kill();
                    if let Err(e) = child.wait() {
                        log::warn!("failed to reap {}: {}", self.program, e);
                    }
                }
                Err(e) => log::warn!("failed to query {}: {}", self.program, e),
            }
        }
    }
}

/// Opens resolved files using a [`ToolConfig`]
#[derive(Debug, Clone, Default)]
pub struct ReaderFactory {
    config: ToolConfig,
}

impl ReaderFactory {
    pub fn new(config: ToolConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// Open `name`, returning an explicit error on any failure
    ///
    /// A name that resolves to nothing yields [`AnyfileError::FileNotFound`].
    ///
    /// # Panics
    /// Panics on the invariant violations of [`resolve_readable`].
    pub fn try_open(&self, name: impl AsRef<Path>) -> Result<AnyReader> {
        let name = name.as_ref();
        let resolution = resolve_readable(name);
        if !resolution.is_found() {
            return Err(AnyfileError::file_not_found(name));
        }
        self.open_resolved(resolution)
    }

    /// Open `name`, aborting with a descriptive message on any failure
    ///
    /// # Panics
    /// Panics when nothing resolves, when the file cannot be opened, or when
    /// a child process cannot be started.
    pub fn open(&self, name: impl AsRef<Path>) -> AnyReader {
        let name = name.as_ref();
        self.try_open(name)
            .unwrap_or_else(|e| panic!("open_any({}): {}", name.display(), e))
    }

    fn open_resolved(&self, resolution: Resolution) -> Result<AnyReader> {
        let path = resolution.path.clone();
        let method = resolution.method;
        match method {
            AccessMethod::DirectRead => {
                let file = open_file(&path)?;
                Ok(self.in_process(Box::new(file), resolution))
            }
            AccessMethod::InProcessDecode(kind) => {
                let file = open_file(&path)?;
                let decoder: Box<dyn Read + Send> = match kind {
                    DecodeKind::Gzip => Box::new(MultiGzDecoder::new(file)),
                    DecodeKind::Bzip2 => Box::new(MultiBzDecoder::new(file)),
                };
                let mut reader = self.in_process(decoder, resolution);
                // Surface a corrupt header at open time rather than on first read.
                reader.fill_buf().map_err(|e| {
                    AnyfileError::compression(format!(
                        "invalid {} stream in {}: {}",
                        method,
                        path.display(),
                        e
                    ))
                })?;
                Ok(reader)
            }
            AccessMethod::ExternalPipe(PipeKind::Xz) => {
                self.spawn(&self.config.xzcat, &[path.as_os_str()], resolution)
            }
            AccessMethod::ExternalPipe(PipeKind::Zip) => {
                let entry = escape_zip_pattern(&self.first_zip_entry(&path)?);
                let args = [OsStr::new("-p"), path.as_os_str(), OsStr::new(&entry)];
                self.spawn(&self.config.unzip, &args, resolution)
            }
            AccessMethod::ScriptExec => {
                let program = runnable_path(&path);
                self.spawn(&program, &[], resolution)
            }
            AccessMethod::NotFound => Err(AnyfileError::file_not_found(path)),
        }
    }

    fn in_process(&self, source: Box<dyn Read + Send>, resolution: Resolution) -> AnyReader {
        AnyReader {
            inner: Some(Box::new(BufReader::with_capacity(
                self.config.buffer_size,
                source,
            ))),
            child: None,
            program: resolution.method.name().to_string(),
            resolution,
        }
    }

    fn spawn(&self, program: &Path, args: &[&OsStr], resolution: Resolution) -> Result<AnyReader> {
        let label = program.display().to_string();
        log::debug!("spawning {} {:?}", label, args);

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| AnyfileError::spawn_failed(label.clone(), e))?;
        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(AnyfileError::spawn_failed(
                label,
                io::Error::new(io::ErrorKind::BrokenPipe, "stdout was not captured"),
            ));
        };

        Ok(AnyReader {
            inner: Some(Box::new(BufReader::with_capacity(
                self.config.buffer_size,
                stdout,
            ))),
            child: Some(child),
            program: label,
            resolution,
        })
    }

    /// Name of the first file entry in a zip archive, via `unzip -Z1`
    fn first_zip_entry(&self, archive: &Path) -> Result<String> {
        let label = self.config.unzip.display().to_string();
        let output = Command::new(&self.config.unzip)
            .arg("-Z1")
            .arg(archive)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|e| AnyfileError::spawn_failed(label.clone(), e))?;
        if !output.status.success() {
            return Err(AnyfileError::SubprocessFailed {
                program: label,
                status: output.status,
            });
        }

        String::from_utf8_lossy(&output.stdout)
            .lines()
            .find(|entry| !entry.is_empty() && !entry.ends_with('/'))
            .map(str::to_string)
            .ok_or_else(|| {
                AnyfileError::compression(format!(
                    "zip archive has no file entries: {}",
                    archive.display()
                ))
            })
    }
}

fn open_file(path: &Path) -> Result<File> {
    File::open(path)
        .map_err(|e| AnyfileError::file_error(format!("Failed to open {}", path.display()), e))
}

/// `unzip` matches member names as wildcard patterns; bracket the special characters
fn escape_zip_pattern(entry: &str) -> String {
    let mut escaped = String::with_capacity(entry.len());
    for c in entry.chars() {
        match c {
            '[' | '*' | '?' => {
                escaped.push('[');
                escaped.push(c);
                escaped.push(']');
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

/// A bare relative script name would be looked up on PATH; anchor it to `.`
fn runnable_path(path: &Path) -> PathBuf {
    if path.is_relative() && path.parent().map_or(true, |parent| parent.as_os_str().is_empty()) {
        Path::new(".").join(path)
    } else {
        path.to_path_buf()
    }
}

/// Open `name` with the default tool configuration, panicking on failure
pub fn open_any(name: impl AsRef<Path>) -> AnyReader {
    ReaderFactory::default().open(name)
}

/// Open `name` with the default tool configuration
pub fn try_open_any(name: impl AsRef<Path>) -> Result<AnyReader> {
    ReaderFactory::default().try_open(name)
}
