//! Buffered writer that clears stale compressed siblings before creating a file.

use crate::error::{AnyfileError, Result};
use crate::file_handler::compression::CompressionType;
use crate::file_handler::resolution::resolve_writable;
use bzip2::write::BzEncoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

enum Sink {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
    Bzip2(BzEncoder<BufWriter<File>>),
}

/// Writer for a logical filename
///
/// Creating one runs [`resolve_writable`] first, so an older `foo.gz` cannot
/// shadow a freshly written `foo`. Names ending in `.gz` or `.bz2` are
/// encoded in process; `.xz` and `.zip` names are rejected. Device paths under
/// `/dev` are opened as is.
pub struct AnyWriter {
    sink: Option<Sink>,
    path: PathBuf,
}

impl AnyWriter {
    /// Create (or truncate) `name` for writing
    ///
    /// Fails with [`AnyfileError::InvalidArgument`] for `.xz` and `.zip`
    /// names, before anything is removed.
    ///
    /// # Panics
    /// Panics if a stale variant exists and cannot be removed.
    pub fn create(name: impl AsRef<Path>) -> Result<Self> {
        let path = name.as_ref().to_path_buf();
        let compression = CompressionType::from_name(&path);
        if matches!(compression, CompressionType::Xz | CompressionType::Zip) {
            return Err(AnyfileError::invalid_argument(format!(
                "cannot write {} output: {}",
                compression.name(),
                path.display()
            )));
        }
        if !path.starts_with("/dev") {
            let removed = resolve_writable(&path);
            if removed.is_found() {
                log::debug!("removed {} before writing {}", removed.path.display(), path.display());
            }
        }

        let file = File::create(&path).map_err(|e| {
            AnyfileError::file_error(format!("Failed to create {}", path.display()), e)
        })?;
        let buffered = BufWriter::new(file);
        let sink = match compression {
            CompressionType::Gzip => Sink::Gzip(GzEncoder::new(buffered, Compression::default())),
            CompressionType::Bzip2 => {
                Sink::Bzip2(BzEncoder::new(buffered, bzip2::Compression::default()))
            }
            _ => Sink::Plain(buffered),
        };
        Ok(Self {
            sink: Some(sink),
            path,
        })
    }

    /// Physical path being written
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush buffers and write the gzip trailer, if any
    pub fn finish(mut self) -> Result<()> {
        self.close_sink()
            .map_err(|e| AnyfileError::file_error(format!("Failed to finish {}", self.path.display()), e))
    }

    fn close_sink(&mut self) -> io::Result<()> {
        match self.sink.take() {
            Some(Sink::Plain(mut writer)) => writer.flush(),
            Some(Sink::Gzip(encoder)) => encoder.finish()?.flush(),
            Some(Sink::Bzip2(encoder)) => encoder.finish()?.flush(),
            None => Ok(()),
        }
    }

    fn sink(&mut self) -> io::Result<&mut dyn Write> {
        match self.sink.as_mut() {
            Some(Sink::Plain(writer)) => Ok(writer),
            Some(Sink::Gzip(encoder)) => Ok(encoder),
            Some(Sink::Bzip2(encoder)) => Ok(encoder),
            None => Err(io::Error::new(io::ErrorKind::Other, "writer already finished")),
        }
    }
}

impl Write for AnyWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sink()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink()?.flush()
    }
}

impl Drop for AnyWriter {
    fn drop(&mut self) {
        if let Err(e) = self.close_sink() {
            log::warn!("failed to finish {}: {}", self.path.display(), e);
        }
    }
}
