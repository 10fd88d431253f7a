//! Filesystem predicates used during resolution.
//!
//! These checks never fail: any metadata error counts as "no".

use std::path::Path;

/// True when `path` exists (file, directory, or symlink target)
pub fn path_ok(path: &Path) -> bool {
    std::fs::metadata(path).is_ok()
}

/// True when `path` exists and carries at least one execute bit
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|metadata| metadata.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// True when `path` exists and is a regular file
#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|metadata| metadata.is_file())
        .unwrap_or(false)
}

/// True when the name designates a script to be executed
pub fn is_script_name(path: &Path) -> bool {
    crate::file_handler::compression::has_suffix(path, ".bash")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    /// Create a test file with specific content
    fn create_test_file(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content)
            .expect("Failed to write test content");
        file.flush().expect("Failed to flush test file");
        file
    }

    #[test]
    fn test_path_ok() {
        let test_file = create_test_file(b"line\n");
        assert!(path_ok(test_file.path()));

        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        assert!(path_ok(temp_dir.path()));
        assert!(!path_ok(&temp_dir.path().join("missing")));
    }

    #[cfg(unix)]
    #[test]
    fn test_is_executable_checks_mode_bits() {
        use std::os::unix::fs::PermissionsExt;

        let test_file = create_test_file(b"#!/bin/sh\necho hi\n");
        let path = test_file.path();

        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o644)).unwrap();
        assert!(!is_executable(path));

        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o744)).unwrap();
        assert!(is_executable(path));

        assert!(!is_executable(Path::new("/this/file/does/not/exist.bash")));
    }

    #[test]
    fn test_is_script_name() {
        assert!(is_script_name(Path::new("jobs/report.bash")));
        assert!(!is_script_name(Path::new("jobs/report.sh")));
        assert!(!is_script_name(Path::new("report.bash.gz")));
    }
}
