//! Filesystem provider trait for testable discovery.

use super::types::AttemptOutcome;
use std::path::{Path, PathBuf};

/// Trait for filesystem operations (injectable for testing).
pub trait FsProvider: Send + Sync {
    /// Check if a path exists and is a valid executable.
    fn check_executable(&self, path: &Path) -> AttemptOutcome;

    fn is_dir(&self, path: &Path) -> bool;

    /// Entries of a directory, sorted. Unreadable directories yield nothing.
    fn list_dir(&self, dir: &Path) -> Vec<PathBuf>;
}

/// Production filesystem provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFs;

impl FsProvider for SystemFs {
    fn check_executable(&self, path: &Path) -> AttemptOutcome {
        if !path.exists() {
            return AttemptOutcome::NotFound;
        }

        if !path.is_file() {
            return AttemptOutcome::NotAFile;
        }

        // Windows assumes .exe/.cmd are executable
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            match std::fs::metadata(path) {
                Ok(metadata) => {
                    if metadata.permissions().mode() & 0o111 == 0 {
                        return AttemptOutcome::NotExecutable;
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                    return AttemptOutcome::PermissionDenied;
                }
                Err(e) => {
                    return AttemptOutcome::IoError(e.to_string());
                }
            }
        }

        AttemptOutcome::Ok
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_dir(&self, dir: &Path) -> Vec<PathBuf> {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return Vec::new();
        };
        let mut paths: Vec<PathBuf> = entries.filter_map(Result::ok).map(|e| e.path()).collect();
        paths.sort();
        paths
    }
}

/// Test/mock filesystem provider with predefined responses.
#[cfg(test)]
#[derive(Default)]
pub struct MockFs {
    executables: std::collections::HashSet<PathBuf>,
    non_executables: std::collections::HashSet<PathBuf>,
    dirs: std::collections::BTreeSet<PathBuf>,
}

#[cfg(test)]
impl MockFs {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executables.insert(path.into());
        self
    }

    #[must_use]
    pub fn with_non_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.non_executables.insert(path.into());
        self
    }

    #[must_use]
    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.dirs.insert(path.into());
        self
    }
}

#[cfg(test)]
impl FsProvider for MockFs {
    fn check_executable(&self, path: &Path) -> AttemptOutcome {
        if self.executables.contains(path) {
            AttemptOutcome::Ok
        } else if self.non_executables.contains(path) {
            AttemptOutcome::NotExecutable
        } else {
            AttemptOutcome::NotFound
        }
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains(path)
    }

    fn list_dir(&self, dir: &Path) -> Vec<PathBuf> {
        let files = self.executables.iter().chain(&self.non_executables);
        let mut entries: Vec<PathBuf> = self
            .dirs
            .iter()
            .chain(files)
            .filter(|p| p.parent() == Some(dir))
            .cloned()
            .collect();
        entries.sort();
        entries.dedup();
        entries
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    #[test]
    fn test_system_fs_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("conda");
        let plain = dir.path().join("readme");
        std::fs::write(&exe, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o755)).unwrap();
        std::fs::write(&plain, "x").unwrap();
        std::fs::set_permissions(&plain, std::fs::Permissions::from_mode(0o644)).unwrap();

        assert_eq!(SystemFs.check_executable(&exe), AttemptOutcome::Ok);
        assert_eq!(
            SystemFs.check_executable(&plain),
            AttemptOutcome::NotExecutable
        );
        assert_eq!(SystemFs.check_executable(dir.path()), AttemptOutcome::NotAFile);
        assert_eq!(
            SystemFs.check_executable(&dir.path().join("missing")),
            AttemptOutcome::NotFound
        );
        assert_eq!(SystemFs.list_dir(dir.path()), vec![exe, plain]);
    }

    #[test]
    fn test_mock_fs_lists_children_only() {
        let fs = MockFs::new()
            .with_dir("/home/me/miniforge3")
            .with_dir("/home/me/miniforge3/bin")
            .with_executable("/home/me/miniforge3/bin/conda");

        assert_eq!(
            fs.list_dir(Path::new("/home/me")),
            vec![PathBuf::from("/home/me/miniforge3")]
        );
    }
}
