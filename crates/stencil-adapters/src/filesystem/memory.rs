//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use stencil_core::{
    application::{ApplicationError, ports::Filesystem},
    error::StencilResult,
};

/// In-memory filesystem for testing.
///
/// Clones share state, so a test can hand one clone to a service and
/// inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: BTreeSet<PathBuf>,
    executables: BTreeSet<PathBuf>,
    /// Writes to a path ending with this suffix fail (rollback tests).
    fail_writes_to: Option<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write to a path ending in `suffix` fail.
    pub fn failing_writes_to(self, suffix: impl Into<PathBuf>) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            inner.fail_writes_to = Some(suffix.into());
        }
        self
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<Vec<u8>> {
        self.read().ok()?.files.get(path).cloned()
    }

    /// Read a file as UTF-8 (testing helper).
    pub fn read_to_string(&self, path: &Path) -> Option<String> {
        self.read_file(path).and_then(|b| String::from_utf8(b).ok())
    }

    /// Check if a file is marked executable.
    pub fn is_executable(&self, path: &Path) -> bool {
        self.read()
            .map(|inner| inner.executables.contains(path))
            .unwrap_or(false)
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Clear all contents.
    pub fn clear(&self) -> StencilResult<()> {
        let mut inner = self.write()?;
        inner.files.clear();
        inner.directories.clear();
        inner.executables.clear();
        Ok(())
    }

    fn read(&self) -> StencilResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        Ok(self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?)
    }

    fn write(&self) -> StencilResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        Ok(self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?)
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> StencilResult<()> {
        let mut inner = self.write()?;

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            if inner.files.contains_key(&current) {
                return Err(ApplicationError::FilesystemError {
                    path: current,
                    reason: "Not a directory".into(),
                }
                .into());
            }
            inner.directories.insert(current.clone());
        }

        Ok(())
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> StencilResult<()> {
        let mut inner = self.write()?;

        if inner
            .fail_writes_to
            .as_ref()
            .is_some_and(|suffix| path.ends_with(suffix))
        {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "Simulated write failure".into(),
            }
            .into());
        }

        // Ensure parent exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into());
            }
        }

        inner.files.insert(path.to_path_buf(), content.to_vec());
        Ok(())
    }

    fn set_permissions(&self, path: &Path, executable: bool) -> StencilResult<()> {
        let mut inner = self.write()?;

        if executable {
            inner.executables.insert(path.to_path_buf());
        } else {
            inner.executables.remove(path);
        }

        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn is_empty_dir(&self, path: &Path) -> StencilResult<bool> {
        let inner = self.read()?;
        if !inner.directories.contains(path) {
            return Ok(false);
        }
        let has_children = inner.files.keys().any(|p| p.parent() == Some(path))
            || inner.directories.iter().any(|p| p.parent() == Some(path));
        Ok(!has_children)
    }

    fn remove_dir_all(&self, path: &Path) -> StencilResult<()> {
        let mut inner = self.write()?;

        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        inner.executables.retain(|p| !p.starts_with(path));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_requires_parent() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("/a/b.txt"), b"x").is_err());

        fs.create_dir_all(Path::new("/a")).unwrap();
        fs.write_file(Path::new("/a/b.txt"), b"x").unwrap();
        assert_eq!(fs.read_to_string(Path::new("/a/b.txt")).as_deref(), Some("x"));
    }

    #[test]
    fn empty_dir_tracking() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("/out")).unwrap();
        assert!(fs.is_empty_dir(Path::new("/out")).unwrap());

        fs.create_dir_all(Path::new("/out/src")).unwrap();
        assert!(!fs.is_empty_dir(Path::new("/out")).unwrap());
        assert!(!fs.is_empty_dir(Path::new("/missing")).unwrap());
    }

    #[test]
    fn remove_dir_all_drops_subtree() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("/out/src")).unwrap();
        fs.write_file(Path::new("/out/src/run.sh"), b"").unwrap();
        fs.set_permissions(Path::new("/out/src/run.sh"), true).unwrap();

        fs.remove_dir_all(Path::new("/out")).unwrap();

        assert!(!fs.exists(Path::new("/out")));
        assert!(fs.list_files().is_empty());
        assert!(!fs.is_executable(Path::new("/out/src/run.sh")));
        assert!(fs.exists(Path::new("/")));
    }

    #[test]
    fn simulated_failures() {
        let fs = MemoryFilesystem::new().failing_writes_to("boom.txt");
        fs.create_dir_all(Path::new("/x")).unwrap();
        assert!(fs.write_file(Path::new("/x/boom.txt"), b"").is_err());
        assert!(fs.write_file(Path::new("/x/ok.txt"), b"").is_ok());
    }

    #[test]
    fn clones_share_state() {
        let a = MemoryFilesystem::new();
        let b = a.clone();
        a.create_dir_all(Path::new("/shared")).unwrap();
        assert!(b.exists(Path::new("/shared")));
        b.clear().unwrap();
        assert!(!a.exists(Path::new("/shared")));
    }
}
