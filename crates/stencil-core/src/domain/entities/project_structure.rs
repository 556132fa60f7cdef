use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::domain::{
    entities::common::{Permissions, RelativePath},
    error::DomainError,
};

/// Final project structure ready for materialization.
///
/// This is the output of rendering: every path is concrete and contained,
/// every body is final bytes. It contains no business logic, only data, and
/// nothing touches disk until the whole structure exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectStructure {
    pub(crate) root: PathBuf,
    pub(crate) entries: Vec<FsEntry>,
}

impl ProjectStructure {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn add_file(&mut self, path: RelativePath, content: Vec<u8>, perms: Permissions) {
        self.entries.push(FsEntry::File(FileToWrite {
            path,
            content,
            permissions: perms,
        }));
    }

    pub fn add_directory(&mut self, path: RelativePath) {
        self.entries
            .push(FsEntry::Directory(DirectoryToCreate { path }));
    }

    pub fn with_file(
        mut self,
        path: impl Into<RelativePath>,
        content: impl Into<Vec<u8>>,
        perms: Permissions,
    ) -> Self {
        self.add_file(path.into(), content.into(), perms);
        self
    }

    pub fn with_directory(mut self, path: impl Into<RelativePath>) -> Self {
        self.add_directory(path.into());
        self
    }

    /// Two entries rendering to one path is a [`DomainError::DestinationConflict`],
    /// as is a file whose path is another file's parent directory.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for entry in &self.entries {
            if !seen.insert(entry.path()) {
                return Err(DomainError::DestinationConflict {
                    path: entry.path().to_string(),
                });
            }
        }

        for file in self.files() {
            let under_file = self
                .entries
                .iter()
                .any(|e| e.path().as_path().starts_with(file.path.as_path()) && e.path() != &file.path);
            if under_file {
                return Err(DomainError::DestinationConflict {
                    path: file.path.to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn entries(&self) -> &[FsEntry] {
        &self.entries
    }

    pub fn files(&self) -> impl Iterator<Item = &FileToWrite> {
        self.entries.iter().filter_map(|e| match e {
            FsEntry::File(f) => Some(f),
            _ => None,
        })
    }

    pub fn directories(&self) -> impl Iterator<Item = &DirectoryToCreate> {
        self.entries.iter().filter_map(|e| match e {
            FsEntry::Directory(d) => Some(d),
            _ => None,
        })
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn total_bytes(&self) -> usize {
        self.files().map(FileToWrite::size).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsEntry {
    File(FileToWrite),
    Directory(DirectoryToCreate),
}

impl FsEntry {
    pub fn path(&self) -> &RelativePath {
        match self {
            Self::File(f) => &f.path,
            Self::Directory(d) => &d.path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileToWrite {
    pub path: RelativePath,
    pub content: Vec<u8>,
    pub permissions: Permissions,
}

impl FileToWrite {
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryToCreate {
    pub path: RelativePath,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_correctly() {
        let structure = ProjectStructure::new("/tmp/test")
            .with_directory("src")
            .with_file("src/main.py", "print('hi')", Permissions::regular());

        assert_eq!(structure.entry_count(), 2);
        assert_eq!(structure.files().count(), 1);
        assert_eq!(structure.directories().count(), 1);
        assert_eq!(structure.total_bytes(), 11);
        assert!(structure.validate().is_ok());
    }

    #[test]
    fn duplicate_paths_conflict() {
        let structure = ProjectStructure::new("/tmp/test")
            .with_file("main.py", "a", Permissions::regular())
            .with_file("main.py", "b", Permissions::regular());

        assert_eq!(
            structure.validate(),
            Err(DomainError::DestinationConflict {
                path: "main.py".into()
            })
        );
    }

    #[test]
    fn file_used_as_directory_conflicts() {
        let structure = ProjectStructure::new("/tmp/test")
            .with_file("app", "", Permissions::regular())
            .with_file("app/main.py", "", Permissions::regular());

        assert!(matches!(
            structure.validate(),
            Err(DomainError::DestinationConflict { path }) if path == "app"
        ));
    }

    #[test]
    fn empty_structure_is_valid() {
        assert!(ProjectStructure::new("/tmp/test").validate().is_ok());
    }
}
