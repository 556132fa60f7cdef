use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::domain::error::DomainError;

/// A filesystem path guaranteed to be **relative** and to stay inside the
/// directory it is joined onto.
///
/// Template paths and rendered paths are both held as `RelativePath`, so a
/// placeholder value such as `../../etc` can never steer output outside the
/// destination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// Create a new relative path.
    ///
    /// # Panics
    /// Panics if the provided path is absolute or climbs out with `..`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        assert!(is_contained(&path), "RelativePath must be contained: {path:?}");
        Self(path)
    }

    /// Non-panicking variant used for anything derived from user data.
    pub fn try_new(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        if path.is_absolute() || path.has_root() {
            return Err(DomainError::AbsolutePathNotAllowed {
                path: path.display().to_string(),
            });
        }
        if !is_contained(&path) {
            return Err(DomainError::InvalidArchetype(format!(
                "path '{}' must not contain '..' or be empty",
                path.display()
            )));
        }
        Ok(Self(path))
    }

    /// Borrow as a `Path`.
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Forward-slash form, identical on every platform. Used as the
    /// placeholder source for path rendering.
    pub fn to_slash_string(&self) -> String {
        self.0
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Only normal components, at least one of them.
fn is_contained(path: &Path) -> bool {
    let mut normal = 0usize;
    for component in path.components() {
        match component {
            Component::Normal(_) => normal += 1,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    normal > 0
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl From<&str> for RelativePath {
    fn from(s: &str) -> Self {
        RelativePath::new(s)
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_slash_string())
    }
}

/// Permission model for generated artifacts.
///
/// Archetypes only carry one bit that matters across platforms: whether a
/// file (a `scripts/*.sh`, say) must be executable in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Permissions {
    executable: bool,
}

impl Permissions {
    pub const fn regular() -> Self {
        Self { executable: false }
    }

    pub const fn executable() -> Self {
        Self { executable: true }
    }

    pub const fn is_executable(&self) -> bool {
        self.executable
    }
}
