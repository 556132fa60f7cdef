//! In-memory archetype store.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use stencil_core::{
    application::{ApplicationError, ports::ArchetypeStore},
    domain::{Archetype, DomainValidator as validator},
    error::StencilResult,
};

/// Thread-safe in-memory archetype store, keyed by location.
///
/// Used by tests and by embedders that build archetypes in code.
#[derive(Clone, Default)]
pub struct InMemoryArchetypeStore {
    inner: Arc<RwLock<HashMap<PathBuf, Archetype>>>,
}

impl InMemoryArchetypeStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the archetype served for `location`.
    pub fn insert(&self, location: impl Into<PathBuf>, archetype: Archetype) -> StencilResult<()> {
        validator::validate_archetype(&archetype)?;
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.insert(location.into(), archetype);
        Ok(())
    }

    /// Get the number of archetypes.
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    /// Check if store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArchetypeStore for InMemoryArchetypeStore {
    fn load(&self, location: &Path) -> StencilResult<Archetype> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.get(location).cloned().ok_or_else(|| {
            ApplicationError::ArchetypeNotFound {
                location: location.to_path_buf(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stencil_core::domain::{ArchetypeMetadata, FileSpec, TemplateNode};
    use stencil_core::error::StencilError;

    fn archetype() -> Archetype {
        Archetype::builder()
            .metadata(ArchetypeMetadata::new("mem"))
            .add_node(TemplateNode::File(FileSpec::text("a.txt", "a")))
            .build()
            .unwrap()
    }

    #[test]
    fn insert_then_load() {
        let store = InMemoryArchetypeStore::new();
        store.insert("mem", archetype()).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.load(Path::new("mem")).unwrap().name(), "mem");
    }

    #[test]
    fn unknown_location_is_not_found() {
        let store = InMemoryArchetypeStore::new();
        assert!(store.is_empty());
        assert!(matches!(
            store.load(Path::new("nope")),
            Err(StencilError::Application(ApplicationError::ArchetypeNotFound { .. }))
        ));
    }
}
