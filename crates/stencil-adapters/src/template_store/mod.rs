//! Archetype stores that do not read from disk.

mod memory;

pub use memory::InMemoryArchetypeStore;
