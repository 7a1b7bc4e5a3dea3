//! An in-memory reference scene and registry, for tests and examples.
//!
//! Not part of the core's external-interface contract (§6): a real
//! embedder supplies its own [`crate::adapter::SceneAdapter`] and
//! [`crate::registry::DefinitionRegistry`] backed by the composed scene
//! and schema system. This fixture exists so the compilation crates can
//! exercise the concrete scenarios in §8 without one.

mod registry;
mod scene;

pub use registry::MemoryRegistry;
pub use scene::MemoryScene;
