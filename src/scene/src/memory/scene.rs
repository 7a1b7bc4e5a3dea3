//! A mutable, in-process scene fixture implementing [`SceneAdapter`].

use std::sync::Arc;

use dashmap::DashMap;
use sc_repr::{Journal, ScenePath};
use tracing::trace;

use crate::adapter::{
    journal_existence_read, journal_parent_read, journal_property_list_read, journal_target_read,
    SceneAdapter,
};
use crate::object::{Attribute, Prim, Relationship, SchemaConfigKey};

struct PrimRecord {
    parent: Option<ScenePath>,
    type_name: Option<String>,
    applied_schemas: Vec<String>,
    attributes: Vec<String>,
    relationships: Vec<String>,
}

struct Inner {
    prims: DashMap<ScenePath, PrimRecord>,
    attribute_parents: DashMap<ScenePath, ScenePath>,
    attribute_values: DashMap<ScenePath, i64>,
    relationship_parents: DashMap<ScenePath, ScenePath>,
    relationship_targets: DashMap<ScenePath, Vec<ScenePath>>,
}

/// A cheaply-cloneable handle to an in-memory scene.
///
/// Tests build one of these, populate it with prims/attributes/
/// relationships, then hand it to the compiler as a `SceneAdapter`. All
/// state lives behind `Arc`s internally, so cloning a `MemoryScene` is a
/// pointer copy and every clone sees the same mutations.
#[derive(Clone)]
pub struct MemoryScene {
    inner: Arc<Inner>,
}

impl MemoryScene {
    /// Builds a scene containing only the pseudo-root.
    pub fn new() -> Self {
        let prims = DashMap::new();
        prims.insert(
            ScenePath::absolute_root(),
            PrimRecord {
                parent: None,
                type_name: None,
                applied_schemas: Vec::new(),
                attributes: Vec::new(),
                relationships: Vec::new(),
            },
        );
        MemoryScene {
            inner: Arc::new(Inner {
                prims,
                attribute_parents: DashMap::new(),
                attribute_values: DashMap::new(),
                relationship_parents: DashMap::new(),
                relationship_targets: DashMap::new(),
            }),
        }
    }

    /// Adds a prim at `path`. The parent path must already exist.
    ///
    /// # Panics
    ///
    /// Panics if `path`'s parent is not already present; this fixture is
    /// test-only code and expects callers to build scenes top-down.
    pub fn add_prim(&self, path: &ScenePath, type_name: Option<&str>, applied_schemas: &[&str]) {
        let parent = path
            .parent()
            .expect("add_prim called with the absolute root");
        assert!(
            self.inner.prims.contains_key(&parent),
            "parent {parent} of {path} must be added first"
        );
        self.inner.prims.insert(
            path.clone(),
            PrimRecord {
                parent: Some(parent),
                type_name: type_name.map(String::from),
                applied_schemas: applied_schemas.iter().map(|s| s.to_string()).collect(),
                attributes: Vec::new(),
                relationships: Vec::new(),
            },
        );
        trace!(path = %path, "added prim");
    }

    /// Adds an integer-valued attribute to the prim at `prim_path`,
    /// returning the attribute's path.
    pub fn add_attribute(&self, prim_path: &ScenePath, name: &str, value: i64) -> ScenePath {
        let attr_path = prim_path.append_child(name);
        if let Some(mut record) = self.inner.prims.get_mut(prim_path) {
            record.attributes.push(name.to_string());
        }
        self.inner
            .attribute_parents
            .insert(attr_path.clone(), prim_path.clone());
        self.inner.attribute_values.insert(attr_path.clone(), value);
        trace!(path = %attr_path, "added attribute");
        attr_path
    }

    /// Adds a relationship to the prim at `prim_path`, returning the
    /// relationship's path.
    pub fn add_relationship(
        &self,
        prim_path: &ScenePath,
        name: &str,
        targets: Vec<ScenePath>,
    ) -> ScenePath {
        let rel_path = prim_path.append_child(name);
        if let Some(mut record) = self.inner.prims.get_mut(prim_path) {
            record.relationships.push(name.to_string());
        }
        self.inner
            .relationship_parents
            .insert(rel_path.clone(), prim_path.clone());
        self.inner
            .relationship_targets
            .insert(rel_path.clone(), targets);
        trace!(path = %rel_path, "added relationship");
        rel_path
    }

    /// Overwrites the target list of an existing relationship, to
    /// simulate a `ChangedTargetPaths` edit in tests.
    pub fn set_relationship_targets(&self, rel_path: &ScenePath, targets: Vec<ScenePath>) {
        self.inner
            .relationship_targets
            .insert(rel_path.clone(), targets);
        trace!(path = %rel_path, "changed relationship targets");
    }

    /// Removes the prim at `path` and every descendant prim/property, to
    /// simulate a resync-with-deletion edit in tests.
    pub fn remove_prim(&self, path: &ScenePath) {
        let descendants: Vec<ScenePath> = self
            .inner
            .prims
            .iter()
            .map(|e| e.key().clone())
            .filter(|p| path.is_prefix_of(p))
            .collect();
        for p in descendants {
            self.inner.prims.remove(&p);
        }
        trace!(path = %path, "removed prim subtree");
    }

    /// Returns the stored value of an attribute added via
    /// [`MemoryScene::add_attribute`], for test assertions.
    pub fn attribute_value(&self, path: &ScenePath) -> Option<i64> {
        self.inner.attribute_values.get(path).map(|v| *v)
    }
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self::new()
    }
}

struct MemoryPrim {
    scene: MemoryScene,
    path: ScenePath,
}

impl Prim for MemoryPrim {
    fn is_valid(&self, journal: &mut Journal) -> bool {
        journal_existence_read(journal, &self.path);
        self.scene.inner.prims.contains_key(&self.path)
    }

    fn path(&self) -> &ScenePath {
        &self.path
    }

    fn parent(&self, journal: &mut Journal) -> Option<Arc<dyn Prim>> {
        journal_parent_read(journal, &self.path);
        let parent = self.scene.inner.prims.get(&self.path)?.parent.clone()?;
        Some(Arc::new(MemoryPrim {
            scene: self.scene.clone(),
            path: parent,
        }))
    }

    fn attribute(&self, name: &str, journal: &mut Journal) -> Option<Arc<dyn Attribute>> {
        journal_property_list_read(journal, &self.path);
        let record = self.scene.inner.prims.get(&self.path)?;
        if record.attributes.iter().any(|a| a == name) {
            Some(Arc::new(MemoryAttribute {
                scene: self.scene.clone(),
                path: self.path.append_child(name),
            }))
        } else {
            None
        }
    }

    fn relationship(&self, name: &str, journal: &mut Journal) -> Option<Arc<dyn Relationship>> {
        journal_property_list_read(journal, &self.path);
        let record = self.scene.inner.prims.get(&self.path)?;
        if record.relationships.iter().any(|r| r == name) {
            Some(Arc::new(MemoryRelationship {
                scene: self.scene.clone(),
                path: self.path.append_child(name),
            }))
        } else {
            None
        }
    }

    fn type_name(&self, journal: &mut Journal) -> Option<String> {
        journal_parent_read(journal, &self.path);
        self.scene.inner.prims.get(&self.path)?.type_name.clone()
    }

    fn applied_schemas(&self, journal: &mut Journal) -> Vec<String> {
        journal_parent_read(journal, &self.path);
        self.scene
            .inner
            .prims
            .get(&self.path)
            .map(|r| r.applied_schemas.clone())
            .unwrap_or_default()
    }

    fn is_pseudo_root(&self) -> bool {
        self.path.is_absolute_root()
    }

    fn schema_config_key(&self, journal: &mut Journal) -> SchemaConfigKey {
        let type_name = self.type_name(journal);
        let applied_schemas = self.applied_schemas(journal);
        SchemaConfigKey::new(type_name.as_deref(), applied_schemas)
    }
}

struct MemoryAttribute {
    scene: MemoryScene,
    path: ScenePath,
}

impl Attribute for MemoryAttribute {
    fn is_valid(&self, journal: &mut Journal) -> bool {
        journal_existence_read(journal, &self.path);
        self.scene.inner.attribute_parents.contains_key(&self.path)
    }

    fn path(&self) -> &ScenePath {
        &self.path
    }

    fn prim(&self, _journal: &mut Journal) -> Option<Arc<dyn Prim>> {
        let prim_path = self.scene.inner.attribute_parents.get(&self.path)?.clone();
        Some(Arc::new(MemoryPrim {
            scene: self.scene.clone(),
            path: prim_path,
        }))
    }
}

struct MemoryRelationship {
    scene: MemoryScene,
    path: ScenePath,
}

impl Relationship for MemoryRelationship {
    fn is_valid(&self, journal: &mut Journal) -> bool {
        journal_existence_read(journal, &self.path);
        self.scene
            .inner
            .relationship_parents
            .contains_key(&self.path)
    }

    fn path(&self) -> &ScenePath {
        &self.path
    }

    fn prim(&self, _journal: &mut Journal) -> Option<Arc<dyn Prim>> {
        let prim_path = self
            .scene
            .inner
            .relationship_parents
            .get(&self.path)?
            .clone();
        Some(Arc::new(MemoryPrim {
            scene: self.scene.clone(),
            path: prim_path,
        }))
    }

    fn target_paths(&self, journal: &mut Journal) -> Vec<ScenePath> {
        journal_target_read(journal, &self.path);
        self.scene
            .inner
            .relationship_targets
            .get(&self.path)
            .map(|t| t.clone())
            .unwrap_or_default()
    }
}

impl SceneAdapter for MemoryScene {
    fn pseudo_root(&self) -> Arc<dyn Prim> {
        Arc::new(MemoryPrim {
            scene: self.clone(),
            path: ScenePath::absolute_root(),
        })
    }

    fn get_prim(&self, path: &ScenePath, journal: &mut Journal) -> Option<Arc<dyn Prim>> {
        journal_parent_read(journal, path);
        if self.inner.prims.contains_key(path) {
            Some(Arc::new(MemoryPrim {
                scene: self.clone(),
                path: path.clone(),
            }))
        } else {
            None
        }
    }

    fn get_attribute(&self, path: &ScenePath, journal: &mut Journal) -> Option<Arc<dyn Attribute>> {
        if let Some(parent) = path.parent() {
            journal_property_list_read(journal, &parent);
        }
        if self.inner.attribute_parents.contains_key(path) {
            Some(Arc::new(MemoryAttribute {
                scene: self.clone(),
                path: path.clone(),
            }))
        } else {
            None
        }
    }

    fn get_relationship(&self, path: &ScenePath, journal: &mut Journal) -> Option<Arc<dyn Relationship>> {
        if let Some(parent) = path.parent() {
            journal_property_list_read(journal, &parent);
        }
        if self.inner.relationship_parents.contains_key(path) {
            Some(Arc::new(MemoryRelationship {
                scene: self.clone(),
                path: path.clone(),
            }))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sc_repr::EditReason;

    #[test]
    fn parent_walk_reaches_pseudo_root() {
        let scene = MemoryScene::new();
        let root = ScenePath::absolute_root();
        let a = ScenePath::new("/A").unwrap();
        scene.add_prim(&a, None, &[]);

        let mut journal = Journal::new();
        let prim = scene.get_prim(&a, &mut journal).unwrap();
        let parent = prim.parent(&mut journal).unwrap();
        assert!(parent.is_pseudo_root());
        assert_eq!(parent.path(), &root);
    }

    #[test]
    fn attribute_lookup_journals_property_list_change() {
        let scene = MemoryScene::new();
        let a = ScenePath::new("/Prim1").unwrap();
        scene.add_prim(&a, Some("CustomType"), &[]);
        let attr_path = scene.add_attribute(&a, "attr1", 1);

        let mut journal = Journal::new();
        let prim = scene.get_prim(&a, &mut journal).unwrap();
        let attr = prim.attribute("attr1", &mut journal).unwrap();
        assert_eq!(attr.path(), &attr_path);
        assert_eq!(
            journal.get(&a),
            Some(EditReason::RESYNCED_OBJECT | EditReason::CHANGED_PROPERTY_LIST)
        );
    }

    #[test]
    fn relationship_forwarding_terminates_on_cycles() {
        let scene = MemoryScene::new();
        let a = ScenePath::new("/A").unwrap();
        let b = ScenePath::new("/B").unwrap();
        scene.add_prim(&a, None, &[]);
        scene.add_prim(&b, None, &[]);
        let rel_a = scene.add_relationship(&a, "rel", vec![b.append_child("rel")]);
        let _rel_b = scene.add_relationship(&b, "rel", vec![a.append_child("rel")]);

        let mut journal = Journal::new();
        let relationship = scene.get_relationship(&rel_a, &mut journal).unwrap();
        let targets = scene.forwarded_targets(&relationship, &mut journal);
        assert!(targets.is_empty(), "a pure relationship cycle has no concrete targets");
    }
}
