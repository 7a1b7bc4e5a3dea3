//! The scene object model: prims, attributes, relationships, and the
//! `Object` sum type that generalises over them.

use std::sync::Arc;

use sc_repr::{Journal, ScenePath};

/// An opaque, stable identifier for a prim's typed-and-applied schema
/// configuration.
///
/// Two prims with identical type name and applied-schema set compare
/// equal under this key, independent of path or identity — this is what
/// lets the definition registry cache "which computations does a prim of
/// this shape expose" across many structurally-identical prims.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SchemaConfigKey(Arc<str>);

impl SchemaConfigKey {
    /// Builds a key from a type name and a set of applied schema names.
    ///
    /// The applied schemas are sorted before joining so that the key is
    /// independent of registration order.
    pub fn new(type_name: Option<&str>, mut applied_schemas: Vec<String>) -> Self {
        applied_schemas.sort_unstable();
        let joined = applied_schemas.join(",");
        SchemaConfigKey(Arc::from(format!("{}|{joined}", type_name.unwrap_or(""))))
    }

    /// The opaque string form of this key, for diagnostics.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A prim: a namespace node that owns properties (attributes and
/// relationships) and has a type and applied schemas.
pub trait Prim: Send + Sync {
    /// Returns `false` if this prim no longer exists in the scene.
    fn is_valid(&self, journal: &mut Journal) -> bool;
    /// This prim's path. Stable for the prim's identity; reading it does
    /// not itself journal anything.
    fn path(&self) -> &ScenePath;
    /// The last component of [`Prim::path`], or `""` for the pseudo-root.
    fn name(&self) -> &str {
        self.path().name()
    }
    /// This prim's parent, or `None` if this is the pseudo-root.
    fn parent(&self, journal: &mut Journal) -> Option<Arc<dyn Prim>>;
    /// The named attribute on this prim, if it has one.
    fn attribute(&self, name: &str, journal: &mut Journal) -> Option<Arc<dyn Attribute>>;
    /// The named relationship on this prim, if it has one.
    fn relationship(&self, name: &str, journal: &mut Journal) -> Option<Arc<dyn Relationship>>;
    /// This prim's type name, if it has a concrete type.
    fn type_name(&self, journal: &mut Journal) -> Option<String>;
    /// The API schemas applied to this prim, in unspecified order.
    fn applied_schemas(&self, journal: &mut Journal) -> Vec<String>;
    /// `true` for the conventional top-level prim every other prim
    /// descends from.
    fn is_pseudo_root(&self) -> bool;
    /// This prim's schema configuration key (§3).
    fn schema_config_key(&self, journal: &mut Journal) -> SchemaConfigKey;
}

/// An attribute: a value-bearing property of a prim.
pub trait Attribute: Send + Sync {
    /// Returns `false` if this attribute no longer exists in the scene.
    fn is_valid(&self, journal: &mut Journal) -> bool;
    /// This attribute's path.
    fn path(&self) -> &ScenePath;
    /// The last component of [`Attribute::path`].
    fn name(&self) -> &str {
        self.path().name()
    }
    /// The prim that owns this attribute.
    fn prim(&self, journal: &mut Journal) -> Option<Arc<dyn Prim>>;
}

/// A relationship: a property whose value is a list of target paths.
pub trait Relationship: Send + Sync {
    /// Returns `false` if this relationship no longer exists in the
    /// scene.
    fn is_valid(&self, journal: &mut Journal) -> bool;
    /// This relationship's path.
    fn path(&self) -> &ScenePath;
    /// The last component of [`Relationship::path`].
    fn name(&self) -> &str {
        self.path().name()
    }
    /// The prim that owns this relationship.
    fn prim(&self, journal: &mut Journal) -> Option<Arc<dyn Prim>>;
    /// The relationship's direct target paths, before forwarding.
    fn target_paths(&self, journal: &mut Journal) -> Vec<ScenePath>;
}

/// The sum type over the three kinds of scene object a resolver or
/// computation definition may be handed.
#[derive(Clone)]
pub enum Object {
    /// A prim.
    Prim(Arc<dyn Prim>),
    /// An attribute.
    Attribute(Arc<dyn Attribute>),
    /// A relationship.
    Relationship(Arc<dyn Relationship>),
}

impl Object {
    /// This object's path, regardless of kind.
    pub fn path(&self) -> &ScenePath {
        match self {
            Object::Prim(p) => p.path(),
            Object::Attribute(a) => a.path(),
            Object::Relationship(r) => r.path(),
        }
    }

    /// `false` if the underlying scene object no longer exists.
    pub fn is_valid(&self, journal: &mut Journal) -> bool {
        match self {
            Object::Prim(p) => p.is_valid(journal),
            Object::Attribute(a) => a.is_valid(journal),
            Object::Relationship(r) => r.is_valid(journal),
        }
    }

    /// This object's owning prim: itself if it already is one.
    pub fn prim(&self, journal: &mut Journal) -> Option<Arc<dyn Prim>> {
        match self {
            Object::Prim(p) => Some(Arc::clone(p)),
            Object::Attribute(a) => a.prim(journal),
            Object::Relationship(r) => r.prim(journal),
        }
    }

    /// Downcasts to a prim, if this object is one.
    pub fn as_prim(&self) -> Option<&Arc<dyn Prim>> {
        match self {
            Object::Prim(p) => Some(p),
            _ => None,
        }
    }

    /// Downcasts to an attribute, if this object is one.
    pub fn as_attribute(&self) -> Option<&Arc<dyn Attribute>> {
        match self {
            Object::Attribute(a) => Some(a),
            _ => None,
        }
    }

    /// Downcasts to a relationship, if this object is one.
    pub fn as_relationship(&self) -> Option<&Arc<dyn Relationship>> {
        match self {
            Object::Relationship(r) => Some(r),
            _ => None,
        }
    }
}

impl From<Arc<dyn Prim>> for Object {
    fn from(prim: Arc<dyn Prim>) -> Self {
        Object::Prim(prim)
    }
}

impl From<Arc<dyn Attribute>> for Object {
    fn from(attribute: Arc<dyn Attribute>) -> Self {
        Object::Attribute(attribute)
    }
}

impl From<Arc<dyn Relationship>> for Object {
    fn from(relationship: Arc<dyn Relationship>) -> Self {
        Object::Relationship(relationship)
    }
}
