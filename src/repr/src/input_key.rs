//! Input keys: descriptions, relative to an origin object, of how to locate
//! and identify an input to a computation.

use crate::result_type::ResultType;

/// One step of a local traversal path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LocalTraversalStep {
    /// `.` — stay at the current object.
    Here,
    /// `..` — move to the parent prim.
    Parent,
    /// A property name — move to the named attribute (or relationship) on
    /// the current prim.
    Property(String),
}

/// The local traversal portion of a [`ProviderResolution`]: either "start
/// at the stage pseudo-root" or a sequence of relative steps from the
/// origin object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LocalTraversal {
    /// Start at the scene's absolute root (pseudo-root), ignoring the
    /// origin object entirely.
    AbsoluteRoot,
    /// Walk these steps, in order, starting at the origin object.
    Relative(Vec<LocalTraversalStep>),
}

impl LocalTraversal {
    /// The trivial relative traversal consisting of a single `.` step,
    /// i.e. "stay at the origin object". This is what leaf requests and
    /// local dynamic-traversal input keys use.
    pub fn here() -> Self {
        LocalTraversal::Relative(vec![LocalTraversalStep::Here])
    }
}

/// How the dynamic (post-local-traversal) portion of resolution proceeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DynamicTraversal {
    /// Look up the computation directly on the current object.
    Local,
    /// Walk up through namespace ancestors until one defines the
    /// computation with a matching result type, or the pseudo-root is
    /// reached.
    NamespaceAncestor,
    /// Resolve via a relationship's targeted objects.
    ///
    /// Reserved by the enumeration but not realised by this core (§4.3);
    /// the resolver rejects input keys specifying this variant rather than
    /// silently producing no output keys, so a caller can tell the
    /// difference between "resolved to nothing" and "not implemented".
    RelationshipTargetedObjects,
}

/// Describes how a definition's input should be located and identified,
/// relative to the provider object the computation is being compiled for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderResolution {
    /// The local traversal to apply before dynamic traversal.
    pub local_traversal: LocalTraversal,
    /// The dynamic traversal to apply after the local traversal.
    pub dynamic_traversal: DynamicTraversal,
}

/// A description, relative to an origin object, of how to locate and
/// identify an input to a computation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputKey {
    /// The name of this input on the consuming node, used when connecting
    /// resolved sources.
    pub input_name: String,
    /// The name of the computation to request at the resolved provider.
    pub computation_name: String,
    /// The result type the input expects. May be [`ResultType::UNKNOWN`]
    /// only for leaf requests.
    pub result_type: ResultType,
    /// How to find the provider object for this input.
    pub provider_resolution: ProviderResolution,
    /// If `true`, the resolver producing zero output keys is not a
    /// compilation failure.
    pub optional: bool,
}

impl InputKey {
    /// Builds the synthetic input key a leaf task uses to resolve its
    /// single requested value key: `localTraversal = "."`,
    /// `dynamicTraversal = Local`, non-optional.
    pub fn leaf(input_name: impl Into<String>, computation_name: impl Into<String>) -> Self {
        InputKey {
            input_name: input_name.into(),
            computation_name: computation_name.into(),
            result_type: ResultType::UNKNOWN,
            provider_resolution: ProviderResolution {
                local_traversal: LocalTraversal::here(),
                dynamic_traversal: DynamicTraversal::Local,
            },
            optional: false,
        }
    }
}
