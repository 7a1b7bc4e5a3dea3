//! Computation definitions and the registry that maps scene objects to
//! them.

use std::sync::Arc;

use sc_network::NodeFactoryContext;
use sc_network::NodeId;
use sc_repr::{DefinitionId, InputKey, Journal, ResultType, ScenePath};

use crate::object::Object;

/// The reserved prefix marking a builtin computation name (§6).
///
/// Registration of a non-builtin (plugin) definition under this prefix is
/// rejected; see [`crate::error::SceneError::BuiltinPrefixAbuse`].
pub const BUILTIN_PREFIX: &str = "__";

/// Returns `true` if `name` uses the reserved builtin prefix.
pub fn is_builtin_name(name: &str) -> bool {
    name.starts_with(BUILTIN_PREFIX)
}

/// An immutable, registry-owned description of a named computation.
///
/// Carries a result type, input keys (possibly derived from the provider
/// at resolve time), and a factory producing a concrete network node
/// given `(provider, nodeJournal, nodeFactoryContext)` (§3).
pub trait ComputationDefinition: Send + Sync {
    /// This definition's stable identity, used by [`OutputKey::identity`].
    fn id(&self) -> DefinitionId;

    /// The computation name this definition answers to.
    fn computation_name(&self) -> &str;

    /// The type this computation's output carries.
    fn result_type(&self) -> ResultType;

    /// The input keys this computation's node needs, evaluated against
    /// `provider` (some definitions derive their inputs from the provider,
    /// e.g. a schema-driven relationship input).
    ///
    /// Scene reads performed while deriving input keys are journaled into
    /// `journal` — the *node's* journal, not any one input's.
    fn input_keys(&self, provider: &Object, journal: &mut Journal) -> Vec<InputKey>;

    /// Constructs (or, for singletons, retrieves) the network node for
    /// `provider`, through `ctx`.
    fn create_node(
        &self,
        provider: &Object,
        node_journal: &Journal,
        ctx: &dyn NodeFactoryContext,
    ) -> NodeId;
}

/// A `(providerObject, computationDefinition)` pair: what the resolver
/// produces and what the task graph compiles.
#[derive(Clone)]
pub struct OutputKey {
    /// The scene object the computation is rooted at.
    pub provider: Object,
    /// The computation definition to compile at that provider.
    pub definition: Arc<dyn ComputationDefinition>,
}

/// The hashable, provider-object-independent identity of an [`OutputKey`].
///
/// Two output keys compare equal iff their provider paths and definition
/// identities are equal (§3), independent of the live `Object`/definition
/// handles — this is what the compiled-output cache and task-sync
/// structures key on.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OutputKeyIdentity {
    provider_path: ScenePath,
    definition_id: DefinitionId,
}

impl OutputKeyIdentity {
    /// Builds an identity directly from its parts, for tests and callers
    /// that only have a provider path and a definition id on hand (e.g.
    /// when looking up a node's recompilation info).
    pub fn new(provider_path: ScenePath, definition_id: DefinitionId) -> Self {
        OutputKeyIdentity {
            provider_path,
            definition_id,
        }
    }
}

impl OutputKey {
    /// Computes this output key's identity.
    pub fn identity(&self) -> OutputKeyIdentity {
        OutputKeyIdentity::new(self.provider.path().clone(), self.definition.id())
    }
}

/// Maps a provider's schema configuration to the computation definitions
/// it exposes (§4.2).
///
/// Implementations must be thread-safe and referentially stable for the
/// lifetime of the program: the same `(provider, computationName)` lookup
/// must keep returning the same `Arc<dyn ComputationDefinition>` so that
/// output-key identities remain stable across compilation rounds.
pub trait DefinitionRegistry: Send + Sync {
    /// Looks up the computation named `computation_name` on `provider`,
    /// journaling whatever scene reads the lookup itself performs (e.g.
    /// the provider's schema configuration key).
    fn find_definition(
        &self,
        provider: &Object,
        computation_name: &str,
        journal: &mut Journal,
    ) -> Option<Arc<dyn ComputationDefinition>>;
}
