//! The two built-in computation definitions required by §4.2: `time` and
//! `attributeValue`.

use std::any::Any;

use sc_network::{NodeFactoryContext, NodeId};
use sc_repr::{
    DefinitionId, DynamicTraversal, InputKey, Journal, LocalTraversal, ProviderResolution,
    ResultType,
};

use crate::object::Object;
use crate::registry::ComputationDefinition;

/// The name requested for the built-in time computation (§8 scenario 1).
pub const TIME_COMPUTATION_NAME: &str = "computeTime";

/// The name requested for the built-in attribute-value computation (§8
/// scenario 2). Uses the reserved builtin prefix since it is registered
/// by the core itself, not a plugin.
pub const ATTRIBUTE_VALUE_COMPUTATION_NAME: &str = "__computeValue";

/// The result type produced by [`TIME_COMPUTATION_NAME`].
pub const TIME_RESULT_TYPE: ResultType = ResultType::of("time");

/// The result type produced by [`ATTRIBUTE_VALUE_COMPUTATION_NAME`].
///
/// Today this coincides with the extraction type; §9 notes that a real
/// implementation should keep `result_type` and an eventual
/// `extraction_type` as separate accessors so the two can diverge later
/// without an incompatible change. [`AttributeValueDefinition`] exposes
/// both, currently returning the same value.
pub const ATTRIBUTE_VALUE_RESULT_TYPE: ResultType = ResultType::of("attributeValue");

/// Low, well-known definition ids reserved for the built-ins, assigned
/// before any plugin registration occurs (§9 "Global state").
pub const TIME_DEFINITION_ID: DefinitionId = DefinitionId::from_raw(0);
pub const ATTRIBUTE_VALUE_DEFINITION_ID: DefinitionId = DefinitionId::from_raw(1);

/// The node payload for a time node: a marker type; the program's
/// singleton time node carries no other state at this layer (the
/// evaluation engine, out of scope here, supplies the actual clock).
#[derive(Debug, Default)]
pub struct TimeValuePayload;

/// The node payload for an attribute-value node: wraps the provider
/// attribute's path so the (external) evaluation engine can build a
/// value-query object against it.
#[derive(Debug, Clone)]
pub struct AttributeValuePayload {
    /// The attribute this node reads.
    pub attribute_path: sc_repr::ScenePath,
}

/// `time` — has no inputs; its factory returns the program's singleton
/// time input node (§4.2, §4.8).
pub struct TimeDefinition;

impl ComputationDefinition for TimeDefinition {
    fn id(&self) -> DefinitionId {
        TIME_DEFINITION_ID
    }

    fn computation_name(&self) -> &str {
        TIME_COMPUTATION_NAME
    }

    fn result_type(&self) -> ResultType {
        TIME_RESULT_TYPE
    }

    fn input_keys(&self, _provider: &Object, _journal: &mut Journal) -> Vec<InputKey> {
        Vec::new()
    }

    fn create_node(
        &self,
        _provider: &Object,
        _node_journal: &Journal,
        ctx: &dyn NodeFactoryContext,
    ) -> NodeId {
        ctx.time_input_node()
    }
}

/// `attributeValue` — has exactly one input (named `time`, requesting the
/// `time` computation at the absolute root, non-optional); its factory
/// creates a node wrapping the provider attribute's value-query object
/// (§4.2).
pub struct AttributeValueDefinition;

impl AttributeValueDefinition {
    /// The extraction type for this computation's output. Distinct
    /// accessor per §9, even though it coincides with [`ComputationDefinition::result_type`]
    /// today.
    pub fn extraction_type(&self) -> ResultType {
        ATTRIBUTE_VALUE_RESULT_TYPE
    }
}

impl ComputationDefinition for AttributeValueDefinition {
    fn id(&self) -> DefinitionId {
        ATTRIBUTE_VALUE_DEFINITION_ID
    }

    fn computation_name(&self) -> &str {
        ATTRIBUTE_VALUE_COMPUTATION_NAME
    }

    fn result_type(&self) -> ResultType {
        ATTRIBUTE_VALUE_RESULT_TYPE
    }

    fn input_keys(&self, _provider: &Object, _journal: &mut Journal) -> Vec<InputKey> {
        vec![InputKey {
            input_name: "time".to_string(),
            computation_name: TIME_COMPUTATION_NAME.to_string(),
            result_type: TIME_RESULT_TYPE,
            provider_resolution: ProviderResolution {
                local_traversal: LocalTraversal::AbsoluteRoot,
                dynamic_traversal: DynamicTraversal::Local,
            },
            optional: false,
        }]
    }

    fn create_node(
        &self,
        provider: &Object,
        node_journal: &Journal,
        ctx: &dyn NodeFactoryContext,
    ) -> NodeId {
        let attribute_path = provider.path().clone();
        let payload: Box<dyn Any + Send + Sync> =
            Box::new(AttributeValuePayload { attribute_path });
        let debug_name = format!("attributeValue({})", provider.path());
        let node = ctx.create_node(node_journal, debug_name, vec!["time".to_string()], payload);
        node.id()
    }
}
