//! An in-memory definition registry: builtins plus per-schema-config
//! plugin definitions, for tests.

use std::sync::Arc;

use dashmap::DashMap;
use sc_repr::{DefinitionId, DefinitionIdGenerator, Journal};

use crate::builtins::{
    AttributeValueDefinition, TimeDefinition, ATTRIBUTE_VALUE_COMPUTATION_NAME,
    TIME_COMPUTATION_NAME,
};
use crate::error::SceneError;
use crate::object::{Object, SchemaConfigKey};
use crate::registry::{is_builtin_name, ComputationDefinition, DefinitionRegistry};

/// Definition ids handed to plugin registrations start after the two
/// reserved builtin ids (§9 "Global state").
const FIRST_PLUGIN_DEFINITION_ID: u64 = 2;

/// A thread-safe, in-process registry backed by a concurrent map from
/// `(schemaConfigKey, computationName)` to definition, plus the two
/// built-ins available on every object regardless of schema.
pub struct MemoryRegistry {
    time: Arc<TimeDefinition>,
    attribute_value: Arc<AttributeValueDefinition>,
    plugins: DashMap<(SchemaConfigKey, String), Arc<dyn ComputationDefinition>>,
    ids: DefinitionIdGenerator,
}

impl MemoryRegistry {
    /// Builds a registry exposing only the two built-in definitions.
    pub fn new() -> Self {
        MemoryRegistry {
            time: Arc::new(TimeDefinition),
            attribute_value: Arc::new(AttributeValueDefinition),
            plugins: DashMap::new(),
            ids: DefinitionIdGenerator::starting_at(FIRST_PLUGIN_DEFINITION_ID),
        }
    }

    /// Registers `definition` so that it is found for `schema_config_key`.
    ///
    /// Rejects builtin-prefix abuse and duplicate `(schemaConfigKey,
    /// computationName)` registration (§6).
    pub fn register(
        &self,
        schema_config_key: SchemaConfigKey,
        definition: Arc<dyn ComputationDefinition>,
    ) -> Result<(), SceneError> {
        let name = definition.computation_name().to_string();
        if is_builtin_name(&name) {
            return Err(SceneError::BuiltinPrefixAbuse(name));
        }
        let key = (schema_config_key, name.clone());
        if self.plugins.contains_key(&key) {
            return Err(SceneError::DuplicateDefinition {
                schema_config_key: key.0.as_str().to_string(),
                computation_name: name,
            });
        }
        self.plugins.insert(key, definition);
        Ok(())
    }

    /// Allocates the next plugin definition id. Exposed so test fixtures
    /// building their own [`ComputationDefinition`] impls can mint stable
    /// ids without reaching into the builtin range.
    pub fn next_definition_id(&self) -> DefinitionId {
        self.ids.next_id()
    }
}

impl Default for MemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DefinitionRegistry for MemoryRegistry {
    fn find_definition(
        &self,
        provider: &Object,
        computation_name: &str,
        journal: &mut Journal,
    ) -> Option<Arc<dyn ComputationDefinition>> {
        if computation_name == TIME_COMPUTATION_NAME {
            return Some(Arc::clone(&self.time) as Arc<dyn ComputationDefinition>);
        }
        if computation_name == ATTRIBUTE_VALUE_COMPUTATION_NAME {
            return provider
                .as_attribute()
                .map(|_| Arc::clone(&self.attribute_value) as Arc<dyn ComputationDefinition>);
        }
        let prim = provider.prim(journal)?;
        let schema_config_key = prim.schema_config_key(journal);
        self.plugins
            .get(&(schema_config_key, computation_name.to_string()))
            .map(|e| Arc::clone(e.value()))
    }
}
