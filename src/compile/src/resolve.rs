//! The input resolver (§4.3): walks the scene from an origin object to
//! produce the output keys an input key names.

use sc_repr::{DynamicTraversal, EditReason, InputKey, Journal, LocalTraversal, LocalTraversalStep};
use sc_scene::{DefinitionRegistry, Object, OutputKey, SceneAdapter};

use crate::diagnostics::{CompilationDiagnostic, DiagnosticSink};

/// Resolves `input_key`, relative to `origin`, against `adapter` and
/// `registry`, returning the output keys it names.
///
/// Every scene read the resolver performs is journaled into `journal`, so
/// the journal returned (accumulated into the caller's node/input journal)
/// exactly characterises the scene conditions that would invalidate this
/// resolution (§4.3 final paragraph).
pub fn resolve_input(
    adapter: &dyn SceneAdapter,
    registry: &dyn DefinitionRegistry,
    origin: &Object,
    input_key: &InputKey,
    journal: &mut Journal,
    diagnostics: &DiagnosticSink,
) -> Vec<OutputKey> {
    if matches!(
        input_key.provider_resolution.dynamic_traversal,
        DynamicTraversal::RelationshipTargetedObjects
    ) {
        diagnostics.push(CompilationDiagnostic::RelationshipTargetedObjectsUnsupported(
            origin.path().clone(),
        ));
        return Vec::new();
    }

    let Some(current) = walk_local(
        adapter,
        origin,
        &input_key.provider_resolution.local_traversal,
        journal,
    ) else {
        return Vec::new();
    };

    match input_key.provider_resolution.dynamic_traversal {
        DynamicTraversal::Local => resolve_local(registry, &current, input_key, journal, diagnostics),
        DynamicTraversal::NamespaceAncestor => {
            resolve_namespace_ancestor(registry, &current, input_key, journal, diagnostics)
        }
        DynamicTraversal::RelationshipTargetedObjects => unreachable!("rejected above"),
    }
}

/// Stage 1 of §4.3: local traversal from `origin` to a current object.
fn walk_local(
    adapter: &dyn SceneAdapter,
    origin: &Object,
    local: &LocalTraversal,
    journal: &mut Journal,
) -> Option<Object> {
    match local {
        LocalTraversal::AbsoluteRoot => {
            let root = adapter.pseudo_root();
            journal.add(root.path().clone(), EditReason::RESYNCED_OBJECT);
            Some(Object::Prim(root))
        }
        LocalTraversal::Relative(steps) => {
            if !origin.is_valid(journal) {
                return None;
            }
            let mut current = origin.clone();
            for step in steps {
                current = match step {
                    LocalTraversalStep::Here => current,
                    LocalTraversalStep::Parent => parent_of(&current, journal)?,
                    LocalTraversalStep::Property(name) => property_of(&current, name, journal)?,
                };
                if !current.is_valid(journal) {
                    return None;
                }
            }
            Some(current)
        }
    }
}

fn parent_of(current: &Object, journal: &mut Journal) -> Option<Object> {
    match current {
        Object::Prim(p) => p.parent(journal).map(Object::Prim),
        Object::Attribute(a) => a.prim(journal).map(Object::Prim),
        Object::Relationship(r) => r.prim(journal).map(Object::Prim),
    }
}

fn property_of(current: &Object, name: &str, journal: &mut Journal) -> Option<Object> {
    let prim = current.as_prim()?;
    prim.attribute(name, journal)
        .map(Object::Attribute)
        .or_else(|| prim.relationship(name, journal).map(Object::Relationship))
}

fn resolve_local(
    registry: &dyn DefinitionRegistry,
    current: &Object,
    input_key: &InputKey,
    journal: &mut Journal,
    diagnostics: &DiagnosticSink,
) -> Vec<OutputKey> {
    let Some(definition) = registry.find_definition(current, &input_key.computation_name, journal)
    else {
        return Vec::new();
    };
    if !input_key.result_type.matches(definition.result_type()) {
        diagnostics.push(CompilationDiagnostic::ResultTypeMismatch {
            provider: current.path().clone(),
            input_name: input_key.input_name.clone(),
        });
        return Vec::new();
    }
    vec![OutputKey {
        provider: current.clone(),
        definition,
    }]
}

fn resolve_namespace_ancestor(
    registry: &dyn DefinitionRegistry,
    current: &Object,
    input_key: &InputKey,
    journal: &mut Journal,
    diagnostics: &DiagnosticSink,
) -> Vec<OutputKey> {
    let Some(start) = current.as_prim() else {
        return Vec::new();
    };
    if start.is_pseudo_root() || !start.is_valid(journal) {
        return Vec::new();
    }

    let mut cursor = std::sync::Arc::clone(start);
    loop {
        let Some(parent) = cursor.parent(journal) else {
            return Vec::new();
        };
        cursor = parent;
        let provider = Object::Prim(std::sync::Arc::clone(&cursor));
        if let Some(definition) =
            registry.find_definition(&provider, &input_key.computation_name, journal)
        {
            if input_key.result_type.matches(definition.result_type()) {
                return vec![OutputKey { provider, definition }];
            }
            diagnostics.push(CompilationDiagnostic::ResultTypeMismatch {
                provider: provider.path().clone(),
                input_name: input_key.input_name.clone(),
            });
            return Vec::new();
        }
        if cursor.is_pseudo_root() {
            return Vec::new();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sc_repr::{DefinitionId, ProviderResolution, ResultType, ScenePath};
    use sc_scene::memory::{MemoryRegistry, MemoryScene};
    use sc_scene::ComputationDefinition;
    use std::sync::Arc;

    struct FooDefinition {
        id: DefinitionId,
    }

    impl ComputationDefinition for FooDefinition {
        fn id(&self) -> DefinitionId {
            self.id
        }
        fn computation_name(&self) -> &str {
            "foo"
        }
        fn result_type(&self) -> ResultType {
            ResultType::of("int")
        }
        fn input_keys(&self, _: &Object, _: &mut Journal) -> Vec<InputKey> {
            Vec::new()
        }
        fn create_node(
            &self,
            _: &Object,
            _: &Journal,
            _: &dyn sc_network::NodeFactoryContext,
        ) -> sc_network::NodeId {
            unimplemented!("not exercised by resolver tests")
        }
    }

    #[test]
    fn namespace_ancestor_resolution_finds_the_defining_ancestor_and_journals_the_walk() {
        let scene = MemoryScene::new();
        let registry = MemoryRegistry::new();
        let root = ScenePath::new("/Root").unwrap();
        let ancestor = ScenePath::new("/Root/Ancestor").unwrap();
        let scope1 = ScenePath::new("/Root/Ancestor/Scope1").unwrap();
        let scope2 = ScenePath::new("/Root/Ancestor/Scope1/Scope2").unwrap();
        let origin_path = ScenePath::new("/Root/Ancestor/Scope1/Scope2/Origin").unwrap();
        scene.add_prim(&root, None, &[]);
        scene.add_prim(&ancestor, Some("Ancestor"), &[]);
        scene.add_prim(&scope1, None, &[]);
        scene.add_prim(&scope2, None, &[]);
        scene.add_prim(&origin_path, None, &[]);

        let mut schema_journal = Journal::new();
        let ancestor_prim = scene.get_prim(&ancestor, &mut schema_journal).unwrap();
        let schema_key = ancestor_prim.schema_config_key(&mut schema_journal);
        registry
            .register(
                schema_key,
                Arc::new(FooDefinition {
                    id: registry.next_definition_id(),
                }),
            )
            .unwrap();

        let mut journal = Journal::new();
        let origin_prim = scene.get_prim(&origin_path, &mut journal).unwrap();
        let origin = Object::Prim(origin_prim);
        let input_key = InputKey {
            input_name: "foo".to_string(),
            computation_name: "foo".to_string(),
            result_type: ResultType::of("int"),
            provider_resolution: ProviderResolution {
                local_traversal: LocalTraversal::here(),
                dynamic_traversal: DynamicTraversal::NamespaceAncestor,
            },
            optional: false,
        };
        let diagnostics = DiagnosticSink::with_capacity(4);

        let mut resolve_journal = Journal::new();
        let outputs = resolve_input(
            &scene,
            &registry,
            &origin,
            &input_key,
            &mut resolve_journal,
            &diagnostics,
        );

        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].provider.path(), &ancestor);
        assert!(diagnostics.is_empty());

        for path in [&origin_path, &scope2, &scope1, &ancestor] {
            assert_eq!(
                resolve_journal.get(path),
                Some(EditReason::RESYNCED_OBJECT),
                "missing or wrong journal entry for {path}"
            );
        }
        assert_eq!(resolve_journal.len(), 4);
    }

    #[test]
    fn relationship_targeted_objects_is_rejected_with_a_diagnostic() {
        let scene = MemoryScene::new();
        let registry = MemoryRegistry::new();
        let root = ScenePath::new("/Root").unwrap();
        scene.add_prim(&root, None, &[]);
        let origin = Object::Prim(scene.get_prim(&root, &mut Journal::new()).unwrap());
        let input_key = InputKey {
            input_name: "x".to_string(),
            computation_name: "foo".to_string(),
            result_type: ResultType::UNKNOWN,
            provider_resolution: ProviderResolution {
                local_traversal: LocalTraversal::here(),
                dynamic_traversal: DynamicTraversal::RelationshipTargetedObjects,
            },
            optional: true,
        };
        let diagnostics = DiagnosticSink::with_capacity(4);
        let mut journal = Journal::new();
        let outputs = resolve_input(&scene, &registry, &origin, &input_key, &mut journal, &diagnostics);
        assert!(outputs.is_empty());
        assert_eq!(diagnostics.drain().len(), 1);
    }
}
