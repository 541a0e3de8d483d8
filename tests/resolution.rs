//! Cross-namespace resolution scenarios run through the public API.

use girbind::core::{classify, Category, InteropType, NativeTypeToken, PrimitiveKind};
use girbind::interop::{DecisionEngine, Decoration, MarshalHint, Target};
use girbind::resolver::{build_repository, GenError, RepositoryGraph, TypeResolver};
use girbind::RepositoryDescription;

fn description(json: &str) -> RepositoryDescription {
    serde_json::from_str(json).unwrap()
}

/// `A` declares `Widget`; `B` includes `A` and takes arrays of widgets
/// and integers.
fn widget_stack() -> RepositoryGraph {
    let a = description(
        r#"{
            "namespace": {
                "name": "A",
                "version": "1.0",
                "classes": [{ "name": "Widget", "c-type": "AWidget" }]
            }
        }"#,
    );
    let b = description(
        r#"{
            "includes": [{ "name": "A", "version": "1.0" }],
            "namespace": {
                "name": "B",
                "version": "1.0",
                "functions": [{
                    "name": "show_all",
                    "c-identifier": "b_show_all",
                    "parameters": [
                        {
                            "name": "widgets",
                            "array": {
                                "length": 3,
                                "type": { "name": "A.Widget", "c-type": "AWidget*" }
                            },
                            "transfer-ownership": "none"
                        },
                        {
                            "name": "names",
                            "array": { "type": { "name": "utf8", "c-type": "gchar*" } },
                            "transfer-ownership": "none"
                        }
                    ]
                }],
                "classes": [{
                    "name": "Buffer",
                    "c-type": "BBuffer",
                    "methods": [{
                        "name": "fill",
                        "c-identifier": "b_buffer_fill",
                        "instance-parameter": {
                            "name": "buffer",
                            "type": { "name": "Buffer", "c-type": "BBuffer*" },
                            "transfer-ownership": "none"
                        },
                        "parameters": [
                            {
                                "name": "values",
                                "array": {
                                    "length": 1,
                                    "type": { "name": "gint", "c-type": "gint" }
                                },
                                "transfer-ownership": "none"
                            },
                            {
                                "name": "n_values",
                                "type": { "name": "gint", "c-type": "gint" },
                                "transfer-ownership": "none"
                            },
                            {
                                "name": "cursor",
                                "type": { "name": "gint", "c-type": "gint*" },
                                "direction": "inout",
                                "transfer-ownership": "full"
                            },
                            {
                                "name": "extra",
                                "array": {
                                    "length": 1,
                                    "type": { "name": "gint", "c-type": "gint" }
                                },
                                "direction": "inout",
                                "transfer-ownership": "full"
                            },
                            {
                                "name": "parent",
                                "type": { "name": "A.Widget", "c-type": "AWidget*" },
                                "nullable": true,
                                "transfer-ownership": "none"
                            }
                        ]
                    }]
                }]
            }
        }"#,
    );

    RepositoryGraph::build(&[b, a]).unwrap()
}

fn namespace_b(graph: &RepositoryGraph) -> girbind::core::RepoId {
    graph.build_order()[1]
}

#[test]
fn test_reference_type_array_degrades_to_handle() {
    let graph = widget_stack();
    let b = namespace_b(&graph);
    let engine = DecisionEngine::new(TypeResolver::new(&graph, b));
    let function = &graph.repository(b).namespace.functions[0];

    let widgets = &function.parameters.parameters[0];
    let decision = engine.decide(widgets, Target::Native, 0).unwrap();
    assert!(decision.decided.is_opaque_handle());
    assert_eq!(decision.hint, None);
    assert!(!decision.nullable);
}

#[test]
fn test_lengthless_string_array_is_bare_handle() {
    let graph = widget_stack();
    let b = namespace_b(&graph);
    let engine = DecisionEngine::new(TypeResolver::new(&graph, b));
    let function = &graph.repository(b).namespace.functions[0];

    let names = &function.parameters.parameters[1];
    let decision = engine.decide(names, Target::Native, 0).unwrap();
    assert_eq!(decision.decided.interop, InteropType::Handle);
    assert!(!decision.decided.array);
    assert_eq!(decision.hint, None);
}

#[test]
fn test_typed_array_length_hint_counts_instance() {
    let graph = widget_stack();
    let b = namespace_b(&graph);
    let engine = DecisionEngine::new(TypeResolver::new(&graph, b));
    let fill = &graph.repository(b).namespace.classes[0].callables.methods[0];
    let values = &fill.parameters.parameters[0];

    let native = engine.decide(values, Target::Native, 1).unwrap();
    assert!(native.decided.array);
    assert_eq!(native.decided.interop, InteropType::Primitive(PrimitiveKind::I32));
    assert_eq!(native.hint, Some(MarshalHint::SizedArray { size_param_index: 2 }));

    let managed = engine.decide(values, Target::Managed, 0).unwrap();
    assert_eq!(managed.hint, None);
}

#[test]
fn test_ref_direction_decorations() {
    let graph = widget_stack();
    let b = namespace_b(&graph);
    let engine = DecisionEngine::new(TypeResolver::new(&graph, b));
    let fill = &graph.repository(b).namespace.classes[0].callables.methods[0];

    let cursor = engine
        .decide(&fill.parameters.parameters[2], Target::Native, 1)
        .unwrap();
    assert_eq!(cursor.decoration, Decoration::Ref);
    assert!(!cursor.decided.by_ref);

    let extra = engine
        .decide(&fill.parameters.parameters[3], Target::Native, 1)
        .unwrap();
    assert_eq!(extra.decoration, Decoration::None);
}

#[test]
fn test_reference_type_is_never_nullable_natively() {
    let graph = widget_stack();
    let b = namespace_b(&graph);
    let engine = DecisionEngine::new(TypeResolver::new(&graph, b));
    let fill = &graph.repository(b).namespace.classes[0].callables.methods[0];
    let parent = &fill.parameters.parameters[4];

    assert!(!engine.decide(parent, Target::Native, 1).unwrap().nullable);
    assert!(engine.decide(parent, Target::Managed, 0).unwrap().nullable);
}

#[test]
fn test_cross_namespace_reference_is_external() {
    let graph = widget_stack();
    let b = namespace_b(&graph);
    let resolver = TypeResolver::new(&graph, b);
    let buffer = &graph.repository(b).namespace.classes[0];
    let fill = &buffer.callables.methods[0];

    let parent = resolver.resolve(&fill.parameters.parameters[4].type_ref).unwrap();
    assert!(parent.is_external(b));
    assert!(!parent.is_external(graph.build_order()[0]));

    let instance = fill.parameters.instance.as_ref().unwrap();
    assert!(!resolver.resolve(&instance.type_ref).unwrap().is_external(b));

    let cursor = resolver.resolve(&fill.parameters.parameters[2].type_ref).unwrap();
    assert!(!cursor.is_external(b));
}

#[test]
fn test_resolution_is_idempotent() {
    let graph = widget_stack();
    let b = namespace_b(&graph);
    let resolver = TypeResolver::new(&graph, b);
    let fill = &graph.repository(b).namespace.classes[0].callables.methods[0];
    let values = &fill.parameters.parameters[0].type_ref;

    let first = *resolver.resolve(values).unwrap();
    let second = *resolver.resolve(values).unwrap();
    assert_eq!(first, second);
    assert_eq!(resolver.decide(values).unwrap(), first);
    assert_eq!(values.decided(), Some(&first));
}

#[test]
fn test_classification_scenarios() {
    assert_eq!(
        classify(&NativeTypeToken::new("gint32")).category,
        Category::Primitive(PrimitiveKind::I32)
    );

    let string = classify(&NativeTypeToken::new("gchar*"));
    assert_eq!(string.category, Category::String);
    assert!(string.is_pointer);

    assert_eq!(
        classify(&NativeTypeToken::new("AtkObject*")).category,
        Category::NotSupported
    );
    assert_eq!(
        classify(&NativeTypeToken::new("NoSuchType")).category,
        Category::NotFound
    );
}

#[test]
fn test_unsupported_reference_fails() {
    let gtk = description(
        r#"{
            "namespace": {
                "name": "Gtk",
                "version": "3.0",
                "functions": [{
                    "name": "set_accessible",
                    "c-identifier": "gtk_set_accessible",
                    "parameters": [{
                        "name": "accessible",
                        "type": { "name": "Atk.Object", "c-type": "AtkObject*" },
                        "transfer-ownership": "none"
                    }]
                }]
            }
        }"#,
    );
    let graph = RepositoryGraph::build(&[gtk]).unwrap();
    let id = graph.build_order()[0];
    let param = &graph.repository(id).namespace.functions[0].parameters.parameters[0];

    let err = TypeResolver::new(&graph, id).resolve(&param.type_ref).unwrap_err();
    assert_eq!(
        err,
        GenError::UnsupportedType {
            ctype: "AtkObject*".to_string()
        }
    );
}

#[test]
fn test_unbound_include_is_unresolved_dependency() {
    let gtk = description(
        r#"{
            "includes": [{ "name": "Gio", "version": "2.0" }],
            "namespace": {
                "name": "Gtk",
                "version": "3.0",
                "functions": [{
                    "name": "open",
                    "c-identifier": "gtk_open",
                    "parameters": [{
                        "name": "file",
                        "type": { "name": "Gio.File", "c-type": "GFile*" },
                        "transfer-ownership": "none"
                    }]
                }]
            }
        }"#,
    );

    // Registered but never linked: the Gio include stays unbound.
    let mut graph = RepositoryGraph::new();
    let id = graph.register(build_repository(&gtk).unwrap()).unwrap();
    let param = &graph.repository(id).namespace.functions[0].parameters.parameters[0];

    let err = TypeResolver::new(&graph, id).resolve(&param.type_ref).unwrap_err();
    assert!(
        matches!(err, GenError::UnresolvedDependency { ref include, .. } if include == "Gio-2.0"),
        "unexpected error: {err:?}"
    );

    // Linking reports the same missing include.
    assert!(matches!(
        graph.link(),
        Err(GenError::UnresolvedDependency { .. })
    ));
}

#[test]
fn test_alias_self_cycle_is_reported() {
    let glib = description(
        r#"{
            "namespace": {
                "name": "GLib",
                "version": "2.0",
                "aliases": [{
                    "name": "Loop",
                    "c-type": "GLoop",
                    "type": { "name": "Loop", "c-type": "GLoop" }
                }],
                "functions": [{
                    "name": "run",
                    "c-identifier": "g_run",
                    "parameters": [{
                        "name": "loop",
                        "type": { "name": "Loop", "c-type": "GLoop" },
                        "transfer-ownership": "none"
                    }]
                }]
            }
        }"#,
    );
    let graph = RepositoryGraph::build(&[glib]).unwrap();
    let id = graph.build_order()[0];
    let param = &graph.repository(id).namespace.functions[0].parameters.parameters[0];

    let err = TypeResolver::new(&graph, id).resolve(&param.type_ref).unwrap_err();
    assert!(matches!(err, GenError::AliasCycle { .. }), "unexpected error: {err:?}");
}
