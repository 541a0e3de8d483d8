//! Implementation of `girbind generate`.
//!
//! Phase 1 builds and links the repository graph sequentially. Phase 2
//! decides and emits every declaration of the selected namespaces on a
//! worker pool. A failing declaration is skipped and reported in
//! best-effort mode; in strict mode it aborts the run.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use miette::Diagnostic as _;
use rayon::prelude::*;
use serde::Serialize;

use crate::core::{
    Callback, Class, ClassStructKind, Constant, Enumeration, Field, Method, Namespace,
    NativeTypeToken, Record, RepoId, Signal, SymbolName,
};
use crate::description::RepositoryDescription;
use crate::interop::{Declaration, Emitter, Folder};
use crate::resolver::{GenError, RepositoryGraph};

/// Options for the generate command.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Skip failing declarations instead of aborting.
    pub best_effort: bool,
    /// Identifiers that must be generated.
    pub mandatory: Vec<String>,
    /// Namespaces to emit (name or `Name-Version`); empty means all.
    pub namespaces: Vec<String>,
    /// Worker threads; `None` uses the global pool.
    pub jobs: Option<usize>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions {
            best_effort: true,
            mandatory: Vec::new(),
            namespaces: Vec::new(),
            jobs: None,
        }
    }
}

/// Emitted declarations of one namespace.
#[derive(Debug, Clone, Serialize)]
pub struct NamespaceOutput {
    pub name: String,
    pub version: String,
    pub library: Option<String>,
    pub declarations: Vec<Declaration>,
}

impl NamespaceOutput {
    pub fn canonical_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }
}

/// A declaration left out of the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDeclaration {
    pub identifier: String,
    pub code: Option<String>,
    pub reason: String,
}

/// Result of a generation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationReport {
    pub namespaces: Vec<NamespaceOutput>,
    pub skipped: Vec<SkippedDeclaration>,
    /// Requested identifiers that were not generated.
    pub missing_mandatory: Vec<String>,
}

impl GenerationReport {
    pub fn declaration_count(&self) -> usize {
        self.namespaces.iter().map(|n| n.declarations.len()).sum()
    }

    /// Find an emitted declaration by identifier.
    pub fn find(&self, identifier: &str) -> Option<&Declaration> {
        self.namespaces
            .iter()
            .flat_map(|n| n.declarations.iter())
            .find(|d| d.identifier() == identifier)
    }

    pub fn is_complete(&self) -> bool {
        self.missing_mandatory.is_empty()
    }
}

struct WorkItem<'a> {
    identifier: String,
    kind: WorkKind<'a>,
}

enum WorkKind<'a> {
    Function {
        owner: Option<&'a SymbolName>,
        method: &'a Method,
    },
    Callback(&'a Callback),
    Signal {
        owner: &'a SymbolName,
        signal: &'a Signal,
    },
    Layout {
        name: &'a SymbolName,
        ctype: Option<&'a NativeTypeToken>,
        fields: &'a [Field],
        folder: Folder,
    },
    Class(&'a Class),
    Enumeration(&'a Enumeration),
    Constant(&'a Constant),
}

/// Build the graph from descriptions and generate.
pub fn generate_from_descriptions(
    descriptions: &[RepositoryDescription],
    options: &GenerateOptions,
) -> Result<GenerationReport> {
    let graph = RepositoryGraph::build(descriptions)
        .map_err(anyhow::Error::new)
        .context("failed to build the repository graph")?;
    tracing::info!("Linked {} namespaces", graph.len());

    generate(&graph, options)
}

/// Emit every declaration of the selected namespaces of a linked graph.
pub fn generate(graph: &RepositoryGraph, options: &GenerateOptions) -> Result<GenerationReport> {
    let pool = match options.jobs {
        Some(jobs) => Some(
            rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build()
                .context("failed to create worker pool")?,
        ),
        None => None,
    };

    let mut report = GenerationReport::default();

    for &id in graph.build_order() {
        let repository = graph.repository(id);
        if !is_selected(options, &repository.namespace) {
            tracing::debug!("Skipping namespace {}", repository.key());
            continue;
        }

        let emitter = Emitter::new(graph, id);
        let items = collect_work(&emitter, &repository.namespace);
        tracing::info!(
            "Generating {} ({} declarations)",
            repository.key(),
            items.len()
        );

        let emit_all = || {
            items
                .par_iter()
                .map(|item| emit(&emitter, item))
                .collect::<Vec<_>>()
        };
        let results = match &pool {
            Some(pool) => pool.install(emit_all),
            None => emit_all(),
        };

        let mut declarations = Vec::with_capacity(results.len());
        for (item, result) in items.iter().zip(results) {
            match result {
                Ok(declaration) => declarations.push(declaration),
                Err(err) if options.best_effort && !err.is_structural() => {
                    tracing::warn!("Skipping {}: {}", item.identifier, err);
                    report.skipped.push(SkippedDeclaration {
                        identifier: item.identifier.clone(),
                        code: err.code().map(|c| c.to_string()),
                        reason: err.to_string(),
                    });
                }
                Err(err) => {
                    return Err(anyhow::Error::new(err)
                        .context(format!("failed to generate `{}`", item.identifier)));
                }
            }
        }

        report.namespaces.push(NamespaceOutput {
            name: repository.namespace.name().to_string(),
            version: repository.key().version.clone(),
            library: repository.namespace.shared_library.clone(),
            declarations,
        });
    }

    report.missing_mandatory = options
        .mandatory
        .iter()
        .filter(|identifier| report.find(identifier).is_none())
        .cloned()
        .collect();

    for identifier in &report.missing_mandatory {
        tracing::warn!("Mandatory declaration {} was not generated", identifier);
    }

    Ok(report)
}

fn is_selected(options: &GenerateOptions, namespace: &Namespace) -> bool {
    options.namespaces.is_empty()
        || options
            .namespaces
            .iter()
            .any(|n| n == namespace.name() || *n == namespace.key.canonical_name())
}

fn emit(emitter: &Emitter<'_>, item: &WorkItem<'_>) -> Result<Declaration, GenError> {
    let declaration = match &item.kind {
        WorkKind::Function { owner, method } => {
            Declaration::Function(emitter.emit_function(*owner, method)?)
        }
        WorkKind::Callback(callback) => Declaration::Callback(emitter.emit_callback(callback)?),
        WorkKind::Signal { owner, signal } => {
            Declaration::Signal(emitter.emit_signal(owner, signal)?)
        }
        WorkKind::Layout {
            name,
            ctype,
            fields,
            folder,
        } => Declaration::Layout(emitter.emit_layout(
            item.identifier.clone(),
            name,
            *ctype,
            fields,
            *folder,
        )?),
        WorkKind::Class(class) => {
            Declaration::Layout(emitter.emit_class_layout(item.identifier.clone(), class)?)
        }
        WorkKind::Enumeration(enumeration) => {
            Declaration::Enumeration(emitter.emit_enumeration(enumeration))
        }
        WorkKind::Constant(constant) => Declaration::Constant(emitter.emit_constant(constant)?),
    };

    Ok(declaration)
}

fn collect_work<'a>(emitter: &Emitter<'_>, namespace: &'a Namespace) -> Vec<WorkItem<'a>> {
    let mut items = Vec::new();

    for enumeration in namespace.enumerations.iter().chain(&namespace.bitfields) {
        items.push(WorkItem {
            identifier: emitter.identifier(None, &enumeration.name.native),
            kind: WorkKind::Enumeration(enumeration),
        });
        push_functions(emitter, &mut items, Some(&enumeration.name), &enumeration.functions);
    }

    for callback in &namespace.callbacks {
        items.push(WorkItem {
            identifier: emitter.identifier(None, &callback.name.native),
            kind: WorkKind::Callback(callback),
        });
    }

    for class in &namespace.classes {
        items.push(WorkItem {
            identifier: emitter.identifier(None, &class.name.native),
            kind: WorkKind::Class(class),
        });
        push_class_structs(
            emitter,
            &mut items,
            &class.name,
            &class.class_structs,
            Folder::Classes,
        );
        push_functions(emitter, &mut items, Some(&class.name), class.callables.iter());
        push_signals(emitter, &mut items, &class.name, &class.signals);
    }

    for iface in &namespace.interfaces {
        push_class_structs(
            emitter,
            &mut items,
            &iface.name,
            &iface.class_structs,
            Folder::Interfaces,
        );
        push_functions(emitter, &mut items, Some(&iface.name), iface.callables.iter());
        push_signals(emitter, &mut items, &iface.name, &iface.signals);
    }

    for record in &namespace.records {
        items.push(WorkItem {
            identifier: emitter.identifier(None, &record.name.native),
            kind: WorkKind::Layout {
                name: &record.name,
                ctype: record.ctype.as_ref(),
                fields: &record.fields,
                folder: Folder::Records,
            },
        });
        push_functions(emitter, &mut items, Some(&record.name), record.callables.iter());
    }

    for union in &namespace.unions {
        items.push(WorkItem {
            identifier: emitter.identifier(None, &union.name.native),
            kind: WorkKind::Layout {
                name: &union.name,
                ctype: union.ctype.as_ref(),
                fields: &union.fields,
                folder: Folder::Unions,
            },
        });
        push_functions(emitter, &mut items, Some(&union.name), union.callables.iter());
    }

    push_functions(emitter, &mut items, None, &namespace.functions);

    for constant in &namespace.constants {
        items.push(WorkItem {
            identifier: emitter.identifier(None, &constant.name.native),
            kind: WorkKind::Constant(constant),
        });
    }

    items
}

fn push_functions<'a>(
    emitter: &Emitter<'_>,
    items: &mut Vec<WorkItem<'a>>,
    owner: Option<&'a SymbolName>,
    methods: impl IntoIterator<Item = &'a Method>,
) {
    for method in methods {
        items.push(WorkItem {
            identifier: emitter.identifier(owner, &method.name.native),
            kind: WorkKind::Function { owner, method },
        });
    }
}

fn push_class_structs<'a>(
    emitter: &Emitter<'_>,
    items: &mut Vec<WorkItem<'a>>,
    owner: &'a SymbolName,
    class_structs: &'a BTreeMap<ClassStructKind, Record>,
    folder: Folder,
) {
    for (kind, record) in class_structs {
        items.push(WorkItem {
            identifier: emitter.identifier(Some(owner), kind.identifier()),
            kind: WorkKind::Layout {
                name: &record.name,
                ctype: record.ctype.as_ref(),
                fields: &record.fields,
                folder,
            },
        });
        push_functions(emitter, items, Some(&record.name), record.callables.iter());
    }
}

fn push_signals<'a>(
    emitter: &Emitter<'_>,
    items: &mut Vec<WorkItem<'a>>,
    owner: &'a SymbolName,
    signals: &'a [Signal],
) {
    for signal in signals {
        items.push(WorkItem {
            identifier: format!(
                "{}::{}",
                emitter.identifier(None, &owner.native),
                signal.name.native
            ),
            kind: WorkKind::Signal { owner, signal },
        });
    }
}

/// Write one `Name-Version.json` per namespace and a `summary.json` into
/// `dir`. Returns the written files.
pub fn write_report(report: &GenerationReport, dir: &Path) -> Result<Vec<PathBuf>> {
    #[derive(Serialize)]
    struct Summary<'a> {
        namespaces: Vec<String>,
        declarations: usize,
        skipped: &'a [SkippedDeclaration],
        missing_mandatory: &'a [String],
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory: {}", dir.display()))?;

    let mut written = Vec::with_capacity(report.namespaces.len() + 1);

    for namespace in &report.namespaces {
        let path = dir.join(format!("{}.json", namespace.canonical_name()));
        write_json(&path, namespace)?;
        written.push(path);
    }

    let summary = Summary {
        namespaces: report.namespaces.iter().map(|n| n.canonical_name()).collect(),
        declarations: report.declaration_count(),
        skipped: &report.skipped,
        missing_mandatory: &report.missing_mandatory,
    };
    let path = dir.join("summary.json");
    write_json(&path, &summary)?;
    written.push(path);

    Ok(written)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let contents = serde_json::to_string_pretty(value)
        .with_context(|| format!("failed to serialize {}", path.display()))?;
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write {}", path.display()))
}

/// Id of the namespace named `name` (or `Name-Version`).
pub fn find_namespace(graph: &RepositoryGraph, name: &str) -> Option<RepoId> {
    graph
        .repositories()
        .find(|(_, r)| r.namespace.name() == name || r.key().canonical_name() == name)
        .map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixtures;
    use tempfile::TempDir;

    fn descriptions() -> Vec<RepositoryDescription> {
        let mut glib = fixtures::repository("GLib", "2.0", &[]);
        glib.namespace.functions.push(fixtures::function(
            "get_user_name",
            "g_get_user_name",
            vec![],
        ));

        let mut gtk = fixtures::repository("Gtk", "3.0", &[("GLib", "2.0")]);
        let mut window = fixtures::class("Window");
        window.methods.push(fixtures::method(
            "set_title",
            "gtk_window_set_title",
            ("Window", "GtkWindow*"),
            vec![fixtures::param("title", "utf8", "const gchar*")],
        ));
        window.methods.push(fixtures::method(
            "set_accessible",
            "gtk_window_set_accessible",
            ("Window", "GtkWindow*"),
            vec![fixtures::param("accessible", "Atk.Object", "AtkObject*")],
        ));
        gtk.namespace.classes.push(window);

        let mut class_struct = fixtures::record("WindowClass");
        class_struct.glib_type_struct_for = Some("Window".to_string());
        gtk.namespace.records.push(class_struct);

        vec![gtk, glib]
    }

    #[test]
    fn test_best_effort_skips_failures() {
        let report =
            generate_from_descriptions(&descriptions(), &GenerateOptions::default()).unwrap();

        assert_eq!(report.namespaces.len(), 2);
        assert_eq!(report.namespaces[0].name, "GLib");
        assert!(report.find("Gtk.Window.set_title").is_some());
        assert!(report.find("Gtk.Window.ClassStruct").is_some());
        assert!(report.find("Gtk.Window.set_accessible").is_none());

        assert_eq!(report.skipped.len(), 1);
        let skipped = &report.skipped[0];
        assert_eq!(skipped.identifier, "Gtk.Window.set_accessible");
        assert_eq!(
            skipped.code.as_deref(),
            Some("girbind::resolve::unsupported_type")
        );
    }

    #[test]
    fn test_strict_mode_aborts() {
        let options = GenerateOptions {
            best_effort: false,
            ..Default::default()
        };
        let err = generate_from_descriptions(&descriptions(), &options).unwrap_err();
        assert!(format!("{:#}", err).contains("AtkObject*"));
    }

    #[test]
    fn test_mandatory_and_namespace_filter() {
        let options = GenerateOptions {
            namespaces: vec!["Gtk-3.0".to_string()],
            mandatory: vec![
                "Gtk.Window.set_title".to_string(),
                "Gtk.Window.set_accessible".to_string(),
            ],
            jobs: Some(2),
            ..Default::default()
        };
        let report = generate_from_descriptions(&descriptions(), &options).unwrap();

        assert_eq!(report.namespaces.len(), 1);
        assert!(!report.is_complete());
        assert_eq!(report.missing_mandatory, vec!["Gtk.Window.set_accessible"]);
    }

    /// `GObject.ObjectClass` with a class method, and `Gtk.WidgetClass`
    /// embedding it as its first field.
    fn class_struct_descriptions() -> Vec<RepositoryDescription> {
        let mut gobject = fixtures::repository("GObject", "2.0", &[]);
        gobject.namespace.classes.push(fixtures::class("Object"));
        let mut object_class = fixtures::record("ObjectClass");
        object_class.c_type = Some("GObjectClass".to_string());
        object_class.glib_type_struct_for = Some("Object".to_string());
        object_class.fields.push(fixtures::field("g_type_class", "gpointer", "gpointer"));
        object_class.methods.push(fixtures::method(
            "find_property",
            "g_object_class_find_property",
            ("ObjectClass", "GObjectClass*"),
            vec![fixtures::param("property_name", "utf8", "const gchar*")],
        ));
        gobject.namespace.records.push(object_class);

        let mut gtk = fixtures::repository("Gtk", "3.0", &[("GObject", "2.0")]);
        let mut widget = fixtures::class("Widget");
        widget.parent = Some("GObject.Object".to_string());
        gtk.namespace.classes.push(widget);
        let mut widget_class = fixtures::record("WidgetClass");
        widget_class.glib_type_struct_for = Some("Widget".to_string());
        widget_class.fields.push(fixtures::field(
            "parent_class",
            "GObject.ObjectClass",
            "GObjectClass",
        ));
        gtk.namespace.records.push(widget_class);

        vec![gtk, gobject]
    }

    #[test]
    fn test_class_structs_resolve_across_namespaces() {
        let report =
            generate_from_descriptions(&class_struct_descriptions(), &GenerateOptions::default())
                .unwrap();
        assert!(report.skipped.is_empty(), "skipped: {:?}", report.skipped);

        let Some(Declaration::Layout(layout)) = report.find("Gtk.Widget.ClassStruct") else {
            panic!("missing Gtk.Widget.ClassStruct");
        };
        assert_eq!(layout.managed_name, "Widget.Native.ClassStruct");
        assert_eq!(layout.fields[0].type_name, "GObject.Object.Native.ClassStruct");

        let Some(Declaration::Layout(widget)) = report.find("Gtk.Widget") else {
            panic!("missing Gtk.Widget");
        };
        assert_eq!(widget.inheritance, vec!["GObject.Object"]);
    }

    #[test]
    fn test_class_struct_callables_are_emitted() {
        let report =
            generate_from_descriptions(&class_struct_descriptions(), &GenerateOptions::default())
                .unwrap();

        let Some(Declaration::Function(find_property)) =
            report.find("GObject.ObjectClass.find_property")
        else {
            panic!("missing GObject.ObjectClass.find_property");
        };
        assert_eq!(find_property.entry_point, "g_object_class_find_property");
        assert_eq!(find_property.native_parameters[0].name, "instance");
    }

    #[test]
    fn test_write_report() {
        let tmp = TempDir::new().unwrap();
        let report =
            generate_from_descriptions(&descriptions(), &GenerateOptions::default()).unwrap();

        let written = write_report(&report, tmp.path()).unwrap();
        assert_eq!(written.len(), 3);
        assert!(tmp.path().join("Gtk-3.0.json").exists());

        let summary = std::fs::read_to_string(tmp.path().join("summary.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&summary).unwrap();
        assert_eq!(value["skipped"][0]["identifier"], "Gtk.Window.set_accessible");
    }
}
