//! CLI integration tests for girbind.
//!
//! These tests run the binary against description files written into a
//! temporary directory.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the girbind binary command.
fn girbind() -> Command {
    Command::cargo_bin("girbind").unwrap()
}

const GLIB: &str = r#"
[namespace]
name = "GLib"
version = "2.0"
shared-library = "libglib-2.0.so.0"

[[namespace.aliases]]
name = "Pid"
c-type = "GPid"
type = { name = "gint", c-type = "gint" }

[[namespace.functions]]
name = "get_user_name"
c-identifier = "g_get_user_name"
return-value = { type = { name = "filename", c-type = "const gchar*" }, transfer-ownership = "none" }
"#;

const GTK: &str = r#"
[[includes]]
name = "GLib"
version = "2.0"

[namespace]
name = "Gtk"
version = "3.0"
shared-library = "libgtk-3.so.0"

[[namespace.classes]]
name = "Window"
c-type = "GtkWindow"

[[namespace.classes.methods]]
name = "set_title"
c-identifier = "gtk_window_set_title"
instance-parameter = { name = "window", type = { name = "Window", c-type = "GtkWindow*" }, transfer-ownership = "none" }

[[namespace.classes.methods.parameters]]
name = "title"
type = { name = "utf8", c-type = "const gchar*" }
transfer-ownership = "none"

[[namespace.classes.methods]]
name = "set_accessible"
c-identifier = "gtk_window_set_accessible"
instance-parameter = { name = "window", type = { name = "Window", c-type = "GtkWindow*" }, transfer-ownership = "none" }

[[namespace.classes.methods.parameters]]
name = "accessible"
type = { name = "Atk.Object", c-type = "AtkObject*" }
transfer-ownership = "none"
"#;

/// Write the GLib and Gtk descriptions into `dir`.
fn write_stack(dir: &Path) {
    fs::write(dir.join("GLib-2.0.toml"), GLIB).unwrap();
    fs::write(dir.join("Gtk-3.0.toml"), GTK).unwrap();
}

// ============================================================================
// girbind generate
// ============================================================================

#[test]
fn test_generate_writes_namespaces_and_summary() {
    let tmp = TempDir::new().unwrap();
    write_stack(tmp.path());

    girbind()
        .args(["generate", "*.toml", "--output", "out"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("in 2 namespaces (1 skipped)"))
        .stderr(predicate::str::contains("skipped `Gtk.Window.set_accessible`"));

    let out = tmp.path().join("out");
    assert!(out.join("GLib-2.0.json").exists());
    assert!(out.join("summary.json").exists());

    let gtk = fs::read_to_string(out.join("Gtk-3.0.json")).unwrap();
    assert!(gtk.contains("gtk_window_set_title"));
    assert!(gtk.contains("LPUTF8Str"));
    assert!(!gtk.contains("gtk_window_set_accessible"));
}

#[test]
fn test_generate_strict_fails_on_unsupported_type() {
    let tmp = TempDir::new().unwrap();
    write_stack(tmp.path());

    girbind()
        .args(["generate", "*.toml", "--strict", "--output", "out"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Gtk.Window.set_accessible"))
        .stderr(predicate::str::contains("AtkObject*"));

    assert!(!tmp.path().join("out").exists());
}

#[test]
fn test_generate_missing_mandatory_fails() {
    let tmp = TempDir::new().unwrap();
    write_stack(tmp.path());

    girbind()
        .args([
            "generate",
            "*.toml",
            "--output",
            "out",
            "--require",
            "Gtk.Window.set_title",
            "--require",
            "Gtk.Window.set_accessible",
        ])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "mandatory declarations were not generated: Gtk.Window.set_accessible",
        ));

    // The report is still written so the gaps can be inspected.
    assert!(tmp.path().join("out/summary.json").exists());
}

#[test]
fn test_generate_missing_include_reports_diagnostic() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("Gtk-3.0.toml"), GTK).unwrap();

    girbind()
        .args(["generate", "Gtk-3.0.toml", "--no-color"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("GLib-2.0"))
        .stderr(predicate::str::contains("help: Pass the description"));
}

#[test]
fn test_generate_reads_config_file() {
    let tmp = TempDir::new().unwrap();
    write_stack(tmp.path());
    fs::write(
        tmp.path().join("girbind.toml"),
        "[generate]\nnamespaces = [\"GLib\"]\noutput = \"from-config\"\n",
    )
    .unwrap();

    // girbind.toml is not a description, so name the inputs.
    girbind()
        .args(["generate", "GLib-2.0.toml", "Gtk-3.0.toml"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("in 1 namespaces"));

    let out = tmp.path().join("from-config");
    assert!(out.join("GLib-2.0.json").exists());
    assert!(!out.join("Gtk-3.0.json").exists());
}

#[test]
fn test_generate_no_inputs_matched() {
    let tmp = TempDir::new().unwrap();

    girbind()
        .args(["generate", "*.json"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no description files matched"));
}

// ============================================================================
// girbind classify
// ============================================================================

#[test]
fn test_classify_prints_categories() {
    girbind()
        .args(["classify", "gint32", "const gchar*", "AtkObject*", "gint*"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gint32: primitive(int)"))
        .stdout(predicate::str::contains("const gchar*: string [pointer]"))
        .stdout(predicate::str::contains("AtkObject*: not-supported"))
        .stdout(predicate::str::contains("gint*: primitive(int) [pointer, by-ref]"));
}

// ============================================================================
// girbind graph
// ============================================================================

#[test]
fn test_graph_prints_build_order() {
    let tmp = TempDir::new().unwrap();
    write_stack(tmp.path());

    girbind()
        .args(["graph", "*.toml"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1. GLib-2.0"))
        .stdout(predicate::str::contains("2. Gtk-3.0"))
        .stdout(predicate::str::contains("└── GLib-2.0"));
}

#[test]
fn test_help() {
    girbind()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("classify"));
}

#[test]
fn test_graph_namespace_focus() {
    let tmp = TempDir::new().unwrap();
    write_stack(tmp.path());

    girbind()
        .args(["graph", "*.toml", "--namespace", "GLib"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("included by:\n    Gtk-3.0"));

    girbind()
        .args(["graph", "*.toml", "--namespace", "Gio"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not among the inputs"));
}
