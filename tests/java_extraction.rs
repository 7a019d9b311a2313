//! Integration tests for the Java extractor.
//!
//! These tests run the public `parse` entry point over snippets and the
//! testdata fixtures.

use std::path::PathBuf;

use codeshape::analysis::{ClassKind, ExportKind, Visibility};
use codeshape::{ExtractOptions, JavaExtractor, LanguageExtractor, StructuralSummary};

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn parse(source: &str) -> StructuralSummary {
    JavaExtractor::new().parse(source, &ExtractOptions::default())
}

fn parse_fixture(name: &str) -> StructuralSummary {
    let path = testdata_path().join("java").join(name);
    let source = std::fs::read_to_string(&path).expect("fixture should exist");
    parse(&source)
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_add_snippet() {
    let summary = parse("public int add(int a, int b) { return a + b; }");

    assert_eq!(summary.functions.len(), 1);
    let add = &summary.functions[0];
    assert_eq!(add.name, "add");
    let params: Vec<(&str, &str)> = add
        .parameters
        .iter()
        .map(|p| (p.name.as_str(), p.r#type.as_str()))
        .collect();
    assert_eq!(params, vec![("a", "int"), ("b", "int")]);
    assert_eq!(add.return_type.as_deref(), Some("int"));
    assert!(add.is_exported);
    assert_eq!(add.complexity, 1);
    assert_eq!(summary.exports.len(), 1);
    assert_eq!(summary.exports[0].kind, ExportKind::Function);
}

#[test]
fn test_if_and_logical_and_scores_three() {
    let summary = parse(
        "class Gate {\n    boolean open(int a, int b) {\n        if (a > 0 && b > 0) {\n            return true;\n        }\n        return false;\n    }\n}\n",
    );
    let open = summary.find_class("Gate").unwrap().find_method("open").unwrap();
    assert_eq!(open.complexity, 3);
}

#[test]
fn test_truncated_class_still_summarized() {
    let summary = parse("class Foo { void bar() {");
    let foo = summary.find_class("Foo").expect("Foo should be recognized");
    assert_eq!(foo.methods[0].name, "bar");
    assert!(foo.start_line <= foo.end_line);
    assert!(!summary.is_parse_failure());
}

#[test]
fn test_empty_input() {
    let summary = parse("");
    assert_eq!(summary.language, "java");
    assert!(summary.functions.is_empty());
    assert!(summary.classes.is_empty());
    assert!(summary.imports.is_empty());
    assert!(summary.exports.is_empty());
    assert!(summary.syntax_errors.is_empty());
    assert!(summary.warnings.is_empty());
}

// =============================================================================
// Fixture
// =============================================================================

#[test]
fn test_inventory_fixture() {
    let summary = parse_fixture("Inventory.java");

    assert_eq!(summary.package.as_deref(), Some("com.acme.inventory"));
    assert!(summary.syntax_errors.is_empty());

    let sources: Vec<(&str, bool)> = summary
        .imports
        .iter()
        .map(|i| (i.source.as_str(), i.is_external))
        .collect();
    assert_eq!(
        sources,
        vec![
            ("java.util.ArrayList", true),
            ("java.util.List", true),
            ("com.acme.inventory.model.Item", false),
        ]
    );

    let inventory = summary.find_class("Inventory").unwrap();
    assert_eq!(inventory.kind, ClassKind::Class);
    assert_eq!(inventory.docstring, "Tracks stock levels.");
    assert_eq!(inventory.start_line, 10);
    assert_eq!(inventory.end_line, 40);
    assert_eq!(inventory.namespace.as_deref(), Some("com.acme.inventory"));

    let names: Vec<&str> = inventory.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Inventory", "addItem", "countAbove", "getItem", "log"]);

    let add_item = inventory.find_method("addItem").unwrap();
    assert_eq!(add_item.complexity, 2);
    assert!(add_item.dependencies.contains("add"));
    assert_eq!(add_item.start_line, 16);
    assert_eq!(add_item.end_line, 21);

    let count_above = inventory.find_method("countAbove").unwrap();
    assert_eq!(count_above.complexity, 4);
    assert_eq!(count_above.return_type.as_deref(), Some("int"));

    let get_item = inventory.find_method("getItem").unwrap();
    assert_eq!(
        get_item.test_candidates,
        vec![
            "testGetItemSuccess",
            "testGetItemInvalidParameters",
            "testGetItemNullParameters",
            "testGetItemReturnsExpectedValue",
        ]
    );

    let log = inventory.find_method("log").unwrap();
    assert!(!log.is_exported);

    assert_eq!(inventory.properties.len(), 1);
    let items = &inventory.properties[0];
    assert_eq!(items.name, "items");
    assert_eq!(items.r#type, "List<Item>");
    assert_eq!(items.visibility, Visibility::Private);
    assert_eq!(items.default_value.as_deref(), Some("new ArrayList<>()"));

    // Methods live on the class, never in the top-level list.
    assert!(summary.functions.is_empty());
    assert_eq!(summary.exports.len(), 1);
    assert_eq!(summary.exports[0].name, "Inventory");
}

#[test]
fn test_commented_out_declarations_are_ignored() {
    let summary = parse(
        "// import java.util.Map;\n/* public class Ghost {} */\nclass Real {\n    // void hidden() {}\n    void shown() {}\n}\n",
    );
    assert!(summary.imports.is_empty());
    assert!(summary.find_class("Ghost").is_none());
    let real = summary.find_class("Real").unwrap();
    assert_eq!(real.methods.len(), 1);
    assert_eq!(real.methods[0].name, "shown");
}

#[test]
fn test_trailing_comment_and_varargs() {
    let summary = parse(
        "class A {\n    int x = 0;\n    int y = 1; /* y */\n    void run(String... args) {}\n}\n",
    );
    let run = summary.find_class("A").unwrap().find_method("run").unwrap();
    assert_eq!(run.docstring, "");
    assert_eq!(run.parameters[0].name, "args");
    assert_eq!(run.parameters[0].r#type, "String...");
}
