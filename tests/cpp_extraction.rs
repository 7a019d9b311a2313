//! Integration tests for the C++ extractor over the testdata fixtures.

use std::path::PathBuf;

use codeshape::analysis::{ClassKind, Visibility};
use codeshape::{CppExtractor, ExtractOptions, LanguageExtractor, StructuralSummary};

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn parse(source: &str) -> StructuralSummary {
    CppExtractor::new().parse(source, &ExtractOptions::default())
}

fn parse_fixture(name: &str) -> StructuralSummary {
    let path = testdata_path().join("cpp").join(name);
    let source = std::fs::read_to_string(&path).expect("fixture should exist");
    parse(&source)
}

#[test]
fn test_header_fixture() {
    let summary = parse_fixture("geometry.hpp");

    assert_eq!(summary.imports.len(), 1);
    assert_eq!(summary.imports[0].source, "string");
    assert!(summary.imports[0].is_external);

    // The free-function prototype is not a definition.
    assert!(summary.functions.is_empty());

    let point = summary.find_class("Point").unwrap();
    assert_eq!(point.kind, ClassKind::Struct);
    assert_eq!(point.namespace.as_deref(), Some("geo"));
    let fields: Vec<(&str, Option<&str>)> = point
        .properties
        .iter()
        .map(|p| (p.name.as_str(), p.default_value.as_deref()))
        .collect();
    assert_eq!(fields, vec![("x", Some("0.0")), ("y", Some("0.0"))]);
    assert!(point.properties.iter().all(|p| p.visibility == Visibility::Public));

    let shape = summary.find_class("Shape").unwrap();
    assert_eq!(shape.docstring, "Abstract base for all shapes.");
    assert!(shape.is_abstract);
    let names: Vec<&str> = shape.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["~Shape", "area", "name"]);
    assert!(shape.find_method("area").unwrap().is_abstract);
    assert_eq!(shape.find_method("~Shape").unwrap().return_type, None);
    assert_eq!(shape.properties[0].name, "id_");
    assert_eq!(shape.properties[0].visibility, Visibility::Protected);

    let exported: Vec<&str> = summary.exports.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(exported, vec!["Point", "Shape"]);
}

#[test]
fn test_source_fixture() {
    let summary = parse_fixture("geometry.cpp");
    assert!(summary.syntax_errors.is_empty());

    let includes: Vec<(&str, bool)> = summary
        .imports
        .iter()
        .map(|i| (i.source.as_str(), i.is_external))
        .collect();
    assert_eq!(
        includes,
        vec![("cmath", true), ("vector", true), ("geometry.hpp", false)]
    );

    let names: Vec<String> = summary.functions.iter().map(|f| f.qualified_name()).collect();
    assert_eq!(names, vec!["distance", "Polygon::area", "clamp_index"]);

    let distance = summary.find_function("distance").unwrap();
    assert_eq!(distance.start_line, 8);
    assert_eq!(distance.end_line, 12);
    assert_eq!(distance.docstring, "Computes the distance between two points.");
    assert_eq!(distance.namespace.as_deref(), Some("geo"));
    assert_eq!(distance.parameters.len(), 2);
    assert_eq!(distance.parameters[0].name, "a");
    assert!(distance.is_exported);

    let area = summary.find_function("area").unwrap();
    assert_eq!(area.receiver.as_deref(), Some("Polygon"));
    assert_eq!(area.complexity, 3);
    assert_eq!(area.return_type.as_deref(), Some("double"));
    assert_eq!(area.test_candidates[0], "test_area_success");

    let clamp = summary.find_function("clamp_index").unwrap();
    assert!(!clamp.is_exported);
    assert_eq!(clamp.complexity, 3);

    let polygon = summary.find_class("Polygon").unwrap();
    assert_eq!(polygon.extends.as_deref(), Some("Shape"));
    let ctor = polygon.find_method("Polygon").unwrap();
    assert!(ctor.is_constructor);
    assert_eq!(ctor.parameters[0].r#type, "std::vector<Point>");
    let declared = polygon.find_method("area").unwrap();
    assert!(declared.is_abstract);
    assert_eq!(declared.start_line, declared.end_line);
    assert_eq!(polygon.properties[0].name, "points_");
    assert_eq!(polygon.properties[0].visibility, Visibility::Private);

    let exported: Vec<&str> = summary.exports.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(exported, vec!["distance", "Polygon", "Polygon::area"]);
}

#[test]
fn test_class_members_default_to_private() {
    let summary = parse("class Counter {\n    int value_;\n    void bump() { ++value_; }\n};\n");
    let counter = summary.find_class("Counter").unwrap();
    assert_eq!(counter.properties[0].visibility, Visibility::Private);
    assert!(!counter.methods[0].is_exported);
    assert!(counter.is_exported);
}

#[test]
fn test_containment() {
    let summary = parse(
        "struct Widget {\n    void draw() {}\n};\n\nvoid Widget_free(Widget* w) {}\n",
    );
    assert_eq!(summary.functions.len(), 1);
    assert_eq!(summary.functions[0].name, "Widget_free");
    assert_eq!(summary.find_class("Widget").unwrap().methods[0].name, "draw");
}

#[test]
fn test_trailing_comment_is_not_a_docstring() {
    let summary = parse(
        "#include <x>\nint counter = 0;\nint a = 1; /* trailing */\nvoid f() {}\n\n/* Applies `v` n times. */\nvoid apply(void (*v)(int), int n) {}\n",
    );
    assert_eq!(summary.functions.len(), 2);
    assert_eq!(summary.functions[0].name, "f");
    assert_eq!(summary.functions[0].docstring, "");

    let apply = &summary.functions[1];
    assert_eq!(apply.docstring, "Applies `v` n times.");
    assert_eq!(apply.parameters[0].name, "v");
    assert_eq!(apply.parameters[0].r#type, "void (*)(int)");
}
