use propwire_codegen::{
    compile_module, parse_docgen_file, CodegenError, PropertyKind, RustConfig, TypeMapping,
};
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn test_parse_button() {
    let schema = parse_docgen_file(&fixture_path("Button.json"), &TypeMapping::default())
        .expect("should parse Button.json");

    assert_eq!(schema.name, "Button");
    let names: Vec<&str> = schema.props.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["label", "disabled", "icon", "onPress"]);
    assert_eq!(schema.required, vec!["label", "onPress"]);

    let kinds: Vec<PropertyKind> = schema.props.iter().map(|p| p.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            PropertyKind::Plain,
            PropertyKind::Plain,
            PropertyKind::Element,
            PropertyKind::Function
        ]
    );
}

#[test]
fn test_parse_uses_file_stem_without_display_name() {
    let schema = parse_docgen_file(&fixture_path("Gauge.json"), &TypeMapping::default())
        .expect("should parse Gauge.json");

    assert_eq!(schema.name, "Gauge");
    assert_eq!(schema.prop("value").unwrap().ty, "f64");
    assert_eq!(
        schema.prop("options").unwrap().ty,
        "::propwire_runtime::JsonObject"
    );
    assert_eq!(
        schema.prop("marks").unwrap().ty,
        "Vec<::propwire_runtime::Value>"
    );
    assert_eq!(schema.prop("id").unwrap().ty, "String");
}

#[test]
fn test_unsupported_type_fails() {
    let err = parse_docgen_file(&fixture_path("Chart.json"), &TypeMapping::default())
        .expect_err("arrayOf is unsupported");

    match err {
        CodegenError::UnsupportedType {
            component,
            property,
            ty,
        } => {
            assert_eq!(component, "Chart");
            assert_eq!(property, "series");
            assert_eq!(ty, "arrayOf");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_file_reports_path() {
    let err = parse_docgen_file(&fixture_path("Nope.json"), &TypeMapping::default())
        .expect_err("file does not exist");
    assert!(err.to_string().contains("Nope.json"), "{err}");
}

#[test]
fn test_fixtures_compile_into_module() {
    let mapping = TypeMapping::default();
    let schemas = vec![
        parse_docgen_file(&fixture_path("Button.json"), &mapping).unwrap(),
        parse_docgen_file(&fixture_path("Gauge.json"), &mapping).unwrap(),
    ];

    let output = compile_module(&schemas, &RustConfig::default()).expect("should compile");
    assert_eq!(output.components.len(), 2);
    assert_eq!(output.components[0].file_name(), "button.rs");

    let button = &output.components[0].source;
    assert!(
        button.contains(
            "pub fn new(label: String, on_press: ::propwire_runtime::Handler) -> Result<"
        ),
        "unexpected constructor:\n{}",
        button
    );
    assert!(button.contains("pub fn set_disabled(&mut self, disabled: bool)"));

    let gauge = &output.components[1].source;
    assert!(gauge.contains("pub fn new(value: f64)"));
    assert!(gauge.contains("    options: ::propwire_runtime::JsonObject,"));
}
