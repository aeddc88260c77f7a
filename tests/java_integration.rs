use std::path::PathBuf;

use declscan::cli::scan::{run_scan, FileReport, FileStatus, ScanResult};
use declscan::config::Config;
use declscan::model::{ClassInfo, Modifier, PrimitiveType, TypeKind, TypeName};

fn java_fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/java_project")
}

fn scan_fixture() -> ScanResult {
    run_scan(&java_fixture(), &Config::default()).unwrap()
}

fn report<'a>(result: &'a ScanResult, suffix: &str) -> &'a FileReport {
    result
        .files
        .iter()
        .find(|f| f.path.ends_with(suffix))
        .unwrap_or_else(|| panic!("no report for {}", suffix))
}

fn classes<'a>(result: &'a ScanResult, suffix: &str) -> &'a [ClassInfo] {
    match &report(result, suffix).status {
        FileStatus::Extracted { classes, .. } => classes,
        other => panic!("{} was not extracted: {:?}", suffix, other),
    }
}

// =============================================================================
// DISCOVERY
// =============================================================================

#[test]
fn test_scan_reports_java_sources_only() {
    let result = scan_fixture();
    let paths: Vec<&str> = result.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "src/main/java/com/example/shop/Order.java",
            "src/main/java/com/example/shop/PricingException.java",
            "src/main/java/com/example/shop/Repository.java",
            "src/main/java/com/example/util/Audited.java",
            "src/main/java/com/example/util/Broken.java",
            "src/main/java/com/example/util/Range.java",
        ]
    );
}

#[test]
fn test_summary_counts() {
    let summary = scan_fixture().summary;
    assert_eq!(summary.files, 6);
    assert_eq!(summary.extracted, 5);
    assert_eq!(summary.syntax_failed, 1);
    assert_eq!(summary.errors, 0);
    assert_eq!(summary.classes, 7);
    assert_eq!(summary.methods, 13);
    assert_eq!(summary.fields, 12);
}

// =============================================================================
// CLASSES
// =============================================================================

#[test]
fn test_order_class_tree() {
    let result = scan_fixture();
    let order = &classes(&result, "Order.java")[0];

    assert_eq!(
        order.name.to_string(),
        "com.example.shop/src/main/java/com/example/shop/Order.java#Order"
    );
    assert_eq!(order.kind, TypeKind::Class);
    assert!(order.modifiers.contains(Modifier::Public));
    assert!(order.modifiers.contains(Modifier::Final));
    assert_eq!(
        order.header.text,
        "public final class Order implements Comparable<Order> "
    );

    let names: Vec<String> = order.walk().iter().map(|c| c.name.short_name()).collect();
    assert_eq!(
        names,
        vec!["Order", "Order$LineItem", "Order$State", "Order$State$1"]
    );
}

#[test]
fn test_order_overloads() {
    let result = scan_fixture();
    let order = &classes(&result, "Order.java")[0];

    let signatures: Vec<String> = order.methods.iter().map(|m| m.name.signature()).collect();
    assert_eq!(
        signatures,
        vec![
            "Order(String)void",
            "Order(String,ListLineItem)void",
            "total()long",
            "total(MapStringDouble)long",
            "compareTo(Order)int",
        ]
    );
}

#[test]
fn test_order_fields() {
    let result = scan_fixture();
    let order = &classes(&result, "Order.java")[0];

    let fields: Vec<(&str, &str)> = order
        .fields
        .iter()
        .map(|f| (f.name.name.as_str(), f.name.type_signature.as_str()))
        .collect();
    assert_eq!(
        fields,
        vec![
            ("id", "String"),
            ("items", "ListLineItem"),
            ("created", "int"),
            ("cancelled", "int"),
        ]
    );
    for field in &order.fields {
        assert_eq!(field.modifiers.iter().collect::<Vec<_>>(), vec![Modifier::Public]);
    }
}

#[test]
fn test_varargs_argument() {
    let result = scan_fixture();
    let item = classes(&result, "Order.java")[0]
        .find_nested("Order$LineItem")
        .unwrap();
    let price = item.method("price").unwrap();
    assert_eq!(price.arguments[0].name, "tiers");
    assert_eq!(
        price.arguments[0].type_name,
        TypeName::Primitive(PrimitiveType::Int)
    );
    assert_eq!(price.return_type, TypeName::Primitive(PrimitiveType::Double));
    assert!(item.modifiers.contains(Modifier::Private));
}

#[test]
fn test_enum_with_constant_body() {
    let result = scan_fixture();
    let state = classes(&result, "Order.java")[0]
        .find_nested("Order$State")
        .unwrap();
    assert_eq!(state.kind, TypeKind::Enum);
    assert!(state.header.text.is_empty());
    assert_eq!(state.fields.len(), 3);
    assert!(state.method("terminal").is_some());

    let cancelled = state.find_nested("Order$State$1").unwrap();
    assert!(cancelled.synthetic);
    assert!(cancelled.method("terminal").is_some());
}

#[test]
fn test_interface_members() {
    let result = scan_fixture();
    let repo = &classes(&result, "Repository.java")[0];
    assert_eq!(repo.kind, TypeKind::Interface);

    let methods: Vec<String> = repo.methods.iter().map(|m| m.name.signature()).collect();
    assert_eq!(methods, vec!["find(String)T", "save(T)void", "exists(String)bool"]);
    assert_eq!(
        repo.field("PAGE_SIZE").unwrap().type_name,
        TypeName::Primitive(PrimitiveType::Int)
    );
}

#[test]
fn test_record_components() {
    let result = scan_fixture();
    let range = &classes(&result, "Range.java")[0];
    assert_eq!(range.kind, TypeKind::Record);
    assert_eq!(range.name.package().as_str(), "com.example.util");
    let fields: Vec<&str> = range.fields.iter().map(|f| f.name.name.as_str()).collect();
    assert_eq!(fields, vec!["low", "high"]);
    assert_eq!(range.method("contains").unwrap().name.signature(), "contains(int)bool");
}

#[test]
fn test_annotation_type_file_has_no_classes() {
    let result = scan_fixture();
    assert!(classes(&result, "Audited.java").is_empty());
}

// =============================================================================
// FAILURES
// =============================================================================

#[test]
fn test_syntax_errors_fail_only_that_file() {
    let result = scan_fixture();
    match &report(&result, "Broken.java").status {
        FileStatus::SyntaxFailed { errors } => assert!(!errors.is_empty()),
        other => panic!("expected syntax failure, got {:?}", other),
    }
    assert!(!classes(&result, "PricingException.java").is_empty());
}

#[test]
fn test_recovery_mode_extracts_broken_file() {
    let mut config = Config::default();
    config.extract.recover_partial_trees = true;
    let result = run_scan(&java_fixture(), &config).unwrap();
    assert_eq!(result.summary.syntax_failed, 0);
    match &report(&result, "Broken.java").status {
        FileStatus::Extracted { recovered, .. } => assert!(!recovered.is_empty()),
        other => panic!("expected recovered extraction, got {:?}", other),
    }
}

#[test]
fn test_exclude_from_config() {
    let mut config = Config::default();
    config.discovery.exclude.push("**/util/**".to_string());
    let result = run_scan(&java_fixture(), &config).unwrap();
    assert_eq!(result.files.len(), 3);
    assert!(result.files.iter().all(|f| f.path.contains("/shop/")));
}
