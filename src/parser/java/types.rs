use tree_sitter::Node;

use crate::model::TypeName;

/// Node kinds that can appear where the grammar expects a type.
const TYPE_KINDS: &[&str] = &[
    "void_type",
    "integral_type",
    "floating_point_type",
    "boolean_type",
    "type_identifier",
    "scoped_type_identifier",
    "generic_type",
    "array_type",
    "annotated_type",
];

pub(super) fn is_type_node(node: Node<'_>) -> bool {
    TYPE_KINDS.contains(&node.kind())
}

/// Resolve an optional type node. Absent or unrecognized types are `void`.
pub(super) fn resolve_type(node: Option<Node<'_>>, source: &str) -> TypeName {
    match node {
        Some(node) => resolve(node, source),
        None => TypeName::void(),
    }
}

fn resolve(node: Node<'_>, source: &str) -> TypeName {
    match node.kind() {
        "void_type" => TypeName::void(),
        "integral_type" | "floating_point_type" | "boolean_type" => {
            // for_name falls back to a reference for unknown text; a
            // primitive slot never names a class, so clamp to void.
            match TypeName::for_name(text(node, source)) {
                primitive @ TypeName::Primitive(_) => primitive,
                TypeName::Reference(_) => TypeName::void(),
            }
        }
        "type_identifier" | "scoped_type_identifier" => TypeName::for_name(text(node, source)),
        "generic_type" => fold_generic(node, source),
        // Dimensions are not part of the model; `int[]` resolves as `int`.
        "array_type" => resolve_type(node.child_by_field_name("element"), source),
        "annotated_type" => resolve_type(last_type_child(node), source),
        _ => TypeName::void(),
    }
}

/// `Map<String, List<Integer>>` becomes the reference `MapStringListInteger`:
/// the base identifier followed by each argument's identifier, flattened.
fn fold_generic(node: Node<'_>, source: &str) -> TypeName {
    let mut folded = String::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "type_identifier" | "scoped_type_identifier" => {
                folded.push_str(text(child, source));
            }
            "type_arguments" => {
                let mut inner_cursor = child.walk();
                for argument in child.named_children(&mut inner_cursor) {
                    folded.push_str(&argument_identifier(argument, source));
                }
            }
            _ => {}
        }
    }
    TypeName::for_name(&folded)
}

fn argument_identifier(node: Node<'_>, source: &str) -> String {
    if node.kind() == "wildcard" {
        // `? extends T` and `? super T` contribute T; a bare `?` is void.
        return resolve_type(first_type_child(node), source).signature();
    }
    if is_type_node(node) {
        // Only primitive arrays put a primitive here; they fold as void.
        return match resolve(node, source) {
            TypeName::Primitive(_) => TypeName::void().signature(),
            reference => reference.signature(),
        };
    }
    // annotations inside the argument list carry no type
    String::new()
}

/// Signatures of the types listed in a `throws` clause, in order.
pub(super) fn exception_names(declaration: Node<'_>, source: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut cursor = declaration.walk();
    for child in declaration.children(&mut cursor) {
        if child.kind() != "throws" {
            continue;
        }
        let mut inner_cursor = child.walk();
        for exception in child.named_children(&mut inner_cursor) {
            if is_type_node(exception) {
                names.push(resolve(exception, source).signature());
            }
        }
    }
    names
}

/// First child that denotes a type, skipping modifiers and annotations.
pub(super) fn first_type_child(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).find(|c| is_type_node(*c));
    found
}

fn last_type_child(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).filter(|c| is_type_node(*c)).last();
    found
}

fn text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PrimitiveType;
    use tree_sitter::Tree;

    fn parse(source: &str) -> Tree {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .unwrap();
        parser.parse(source, None).unwrap()
    }

    /// Resolve the declared type of the first field in `class T { <decl> }`.
    fn field_type(decl: &str) -> TypeName {
        let source = format!("class T {{ {} }}", decl);
        let tree = parse(&source);
        let class = tree.root_node().named_child(0).unwrap();
        let body = class.child_by_field_name("body").unwrap();
        let field = body.named_child(0).unwrap();
        assert_eq!(field.kind(), "field_declaration");
        resolve_type(field.child_by_field_name("type"), &source)
    }

    #[test]
    fn test_primitives() {
        assert_eq!(field_type("int x;"), TypeName::Primitive(PrimitiveType::Int));
        assert_eq!(field_type("byte x;"), TypeName::Primitive(PrimitiveType::Byte));
        assert_eq!(field_type("char x;"), TypeName::Primitive(PrimitiveType::Char));
        assert_eq!(field_type("long x;"), TypeName::Primitive(PrimitiveType::Long));
        assert_eq!(field_type("float x;"), TypeName::Primitive(PrimitiveType::Float));
        assert_eq!(field_type("short x;"), TypeName::Primitive(PrimitiveType::Short));
        assert_eq!(field_type("double x;"), TypeName::Primitive(PrimitiveType::Double));
        assert_eq!(field_type("boolean x;"), TypeName::Primitive(PrimitiveType::Bool));
    }

    #[test]
    fn test_simple_and_qualified_references() {
        assert_eq!(field_type("String s;"), TypeName::Reference("String".into()));
        assert_eq!(
            field_type("java.util.Date d;"),
            TypeName::Reference("java.util.Date".into())
        );
    }

    #[test]
    fn test_generic_arguments_are_folded() {
        assert_eq!(
            field_type("List<String> names;"),
            TypeName::Reference("ListString".into())
        );
        assert_eq!(
            field_type("Map<String, List<Integer>> index;"),
            TypeName::Reference("MapStringListInteger".into())
        );
    }

    #[test]
    fn test_wildcards() {
        assert_eq!(
            field_type("List<? extends Number> xs;"),
            TypeName::Reference("ListNumber".into())
        );
        assert_eq!(
            field_type("Class<?> c;"),
            TypeName::Reference("Classvoid".into())
        );
    }

    #[test]
    fn test_primitive_array_argument_folds_as_void() {
        assert_eq!(
            field_type("List<int[]> rows;"),
            TypeName::Reference("Listvoid".into())
        );
        assert_eq!(
            field_type("List<String[]> rows;"),
            TypeName::Reference("ListString".into())
        );
    }

    #[test]
    fn test_arrays_resolve_to_element() {
        assert_eq!(field_type("int[] xs;"), TypeName::Primitive(PrimitiveType::Int));
        assert_eq!(field_type("String[][] grid;"), TypeName::Reference("String".into()));
    }

    #[test]
    fn test_absent_or_unknown_node_is_void() {
        assert!(resolve_type(None, "").is_void());

        let source = "class T {}";
        let tree = parse(source);
        let class = tree.root_node().named_child(0).unwrap();
        let name = class.child_by_field_name("name").unwrap();
        assert_eq!(name.kind(), "identifier");
        assert!(resolve_type(Some(name), source).is_void());
    }

    #[test]
    fn test_exception_names() {
        let source = "class T { void f() throws java.io.IOException, Boom {} }";
        let tree = parse(source);
        let class = tree.root_node().named_child(0).unwrap();
        let method = class
            .child_by_field_name("body")
            .unwrap()
            .named_child(0)
            .unwrap();
        assert_eq!(
            exception_names(method, source),
            vec!["java.io.IOException".to_string(), "Boom".to_string()]
        );
    }
}
