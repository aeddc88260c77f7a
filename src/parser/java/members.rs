use tracing::trace;
use tree_sitter::Node;

use crate::model::{
    Argument, ClassName, FieldInfo, FieldName, MethodInfo, MethodKind, MethodName, Modifier,
    ModifierSet, SourceCodeSnippet, TypeName,
};
use crate::parser::ExtractError;

use super::modifiers::member_modifiers;
use super::types::{exception_names, first_type_child, resolve_type};
use super::ExtractCx;

/// Build the record for a method, constructor or interface method.
///
/// The overload key is built from parameter types only. The `throws` list
/// is read but not kept.
pub(super) fn extract_method(
    node: Node<'_>,
    cx: ExtractCx<'_>,
    owner: &ClassName,
    kind: MethodKind,
) -> Result<MethodInfo, ExtractError> {
    let name = cx.identifier(node, "name")?;

    let arguments = match node.child_by_field_name("parameters") {
        Some(parameters) => extract_parameters(parameters, cx)?,
        None => Vec::new(),
    };

    let return_type = match kind {
        MethodKind::Constructor => TypeName::void(),
        MethodKind::Method => resolve_type(node.child_by_field_name("type"), cx.source),
    };

    let exceptions = exception_names(node, cx.source);
    if !exceptions.is_empty() {
        trace!(method = name, throws = ?exceptions, "dropping exception list");
    }

    let method_name = MethodName::new(
        owner.clone(),
        name,
        return_type.signature(),
        arguments.iter().map(|a| a.type_name.signature()).collect(),
    );

    Ok(MethodInfo {
        name: method_name,
        kind,
        modifiers: member_modifiers(node, cx.options),
        owner: owner.clone(),
        arguments,
        return_type,
        snippet: cx.snippet(node),
        span: cx.span(node),
        line_span: cx.line_span(node),
    })
}

/// Arguments of a `formal_parameters` node in declaration order. The
/// receiver parameter (`Foo this`) is not an argument.
pub(super) fn extract_parameters(
    parameters: Node<'_>,
    cx: ExtractCx<'_>,
) -> Result<Vec<Argument>, ExtractError> {
    let mut arguments = Vec::new();
    let mut cursor = parameters.walk();
    for child in parameters.children(&mut cursor) {
        match child.kind() {
            "formal_parameter" => arguments.push(formal_parameter(child, cx)?),
            "spread_parameter" => arguments.push(spread_parameter(child, cx)?),
            _ => {}
        }
    }
    Ok(arguments)
}

fn formal_parameter(node: Node<'_>, cx: ExtractCx<'_>) -> Result<Argument, ExtractError> {
    let type_name = resolve_type(node.child_by_field_name("type"), cx.source);
    // `name` is the bare identifier; trailing `[]` sits in `dimensions`.
    let name = cx.identifier(node, "name")?;
    Ok(Argument::new(name, type_name))
}

/// `String... args`: the grammar gives neither the type nor the declarator a
/// field name, so both are found by kind.
fn spread_parameter(node: Node<'_>, cx: ExtractCx<'_>) -> Result<Argument, ExtractError> {
    let type_name = resolve_type(first_type_child(node), cx.source);

    let mut name = None;
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "variable_declarator" => {
                name = Some(cx.identifier(child, "name")?);
                break;
            }
            "identifier" => {
                name = Some(cx.text(child));
                break;
            }
            _ => {}
        }
    }

    let name = name.ok_or_else(|| cx.missing(node, "name"))?;
    Ok(Argument::new(name, type_name))
}

/// One record per declarator of a `field_declaration` or an interface
/// `constant_declaration`. All declarators share the declared type and the
/// statement text.
pub(super) fn extract_fields(
    node: Node<'_>,
    cx: ExtractCx<'_>,
    owner: &ClassName,
) -> Result<Vec<FieldInfo>, ExtractError> {
    let type_name = resolve_type(node.child_by_field_name("type"), cx.source);
    let modifiers = member_modifiers(node, cx.options);
    let snippet = cx.snippet(node);

    let mut fields = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() != "variable_declarator" {
            continue;
        }
        let name = cx.identifier(child, "name")?;
        fields.push(FieldInfo {
            name: FieldName::new(owner.clone(), name, type_name.signature()),
            owner: owner.clone(),
            type_name: type_name.clone(),
            modifiers: modifiers.clone(),
            snippet: snippet.clone(),
            span: cx.span(node),
            line_span: cx.line_span(child),
        });
    }
    Ok(fields)
}

/// An enum constant is a `public static final` field of the enum's own type.
pub(super) fn extract_enum_constant(
    node: Node<'_>,
    cx: ExtractCx<'_>,
    owner: &ClassName,
) -> Result<FieldInfo, ExtractError> {
    let name = cx.identifier(node, "name")?;
    let type_name = TypeName::for_name(owner.simple_name());
    let modifiers: ModifierSet = [Modifier::Public, Modifier::Static, Modifier::Final]
        .into_iter()
        .collect();

    Ok(FieldInfo {
        name: FieldName::new(owner.clone(), name, type_name.signature()),
        owner: owner.clone(),
        type_name,
        modifiers,
        snippet: cx.snippet(node),
        span: cx.span(node),
        line_span: cx.line_span(node),
    })
}

/// Record components become `private final` fields.
pub(super) fn extract_record_components(
    parameters: Node<'_>,
    cx: ExtractCx<'_>,
    owner: &ClassName,
) -> Result<Vec<FieldInfo>, ExtractError> {
    let modifiers: ModifierSet = [Modifier::Private, Modifier::Final].into_iter().collect();

    let mut fields = Vec::new();
    let mut cursor = parameters.walk();
    for child in parameters.children(&mut cursor) {
        if child.kind() != "formal_parameter" {
            continue;
        }
        let component = formal_parameter(child, cx)?;
        fields.push(FieldInfo {
            name: FieldName::new(owner.clone(), &component.name, component.type_name.signature()),
            owner: owner.clone(),
            type_name: component.type_name,
            modifiers: modifiers.clone(),
            snippet: SourceCodeSnippet::new(cx.text(child), cx.language()),
            span: cx.span(child),
            line_span: cx.line_span(child),
        });
    }
    Ok(fields)
}
