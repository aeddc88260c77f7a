use tree_sitter::Node;

use crate::model::{Modifier, ModifierSet};
use crate::parser::ExtractOptions;

/// Union of every modifier keyword on a declaration.
///
/// Annotations and keywords without a flag are ignored.
pub(super) fn resolve_modifiers(declaration: Node<'_>) -> ModifierSet {
    let mut set = ModifierSet::new();
    let mut cursor = declaration.walk();
    for child in declaration.children(&mut cursor) {
        if child.kind() != "modifiers" {
            continue;
        }
        let mut inner_cursor = child.walk();
        set.extend(
            child
                .children(&mut inner_cursor)
                .filter_map(|keyword| Modifier::from_keyword(keyword.kind())),
        );
    }
    set
}

/// Methods and fields are `public` unless the caller opted in to reading
/// the written modifiers.
pub(super) fn member_modifiers(declaration: Node<'_>, options: &ExtractOptions) -> ModifierSet {
    if options.resolve_member_modifiers {
        resolve_modifiers(declaration)
    } else {
        ModifierSet::from(Modifier::Public)
    }
}

/// Nested types are `private` unless the caller opted in to reading the
/// written modifiers.
pub(super) fn nested_type_modifiers(declaration: Node<'_>, options: &ExtractOptions) -> ModifierSet {
    if options.resolve_member_modifiers {
        resolve_modifiers(declaration)
    } else {
        ModifierSet::from(Modifier::Private)
    }
}
