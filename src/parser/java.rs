use tracing::{debug, trace};
use tree_sitter::{Node, Parser};

use crate::model::{
    ClassInfo, ClassName, FieldInfo, FileName, Language, LineSpan, MethodInfo, MethodKind,
    ModifierSet, PackageName, Position, SourceCodeSnippet, Span, TypeKind,
};

use super::syntax::collect_syntax_errors;
use super::{
    ExtractError, ExtractOptions, ExtractionOutcome, LanguageExtractor, LogListener,
    SyntaxErrorListener,
};

mod members;
mod modifiers;
mod types;

use modifiers::{nested_type_modifiers, resolve_modifiers};

/// Extracts the declaration model from Java sources.
#[derive(Debug, Clone, Default)]
pub struct JavaExtractor {
    options: ExtractOptions,
}

impl JavaExtractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    fn create_parser() -> Result<Parser, ExtractError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .map_err(|source| ExtractError::Grammar {
                language: Language::Java,
                source,
            })?;
        Ok(parser)
    }

    /// Parse `source` and extract its top-level types, reporting every syntax
    /// error to `listener` first.
    pub fn extract_with_listener(
        &self,
        source: &str,
        file: &FileName,
        listener: &mut dyn SyntaxErrorListener,
    ) -> Result<ExtractionOutcome, ExtractError> {
        let mut parser = Self::create_parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ExtractError::NoTree { file: file.clone() })?;
        let root = tree.root_node();

        let errors = collect_syntax_errors(root, source);
        for error in &errors {
            listener.on_syntax_error(error);
        }
        if !errors.is_empty() && !self.options.recover_partial_trees {
            debug!(file = %file, errors = errors.len(), "file has syntax errors, nothing extracted");
            return Ok(ExtractionOutcome::Failed { errors });
        }

        let cx = ExtractCx {
            source,
            options: &self.options,
        };
        let classes = extract_compilation_unit(root, cx, file)?;
        debug!(file = %file, classes = classes.len(), "extracted declarations");

        Ok(ExtractionOutcome::Parsed {
            classes,
            recovered: errors,
        })
    }
}

impl LanguageExtractor for JavaExtractor {
    fn extract(&self, source: &str, file: &FileName) -> Result<ExtractionOutcome, ExtractError> {
        let mut listener = LogListener { file: file.as_str() };
        self.extract_with_listener(source, file, &mut listener)
    }

    fn language(&self) -> Language {
        Language::Java
    }
}

/// Read-only state shared by every extractor during one file's walk.
#[derive(Clone, Copy)]
struct ExtractCx<'a> {
    source: &'a str,
    options: &'a ExtractOptions,
}

impl<'a> ExtractCx<'a> {
    fn language(&self) -> Language {
        Language::Java
    }

    fn text(&self, node: Node<'_>) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn snippet(&self, node: Node<'_>) -> SourceCodeSnippet {
        SourceCodeSnippet::new(self.text(node), self.language())
    }

    fn span(&self, node: Node<'_>) -> Span {
        Span {
            start: node.start_byte(),
            end: node.end_byte(),
        }
    }

    fn line_span(&self, node: Node<'_>) -> LineSpan {
        let start = node.start_position();
        let end = node.end_position();
        LineSpan {
            start: Position {
                line: start.row + 1,
                column: start.column,
            },
            end: Position {
                line: end.row + 1,
                column: end.column,
            },
        }
    }

    fn missing(&self, node: Node<'_>, field: &'static str) -> ExtractError {
        ExtractError::MissingField {
            kind: node.kind().to_string(),
            field,
            line: node.start_position().row + 1,
        }
    }

    /// Text of the identifier stored under `field`.
    fn identifier(&self, node: Node<'_>, field: &'static str) -> Result<&'a str, ExtractError> {
        node.child_by_field_name(field)
            .map(|n| self.text(n))
            .filter(|text| !text.is_empty())
            .ok_or_else(|| self.missing(node, field))
    }

    /// In recovery mode a broken declaration is skipped; otherwise it fails
    /// the file.
    fn keep<T>(&self, result: Result<T, ExtractError>) -> Result<Option<T>, ExtractError> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) if self.options.recover_partial_trees => {
                debug!("skipping declaration: {}", err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

/// Where a type declaration sits: directly in a file, or inside another type.
#[derive(Clone, Copy)]
enum Scope<'a> {
    TopLevel {
        file: &'a FileName,
        package: &'a PackageName,
    },
    Nested {
        parent: &'a ClassName,
    },
}

/// Entry driver: one `ClassInfo` per top-level type, in declaration order.
fn extract_compilation_unit(
    root: Node<'_>,
    cx: ExtractCx<'_>,
    file: &FileName,
) -> Result<Vec<ClassInfo>, ExtractError> {
    let package = package_name(root, cx);
    let scope = Scope::TopLevel {
        file,
        package: &package,
    };

    let mut classes = Vec::new();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if !is_type_declaration(child) {
            continue;
        }
        if let Some(class) = cx.keep(extract_type_declaration(child, cx, scope))?.flatten() {
            classes.push(class);
        }
    }
    Ok(classes)
}

fn package_name(root: Node<'_>, cx: ExtractCx<'_>) -> PackageName {
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if child.kind() != "package_declaration" {
            continue;
        }
        let mut inner_cursor = child.walk();
        for inner_child in child.children(&mut inner_cursor) {
            if matches!(inner_child.kind(), "scoped_identifier" | "identifier") {
                return PackageName::new(cx.text(inner_child));
            }
        }
    }
    PackageName::default()
}

fn is_type_declaration(node: Node<'_>) -> bool {
    matches!(
        node.kind(),
        "class_declaration"
            | "interface_declaration"
            | "enum_declaration"
            | "record_declaration"
            | "annotation_type_declaration"
    )
}

/// Methods, fields and nested types collected from one body.
#[derive(Default)]
struct Members {
    methods: Vec<MethodInfo>,
    fields: Vec<FieldInfo>,
    nested: Vec<ClassInfo>,
}

impl Members {
    fn absorb(&mut self, other: Members) {
        self.methods.extend(other.methods);
        self.fields.extend(other.fields);
        self.nested.extend(other.nested);
    }
}

/// Build a class, interface, enum or record. Annotation types produce
/// nothing.
fn extract_type_declaration(
    node: Node<'_>,
    cx: ExtractCx<'_>,
    scope: Scope<'_>,
) -> Result<Option<ClassInfo>, ExtractError> {
    let kind = match node.kind() {
        "class_declaration" => TypeKind::Class,
        "interface_declaration" => TypeKind::Interface,
        "enum_declaration" => TypeKind::Enum,
        "record_declaration" => TypeKind::Record,
        "annotation_type_declaration" => {
            discard_annotation_type(node, cx);
            return Ok(None);
        }
        other => {
            trace!(kind = other, "not a type declaration");
            return Ok(None);
        }
    };

    let simple_name = cx.identifier(node, "name")?;
    let (name, modifiers) = match scope {
        Scope::TopLevel { file, package } => (
            ClassName::top_level(file.clone(), package.clone(), simple_name),
            resolve_modifiers(node),
        ),
        Scope::Nested { parent } => (
            ClassName::nested(parent, simple_name),
            nested_type_modifiers(node, cx.options),
        ),
    };

    let body = node.child_by_field_name("body");
    let header = match kind {
        TypeKind::Enum => SourceCodeSnippet::empty(cx.language()),
        _ => header_snippet(node, body, cx),
    };

    let members = match (kind, body) {
        (_, None) => Members::default(),
        (TypeKind::Class, Some(body)) => walk_class_body(body, cx, &name)?,
        (TypeKind::Interface, Some(body)) => walk_interface_body(body, cx, &name)?,
        (TypeKind::Enum, Some(body)) => walk_enum_body(body, cx, &name)?,
        (TypeKind::Record, Some(body)) => {
            let mut members = Members::default();
            if let Some(parameters) = node.child_by_field_name("parameters") {
                members.fields = members::extract_record_components(parameters, cx, &name)?;
            }
            members.absorb(walk_class_body(body, cx, &name)?);
            members
        }
    };

    Ok(Some(ClassInfo {
        name,
        kind,
        methods: members.methods,
        fields: members.fields,
        modifiers,
        nested: members.nested,
        header,
        synthetic: false,
        span: cx.span(node),
        line_span: cx.line_span(node),
    }))
}

/// Declaration text up to, not including, the opening brace of `body`.
/// Braces inside annotations on the declaration stay in the header.
fn header_snippet(
    node: Node<'_>,
    body: Option<Node<'_>>,
    cx: ExtractCx<'_>,
) -> SourceCodeSnippet {
    let text = cx.text(node);
    let header = body
        .and_then(|body| text.get(..body.start_byte().saturating_sub(node.start_byte())))
        .unwrap_or(text);
    SourceCodeSnippet::new(header, cx.language())
}

fn discard_annotation_type(node: Node<'_>, cx: ExtractCx<'_>) {
    let name = node
        .child_by_field_name("name")
        .map(|n| cx.text(n))
        .unwrap_or("");
    let body_len = node
        .child_by_field_name("body")
        .map(|b| cx.text(b).len())
        .unwrap_or(0);
    debug!(name, body_len, "discarding annotation type declaration");
}

fn extract_nested(
    node: Node<'_>,
    cx: ExtractCx<'_>,
    owner: &ClassName,
    members: &mut Members,
) -> Result<(), ExtractError> {
    let scope = Scope::Nested { parent: owner };
    if let Some(class) = cx.keep(extract_type_declaration(node, cx, scope))?.flatten() {
        members.nested.push(class);
    }
    Ok(())
}

fn walk_class_body(
    body: Node<'_>,
    cx: ExtractCx<'_>,
    owner: &ClassName,
) -> Result<Members, ExtractError> {
    let mut members = Members::default();
    let mut cursor = body.walk();
    for child in body.children(&mut cursor) {
        match child.kind() {
            "method_declaration" => {
                let method = members::extract_method(child, cx, owner, MethodKind::Method);
                members.methods.extend(cx.keep(method)?);
            }
            "constructor_declaration" => {
                let method = members::extract_method(child, cx, owner, MethodKind::Constructor);
                members.methods.extend(cx.keep(method)?);
            }
            "field_declaration" => {
                let fields = members::extract_fields(child, cx, owner);
                members.fields.extend(cx.keep(fields)?.unwrap_or_default());
            }
            _ if is_type_declaration(child) => {
                extract_nested(child, cx, owner, &mut members)?;
            }
            kind if child.is_named() => {
                trace!(kind, "skipping class body member");
            }
            _ => {}
        }
    }
    Ok(members)
}

fn walk_interface_body(
    body: Node<'_>,
    cx: ExtractCx<'_>,
    owner: &ClassName,
) -> Result<Members, ExtractError> {
    let mut members = Members::default();
    let mut cursor = body.walk();
    for child in body.children(&mut cursor) {
        match child.kind() {
            "method_declaration" => {
                let method = members::extract_method(child, cx, owner, MethodKind::Method);
                members.methods.extend(cx.keep(method)?);
            }
            "constant_declaration" => {
                let fields = members::extract_fields(child, cx, owner);
                members.fields.extend(cx.keep(fields)?.unwrap_or_default());
            }
            _ if is_type_declaration(child) => {
                extract_nested(child, cx, owner, &mut members)?;
            }
            kind if child.is_named() => {
                trace!(kind, "skipping interface body member");
            }
            _ => {}
        }
    }
    Ok(members)
}

fn walk_enum_body(
    body: Node<'_>,
    cx: ExtractCx<'_>,
    owner: &ClassName,
) -> Result<Members, ExtractError> {
    let mut members = Members::default();
    let mut bodies = 0;
    let mut cursor = body.walk();
    for child in body.children(&mut cursor) {
        match child.kind() {
            "enum_constant" => {
                let constant = members::extract_enum_constant(child, cx, owner);
                members.fields.extend(cx.keep(constant)?);
                if let Some(class_body) = child.child_by_field_name("body") {
                    bodies += 1;
                    let synthetic = enum_constant_class(child, class_body, bodies, cx, owner);
                    members.nested.extend(cx.keep(synthetic)?);
                }
            }
            "enum_body_declarations" => {
                members.absorb(walk_class_body(child, cx, owner)?);
            }
            _ => {}
        }
    }
    Ok(members)
}

/// `RED { ... }` inside an enum: an anonymous subclass. Like javac, the
/// bodies are numbered `Enum$1`, `Enum$2` in constant order; a numeric name
/// cannot clash with a declared nested type.
fn enum_constant_class(
    constant: Node<'_>,
    class_body: Node<'_>,
    ordinal: usize,
    cx: ExtractCx<'_>,
    owner: &ClassName,
) -> Result<ClassInfo, ExtractError> {
    cx.identifier(constant, "name")?;
    let name = ClassName::nested(owner, ordinal.to_string());
    let members = walk_class_body(class_body, cx, &name)?;
    Ok(ClassInfo {
        kind: TypeKind::Class,
        methods: members.methods,
        fields: members.fields,
        modifiers: ModifierSet::new(),
        nested: members.nested,
        header: header_snippet(constant, Some(class_body), cx),
        synthetic: true,
        span: cx.span(constant),
        line_span: cx.line_span(constant),
        name,
    })
}
