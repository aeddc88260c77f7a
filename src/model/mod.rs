use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod modifiers;
pub mod names;

pub use modifiers::{Modifier, ModifierSet};
pub use names::{
    ClassName, FieldName, FileName, MethodName, PackageName, PrimitiveType, TypeName,
    NESTED_DELIMITER,
};

/// Languages with an extraction pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Java,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Java => "java",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "java" => Ok(Language::Java),
            _ => Err(format!("unknown language: {}", s)),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSpan {
    pub start: Position,
    pub end: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCodeSnippet {
    pub text: String,
    pub language: Language,
}

impl SourceCodeSnippet {
    pub fn new(text: impl Into<String>, language: Language) -> Self {
        Self {
            text: text.into(),
            language,
        }
    }

    pub fn empty(language: Language) -> Self {
        Self::new(String::new(), language)
    }
}

/// A formal parameter: declared name plus resolved type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub name: String,
    pub type_name: TypeName,
}

impl Argument {
    pub fn new(name: impl Into<String>, type_name: TypeName) -> Self {
        Self {
            name: name.into(),
            type_name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Record,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Record => "record",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    Method,
    Constructor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodInfo {
    pub name: MethodName,
    pub kind: MethodKind,
    pub modifiers: ModifierSet,
    pub owner: ClassName,
    pub arguments: Vec<Argument>,
    pub return_type: TypeName,
    pub snippet: SourceCodeSnippet,
    pub span: Span,
    pub line_span: LineSpan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub name: FieldName,
    pub owner: ClassName,
    pub type_name: TypeName,
    pub modifiers: ModifierSet,
    pub snippet: SourceCodeSnippet,
    pub span: Span,
    pub line_span: LineSpan,
}

/// A type declaration and everything declared inside it.
///
/// Children are owned exclusively; a nested class knows its parent only
/// through its [`ClassName`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub name: ClassName,
    pub kind: TypeKind,
    pub methods: Vec<MethodInfo>,
    pub fields: Vec<FieldInfo>,
    pub modifiers: ModifierSet,
    pub nested: Vec<ClassInfo>,
    pub header: SourceCodeSnippet,
    pub synthetic: bool,
    pub span: Span,
    pub line_span: LineSpan,
}

/// Borrowed view of any declaration record.
#[derive(Debug, Clone, Copy)]
pub enum Declaration<'a> {
    Class(&'a ClassInfo),
    Method(&'a MethodInfo),
    Field(&'a FieldInfo),
}

impl Declaration<'_> {
    pub fn span(&self) -> Span {
        match self {
            Declaration::Class(c) => c.span,
            Declaration::Method(m) => m.span,
            Declaration::Field(f) => f.span,
        }
    }

    /// Short display name: `Outer$Inner` for classes, the identifier otherwise.
    pub fn short_name(&self) -> String {
        match self {
            Declaration::Class(c) => c.name.short_name(),
            Declaration::Method(m) => m.name.name.clone(),
            Declaration::Field(f) => f.name.name.clone(),
        }
    }
}

impl ClassInfo {
    /// Methods, fields and nested classes merged back into source order.
    pub fn children(&self) -> Vec<Declaration<'_>> {
        let mut children: Vec<Declaration<'_>> = self
            .methods
            .iter()
            .map(Declaration::Method)
            .chain(self.fields.iter().map(Declaration::Field))
            .chain(self.nested.iter().map(Declaration::Class))
            .collect();
        children.sort_by_key(|d| d.span().start);
        children
    }

    /// This class followed by every nested class, depth first.
    pub fn walk(&self) -> Vec<&ClassInfo> {
        let mut out = vec![self];
        for nested in &self.nested {
            out.extend(nested.walk());
        }
        out
    }

    pub fn find_nested(&self, short_name: &str) -> Option<&ClassInfo> {
        self.walk()
            .into_iter()
            .find(|c| c.name.short_name() == short_name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodInfo> {
        self.methods.iter().find(|m| m.name.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name.name == name)
    }
}
