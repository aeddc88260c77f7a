use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between a nested type's parent short name and its own identifier.
///
/// `$` is legal in Java identifiers but reserved by convention for
/// compiler-generated names, so `Outer$Inner` never collides with a type
/// someone actually wrote.
pub const NESTED_DELIMITER: char = '$';

/// Identity of the file a declaration was read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileName(pub String);

impl FileName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Package (namespace) of a file. Empty for the unnamed package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageName(pub String);

impl PackageName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unnamed(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Qualified name of a class, interface, enum or record.
///
/// Top-level types are identified by file, package and identifier. Nested
/// types additionally carry their parent's name, which is what makes
/// [`ClassName::short_name`] render as `Outer$Inner`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassName {
    file: FileName,
    package: PackageName,
    simple_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent: Option<Box<ClassName>>,
}

impl ClassName {
    pub fn top_level(file: FileName, package: PackageName, simple_name: impl Into<String>) -> Self {
        Self {
            file,
            package,
            simple_name: simple_name.into(),
            parent: None,
        }
    }

    pub fn nested(parent: &ClassName, simple_name: impl Into<String>) -> Self {
        Self {
            file: parent.file.clone(),
            package: parent.package.clone(),
            simple_name: simple_name.into(),
            parent: Some(Box::new(parent.clone())),
        }
    }

    pub fn file(&self) -> &FileName {
        &self.file
    }

    pub fn package(&self) -> &PackageName {
        &self.package
    }

    /// The identifier as written in source.
    pub fn simple_name(&self) -> &str {
        &self.simple_name
    }

    pub fn parent(&self) -> Option<&ClassName> {
        self.parent.as_deref()
    }

    /// Display short name: the parent chain joined by [`NESTED_DELIMITER`].
    pub fn short_name(&self) -> String {
        match &self.parent {
            Some(parent) => format!(
                "{}{}{}",
                parent.short_name(),
                NESTED_DELIMITER,
                self.simple_name
            ),
            None => self.simple_name.clone(),
        }
    }

    pub fn is_nested(&self) -> bool {
        self.parent.is_some()
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.package.is_unnamed() {
            write!(f, "{}#{}", self.file, self.short_name())
        } else {
            write!(f, "{}/{}#{}", self.package, self.file, self.short_name())
        }
    }
}

/// Identity of a method. Two methods with equal `MethodName`s are the same
/// overload; parameter names play no part in it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodName {
    pub owner: ClassName,
    pub name: String,
    pub return_signature: String,
    pub parameter_signatures: Vec<String>,
}

impl MethodName {
    pub fn new(
        owner: ClassName,
        name: impl Into<String>,
        return_signature: impl Into<String>,
        parameter_signatures: Vec<String>,
    ) -> Self {
        Self {
            owner,
            name: name.into(),
            return_signature: return_signature.into(),
            parameter_signatures,
        }
    }

    /// `name(p1,p2)ret`, without the owner.
    pub fn signature(&self) -> String {
        format!(
            "{}({}){}",
            self.name,
            self.parameter_signatures.join(","),
            self.return_signature
        )
    }
}

impl fmt::Display for MethodName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.signature())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldName {
    pub owner: ClassName,
    pub name: String,
    pub type_signature: String,
}

impl FieldName {
    pub fn new(owner: ClassName, name: impl Into<String>, type_signature: impl Into<String>) -> Self {
        Self {
            owner,
            name: name.into(),
            type_signature: type_signature.into(),
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}:{}", self.owner, self.name, self.type_signature)
    }
}

/// Primitive type tags. `Void` doubles as the fallback for anything that
/// could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveType {
    Void,
    Int,
    Byte,
    Char,
    Long,
    Float,
    Short,
    Double,
    Bool,
}

impl PrimitiveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::Void => "void",
            PrimitiveType::Int => "int",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Char => "char",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Short => "short",
            PrimitiveType::Double => "double",
            PrimitiveType::Bool => "bool",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "void" => Some(PrimitiveType::Void),
            "int" => Some(PrimitiveType::Int),
            "byte" => Some(PrimitiveType::Byte),
            "char" => Some(PrimitiveType::Char),
            "long" => Some(PrimitiveType::Long),
            "float" => Some(PrimitiveType::Float),
            "short" => Some(PrimitiveType::Short),
            "double" => Some(PrimitiveType::Double),
            "boolean" | "bool" => Some(PrimitiveType::Bool),
            _ => None,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved type reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum TypeName {
    Primitive(PrimitiveType),
    Reference(String),
}

impl TypeName {
    pub fn void() -> Self {
        TypeName::Primitive(PrimitiveType::Void)
    }

    /// Primitive keywords map to their tag, an empty name to `void`, and
    /// anything else to a reference type.
    pub fn for_name(name: &str) -> Self {
        if name.is_empty() {
            return Self::void();
        }
        match PrimitiveType::from_keyword(name) {
            Some(primitive) => TypeName::Primitive(primitive),
            None => TypeName::Reference(name.to_string()),
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeName::Primitive(PrimitiveType::Void))
    }

    pub fn signature(&self) -> String {
        match self {
            TypeName::Primitive(primitive) => primitive.as_str().to_string(),
            TypeName::Reference(name) => name.clone(),
        }
    }
}

impl Default for TypeName {
    fn default() -> Self {
        Self::void()
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeName::Primitive(primitive) => write!(f, "{}", primitive),
            TypeName::Reference(name) => f.write_str(name),
        }
    }
}
