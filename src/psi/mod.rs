//! Declaration-level view of parsed Kotlin files
//!
//! The tree-sitter syntax tree is projected into a small owned model holding
//! only what top-level analysis needs: packages, imports, class-like
//! declarations with their annotations, KDoc and properties. Function bodies
//! are never visited.

mod builder;
mod expression;

use std::path::PathBuf;

pub use builder::{build_file, SyntaxError};
pub use expression::{parse_string_literal, KtExpression};

use crate::kdoc::process_doc;

/// A parsed Kotlin source file
#[derive(Debug, Clone, Default)]
pub struct KtFile {
    pub path: PathBuf,
    /// Dotted package name, empty for the default package
    pub package: String,
    pub imports: Vec<KtImport>,
    pub classes: Vec<KtClass>,
    /// Top-level properties
    pub properties: Vec<KtProperty>,
    pub syntax_errors: Vec<SyntaxError>,
}

/// `import a.b.C`, `import a.b.C as D` or `import a.b.*`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KtImport {
    pub path: String,
    pub alias: Option<String>,
    pub all_under: bool,
    pub line: usize,
}

impl KtImport {
    /// Name the import introduces into the file scope
    pub fn imported_name(&self) -> Option<&str> {
        if self.all_under {
            return None;
        }
        self.alias
            .as_deref()
            .or_else(|| self.path.rsplit('.').next())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Object,
    CompanionObject,
    EnumClass,
    AnnotationClass,
}

impl ClassKind {
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object | Self::CompanionObject)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    #[default]
    Public,
    Internal,
    Protected,
    Private,
}

impl Visibility {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "public" => Some(Self::Public),
            "internal" => Some(Self::Internal),
            "protected" => Some(Self::Protected),
            "private" => Some(Self::Private),
            _ => None,
        }
    }
}

/// A `/** ... */` comment attached to a declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KDoc {
    pub text: String,
    pub line: usize,
}

impl KDoc {
    /// Single-line description text
    pub fn normalized(&self) -> String {
        process_doc(&self.text)
    }
}

/// Class, interface, object, enum or annotation class declaration
#[derive(Debug, Clone, PartialEq)]
pub struct KtClass {
    pub name: String,
    pub kind: ClassKind,
    pub visibility: Visibility,
    pub annotations: Vec<KtAnnotationEntry>,
    pub doc_comment: Option<KDoc>,
    /// Written supertype names without type arguments
    pub supertypes: Vec<String>,
    /// Primary-constructor properties first, then body properties
    pub properties: Vec<KtProperty>,
    pub nested: Vec<KtClass>,
    pub enum_entries: Vec<String>,
    pub line: usize,
}

impl KtClass {
    pub fn property(&self, name: &str) -> Option<&KtProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn companion(&self) -> Option<&KtClass> {
        self.nested
            .iter()
            .find(|c| c.kind == ClassKind::CompanionObject)
    }
}

/// `val`/`var` declaration, including `val`/`var` constructor parameters
#[derive(Debug, Clone, PartialEq)]
pub struct KtProperty {
    pub name: String,
    pub visibility: Visibility,
    pub is_const: bool,
    pub from_constructor: bool,
    pub annotations: Vec<KtAnnotationEntry>,
    pub doc_comment: Option<KDoc>,
    pub initializer: Option<KtExpression>,
    pub line: usize,
}

/// `@Name(args)` usage
#[derive(Debug, Clone, PartialEq)]
pub struct KtAnnotationEntry {
    /// Type name as written, e.g. `Mojo` or `annotations.Mojo`
    pub type_name: String,
    pub arguments: Vec<KtValueArgument>,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KtValueArgument {
    pub name: Option<String>,
    pub expression: KtExpression,
}
