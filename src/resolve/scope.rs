//! Declaration index and type-name resolution
//!
//! Resolution order for a written name follows Kotlin's scope tower:
//! enclosing classes, explicit imports, the file's own package, star
//! imports, default imports. A qualified name that matches nothing is taken
//! as already fully qualified.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::classpath::ClassPathIndex;
use crate::diagnostics::{Diagnostic, MessageCollector};
use crate::psi::{KtClass, KtFile, KtProperty};
use crate::resolve::FqName;

/// Packages imported into every Kotlin file
pub const DEFAULT_IMPORTS: &[&str] = &[
    "kotlin",
    "kotlin.annotation",
    "kotlin.collections",
    "kotlin.comparisons",
    "kotlin.io",
    "kotlin.ranges",
    "kotlin.sequences",
    "kotlin.text",
    "kotlin.jvm",
    "java.lang",
];

/// Classes the compiler knows without any classpath entry
const BUILTIN_CLASSES: &[&str] = &[
    "kotlin.Any",
    "kotlin.Annotation",
    "kotlin.Array",
    "kotlin.Boolean",
    "kotlin.Byte",
    "kotlin.Char",
    "kotlin.CharSequence",
    "kotlin.Comparable",
    "kotlin.Deprecated",
    "kotlin.Double",
    "kotlin.Enum",
    "kotlin.Float",
    "kotlin.Int",
    "kotlin.Long",
    "kotlin.Nothing",
    "kotlin.Number",
    "kotlin.Short",
    "kotlin.String",
    "kotlin.Suppress",
    "kotlin.Throwable",
    "kotlin.Unit",
    "kotlin.collections.Collection",
    "kotlin.collections.Iterable",
    "kotlin.collections.List",
    "kotlin.collections.Map",
    "kotlin.collections.MutableList",
    "kotlin.collections.MutableMap",
    "kotlin.collections.MutableSet",
    "kotlin.collections.Set",
    "kotlin.jvm.JvmField",
    "kotlin.jvm.JvmOverloads",
    "kotlin.jvm.JvmStatic",
    "kotlin.jvm.Transient",
    "kotlin.jvm.Volatile",
];

/// Names a file brings into scope
#[derive(Debug, Clone, Default)]
pub(crate) struct FileScope {
    pub package: FqName,
    pub explicit: HashMap<String, FqName>,
    pub star: Vec<FqName>,
}

impl FileScope {
    pub fn new(file: &KtFile) -> Self {
        let mut scope = Self {
            package: FqName::new(file.package.clone()),
            ..Default::default()
        };
        for import in &file.imports {
            if import.all_under {
                scope.star.push(FqName::new(import.path.clone()));
            } else if let Some(name) = import.imported_name() {
                scope
                    .explicit
                    .entry(name.to_string())
                    .or_insert_with(|| FqName::new(import.path.clone()));
            }
        }
        scope
    }
}

/// Position of a lookup: a file and the classes enclosing it, outermost first
#[derive(Debug, Clone, Copy)]
pub(crate) struct LexicalScope<'s> {
    pub file: usize,
    pub class_chain: &'s [FqName],
}

/// A class declaration found in the source set
#[derive(Debug)]
pub(crate) struct ClassRef<'a> {
    pub file: usize,
    pub class: &'a KtClass,
    /// Enclosing classes, outermost first
    pub outer: Vec<FqName>,
}

#[derive(Debug)]
pub(crate) struct PropertyRef<'a> {
    pub file: usize,
    pub property: &'a KtProperty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Resolved {
    Found(FqName),
    Ambiguous(Vec<FqName>),
    Unresolved,
}

impl Resolved {
    /// Resolution result, taking the first candidate of an ambiguity
    pub fn first(self) -> Option<FqName> {
        match self {
            Self::Found(fq) => Some(fq),
            Self::Ambiguous(candidates) => candidates.into_iter().next(),
            Self::Unresolved => None,
        }
    }
}

/// Every declaration of the source set, plus the classpath, queryable by name
pub(crate) struct DeclarationIndex<'a> {
    pub files: &'a [KtFile],
    pub scopes: Vec<FileScope>,
    pub classes: IndexMap<FqName, ClassRef<'a>>,
    pub top_level_properties: HashMap<FqName, PropertyRef<'a>>,
    pub classpath: &'a ClassPathIndex,
}

impl<'a> DeclarationIndex<'a> {
    /// Index all files. Redeclared classes are reported and the first
    /// declaration is kept.
    pub fn build(
        files: &'a [KtFile],
        classpath: &'a ClassPathIndex,
        collector: &mut dyn MessageCollector,
    ) -> Self {
        let mut index = Self {
            files,
            scopes: files.iter().map(FileScope::new).collect(),
            classes: IndexMap::new(),
            top_level_properties: HashMap::new(),
            classpath,
        };

        for (file_idx, file) in files.iter().enumerate() {
            let package = index.scopes[file_idx].package.clone();
            for class in &file.classes {
                index.register_class(file_idx, class, &package, Vec::new(), collector);
            }
            for property in &file.properties {
                index
                    .top_level_properties
                    .entry(package.child(&property.name))
                    .or_insert(PropertyRef {
                        file: file_idx,
                        property,
                    });
            }
        }

        index
    }

    fn register_class(
        &mut self,
        file_idx: usize,
        class: &'a KtClass,
        owner: &FqName,
        outer: Vec<FqName>,
        collector: &mut dyn MessageCollector,
    ) {
        if class.name.is_empty() {
            return;
        }
        let fq_name = owner.child(&class.name);
        if self.classes.contains_key(&fq_name) {
            collector.report(
                Diagnostic::error(format!("Redeclaration: {}", fq_name)).at(
                    &self.files[file_idx].path,
                    class.line,
                    1,
                ),
            );
            return;
        }

        let mut inner_outer = outer.clone();
        inner_outer.push(fq_name.clone());
        self.classes.insert(
            fq_name.clone(),
            ClassRef {
                file: file_idx,
                class,
                outer,
            },
        );
        for nested in &class.nested {
            self.register_class(file_idx, nested, &fq_name, inner_outer.clone(), collector);
        }
    }

    /// Known either as a source declaration or a classpath class
    pub fn is_known_class(&self, fq_name: &FqName) -> bool {
        self.classes.contains_key(fq_name) || self.classpath.contains_class(fq_name)
    }

    fn is_default_import_class(&self, fq_name: &FqName) -> bool {
        self.is_known_class(fq_name) || BUILTIN_CLASSES.contains(&fq_name.as_str())
    }

    pub fn resolve_type(&self, written: &str, scope: &LexicalScope) -> Resolved {
        let segments: Vec<&str> = written.split('.').filter(|s| !s.is_empty()).collect();
        let Some((first, rest)) = segments.split_first() else {
            return Resolved::Unresolved;
        };
        let rest = rest.iter().copied();
        let file_scope = &self.scopes[scope.file];

        for owner in scope.class_chain.iter().rev() {
            let candidate = owner.child(first).descendant(rest.clone());
            if self.classes.contains_key(&candidate) {
                return Resolved::Found(candidate);
            }
        }

        if let Some(imported) = file_scope.explicit.get(*first) {
            return Resolved::Found(imported.descendant(rest));
        }

        let same_package = file_scope.package.child(first).descendant(rest.clone());
        if self.is_known_class(&same_package) {
            return Resolved::Found(same_package);
        }

        let mut star_matches: Vec<FqName> = Vec::new();
        for package in &file_scope.star {
            let candidate = package.child(first).descendant(rest.clone());
            if self.is_known_class(&candidate) && !star_matches.contains(&candidate) {
                star_matches.push(candidate);
            }
        }
        match star_matches.len() {
            0 => {}
            1 => return Resolved::Found(star_matches.remove(0)),
            _ => return Resolved::Ambiguous(star_matches),
        }

        for package in DEFAULT_IMPORTS {
            let candidate = FqName::from(*package).child(first).descendant(rest.clone());
            if self.is_default_import_class(&candidate) {
                return Resolved::Found(candidate);
            }
        }

        if segments.len() > 1 {
            return Resolved::Found(FqName::new(segments.join(".")));
        }

        Resolved::Unresolved
    }
}
