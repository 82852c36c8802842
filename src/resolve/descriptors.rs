//! Resolved declarations
//!
//! Descriptors are what the analysis produces: every name in them has been
//! resolved to a fully-qualified identity and every annotation argument has
//! been evaluated to a constant.

use std::fmt;
use std::path::PathBuf;

use indexmap::IndexMap;

use crate::psi::{ClassKind, KDoc, Visibility};
use crate::resolve::FqName;

/// Evaluated compile-time constant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstantValue {
    String(String),
    Int(i64),
    Boolean(bool),
    EnumEntry { enum_class: FqName, entry: String },
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => f.write_str(value),
            Self::Int(value) => write!(f, "{}", value),
            Self::Boolean(value) => write!(f, "{}", value),
            Self::EnumEntry { enum_class, entry } => write!(f, "{}.{}", enum_class, entry),
        }
    }
}

/// One annotation usage on a declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationDescriptor {
    /// `None` when the annotation type could not be resolved
    pub fq_name: Option<FqName>,
    pub written_name: String,
    /// Constant arguments by parameter name; non-constant ones are absent
    pub arguments: IndexMap<String, ConstantValue>,
}

impl AnnotationDescriptor {
    pub fn argument_value(&self, name: &str) -> Option<&ConstantValue> {
        self.arguments.get(name)
    }
}

/// Annotations of a declaration, queried by fully-qualified identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations(Vec<AnnotationDescriptor>);

impl Annotations {
    pub fn new(annotations: Vec<AnnotationDescriptor>) -> Self {
        Self(annotations)
    }

    pub fn has_annotation(&self, fq_name: &FqName) -> bool {
        self.find_annotation(fq_name).is_some()
    }

    pub fn find_annotation(&self, fq_name: &FqName) -> Option<&AnnotationDescriptor> {
        self.0.iter().find(|a| a.fq_name.as_ref() == Some(fq_name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnnotationDescriptor> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Where a descriptor was declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceElement {
    pub path: PathBuf,
    pub line: usize,
    /// KDoc attached to the declaration's own source node
    pub doc_comment: Option<KDoc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallableKind {
    Declaration,
    /// Inherited member seen through a subclass scope
    FakeOverride,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub name: String,
    pub visibility: Visibility,
    pub kind: CallableKind,
    pub is_const: bool,
    pub annotations: Annotations,
    /// `None` for fake overrides
    pub source: Option<SourceElement>,
    /// Class that actually declares the property
    pub declared_in: FqName,
}

impl PropertyDescriptor {
    pub fn doc_comment(&self) -> Option<&KDoc> {
        self.source.as_ref()?.doc_comment.as_ref()
    }

    pub(crate) fn as_fake_override(&self) -> Self {
        Self {
            kind: CallableKind::FakeOverride,
            source: None,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberDescriptor {
    Property(PropertyDescriptor),
    /// Nested class, object or companion
    Classifier(FqName),
}

impl MemberDescriptor {
    pub fn name(&self) -> &str {
        match self {
            Self::Property(p) => &p.name,
            Self::Classifier(fq) => fq.short_name(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKindFilter {
    Variables,
    Classifiers,
    All,
}

impl DescriptorKindFilter {
    pub fn accepts(&self, member: &MemberDescriptor) -> bool {
        match (self, member) {
            (Self::All, _) => true,
            (Self::Variables, MemberDescriptor::Property(_)) => true,
            (Self::Classifiers, MemberDescriptor::Classifier(_)) => true,
            _ => false,
        }
    }
}

/// Members visible in a class, declared ones first, then inherited ones
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberScope {
    members: Vec<MemberDescriptor>,
}

impl MemberScope {
    pub fn new(members: Vec<MemberDescriptor>) -> Self {
        Self { members }
    }

    pub fn descriptors_filtered(
        &self,
        filter: DescriptorKindFilter,
    ) -> impl Iterator<Item = &MemberDescriptor> {
        self.members.iter().filter(move |m| filter.accepts(m))
    }

    pub fn properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.members.iter().filter_map(|m| match m {
            MemberDescriptor::Property(p) => Some(p),
            MemberDescriptor::Classifier(_) => None,
        })
    }
}

/// A resolved class-like declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDescriptor {
    pub fq_name: FqName,
    pub kind: ClassKind,
    pub visibility: Visibility,
    pub annotations: Annotations,
    pub supertypes: Vec<FqName>,
    pub source: SourceElement,
    pub member_scope: MemberScope,
}

impl ClassDescriptor {
    pub fn doc_comment(&self) -> Option<&KDoc> {
        self.source.doc_comment.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotation(fq: &str, args: &[(&str, ConstantValue)]) -> AnnotationDescriptor {
        AnnotationDescriptor {
            fq_name: Some(FqName::from(fq)),
            written_name: FqName::from(fq).short_name().to_string(),
            arguments: args
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }

    #[test]
    fn test_annotation_lookup_by_identity() {
        let annotations = Annotations::new(vec![
            annotation("kotlin.Deprecated", &[]),
            annotation(
                "org.apache.maven.plugins.annotations.Mojo",
                &[("name", ConstantValue::String("compile".to_string()))],
            ),
        ]);
        let mojo = FqName::from("org.apache.maven.plugins.annotations.Mojo");
        assert!(annotations.has_annotation(&mojo));
        assert!(!annotations.has_annotation(&FqName::from("other.Mojo")));
        let found = annotations.find_annotation(&mojo).unwrap();
        assert_eq!(found.argument_value("name").unwrap().to_string(), "compile");
        assert!(found.argument_value("defaultPhase").is_none());
    }

    #[test]
    fn test_constant_display() {
        assert_eq!(ConstantValue::String("x".into()).to_string(), "x");
        assert_eq!(ConstantValue::Int(7).to_string(), "7");
        assert_eq!(ConstantValue::Boolean(true).to_string(), "true");
        let phase = ConstantValue::EnumEntry {
            enum_class: FqName::from("org.apache.maven.plugins.annotations.LifecyclePhase"),
            entry: "COMPILE".into(),
        };
        assert_eq!(
            phase.to_string(),
            "org.apache.maven.plugins.annotations.LifecyclePhase.COMPILE"
        );
    }

    #[test]
    fn test_member_scope_filter() {
        let property = PropertyDescriptor {
            name: "classpath".into(),
            visibility: Visibility::Public,
            kind: CallableKind::Declaration,
            is_const: false,
            annotations: Annotations::default(),
            source: None,
            declared_in: FqName::from("root.MyMojo"),
        };
        let scope = MemberScope::new(vec![
            MemberDescriptor::Classifier(FqName::from("root.MyMojo.Companion")),
            MemberDescriptor::Property(property.clone()),
        ]);
        let variables: Vec<_> = scope
            .descriptors_filtered(DescriptorKindFilter::Variables)
            .map(MemberDescriptor::name)
            .collect();
        assert_eq!(variables, vec!["classpath"]);
        assert_eq!(scope.descriptors_filtered(DescriptorKindFilter::All).count(), 2);
        assert_eq!(scope.properties().next(), Some(&property));
    }
}
