//! Semantic analysis of the parsed source set
//!
//! Produces a [`BindingContext`] mapping fully-qualified class names to
//! descriptors with resolved annotations and member scopes.

mod analyzer;
mod binding;
mod constant;
pub mod descriptors;
mod name;
mod scope;

pub use analyzer::TopDownAnalyzer;
pub use binding::BindingContext;
pub use descriptors::{
    AnnotationDescriptor, Annotations, ClassDescriptor, ConstantValue, DescriptorKindFilter,
    MemberDescriptor, PropertyDescriptor,
};
pub use name::FqName;
pub use scope::DEFAULT_IMPORTS;
