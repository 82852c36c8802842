//! Top-down declaration analysis
//!
//! Walks every class of the source set in declaration order, resolves its
//! annotations and supertypes and computes its member scope. Problems are
//! reported to the message collector; the analysis itself never fails.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::classpath::ClassPathIndex;
use crate::config::AnalysisConfig;
use crate::diagnostics::{Diagnostic, MessageCollector};
use crate::psi::{ClassKind, KtAnnotationEntry, KtClass, KtFile, Visibility};
use crate::resolve::binding::BindingContext;
use crate::resolve::descriptors::{
    AnnotationDescriptor, Annotations, CallableKind, ClassDescriptor, ConstantValue,
    MemberDescriptor, MemberScope, PropertyDescriptor, SourceElement,
};
use crate::resolve::scope::{DeclarationIndex, LexicalScope, Resolved};
use crate::resolve::FqName;

/// Parameter name a lone positional argument binds to on binary annotations
const DEFAULT_ANNOTATION_PARAMETER: &str = "value";

/// Resolves every declaration of a source set against a classpath
pub struct TopDownAnalyzer<'c> {
    config: &'c AnalysisConfig,
    classpath: &'c ClassPathIndex,
}

impl<'c> TopDownAnalyzer<'c> {
    pub fn new(config: &'c AnalysisConfig, classpath: &'c ClassPathIndex) -> Self {
        Self { config, classpath }
    }

    pub fn analyze_declarations(
        &self,
        files: &[KtFile],
        collector: &mut dyn MessageCollector,
    ) -> BindingContext {
        let start = Instant::now();
        debug!(
            module = %self.config.module_name,
            jvm_target = self.config.jvm_target.description(),
            language_version = %self.config.language_version,
            files = files.len(),
            "analyzing declarations"
        );

        for file in files {
            self.check_file(file, collector);
        }

        let index = DeclarationIndex::build(files, self.classpath, collector);
        let mut session = Session {
            index,
            visible: HashMap::new(),
            in_progress: HashSet::new(),
        };

        let mut context = BindingContext::new();
        let class_names: Vec<FqName> = session.index.classes.keys().cloned().collect();
        for fq_name in class_names {
            let Some(descriptor) = session.class_descriptor(&fq_name, collector) else {
                continue;
            };
            if !context.record(descriptor) {
                debug!(class = %fq_name, "class already recorded");
            }
        }

        let elapsed = start.elapsed();
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        if self.config.report_perf {
            info!(
                files = files.len(),
                classes = context.len(),
                elapsed_ms,
                "analysis finished"
            );
            collector.report(Diagnostic::logging(format!(
                "PERF: ANALYZE: {} files, {} classes in {} ms",
                files.len(),
                context.len(),
                elapsed_ms
            )));
        } else {
            debug!(classes = context.len(), "analysis finished");
        }

        context
    }

    fn check_file(&self, file: &KtFile, collector: &mut dyn MessageCollector) {
        for error in &file.syntax_errors {
            collector.report(
                Diagnostic::error(error.message.clone()).at(&file.path, error.line, error.column),
            );
        }

        let reserved = file.package == "kotlin" || file.package.starts_with("kotlin.");
        if reserved && !self.config.allow_kotlin_package {
            collector.report(
                Diagnostic::error(
                    "Only the Kotlin standard library is allowed to use the 'kotlin' package",
                )
                .at(&file.path, 1, 1),
            );
        }
    }
}

struct Session<'a> {
    index: DeclarationIndex<'a>,
    /// Property members per class, declared and inherited
    visible: HashMap<FqName, Vec<PropertyDescriptor>>,
    in_progress: HashSet<FqName>,
}

impl<'a> Session<'a> {
    fn class_descriptor(
        &mut self,
        fq_name: &FqName,
        collector: &mut dyn MessageCollector,
    ) -> Option<ClassDescriptor> {
        let class_ref = self.index.classes.get(fq_name)?;
        let (file, class) = (class_ref.file, class_ref.class);
        let outer = class_ref.outer.clone();
        let scope = LexicalScope {
            file,
            class_chain: &outer,
        };

        let annotations = self.resolve_annotations(&class.annotations, &scope, collector);
        let supertypes = self.resolve_supertypes(class, &scope, collector);
        let properties = self.visible_properties(fq_name, collector);

        let mut members: Vec<MemberDescriptor> =
            properties.into_iter().map(MemberDescriptor::Property).collect();
        members.extend(
            class
                .nested
                .iter()
                .filter(|n| !n.name.is_empty())
                .map(|n| MemberDescriptor::Classifier(fq_name.child(&n.name))),
        );

        Some(ClassDescriptor {
            fq_name: fq_name.clone(),
            kind: class.kind,
            visibility: class.visibility,
            annotations,
            supertypes,
            source: SourceElement {
                path: self.index.files[file].path.clone(),
                line: class.line,
                doc_comment: class.doc_comment.clone(),
            },
            member_scope: MemberScope::new(members),
        })
    }

    fn resolve_supertypes(
        &self,
        class: &KtClass,
        scope: &LexicalScope,
        collector: &mut dyn MessageCollector,
    ) -> Vec<FqName> {
        let path = &self.index.files[scope.file].path;
        class
            .supertypes
            .iter()
            .filter_map(|written| match self.index.resolve_type(written, scope) {
                Resolved::Found(fq) => Some(fq),
                Resolved::Ambiguous(candidates) => {
                    collector.report(
                        Diagnostic::warning(format!("Ambiguous supertype: {}", written))
                            .at(path, class.line, 1),
                    );
                    candidates.into_iter().next()
                }
                Resolved::Unresolved => {
                    collector.report(
                        Diagnostic::error(format!("Unresolved reference: {}", written))
                            .at(path, class.line, 1),
                    );
                    None
                }
            })
            .collect()
    }

    fn resolve_annotations(
        &self,
        entries: &[KtAnnotationEntry],
        scope: &LexicalScope,
        collector: &mut dyn MessageCollector,
    ) -> Annotations {
        let path = &self.index.files[scope.file].path;
        let mut annotations = Vec::with_capacity(entries.len());

        for entry in entries {
            let fq_name = match self.index.resolve_type(&entry.type_name, scope) {
                Resolved::Found(fq) => Some(fq),
                Resolved::Ambiguous(candidates) => {
                    collector.report(
                        Diagnostic::warning(format!(
                            "Ambiguous annotation reference: {}",
                            entry.type_name
                        ))
                        .at(path, entry.line, entry.column),
                    );
                    candidates.into_iter().next()
                }
                Resolved::Unresolved => {
                    collector.report(
                        Diagnostic::error(format!("Unresolved reference: {}", entry.type_name))
                            .at(path, entry.line, entry.column),
                    );
                    None
                }
            };

            let arguments = self.evaluate_arguments(entry, fq_name.as_ref(), scope);
            annotations.push(AnnotationDescriptor {
                fq_name,
                written_name: entry.type_name.clone(),
                arguments,
            });
        }

        Annotations::new(annotations)
    }

    fn evaluate_arguments(
        &self,
        entry: &KtAnnotationEntry,
        annotation: Option<&FqName>,
        scope: &LexicalScope,
    ) -> IndexMap<String, ConstantValue> {
        let source_parameters: Option<Vec<&str>> = annotation
            .and_then(|fq| self.index.classes.get(fq))
            .filter(|c| c.class.kind == ClassKind::AnnotationClass)
            .map(|c| c.class.properties.iter().map(|p| p.name.as_str()).collect());

        let mut arguments = IndexMap::new();
        for (position, argument) in entry.arguments.iter().enumerate() {
            let name = match (&argument.name, &source_parameters) {
                (Some(name), _) => name.as_str(),
                (None, Some(parameters)) => match parameters.get(position) {
                    Some(name) => *name,
                    None => continue,
                },
                (None, None) if position == 0 => DEFAULT_ANNOTATION_PARAMETER,
                (None, None) => continue,
            };

            match self.index.evaluate(&argument.expression, scope) {
                Some(value) => {
                    arguments.entry(name.to_string()).or_insert(value);
                }
                None => debug!(
                    annotation = %entry.type_name,
                    argument = name,
                    "annotation argument is not a compile-time constant"
                ),
            }
        }
        arguments
    }

    /// Declared properties followed by inherited ones. Memoized per class.
    fn visible_properties(
        &mut self,
        fq_name: &FqName,
        collector: &mut dyn MessageCollector,
    ) -> Vec<PropertyDescriptor> {
        if let Some(properties) = self.visible.get(fq_name) {
            return properties.clone();
        }
        let Some(class_ref) = self.index.classes.get(fq_name) else {
            return Vec::new();
        };
        let (file, class) = (class_ref.file, class_ref.class);
        let mut chain = class_ref.outer.clone();
        let outer_scope_len = chain.len();
        chain.push(fq_name.clone());

        if !self.in_progress.insert(fq_name.clone()) {
            collector.report(
                Diagnostic::error(format!(
                    "There's a cycle in the inheritance hierarchy for this type: {}",
                    fq_name
                ))
                .at(&self.index.files[file].path, class.line, 1),
            );
            return Vec::new();
        }

        let member_scope = LexicalScope {
            file,
            class_chain: &chain,
        };
        let mut properties: Vec<PropertyDescriptor> = class
            .properties
            .iter()
            .map(|property| PropertyDescriptor {
                name: property.name.clone(),
                visibility: property.visibility,
                kind: CallableKind::Declaration,
                is_const: property.is_const,
                annotations: self.resolve_annotations(&property.annotations, &member_scope, collector),
                source: Some(SourceElement {
                    path: self.index.files[file].path.clone(),
                    line: property.line,
                    doc_comment: property.doc_comment.clone(),
                }),
                declared_in: fq_name.clone(),
            })
            .collect();

        let supertype_scope = LexicalScope {
            file,
            class_chain: &chain[..outer_scope_len],
        };
        let source_supertypes: Vec<FqName> = class
            .supertypes
            .iter()
            .filter_map(|written| self.index.resolve_type(written, &supertype_scope).first())
            .filter(|fq| self.index.classes.contains_key(fq))
            .collect();

        for supertype in source_supertypes {
            for inherited in self.visible_properties(&supertype, collector) {
                let overridden = properties.iter().any(|p| p.name == inherited.name);
                if inherited.visibility == Visibility::Private || overridden {
                    continue;
                }
                properties.push(inherited.as_fake_override());
            }
        }

        self.in_progress.remove(fq_name);
        self.visible.insert(fq_name.clone(), properties.clone());
        properties
    }
}
