//! Goal descriptor extraction
//!
//! Analyzes the project's Kotlin sources against its dependency artifacts and
//! turns every class annotated with [`MOJO_ANNOTATION`] into a
//! [`MojoDescriptor`].

use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::AnalysisConfig;
use crate::descriptor::{MojoDescriptor, Parameter};
use crate::diagnostics::{MessageCollector, PrintingMessageCollector};
use crate::environment::{ContentRoot, KotlinCoreEnvironment};
use crate::error::{ExtractorError, Result};
use crate::lang::KotlinLanguage;
use crate::request::PluginToolsRequest;
use crate::resolve::{BindingContext, DescriptorKindFilter, FqName, MemberDescriptor};

/// Fully-qualified name of the goal marker annotation
pub const MOJO_ANNOTATION: &str = "org.apache.maven.plugins.annotations.Mojo";

/// Turns a plugin project into its goal descriptors
pub trait MojoDescriptorExtractor {
    fn execute(&self, request: &dyn PluginToolsRequest) -> Result<Vec<MojoDescriptor>>;
}

/// Extractor for plugins written in Kotlin
#[derive(Debug, Clone, Default)]
pub struct KotlinMojoDescriptorExtractor {
    config: AnalysisConfig,
}

impl KotlinMojoDescriptorExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze the source roots and extract descriptors, printing
    /// diagnostics to stderr
    pub fn analyze(&self, classpath: &[PathBuf], source_roots: &[PathBuf]) -> Result<Vec<MojoDescriptor>> {
        let mut collector =
            PrintingMessageCollector::stderr(self.config.message_renderer, self.config.verbose);
        self.analyze_with_collector(classpath, source_roots, &mut collector)
    }

    /// Source roots are expected to exist; missing ones contribute no files
    pub fn analyze_with_collector(
        &self,
        classpath: &[PathBuf],
        source_roots: &[PathBuf],
        collector: &mut dyn MessageCollector,
    ) -> Result<Vec<MojoDescriptor>> {
        let roots = classpath
            .iter()
            .cloned()
            .map(ContentRoot::JvmClasspathRoot)
            .chain(source_roots.iter().cloned().map(ContentRoot::KotlinSourceRoot))
            .collect();

        let environment =
            KotlinCoreEnvironment::create_for_production(self.config.clone(), roots, collector)?;
        let context = environment.analyze(collector);
        extract_descriptors(&context)
    }
}

impl MojoDescriptorExtractor for KotlinMojoDescriptorExtractor {
    fn execute(&self, request: &dyn PluginToolsRequest) -> Result<Vec<MojoDescriptor>> {
        let project = request.project();

        let classpath: Vec<PathBuf> = project
            .dependency_artifacts
            .iter()
            .filter_map(|artifact| {
                if artifact.file.is_none() {
                    debug!(artifact = %artifact.coordinates(), "artifact has no file");
                }
                artifact.file.clone()
            })
            .collect();

        let source_roots: Vec<PathBuf> = project
            .compile_source_roots
            .iter()
            .map(PathBuf::from)
            .filter(|root| {
                let exists = root.exists();
                if !exists {
                    debug!(root = %root.display(), "skipping missing source root");
                }
                exists
            })
            .collect();

        let descriptors = self.analyze(&classpath, &source_roots)?;
        info!(goals = descriptors.len(), "extracted mojo descriptors");
        Ok(descriptors)
    }
}

/// Build a descriptor for every `@Mojo` class of the binding context, in
/// analysis order.
///
/// A `@Mojo` annotation without a constant `name` argument fails the whole
/// extraction.
pub fn extract_descriptors(context: &BindingContext) -> Result<Vec<MojoDescriptor>> {
    let mojo = FqName::from(MOJO_ANNOTATION);
    let mut descriptors = Vec::new();

    for fq_name in context.keys() {
        let Some(class) = context.get(fq_name) else {
            continue;
        };
        let Some(annotation) = class.annotations.find_annotation(&mojo) else {
            continue;
        };

        let goal = annotation
            .argument_value("name")
            .map(|value| value.to_string())
            .ok_or_else(|| ExtractorError::MissingGoalName {
                class: fq_name.to_string(),
            })?;

        let parameters = class
            .member_scope
            .descriptors_filtered(DescriptorKindFilter::Variables)
            .filter_map(|member| match member {
                MemberDescriptor::Property(property) => Some(Parameter {
                    name: property.name.clone(),
                    description: property.doc_comment().map(|doc| doc.normalized()),
                }),
                MemberDescriptor::Classifier(_) => None,
            })
            .collect();

        debug!(class = %fq_name, goal = %goal, "found mojo");
        descriptors.push(MojoDescriptor {
            language: KotlinLanguage::NAME.to_string(),
            implementation: fq_name.to_string(),
            goal,
            description: class.doc_comment().map(|doc| doc.normalized()),
            parameters,
        });
    }

    Ok(descriptors)
}
