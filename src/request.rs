//! Extraction request: the Maven project being described
//!
//! Only the two project facts the extractor needs are modelled: dependency
//! artifacts (for the classpath) and compile source roots.

use std::path::PathBuf;

/// A resolved dependency of the plugin project
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Artifact {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub scope: String,
    /// Packaging type, e.g. `jar`
    pub kind: String,
    /// Local file; `None` when the artifact was never resolved
    pub file: Option<PathBuf>,
}

impl Artifact {
    pub fn new(group_id: &str, artifact_id: &str, version: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
            scope: "compile".to_string(),
            kind: "jar".to_string(),
            file: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// `groupId:artifactId:version`
    pub fn coordinates(&self) -> String {
        format!("{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MavenProject {
    pub dependency_artifacts: Vec<Artifact>,
    /// Source roots as configured, which may not exist on disk
    pub compile_source_roots: Vec<String>,
}

/// What an extractor is asked to describe
pub trait PluginToolsRequest {
    fn project(&self) -> &MavenProject;
}

#[derive(Debug, Clone, Default)]
pub struct DefaultPluginToolsRequest {
    project: MavenProject,
}

impl DefaultPluginToolsRequest {
    pub fn new(project: MavenProject) -> Self {
        Self { project }
    }
}

impl PluginToolsRequest for DefaultPluginToolsRequest {
    fn project(&self) -> &MavenProject {
        &self.project
    }
}
