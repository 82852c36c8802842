//! End-to-end extraction tests

mod common;

use common::{extract_with_diagnostics, fixtures_dir, TestProject};
use mojo_extractor::{
    Artifact, DefaultPluginToolsRequest, ExtractorError, KotlinMojoDescriptorExtractor,
    MavenProject, MessageCollector, MojoDescriptorExtractor, Severity,
};

#[test]
fn test_smoke_fixture() {
    let root = fixtures_dir().join("root");
    let project = MavenProject {
        dependency_artifacts: Vec::new(),
        compile_source_roots: vec![root.display().to_string()],
    };
    let descriptors = KotlinMojoDescriptorExtractor::new()
        .execute(&DefaultPluginToolsRequest::new(project))
        .unwrap();

    assert_eq!(descriptors.len(), 1);
    let mojo = &descriptors[0];
    assert_eq!(mojo.goal, "myMojo");
    assert_eq!(mojo.description.as_deref(), Some("My mojo"));
    assert_eq!(mojo.implementation, "root.MyMojo");
    assert_eq!(mojo.language, "Kotlin");

    let names: Vec<&str> = mojo.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["classpath"]);
    let descriptions: Vec<Option<&str>> = mojo
        .parameters
        .iter()
        .map(|p| p.description.as_deref())
        .collect();
    assert_eq!(descriptions, vec![Some("My param")]);
}

#[test]
fn test_fixture_has_no_errors() {
    let (result, collector) = extract_with_diagnostics(&[], &[fixtures_dir().join("root")]);
    assert_eq!(result.unwrap().len(), 1);
    assert!(!collector.has_errors(), "{:?}", collector.diagnostics());
}

#[test]
fn test_missing_roots_and_fileless_artifacts_are_skipped() {
    let project = TestProject::new().with_file(
        "src/Goal.kt",
        r#"
package demo

import org.apache.maven.plugins.annotations.Mojo

@Mojo(name = "demo")
class DemoMojo
"#,
    );
    let jar = project.join("missing-dependency.jar");
    let maven = MavenProject {
        dependency_artifacts: vec![
            Artifact::new("org.example", "unresolved", "1.0"),
            Artifact::new("org.example", "gone", "1.0").with_file(jar),
        ],
        compile_source_roots: vec![
            project.join("does/not/exist").display().to_string(),
            project.join("src").display().to_string(),
        ],
    };

    let descriptors = KotlinMojoDescriptorExtractor::new()
        .execute(&DefaultPluginToolsRequest::new(maven))
        .unwrap();
    assert_eq!(descriptors.len(), 1);
    assert_eq!(descriptors[0].goal, "demo");
    assert!(descriptors[0].parameters.is_empty());
}

#[test]
fn test_unannotated_classes_produce_nothing() {
    let project = TestProject::new().with_file(
        "Plain.kt",
        "package plain\n\n/** Not a goal */\nclass Plain {\n    var value: String = \"\"\n}\n",
    );
    let (result, _) = extract_with_diagnostics(&[], &[project.path().to_path_buf()]);
    assert!(result.unwrap().is_empty());
}

#[test]
fn test_goals_in_analysis_order() {
    let project = TestProject::new()
        .with_file(
            "b/Second.kt",
            "package b\n\nimport org.apache.maven.plugins.annotations.Mojo\n\n@Mojo(name = \"second\")\nclass Second\n",
        )
        .with_file(
            "a/First.kt",
            r#"
package a

import org.apache.maven.plugins.annotations.Mojo

@Mojo(name = "first")
class First {
    @Mojo(name = "nested")
    class Nested
}
"#,
        );
    let (result, _) = extract_with_diagnostics(&[], &[project.path().to_path_buf()]);
    let goals: Vec<String> = result.unwrap().into_iter().map(|d| d.goal).collect();
    assert_eq!(goals, vec!["first", "nested", "second"]);
}

#[test]
fn test_inherited_parameters_without_descriptions() {
    let project = TestProject::new().with_file(
        "Mojos.kt",
        r#"
package inherit

import org.apache.maven.plugins.annotations.Mojo

abstract class BaseMojo {
    /** Skip the goal */
    var skip: Boolean = false
}

/** Runs tests */
@Mojo(name = "test")
class TestMojo : BaseMojo() {
    /** Test pattern */
    var pattern: String = "*"
}
"#,
    );
    let (result, _) = extract_with_diagnostics(&[], &[project.path().to_path_buf()]);
    let descriptors = result.unwrap();
    assert_eq!(descriptors.len(), 1);
    let parameters: Vec<(&str, Option<&str>)> = descriptors[0]
        .parameters
        .iter()
        .map(|p| (p.name.as_str(), p.description.as_deref()))
        .collect();
    assert_eq!(parameters, vec![("pattern", Some("Test pattern")), ("skip", None)]);
}

#[test]
fn test_constant_goal_name() {
    let project = TestProject::new()
        .with_file(
            "Names.kt",
            "package names\n\nobject Goals {\n    const val COMPILE = \"kotlin-\" + \"compile\"\n}\n",
        )
        .with_file(
            "Compile.kt",
            r#"
package names

import org.apache.maven.plugins.annotations.Mojo

@Mojo(name = Goals.COMPILE)
class CompileMojo
"#,
        );
    let (result, _) = extract_with_diagnostics(&[], &[project.path().to_path_buf()]);
    let descriptors = result.unwrap();
    assert_eq!(descriptors[0].goal, "kotlin-compile");
}

#[test]
fn test_star_import_confirmed_by_classpath() {
    let project = TestProject::new()
        .with_jar(
            "maven-plugin-annotations.jar",
            &[
                "org/apache/maven/plugins/annotations/Mojo.class",
                "org/apache/maven/plugins/annotations/Parameter.class",
            ],
        )
        .with_file(
            "src/Star.kt",
            "package star\n\nimport org.apache.maven.plugins.annotations.*\n\n@Mojo(name = \"star\")\nclass StarMojo\n",
        );

    let (result, collector) = extract_with_diagnostics(
        &[project.join("maven-plugin-annotations.jar")],
        &[project.join("src")],
    );
    assert_eq!(result.unwrap()[0].goal, "star");
    assert!(!collector.has_errors());

    let (result, collector) = extract_with_diagnostics(&[], &[project.join("src")]);
    assert!(result.unwrap().is_empty());
    assert!(collector
        .errors()
        .any(|d| d.message == "Unresolved reference: Mojo"));
}

#[test]
fn test_missing_name_fails_extraction() {
    let project = TestProject::new().with_file(
        "Bad.kt",
        "package bad\n\nimport org.apache.maven.plugins.annotations.Mojo\n\n@Mojo\nclass BadMojo\n",
    );
    let (result, _) = extract_with_diagnostics(&[], &[project.path().to_path_buf()]);
    match result {
        Err(ExtractorError::MissingGoalName { class }) => assert_eq!(class, "bad.BadMojo"),
        other => panic!("expected MissingGoalName, got {:?}", other),
    }
}

#[test]
fn test_syntax_errors_are_diagnostics() {
    let project = TestProject::new()
        .with_file("Broken.kt", "package broken\n\nclass Broken {\n    val = \n")
        .with_file(
            "Good.kt",
            "package broken\n\nimport org.apache.maven.plugins.annotations.Mojo\n\n@Mojo(name = \"good\")\nclass Good\n",
        );
    let (result, collector) = extract_with_diagnostics(&[], &[project.path().to_path_buf()]);
    let goals: Vec<String> = result.unwrap().into_iter().map(|d| d.goal).collect();
    assert_eq!(goals, vec!["good"]);
    assert!(collector
        .diagnostics()
        .iter()
        .any(|d| d.severity == Severity::Error
            && d.location.as_ref().map(|l| l.path.ends_with("Broken.kt")) == Some(true)));
}

#[test]
fn test_json_output_shape() {
    let (result, _) = extract_with_diagnostics(&[], &[fixtures_dir().join("root")]);
    let json = serde_json::to_value(result.unwrap()).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{
            "language": "Kotlin",
            "implementation": "root.MyMojo",
            "goal": "myMojo",
            "description": "My mojo",
            "parameters": [{"name": "classpath", "description": "My param"}]
        }])
    );
}

#[test]
fn test_single_line_body_parameters() {
    let project = TestProject::new().with_file(
        "OneLine.kt",
        r#"package oneline

import org.apache.maven.plugins.annotations.Mojo

abstract class B { var inherited = true }

@Mojo(name = "x", threadSafe = true)
open class A : B() { var a = 1 }
"#,
    );
    let (result, _) = extract_with_diagnostics(&[], &[project.path().to_path_buf()]);
    let descriptors = result.unwrap();
    assert_eq!(descriptors.len(), 1);
    assert_eq!(descriptors[0].goal, "x");
    let names: Vec<&str> = descriptors[0]
        .parameters
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, vec!["a", "inherited"]);
}
