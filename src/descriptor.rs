//! Goal descriptors produced by the extractor

use serde::{Deserialize, Serialize};

/// One plugin goal, backed by a `@Mojo`-annotated class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MojoDescriptor {
    /// Source language of the implementation, always `Kotlin`
    pub language: String,
    /// Fully-qualified name of the implementing class
    pub implementation: String,
    pub goal: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

/// A configurable property of a goal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let descriptor = MojoDescriptor {
            language: "Kotlin".into(),
            implementation: "root.MyMojo".into(),
            goal: "myMojo".into(),
            description: None,
            parameters: vec![Parameter {
                name: "classpath".into(),
                description: Some("My param".into()),
            }],
        };
        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "language": "Kotlin",
                "implementation": "root.MyMojo",
                "goal": "myMojo",
                "parameters": [{"name": "classpath", "description": "My param"}]
            })
        );
        let read: MojoDescriptor = serde_json::from_value(json).unwrap();
        assert_eq!(read, descriptor);
    }
}
