//! TOON (Token-Oriented Object Notation) encoder using rtoon library
//!
//! Descriptors are laid out as one object per goal. Parameters share the
//! `name,description` header so rtoon emits them as a tabular block. A
//! parameter without a description keeps the field, set to `null`.

use rtoon::encode_default;
use serde_json::{json, Map, Value};

use crate::descriptor::MojoDescriptor;
use crate::error::{ExtractorError, Result};

/// Encode a list of goal descriptors as TOON
pub fn encode_toon(descriptors: &[MojoDescriptor]) -> Result<String> {
    let goals: Vec<Value> = descriptors.iter().map(descriptor_value).collect();

    let mut obj = Map::new();
    obj.insert("_type".to_string(), json!("mojo_descriptors"));
    obj.insert("goals".to_string(), Value::Array(goals));

    encode_default(&Value::Object(obj)).map_err(|e| ExtractorError::Serialization {
        message: format!("TOON encoding failed: {}", e),
    })
}

fn descriptor_value(descriptor: &MojoDescriptor) -> Value {
    let mut obj = Map::new();
    obj.insert("goal".to_string(), json!(descriptor.goal));
    obj.insert("implementation".to_string(), json!(descriptor.implementation));
    obj.insert("language".to_string(), json!(descriptor.language));

    if let Some(ref description) = descriptor.description {
        obj.insert("description".to_string(), json!(description));
    }

    let parameters: Vec<Value> = descriptor
        .parameters
        .iter()
        .map(|p| {
            json!({
                "name": p.name,
                "description": p.description
            })
        })
        .collect();
    if !parameters.is_empty() {
        obj.insert("parameters".to_string(), Value::Array(parameters));
    }

    Value::Object(obj)
}
