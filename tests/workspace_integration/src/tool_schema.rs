//! Tool schema validity tests.
//!
//! Every registered tool carries a name, a description and an object-typed
//! JSON schema listing its parameters.

#[cfg(test)]
use serde_json::Value;

/// Validates that a JSON schema has the required structure.
#[cfg(test)]
fn validate_json_schema(schema: &Value) -> Result<(), String> {
    let obj = schema
        .as_object()
        .ok_or_else(|| "Schema must be an object".to_string())?;

    if let Some(type_val) = obj.get("type") {
        if type_val != "object" {
            return Err(format!("Expected type 'object', got {:?}", type_val));
        }
    }

    if let Some(properties) = obj.get("properties") {
        if !properties.is_object() {
            return Err("Properties must be an object".to_string());
        }
    }

    Ok(())
}

/// Validates that a tool has required fields.
#[cfg(test)]
fn validate_tool(tool: &rmcp::model::Tool) -> Result<(), String> {
    if tool.name.is_empty() {
        return Err("Tool name cannot be empty".to_string());
    }

    if tool.description.as_ref().is_none_or(|d| d.is_empty()) {
        return Err(format!("Tool '{}' must have a description", tool.name));
    }

    if tool.input_schema.is_empty() {
        return Err(format!("Tool '{}' must have an input schema", tool.name));
    }

    let schema_value = serde_json::to_value(&*tool.input_schema)
        .map_err(|e| format!("Failed to serialize schema: {}", e))?;
    validate_json_schema(&schema_value)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use doubao_mcp_image::{GENERATE_IMAGE_TOOL, GenerateImageToolParams, ImageServer};
    use schemars::schema_for;
    use std::borrow::Cow;
    use std::sync::Arc;

    #[test]
    fn test_json_schema_validation() {
        let valid_schema = serde_json::json!({
            "type": "object",
            "properties": {
                "prompt": {
                    "type": "string"
                }
            },
            "required": ["prompt"]
        });
        assert!(validate_json_schema(&valid_schema).is_ok());

        let invalid_schema = serde_json::json!({
            "type": "string"
        });
        assert!(validate_json_schema(&invalid_schema).is_err());
    }

    #[test]
    fn test_tool_validation_rejects_missing_description() {
        let tool = rmcp::model::Tool {
            name: Cow::Borrowed("test_tool"),
            description: None,
            input_schema: Arc::new(serde_json::Map::new()),
            annotations: None,
            icons: None,
            meta: None,
            output_schema: None,
            title: None,
        };
        assert!(validate_tool(&tool).is_err());
    }

    #[test]
    fn test_registered_tools_are_valid() {
        let tools = ImageServer::tools();
        assert_eq!(tools.len(), 1);
        for tool in &tools {
            let result = validate_tool(tool);
            assert!(result.is_ok(), "Tool {} should be valid: {:?}", tool.name, result.err());
        }
        assert_eq!(tools[0].name, GENERATE_IMAGE_TOOL);
    }

    #[test]
    fn test_generate_image_schema_fields() {
        let schema_value = serde_json::to_value(schema_for!(GenerateImageToolParams)).unwrap();
        assert!(validate_json_schema(&schema_value).is_ok());

        let obj = schema_value.as_object().unwrap();
        let properties = obj.get("properties").unwrap().as_object().unwrap();
        for field in ["prompt", "size", "seed", "guidance_scale", "watermark", "file_prefix"] {
            assert!(properties.contains_key(field), "Schema should have '{}' property", field);
        }

        assert_eq!(obj.get("required").unwrap(), &serde_json::json!(["prompt"]));
        assert_eq!(properties["prompt"]["type"], "string");
    }

    #[test]
    fn test_tool_description_lists_every_size() {
        let tools = ImageServer::tools();
        let description = tools[0].description.as_deref().unwrap();
        for size in doubao_mcp_image::SUPPORTED_SIZES {
            assert!(description.contains(size.id), "Description should list {}", size.id);
        }
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any object schema with object properties passes validation.
        #[test]
        fn object_schemas_are_valid(names in proptest::collection::vec("[a-z][a-z_]{0,15}", 0..8)) {
            let properties: serde_json::Map<String, Value> = names
                .into_iter()
                .map(|n| (n, serde_json::json!({"type": "string"})))
                .collect();
            let schema = serde_json::json!({"type": "object", "properties": properties});
            prop_assert!(validate_json_schema(&schema).is_ok());
        }

        /// Non-object schema types are rejected.
        #[test]
        fn non_object_types_are_rejected(kind in prop_oneof![
            Just("string"), Just("number"), Just("array"), Just("boolean")
        ]) {
            let schema = serde_json::json!({"type": kind});
            prop_assert!(validate_json_schema(&schema).is_err());
        }
    }
}
