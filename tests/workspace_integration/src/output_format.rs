//! Output format tests.
//!
//! Tool results always carry one non-empty text block. Failures also carry a
//! structured `{category, message}` object whose category is one of the
//! stable error categories.

#[cfg(test)]
use rmcp::model::{CallToolResult, Content, RawContent};

/// Error categories a tool result may report.
#[cfg(test)]
const CATEGORIES: &[&str] = &["config", "validation", "fetch", "io", "unknown_tool", "collaborator"];

/// Validates that a CallToolResult has valid content format.
#[cfg(test)]
fn validate_tool_result(result: &CallToolResult) -> Result<(), String> {
    if result.content.is_empty() && !result.is_error.unwrap_or(false) {
        return Err("Successful result should have content".to_string());
    }

    for content in &result.content {
        validate_content(content)?;
    }

    if result.is_error == Some(true) {
        validate_error_payload(result)?;
    }

    Ok(())
}

/// Validates that a Content item has valid structure.
#[cfg(test)]
fn validate_content(content: &Content) -> Result<(), String> {
    match &content.raw {
        RawContent::Text(text_content) => {
            if text_content.text.is_empty() {
                return Err("Text content should not be empty".to_string());
            }
            Ok(())
        }
        other => Err(format!("Image tool results are text only, got {:?}", other)),
    }
}

#[cfg(test)]
fn validate_error_payload(result: &CallToolResult) -> Result<(), String> {
    let structured = result
        .structured_content
        .as_ref()
        .ok_or_else(|| "Error result should carry structured content".to_string())?;
    let category = structured["category"]
        .as_str()
        .ok_or_else(|| "Error result should name a category".to_string())?;
    if !CATEGORIES.contains(&category) {
        return Err(format!("Unknown error category: {}", category));
    }
    if structured["message"].as_str().is_none_or(str::is_empty) {
        return Err("Error result should carry a message".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use doubao_mcp_common::Config;
    use doubao_mcp_image::{GENERATE_IMAGE_TOOL, ImageServer};

    fn server() -> ImageServer {
        ImageServer::new(
            Config::from_lookup(|name| match name {
                "DOUBAO_API_KEY" => Some("sk-workspace".to_string()),
                "API_MODEL_ID" => Some("doubao-seedream-3-0-t2i-250415".to_string()),
                _ => None,
            })
            .unwrap(),
        )
    }

    #[test]
    fn test_content_text_helper() {
        assert!(validate_content(&Content::text("Hello, world!")).is_ok());
        assert!(validate_content(&Content::text("")).is_err());
    }

    #[test]
    fn test_empty_content_non_error_fails() {
        let result = CallToolResult {
            content: vec![],
            is_error: Some(false),
            meta: None,
            structured_content: None,
        };
        assert!(validate_tool_result(&result).is_err());
    }

    #[test]
    fn test_error_without_category_fails() {
        let result = CallToolResult {
            content: vec![Content::text("Image generation failed")],
            is_error: Some(true),
            meta: None,
            structured_content: Some(serde_json::json!({"message": "boom"})),
        };
        assert!(validate_tool_result(&result).is_err());
    }

    #[tokio::test]
    async fn test_unknown_tool_result_format() {
        let result = server().invoke("paint", None).await;
        assert!(validate_tool_result(&result).is_ok(), "{:?}", validate_tool_result(&result));

        match &result.content[0].raw {
            RawContent::Text(t) => {
                assert!(t.text.starts_with("Image generation failed [unknown_tool]: "));
            }
            other => panic!("Expected text content, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_validation_result_format() {
        let args = serde_json::json!({"prompt": "a red fox", "guidance_scale": 0.5});
        let result = server()
            .invoke(GENERATE_IMAGE_TOOL, args.as_object().cloned())
            .await;

        assert!(validate_tool_result(&result).is_ok());
        assert_eq!(result.content.len(), 1);
        assert_eq!(result.structured_content.unwrap()["category"], "validation");
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Error results built from any known category and message are well formed.
        #[test]
        fn well_formed_error_results_pass(
            category in prop::sample::select(CATEGORIES.to_vec()),
            message in "[A-Za-z0-9 :]{1,80}"
        ) {
            let result = CallToolResult {
                content: vec![Content::text(format!("Image generation failed [{}]: {}", category, message))],
                is_error: Some(true),
                meta: None,
                structured_content: Some(serde_json::json!({"category": category, "message": message})),
            };
            prop_assert!(validate_tool_result(&result).is_ok());
        }

        /// Any non-empty text success result passes validation.
        #[test]
        fn text_success_results_pass(text in "[A-Za-z0-9 ]{1,100}") {
            let result = CallToolResult::success(vec![Content::text(text)]);
            prop_assert!(validate_tool_result(&result).is_ok());
        }
    }
}
