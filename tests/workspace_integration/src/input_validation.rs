//! Input validation tests.
//!
//! Invalid tool input is rejected with a message naming the offending field,
//! and is reported as a tool error rather than a protocol error.

#[cfg(test)]
mod tests {
    use doubao_mcp_common::Config;
    use doubao_mcp_image::{GENERATE_IMAGE_TOOL, GenerateImageParams, ImageServer};

    fn server() -> ImageServer {
        let config = Config::from_lookup(|name| match name {
            "DOUBAO_API_KEY" => Some("sk-workspace".to_string()),
            "API_MODEL_ID" => Some("doubao-seedream-3-0-t2i-250415".to_string()),
            // Unroutable, so a request that slipped past validation would fail loudly
            "BASE_URL" => Some("http://127.0.0.1:1/api/v3".to_string()),
            _ => None,
        })
        .unwrap();
        ImageServer::new(config)
    }

    fn args(value: serde_json::Value) -> Option<rmcp::model::JsonObject> {
        value.as_object().cloned()
    }

    async fn rejection(value: serde_json::Value) -> serde_json::Value {
        let result = server().invoke(GENERATE_IMAGE_TOOL, args(value)).await;
        assert_eq!(result.is_error, Some(true));
        result.structured_content.unwrap()
    }

    #[tokio::test]
    async fn test_invalid_size_rejected_before_any_request() {
        let rejected = rejection(serde_json::json!({"prompt": "a red fox", "size": "999x999"})).await;
        assert_eq!(rejected["category"], "validation");
        assert!(rejected["message"].as_str().unwrap().contains("size"));
    }

    #[tokio::test]
    async fn test_empty_prompt_rejected() {
        let rejected = rejection(serde_json::json!({"prompt": "   "})).await;
        assert_eq!(rejected["category"], "validation");
        assert!(rejected["message"].as_str().unwrap().contains("prompt"));
    }

    #[tokio::test]
    async fn test_out_of_range_values_reported_together() {
        let rejected = rejection(serde_json::json!({
            "prompt": "a red fox",
            "seed": -2,
            "guidance_scale": 10.5,
            "file_prefix": "no spaces"
        }))
        .await;

        let message = rejected["message"].as_str().unwrap();
        assert!(message.contains("seed"));
        assert!(message.contains("guidance_scale"));
        assert!(message.contains("file_prefix"));
    }

    #[tokio::test]
    async fn test_missing_arguments_rejected() {
        let result = server().invoke(GENERATE_IMAGE_TOOL, None).await;
        assert_eq!(result.structured_content.unwrap()["category"], "validation");
    }

    #[tokio::test]
    async fn test_unknown_tool_rejected() {
        let result = server().invoke("image_generate", args(serde_json::json!({"prompt": "a"}))).await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(result.structured_content.unwrap()["category"], "unknown_tool");
    }

    #[test]
    fn test_valid_params_pass_validation() {
        let mut params = GenerateImageParams::new("a red fox");
        params.size = "1512x648".to_string();
        params.seed = 0;
        params.guidance_scale = 1.0;
        params.file_prefix = Some("fox-01".to_string());
        assert!(params.validate().is_ok());
    }
}

#[cfg(test)]
mod property_tests {
    use doubao_mcp_image::params::{MAX_SEED, RANDOM_SEED};
    use doubao_mcp_image::{GenerateImageParams, SUPPORTED_SIZES, ValidationErrorKind};
    use proptest::prelude::*;

    fn valid_size_strategy() -> impl Strategy<Value = &'static str> {
        prop::sample::select(SUPPORTED_SIZES.iter().map(|s| s.id).collect::<Vec<_>>())
    }

    fn valid_prompt_strategy() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9 ,]{1,200}".prop_filter("Must not be blank", |s| !s.trim().is_empty())
    }

    fn blank_prompt_strategy() -> impl Strategy<Value = String> {
        "[ \t\n]{0,10}"
    }

    proptest! {
        #[test]
        fn valid_params_combination_passes(
            prompt in valid_prompt_strategy(),
            size in valid_size_strategy(),
            seed in RANDOM_SEED..=MAX_SEED,
            guidance_scale in 1.0f64..=10.0,
            watermark in any::<bool>(),
            prefix in proptest::option::of("[A-Za-z0-9_-]{1,20}")
        ) {
            let params = GenerateImageParams {
                prompt,
                size: size.to_string(),
                seed,
                guidance_scale,
                watermark,
                file_prefix: prefix,
            };
            prop_assert!(params.validate().is_ok());
        }

        #[test]
        fn blank_prompts_fail_validation(prompt in blank_prompt_strategy()) {
            let params = GenerateImageParams::new(prompt);
            let errors = params.validate().unwrap_err();
            prop_assert_eq!(errors.len(), 1);
            prop_assert_eq!(errors[0].kind, ValidationErrorKind::EmptyPrompt);
        }

        #[test]
        fn prefixes_with_foreign_characters_fail(
            head in "[a-z]{1,5}",
            bad in "[ ./\\\\:*?]",
            tail in "[a-z]{0,5}"
        ) {
            let mut params = GenerateImageParams::new("a red fox");
            params.file_prefix = Some(format!("{}{}{}", head, bad, tail));
            let errors = params.validate().unwrap_err();
            prop_assert_eq!(errors[0].kind, ValidationErrorKind::InvalidPrefix);
        }
    }
}
