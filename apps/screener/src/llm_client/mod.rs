//! LLM Client — the single point of entry for all Gemini API calls in the screener.
//!
//! ARCHITECTURAL RULE: No other module may call the Generative Language API directly.
//! All model interactions MUST go through the `ModelClient` trait.
//!
//! One round-trip per call. There is no retry loop and no request timeout:
//! a failed call fails the evaluation that made it.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("GOOGLE_API_KEY is not set")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content{}", .block_reason.as_deref().map(|r| format!(" (blocked: {r})")).unwrap_or_default())]
    EmptyContent { block_reason: Option<String> },
}

/// Anything that turns a prompt into raw model text.
///
/// `AppState` carries an `Arc<dyn ModelClient>` so handlers can be tested
/// against a stub without touching the network.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, prompt: &str, system: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Joins the text parts of the first candidate.
    /// Returns `None` when the model produced no text at all.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    api_base: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, api_base: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let request_body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![RequestPart { text: system }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: api_error_message(body),
            });
        }

        let body: GenerateContentResponse = response.json().await?;

        if let Some(usage) = &body.usage_metadata {
            debug!(
                "Gemini call succeeded: prompt_tokens={}, candidate_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        body.text().ok_or_else(|| LlmError::EmptyContent {
            block_reason: body.prompt_feedback.and_then(|f| f.block_reason),
        })
    }
}

/// Pulls `error.message` out of a Gemini error body, falling back to the raw body.
fn api_error_message(body: String) -> String {
    serde_json::from_str::<ApiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_joins_parts_of_first_candidate() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "{\"ATS Score\":"}, {"text": "\"82%\"}"}], "role": "model"}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ],
            "usageMetadata": {"promptTokenCount": 310, "candidatesTokenCount": 12}
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text().as_deref(), Some("{\"ATS Score\":\"82%\"}"));
        assert_eq!(response.usage_metadata.unwrap().prompt_token_count, 310);
    }

    #[test]
    fn test_blocked_prompt_has_no_text() {
        let json = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert!(response.text().is_none());
        assert_eq!(
            response.prompt_feedback.unwrap().block_reason.as_deref(),
            Some("SAFETY")
        );
    }

    #[test]
    fn test_api_error_message_extracted() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(api_error_message(body.to_string()), "API key not valid.");
        assert_eq!(api_error_message("gateway down".to_string()), "gateway down");
    }

    #[test]
    fn test_request_serializes_gemini_shape() {
        let request = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![RequestPart { text: "sys" }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![RequestPart { text: "Resume Text: hi" }],
            }],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "sys");
        assert!(value["systemInstruction"].get("role").is_none());
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "Resume Text: hi");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = GeminiClient::new(
            None,
            "https://example.test/v1beta/".to_string(),
            "gemini-2.5-flash".to_string(),
        );
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn test_missing_key_fails_on_first_call() {
        let client = GeminiClient::new(
            None,
            "http://127.0.0.1:9".to_string(),
            "gemini-2.5-flash".to_string(),
        );
        let err = client.generate("Resume Text: x", "sys").await.unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
        assert_eq!(err.to_string(), "GOOGLE_API_KEY is not set");
    }

    mod mock_gemini {
        use std::sync::{Arc, Mutex};

        use axum::{
            extract::{Path, State},
            http::{HeaderMap, StatusCode},
            routing::post,
            Json, Router,
        };
        use serde_json::Value;

        /// What the client sent on one call.
        pub struct RecordedCall {
            pub call: String,
            pub api_key: Option<String>,
            pub body: Value,
        }

        /// Local stand-in for the Generative Language API with a canned reply.
        pub struct MockGemini {
            status: StatusCode,
            reply: Value,
            pub calls: Mutex<Vec<RecordedCall>>,
        }

        async fn generate_content(
            State(mock): State<Arc<MockGemini>>,
            Path(call): Path<String>,
            headers: HeaderMap,
            Json(body): Json<Value>,
        ) -> (StatusCode, Json<Value>) {
            mock.calls.lock().unwrap().push(RecordedCall {
                call,
                api_key: headers
                    .get("x-goog-api-key")
                    .and_then(|v| v.to_str().ok())
                    .map(String::from),
                body,
            });
            (mock.status, Json(mock.reply.clone()))
        }

        /// Serves `reply` with `status` on an ephemeral port.
        /// Returns the mock and the api base to point a client at.
        pub async fn serve(status: StatusCode, reply: Value) -> (Arc<MockGemini>, String) {
            let mock = Arc::new(MockGemini {
                status,
                reply,
                calls: Mutex::new(Vec::new()),
            });
            let app = Router::new()
                .route("/models/:call", post(generate_content))
                .with_state(mock.clone());

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });
            (mock, format!("http://{addr}"))
        }
    }

    fn client_for(api_base: String) -> GeminiClient {
        GeminiClient::new(
            Some("test-key".to_string()),
            api_base,
            "gemini-2.5-flash".to_string(),
        )
    }

    #[tokio::test]
    async fn test_generate_joins_parts_from_live_reply() {
        let reply = serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "{\"JD Match\":"}, {"text": "\"88%\"}"}]
                }
            }],
            "usageMetadata": {"promptTokenCount": 40, "candidatesTokenCount": 8}
        });
        let (mock, api_base) = mock_gemini::serve(axum::http::StatusCode::OK, reply).await;

        let text = client_for(api_base)
            .generate("Job Description: jd\nResume Text: cv", "return JSON")
            .await
            .unwrap();
        assert_eq!(text, "{\"JD Match\":\"88%\"}");

        let calls = mock.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let call = &calls[0];
        assert_eq!(call.call, "gemini-2.5-flash:generateContent");
        assert_eq!(call.api_key.as_deref(), Some("test-key"));
        assert_eq!(
            call.body["systemInstruction"]["parts"][0]["text"],
            "return JSON"
        );
        assert_eq!(call.body["contents"][0]["role"], "user");
        assert_eq!(
            call.body["contents"][0]["parts"][0]["text"],
            "Job Description: jd\nResume Text: cv"
        );
    }

    #[tokio::test]
    async fn test_generate_surfaces_api_error_message() {
        let reply = serde_json::json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT"
            }
        });
        let (_mock, api_base) =
            mock_gemini::serve(axum::http::StatusCode::BAD_REQUEST, reply).await;

        let err = client_for(api_base)
            .generate("Resume Text: cv", "sys")
            .await
            .unwrap_err();
        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid. Please pass a valid API key.");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_reports_block_reason() {
        let reply = serde_json::json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        });
        let (_mock, api_base) = mock_gemini::serve(axum::http::StatusCode::OK, reply).await;

        let err = client_for(api_base)
            .generate("Resume Text: cv", "sys")
            .await
            .unwrap_err();
        assert!(matches!(
            &err,
            LlmError::EmptyContent { block_reason: Some(r) } if r == "SAFETY"
        ));
        assert_eq!(err.to_string(), "LLM returned empty content (blocked: SAFETY)");
    }

    #[test]
    fn test_empty_content_message() {
        let err = LlmError::EmptyContent {
            block_reason: Some("SAFETY".into()),
        };
        assert_eq!(err.to_string(), "LLM returned empty content (blocked: SAFETY)");
        let err = LlmError::EmptyContent { block_reason: None };
        assert_eq!(err.to_string(), "LLM returned empty content");
    }
}
