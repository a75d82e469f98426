use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, error, warn};

use super::prompts::{
    DOCUMENT_SYSTEM_PROMPT, LEASE_REVIEW_SYSTEM_PROMPT, RTLO_QUESTION_SYSTEM_PROMPT,
    document_prompt, lease_review_prompt,
};
use crate::{
    application::interfaces::text_generation::TextGenerator,
    config::config_model::OpenAi,
    domain::value_objects::{
        ai_analyses::LeaseAnalysisDraft, documents::FALLBACK_DOCUMENT_CONTENT,
        enums::document_types::DocumentType, rtlo_questions::AnswerDraft,
    },
};

/// Chat-completions client built on reqwest.
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorEnvelope {
    error: OpenAiErrorDetails,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetails {
    message: Option<String>,
    #[serde(rename = "type")]
    type_: Option<String>,
    code: Option<String>,
}

impl OpenAiClient {
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &OpenAi) -> Self {
        Self::new(
            config.api_key.clone(),
            config.model.clone(),
            config.base_url.clone(),
        )
    }

    async fn ensure_success(resp: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let request_id = resp
            .headers()
            .get("x-request-id")
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        let details = serde_json::from_str::<OpenAiErrorEnvelope>(&body)
            .ok()
            .map(|envelope| envelope.error);
        let message = details.as_ref().and_then(|d| d.message.clone());

        error!(
            status = %status,
            openai_request_id = ?request_id,
            openai_error_type = ?details.as_ref().and_then(|d| d.type_.clone()),
            openai_error_code = ?details.as_ref().and_then(|d| d.code.clone()),
            openai_error_message = ?message,
            context = %context,
            "openai: api request failed"
        );

        anyhow::bail!(
            "OpenAI request failed: {} (status {}): {}",
            context,
            status,
            message.unwrap_or(body)
        );
    }

    /// Sends one chat completion and returns the first choice's content.
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        json_output: bool,
        context: &str,
    ) -> Result<Option<String>> {
        let messages = [
            ChatMessage {
                role: "system",
                content: system_prompt,
            },
            ChatMessage {
                role: "user",
                content: user_prompt,
            },
        ];
        let mut body = json!({
            "model": self.model,
            "messages": messages,
        });
        if json_output {
            body["response_format"] = json!({ "type": "json_object" });
        }

        let resp = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .with_context(|| format!("OpenAI request failed: {context}"))?;
        let resp = Self::ensure_success(resp, context).await?;

        let completion: ChatCompletion = resp
            .json()
            .await
            .with_context(|| format!("OpenAI response unreadable: {context}"))?;

        debug!(context = %context, choices = completion.choices.len(), "openai: completion received");

        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content))
    }

    async fn complete_json(&self, system_prompt: &str, user_prompt: &str, context: &str) -> Result<Value> {
        let content = self
            .complete(system_prompt, user_prompt, true, context)
            .await?
            .unwrap_or_default();

        Ok(parse_json_object(&content, context))
    }
}

/// Model output that is empty or not JSON becomes `{}`; callers fill in defaults.
fn parse_json_object(content: &str, context: &str) -> Value {
    if content.trim().is_empty() {
        return Value::Object(Default::default());
    }
    match serde_json::from_str::<Value>(content) {
        Ok(value) => value,
        Err(err) => {
            warn!(context = %context, error = %err, "openai: model returned invalid JSON");
            Value::Object(Default::default())
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn answer_question(&self, question: &str) -> Result<AnswerDraft> {
        let value = self
            .complete_json(RTLO_QUESTION_SYSTEM_PROMPT, question, "answer rtlo question")
            .await?;
        Ok(AnswerDraft(value))
    }

    async fn analyze_lease(&self, lease_text: &str) -> Result<LeaseAnalysisDraft> {
        let value = self
            .complete_json(
                LEASE_REVIEW_SYSTEM_PROMPT,
                &lease_review_prompt(lease_text),
                "analyze lease compliance",
            )
            .await?;
        Ok(LeaseAnalysisDraft(value))
    }

    async fn draft_document(&self, document_type: DocumentType, data: &Value) -> Result<String> {
        let content = self
            .complete(
                DOCUMENT_SYSTEM_PROMPT,
                &document_prompt(document_type, data),
                false,
                "generate rtlo document",
            )
            .await?;

        Ok(content
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_DOCUMENT_CONTENT.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};

    fn completion(content: &str) -> Value {
        json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "created": 1,
            "model": "gpt-5",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        })
    }

    fn client(server: &MockServer) -> OpenAiClient {
        OpenAiClient::new("sk-test".to_string(), "gpt-5".to_string(), server.base_url())
    }

    #[tokio::test]
    async fn answer_question_requests_json_output() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/chat/completions")
                    .header("authorization", "Bearer sk-test")
                    .body_contains(r#""response_format":{"type":"json_object"}"#)
                    .body_contains("Chapter 5-12");
                then.status(200).json_body(completion(
                    r#"{"answer":"Within 45 days.","rtloSection":"5-12-090","confidence":"high"}"#,
                ));
            })
            .await;

        let draft = client(&server)
            .answer_question("When must I return a deposit?")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(draft.0["rtloSection"], "5-12-090");
    }

    #[tokio::test]
    async fn invalid_json_content_becomes_empty_object() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(200).json_body(completion("Sorry, I cannot help with that."));
            })
            .await;

        let draft = client(&server).analyze_lease("lease text").await.unwrap();

        assert_eq!(draft.0, json!({}));
        assert_eq!(draft.normalize().compliance_score, 0);
    }

    #[tokio::test]
    async fn upstream_error_is_propagated_with_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(429).json_body(json!({
                    "error": { "message": "Rate limit reached", "type": "requests", "code": "rate_limit_exceeded" }
                }));
            })
            .await;

        let err = client(&server)
            .answer_question("anything")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Rate limit reached"));
    }

    #[tokio::test]
    async fn empty_document_falls_back_to_fixed_text() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/chat/completions")
                    .body_contains("Generate a lease-addendum document");
                then.status(200).json_body(completion(""));
            })
            .await;

        let content = client(&server)
            .draft_document(DocumentType::LeaseAddendum, &json!({}))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(content, FALLBACK_DOCUMENT_CONTENT);
    }
}
