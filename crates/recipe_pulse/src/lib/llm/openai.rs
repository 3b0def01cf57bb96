use std::{fmt, str::FromStr};

use recipe_schema::{base_recipe_json_schema, BaseRecipe, BASE_RECIPE_SCHEMA_NAME};
use reqwest::Client;
use serde::Deserialize;

use crate::llm::extractor::{recipe_input, RecipeExtractor};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

/// Which OpenAI-compatible endpoint receives the structured output request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApiStyle {
    /// `POST /responses`
    #[default]
    Responses,
    /// `POST /chat/completions`
    ChatCompletions,
}

impl FromStr for ApiStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "responses" => Ok(ApiStyle::Responses),
            "chat-completions" | "chat" => Ok(ApiStyle::ChatCompletions),
            other => Err(format!(
                "unknown api style '{other}', expected 'responses' or 'chat-completions'"
            )),
        }
    }
}

impl fmt::Display for ApiStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiStyle::Responses => f.write_str("responses"),
            ApiStyle::ChatCompletions => f.write_str("chat-completions"),
        }
    }
}

#[derive(Clone)]
pub struct OpenAIClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    api_style: ApiStyle,
}

#[derive(Debug, thiserror::Error)]
pub enum OpenAIError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Model refused the request: {0}")]
    Refusal(String),
    #[error("No content in response")]
    EmptyOutput,
    #[error("Model output does not match the recipe schema: {0}")]
    InvalidOutput(#[from] serde_json::Error),
}

impl OpenAIClient {
    const SYSTEM_PROMPT: &str = include_str!("./prompts/recipe_extraction.txt");

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            api_style: ApiStyle::default(),
        }
    }

    /// An empty `url` keeps the default endpoint
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        if !url.trim().is_empty() {
            self.base_url = url.trim_end_matches('/').to_string();
        }
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_style(mut self, api_style: ApiStyle) -> Self {
        self.api_style = api_style;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, OpenAIError> {
        let resp = self
            .client
            .post(format!("{}/{path}", self.base_url))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(OpenAIError::Api { status, message });
        }

        Ok(resp)
    }

    /// Structured output request against the Responses API.
    /// Returns the raw JSON text produced by the model.
    pub async fn send_response_request(
        &self,
        user_content: impl Into<String>,
    ) -> Result<String, OpenAIError> {
        let body = serde_json::json!({
            "model": self.model,
            "instructions": Self::SYSTEM_PROMPT,
            "input": user_content.into(),
            "text": {
                "format": {
                    "type": "json_schema",
                    "name": BASE_RECIPE_SCHEMA_NAME,
                    "schema": base_recipe_json_schema(),
                    "strict": true
                }
            }
        });

        let response = self
            .post_json("responses", &body)
            .await?
            .json::<ResponsesResponse>()
            .await?;

        response.output_text()
    }

    /// Structured output request against the Chat Completions API.
    /// Returns the raw JSON text produced by the model.
    pub async fn send_completion_request(
        &self,
        user_content: impl Into<String>,
    ) -> Result<String, OpenAIError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": Self::SYSTEM_PROMPT
                },
                {
                    "role": "user",
                    "content": user_content.into()
                }
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": BASE_RECIPE_SCHEMA_NAME,
                    "schema": base_recipe_json_schema(),
                    "strict": true
                }
            }
        });

        let response = self
            .post_json("chat/completions", &body)
            .await?
            .json::<CompletionResponse>()
            .await?;

        let message = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or(OpenAIError::EmptyOutput)?;

        if let Some(refusal) = message.refusal {
            return Err(OpenAIError::Refusal(refusal));
        }

        message.content.ok_or(OpenAIError::EmptyOutput)
    }
}

/// Validates raw model output against the [`BaseRecipe`] shape
pub fn parse_base_recipe(output: &str) -> Result<BaseRecipe, OpenAIError> {
    if output.trim().is_empty() {
        return Err(OpenAIError::EmptyOutput);
    }
    Ok(serde_json::from_str::<BaseRecipe>(output)?)
}

#[derive(Debug, Deserialize)]
pub struct ResponsesResponse {
    pub id: String,
    #[serde(default)]
    pub output: Vec<ResponseOutputItem>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum ResponseOutputItem {
    #[serde(rename = "message")]
    Message {
        #[serde(default)]
        content: Vec<ResponseContent>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum ResponseContent {
    #[serde(rename = "output_text")]
    OutputText { text: String },
    #[serde(rename = "refusal")]
    Refusal { refusal: String },
    #[serde(other)]
    Other,
}

impl ResponsesResponse {
    /// The first text (or refusal) the model produced
    fn output_text(self) -> Result<String, OpenAIError> {
        let content = self
            .output
            .into_iter()
            .filter_map(|item| match item {
                ResponseOutputItem::Message { content } => Some(content),
                ResponseOutputItem::Other => None,
            })
            .flatten()
            .find(|c| !matches!(c, ResponseContent::Other));

        match content {
            Some(ResponseContent::OutputText { text }) => Ok(text),
            Some(ResponseContent::Refusal { refusal }) => Err(OpenAIError::Refusal(refusal)),
            _ => Err(OpenAIError::EmptyOutput),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub index: u32,
    pub message: CompletionMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    pub role: String,
    pub content: Option<String>,
    pub refusal: Option<String>,
}

impl RecipeExtractor for OpenAIClient {
    type Error = OpenAIError;

    #[tracing::instrument(skip(self, transcript), fields(model = %self.model, api_style = %self.api_style))]
    async fn extract_recipe(
        &self,
        title: &str,
        transcript: &str,
    ) -> Result<BaseRecipe, Self::Error> {
        let input = recipe_input(title, transcript);

        let output = match self.api_style {
            ApiStyle::Responses => self.send_response_request(input).await,
            ApiStyle::ChatCompletions => self.send_completion_request(input).await,
        }
        .inspect_err(|e| tracing::error!(error = %e, "Failed to extract recipe"))?;

        parse_base_recipe(&output)
            .inspect_err(|e| tracing::error!(error = %e, "Model output failed validation"))
    }
}
