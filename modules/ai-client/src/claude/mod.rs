mod client;
pub(crate) mod types;

use crate::schema::StructuredOutput;
use anyhow::{anyhow, Result};

use client::ClaudeClient;
use types::*;

const STRUCTURED_TOOL: &str = "structured_response";

#[derive(Clone)]
pub struct Claude {
    api_key: String,
    model: String,
    base_url: Option<String>,
}

impl Claude {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn client(&self) -> ClaudeClient {
        let client = ClaudeClient::new(&self.api_key);
        match self.base_url {
            Some(ref url) => client.with_base_url(url),
            None => client,
        }
    }

    /// Force a single tool call whose input schema is `T`'s schema and
    /// deserialize the tool input as the result.
    pub async fn extract<T: StructuredOutput>(
        &self,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Result<T> {
        let request = ChatRequest::new(&self.model)
            .system(system_prompt)
            .message(WireMessage::user(user_prompt))
            .temperature(0.0)
            .forced_tool(ToolDefinitionWire {
                name: STRUCTURED_TOOL.to_string(),
                description: format!("Report the result as a {}.", T::type_name()),
                input_schema: T::tool_input_schema(),
            });

        let response = self.client().chat(&request).await?;

        let input = response
            .tool_input(STRUCTURED_TOOL)
            .ok_or_else(|| anyhow!("No structured output in Claude response"))?;
        serde_json::from_value(input.clone())
            .map_err(|e| anyhow!("Failed to deserialize {}: {}", T::type_name(), e))
    }

    pub async fn chat_completion(
        &self,
        system: impl Into<String>,
        user: impl Into<String>,
    ) -> Result<String> {
        let request = ChatRequest::new(&self.model)
            .system(system)
            .message(WireMessage::user(user))
            .max_tokens(4096)
            .temperature(0.0);

        let response = self.client().chat(&request).await?;

        response
            .text()
            .ok_or_else(|| anyhow!("No response from Claude"))
    }
}
