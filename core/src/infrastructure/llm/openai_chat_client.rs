use std::sync::Arc;

use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::{
    domain::{
        common::{LLMConfig, entities::app_errors::CoreError},
        recipe::ports::{ChatClient, ChatRequest, ToolCallback, ToolDefinition},
    },
    infrastructure::llm::{endpoint, openai_http_client, post_json},
};

/// Maximum number of tool-call rounds before the exchange is abandoned.
pub const MAX_TOOL_ROUNDS: usize = 5;

#[derive(Debug, Clone)]
pub struct OpenAIChatClient {
    client: Client,
    url: String,
    model: String,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ToolSpec<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat<'a>>,
}

#[derive(Debug, Serialize)]
struct ToolSpec<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: &'a ToolDefinition,
}

#[derive(Debug, Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchemaFormat<'a>,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat<'a> {
    name: &'static str,
    schema: &'a serde_json::Value,
    strict: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Message {
    role: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl Message {
    fn text(role: &str, content: String) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    fn tool_result(tool_call_id: String, content: String) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(content),
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ToolCall {
    id: String,
    #[serde(rename = "type", default = "function_kind")]
    kind: String,
    function: FunctionCall,
}

/// Some OpenAI-compatible servers send `"tool_calls": null` instead of leaving the key out.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn function_kind() -> String {
    "function".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

impl OpenAIChatClient {
    pub fn new(config: &LLMConfig) -> Result<Self, CoreError> {
        Ok(Self {
            client: openai_http_client(&config.api_key, config.timeout)?,
            url: endpoint(&config.base_url, "chat/completions"),
            model: config.chat_model.clone(),
            temperature: config.temperature,
        })
    }

    async fn complete(
        &self,
        messages: &[Message],
        definitions: &[ToolDefinition],
        schema: Option<&serde_json::Value>,
    ) -> Result<Message, CoreError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            tools: definitions
                .iter()
                .map(|function| ToolSpec {
                    kind: "function",
                    function,
                })
                .collect(),
            response_format: schema.map(|schema| ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: "recipe",
                    schema,
                    strict: false,
                },
            }),
        };

        let response: ChatCompletionResponse =
            post_json(&self.client, &self.url, &request, "Chat").await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| CoreError::ExternalServiceError("No response from LLM".to_string()))
    }
}

fn initial_messages(request: &ChatRequest) -> Vec<Message> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = &request.system {
        messages.push(Message::text("system", system.clone()));
    }
    messages.push(Message::text("user", request.user.clone()));
    messages
}

/// Runs the callback named by `call` and returns the text handed back to the
/// model. Unknown tools, bad arguments and tool failures are reported to the
/// model as an `error` object.
fn invoke_tool(tools: &[Arc<dyn ToolCallback>], call: &ToolCall) -> String {
    let Some(tool) = tools
        .iter()
        .find(|tool| tool.definition().name == call.function.name)
    else {
        warn!(tool = %call.function.name, "Model requested an unknown tool");
        return json!({ "error": format!("Unknown tool: {}", call.function.name) }).to_string();
    };

    let arguments = if call.function.arguments.trim().is_empty() {
        Ok(json!({}))
    } else {
        serde_json::from_str::<serde_json::Value>(&call.function.arguments)
    };

    let result = match arguments {
        Ok(arguments) => tool.call(&arguments),
        Err(e) => {
            warn!(tool = %call.function.name, "Model sent invalid tool arguments: {}", e);
            return json!({ "error": format!("Invalid arguments: {}", e) }).to_string();
        }
    };

    match result {
        Ok(value) => value.to_string(),
        Err(e) => {
            warn!(tool = %call.function.name, "Tool call failed: {}", e);
            json!({ "error": e.to_string() }).to_string()
        }
    }
}

impl ChatClient for OpenAIChatClient {
    async fn call(&self, request: ChatRequest) -> Result<String, CoreError> {
        let definitions = request
            .tools
            .iter()
            .map(|tool| tool.definition())
            .collect::<Vec<_>>();
        let mut messages = initial_messages(&request);

        for round in 0..=MAX_TOOL_ROUNDS {
            let message = self
                .complete(&messages, &definitions, request.response_schema.as_ref())
                .await?;

            if message.tool_calls.is_empty() {
                return message
                    .content
                    .filter(|content| !content.trim().is_empty())
                    .ok_or_else(|| {
                        tracing::error!("LLM answered without content");
                        CoreError::ExternalServiceError("Empty response from LLM".to_string())
                    });
            }

            if round == MAX_TOOL_ROUNDS {
                break;
            }

            debug!(round, calls = message.tool_calls.len(), "Answering tool calls");
            let results = message
                .tool_calls
                .iter()
                .map(|call| Message::tool_result(call.id.clone(), invoke_tool(&request.tools, call)))
                .collect::<Vec<_>>();
            messages.push(message);
            messages.extend(results);
        }

        tracing::error!("LLM exceeded {} tool call rounds", MAX_TOOL_ROUNDS);
        Err(CoreError::ExternalServiceError(format!(
            "LLM exceeded {} tool call rounds",
            MAX_TOOL_ROUNDS
        )))
    }
}
