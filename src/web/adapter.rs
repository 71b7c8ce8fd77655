use std::collections::BTreeMap;

use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::RelayConfig;
use crate::error::{RelayError, RelayResult};
use crate::model::{GenerationClient, GenerationParams};
use crate::web::models::{ApiPayload, ChatRequest, ChatResponse, ErrorResponse, Message};

pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    (
        "Access-Control-Allow-Headers",
        "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token",
    ),
    ("Access-Control-Allow-Methods", "OPTIONS,POST"),
];

/// What the HTTP trigger hands to the adapter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TriggerEvent {
    pub body: Option<String>,
}

impl TriggerEvent {
    /// An empty body is absent; anything else must be valid UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> RelayResult<Self> {
        if bytes.is_empty() {
            return Ok(Self { body: None });
        }
        let body = String::from_utf8(bytes.to_vec()).map_err(|e| {
            RelayError::MalformedRequest(format!("request body is not valid UTF-8: {}", e))
        })?;
        Ok(Self { body: Some(body) })
    }
}

/// What the adapter hands back to the HTTP trigger.
#[derive(Debug, Clone, Serialize)]
pub struct TriggerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl TriggerResponse {
    fn new(status_code: u16, body: String) -> Self {
        let mut headers: BTreeMap<String, String> = CORS_HEADERS
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self {
            status_code,
            headers,
            body,
        }
    }

    pub fn success(reply: &ChatResponse) -> Self {
        Self::new(200, json!(reply).to_string())
    }

    pub fn failure(status_code: u16, message: &str) -> Self {
        let envelope = ErrorResponse {
            success: false,
            error: message.to_string(),
        };
        Self::new(status_code, json!(envelope).to_string())
    }
}

/// Handles one chat invocation. Always produces a response: 200 with the
/// updated conversation, or 500 with the stringified error.
pub async fn handle(config: &RelayConfig, event: &TriggerEvent) -> TriggerResponse {
    let client = GenerationClient::new(&config.api_url);

    match relay(&client, &config.params, event).await {
        Ok(reply) => TriggerResponse::success(&reply),
        Err(e) => reject(e),
    }
}

/// Decodes a raw HTTP body into an event, then handles it.
pub async fn handle_bytes(config: &RelayConfig, bytes: &[u8]) -> TriggerResponse {
    match TriggerEvent::from_bytes(bytes) {
        Ok(event) => handle(config, &event).await,
        Err(e) => reject(e),
    }
}

fn reject(e: RelayError) -> TriggerResponse {
    error!("Error ({}): {}", e.kind(), e);
    TriggerResponse::failure(500, &e.to_string())
}

fn parse_request(body: Option<&str>) -> RelayResult<ChatRequest> {
    let body = body
        .ok_or_else(|| RelayError::MalformedRequest("request body is missing".to_string()))?;
    serde_json::from_str(body).map_err(|e| RelayError::MalformedRequest(e.to_string()))
}

async fn relay(
    client: &GenerationClient,
    params: &GenerationParams,
    event: &TriggerEvent,
) -> RelayResult<ChatResponse> {
    let ChatRequest {
        message,
        conversation_history,
    } = parse_request(event.body.as_deref())?;

    info!("Processing message: {}", message);

    let mut messages = conversation_history;
    messages.push(Message::user(message.as_str()));

    // Only the latest message goes upstream as the prompt; the structured
    // conversation is built for logging and is not sent.
    let payload = ApiPayload::from_conversation(&messages);
    debug!("Structured chat payload: {}", json!(payload));

    debug!("Calling generation server at {}", client.api_url());
    let result = client.generate(&message, params).await?;
    debug!("Generation result: {}", json!(result));

    let reply = result
        .generated_text()
        .ok_or_else(|| {
            RelayError::UpstreamResponseMalformed("missing `generated_text`".to_string())
        })?
        .to_string();

    messages.push(Message::assistant(reply.as_str()));

    Ok(ChatResponse {
        success: true,
        response: reply,
        conversation_history: messages,
    })
}
