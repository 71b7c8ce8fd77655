use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_history: Vec<Message>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
    pub conversation_history: Vec<Message>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

// Role-tagged message layout used by the remote chat API: each content
// string is wrapped as a single `{text}` block.
#[derive(Debug, Serialize)]
pub struct ContentBlock {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Serialize)]
pub struct ApiPayload {
    pub messages: Vec<ApiMessage>,
}

impl From<&Message> for ApiMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role,
            content: vec![ContentBlock {
                text: message.content.clone(),
            }],
        }
    }
}

impl ApiPayload {
    pub fn from_conversation(messages: &[Message]) -> Self {
        Self {
            messages: messages.iter().map(ApiMessage::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn history_defaults_to_empty() {
        let req: ChatRequest = serde_json::from_str(r#"{"message":"hi"}"#).unwrap();
        assert_eq!(req.message, "hi");
        assert!(req.conversation_history.is_empty());
    }

    #[test]
    fn unknown_role_is_rejected() {
        let res = serde_json::from_str::<ChatRequest>(
            r#"{"message":"hi","conversationHistory":[{"role":"system","content":"x"}]}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn conversation_reshapes_into_text_blocks() {
        let payload = ApiPayload::from_conversation(&[
            Message::user("hello"),
            Message::assistant("hi there"),
        ]);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "messages": [
                    { "role": "user", "content": [{ "text": "hello" }] },
                    { "role": "assistant", "content": [{ "text": "hi there" }] }
                ]
            })
        );
    }
}
