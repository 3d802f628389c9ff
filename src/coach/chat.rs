//! Coach chat - multi-turn conversation with a fixed persona

use tracing::debug;

use super::CoachError;
use super::gemini::{Content, GeminiClient, GenerateRequest};

const SYSTEM_INSTRUCTION: &str = "You are MygymTracky, a friendly and motivational AI fitness coach. \
     Help users with their workout plans, nutrition advice, and fitness questions. \
     Keep your answers concise, encouraging, and easy to understand.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

/// Messages shown in the coach panel
#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage { role: Role::User, text: text.into() });
    }

    pub fn push_model(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage { role: Role::Model, text: text.into() });
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Conversation state sent with every turn
pub struct ChatSession {
    client: GeminiClient,
    history: Vec<Content>,
}

impl ChatSession {
    pub fn new(client: GeminiClient) -> Self {
        Self { client, history: Vec::new() }
    }

    /// Send one user turn. History only grows when the model answers.
    pub async fn send(&mut self, message: &str) -> Result<String, CoachError> {
        let mut contents = self.history.clone();
        contents.push(Content::user(message));

        let request = GenerateRequest {
            contents,
            system_instruction: Some(Content {
                role: None,
                parts: vec![super::Part::text(SYSTEM_INSTRUCTION)],
            }),
            ..Default::default()
        };

        let reply = self.client.generate(&request).await?.text()?;
        self.history.push(Content::user(message));
        self.history.push(Content::model(reply.clone()));
        debug!(turns = self.history.len() / 2, "chat turn complete");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coach::CoachSettings;
    use httpmock::prelude::*;
    use serde_json::json;

    const PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

    fn session(server: &MockServer) -> ChatSession {
        ChatSession::new(GeminiClient::new(CoachSettings {
            api_key: Some("k".into()),
            base_url: server.base_url(),
            ..CoachSettings::default()
        }))
    }

    #[tokio::test]
    async fn test_history_grows_on_success() {
        let server = MockServer::start_async().await;
        let m = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(PATH)
                    .body_contains("systemInstruction")
                    .body_contains("MygymTracky");
                then.status(200).json_body(json!({
                    "candidates": [{ "content": { "role": "model", "parts": [{ "text": "Try leg swings." }] } }]
                }));
            })
            .await;

        let mut chat = session(&server);
        let reply = chat.send("Warm-up for leg day?").await.unwrap();
        assert_eq!(reply, "Try leg swings.");
        assert_eq!(chat.history.len(), 2);
        assert_eq!(chat.history[1].role.as_deref(), Some("model"));

        chat.send("And after?").await.unwrap();
        assert_eq!(chat.history.len(), 4);
        m.assert_hits_async(2).await;
    }

    #[tokio::test]
    async fn test_history_untouched_on_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(PATH);
                then.status(500).body("boom");
            })
            .await;

        let mut chat = session(&server);
        assert!(chat.send("hello").await.is_err());
        assert!(chat.history.is_empty());
    }

    #[test]
    fn test_chat_log_roles() {
        let mut log = ChatLog::default();
        assert!(log.is_empty());
        log.push_user("hi");
        log.push_model("hello!");
        assert_eq!(log.messages()[0].role, Role::User);
        assert_eq!(log.messages()[1].text, "hello!");
    }
}
