use crate::error::{ResonanceError, ResonanceResult};

/// Default endpoint, matching the development server. Override it through
/// [`ChatSession::connect`] when deploying against anything else.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/api/chat";

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Sender {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "ai")]
    Assistant,
}

/// One entry of the transcript. Messages only exist in session memory;
/// nothing is persisted.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

/// The identity the server is asked to answer as.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Persona {
    pub name: String,
    pub task: String,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            name: "Resonance".to_string(),
            task: "assist with creative and technical tasks".to_string(),
        }
    }
}

/// Wire request: persona, the new prompt, and the prior transcript.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChatRequest {
    pub name: String,
    pub task: String,
    pub prompt: String,
    pub history: Vec<Message>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChatReply {
    pub response: String,
}

/// The single round-trip the chat performs. A trait seam so tests can
/// substitute the network with a scripted transport.
pub trait ChatTransport {
    fn post(&self, request: &ChatRequest) -> ResonanceResult<ChatReply>;
}

/// Blocking HTTP POST of the request as JSON. There is exactly one failure
/// kind here: anything that goes wrong (connect, status, body shape) maps to
/// [`ResonanceError::Chat`].
pub struct HttpTransport {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl ChatTransport for HttpTransport {
    fn post(&self, request: &ChatRequest) -> ResonanceResult<ChatReply> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .map_err(|e| ResonanceError::chat(e.to_string()))?;
        response
            .json::<ChatReply>()
            .map_err(|e| ResonanceError::chat(e.to_string()))
    }
}

/// A chat transcript plus the transport used to extend it. One request per
/// message, no retry, no timeout policy beyond the client's defaults.
/// `send` takes `&mut self`, so overlapping in-flight requests cannot occur.
pub struct ChatSession<T = HttpTransport> {
    persona: Persona,
    transport: T,
    history: Vec<Message>,
}

impl ChatSession<HttpTransport> {
    pub fn connect(endpoint: impl Into<String>, persona: Persona) -> Self {
        Self::with_transport(persona, HttpTransport::new(endpoint))
    }
}

impl<T: ChatTransport> ChatSession<T> {
    pub fn with_transport(persona: Persona, transport: T) -> Self {
        Self {
            persona,
            transport,
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Send one message and append the reply.
    ///
    /// Whitespace-only input is a no-op (`Ok(None)`, no request issued). On
    /// transport failure the user entry stays in the transcript and the
    /// error is returned; there is no retry and no rollback.
    #[tracing::instrument(skip(self, input))]
    pub fn send(&mut self, input: &str) -> ResonanceResult<Option<&Message>> {
        if input.trim().is_empty() {
            return Ok(None);
        }

        let request = ChatRequest {
            name: self.persona.name.clone(),
            task: self.persona.task.clone(),
            prompt: input.to_string(),
            history: self.history.clone(),
        };

        self.history.push(Message {
            sender: Sender::User,
            text: input.to_string(),
        });

        match self.transport.post(&request) {
            Ok(reply) => {
                self.history.push(Message {
                    sender: Sender::Assistant,
                    text: reply.response,
                });
                Ok(self.history.last())
            }
            Err(err) => {
                tracing::warn!(error = %err, "chat request failed, keeping user entry");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_serializes_as_user_and_ai() {
        assert_eq!(serde_json::to_string(&Sender::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Sender::Assistant).unwrap(), "\"ai\"");
    }

    #[test]
    fn request_serializes_with_flat_fields() {
        let req = ChatRequest {
            name: "Resonance".into(),
            task: "assist".into(),
            prompt: "hi".into(),
            history: vec![Message {
                sender: Sender::User,
                text: "earlier".into(),
            }],
        };
        let v: serde_json::Value = serde_json::to_value(&req).unwrap();
        assert_eq!(v["name"], "Resonance");
        assert_eq!(v["prompt"], "hi");
        assert_eq!(v["history"][0]["sender"], "user");
        assert_eq!(v["history"][0]["text"], "earlier");
    }

    #[test]
    fn reply_parses_response_field() {
        let reply: ChatReply = serde_json::from_str(r#"{"response":"hello"}"#).unwrap();
        assert_eq!(reply.response, "hello");
    }

    #[test]
    fn default_persona_matches_product_copy() {
        let p = Persona::default();
        assert_eq!(p.name, "Resonance");
        assert!(p.task.starts_with("assist"));
    }
}
