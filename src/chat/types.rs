//! Chat envelopes and context tags.

use serde::{Deserialize, Serialize};

/// Which backend(s) a chat message is addressed to, or came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChatContext {
    #[serde(rename = "voo")]
    Flight,
    #[serde(rename = "hotel")]
    Hotel,
    #[serde(rename = "pacote")]
    Package,
    #[serde(rename = "geral")]
    General,
}

impl ChatContext {
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Flight => "voo",
            Self::Hotel => "hotel",
            Self::Package => "pacote",
            Self::General => "geral",
        }
    }

    /// Parses a wire tag. Empty or unknown tags yield `None`.
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw {
            "voo" => Some(Self::Flight),
            "hotel" => Some(Self::Hotel),
            "pacote" => Some(Self::Package),
            "geral" => Some(Self::General),
            _ => None,
        }
    }
}

/// A chat message carrying exactly one context tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEnvelope {
    pub usuario: String,
    pub mensagem: String,
    pub timestamp: String,
    pub contexto: ChatContext,
}

impl ChatEnvelope {
    pub fn new(usuario: impl Into<String>, mensagem: impl Into<String>, contexto: ChatContext) -> Self {
        Self {
            usuario: usuario.into(),
            mensagem: mensagem.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            contexto,
        }
    }
}

/// A message typed by the browser client. Only `mensagem` is required.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientMessage {
    pub mensagem: String,
    #[serde(default)]
    pub usuario: Option<String>,
}

/// A message received from a backend chat stream, possibly untagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendReply {
    pub usuario: String,
    pub mensagem: String,
    pub timestamp: String,
    pub contexto: Option<ChatContext>,
}

impl BackendReply {
    /// Fills in `fallback` when the backend did not tag the reply.
    pub fn tagged(self, fallback: ChatContext) -> ChatEnvelope {
        ChatEnvelope {
            usuario: self.usuario,
            mensagem: self.mensagem,
            timestamp: self.timestamp,
            contexto: self.contexto.unwrap_or(fallback),
        }
    }
}
