//! One client chat connection fanned out to both backend chat streams.
//!
//! # Responsibilities
//! - Open one bidirectional stream per backend when the client connects
//! - Queue the greeting after a fixed delay
//! - Route each client message by context, one handler per context
//! - Merge backend replies into a single outbound queue, tagging untagged ones
//!
//! # Design Decisions
//! - Each backend leg is its own task, so order is kept per stream only
//! - Closing a session only drops the senders: both calls are half-closed and
//!   their pending replies are drained, not cancelled

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use uuid::Uuid;

use crate::backend::{Backends, TravelBackend};
use crate::chat::classifier::classify;
use crate::chat::types::{ChatContext, ChatEnvelope, ClientMessage};
use crate::config::ChatConfig;
use crate::observability::metrics;

const GREETING_SENDER: &str = "suporte";
const GREETING_TEXT: &str =
    "Olá! Como posso ajudar você hoje? Posso ajudar com voos, hotéis ou pacotes.";
const CLIENT_SENDER: &str = "cliente";

/// Opens chat sessions against the shared backend handles.
#[derive(Debug, Clone)]
pub struct ChatMultiplexer {
    backends: Backends,
    greeting_delay: Duration,
    buffer_size: usize,
}

impl ChatMultiplexer {
    pub fn new(backends: Backends, config: &ChatConfig) -> Self {
        Self {
            backends,
            greeting_delay: Duration::from_millis(config.greeting_delay_ms),
            buffer_size: config.buffer_size.max(1),
        }
    }

    /// Opens both backend legs and returns the session plus the queue of
    /// envelopes to deliver to the client.
    pub fn open(&self) -> (ChatSession, mpsc::Receiver<ChatEnvelope>) {
        let id = Uuid::new_v4();
        let (client_tx, client_rx) = mpsc::channel(self.buffer_size);
        let (flight_tx, flight_rx) = mpsc::channel(self.buffer_size);
        let (hotel_tx, hotel_rx) = mpsc::channel(self.buffer_size);

        spawn_leg(
            id,
            Arc::clone(&self.backends.flights),
            ChatContext::Flight,
            flight_rx,
            client_tx.clone(),
        );
        spawn_leg(
            id,
            Arc::clone(&self.backends.hotels),
            ChatContext::Hotel,
            hotel_rx,
            client_tx.clone(),
        );

        let delay = self.greeting_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let greeting = ChatEnvelope::new(GREETING_SENDER, GREETING_TEXT, ChatContext::General);
            let _ = client_tx.send(greeting).await;
        });

        metrics::chat_session_opened();
        tracing::info!(session = %id, "Chat session opened");

        let session = ChatSession {
            id,
            flights: flight_tx,
            hotels: hotel_tx,
        };
        (session, client_rx)
    }
}

/// Drives one backend chat call until the backend finishes it.
fn spawn_leg<B>(
    session: Uuid,
    backend: Arc<B>,
    context: ChatContext,
    inbound: mpsc::Receiver<ChatEnvelope>,
    client: mpsc::Sender<ChatEnvelope>,
) where
    B: TravelBackend + ?Sized + 'static,
{
    tokio::spawn(async move {
        let service = backend.service();
        let mut replies = match backend.open_chat(ReceiverStream::new(inbound).boxed()).await {
            Ok(replies) => replies,
            Err(err) => {
                tracing::warn!(session = %session, service, error = %err, "Chat stream could not be opened");
                return;
            }
        };

        let mut client_open = true;
        while let Some(reply) = replies.next().await {
            match reply {
                Ok(reply) if client_open => {
                    if client.send(reply.tagged(context)).await.is_err() {
                        client_open = false;
                        tracing::debug!(session = %session, service, "Client gone, draining chat replies");
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(session = %session, service, error = %err, "Chat stream failed");
                    break;
                }
            }
        }
        tracing::debug!(session = %session, service, "Chat stream closed");
    });
}

/// The inbound side of one client chat connection.
#[derive(Debug)]
pub struct ChatSession {
    id: Uuid,
    flights: mpsc::Sender<ChatEnvelope>,
    hotels: mpsc::Sender<ChatEnvelope>,
}

impl ChatSession {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Handles one raw text frame. Malformed payloads are logged and dropped.
    pub async fn handle_text(&self, raw: &str) -> Option<ChatContext> {
        match serde_json::from_str::<ClientMessage>(raw) {
            Ok(message) => Some(self.dispatch(message).await),
            Err(err) => {
                tracing::warn!(session = %self.id, error = %err, "Dropping malformed chat payload");
                None
            }
        }
    }

    /// Classifies a client message and forwards it. Returns the context it was tagged with.
    pub async fn dispatch(&self, message: ClientMessage) -> ChatContext {
        let context = classify(&message.mensagem);
        let sender = message.usuario.unwrap_or_else(|| CLIENT_SENDER.to_string());
        let envelope = ChatEnvelope::new(sender, message.mensagem, context);

        match context {
            ChatContext::Package => self.route_package(envelope).await,
            ChatContext::Flight => self.route_flight(envelope).await,
            ChatContext::Hotel => self.route_hotel(envelope).await,
            ChatContext::General => self.route_general(envelope).await,
        }
        context
    }

    async fn route_package(&self, envelope: ChatEnvelope) {
        self.forward(&self.flights, "voos", envelope.clone()).await;
        self.forward(&self.hotels, "hotel", envelope).await;
    }

    async fn route_flight(&self, envelope: ChatEnvelope) {
        self.forward(&self.flights, "voos", envelope).await;
    }

    async fn route_hotel(&self, envelope: ChatEnvelope) {
        self.forward(&self.hotels, "hotel", envelope).await;
    }

    /// Unrecognised text goes to both backends tagged `geral`.
    async fn route_general(&self, envelope: ChatEnvelope) {
        self.forward(&self.flights, "voos", envelope.clone()).await;
        self.forward(&self.hotels, "hotel", envelope).await;
    }

    async fn forward(&self, leg: &mpsc::Sender<ChatEnvelope>, service: &'static str, envelope: ChatEnvelope) {
        if leg.send(envelope).await.is_err() {
            tracing::debug!(session = %self.id, service, "Chat stream already closed, message dropped");
        }
    }

    /// Ends the session. Consuming `self` drops both outbound senders, which
    /// half-closes the backend streams; replies already in flight keep draining.
    pub fn close(self) {
        tracing::info!(session = %self.id, "Chat session closed");
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        metrics::chat_session_closed();
    }
}
