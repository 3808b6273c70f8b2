//! Shared utilities for integration testing.
//!
//! `MockBackend` is a scripted in-process `TravelBackend` that records every
//! call so tests can observe writes, end-of-input, half-close and cancellation.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::{self, BoxStream};
use futures_util::{Stream, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use travel_gateway::backend::{BackendError, BackendResult, Backends, EventStream, TravelBackend};
use travel_gateway::chat::{BackendReply, ChatContext, ChatEnvelope};
use travel_gateway::checkout::{CartItem, ItemCode, PurchaseSummary};
use travel_gateway::config::GatewayConfig;
use travel_gateway::monitor::{FlightStatus, MonitorEvent};
use travel_gateway::search::{Flight, FlightCriteria, FlightResults, Hotel, HotelCriteria, HotelResults};
use travel_gateway::{HttpServer, Shutdown};

/// Scripted backend double.
pub struct MockBackend<C, R> {
    service: &'static str,
    results: R,
    failure: Option<BackendError>,
    /// Non-empty makes checkout answer `sucesso = false` with these errors.
    checkout_errors: Vec<String>,
    /// Items yielded by every status stream, in order.
    status_script: Vec<BackendResult<MonitorEvent>>,
    /// Keep status streams open after the script instead of ending them.
    hold_status_open: bool,
    /// Context put on chat replies; `None` sends them untagged.
    chat_tag: Option<ChatContext>,

    pub searches: Mutex<Vec<C>>,
    pub status_calls: Mutex<Vec<String>>,
    pub status_streams_dropped: Arc<AtomicUsize>,
    pub checkout_items: Arc<Mutex<Vec<CartItem>>>,
    pub checkout_ended: Arc<AtomicBool>,
    pub chat_inbound: Arc<Mutex<Vec<ChatEnvelope>>>,
    pub chat_half_closed: Arc<AtomicBool>,
}

impl<C, R> MockBackend<C, R> {
    fn with_results(service: &'static str, results: R) -> Self {
        Self {
            service,
            results,
            failure: None,
            checkout_errors: Vec::new(),
            status_script: Vec::new(),
            hold_status_open: false,
            chat_tag: None,
            searches: Mutex::new(Vec::new()),
            status_calls: Mutex::new(Vec::new()),
            status_streams_dropped: Arc::new(AtomicUsize::new(0)),
            checkout_items: Arc::new(Mutex::new(Vec::new())),
            checkout_ended: Arc::new(AtomicBool::new(false)),
            chat_inbound: Arc::new(Mutex::new(Vec::new())),
            chat_half_closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Every call fails with `BackendError::Unavailable`.
    pub fn unavailable(mut self) -> Self {
        self.failure = Some(BackendError::unavailable(self.service, "any", "connection refused"));
        self
    }

    /// Every call fails with a non-connectivity status.
    pub fn rejecting(mut self, code: tonic::Code, message: &str) -> Self {
        self.failure = Some(BackendError::from_status(
            self.service,
            "any",
            &tonic::Status::new(code, message),
        ));
        self
    }

    pub fn with_checkout_errors(mut self, errors: &[&str]) -> Self {
        self.checkout_errors = errors.iter().map(|e| e.to_string()).collect();
        self
    }

    pub fn with_status_script(mut self, script: Vec<BackendResult<MonitorEvent>>, hold_open: bool) -> Self {
        self.status_script = script;
        self.hold_status_open = hold_open;
        self
    }

    pub fn with_chat_tag(mut self, tag: ChatContext) -> Self {
        self.chat_tag = Some(tag);
        self
    }

    pub fn chat_messages(&self) -> Vec<ChatEnvelope> {
        self.chat_inbound.lock().unwrap().clone()
    }

    pub fn checkout_writes(&self) -> Vec<CartItem> {
        self.checkout_items.lock().unwrap().clone()
    }

    fn check(&self) -> BackendResult<()> {
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl MockBackend<FlightCriteria, FlightResults> {
    pub fn flights(voos: Vec<Flight>) -> Self {
        let total = voos.len() as i32;
        Self::with_results(
            "voos",
            FlightResults {
                voos,
                total_encontrados: total,
                tempo_processamento: Some("12ms".into()),
            },
        )
    }
}

impl MockBackend<HotelCriteria, HotelResults> {
    pub fn hotels(hotels: Vec<Hotel>) -> Self {
        let available = !hotels.is_empty();
        Self::with_results(
            "hotel",
            HotelResults {
                hotels,
                has_availability: available,
            },
        )
    }
}

/// Counts drops of status streams that were not exhausted.
struct TrackedStream {
    inner: EventStream<MonitorEvent>,
    exhausted: bool,
    dropped: Arc<AtomicUsize>,
}

impl Stream for TrackedStream {
    type Item = BackendResult<MonitorEvent>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let poll = self.inner.poll_next_unpin(cx);
        if let Poll::Ready(None) = poll {
            self.exhausted = true;
        }
        poll
    }
}

impl Drop for TrackedStream {
    fn drop(&mut self) {
        if !self.exhausted {
            self.dropped.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl<C, R> TravelBackend for MockBackend<C, R>
where
    C: Send + 'static,
    R: Clone + Send + Sync + 'static,
{
    type Criteria = C;
    type Results = R;

    fn service(&self) -> &'static str {
        self.service
    }

    async fn search(&self, criteria: C) -> BackendResult<R> {
        self.searches.lock().unwrap().push(criteria);
        self.check()?;
        Ok(self.results.clone())
    }

    async fn stream_status(&self, code: String) -> BackendResult<EventStream<MonitorEvent>> {
        self.status_calls.lock().unwrap().push(code.clone());
        self.check()?;

        let script: Vec<BackendResult<MonitorEvent>> = self
            .status_script
            .iter()
            .cloned()
            .map(|item| {
                item.map(|mut event| {
                    event.numero_voo = code.clone();
                    event
                })
            })
            .collect();
        let scripted = stream::iter(script);
        let inner: EventStream<MonitorEvent> = if self.hold_status_open {
            scripted.chain(stream::pending()).boxed()
        } else {
            scripted.boxed()
        };

        Ok(TrackedStream {
            inner,
            exhausted: false,
            dropped: Arc::clone(&self.status_streams_dropped),
        }
        .boxed())
    }

    async fn stream_checkout(&self, mut items: BoxStream<'static, CartItem>) -> BackendResult<PurchaseSummary> {
        self.check()?;
        while let Some(item) = items.next().await {
            self.checkout_items.lock().unwrap().push(item);
        }
        self.checkout_ended.store(true, Ordering::SeqCst);

        let written = self.checkout_writes();
        Ok(PurchaseSummary {
            sucesso: self.checkout_errors.is_empty(),
            codigo_confirmacao: if self.checkout_errors.is_empty() {
                "CONF-001".into()
            } else {
                String::new()
            },
            codigos: written
                .iter()
                .map(|item| ItemCode {
                    tipo: item.tipo.clone(),
                    codigo: format!("{}-{}", item.tipo.to_uppercase(), item.id),
                    valor: item.price(),
                })
                .collect(),
            valor_total: written.iter().map(CartItem::price).sum(),
            total_itens: written.len() as i32,
            erros: self.checkout_errors.clone(),
            timestamp: "2025-03-15T10:00:00Z".into(),
        })
    }

    async fn open_chat(
        &self,
        mut outbound: BoxStream<'static, ChatEnvelope>,
    ) -> BackendResult<EventStream<BackendReply>> {
        self.check()?;
        let (reply_tx, reply_rx) = mpsc::channel(16);
        let service = self.service;
        let tag = self.chat_tag;
        let inbound = Arc::clone(&self.chat_inbound);
        let half_closed = Arc::clone(&self.chat_half_closed);

        tokio::spawn(async move {
            while let Some(envelope) = outbound.next().await {
                inbound.lock().unwrap().push(envelope.clone());
                let reply = BackendReply {
                    usuario: format!("suporte_{service}"),
                    mensagem: format!("[{service}] {}", envelope.mensagem),
                    timestamp: envelope.timestamp.clone(),
                    contexto: tag,
                };
                let _ = reply_tx.send(Ok(reply)).await;
            }
            half_closed.store(true, Ordering::SeqCst);
        });

        Ok(ReceiverStream::new(reply_rx).boxed())
    }
}

pub fn flight(id: &str, preco: f64, data: &str) -> Flight {
    Flight {
        id: id.into(),
        origem: "GRU".into(),
        destino: "SSA".into(),
        data: data.into(),
        horario_partida: "08:00".into(),
        horario_chegada: "10:30".into(),
        preco,
        companhia_aerea: "LATAM".into(),
        numero_voo: format!("LA{id}"),
        assentos_disponiveis: 42,
        status: "disponivel".into(),
        classe_economica: "Econômica".into(),
        aeronave: "A320".into(),
        duracao_minutos: 150,
        stay: None,
    }
}

pub fn hotel(id: &str, price: f64) -> Hotel {
    Hotel {
        id: id.into(),
        name: format!("Hotel {id}"),
        city: "Salvador".into(),
        stars: 4,
        price,
        available: true,
        amenities: vec!["wifi".into(), "piscina".into()],
        accommodation_type: "hotel".into(),
        stay: None,
    }
}

pub fn status(raw: &str, progress: i32) -> BackendResult<MonitorEvent> {
    Ok(MonitorEvent {
        numero_voo: String::new(),
        status: FlightStatus::from(raw),
        mensagem: format!("Status: {raw}"),
        timestamp: "2025-03-15T10:00:00Z".into(),
        progresso_percentual: progress,
    })
}

pub type FlightMock = MockBackend<FlightCriteria, FlightResults>;
pub type HotelMock = MockBackend<HotelCriteria, HotelResults>;

pub fn backends(flights: &Arc<FlightMock>, hotels: &Arc<HotelMock>) -> Backends {
    Backends::new(flights.clone(), hotels.clone())
}

/// Start the gateway on an ephemeral port.
pub async fn start_gateway(backends: Backends) -> (SocketAddr, Shutdown) {
    start_gateway_with(backends, test_config()).await
}

/// Default configuration with a short chat greeting delay.
pub fn test_config() -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.chat.greeting_delay_ms = 20;
    config
}

/// Serves `backends` on an ephemeral port. Dropping the returned `Shutdown` stops the server.
pub async fn start_gateway_with(backends: Backends, config: GatewayConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, backends);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Poll `condition` until it holds, failing the test after two seconds.
pub async fn eventually(what: &str, condition: impl Fn() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {what}");
}
