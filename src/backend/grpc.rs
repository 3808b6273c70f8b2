//! `TravelBackend` implementations over tonic channels.
//!
//! # Responsibilities
//! - Translate criteria, cart items and chat envelopes into wire messages
//! - Translate responses and stream items back into gateway types
//! - Classify and log every failed call with its identifying parameter
//!
//! Client-streaming and bidirectional calls are started from plain functions
//! returning a boxed `Send` future, so the outbound stream is already a
//! concrete `BoxStream` when the call future is built.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use futures_util::stream::{self, BoxStream, StreamExt, TryStreamExt};
use tonic::transport::{Channel, Endpoint};
use tonic::{Response, Status, Streaming};

use crate::backend::client::TravelBackend;
use crate::backend::proto::hotel::{self, hotel_service_client::HotelServiceClient};
use crate::backend::proto::voos::{self, voos_service_client::VoosServiceClient};
use crate::backend::proto::{ChatMessage, ItemCarrinho, RespostaCompra, StatusUpdate};
use crate::backend::types::{BackendError, BackendResult, EventStream};
use crate::chat::types::{BackendReply, ChatContext, ChatEnvelope};
use crate::checkout::types::{CartItem, ItemCode, PurchaseSummary};
use crate::monitor::types::MonitorEvent;
use crate::observability::metrics;
use crate::search::types::{
    Flight, FlightCriteria, FlightResults, Hotel, HotelCriteria, HotelResults,
};

const FLIGHT_SERVICE: &str = "voos";
const HOTEL_SERVICE: &str = "hotel";
const DATE_FORMAT: &str = "%Y-%m-%d";

type CheckoutCall = BoxFuture<'static, Result<Response<RespostaCompra>, Status>>;
type ChatCall = BoxFuture<'static, Result<Response<Streaming<ChatMessage>>, Status>>;

/// Builds a channel that connects on first use.
///
/// Accepts `host:port` or a full `http://` URI.
pub fn lazy_channel(address: &str, connect_timeout: Duration) -> Result<Channel, tonic::transport::Error> {
    let uri = if address.contains("://") {
        address.to_string()
    } else {
        format!("http://{address}")
    };
    let endpoint = Endpoint::from_shared(uri)?.connect_timeout(connect_timeout);
    Ok(endpoint.connect_lazy())
}

/// Logs and classifies a failed call.
fn call_failed(
    service: &'static str,
    operation: &'static str,
    target: &str,
    status: &Status,
) -> BackendError {
    let error = BackendError::from_status(service, operation, status);
    metrics::record_backend_call(service, operation, false);
    tracing::warn!(
        service,
        operation,
        target = %target,
        code = ?status.code(),
        error = %error,
        "Backend call failed"
    );
    error
}

fn cart_messages(items: BoxStream<'static, CartItem>) -> Outbound<ItemCarrinho> {
    Outbound(items.map(ItemCarrinho::from).boxed())
}

fn chat_messages(outbound: BoxStream<'static, ChatEnvelope>) -> Outbound<ChatMessage> {
    Outbound(outbound.map(ChatMessage::from).boxed())
}

/// Named wrapper around an outbound message stream, so the `Send` check on
/// the call futures sees a concrete type rather than a boxed trait object.
struct Outbound<T>(BoxStream<'static, T>);

impl<T> futures_util::Stream for Outbound<T> {
    type Item = T;

    fn poll_next(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<T>> {
        self.0.poll_next_unpin(cx)
    }
}

/// Awaits the summary of a checkout call.
async fn finish_checkout(
    service: &'static str,
    call: CheckoutCall,
) -> BackendResult<PurchaseSummary> {
    const OP: &str = "FinalizarCompra";
    let response = call
        .await
        .map_err(|status| call_failed(service, OP, "cart", &status))?;
    metrics::record_backend_call(service, OP, true);
    Ok(purchase_summary(response.into_inner()))
}

/// Turns a pending chat call into a reply stream that opens on first poll.
fn chat_replies(service: &'static str, call: ChatCall) -> EventStream<BackendReply> {
    const OP: &str = "ChatSuporte";
    let opened = async move {
        match call.await {
            Ok(response) => {
                metrics::record_backend_call(service, OP, true);
                Ok(response
                    .into_inner()
                    .map_ok(BackendReply::from)
                    .map_err(move |status| call_failed(service, OP, "session", &status)))
            }
            Err(status) => Err(call_failed(service, OP, "session", &status)),
        }
    };
    stream::once(opened).try_flatten().boxed()
}

/// Maps a status stream into monitor events for `code`.
fn status_events(
    service: &'static str,
    operation: &'static str,
    updates: Streaming<StatusUpdate>,
    code: String,
) -> EventStream<MonitorEvent> {
    updates
        .map(move |item| match item {
            Ok(update) => Ok(monitor_event(update, &code)),
            Err(status) => Err(call_failed(service, operation, &code, &status)),
        })
        .boxed()
}

/// Flight backend reached through `voos.VoosService`.
#[derive(Debug, Clone)]
pub struct GrpcFlightBackend {
    client: VoosServiceClient<Channel>,
}

impl GrpcFlightBackend {
    pub fn new(channel: Channel) -> Self {
        Self {
            client: VoosServiceClient::new(channel),
        }
    }

    fn checkout_call(&self, items: BoxStream<'static, CartItem>) -> CheckoutCall {
        let mut client = self.client.clone();
        let outbound = cart_messages(items);
        Box::pin(async move { client.finalizar_compra(outbound).await })
    }

    fn chat_call(&self, outbound: BoxStream<'static, ChatEnvelope>) -> ChatCall {
        let mut client = self.client.clone();
        let outbound = chat_messages(outbound);
        Box::pin(async move { client.chat_suporte(outbound).await })
    }
}

#[async_trait]
impl TravelBackend for GrpcFlightBackend {
    type Criteria = FlightCriteria;
    type Results = FlightResults;

    fn service(&self) -> &'static str {
        FLIGHT_SERVICE
    }

    async fn search(&self, criteria: FlightCriteria) -> BackendResult<FlightResults> {
        const OP: &str = "ConsultarVoos";
        let target = format!("{}-{}", criteria.origin, criteria.destination);
        let mut client = self.client.clone();
        let response = client
            .consultar_voos(voos::ConsultaVoosRequest::from(&criteria))
            .await
            .map_err(|status| call_failed(FLIGHT_SERVICE, OP, &target, &status))?
            .into_inner();
        metrics::record_backend_call(FLIGHT_SERVICE, OP, true);

        Ok(FlightResults {
            voos: response.voos.into_iter().map(Flight::from).collect(),
            total_encontrados: response.total_encontrados,
            tempo_processamento: Some(response.tempo_processamento).filter(|t| !t.is_empty()),
        })
    }

    async fn stream_status(&self, code: String) -> BackendResult<EventStream<MonitorEvent>> {
        const OP: &str = "MonitorarVoo";
        let mut client = self.client.clone();
        let updates = client
            .monitorar_voo(voos::MonitorarVooRequest {
                numero_voo: code.clone(),
            })
            .await
            .map_err(|status| call_failed(FLIGHT_SERVICE, OP, &code, &status))?
            .into_inner();
        metrics::record_backend_call(FLIGHT_SERVICE, OP, true);
        Ok(status_events(FLIGHT_SERVICE, OP, updates, code))
    }

    async fn stream_checkout(
        &self,
        items: BoxStream<'static, CartItem>,
    ) -> BackendResult<PurchaseSummary> {
        finish_checkout(FLIGHT_SERVICE, self.checkout_call(items)).await
    }

    /// Does not wait for response headers, so a slow backend only delays its
    /// own half of the conversation.
    async fn open_chat(
        &self,
        outbound: BoxStream<'static, ChatEnvelope>,
    ) -> BackendResult<EventStream<BackendReply>> {
        Ok(chat_replies(FLIGHT_SERVICE, self.chat_call(outbound)))
    }
}

/// Hotel backend reached through `hotel.HotelService`. Also the checkout authority.
#[derive(Debug, Clone)]
pub struct GrpcHotelBackend {
    client: HotelServiceClient<Channel>,
}

impl GrpcHotelBackend {
    pub fn new(channel: Channel) -> Self {
        Self {
            client: HotelServiceClient::new(channel),
        }
    }

    fn checkout_call(&self, items: BoxStream<'static, CartItem>) -> CheckoutCall {
        let mut client = self.client.clone();
        let outbound = cart_messages(items);
        Box::pin(async move { client.finalizar_compra(outbound).await })
    }

    fn chat_call(&self, outbound: BoxStream<'static, ChatEnvelope>) -> ChatCall {
        let mut client = self.client.clone();
        let outbound = chat_messages(outbound);
        Box::pin(async move { client.chat_suporte(outbound).await })
    }
}

#[async_trait]
impl TravelBackend for GrpcHotelBackend {
    type Criteria = HotelCriteria;
    type Results = HotelResults;

    fn service(&self) -> &'static str {
        HOTEL_SERVICE
    }

    async fn search(&self, criteria: HotelCriteria) -> BackendResult<HotelResults> {
        const OP: &str = "SearchHotels";
        let mut client = self.client.clone();
        let response = client
            .search_hotels(hotel::SearchHotelsRequest::from(&criteria))
            .await
            .map_err(|status| call_failed(HOTEL_SERVICE, OP, &criteria.city, &status))?
            .into_inner();
        metrics::record_backend_call(HOTEL_SERVICE, OP, true);

        Ok(HotelResults {
            hotels: response.hotels.into_iter().map(Hotel::from).collect(),
            has_availability: response.has_availability,
        })
    }

    async fn stream_status(&self, code: String) -> BackendResult<EventStream<MonitorEvent>> {
        const OP: &str = "MonitorarReserva";
        let mut client = self.client.clone();
        let updates = client
            .monitorar_reserva(hotel::MonitorarReservaRequest {
                codigo_reserva: code.clone(),
            })
            .await
            .map_err(|status| call_failed(HOTEL_SERVICE, OP, &code, &status))?
            .into_inner();
        metrics::record_backend_call(HOTEL_SERVICE, OP, true);
        Ok(status_events(HOTEL_SERVICE, OP, updates, code))
    }

    async fn stream_checkout(
        &self,
        items: BoxStream<'static, CartItem>,
    ) -> BackendResult<PurchaseSummary> {
        finish_checkout(HOTEL_SERVICE, self.checkout_call(items)).await
    }

    async fn open_chat(
        &self,
        outbound: BoxStream<'static, ChatEnvelope>,
    ) -> BackendResult<EventStream<BackendReply>> {
        Ok(chat_replies(HOTEL_SERVICE, self.chat_call(outbound)))
    }
}

fn format_date(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

impl From<&FlightCriteria> for voos::ConsultaVoosRequest {
    fn from(criteria: &FlightCriteria) -> Self {
        Self {
            origem: criteria.origin.clone(),
            destino: criteria.destination.clone(),
            data: format_date(criteria.date),
            preco_max: criteria.max_price.unwrap_or(0.0),
            companhia_aerea: criteria.carrier.clone().unwrap_or_default(),
            faixa_horario: criteria
                .time_band
                .map(|band| band.as_wire().to_string())
                .unwrap_or_default(),
            ordenacao: criteria.sort.as_wire().to_string(),
            classe: criteria.cabin.clone().unwrap_or_default(),
            passageiros: i32::try_from(criteria.passengers).unwrap_or(i32::MAX),
        }
    }
}

impl From<&HotelCriteria> for hotel::SearchHotelsRequest {
    fn from(criteria: &HotelCriteria) -> Self {
        Self {
            city: criteria.city.clone(),
            min_stars: i32::from(criteria.min_stars),
            max_stars: 0,
            min_price: 0.0,
            max_price: criteria.max_price.unwrap_or(0.0),
            accommodation_type: criteria.accommodation_type.clone().unwrap_or_default(),
            order_by: criteria.sort.as_wire().to_string(),
            delay_seconds: i32::try_from(criteria.delay_seconds).unwrap_or(i32::MAX),
            checkin: format_date(criteria.checkin),
            checkout: format_date(criteria.checkout),
            rooms: i32::try_from(criteria.rooms).unwrap_or(i32::MAX),
            guests: i32::try_from(criteria.guests).unwrap_or(i32::MAX),
        }
    }
}

impl From<voos::Voo> for Flight {
    fn from(voo: voos::Voo) -> Self {
        Self {
            id: voo.id,
            origem: voo.origem,
            destino: voo.destino,
            data: voo.data,
            horario_partida: voo.horario_partida,
            horario_chegada: voo.horario_chegada,
            preco: voo.preco,
            companhia_aerea: voo.companhia_aerea,
            numero_voo: voo.numero_voo,
            assentos_disponiveis: voo.assentos_disponiveis,
            status: voo.status,
            classe_economica: voo.classe_economica,
            aeronave: voo.aeronave,
            duracao_minutos: voo.duracao_minutos,
            stay: None,
        }
    }
}

impl From<hotel::Hotel> for Hotel {
    fn from(hotel: hotel::Hotel) -> Self {
        Self {
            id: hotel.id,
            name: hotel.name,
            city: hotel.city,
            stars: hotel.stars,
            price: hotel.price,
            available: hotel.available,
            amenities: hotel.amenities,
            accommodation_type: hotel.accommodation_type,
            stay: None,
        }
    }
}

fn monitor_event(update: StatusUpdate, requested: &str) -> MonitorEvent {
    MonitorEvent {
        numero_voo: if update.codigo.is_empty() {
            requested.to_string()
        } else {
            update.codigo
        },
        status: update.status.into(),
        mensagem: update.mensagem,
        timestamp: update.timestamp,
        progresso_percentual: update.progresso_percentual,
    }
}

impl From<CartItem> for ItemCarrinho {
    fn from(item: CartItem) -> Self {
        Self {
            detalhes: item.payload(),
            preco: item.price(),
            tipo: item.tipo,
            id: item.id,
        }
    }
}

fn purchase_summary(response: RespostaCompra) -> PurchaseSummary {
    PurchaseSummary {
        sucesso: response.sucesso,
        codigo_confirmacao: response.codigo_confirmacao,
        codigos: response
            .codigos
            .into_iter()
            .map(|code| ItemCode {
                tipo: code.tipo,
                codigo: code.codigo,
                valor: code.valor,
            })
            .collect(),
        valor_total: response.valor_total,
        total_itens: response.total_itens,
        erros: response.erros,
        timestamp: response.timestamp,
    }
}

impl From<ChatEnvelope> for ChatMessage {
    fn from(envelope: ChatEnvelope) -> Self {
        Self {
            contexto: envelope.contexto.as_wire().to_string(),
            usuario: envelope.usuario,
            mensagem: envelope.mensagem,
            timestamp: envelope.timestamp,
        }
    }
}

impl From<ChatMessage> for BackendReply {
    fn from(message: ChatMessage) -> Self {
        Self {
            contexto: ChatContext::from_wire(&message.contexto),
            usuario: message.usuario,
            mensagem: message.mensagem,
            timestamp: message.timestamp,
        }
    }
}
