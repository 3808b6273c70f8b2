//! gRPC adapters against in-process tonic services.
//!
//! Each test serves a scripted `VoosService` or `HotelService` on an ephemeral
//! port and drives it through the same lazily connected channels the gateway
//! builds at startup.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::stream::{self, BoxStream};
use futures_util::{StreamExt, TryStreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_stream::wrappers::{ReceiverStream, TcpListenerStream};
use tonic::transport::server::Router;
use tonic::transport::Server;
use tonic::{Request, Response, Status, Streaming};

use travel_gateway::backend::grpc::lazy_channel;
use travel_gateway::backend::proto::hotel::hotel_service_server::{HotelService, HotelServiceServer};
use travel_gateway::backend::proto::voos::voos_service_server::{VoosService, VoosServiceServer};
use travel_gateway::backend::proto::{hotel, voos};
use travel_gateway::backend::proto::{ChatMessage, CodigoItem, ItemCarrinho, RespostaCompra, StatusUpdate};
use travel_gateway::backend::{BackendError, GrpcFlightBackend, GrpcHotelBackend, TravelBackend};
use travel_gateway::chat::{ChatContext, ChatEnvelope};
use travel_gateway::checkout::CartItem;
use travel_gateway::monitor::FlightStatus;
use travel_gateway::search::{FlightCriteria, HotelCriteria};

type ReplyStream<T> = BoxStream<'static, Result<T, Status>>;

fn update(codigo: &str, status: &str, progresso: i32) -> StatusUpdate {
    StatusUpdate {
        codigo: codigo.into(),
        status: status.into(),
        mensagem: format!("Status {status}"),
        timestamp: "2025-03-15T10:00:00Z".into(),
        progresso_percentual: progresso,
    }
}

/// Confirms every received item in arrival order.
fn receipt(items: &[ItemCarrinho]) -> RespostaCompra {
    RespostaCompra {
        sucesso: true,
        codigo_confirmacao: "CONF-GRPC".into(),
        valor_total: items.iter().map(|item| item.preco).sum(),
        total_itens: items.len() as i32,
        erros: Vec::new(),
        timestamp: "2025-03-15T10:00:00Z".into(),
        codigos: items
            .iter()
            .map(|item| CodigoItem {
                tipo: item.tipo.clone(),
                codigo: format!("{}-{}", item.tipo.to_uppercase(), item.id),
                valor: item.preco,
            })
            .collect(),
    }
}

/// Answers each chat message until the client half-closes.
fn echo(inbound: Streaming<ChatMessage>, usuario: &'static str, contexto: &'static str) -> ReplyStream<ChatMessage> {
    inbound
        .map_ok(move |message| ChatMessage {
            usuario: usuario.into(),
            mensagem: format!("[{usuario}] {}", message.mensagem),
            timestamp: message.timestamp,
            contexto: contexto.into(),
        })
        .boxed()
}

#[derive(Clone, Default)]
struct FlightService {
    searches: Arc<Mutex<Vec<voos::ConsultaVoosRequest>>>,
    purchases: Arc<Mutex<Vec<ItemCarrinho>>>,
}

#[tonic::async_trait]
impl VoosService for FlightService {
    async fn consultar_voos(
        &self,
        request: Request<voos::ConsultaVoosRequest>,
    ) -> Result<Response<voos::ConsultaVoosResponse>, Status> {
        let request = request.into_inner();
        self.searches.lock().unwrap().push(request.clone());
        if request.origem == "XXX" {
            return Err(Status::invalid_argument("origem desconhecida"));
        }

        let voo = voos::Voo {
            id: "v1".into(),
            origem: request.origem,
            destino: request.destino,
            data: request.data,
            preco: 420.0,
            numero_voo: "LA3456".into(),
            duracao_minutos: 95,
            ..Default::default()
        };
        Ok(Response::new(voos::ConsultaVoosResponse {
            voos: vec![voo],
            total_encontrados: 1,
            tempo_processamento: "12ms".into(),
        }))
    }

    type MonitorarVooStream = ReplyStream<StatusUpdate>;

    async fn monitorar_voo(
        &self,
        request: Request<voos::MonitorarVooRequest>,
    ) -> Result<Response<Self::MonitorarVooStream>, Status> {
        let code = request.into_inner().numero_voo;
        let updates = vec![
            Ok(update(&code, "embarcando", 20)),
            Ok(update("", "finalizado", 100)),
        ];
        Ok(Response::new(stream::iter(updates).boxed()))
    }

    async fn finalizar_compra(
        &self,
        request: Request<Streaming<ItemCarrinho>>,
    ) -> Result<Response<RespostaCompra>, Status> {
        let items: Vec<ItemCarrinho> = request.into_inner().try_collect().await?;
        self.purchases.lock().unwrap().extend(items.iter().cloned());
        Ok(Response::new(receipt(&items)))
    }

    type ChatSuporteStream = ReplyStream<ChatMessage>;

    async fn chat_suporte(
        &self,
        request: Request<Streaming<ChatMessage>>,
    ) -> Result<Response<Self::ChatSuporteStream>, Status> {
        Ok(Response::new(echo(request.into_inner(), "suporte_voos", "")))
    }
}

#[derive(Clone, Default)]
struct HotelDesk {
    searches: Arc<Mutex<Vec<hotel::SearchHotelsRequest>>>,
    purchases: Arc<Mutex<Vec<ItemCarrinho>>>,
}

#[tonic::async_trait]
impl HotelService for HotelDesk {
    async fn search_hotels(
        &self,
        request: Request<hotel::SearchHotelsRequest>,
    ) -> Result<Response<hotel::SearchHotelsResponse>, Status> {
        let request = request.into_inner();
        self.searches.lock().unwrap().push(request.clone());

        let hotel = hotel::Hotel {
            id: "h1".into(),
            name: "Pousada do Farol".into(),
            city: request.city,
            stars: 4,
            price: 180.0,
            available: true,
            amenities: vec!["wifi".into(), "cafe".into()],
            accommodation_type: "pousada".into(),
        };
        Ok(Response::new(hotel::SearchHotelsResponse {
            hotels: vec![hotel],
            has_availability: true,
        }))
    }

    type MonitorarReservaStream = ReplyStream<StatusUpdate>;

    async fn monitorar_reserva(
        &self,
        request: Request<hotel::MonitorarReservaRequest>,
    ) -> Result<Response<Self::MonitorarReservaStream>, Status> {
        let code = request.into_inner().codigo_reserva;
        let updates = vec![
            Ok(update(&code, "confirmada", 50)),
            Err(Status::internal("reserva perdida")),
        ];
        Ok(Response::new(stream::iter(updates).boxed()))
    }

    async fn finalizar_compra(
        &self,
        request: Request<Streaming<ItemCarrinho>>,
    ) -> Result<Response<RespostaCompra>, Status> {
        let items: Vec<ItemCarrinho> = request.into_inner().try_collect().await?;
        self.purchases.lock().unwrap().extend(items.iter().cloned());
        Ok(Response::new(receipt(&items)))
    }

    type ChatSuporteStream = ReplyStream<ChatMessage>;

    async fn chat_suporte(
        &self,
        request: Request<Streaming<ChatMessage>>,
    ) -> Result<Response<Self::ChatSuporteStream>, Status> {
        Ok(Response::new(echo(request.into_inner(), "suporte_hotel", "pacote")))
    }
}

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(router.serve_with_incoming(TcpListenerStream::new(listener)));
    addr
}

async fn flight_backend() -> (GrpcFlightBackend, FlightService) {
    let service = FlightService::default();
    let router = Server::builder().add_service(VoosServiceServer::new(service.clone()));
    let addr = serve(router).await;
    let channel = lazy_channel(&addr.to_string(), Duration::from_secs(2)).unwrap();
    (GrpcFlightBackend::new(channel), service)
}

async fn hotel_backend() -> (GrpcHotelBackend, HotelDesk) {
    let desk = HotelDesk::default();
    let router = Server::builder().add_service(HotelServiceServer::new(desk.clone()));
    let addr = serve(router).await;
    let channel = lazy_channel(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();
    (GrpcHotelBackend::new(channel), desk)
}

fn envelope(mensagem: &str, contexto: ChatContext) -> ChatEnvelope {
    ChatEnvelope::new("cliente", mensagem, contexto)
}

#[tokio::test]
async fn test_flight_search_round_trip() {
    let (backend, service) = flight_backend().await;

    let mut criteria = FlightCriteria::route("GRU", "SSA");
    criteria.date = chrono::NaiveDate::from_ymd_opt(2025, 3, 15);
    let results = backend.search(criteria).await.unwrap();

    assert_eq!(results.total_encontrados, 1);
    assert_eq!(results.voos[0].id, "v1");
    assert_eq!(results.voos[0].origem, "GRU");
    assert_eq!(results.voos[0].duracao_minutos, 95);
    assert_eq!(results.tempo_processamento.as_deref(), Some("12ms"));

    let searches = service.searches.lock().unwrap();
    assert_eq!(searches[0].data, "2025-03-15");
    assert_eq!(searches[0].ordenacao, "preco");
}

#[tokio::test]
async fn test_rejected_search_is_not_unavailable() {
    let (backend, _) = flight_backend().await;

    let err = backend.search(FlightCriteria::route("XXX", "SSA")).await.unwrap_err();
    match err {
        BackendError::Rejected { code, message, .. } => {
            assert_eq!(code, tonic::Code::InvalidArgument);
            assert_eq!(message, "origem desconhecida");
        }
        other => panic!("expected a rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn test_hotel_search_round_trip() {
    let (backend, desk) = hotel_backend().await;

    let mut criteria = HotelCriteria::city("Salvador");
    criteria.rooms = 2;
    let results = backend.search(criteria).await.unwrap();

    assert!(results.has_availability);
    assert_eq!(results.hotels[0].city, "Salvador");
    assert_eq!(results.hotels[0].amenities, ["wifi", "cafe"]);
    assert_eq!(desk.searches.lock().unwrap()[0].rooms, 2);
}

#[tokio::test]
async fn test_status_stream_fills_missing_code() {
    let (backend, _) = flight_backend().await;

    let events: Vec<_> = backend
        .stream_status("LA3456".into())
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].status, FlightStatus::Boarding);
    assert_eq!(events[1].numero_voo, "LA3456");
    assert!(events[1].is_terminal());
}

#[tokio::test]
async fn test_reservation_stream_error_is_classified() {
    let (backend, _) = hotel_backend().await;

    let mut events = backend.stream_status("RES-9".into()).await.unwrap();
    let first = events.next().await.unwrap().unwrap();
    assert_eq!(first.numero_voo, "RES-9");

    match events.next().await {
        Some(Err(BackendError::Rejected { code, .. })) => assert_eq!(code, tonic::Code::Internal),
        other => panic!("expected a rejected stream item, got {other:?}"),
    }
}

#[tokio::test]
async fn test_checkout_writes_every_item_in_order() {
    let (backend, desk) = hotel_backend().await;

    let mut hotel_item = CartItem::new("hotel", "h1", 540.5);
    hotel_item.detalhes = serde_json::json!({ "quartos": 2 });
    let items = vec![CartItem::new("voo", "f1", 420.0), hotel_item, CartItem::new("voo", "f2", 380.0)];

    let summary = backend
        .stream_checkout(stream::iter(items).boxed())
        .await
        .unwrap();

    assert!(summary.sucesso);
    assert_eq!(summary.codigo_confirmacao, "CONF-GRPC");
    assert_eq!(summary.total_itens, 3);
    assert_eq!(summary.valor_total, 1340.5);
    let codes: Vec<&str> = summary.codigos.iter().map(|c| c.codigo.as_str()).collect();
    assert_eq!(codes, ["VOO-f1", "HOTEL-h1", "VOO-f2"]);

    let purchases = desk.purchases.lock().unwrap();
    assert_eq!(purchases[1].detalhes, r#"{"quartos":2}"#);
    assert_eq!(purchases[2].preco, 380.0);
}

#[tokio::test]
async fn test_flight_checkout_uses_its_own_service() {
    let (backend, service) = flight_backend().await;

    let summary = backend
        .stream_checkout(stream::iter(vec![CartItem::new("voo", "f9", 99.0)]).boxed())
        .await
        .unwrap();

    assert_eq!(summary.total_itens, 1);
    assert_eq!(service.purchases.lock().unwrap()[0].id, "f9");
}

#[tokio::test]
async fn test_chat_replies_until_half_close() {
    let (backend, _) = flight_backend().await;
    let (tx, rx) = mpsc::channel(4);

    let mut replies = backend
        .open_chat(ReceiverStream::new(rx).boxed())
        .await
        .unwrap();

    tx.send(envelope("Tem voo para Recife?", ChatContext::Flight)).await.unwrap();
    let reply = replies.next().await.unwrap().unwrap();
    assert_eq!(reply.usuario, "suporte_voos");
    assert_eq!(reply.mensagem, "[suporte_voos] Tem voo para Recife?");
    assert_eq!(reply.contexto, None);

    drop(tx);
    let rest = tokio::time::timeout(Duration::from_secs(2), replies.next())
        .await
        .expect("reply stream should end after half-close");
    assert!(rest.is_none());
}

#[tokio::test]
async fn test_tagged_chat_reply_keeps_its_context() {
    let (backend, _) = hotel_backend().await;
    let (tx, rx) = mpsc::channel(4);

    let mut replies = backend
        .open_chat(ReceiverStream::new(rx).boxed())
        .await
        .unwrap();

    tx.send(envelope("Pacote para Salvador", ChatContext::Package)).await.unwrap();
    let reply = replies.next().await.unwrap().unwrap();
    assert_eq!(reply.contexto, Some(ChatContext::Package));
    assert_eq!(reply.mensagem, "[suporte_hotel] Pacote para Salvador");
}

#[tokio::test]
async fn test_unreachable_service_is_unavailable_on_every_call() {
    // Nothing listens on port 1, and the lazy channel only fails when used.
    let channel = lazy_channel("127.0.0.1:1", Duration::from_millis(500)).unwrap();
    let backend = GrpcHotelBackend::new(channel);

    let err = backend.search(HotelCriteria::city("Salvador")).await.unwrap_err();
    assert!(err.is_unavailable(), "got {err:?}");
    assert_eq!(err.service(), "hotel");

    match backend.stream_status("RES-1".into()).await {
        Err(err) => assert!(err.is_unavailable()),
        Ok(_) => panic!("status stream should not open"),
    }

    let err = backend
        .stream_checkout(stream::iter(vec![CartItem::new("hotel", "h1", 200.0)]).boxed())
        .await
        .unwrap_err();
    assert!(err.is_unavailable());

    // Chat opens without waiting on the connection and reports the failure in-stream.
    let mut replies = backend.open_chat(stream::pending().boxed()).await.unwrap();
    match replies.next().await {
        Some(Err(err)) => assert!(err.is_unavailable(), "got {err:?}"),
        other => panic!("expected an unavailable error, got {other:?}"),
    }
    assert!(replies.next().await.is_none());
}
