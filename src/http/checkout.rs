//! Cart checkout handler.

use axum::extract::State;
use axum::Json;

use crate::checkout::{self, CheckoutRequest, PurchaseSummary};
use crate::error::GatewayResult;
use crate::http::request::ApiJson;
use crate::http::server::AppState;

/// `POST /api/cart/checkout`
///
/// A summary with `sucesso = false` is still a 200; the backend's `erros` explain it.
pub async fn checkout_cart(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CheckoutRequest>,
) -> GatewayResult<Json<PurchaseSummary>> {
    let summary = checkout::checkout(state.backends.hotels.as_ref(), body.items).await?;
    Ok(Json(summary))
}
