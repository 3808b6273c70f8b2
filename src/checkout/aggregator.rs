//! Streams a cart to the checkout authority and returns its single summary.

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::backend::HotelBackend;
use crate::checkout::types::{CartItem, PurchaseSummary};
use crate::error::{GatewayError, GatewayResult};

/// Writes every item in cart order, signals end-of-input, and awaits the summary.
///
/// The summary is returned as the backend produced it, including `sucesso = false`.
pub async fn checkout(backend: &HotelBackend, items: Vec<CartItem>) -> GatewayResult<PurchaseSummary> {
    if items.is_empty() {
        return Err(GatewayError::EmptyCart);
    }
    let count = items.len();
    let (tx, rx) = mpsc::channel(1);

    let write_all = async move {
        for item in items {
            if tx.send(item).await.is_err() {
                // The call ended early; its result carries the reason.
                break;
            }
        }
        // Dropping the sender is the end-of-input signal.
    };

    let (summary, ()) = tokio::join!(
        backend.stream_checkout(ReceiverStream::new(rx).boxed()),
        write_all
    );

    match summary {
        Ok(summary) => {
            tracing::info!(
                items = count,
                sucesso = summary.sucesso,
                codigo = %summary.codigo_confirmacao,
                "Checkout completed"
            );
            Ok(summary)
        }
        Err(err) => {
            tracing::warn!(items = count, error = %err, "Checkout failed");
            Err(err.into())
        }
    }
}
