//! Cart items and purchase summaries.

use serde::{Deserialize, Serialize};

use crate::search::types::lenient_amount;

/// One item of the client's cart. `detalhes` is forwarded to the backend unmodified.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CartItem {
    pub tipo: String,
    pub id: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub preco: Option<f64>,
    #[serde(default)]
    pub detalhes: serde_json::Value,
}

impl CartItem {
    pub fn new(tipo: impl Into<String>, id: impl Into<String>, preco: f64) -> Self {
        Self {
            tipo: tipo.into(),
            id: id.into(),
            preco: Some(preco),
            detalhes: serde_json::Value::Null,
        }
    }

    pub fn price(&self) -> f64 {
        self.preco.unwrap_or(0.0)
    }

    /// The opaque payload as the backend expects it: strings verbatim, anything else as JSON text.
    pub fn payload(&self) -> String {
        match &self.detalhes {
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub items: Vec<CartItem>,
}

/// Confirmation code for one purchased item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemCode {
    pub tipo: String,
    pub codigo: String,
    pub valor: f64,
}

/// The single summary returned by the checkout authority.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseSummary {
    pub sucesso: bool,
    pub codigo_confirmacao: String,
    pub codigos: Vec<ItemCode>,
    pub valor_total: f64,
    pub total_itens: i32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub erros: Vec<String>,
    pub timestamp: String,
}
