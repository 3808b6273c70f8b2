//! Keyword routing of client chat text.

use crate::chat::types::ChatContext;

const PACKAGE_WORDS: &[&str] = &["pacote", "pacotes", "combo"];
const FLIGHT_WORDS: &[&str] = &[
    "voo", "voos", "voar", "aereo", "aéreo", "aviao", "avião", "passagem", "passagens",
];
const HOTEL_WORDS: &[&str] = &[
    "hotel", "hoteis", "hotéis", "hospedagem", "quarto", "quartos", "pousada", "resort", "hostel",
];

/// Picks the context of a client message.
///
/// Case-insensitive substring match with precedence package, flight, hotel;
/// anything else is `General`.
pub fn classify(text: &str) -> ChatContext {
    let lowered = text.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|word| lowered.contains(word));

    if mentions(PACKAGE_WORDS) {
        ChatContext::Package
    } else if mentions(FLIGHT_WORDS) {
        ChatContext::Flight
    } else if mentions(HOTEL_WORDS) {
        ChatContext::Hotel
    } else {
        ChatContext::General
    }
}
