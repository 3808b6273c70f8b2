//! Flight status lifecycle and monitor events.

use serde::{Deserialize, Serialize};

/// Lifecycle stage reported by the flight backend.
///
/// Unknown wire values are preserved in `Other` and never end a relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FlightStatus {
    AwaitingBoarding,
    Boarding,
    ReadyForTakeoff,
    Departed,
    InFlight,
    Landed,
    Finalized,
    Other(String),
}

impl FlightStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::AwaitingBoarding => "aguardando_embarque",
            Self::Boarding => "embarcando",
            Self::ReadyForTakeoff => "pronto_decolagem",
            Self::Departed => "decolou",
            Self::InFlight => "em_voo",
            Self::Landed => "pousou",
            Self::Finalized => "finalizado",
            Self::Other(raw) => raw,
        }
    }

    /// `finalizado` closes the relay; nothing is forwarded after it.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finalized)
    }
}

impl From<String> for FlightStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "aguardando_embarque" => Self::AwaitingBoarding,
            "embarcando" => Self::Boarding,
            "pronto_decolagem" => Self::ReadyForTakeoff,
            "decolou" => Self::Departed,
            "em_voo" => Self::InFlight,
            "pousou" => Self::Landed,
            "finalizado" => Self::Finalized,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for FlightStatus {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<FlightStatus> for String {
    fn from(status: FlightStatus) -> Self {
        match status {
            FlightStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// One status update pushed to the client as an SSE `data:` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorEvent {
    pub numero_voo: String,
    pub status: FlightStatus,
    pub mensagem: String,
    pub timestamp: String,
    pub progresso_percentual: i32,
}

impl MonitorEvent {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
