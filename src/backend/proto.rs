//! Protobuf wire types and tonic stubs generated from `proto/*.proto`.
//!
//! Servers are generated too so the gRPC adapters can be exercised against
//! in-process services.

pub mod travel {
    pub mod common {
        tonic::include_proto!("travel.common");
    }
}

pub mod voos {
    tonic::include_proto!("voos");
}

pub mod hotel {
    tonic::include_proto!("hotel");
}

pub use travel::common::{ChatMessage, CodigoItem, ItemCarrinho, RespostaCompra, StatusUpdate};
