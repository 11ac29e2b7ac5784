use serde::{Deserialize, Serialize};

pub mod transport;

pub use transport::{ChatTransport, HttpTransport, TransportError};

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub reply: String,
}
