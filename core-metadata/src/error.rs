use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    /// The caller's cancellation token fired. Distinct from "nothing found".
    #[error("Resolution cancelled")]
    Cancelled,

    #[error("Provider misconfigured: {0}")]
    Misconfigured(String),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Unexpected payload: {0}")]
    Parse(String),

    #[error("Bridge error: {0}")]
    Bridge(#[from] bridge_traits::error::BridgeError),
}

impl From<core_async::Cancelled> for MetadataError {
    fn from(_: core_async::Cancelled) -> Self {
        Self::Cancelled
    }
}

impl MetadataError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, MetadataError>;
