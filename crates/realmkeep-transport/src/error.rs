/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The peer has gone away; nothing more can be written.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    /// Writing to the socket failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),
}
