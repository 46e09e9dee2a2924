use thiserror::Error;

/// Failures while talking to the management bridge.
///
/// These never reach the tree builder; consumers hand it only the
/// (possibly empty) name list of a successful query.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("bridge returned status {status}: {message}")]
    Bridge { status: u16, message: String },

    #[error("malformed bridge response: {0}")]
    MalformedResponse(String),
}
