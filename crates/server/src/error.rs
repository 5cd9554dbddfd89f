//! Request rejection reasons and the bare status lines they map to.

/// Bare response for anything that is not a usable GET request.
pub const BAD_REQUEST: &[u8] = b"HTTP/1.1 400 Bad Request\r\n\r\n";

/// Bare response when the origin could not be fetched.
pub const BAD_GATEWAY: &[u8] = b"HTTP/1.1 502 Bad Gateway\r\n\r\n";

/// Why a client request was rejected before any cache or origin work.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// First line does not begin with the `GET` token.
    #[error("INVALID_REQUEST: unsupported method in {0:?}")]
    NotGet(String),

    /// `GET` line without a request target.
    #[error("INVALID_REQUEST: missing request target in {0:?}")]
    MissingTarget(String),
}

impl RequestError {
    /// Status line written back to the client for this rejection.
    pub fn status_line(&self) -> &'static [u8] {
        match self {
            RequestError::NotGet(_) | RequestError::MissingTarget(_) => BAD_REQUEST,
        }
    }
}
