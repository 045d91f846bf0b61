/// Errors surfaced by a client call. `Api` carries whatever the gateway's
/// `{"error": ...}` body said, already paired with the status code that
/// produced it; retryable outcomes never reach the caller as an error at
/// all, the retry loop absorbs them.
#[derive(Debug)]
pub enum ClientError {
    Transport(reqwest::Error),
    Api {
        status: reqwest::StatusCode,
        message: String,
    },
    RetriesExhausted {
        attempts: u32,
        last: Box<ClientError>,
    },
    Decode(serde_json::Error),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Transport(err) => write!(f, "transport error: {err}"),
            ClientError::Api { status, message } => write!(f, "gateway returned {status}: {message}"),
            ClientError::RetriesExhausted { attempts, last } => {
                write!(f, "gave up after {attempts} attempts: {last}")
            }
            ClientError::Decode(err) => write!(f, "failed to decode response body: {err}"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Transport(err) => Some(err),
            ClientError::Decode(err) => Some(err),
            ClientError::RetriesExhausted { last, .. } => Some(last.as_ref()),
            ClientError::Api { .. } => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err)
    }
}

impl ClientError {
    /// Whether the retry loop should try again after this error: a
    /// connection-level failure (timeout, reset, DNS), or a `429` response.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Transport(err) => err.is_timeout() || err.is_connect() || err.is_request(),
            ClientError::Api { status, .. } => *status == reqwest::StatusCode::TOO_MANY_REQUESTS,
            ClientError::RetriesExhausted { .. } | ClientError::Decode(_) => false,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
