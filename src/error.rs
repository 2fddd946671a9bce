//! Error types for the EJBCA administrative client.
//!
//! Every failure an operation can produce is represented here. The command-line
//! tool converts these into operator-facing messages with
//! [`ClientError::operator_message`], so low-level transport errors never escape
//! unhandled.

use thiserror::Error;

/// Result type alias using [`ClientError`].
pub type Result<T> = std::result::Result<T, ClientError>;

/// Hint shown when the configdump health check is refused by the server.
pub const CONFIGDUMP_DISABLED_HINT: &str = "The \"REST Configdump\" protocol may be disabled. \
Enable it in EJBCA under System Configuration > Protocol Configuration.";

/// Errors that can occur during client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No certificate with the Client Authentication usage exists in the store.
    #[error("No certificate with Client Authentication usage found in the certificate store")]
    NoCandidateCertificate,

    /// The operator entered a non-numeric or out-of-range choice.
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// The configdump health check failed.
    #[error("Configdump endpoint unavailable: {reason}")]
    EndpointUnavailable {
        /// Transport error or HTTP status returned by the health check.
        reason: String,
        /// Operator hint, present when the server answered but refused the call.
        hint: Option<&'static str>,
    },

    /// The main request failed after a successful connection.
    #[error("Request failed with HTTP {status}: {message}")]
    RequestFailed {
        /// HTTP status code.
        status: u16,
        /// Error message reported by the server.
        message: String,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// TLS configuration error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Failed to parse an X.509 certificate.
    #[error("Certificate parsing error: {0}")]
    CertificateParsing(String),

    /// Invalid PEM data.
    #[error("Invalid PEM data: {0}")]
    InvalidPem(String),

    /// Key or CSR generation failed.
    #[error("CSR error: {0}")]
    Csr(String),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Base64 decoding error.
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Create an invalid selection error with the given message.
    pub fn invalid_selection(msg: impl Into<String>) -> Self {
        Self::InvalidSelection(msg.into())
    }

    /// Create an endpoint-unavailable error for a server that answered with a
    /// non-success status.
    pub fn endpoint_refused(status: u16) -> Self {
        Self::EndpointUnavailable {
            reason: format!("health check returned HTTP {status}"),
            hint: Some(CONFIGDUMP_DISABLED_HINT),
        }
    }

    /// Create an endpoint-unavailable error for a transport failure.
    pub fn endpoint_unreachable(reason: impl Into<String>) -> Self {
        Self::EndpointUnavailable {
            reason: reason.into(),
            hint: None,
        }
    }

    /// Create a request failed error with status and message.
    pub fn request_failed(status: u16, message: impl Into<String>) -> Self {
        Self::RequestFailed {
            status,
            message: message.into(),
        }
    }

    /// Create a TLS error with the given message.
    pub fn tls(msg: impl Into<String>) -> Self {
        Self::Tls(msg.into())
    }

    /// Create a certificate parsing error with the given message.
    pub fn certificate_parsing(msg: impl Into<String>) -> Self {
        Self::CertificateParsing(msg.into())
    }

    /// Create an invalid PEM error.
    pub fn invalid_pem(msg: impl Into<String>) -> Self {
        Self::InvalidPem(msg.into())
    }

    /// Create a CSR error.
    pub fn csr(msg: impl Into<String>) -> Self {
        Self::Csr(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns the operator hint attached to this error, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::EndpointUnavailable { hint, .. } => *hint,
            Self::NoCandidateCertificate => Some(
                "Import a certificate with the Client Authentication extended key usage \
                 (OID 1.3.6.1.5.5.7.3.2) together with its private key.",
            ),
            _ => None,
        }
    }

    /// Render the message shown to the operator, including any hint.
    pub fn operator_message(&self) -> String {
        match self.hint() {
            Some(hint) => format!("{self}\n{hint}"),
            None => self.to_string(),
        }
    }

    /// Returns true if the operator can recover by choosing again.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidSelection(_))
    }
}
