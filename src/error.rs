//! Error types for the ChannelAdvisor client

use crate::mark::Mark;
use crate::transport::TransportError;
use std::fmt;
use thiserror::Error;

/// Result type alias for client operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced by the client
#[derive(Error, Debug)]
pub enum ApiError {
    /// The transport collaborator failed to complete the call
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The remote endpoint returned a non-success status envelope
    #[error("remote call failed{}: {message}", format_code(.code))]
    Remote {
        /// Message code reported by the endpoint, when present
        code: Option<String>,
        /// Message reported by the endpoint, verbatim
        message: String,
    },

    /// A batch shipment response reported a per-item failure
    #[error("shipment rejected{}: {message}", format_order(.order))]
    ShipmentRejected {
        /// Order reference of the failing shipment, when known
        order: Option<String>,
        /// Per-item message reported by the endpoint, verbatim
        message: String,
    },

    /// A precondition failed before any remote call was attempted
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Missing environment variable
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),

    /// The response envelope was missing data the call requires
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The blocking runtime could not be constructed
    #[error("runtime error: {0}")]
    Runtime(String),

    /// A failure wrapped with full call context at the facade boundary
    #[error("{context}: {source}")]
    Operation {
        /// The operation that failed
        context: CallContext,
        /// The underlying failure
        #[source]
        source: Box<ApiError>,
    },
}

fn format_code(code: &Option<String>) -> String {
    code.as_deref()
        .map(|c| format!(" ({c})"))
        .unwrap_or_default()
}

fn format_order(order: &Option<String>) -> String {
    order
        .as_deref()
        .map(|o| format!(" for order {o}"))
        .unwrap_or_default()
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a precondition error
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Wrap this error with call context, unless it is already wrapped.
    ///
    /// Facades call this once at their boundary so that every failed logical
    /// operation surfaces exactly one contextualized error.
    #[must_use]
    pub fn with_context(self, context: CallContext) -> Self {
        match self {
            Self::Operation { .. } => self,
            other => Self::Operation {
                context,
                source: Box::new(other),
            },
        }
    }

    /// Check if this error is worth retrying
    ///
    /// Only transient transport failures qualify. Remote status failures,
    /// preconditions, and malformed responses are deterministic and are
    /// surfaced immediately.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_transient(),
            Self::Operation { source, .. } => source.is_retryable(),
            Self::Remote { .. }
            | Self::ShipmentRejected { .. }
            | Self::Precondition(_)
            | Self::Config(_)
            | Self::MissingEnvVar(_)
            | Self::MalformedResponse(_)
            | Self::Runtime(_) => false,
        }
    }
}

/// Context describing one facade call, embedded in [`ApiError::Operation`]
#[derive(Debug, Clone)]
pub struct CallContext {
    /// Name of the facade operation
    pub operation: &'static str,
    /// Account the call was issued against
    pub account_id: String,
    /// Correlation mark of the call
    pub mark: Mark,
    /// Keys affected by the call (SKUs, order references, labels)
    pub keys: Vec<String>,
}

impl CallContext {
    /// Create a context with no affected keys
    pub fn new(operation: &'static str, account_id: impl Into<String>, mark: Mark) -> Self {
        Self {
            operation,
            account_id: account_id.into(),
            mark,
            keys: Vec::new(),
        }
    }

    /// Attach the keys affected by the call
    #[must_use]
    pub fn with_keys(mut self, keys: Vec<String>) -> Self {
        self.keys = keys;
        self
    }
}

impl fmt::Display for CallContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (account: {}, mark: {}",
            self.operation, self.account_id, self.mark
        )?;
        if !self.keys.is_empty() {
            write!(f, ", keys: [{}]", self.keys.join(", "))?;
        }
        write!(f, ")")
    }
}
