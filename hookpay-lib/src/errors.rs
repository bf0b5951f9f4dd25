//! Error types for hookpay operations.
//!
//! Every fallible operation in this crate returns [`HookpayError`]. The
//! codec-facing kinds (`InvalidInput`, `SigningUnavailable`,
//! `EncodingFailure`) are never retried; the ledger-facing kinds carry enough
//! detail for a caller to decide on its own retry policy.

use std::fmt;

/// Stable numeric codes, grouped by concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum HookpayErrorCode {
    /// Malformed caller input
    InvalidInput = 1000,
    /// Signer capability missing or failing
    SigningUnavailable = 1001,
    /// Payload could not be serialized or decoded
    EncodingFailure = 1002,
    /// Transport/network layer error
    Transport = 2000,
    /// Connection failed
    ConnectionFailed = 2001,
    /// Timed out waiting for the ledger
    ConnectionTimeout = 2002,
    /// RPC server answered with an error status
    Rpc = 3000,
    /// Transaction rejected before being applied
    LedgerRejected = 3001,
    /// Transaction validated with a failure result
    TransactionFailed = 3002,
    /// Requested ledger object not found
    NotFound = 4000,
    /// Internal/unexpected error
    Internal = 9999,
}

/// Error type for hookpay operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookpayError {
    /// Malformed input (wrong seed length, non-integer token amount, ...).
    InvalidInput {
        /// Field or parameter name
        field: String,
        /// Reason for invalidity
        reason: String,
    },

    /// The signer capability is absent or returned an error.
    SigningUnavailable(String),

    /// A payload could not be serialized or decoded.
    EncodingFailure(String),

    /// Transport/network layer error.
    Transport(String),

    /// Connection to the ledger endpoint failed.
    ConnectionFailed {
        /// Target endpoint
        target: String,
        /// Underlying error message
        reason: String,
    },

    /// The ledger did not validate the transaction in time.
    ConnectionTimeout {
        /// Operation that timed out
        operation: String,
        /// Time waited in milliseconds
        timeout_ms: u64,
    },

    /// The RPC server returned an error status.
    Rpc {
        /// RPC method name
        method: String,
        /// Error token returned by the server (e.g. `actNotFound`)
        error: String,
        /// Human readable message, if the server sent one
        message: Option<String>,
    },

    /// Transaction rejected at submission (`tem`, `tef`, `tel` results).
    LedgerRejected {
        /// Engine result code
        engine_result: String,
        /// Engine result message
        message: String,
    },

    /// Transaction validated but did not succeed.
    TransactionFailed {
        /// Transaction hash
        hash: String,
        /// Final `TransactionResult`
        result: String,
    },

    /// Resource not found.
    NotFound {
        /// Type of resource (e.g., "transaction", "account")
        resource_type: String,
        /// Resource identifier
        identifier: String,
    },

    /// Internal/unexpected error.
    Internal(String),
}

impl HookpayError {
    /// Get the numeric error code.
    pub fn code(&self) -> HookpayErrorCode {
        match self {
            Self::InvalidInput { .. } => HookpayErrorCode::InvalidInput,
            Self::SigningUnavailable(_) => HookpayErrorCode::SigningUnavailable,
            Self::EncodingFailure(_) => HookpayErrorCode::EncodingFailure,
            Self::Transport(_) => HookpayErrorCode::Transport,
            Self::ConnectionFailed { .. } => HookpayErrorCode::ConnectionFailed,
            Self::ConnectionTimeout { .. } => HookpayErrorCode::ConnectionTimeout,
            Self::Rpc { .. } => HookpayErrorCode::Rpc,
            Self::LedgerRejected { .. } => HookpayErrorCode::LedgerRejected,
            Self::TransactionFailed { .. } => HookpayErrorCode::TransactionFailed,
            Self::NotFound { .. } => HookpayErrorCode::NotFound,
            Self::Internal(_) => HookpayErrorCode::Internal,
        }
    }

    /// Returns true if resubmitting might succeed.
    ///
    /// Only transport-level failures qualify; nothing here retries on its
    /// own.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::ConnectionFailed { .. } | Self::ConnectionTimeout { .. }
        )
    }

    /// Suggested retry delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            Self::ConnectionTimeout { .. } => Some(1000),
            Self::ConnectionFailed { .. } => Some(2000),
            Self::Transport(_) => Some(1000),
            _ => None,
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a not found error.
    pub fn not_found(resource_type: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            identifier: identifier.into(),
        }
    }

    /// Create a transport error from any error type.
    pub fn transport<E: std::error::Error>(err: E) -> Self {
        Self::Transport(err.to_string())
    }
}

impl fmt::Display for HookpayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { field, reason } => write!(f, "invalid {}: {}", field, reason),
            Self::SigningUnavailable(msg) => write!(f, "signing unavailable: {}", msg),
            Self::EncodingFailure(msg) => write!(f, "encoding failure: {}", msg),
            Self::Transport(msg) => write!(f, "transport error: {}", msg),
            Self::ConnectionFailed { target, reason } => {
                write!(f, "connection to {} failed: {}", target, reason)
            }
            Self::ConnectionTimeout {
                operation,
                timeout_ms,
            } => {
                write!(f, "{} timed out after {}ms", operation, timeout_ms)
            }
            Self::Rpc {
                method,
                error,
                message,
            } => match message {
                Some(msg) => write!(f, "rpc {} failed: {} ({})", method, error, msg),
                None => write!(f, "rpc {} failed: {}", method, error),
            },
            Self::LedgerRejected {
                engine_result,
                message,
            } => {
                write!(f, "transaction rejected: {} {}", engine_result, message)
            }
            Self::TransactionFailed { hash, result } => {
                write!(f, "transaction {} failed with {}", hash, result)
            }
            Self::NotFound {
                resource_type,
                identifier,
            } => {
                write!(f, "{} not found: {}", resource_type, identifier)
            }
            Self::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for HookpayError {}

impl From<serde_json::Error> for HookpayError {
    fn from(err: serde_json::Error) -> Self {
        Self::EncodingFailure(err.to_string())
    }
}
