// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent display notices.

use crate::db::StoreError;
use serde::Serialize;

/// Application error type.
///
/// Nothing here is fatal to the process: the UI turns any of these into an
/// [`ErrorNotice`] and keeps showing whatever it last rendered.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Messages the tips API uses when it rejects a bearer token.
    pub const TOKEN_REJECTED: &'static str = "Unauthenticated.";

    /// Whether this error means the credential itself was rejected.
    ///
    /// Callers decide what to do with that; the fetch layer never logs the
    /// user out on its own.
    pub fn is_auth_error(&self) -> bool {
        match self {
            AppError::Unauthorized => true,
            AppError::Api { status, message } => {
                *status == 401 || message.contains(Self::TOKEN_REJECTED)
            }
            _ => false,
        }
    }

    /// Display-only notice for the UI layer.
    pub fn notice(&self) -> ErrorNotice {
        let (error, details) = match self {
            AppError::Unauthorized => ("unauthorized", None),
            AppError::Api { message, .. } => ("api_error", Some(message.clone())),
            AppError::Network(msg) => ("network_error", Some(msg.clone())),
            AppError::Decode(msg) => {
                tracing::error!(error = %msg, "Response decode error");
                ("decode_error", None)
            }
            AppError::Validation(msg) => ("validation_error", Some(msg.clone())),
            AppError::Storage(err) => {
                tracing::error!(error = %err, "Storage error");
                ("storage_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal error");
                ("internal_error", None)
            }
        };

        ErrorNotice {
            error: error.to_string(),
            details,
        }
    }
}

/// Error body shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorNotice {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Result type alias for fallible operations.
pub type Result<T> = std::result::Result<T, AppError>;
