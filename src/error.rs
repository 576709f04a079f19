// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Rejection of a draft entity. The ledger it was applied to stays untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Invalid amount '{0}', expected a non-negative number")]
    InvalidAmount(String),
    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: String },
    #[error("Invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),
    #[error("Unknown {field} '{value}'")]
    UnknownVariant { field: &'static str, value: String },
    #[error("{0} would exceed the largest representable amount")]
    Overflow(&'static str),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access '{key}' at {path}")]
    Io {
        key: String,
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed JSON stored under '{key}'")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
