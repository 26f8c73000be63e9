//! Envelope types shared by every service.

use serde::{Deserialize, Serialize};

/// List response envelope: `{"collection": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection<T> {
    pub collection: Vec<T>,
}

impl<T> Collection<T> {
    /// Wrap a list of records.
    #[must_use]
    pub const fn new(collection: Vec<T>) -> Self {
        Self { collection }
    }

    /// Unwrap the records.
    #[must_use]
    pub fn into_inner(self) -> Vec<T> {
        self.collection
    }
}

impl<T> From<Vec<T>> for Collection<T> {
    fn from(collection: Vec<T>) -> Self {
        Self { collection }
    }
}

/// Error response body returned for every non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Numeric HTTP status.
    pub status: u16,
    /// Canonical reason phrase (e.g. "Not Found").
    pub error: String,
    /// Human-readable detail, safe to show to clients.
    pub message: String,
}
