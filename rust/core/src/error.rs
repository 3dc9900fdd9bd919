// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the snapshot format.

/// Result type alias for snapshot format operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading or writing a persisted snapshot.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document is not valid JSON or does not match the schema.
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The document was written by an unknown format version.
    #[error("unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// A numeric field holds NaN or infinity.
    #[error("non-finite value in field `{field}` of anchor `{anchor}`")]
    NonFinite { anchor: String, field: &'static str },
}
