// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pipeline errors.

use roomsnap_core::AnchorId;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort snapshot reconstruction.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The persisted document could not be read.
    #[error(transparent)]
    Format(#[from] roomsnap_core::Error),

    /// Two snapshot anchors claim the same identifier.
    #[error("duplicate anchor id `{0}` in snapshot")]
    DuplicateAnchorId(AnchorId),
}
