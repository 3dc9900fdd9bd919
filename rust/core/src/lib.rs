// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # RoomSnap Core
//!
//! Shared vocabulary for room snapshots: anchor labels, normalized anchor
//! identifiers, and the persisted JSON snapshot format.
//!
//! ## Overview
//!
//! - **Labels**: [`AnchorLabel`] with stable wire names and case-insensitive parsing
//! - **Identifiers**: [`AnchorId`], the normalized key used to match anchors across sessions
//! - **Format**: [`SnapshotDocument`] and its records, versioned and validated on read
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use roomsnap_core::SnapshotDocument;
//!
//! let doc = SnapshotDocument::from_json(&text)?;
//! for anchor in doc.anchors() {
//!     println!("{} {}", anchor.label, anchor.id);
//! }
//! ```

pub mod error;
pub mod format;
pub mod id;
pub mod label;

pub use error::{Error, Result};
pub use format::{
    AnchorRecord, BoundarySource, LabelCount, LabelGroup, QuatJson, SceneMeshInfo,
    SnapshotDocument, Vec3Json, FORMAT_VERSION,
};
pub use id::AnchorId;
pub use label::AnchorLabel;
