// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # RoomSnap Processing
//!
//! Capture-to-alignment pipeline for room anchors.
//!
//! ## Overview
//!
//! - **Building**: [`build_snapshot`] derives frames and boundaries for detected
//!   anchors and produces an immutable [`SceneSnapshot`]
//! - **Reconstruction**: [`reconstruct`] turns a persisted snapshot back into
//!   local frames and planar meshes
//! - **Registration**: [`RegistrationEngine`] aligns a reconstructed scene with
//!   the live session through one shared anchor id
//!
//! Everything here is synchronous and works on immutable inputs.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use roomsnap_processing::{build_snapshot, reconstruct_json, RegistrationEngine, SnapshotOptions};
//!
//! let json = build_snapshot(&detected, None, &SnapshotOptions::default()).to_json()?;
//! let scene = reconstruct_json(&json)?;
//!
//! let mut engine = RegistrationEngine::default();
//! if let Some(alignment) = engine.align(&scene, &live_room).alignment() {
//!     println!("aligned on {}", alignment.anchor_id);
//! }
//! ```

pub mod anchor;
pub mod builder;
pub mod error;
pub mod live;
pub mod reconstruct;
pub mod registration;

pub use anchor::{Anchor, DetectedAnchor};
pub use builder::{build_snapshot, AnchorGroup, SceneMeshInput, SceneSnapshot, SnapshotOptions};
pub use error::{Error, Result};
pub use live::{LiveAnchor, LiveAnchorSource, LiveRoom};
pub use reconstruct::{reconstruct, reconstruct_json, ReconstructedAnchor, ReconstructedScene};
pub use registration::{
    align_once, candidate_order, Alignment, AlignmentFailure, RegistrationEngine,
    RegistrationOptions, RegistrationState, DEFAULT_LABEL_PRIORITY,
};
