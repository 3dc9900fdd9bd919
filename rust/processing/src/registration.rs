// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Anchor registration.
//!
//! Aligns a reconstructed snapshot with the live session using a single
//! anchor correspondence. Candidates are tried in label priority order and
//! the first snapshot anchor whose id is also tracked live wins. Both poses
//! are re-derived through [`compute_basis`] so that tracker roll and pitch
//! noise does not leak into the transform.
//!
//! One correspondence is noise sensitive: any error in the chosen anchor's
//! pose shows up directly in the alignment.

use roomsnap_core::{AnchorId, AnchorLabel};
use roomsnap_geometry::{compute_basis, Pose, RigidTransform};
use rustc_hash::FxHashMap;

use crate::live::{LiveAnchor, LiveAnchorSource};
use crate::reconstruct::{ReconstructedAnchor, ReconstructedScene};

/// Default label priority for picking the reference anchor
pub const DEFAULT_LABEL_PRIORITY: [AnchorLabel; 5] = [
    AnchorLabel::Wall,
    AnchorLabel::DoorFrame,
    AnchorLabel::WindowFrame,
    AnchorLabel::Floor,
    AnchorLabel::Table,
];

#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationOptions {
    /// Labels tried first, in order
    pub label_priority: Vec<AnchorLabel>,
}

impl Default for RegistrationOptions {
    fn default() -> Self {
        Self {
            label_priority: DEFAULT_LABEL_PRIORITY.to_vec(),
        }
    }
}

/// Successful single-anchor alignment
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    /// Maps snapshot coordinates into the live session
    pub transform: RigidTransform,
    pub anchor_id: AnchorId,
    pub label: AnchorLabel,
    /// Candidates inspected up to and including the match
    pub candidates_tried: usize,
    pub snapshot_pose: Pose,
    pub live_pose: Pose,
}

/// Why no alignment was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AlignmentFailure {
    #[error("snapshot has no identified anchors")]
    NoIdentifiedAnchors,
    #[error("none of {tried} snapshot anchors is tracked live")]
    NoLiveMatch { tried: usize },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RegistrationState {
    #[default]
    Idle,
    Searching,
    Aligned(Alignment),
    Failed(AlignmentFailure),
}

impl RegistrationState {
    pub fn alignment(&self) -> Option<&Alignment> {
        match self {
            RegistrationState::Aligned(alignment) => Some(alignment),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RegistrationState::Aligned(_) | RegistrationState::Failed(_)
        )
    }
}

/// Drives one alignment attempt at a time
#[derive(Debug, Clone, Default)]
pub struct RegistrationEngine {
    options: RegistrationOptions,
    state: RegistrationState,
}

impl RegistrationEngine {
    pub fn new(options: RegistrationOptions) -> Self {
        Self {
            options,
            state: RegistrationState::Idle,
        }
    }

    pub fn options(&self) -> &RegistrationOptions {
        &self.options
    }

    pub fn state(&self) -> &RegistrationState {
        &self.state
    }

    /// Run one alignment attempt and return the terminal state
    pub fn align(
        &mut self,
        scene: &ReconstructedScene,
        live: &dyn LiveAnchorSource,
    ) -> &RegistrationState {
        self.state = RegistrationState::Searching;
        tracing::debug!(scene_id = %scene.scene_id(), "Registration searching");

        self.state = match align_once(scene, &live.anchors(), &self.options) {
            Ok(alignment) => {
                tracing::info!(
                    anchor = %alignment.anchor_id,
                    label = %alignment.label,
                    candidates_tried = alignment.candidates_tried,
                    rotation_rad = alignment.transform.angle(),
                    "Snapshot aligned"
                );
                RegistrationState::Aligned(alignment)
            }
            Err(failure) => {
                tracing::warn!(reason = %failure, "Snapshot alignment failed");
                RegistrationState::Failed(failure)
            }
        };
        &self.state
    }

    pub fn reset(&mut self) {
        self.state = RegistrationState::Idle;
    }
}

/// Snapshot anchors in the order they are tried.
///
/// Priority labels first, by priority then snapshot order; every other
/// identified anchor after them in snapshot order. Unidentified and
/// global-mesh anchors are never candidates.
pub fn candidate_order<'a>(
    scene: &'a ReconstructedScene,
    priority: &[AnchorLabel],
) -> Vec<&'a ReconstructedAnchor> {
    let eligible = |a: &&ReconstructedAnchor| !a.id.is_empty() && a.label != AnchorLabel::GlobalMesh;

    let mut ordered: Vec<&ReconstructedAnchor> = Vec::with_capacity(scene.len());
    for (rank, label) in priority.iter().enumerate() {
        // Repeated labels in the priority list only count once
        if priority[..rank].contains(label) {
            continue;
        }
        ordered.extend(
            scene
                .anchors()
                .iter()
                .filter(eligible)
                .filter(|a| a.label == *label),
        );
    }
    ordered.extend(
        scene
            .anchors()
            .iter()
            .filter(eligible)
            .filter(|a| !priority.contains(&a.label)),
    );
    ordered
}

/// Single alignment attempt without state tracking
pub fn align_once(
    scene: &ReconstructedScene,
    live: &[LiveAnchor],
    options: &RegistrationOptions,
) -> Result<Alignment, AlignmentFailure> {
    let lookup = live_lookup(live);
    let candidates = candidate_order(scene, &options.label_priority);
    if candidates.is_empty() {
        return Err(AlignmentFailure::NoIdentifiedAnchors);
    }

    for (i, candidate) in candidates.iter().enumerate() {
        let Some(live_anchor) = lookup.get(&candidate.id) else {
            continue;
        };

        let snapshot_pose = canonical_pose(candidate.label, &candidate.pose);
        let live_pose = canonical_pose(live_anchor.label, &live_anchor.pose);
        if candidate.label != live_anchor.label {
            tracing::debug!(
                anchor = %candidate.id,
                snapshot = %candidate.label,
                live = %live_anchor.label,
                "Matched anchor changed label"
            );
        }

        return Ok(Alignment {
            transform: RigidTransform::between(&snapshot_pose, &live_pose),
            anchor_id: candidate.id.clone(),
            label: candidate.label,
            candidates_tried: i + 1,
            snapshot_pose,
            live_pose,
        });
    }

    Err(AlignmentFailure::NoLiveMatch {
        tried: candidates.len(),
    })
}

/// Recorded position with the rotation of the re-derived anchor frame
fn canonical_pose(label: AnchorLabel, pose: &Pose) -> Pose {
    Pose::new(pose.position, compute_basis(label, pose).rotation())
}

/// Live anchors by id; ids seen more than once are ambiguous and dropped
fn live_lookup(live: &[LiveAnchor]) -> FxHashMap<AnchorId, &LiveAnchor> {
    let mut counts: FxHashMap<&AnchorId, usize> = FxHashMap::default();
    for anchor in live.iter().filter(|a| !a.id.is_empty()) {
        *counts.entry(&anchor.id).or_insert(0) += 1;
    }

    let mut lookup = FxHashMap::default();
    for anchor in live.iter().filter(|a| !a.id.is_empty()) {
        if counts.get(&anchor.id).copied().unwrap_or(0) > 1 {
            continue;
        }
        lookup.insert(anchor.id.clone(), anchor);
    }

    for (id, count) in counts.iter().filter(|&(_, &c)| c > 1) {
        tracing::warn!(anchor = %id, count = *count, "Ambiguous live anchor id ignored");
    }
    lookup
}
