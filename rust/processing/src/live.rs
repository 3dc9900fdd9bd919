// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Live tracking input for registration.

use roomsnap_core::{AnchorId, AnchorLabel};
use roomsnap_geometry::Pose;

/// An anchor currently tracked in the live session
#[derive(Debug, Clone, PartialEq)]
pub struct LiveAnchor {
    pub id: AnchorId,
    pub label: AnchorLabel,
    pub pose: Pose,
}

impl LiveAnchor {
    pub fn new(id: impl Into<AnchorId>, label: AnchorLabel, pose: Pose) -> Self {
        Self {
            id: id.into(),
            label,
            pose,
        }
    }
}

/// Anything that can report the anchors of the current live room
pub trait LiveAnchorSource {
    fn anchors(&self) -> Vec<LiveAnchor>;
}

/// In-memory live room
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveRoom {
    anchors: Vec<LiveAnchor>,
}

impl LiveRoom {
    pub fn new(anchors: Vec<LiveAnchor>) -> Self {
        Self { anchors }
    }

    pub fn push(&mut self, anchor: LiveAnchor) {
        self.anchors.push(anchor);
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LiveAnchor> {
        self.anchors.iter()
    }
}

impl FromIterator<LiveAnchor> for LiveRoom {
    fn from_iter<I: IntoIterator<Item = LiveAnchor>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl LiveAnchorSource for LiveRoom {
    fn anchors(&self) -> Vec<LiveAnchor> {
        self.anchors.clone()
    }
}

impl LiveAnchorSource for [LiveAnchor] {
    fn anchors(&self) -> Vec<LiveAnchor> {
        self.to_vec()
    }
}

impl LiveAnchorSource for Vec<LiveAnchor> {
    fn anchors(&self) -> Vec<LiveAnchor> {
        self.clone()
    }
}
