// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registry of live rooms reported by tracking clients.

use roomsnap_processing::LiveRoom;
use rustc_hash::FxHashMap;
use tokio::sync::RwLock;

/// Live anchors per room name.
///
/// The only shared mutable state in the server. Readers get a cloned view so
/// that alignment never holds the lock.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: RwLock<FxHashMap<String, LiveRoom>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the live anchors of a room, returning the previous count
    pub async fn replace(&self, room: &str, live: LiveRoom) -> Option<usize> {
        let count = live.len();
        let previous = self.rooms.write().await.insert(room.to_string(), live);
        tracing::debug!(room = %room, anchors = count, "Live room updated");
        previous.map(|p| p.len())
    }

    /// Cloned view of a room
    pub async fn get(&self, room: &str) -> Option<LiveRoom> {
        self.rooms.read().await.get(room).cloned()
    }

    /// True once a room has reported at least one anchor
    pub async fn is_ready(&self, room: &str) -> bool {
        self.rooms
            .read()
            .await
            .get(room)
            .is_some_and(|r| !r.is_empty())
    }

    #[allow(dead_code)]
    pub async fn len(&self) -> usize {
        self.rooms.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomsnap_core::AnchorLabel;
    use roomsnap_geometry::Pose;
    use roomsnap_processing::LiveAnchor;

    #[tokio::test]
    async fn replace_and_read() {
        let registry = RoomRegistry::new();
        assert!(!registry.is_ready("lab").await);

        let room = LiveRoom::new(vec![LiveAnchor::new("w", AnchorLabel::Wall, Pose::identity())]);
        assert_eq!(registry.replace("lab", room.clone()).await, None);
        assert!(registry.is_ready("lab").await);
        assert_eq!(registry.get("lab").await, Some(room));

        assert_eq!(registry.replace("lab", LiveRoom::default()).await, Some(1));
        assert!(!registry.is_ready("lab").await);
        assert_eq!(registry.len().await, 1);
    }
}
