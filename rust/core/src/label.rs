// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Anchor labels
//!
//! The categorical type of a detected surface. Labels decide which pose axis
//! seeds the surface normal and which box extents make up the boundary, so
//! the mapping from wire strings to variants has to be stable across versions.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Categorical type of an anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnchorLabel {
    Floor,
    Ceiling,
    Wall,
    Table,
    DoorFrame,
    WindowFrame,
    HorizontalSurface,
    VerticalSurface,
    /// Synthetic label carried by the combined room mesh; never an alignment candidate
    GlobalMesh,
    Other,
}

impl AnchorLabel {
    /// All labels in declaration order (used for stable grouping)
    pub const ALL: [AnchorLabel; 10] = [
        AnchorLabel::Floor,
        AnchorLabel::Ceiling,
        AnchorLabel::Wall,
        AnchorLabel::Table,
        AnchorLabel::DoorFrame,
        AnchorLabel::WindowFrame,
        AnchorLabel::HorizontalSurface,
        AnchorLabel::VerticalSurface,
        AnchorLabel::GlobalMesh,
        AnchorLabel::Other,
    ];

    /// Wire name of the label
    pub fn as_str(&self) -> &'static str {
        match self {
            AnchorLabel::Floor => "FLOOR",
            AnchorLabel::Ceiling => "CEILING",
            AnchorLabel::Wall => "WALL_FACE",
            AnchorLabel::Table => "TABLE",
            AnchorLabel::DoorFrame => "DOOR_FRAME",
            AnchorLabel::WindowFrame => "WINDOW_FRAME",
            AnchorLabel::HorizontalSurface => "HORIZONTAL_SURFACE",
            AnchorLabel::VerticalSurface => "VERTICAL_SURFACE",
            AnchorLabel::GlobalMesh => "GLOBAL_MESH",
            AnchorLabel::Other => "OTHER",
        }
    }

    /// Surfaces whose normal lies in the horizontal plane.
    ///
    /// Door and window frames sit inside walls and share the wall convention.
    #[inline]
    pub fn is_vertical(&self) -> bool {
        matches!(
            self,
            AnchorLabel::Wall
                | AnchorLabel::VerticalSurface
                | AnchorLabel::DoorFrame
                | AnchorLabel::WindowFrame
        )
    }

    /// Surfaces whose normal points down
    #[inline]
    pub fn faces_down(&self) -> bool {
        matches!(self, AnchorLabel::Ceiling)
    }
}

impl fmt::Display for AnchorLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnchorLabel {
    type Err = std::convert::Infallible;

    /// Case-insensitive; unknown names map to [`AnchorLabel::Other`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        let label = match normalized.as_str() {
            "FLOOR" => AnchorLabel::Floor,
            "CEILING" => AnchorLabel::Ceiling,
            "WALL" | "WALL_FACE" | "INVISIBLE_WALL_FACE" => AnchorLabel::Wall,
            "TABLE" | "DESK" => AnchorLabel::Table,
            "DOOR" | "DOOR_FRAME" => AnchorLabel::DoorFrame,
            "WINDOW" | "WINDOW_FRAME" => AnchorLabel::WindowFrame,
            "HORIZONTAL" | "HORIZONTAL_SURFACE" => AnchorLabel::HorizontalSurface,
            "VERTICAL" | "VERTICAL_SURFACE" => AnchorLabel::VerticalSurface,
            "GLOBAL_MESH" => AnchorLabel::GlobalMesh,
            _ => AnchorLabel::Other,
        };
        Ok(label)
    }
}

impl Serialize for AnchorLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AnchorLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or(AnchorLabel::Other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("wall_face".parse::<AnchorLabel>().unwrap(), AnchorLabel::Wall);
        assert_eq!("Table".parse::<AnchorLabel>().unwrap(), AnchorLabel::Table);
        assert_eq!("door frame".parse::<AnchorLabel>().unwrap(), AnchorLabel::DoorFrame);
    }

    #[test]
    fn unknown_label_is_other() {
        assert_eq!("LAMP".parse::<AnchorLabel>().unwrap(), AnchorLabel::Other);
    }

    #[test]
    fn wire_names_round_trip() {
        for label in AnchorLabel::ALL {
            assert_eq!(label.as_str().parse::<AnchorLabel>().unwrap(), label);
        }
    }

    #[test]
    fn vertical_labels() {
        assert!(AnchorLabel::Wall.is_vertical());
        assert!(AnchorLabel::WindowFrame.is_vertical());
        assert!(!AnchorLabel::Floor.is_vertical());
        assert!(!AnchorLabel::Ceiling.is_vertical());
        assert!(AnchorLabel::Ceiling.faces_down());
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&AnchorLabel::Wall).unwrap();
        assert_eq!(json, "\"WALL_FACE\"");
        let back: AnchorLabel = serde_json::from_str("\"floor\"").unwrap();
        assert_eq!(back, AnchorLabel::Floor);
    }
}
