// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end checks: capture, persist, reconstruct, align.

use approx::assert_relative_eq;
use roomsnap_core::{AnchorLabel, SnapshotDocument};
use roomsnap_geometry::pose::point_from_json;
use roomsnap_geometry::{signed_area, AnchorGeometry, Point2, Point3, Pose, UnitQuaternion, Vector3};
use roomsnap_processing::{
    build_snapshot, reconstruct, reconstruct_json, DetectedAnchor, LiveAnchor, LiveRoom,
    RegistrationEngine, RegistrationOptions, RegistrationState, AlignmentFailure,
    SceneMeshInput, SnapshotOptions,
};

const TOLERANCE: f64 = 1e-4;

fn living_room() -> Vec<DetectedAnchor> {
    let yaw = |angle: f64| UnitQuaternion::from_axis_angle(&Vector3::y_axis(), angle);
    vec![
        DetectedAnchor::new("floor-1", AnchorLabel::Floor, Pose::at(Point3::new(0.0, -1.4, 0.0)))
            .with_geometry(AnchorGeometry::MeshBounds {
                min: Point3::new(-2.0, -0.01, -1.5),
                max: Point3::new(2.0, 0.01, 1.5),
            }),
        DetectedAnchor::new(
            "wall-north",
            AnchorLabel::Wall,
            Pose::new(Point3::new(0.0, -0.1, -1.5), UnitQuaternion::identity()),
        )
        .with_geometry(AnchorGeometry::OrientedBox {
            center: Point3::origin(),
            half_extents: Vector3::new(2.0, 1.3, 0.05),
        }),
        DetectedAnchor::new(
            "wall-east",
            AnchorLabel::Wall,
            Pose::new(Point3::new(2.0, -0.1, 0.0), yaw(-std::f64::consts::FRAC_PI_2)),
        )
        .with_geometry(AnchorGeometry::OrientedBox {
            center: Point3::new(0.2, 0.0, 0.0),
            half_extents: Vector3::new(1.5, 1.3, 0.05),
        }),
        DetectedAnchor::new(
            "table-1",
            AnchorLabel::Table,
            Pose::new(Point3::new(0.4, -0.65, 0.3), yaw(0.6)),
        )
        .with_geometry(AnchorGeometry::OrientedBox {
            center: Point3::origin(),
            half_extents: Vector3::new(0.6, 0.02, 0.4),
        }),
        DetectedAnchor::new(
            "door-1",
            AnchorLabel::DoorFrame,
            Pose::new(Point3::new(-1.0, -0.4, -1.5), UnitQuaternion::from_euler_angles(0.05, 0.0, -0.02)),
        ),
        DetectedAnchor::new("", AnchorLabel::Ceiling, Pose::at(Point3::new(0.0, 1.2, 0.0))),
    ]
}

#[test]
fn round_trip_reproduces_boundaries() {
    let mesh = SceneMeshInput {
        vertices: vec![Point3::new(-2.0, -1.4, -1.5), Point3::new(2.0, 1.2, 1.5)],
        relative_path: "room.obj".to_string(),
    };
    let snapshot = build_snapshot(&living_room(), Some(&mesh), &SnapshotOptions::default());
    let json = snapshot.to_json().unwrap();

    let document = SnapshotDocument::from_json(&json).unwrap();
    assert_eq!(document.anchor_count(), snapshot.anchor_count());
    assert_eq!(document.scene_mesh.as_ref().map(|m| m.vertex_count), Some(2));

    let scene = reconstruct_json(&json).unwrap();
    assert_eq!(scene.len(), document.anchor_count());

    for (record, anchor) in document.anchors().zip(scene.anchors()) {
        assert_eq!(record.id, anchor.id);
        let world = anchor.world_vertices();
        assert_eq!(world.len(), record.boundary_world.len(), "{}", record.name);
        for (expected, actual) in record.boundary_world.iter().zip(&world) {
            assert_relative_eq!(point_from_json(expected), *actual, epsilon = TOLERANCE);
        }
    }
}

#[test]
fn zero_depth_table_round_trips_through_its_mesh() {
    let table = DetectedAnchor::new(
        "table-flat",
        AnchorLabel::Table,
        Pose::at(Point3::new(0.5, -0.6, 0.2)),
    )
    .with_geometry(AnchorGeometry::OrientedBox {
        center: Point3::origin(),
        half_extents: Vector3::new(0.6, 0.4, 0.0),
    });
    let snapshot = build_snapshot(&[table], None, &SnapshotOptions::default());
    let document = snapshot.to_document();
    let scene = reconstruct(&document).unwrap();

    let record = document.anchors().next().unwrap();
    let anchor = &scene.anchors()[0];
    assert_eq!(record.boundary_world.len(), 4);
    let mesh = anchor.mesh.as_ref().unwrap();
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.triangle_count(), 2);

    let world = anchor.world_vertices();
    assert_eq!(world.len(), 4);
    for (expected, actual) in record.boundary_world.iter().zip(&world) {
        assert_relative_eq!(point_from_json(expected), *actual, epsilon = TOLERANCE);
    }
}

#[test]
fn reconstructed_meshes_are_planar_and_consistently_wound() {
    let snapshot = build_snapshot(&living_room(), None, &SnapshotOptions::default());
    let scene = reconstruct(&snapshot.to_document()).unwrap();

    for anchor in scene.anchors() {
        let mesh = anchor.mesh.as_ref().unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        for v in mesh.vertices() {
            assert!(v.z.abs() < TOLERANCE, "{}: {v:?}", anchor.name);
        }
        for tri in mesh.triangles() {
            let pts: Vec<Point2<f64>> = tri
                .iter()
                .filter_map(|&i| mesh.vertex(i as usize))
                .map(|p| Point2::new(p.x, p.y))
                .collect();
            assert!(signed_area(&pts) > 0.0, "{}", anchor.name);
        }
    }
}

#[test]
fn floor_square_triangulates_into_two_triangles() {
    let snapshot = build_snapshot(
        &[DetectedAnchor::new("f", AnchorLabel::Floor, Pose::identity())],
        None,
        &SnapshotOptions::default(),
    );
    let mut document = snapshot.to_document();
    let square = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 1.0),
        Point3::new(0.0, 0.0, 1.0),
    ];
    document.anchors_by_label[0].anchors[0].boundary_world = square
        .iter()
        .map(roomsnap_geometry::pose::point_to_json)
        .collect();

    let scene = reconstruct(&document).unwrap();
    let mesh = scene.anchors()[0].mesh.as_ref().unwrap();
    assert_eq!(mesh.triangle_count(), 2);

    let areas: Vec<f64> = mesh
        .triangles()
        .map(|tri| {
            let pts: Vec<Point2<f64>> = tri
                .iter()
                .filter_map(|&i| mesh.vertex(i as usize))
                .map(|p| Point2::new(p.x, p.y))
                .collect();
            signed_area(&pts)
        })
        .collect();
    assert!(areas.iter().all(|&a| a > 0.0) || areas.iter().all(|&a| a < 0.0));
    assert_relative_eq!(areas.iter().sum::<f64>().abs(), 1.0, epsilon = 1e-6);
}

#[test]
fn table_offset_aligns_with_pure_translation() {
    let snapshot = build_snapshot(
        &[DetectedAnchor::new("table", AnchorLabel::Table, Pose::identity())],
        None,
        &SnapshotOptions::default(),
    );
    let scene = reconstruct(&snapshot.to_document()).unwrap();
    let live = LiveRoom::new(vec![LiveAnchor::new(
        "TABLE",
        AnchorLabel::Table,
        Pose::at(Point3::new(1.0, 0.0, 0.0)),
    )]);

    let mut engine = RegistrationEngine::default();
    let alignment = engine.align(&scene, &live).alignment().cloned().unwrap();

    assert_relative_eq!(
        alignment.transform.transform_point(&Point3::origin()),
        Point3::new(1.0, 0.0, 0.0),
        epsilon = 1e-12
    );
    assert_relative_eq!(alignment.transform.angle(), 0.0, epsilon = 1e-12);
    assert_eq!(alignment.anchor_id.as_str(), "table");
}

#[test]
fn rotated_room_alignment_moves_every_anchor() {
    let detected = living_room();
    let snapshot = build_snapshot(&detected, None, &SnapshotOptions::default());
    let scene = reconstruct(&snapshot.to_document()).unwrap();

    // The whole room yawed by 40° and shifted
    let rotation = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 40f64.to_radians());
    let shift = Vector3::new(3.0, 0.0, -2.0);
    let live: LiveRoom = detected
        .iter()
        .map(|d| {
            LiveAnchor::new(
                d.id.clone(),
                d.label,
                Pose::new(rotation * d.pose.position + shift, rotation * d.pose.rotation),
            )
        })
        .collect();

    let mut engine = RegistrationEngine::default();
    let alignment = engine.align(&scene, &live).alignment().cloned().unwrap();
    assert_eq!(alignment.label, AnchorLabel::Wall);
    assert_eq!(alignment.anchor_id.as_str(), "wall-north");

    let table = &detected[3];
    let moved = alignment.transform.transform_point(&table.pose.position);
    let expected = rotation * table.pose.position + shift;
    assert_relative_eq!(moved, expected, epsilon = 1e-9);
}

#[test]
fn no_shared_id_fails_without_transform() {
    let snapshot = build_snapshot(&living_room(), None, &SnapshotOptions::default());
    let scene = reconstruct(&snapshot.to_document()).unwrap();
    let live = LiveRoom::new(vec![LiveAnchor::new(
        "somewhere-else",
        AnchorLabel::Wall,
        Pose::identity(),
    )]);

    let mut engine = RegistrationEngine::default();
    let state = engine.align(&scene, &live);
    assert_eq!(
        state,
        &RegistrationState::Failed(AlignmentFailure::NoLiveMatch { tried: 5 })
    );
    assert!(state.alignment().is_none());
}

#[test]
fn priority_falls_through_to_matching_table() {
    let snapshot = build_snapshot(
        &[
            DetectedAnchor::new("wall", AnchorLabel::Wall, Pose::identity()),
            DetectedAnchor::new("table", AnchorLabel::Table, Pose::identity()),
        ],
        None,
        &SnapshotOptions::default(),
    );
    let scene = reconstruct(&snapshot.to_document()).unwrap();
    let live = vec![LiveAnchor::new(
        "table",
        AnchorLabel::Table,
        Pose::at(Point3::new(0.0, 0.0, 0.5)),
    )];

    let mut engine = RegistrationEngine::new(RegistrationOptions {
        label_priority: vec![AnchorLabel::Wall, AnchorLabel::Table],
    });
    let alignment = engine.align(&scene, &live).alignment().cloned().unwrap();
    assert_eq!(alignment.label, AnchorLabel::Table);
    assert_eq!(alignment.candidates_tried, 2);
}
