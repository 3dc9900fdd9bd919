// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Health check endpoint.

use axum::Json;
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
}

/// API information response.
#[derive(Debug, Serialize)]
pub struct ApiInfoResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub endpoints: Vec<EndpointInfo>,
}

/// Endpoint information.
#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

/// GET /api/v1/health - Health check endpoint.
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: "roomsnap-server",
    })
}

/// GET / - API information endpoint.
pub async fn info() -> Json<ApiInfoResponse> {
    Json(ApiInfoResponse {
        service: "roomsnap-server",
        version: env!("CARGO_PKG_VERSION"),
        description: "Room snapshot capture, reconstruction and anchor alignment",
        endpoints: vec![
            EndpointInfo {
                method: "GET",
                path: "/api/v1/health",
                description: "Health check endpoint",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/v1/snapshots",
                description: "Build and store a snapshot from detected anchors",
            },
            EndpointInfo {
                method: "GET",
                path: "/api/v1/snapshots/:key",
                description: "Retrieve a stored snapshot",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/v1/snapshots/:key/reconstruct",
                description: "Reconstruct local frames and meshes of a snapshot",
            },
            EndpointInfo {
                method: "PUT",
                path: "/api/v1/rooms/:room/live",
                description: "Report the live anchors of a room",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/v1/rooms/:room/align",
                description: "Align a stored snapshot with a live room",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/v1/rooms/:room/persist",
                description: "Save the live anchors of a room",
            },
        ],
    })
}
