// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Optional anchor persistence.
//!
//! Anchors are saved one after another, each save bounded by a timeout.
//! A failing or slow save is logged and never cancels the remaining ones.
//! The service answers every save with `{ "success": bool }`.

use roomsnap_core::{AnchorId, AnchorLabel, QuatJson, Vec3Json};
use roomsnap_processing::LiveAnchor;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Response of the persistence service for one anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResult {
    pub success: bool,
}

/// Totals of one persistence run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PersistSummary {
    pub saved: usize,
    pub total: usize,
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service answered with status {0}")]
    Status(u16),
}

/// Body sent to the persistence service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub id: AnchorId,
    pub label: AnchorLabel,
    pub position: Vec3Json,
    pub rotation: QuatJson,
}

impl From<&LiveAnchor> for SaveRequest {
    fn from(anchor: &LiveAnchor) -> Self {
        Self {
            id: anchor.id.clone(),
            label: anchor.label,
            position: anchor.pose.position_json(),
            rotation: anchor.pose.rotation_json(),
        }
    }
}

/// Something that can store a single anchor.
pub trait AnchorPersistence {
    fn save(
        &self,
        anchor: &LiveAnchor,
    ) -> impl Future<Output = Result<SaveResult, PersistError>> + Send;
}

/// Persistence service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPersistence {
    url: String,
    http: reqwest::Client,
}

impl HttpPersistence {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl AnchorPersistence for HttpPersistence {
    async fn save(&self, anchor: &LiveAnchor) -> Result<SaveResult, PersistError> {
        let resp = self
            .http
            .post(&self.url)
            .json(&SaveRequest::from(anchor))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(PersistError::Status(resp.status().as_u16()));
        }

        Ok(resp.json::<SaveResult>().await?)
    }
}

/// Save every anchor sequentially, each bounded by `timeout`.
pub async fn persist_all<P: AnchorPersistence>(
    persistence: &P,
    anchors: &[LiveAnchor],
    timeout: Duration,
) -> PersistSummary {
    let mut saved = 0;

    for anchor in anchors {
        match tokio::time::timeout(timeout, persistence.save(anchor)).await {
            Ok(Ok(SaveResult { success: true })) => saved += 1,
            Ok(Ok(SaveResult { success: false })) => {
                tracing::warn!(anchor = %anchor.id, "Persistence service rejected anchor");
            }
            Ok(Err(e)) => {
                tracing::warn!(anchor = %anchor.id, error = %e, "Anchor save failed");
            }
            Err(_) => {
                tracing::warn!(
                    anchor = %anchor.id,
                    timeout_ms = timeout.as_millis() as u64,
                    "Anchor save timed out"
                );
            }
        }
    }

    let summary = PersistSummary {
        saved,
        total: anchors.len(),
    };
    tracing::info!(saved = summary.saved, total = summary.total, "Anchors persisted");
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomsnap_geometry::{Point3, Pose};
    use std::sync::Mutex;

    /// Answers by id prefix: `ok*` succeeds, `no*` is rejected, `slow*` hangs,
    /// everything else fails.
    #[derive(Default)]
    struct ScriptedPersistence {
        seen: Mutex<Vec<String>>,
    }

    impl AnchorPersistence for ScriptedPersistence {
        async fn save(&self, anchor: &LiveAnchor) -> Result<SaveResult, PersistError> {
            let id = anchor.id.as_str().to_string();
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(id.clone());
            }
            if id.starts_with("ok") {
                Ok(SaveResult { success: true })
            } else if id.starts_with("no") {
                Ok(SaveResult { success: false })
            } else if id.starts_with("slow") {
                std::future::pending::<()>().await;
                Ok(SaveResult { success: true })
            } else {
                Err(PersistError::Status(500))
            }
        }
    }

    fn anchor(id: &str) -> LiveAnchor {
        LiveAnchor::new(id, AnchorLabel::Wall, Pose::at(Point3::new(1.0, 2.0, 3.0)))
    }

    #[tokio::test(start_paused = true)]
    async fn failures_do_not_stop_remaining_saves() {
        let persistence = ScriptedPersistence::default();
        let anchors = vec![
            anchor("ok-1"),
            anchor("broken"),
            anchor("slow-1"),
            anchor("no-1"),
            anchor("ok-2"),
        ];

        let summary = persist_all(&persistence, &anchors, Duration::from_millis(250)).await;

        assert_eq!(summary, PersistSummary { saved: 2, total: 5 });
        let seen = persistence.seen.lock().unwrap().clone();
        assert_eq!(seen, vec!["ok-1", "broken", "slow-1", "no-1", "ok-2"]);
    }

    #[tokio::test]
    async fn empty_room_saves_nothing() {
        let persistence = ScriptedPersistence::default();
        let summary = persist_all(&persistence, &[], Duration::from_millis(10)).await;
        assert_eq!(summary, PersistSummary { saved: 0, total: 0 });
    }

    #[test]
    fn save_request_shape() {
        let json = serde_json::to_value(SaveRequest::from(&anchor("Door-7"))).unwrap();
        assert_eq!(json["id"], "door-7");
        assert_eq!(json["label"], "WALL_FACE");
        assert_eq!(json["position"]["y"], 2.0);
        assert_eq!(json["rotation"]["w"], 1.0);
    }

    #[test]
    fn save_result_contract() {
        let result: SaveResult = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(result.success);
    }
}
