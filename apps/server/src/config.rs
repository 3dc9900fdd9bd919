// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Server configuration loaded from environment variables.

use std::time::Duration;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on.
    pub port: u16,
    /// Directory for snapshot storage.
    pub cache_dir: String,
    /// Maximum request body size in MB.
    pub max_body_size_mb: usize,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// How long alignment waits for the live room to be reported.
    pub align_wait_secs: u64,
    /// Poll interval while waiting for a live room.
    pub room_poll_interval_ms: u64,
    /// Anchor persistence endpoint; persistence is disabled when unset.
    pub persist_url: Option<String>,
    /// Upper bound for a single anchor save.
    pub persist_timeout_ms: u64,
    /// Allowed CORS origins (comma-separated, or "*" for all).
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()
                .unwrap_or(8080),
            cache_dir: std::env::var("CACHE_DIR").unwrap_or_else(|_| "./.cache".into()),
            max_body_size_mb: std::env::var("MAX_BODY_SIZE_MB")
                .unwrap_or_else(|_| "16".into())
                .parse()
                .unwrap_or(16),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".into())
                .parse()
                .unwrap_or(60),
            align_wait_secs: std::env::var("ALIGN_WAIT_SECS")
                .unwrap_or_else(|_| "10".into())
                .parse()
                .unwrap_or(10),
            room_poll_interval_ms: std::env::var("ROOM_POLL_INTERVAL_MS")
                .unwrap_or_else(|_| "100".into())
                .parse()
                .unwrap_or(100),
            persist_url: std::env::var("PERSIST_URL")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            persist_timeout_ms: std::env::var("PERSIST_TIMEOUT_MS")
                .unwrap_or_else(|_| "3000".into())
                .parse()
                .unwrap_or(3000),
            cors_origins: parse_origins(
                &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".into()),
            ),
        }
    }

    pub fn align_wait(&self) -> Duration {
        Duration::from_secs(self.align_wait_secs)
    }

    pub fn room_poll_interval(&self) -> Duration {
        // Zero would spin
        Duration::from_millis(self.room_poll_interval_ms.max(1))
    }

    pub fn persist_timeout(&self) -> Duration {
        Duration::from_millis(self.persist_timeout_ms)
    }

    /// True when any origin is allowed.
    pub fn cors_any(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
