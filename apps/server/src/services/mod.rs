// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Service modules for snapshot storage, live rooms and persistence.

pub mod cache;
pub mod persistence;
pub mod readiness;
pub mod rooms;

pub use cache::DiskCache;
pub use persistence::{persist_all, HttpPersistence, PersistSummary};
pub use readiness::{wait_until, ReadinessState};
pub use rooms::RoomRegistry;
