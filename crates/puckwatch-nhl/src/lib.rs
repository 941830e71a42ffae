// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! NHL API clients for the puckwatch tracker.
//!
//! Provides [`NhlClient`] (play-by-play and schedule over HTTP) and
//! [`FileScheduleSource`] (schedule snapshots from disk for integration
//! seeding).

pub mod client;
pub mod schedule_file;
pub mod types;

pub use client::NhlClient;
pub use schedule_file::FileScheduleSource;
pub use types::{GameWeekDay, PlayByPlayResponse, ScheduleResponse};
