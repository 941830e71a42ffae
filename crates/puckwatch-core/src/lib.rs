// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the puckwatch game tracker.
//!
//! This crate provides the foundational trait definitions, error type, and
//! domain types used throughout the puckwatch workspace. Broker, notifier,
//! and upstream adapters all implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::PuckwatchError;
pub use types::{
    Game, NotificationRequest, Play, ProcessResult, ScheduleGame, StatsSnapshot, TaskId,
    TaskPayload, Team, PLAY_GAME_END,
};

// Re-export all adapter traits at crate root.
pub use traits::{
    GameStatsSource, Notifier, PlayByPlaySource, ScheduleSource, TaskBroker, TaskFailure,
    TaskHandler,
};
