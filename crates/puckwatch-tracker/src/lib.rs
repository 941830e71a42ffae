// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The game-tracking control loop.
//!
//! This crate holds the logic both broker modes share: the rescheduling
//! predicate, the single-iteration [`GameProcessor`], the notification
//! fan-out, the per-game [`GameWatchHandler`], and the [`DailyScheduler`]
//! that seeds the broker from the day's schedule.

pub mod notify;
pub mod processor;
pub mod reschedule;
pub mod scheduler;
pub mod worker;

pub use notify::NotificationService;
pub use processor::GameProcessor;
pub use reschedule::{execution_window_closed, should_reschedule, WINDOW_CLOSED};
pub use scheduler::{resolve_target_date, DailyScheduler};
pub use worker::GameWatchHandler;
