// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits defining the seams of the tracker: the task broker, the
//! notifier, and the three upstream data sources.

pub mod broker;
pub mod notify;
pub mod upstream;

pub use broker::{TaskBroker, TaskFailure, TaskHandler};
pub use notify::Notifier;
pub use upstream::{GameStatsSource, PlayByPlaySource, ScheduleSource};
