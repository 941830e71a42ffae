// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared mock adapters for deterministic puckwatch tests.
//!
//! Mocks capture the calls made against them so tests can assert on
//! interaction counts and recorded arguments.

pub mod mock_broker;
pub mod mock_notifier;
pub mod mock_upstream;

pub use mock_broker::MockBroker;
pub use mock_notifier::MockNotifier;
pub use mock_upstream::{MockPlaySource, MockScheduleSource, MockStatsSource};
