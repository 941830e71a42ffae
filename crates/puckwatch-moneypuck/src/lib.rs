// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MoneyPuck cumulative-stats client for the puckwatch tracker.
//!
//! The source publishes one CSV per game with a header row and one row per
//! cumulative event; only the final row reflects game-to-date totals, so
//! that is the only row exposed, as a [`StatsSnapshot`].

pub mod client;

pub use client::MoneypuckClient;
