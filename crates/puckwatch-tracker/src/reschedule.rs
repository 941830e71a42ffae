// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Execution-window check and the rescheduling predicate.

use chrono::{DateTime, Utc};
use puckwatch_core::{Play, TaskPayload};
use tracing::warn;

/// Last-play type reported when the window fast-path ends an iteration.
pub const WINDOW_CLOSED: &str = "window-closed";

/// Whether the payload's execution window is closed at `now`.
///
/// The boundary is inclusive: `execution_end == now` counts as closed. An
/// unparseable `execution_end` also counts as closed — better to stop
/// tracking an unknown-window game than to loop on it forever.
pub fn execution_window_closed(payload: &TaskPayload, now: DateTime<Utc>) -> bool {
    match payload.execution_end_instant() {
        Ok(None) => false,
        Ok(Some(end)) => now >= end,
        Err(e) => {
            warn!(
                game_id = payload.game.id.as_str(),
                error = %e,
                "unparseable execution window, stopping tracking"
            );
            true
        }
    }
}

/// Whether another check should run after this iteration.
///
/// Rules, evaluated in order: a closed execution window stops tracking; a
/// `game-end` play stops tracking; anything else — including an
/// unavailable play feed — continues it.
pub fn should_reschedule(
    payload: &TaskPayload,
    last_play: Option<&Play>,
    now: DateTime<Utc>,
) -> bool {
    if execution_window_closed(payload, now) {
        return false;
    }
    if last_play.is_some_and(Play::is_game_end) {
        return false;
    }
    true
}
