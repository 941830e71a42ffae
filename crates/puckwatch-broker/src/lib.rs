// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Task broker adapters for the puckwatch tracker.
//!
//! Two implementations of the producer contract: [`CloudTasksBroker`]
//! (pushed HTTP queue; the gateway endpoint is its consumer) and
//! [`RedisBroker`] + [`RedisWorker`] (pulled delayed queue consumed
//! in-process). The tracker core depends only on the `TaskBroker` /
//! `TaskHandler` traits and never observes which adapter is wired in.

pub mod cloudtasks;
pub mod envelope;
pub mod redis_queue;

pub use cloudtasks::CloudTasksBroker;
pub use envelope::{TaskEnvelope, MAX_RETRIES, TASK_KIND};
pub use redis_queue::{RedisBroker, RedisWorker};
