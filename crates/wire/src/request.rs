// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use gr_core::Event;
use serde::{Deserialize, Serialize};

/// Request from client to daemon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// Health check ping
    Ping,

    /// Queue an event for dispatch
    Event { event: Event },

    /// Hand a payload to the unit that owns `route`
    Deliver { route: String, payload: serde_json::Value },

    /// List job cache entries
    Jobs,

    /// Get daemon status
    Status,

    /// Request daemon shutdown
    Shutdown,
}
