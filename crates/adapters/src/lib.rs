// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for the external boundaries of gridrelay: the grid's remote
//! shell and the source host's status API.

pub mod notify;
pub mod remote;
pub mod subprocess;

pub use notify::{LogNotifier, NotifyError, StatusNotifier, StatusReport};
pub use remote::{
    OpenSshAdapter, RemoteError, RemoteOutput, RemoteSession, RemoteShell, RemoteTarget,
};

#[cfg(any(test, feature = "test-support"))]
pub use notify::FakeStatusNotifier;
#[cfg(any(test, feature = "test-support"))]
pub use remote::{FakeRemoteShell, RemoteCall};
