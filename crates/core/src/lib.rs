// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gr-core: shared data model for the gridrelay CI relay

pub mod macros;

pub mod config;
pub mod event;
pub mod job;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::{concat_lists, ConfigError, ConfigStore, Updater, Value};
pub use event::{Event, EventName, PayloadError, RequestDescriptor, Revision, Status, StatusPayload};
#[cfg(any(test, feature = "test-support"))]
pub use event::RequestDescriptorBuilder;
#[cfg(any(test, feature = "test-support"))]
pub use job::JobRecordBuilder;
pub use job::{JobKey, JobRecord};
