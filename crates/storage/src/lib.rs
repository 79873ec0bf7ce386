// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Storage layer for gridrelay: the durable job cache.

mod cache;
mod image;

pub use cache::{CacheError, JobCache};
pub use image::CURRENT_CACHE_VERSION;
