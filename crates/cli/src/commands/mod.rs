// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

pub mod daemon;
pub mod emit;

use std::io::Read;

use anyhow::Context as _;

/// Parse a JSON argument, or the whole of `stdin` when it is absent.
pub fn read_payload(
    arg: Option<String>,
    mut stdin: impl Read,
) -> anyhow::Result<serde_json::Value> {
    let text = match arg {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            stdin.read_to_string(&mut buf).context("failed to read payload from stdin")?;
            buf
        }
    };
    serde_json::from_str(&text).context("invalid JSON payload")
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
