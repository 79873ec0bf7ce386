// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! POSIX single-quote escaping.

const SAFE_PUNCT: &str = "_-./:,+=@%";

/// True when `s` can appear as a shell word without quoting.
pub fn is_safe(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || SAFE_PUNCT.contains(c))
}

/// Quote `arg` as a single shell word.
///
/// Single quotes in the value become `'\''` (close, escaped quote, reopen).
pub fn quote(arg: &str) -> String {
    if is_safe(arg) {
        return arg.to_string();
    }
    let mut out = String::with_capacity(arg.len() + 2);
    out.push('\'');
    out.push_str(&arg.replace('\'', "'\\''"));
    out.push('\'');
    out
}

#[cfg(test)]
#[path = "quote_tests.rs"]
mod tests;
