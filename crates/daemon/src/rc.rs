// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run-control file: a flat TOML table of option values.

use std::path::{Path, PathBuf};

use gr_core::{ConfigStore, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RcError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{path}: option '{key}' cannot be a {kind}")]
    Unsupported { path: PathBuf, key: String, kind: &'static str },
}

/// Load the run-control file at `path`; a missing file yields an empty store.
pub fn load(path: &Path) -> Result<ConfigStore, RcError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no run-control file");
            return Ok(ConfigStore::new());
        }
        Err(source) => return Err(RcError::Read { path: path.to_path_buf(), source }),
    };
    parse(&text, path)
}

pub fn parse(text: &str, path: &Path) -> Result<ConfigStore, RcError> {
    let table = text
        .parse::<toml::Table>()
        .map_err(|source| RcError::Parse { path: path.to_path_buf(), source })?;

    let mut store = ConfigStore::new();
    for (key, raw) in table {
        let value = convert(&raw).ok_or_else(|| RcError::Unsupported {
            path: path.to_path_buf(),
            key: key.clone(),
            kind: kind(&raw),
        })?;
        store.set(key, value);
    }
    Ok(store)
}

fn convert(raw: &toml::Value) -> Option<Value> {
    match raw {
        toml::Value::String(s) => Some(Value::Str(s.clone())),
        toml::Value::Integer(i) => Some(Value::Int(*i)),
        toml::Value::Boolean(b) => Some(Value::Bool(*b)),
        toml::Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(String::from))
            .collect::<Option<Vec<_>>>()
            .map(Value::List),
        toml::Value::Float(_) | toml::Value::Datetime(_) | toml::Value::Table(_) => None,
    }
}

fn kind(raw: &toml::Value) -> &'static str {
    match raw {
        toml::Value::Array(_) => "non-string array",
        toml::Value::Table(_) => "table",
        toml::Value::Float(_) => "float",
        toml::Value::Datetime(_) => "datetime",
        _ => raw.type_str(),
    }
}

#[cfg(test)]
#[path = "rc_tests.rs"]
mod tests;
