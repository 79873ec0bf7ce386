// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Merge-aware configuration store.
//!
//! Every runtime setting lives in a single ordered [`ConfigStore`]. Stores are
//! layered by merging: unit defaults first (in resolution order), then the
//! run-control file, then command-line overrides. [`Value::Unset`] is the
//! "not specified" sentinel and never clobbers a concrete value.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// A single configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<String>),
    /// Sentinel: an option that exists but was never given a real value.
    #[serde(skip_deserializing)]
    Unset,
}

impl Value {
    pub fn is_unset(&self) -> bool {
        matches!(self, Value::Unset)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Parse a command-line override.
    ///
    /// `true`/`false` become booleans, integers become `Int`, a value with a
    /// comma becomes a list, anything else is a string.
    pub fn parse_override(raw: &str) -> Value {
        match raw {
            "true" => return Value::Bool(true),
            "false" => return Value::Bool(false),
            _ => {}
        }
        if let Ok(i) = raw.parse::<i64>() {
            return Value::Int(i);
        }
        if raw.contains(',') {
            return Value::List(
                raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect(),
            );
        }
        Value::Str(raw.to_string())
    }

    fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Unset => "unset",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::List(items) => write!(f, "{items:?}"),
            Value::Unset => f.write_str("<unset>"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

impl From<&[&str]> for Value {
    fn from(items: &[&str]) -> Self {
        Value::List(items.iter().map(|s| s.to_string()).collect())
    }
}

/// Errors raised when reading typed values out of the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("required option '{0}' is not set")]
    Missing(String),
    #[error("option '{name}' must be a {expected}, found {found}")]
    WrongType { name: String, expected: &'static str, found: &'static str },
    #[error("option '{name}' is invalid: {reason}")]
    Invalid { name: String, reason: String },
}

/// Combines an existing value with an incoming one during [`ConfigStore::merge`].
pub type Updater = Arc<dyn Fn(&Value, &Value) -> Value + Send + Sync>;

/// Updater that concatenates list values instead of replacing them.
///
/// Non-list inputs fall back to plain replacement.
pub fn concat_lists() -> Updater {
    Arc::new(|old, new| match (old, new) {
        (Value::List(a), Value::List(b)) => Value::List(a.iter().chain(b).cloned().collect()),
        (_, new) => new.clone(),
    })
}

static UNSET: Value = Value::Unset;

/// Ordered option-name → value mapping with per-key updaters.
#[derive(Clone, Default)]
pub struct ConfigStore {
    values: IndexMap<String, Value>,
    updaters: HashMap<String, Updater>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `(name, value)` pairs, in order.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut store = Self::new();
        for (k, v) in pairs {
            store.set(k, v);
        }
        store
    }

    /// Current value, or [`Value::Unset`] when the option was never set.
    pub fn get(&self, name: &str) -> &Value {
        self.values.get(name).unwrap_or(&UNSET)
    }

    /// Store a value. An `Unset` value never replaces an existing entry.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        if value.is_unset() && self.values.contains_key(&name) {
            return;
        }
        self.values.insert(name, value);
    }

    /// Remove an option entirely.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.shift_remove(name)
    }

    /// Register an updater invoked by [`merge`](Self::merge) for `name`.
    pub fn register_updater(&mut self, name: impl Into<String>, updater: Updater) {
        self.updaters.insert(name.into(), updater);
    }

    /// Apply every entry of `other`, in `other`'s order.
    ///
    /// Incoming `Unset` values are ignored when the key exists. When both the
    /// stored and incoming values are concrete and the key has an updater,
    /// the updater's result is stored instead of the incoming value.
    pub fn merge(&mut self, other: &ConfigStore) {
        for (name, incoming) in &other.values {
            if incoming.is_unset() {
                self.set(name.clone(), Value::Unset);
                continue;
            }
            let merged = match (self.values.get(name), self.updaters.get(name)) {
                (Some(current), Some(updater)) if !current.is_unset() => updater(current, incoming),
                _ => incoming.clone(),
            };
            self.values.insert(name.clone(), merged);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn is_set(&self, name: &str) -> bool {
        !self.get(name).is_unset()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// String option; `Ok(None)` when unset.
    pub fn str(&self, name: &str) -> Result<Option<&str>, ConfigError> {
        match self.get(name) {
            Value::Unset => Ok(None),
            Value::Str(s) => Ok(Some(s)),
            other => Err(wrong_type(name, "string", other)),
        }
    }

    /// String option that must be set and non-empty.
    pub fn require_str(&self, name: &str) -> Result<&str, ConfigError> {
        match self.str(name)? {
            Some(s) if !s.is_empty() => Ok(s),
            _ => Err(ConfigError::Missing(name.to_string())),
        }
    }

    /// Boolean option; unset reads as `false`.
    pub fn bool(&self, name: &str) -> Result<bool, ConfigError> {
        match self.get(name) {
            Value::Unset => Ok(false),
            Value::Bool(b) => Ok(*b),
            other => Err(wrong_type(name, "bool", other)),
        }
    }

    pub fn int(&self, name: &str) -> Result<Option<i64>, ConfigError> {
        match self.get(name) {
            Value::Unset => Ok(None),
            Value::Int(i) => Ok(Some(*i)),
            Value::Str(s) => s.parse().map(Some).map_err(|_| ConfigError::Invalid {
                name: name.to_string(),
                reason: format!("{s:?} is not an integer"),
            }),
            other => Err(wrong_type(name, "int", other)),
        }
    }

    /// List option; unset reads as empty, a single string as a one-item list.
    pub fn list(&self, name: &str) -> Result<Vec<String>, ConfigError> {
        match self.get(name) {
            Value::Unset => Ok(Vec::new()),
            Value::List(items) => Ok(items.clone()),
            Value::Str(s) => Ok(vec![s.clone()]),
            other => Err(wrong_type(name, "list", other)),
        }
    }
}

fn wrong_type(name: &str, expected: &'static str, found: &Value) -> ConfigError {
    ConfigError::WrongType { name: name.to_string(), expected, found: found.kind() }
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.values.iter()).finish()
    }
}

impl PartialEq for ConfigStore {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl fmt::Display for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.values.keys().collect();
        keys.sort();
        for key in keys {
            writeln!(f, "{} = {}", key, self.values[key])?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
