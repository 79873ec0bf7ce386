// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use gr_core::{concat_lists, Value};
use serde_json::json;

struct Plain(UnitDescriptor);

impl Unit for Plain {
    fn descriptor(&self) -> &UnitDescriptor {
        &self.0
    }
}

#[test]
fn descriptor_builder_collects_everything() {
    let descriptor = UnitDescriptor::new("grid-status")
        .requires(["grid-base", "source-host"])
        .route("/gridstatus")
        .runs_for(["status-update"])
        .defaults(ConfigStore::from_pairs([("grid_port", Value::Int(22))]))
        .updater("log_directives", concat_lists());

    assert_eq!(descriptor.name, "grid-status");
    assert_eq!(descriptor.requires, vec!["grid-base", "source-host"]);
    assert_eq!(descriptor.route.as_deref(), Some("/gridstatus"));
    assert_eq!(descriptor.defaults.get("grid_port"), &Value::Int(22));
    assert_eq!(descriptor.updaters.len(), 1);
    assert!(format!("{descriptor:?}").contains("log_directives"));
}

#[yare::parameterized(
    listed     = { &["new-request", "sync-request"], "sync-request", true },
    not_listed = { &["new-request"],                 "status-update", false },
    empty      = { &[],                              "new-request",   false },
)]
fn interest_is_by_event_name(runs_for: &[&str], event: &str, expected: bool) {
    let descriptor = UnitDescriptor::new("u").runs_for(runs_for.iter().copied());
    assert_eq!(descriptor.interested_in(&EventName::new(event)), expected);
}

#[tokio::test]
async fn trait_defaults_are_no_ops() {
    let unit = Plain(UnitDescriptor::new("meta"));
    assert_eq!(unit.name(), "meta");

    let mut config = ConfigStore::new();
    unit.setup(&mut config).unwrap();
    assert!(config.is_empty());
    assert!(unit.intake(&json!({"anything": true})).unwrap().is_none());

    let dir = tempfile::tempdir().unwrap();
    let mut ctx = crate::test_helpers::bare_context(&dir);
    unit.execute(&mut ctx).await.unwrap();
}
