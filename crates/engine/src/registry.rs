// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unit registry and dependency resolution.
//!
//! Units are registered once at startup. [`Registry::resolve`] computes the
//! closure of the requested units over `requires` and orders it so every
//! unit comes after the units it requires. Among units that are ready at the
//! same time, the one registered first wins, so the order (and therefore
//! the merged configuration) is the same on every run.

use crate::unit::{Unit, UnitError};
use gr_core::ConfigStore;
use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap};
use std::sync::Arc;
use thiserror::Error;

/// Errors from registering or resolving units
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("unit '{0}' is registered twice")]
    DuplicateUnit(String),
    #[error("unknown unit '{name}'{}", required_by_suffix(.required_by))]
    UnknownUnit { name: String, required_by: Option<String> },
    #[error("cyclic unit dependency among: {}", .0.join(", "))]
    CyclicDependency(Vec<String>),
}

fn required_by_suffix(required_by: &Option<String>) -> String {
    match required_by {
        Some(unit) => format!(" (required by '{unit}')"),
        None => String::new(),
    }
}

/// All known units, in registration order.
#[derive(Default)]
pub struct Registry {
    units: Vec<Arc<dyn Unit>>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, unit: Arc<dyn Unit>) -> Result<(), RegistryError> {
        let name = unit.name().to_string();
        if self.index.contains_key(&name) {
            return Err(RegistryError::DuplicateUnit(name));
        }
        self.index.insert(name, self.units.len());
        self.units.push(unit);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Unit>> {
        self.index.get(name).map(|&i| &self.units[i])
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.units.iter().map(|u| u.name())
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Order the requested units and everything they transitively require.
    pub fn resolve<S: AsRef<str>>(
        &self,
        requested: &[S],
    ) -> Result<Vec<Arc<dyn Unit>>, RegistryError> {
        let members = self.closure(requested)?;

        // In-degree counts only edges inside the closure
        let mut in_degree: HashMap<usize, usize> = HashMap::new();
        let mut dependents: HashMap<usize, Vec<usize>> = HashMap::new();
        for &idx in &members {
            let mut degree = 0;
            for req in self.units[idx].descriptor().requires.iter() {
                let Some(&dep) = self.index.get(req) else { continue };
                if dep == idx {
                    return Err(RegistryError::CyclicDependency(vec![req.clone()]));
                }
                dependents.entry(dep).or_default().push(idx);
                degree += 1;
            }
            in_degree.insert(idx, degree);
        }

        let mut ready: BinaryHeap<Reverse<usize>> =
            in_degree.iter().filter(|&(_, &d)| d == 0).map(|(&i, _)| Reverse(i)).collect();
        let mut order = Vec::with_capacity(members.len());

        while let Some(Reverse(idx)) = ready.pop() {
            order.push(Arc::clone(&self.units[idx]));
            for &next in dependents.get(&idx).map(Vec::as_slice).unwrap_or_default() {
                if let Some(degree) = in_degree.get_mut(&next) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push(Reverse(next));
                    }
                }
            }
        }

        if order.len() != members.len() {
            let mut stuck: Vec<usize> =
                in_degree.into_iter().filter(|(_, d)| *d > 0).map(|(i, _)| i).collect();
            stuck.sort_unstable();
            return Err(RegistryError::CyclicDependency(
                stuck.into_iter().map(|i| self.units[i].name().to_string()).collect(),
            ));
        }
        Ok(order)
    }

    /// Indices of the requested units plus everything they require.
    fn closure<S: AsRef<str>>(&self, requested: &[S]) -> Result<BTreeSet<usize>, RegistryError> {
        let mut members = BTreeSet::new();
        let mut stack: Vec<(String, Option<String>)> =
            requested.iter().rev().map(|n| (n.as_ref().to_string(), None)).collect();

        while let Some((name, required_by)) = stack.pop() {
            let Some(&idx) = self.index.get(&name) else {
                return Err(RegistryError::UnknownUnit { name, required_by });
            };
            if !members.insert(idx) {
                continue;
            }
            for req in self.units[idx].descriptor().requires.iter().rev() {
                stack.push((req.clone(), Some(name.clone())));
            }
        }
        Ok(members)
    }
}

/// Merge every unit's defaults into `store`, in order.
///
/// Updaters are registered before any defaults are merged, so a later
/// unit's default for a list option accumulates onto an earlier one.
pub fn apply_defaults(order: &[Arc<dyn Unit>], store: &mut ConfigStore) {
    for unit in order {
        for (option, updater) in &unit.descriptor().updaters {
            store.register_updater(option.clone(), Arc::clone(updater));
        }
    }
    for unit in order {
        store.merge(&unit.descriptor().defaults);
    }
}

/// Run every unit's setup against the fully merged store, in order.
pub fn setup_units(order: &[Arc<dyn Unit>], store: &mut ConfigStore) -> Result<(), SetupError> {
    for unit in order {
        unit.setup(store).map_err(|source| SetupError { unit: unit.name().to_string(), source })?;
    }
    Ok(())
}

/// A unit rejected the configuration at startup.
#[derive(Debug, Error)]
#[error("unit '{unit}' setup failed: {source}")]
pub struct SetupError {
    pub unit: String,
    #[source]
    pub source: UnitError,
}

/// First unit in `order` that owns `route`.
pub fn route_owner<'a>(order: &'a [Arc<dyn Unit>], route: &str) -> Option<&'a Arc<dyn Unit>> {
    order.iter().find(|u| u.descriptor().route.as_deref() == Some(route))
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
