// SPDX-FileCopyrightText: 2026 Thud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dependency resolution for a batch of discovered modules.
//!
//! Produces a total order in which every dependency precedes its dependents.
//! Among modules that are ready at the same time, the one discovered first
//! is emitted first, so resolving the same batch twice yields the same order.

use std::collections::{BTreeSet, HashMap, HashSet};

use thud_core::ThudError;

/// Computes a load order for modules added in discovery order.
#[derive(Debug, Default, Clone)]
pub struct DependencyResolver {
    modules: Vec<(String, Vec<String>)>,
    available: HashSet<String>,
}

impl DependencyResolver {
    /// Create a resolver with no modules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Names that satisfy dependencies without being part of the batch,
    /// typically modules the host has already registered.
    pub fn with_available<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.available.extend(names.into_iter().map(Into::into));
        self
    }

    /// Add a module in discovery order.
    pub fn add_module(&mut self, name: impl Into<String>, deps: &[String]) {
        self.modules.push((name.into(), deps.to_vec()));
    }

    /// Number of modules in the batch.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Resolve and return module names in load order.
    pub fn resolve(&self) -> Result<Vec<String>, ThudError> {
        Ok(self
            .resolve_indices()?
            .into_iter()
            .map(|i| self.modules[i].0.clone())
            .collect())
    }

    /// Resolve and return discovery positions in load order.
    pub fn resolve_indices(&self) -> Result<Vec<usize>, ThudError> {
        let n = self.modules.len();

        let mut index: HashMap<&str, usize> = HashMap::with_capacity(n);
        for (i, (name, _)) in self.modules.iter().enumerate() {
            if index.insert(name.as_str(), i).is_some() {
                return Err(ThudError::DuplicateModule { name: name.clone() });
            }
        }

        // dependents[d] lists modules that wait on d; blocked[m] counts the
        // in-batch dependencies m still waits on.
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut blocked: Vec<usize> = vec![0; n];
        for (i, (name, deps)) in self.modules.iter().enumerate() {
            let mut seen = HashSet::new();
            for dep in deps {
                if !seen.insert(dep.as_str()) {
                    continue;
                }
                match index.get(dep.as_str()) {
                    Some(&d) => {
                        dependents[d].push(i);
                        blocked[i] += 1;
                    }
                    None if self.available.contains(dep) => {}
                    None => {
                        return Err(ThudError::UnresolvedDependency {
                            module: name.clone(),
                            dependency: dep.clone(),
                        });
                    }
                }
            }
        }

        let mut ready: BTreeSet<usize> = (0..n).filter(|&i| blocked[i] == 0).collect();
        let mut order = Vec::with_capacity(n);
        while let Some(next) = ready.pop_first() {
            order.push(next);
            for &dependent in &dependents[next] {
                blocked[dependent] -= 1;
                if blocked[dependent] == 0 {
                    ready.insert(dependent);
                }
            }
        }

        if order.len() < n {
            let placed: HashSet<usize> = order.iter().copied().collect();
            let cycle = self.find_cycle(&index, &placed);
            tracing::debug!(cycle = ?cycle, "dependency cycle detected");
            return Err(ThudError::CyclicDependency { cycle });
        }

        Ok(order)
    }

    /// Walk unplaced modules along their unplaced dependencies until a
    /// module repeats. Every unplaced module has at least one unplaced
    /// dependency, so the walk always closes a cycle.
    fn find_cycle(&self, index: &HashMap<&str, usize>, placed: &HashSet<usize>) -> Vec<String> {
        let Some(start) = (0..self.modules.len()).find(|i| !placed.contains(i)) else {
            return Vec::new();
        };

        let mut path: Vec<usize> = Vec::new();
        let mut position: HashMap<usize, usize> = HashMap::new();
        let mut current = start;
        loop {
            if let Some(&at) = position.get(&current) {
                return path[at..]
                    .iter()
                    .map(|&i| self.modules[i].0.clone())
                    .collect();
            }
            position.insert(current, path.len());
            path.push(current);

            let next = self.modules[current]
                .1
                .iter()
                .filter_map(|dep| index.get(dep.as_str()).copied())
                .find(|d| !placed.contains(d));
            match next {
                Some(d) => current = d,
                None => return path.iter().map(|&i| self.modules[i].0.clone()).collect(),
            }
        }
    }
}

/// Resolve a list of `(name, deps)` pairs given in discovery order.
pub fn resolve_order<'a, I>(modules: I) -> Result<Vec<String>, ThudError>
where
    I: IntoIterator<Item = (&'a str, &'a [String])>,
{
    let mut resolver = DependencyResolver::new();
    for (name, deps) in modules {
        resolver.add_module(name, deps);
    }
    resolver.resolve()
}
