//! Scenario dependency resolution with topological sorting
//!
//! Handles the `depends` field so that every scenario runs after the scenarios
//! it depends on. Scenarios without an ordering constraint between them keep
//! their load order.

use std::collections::HashMap;

use thiserror::Error;

use crate::scenario::Scenario;

/// Why a set of scenarios has no valid execution order
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DependencyError {
    #[error("scenario '{scenario}' depends on non-existent scenario '{dependency}'")]
    MissingDependency { scenario: String, dependency: String },

    #[error("circular dependency detected involving scenario '{scenario}'")]
    CircularDependency { scenario: String },

    #[error("duplicate scenario name '{scenario}'")]
    DuplicateScenario { scenario: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Done,
}

/// Compute the execution order as indices into `scenarios`
///
/// Depth-first: roots are taken in load order and each scenario's dependencies
/// are finished, in declared order, before the scenario itself is appended.
/// Uses an explicit frame stack so long dependency chains cannot overflow the
/// call stack.
pub fn resolve_order(scenarios: &[Scenario]) -> Result<Vec<usize>, DependencyError> {
    let mut name_to_idx: HashMap<&str, usize> = HashMap::with_capacity(scenarios.len());
    for (i, scenario) in scenarios.iter().enumerate() {
        if name_to_idx.insert(scenario.name.as_str(), i).is_some() {
            return Err(DependencyError::DuplicateScenario {
                scenario: scenario.name.clone(),
            });
        }
    }

    // deps[i] holds the indices scenario i depends on, in declared order
    let mut deps: Vec<Vec<usize>> = Vec::with_capacity(scenarios.len());
    for scenario in scenarios {
        let mut resolved = Vec::with_capacity(scenario.depends.len());
        for dep_name in &scenario.depends {
            match name_to_idx.get(dep_name.as_str()) {
                Some(&dep_idx) => resolved.push(dep_idx),
                None => {
                    return Err(DependencyError::MissingDependency {
                        scenario: scenario.name.clone(),
                        dependency: dep_name.clone(),
                    });
                }
            }
        }
        deps.push(resolved);
    }

    let mut marks = vec![Mark::Unvisited; scenarios.len()];
    let mut order = Vec::with_capacity(scenarios.len());
    // (scenario index, position of the next dependency to visit)
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for root in 0..scenarios.len() {
        if marks[root] == Mark::Done {
            continue;
        }
        marks[root] = Mark::Visiting;
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let (node, next) = *frame;

            if let Some(&dep) = deps[node].get(next) {
                frame.1 += 1;
                match marks[dep] {
                    Mark::Visiting => {
                        return Err(DependencyError::CircularDependency {
                            scenario: scenarios[dep].name.clone(),
                        });
                    }
                    Mark::Done => {}
                    Mark::Unvisited => {
                        marks[dep] = Mark::Visiting;
                        stack.push((dep, 0));
                    }
                }
            } else {
                marks[node] = Mark::Done;
                order.push(node);
                stack.pop();
            }
        }
    }

    Ok(order)
}

/// Get scenarios in execution order, respecting `depends`
pub fn execution_order(scenarios: &[Scenario]) -> Result<Vec<&Scenario>, DependencyError> {
    let order = resolve_order(scenarios)?;
    Ok(order.into_iter().map(|i| &scenarios[i]).collect())
}
