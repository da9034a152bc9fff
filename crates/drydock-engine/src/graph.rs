//! Stack dependency graph
//!
//! Built from the composed stacks before anything is submitted. Dependencies
//! point upstream (a stack lists the stacks it needs), so a valid deployment
//! is a DAG and declaration happens in topological order.

use crate::error::{ProvisionError, Result};
use crate::stack::Stack;
use std::collections::{HashMap, HashSet};

/// Dependency graph over a set of named stacks
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// Stack names in insertion order
    nodes: Vec<String>,
    /// Stack name to the names it depends on
    edges: HashMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Build the graph, rejecting duplicate names and unknown dependencies
    pub fn from_stacks<'a>(stacks: impl IntoIterator<Item = &'a Stack>) -> Result<Self> {
        let mut nodes = Vec::new();
        let mut edges: HashMap<String, Vec<String>> = HashMap::new();

        for stack in stacks {
            if edges.contains_key(&stack.name) {
                return Err(ProvisionError::DuplicateStack(stack.name.clone()));
            }
            nodes.push(stack.name.clone());
            edges.insert(stack.name.clone(), stack.depends_on.clone());
        }

        for (name, deps) in &edges {
            for dep in deps {
                if !edges.contains_key(dep) {
                    return Err(ProvisionError::MissingDependency {
                        stack: name.clone(),
                        dependency: dep.clone(),
                    });
                }
            }
        }

        Ok(Self { nodes, edges })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `from` reaches `to` along dependency edges
    pub fn depends_transitively(&self, from: &str, to: &str) -> bool {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut pending: Vec<&str> = vec![from];

        while let Some(current) = pending.pop() {
            if !seen.insert(current) {
                continue;
            }
            let Some(deps) = self.edges.get(current) else {
                continue;
            };
            for dep in deps {
                if dep == to {
                    return true;
                }
                pending.push(dep);
            }
        }
        false
    }

    /// Topological order of the stacks
    ///
    /// Deterministic for a given input: each pass admits ready stacks in
    /// insertion order. A cycle is an error naming the stuck stacks.
    pub fn topo_order(&self) -> Result<Vec<String>> {
        let mut order: Vec<String> = Vec::with_capacity(self.nodes.len());
        let mut placed: HashSet<&str> = HashSet::new();

        while order.len() < self.nodes.len() {
            let mut advanced = false;
            for name in &self.nodes {
                if placed.contains(name.as_str()) {
                    continue;
                }
                let ready = self
                    .edges
                    .get(name)
                    .is_none_or(|deps| deps.iter().all(|dep| placed.contains(dep.as_str())));
                if ready {
                    placed.insert(name);
                    order.push(name.clone());
                    advanced = true;
                }
            }
            if !advanced {
                let stuck: Vec<&str> = self
                    .nodes
                    .iter()
                    .filter(|name| !placed.contains(name.as_str()))
                    .map(String::as_str)
                    .collect();
                return Err(ProvisionError::CyclicDependency(stuck.join(", ")));
            }
        }

        Ok(order)
    }
}
