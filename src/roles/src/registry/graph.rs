//! Role inheritance graph with Kahn's algorithm for ordering
//!
//! Used to:
//! 1. Order role declarations so parents are registered before children
//! 2. Detect inheritance cycles and report the full path

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::error::{AuthorizeError, Result};
use crate::types::RoleId;

/// Inheritance graph over a set of roles
///
/// Edges to roles that were never added as nodes are ignored when ordering;
/// callers decide whether such parents are an error.
#[derive(Debug, Clone, Default)]
pub struct InheritanceGraph {
    /// role -> parents
    parents: BTreeMap<RoleId, Vec<RoleId>>,
}

impl InheritanceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a role node with its parents
    pub fn add_role(&mut self, role: impl Into<RoleId>, parents: &[RoleId]) {
        let entry = self.parents.entry(role.into()).or_default();
        for parent in parents {
            if !entry.contains(parent) {
                entry.push(parent.clone());
            }
        }
    }

    pub fn contains(&self, role: &str) -> bool {
        self.parents.contains_key(role)
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Returns roles ordered so that every parent precedes its children
    ///
    /// Kahn's algorithm; ties are broken by role id so the order is stable.
    ///
    /// # Errors
    ///
    /// `CircularDependency` with the offending path when the graph has a cycle.
    pub fn resolve_order(&self) -> Result<Vec<RoleId>> {
        let mut in_degree: BTreeMap<&str, usize> = BTreeMap::new();
        let mut children: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

        for (role, parents) in &self.parents {
            let known = parents.iter().filter(|p| self.contains(p));
            let mut degree = 0;
            for parent in known {
                children.entry(parent.as_str()).or_default().push(role.as_str());
                degree += 1;
            }
            in_degree.insert(role.as_str(), degree);
        }

        let mut ready: BTreeSet<&str> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(role, _)| *role)
            .collect();
        let mut sorted = Vec::with_capacity(self.parents.len());

        while let Some(current) = ready.pop_first() {
            sorted.push(current.to_string());

            if let Some(dependents) = children.get(current) {
                for child in dependents {
                    if let Some(degree) = in_degree.get_mut(child) {
                        *degree -= 1;
                        if *degree == 0 {
                            ready.insert(*child);
                        }
                    }
                }
            }
        }

        if sorted.len() < self.parents.len() {
            let cycle = self
                .find_cycle()
                .unwrap_or_else(|| vec!["<unresolved>".to_string()]);
            return Err(AuthorizeError::CircularDependency { cycle });
        }

        Ok(sorted)
    }

    /// Finds one cycle, returned as a closed path (`a -> b -> a`)
    pub fn find_cycle(&self) -> Option<Vec<RoleId>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Visiting,
            Done,
        }

        fn visit<'a>(
            graph: &'a InheritanceGraph,
            role: &'a str,
            marks: &mut BTreeMap<&'a str, Mark>,
            path: &mut Vec<&'a str>,
        ) -> Option<Vec<RoleId>> {
            match marks.get(role) {
                Some(Mark::Done) => return None,
                Some(Mark::Visiting) => {
                    let start = path.iter().position(|r| *r == role).unwrap_or(0);
                    let mut cycle: Vec<RoleId> =
                        path[start..].iter().map(|r| r.to_string()).collect();
                    cycle.push(role.to_string());
                    return Some(cycle);
                }
                None => {}
            }

            marks.insert(role, Mark::Visiting);
            path.push(role);

            if let Some(parents) = graph.parents.get(role) {
                for parent in parents.iter().filter(|p| graph.contains(p)) {
                    if let Some(cycle) = visit(graph, parent, marks, path) {
                        return Some(cycle);
                    }
                }
            }

            path.pop();
            marks.insert(role, Mark::Done);
            None
        }

        let mut marks = BTreeMap::new();
        let mut path = Vec::new();
        for role in self.parents.keys() {
            if let Some(cycle) = visit(self, role, &mut marks, &mut path) {
                return Some(cycle);
            }
        }
        None
    }
}

/// Sorts items into inheritance order, keyed by the id each item reports
pub(crate) fn ordered<T, F>(items: Vec<T>, id_of: F, graph: &InheritanceGraph) -> Result<Vec<T>>
where
    F: Fn(&T) -> &str,
{
    let order = graph.resolve_order()?;
    let mut by_id: BTreeMap<String, VecDeque<T>> = BTreeMap::new();
    for item in items {
        by_id.entry(id_of(&item).to_string()).or_default().push_back(item);
    }

    let mut out = Vec::with_capacity(order.len());
    for id in order {
        if let Some(queue) = by_id.get_mut(&id) {
            out.extend(queue.drain(..));
        }
    }
    Ok(out)
}
