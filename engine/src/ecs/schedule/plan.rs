//! Turning task contracts into an execution order.
//!
//! Every registered task is a node. Contracts add "runs before" edges:
//!
//! ```text
//!   A.execute_before(B)          A ──► B
//!   A.execute_after(B)           B ──► A
//!
//!   slot S:   pre(S)  = tasks declaring execute_before(S)
//!             inner(S) = tasks declaring fulfills(S) or executes_within(S)
//!             post(S) = tasks declaring execute_after(S)
//!
//!             pre(S) ──► inner(S) ──► post(S)
//!                └──────────────────────┘
//! ```
//!
//! The order is a Kahn topological sort that always releases the ready task with the lowest
//! registration index, so unconstrained tasks keep their registration order and the result is
//! the same on every run.

use std::{cmp::Reverse, collections::BinaryHeap, collections::HashMap};

use fixedbitset::FixedBitSet;
use log::{debug, info};

use crate::ecs::schedule::{
    Error, Schedule, ScheduledTask,
    contract::Relation,
    task::{Id, Kind, TaskRegistry},
};

/// Tasks positioned around one slot, by registration index.
#[derive(Default)]
struct Slot {
    pre: Vec<usize>,
    inner: Vec<usize>,
    post: Vec<usize>,
}

/// Directed graph over registration indexes. `successors[a]` holds every `b` with `a ──► b`.
pub(crate) struct Graph {
    successors: Vec<FixedBitSet>,
}

impl Graph {
    pub fn new(len: usize) -> Self {
        Self {
            successors: (0..len).map(|_| FixedBitSet::with_capacity(len)).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.successors.len()
    }

    #[inline]
    pub fn add_edge(&mut self, from: usize, to: usize) {
        self.successors[from].insert(to);
    }

    #[inline]
    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.successors[from].contains(to)
    }

    fn in_degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.len()];
        for successors in &self.successors {
            for to in successors.ones() {
                degrees[to] += 1;
            }
        }
        degrees
    }

    /// Topological order, or the nodes left unordered when the graph has a cycle.
    pub fn sort(&self) -> Result<Vec<usize>, FixedBitSet> {
        let mut degrees = self.in_degrees();
        let mut ready: BinaryHeap<Reverse<usize>> = degrees
            .iter()
            .enumerate()
            .filter(|(_, degree)| **degree == 0)
            .map(|(node, _)| Reverse(node))
            .collect();

        let mut order = Vec::with_capacity(self.len());
        while let Some(Reverse(node)) = ready.pop() {
            order.push(node);
            for next in self.successors[node].ones() {
                degrees[next] -= 1;
                if degrees[next] == 0 {
                    ready.push(Reverse(next));
                }
            }
        }

        if order.len() == self.len() {
            return Ok(order);
        }

        let mut remaining = FixedBitSet::with_capacity(self.len());
        remaining.insert_range(..);
        for node in order {
            remaining.set(node, false);
        }
        Err(remaining)
    }

    /// One cycle through the unordered nodes, in edge direction.
    ///
    /// Every node Kahn's algorithm could not release has a predecessor that was not released
    /// either, so walking predecessors must eventually revisit a node.
    pub fn find_cycle(&self, remaining: &FixedBitSet) -> Vec<usize> {
        let Some(start) = remaining.ones().next() else {
            return Vec::new();
        };

        let mut path = vec![start];
        let mut on_path = FixedBitSet::with_capacity(self.len());
        on_path.insert(start);

        let mut current = start;
        loop {
            let Some(previous) = remaining.ones().find(|node| self.has_edge(*node, current)) else {
                return path;
            };
            if on_path.contains(previous) {
                let from = path.iter().position(|node| *node == previous).unwrap_or(0);
                let mut cycle = path.split_off(from);
                cycle.reverse();
                return cycle;
            }
            on_path.insert(previous);
            path.push(previous);
            current = previous;
        }
    }

    /// Group nodes of a topological order by their longest distance from a root. Every node in a
    /// stage only depends on nodes in earlier stages.
    pub fn stages(&self, order: &[usize]) -> Vec<Vec<usize>> {
        let mut depth = vec![0usize; self.len()];
        let mut stages: Vec<Vec<usize>> = Vec::new();
        for (position, node) in order.iter().enumerate() {
            let stage = depth[*node];
            if stage >= stages.len() {
                stages.resize_with(stage + 1, Vec::new);
            }
            stages[stage].push(position);
            for next in self.successors[*node].ones() {
                depth[next] = depth[next].max(stage + 1);
            }
        }
        stages
    }
}

/// Build the dependency graph from each task's contract and sort it.
pub(crate) fn build(registry: &TaskRegistry) -> Result<Schedule, Error> {
    let definitions: Vec<_> = registry.iter().collect();
    let mut graph = Graph::new(definitions.len());
    let mut slots: HashMap<Id, Slot> = HashMap::new();

    for (index, definition) in definitions.iter().enumerate() {
        for constraint in definition.contract().constraints() {
            let target = constraint.target;
            match (target.kind, constraint.relation) {
                (Kind::Task, Relation::Before | Relation::After) => {
                    let other = registry.position(target.id).ok_or(Error::UnknownTask {
                        task: definition.name(),
                        target: target.name,
                    })?;
                    if constraint.relation == Relation::Before {
                        graph.add_edge(index, other);
                    } else {
                        graph.add_edge(other, index);
                    }
                }
                (Kind::Task, Relation::Within | Relation::Fulfills) => {
                    return Err(Error::NotASlot {
                        task: definition.name(),
                        target: target.name,
                    });
                }
                (Kind::Slot, relation) => {
                    let slot = slots.entry(target.id).or_default();
                    match relation {
                        Relation::Before => slot.pre.push(index),
                        Relation::After => slot.post.push(index),
                        Relation::Within | Relation::Fulfills => slot.inner.push(index),
                    }
                }
            }
        }
    }

    for slot in slots.values() {
        for &pre in &slot.pre {
            for &task in slot.inner.iter().chain(&slot.post) {
                graph.add_edge(pre, task);
            }
        }
        for &inner in &slot.inner {
            for &post in &slot.post {
                graph.add_edge(inner, post);
            }
        }
    }

    let order = graph.sort().map_err(|remaining| Error::Cycle {
        tasks: graph
            .find_cycle(&remaining)
            .into_iter()
            .map(|index| definitions[index].name())
            .collect(),
    })?;
    let stages = graph.stages(&order);

    let tasks: Vec<ScheduledTask> = order
        .iter()
        .map(|index| ScheduledTask::new(definitions[*index]))
        .collect();

    info!("built schedule of {} tasks in {} stages", tasks.len(), stages.len());
    debug!(
        "task order: {}",
        tasks.iter().map(ScheduledTask::name).collect::<Vec<_>>().join(" -> ")
    );

    Ok(Schedule::new(tasks, stages))
}
