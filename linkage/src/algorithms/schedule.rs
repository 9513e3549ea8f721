//! Earliest/latest start times over the task dependency graph.
//!
//! Forward pass: a task starts when its last predecessor finishes. Backward
//! pass: the latest start that does not delay the whole plan. Zero-slack
//! tasks form the critical path.

use crate::geometry::tolerance::EPS_POS;
use crate::model::ShapeId;
use crate::Drawing;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TaskTimes {
    pub duration: f32,
    pub earliest_start: f32,
    pub earliest_finish: f32,
    pub latest_start: f32,
    pub latest_finish: f32,
}

impl TaskTimes {
    pub fn slack(&self) -> f32 {
        self.latest_start - self.earliest_start
    }
    pub fn is_critical(&self) -> bool {
        self.slack().abs() <= EPS_POS
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Schedule {
    pub times: BTreeMap<ShapeId, TaskTimes>,
    pub makespan: f32,
    /// Critical tasks in dependency order.
    pub critical_path: Vec<ShapeId>,
}

impl Schedule {
    pub fn get(&self, task: ShapeId) -> Option<&TaskTimes> {
        self.times.get(&task)
    }
}

impl Drawing {
    /// Schedule every task shape, isolated ones included.
    pub fn schedule(&self) -> Schedule {
        let durations: BTreeMap<ShapeId, f32> = self
            .shapes
            .iter()
            .enumerate()
            .filter_map(|(i, s)| {
                let task = s.as_ref()?.task_info()?;
                Some((i as ShapeId, task.effective_duration()))
            })
            .collect();
        if durations.is_empty() {
            return Schedule::default();
        }

        // Linked tasks in dependency order, then the isolated ones.
        let mut order = self.tracker.topological_order();
        let linked: std::collections::BTreeSet<ShapeId> = order.iter().copied().collect();
        order.retain(|id| durations.contains_key(id));
        order.extend(durations.keys().copied().filter(|id| !linked.contains(id)));

        let mut times: BTreeMap<ShapeId, TaskTimes> = BTreeMap::new();
        for &id in &order {
            let duration = durations[&id];
            let earliest_start = self
                .tracker
                .predecessors(id)
                .iter()
                .filter_map(|p| times.get(p).map(|t| t.earliest_finish))
                .fold(0.0_f32, f32::max);
            times.insert(
                id,
                TaskTimes {
                    duration,
                    earliest_start,
                    earliest_finish: earliest_start + duration,
                    latest_start: 0.0,
                    latest_finish: 0.0,
                },
            );
        }

        let makespan = times.values().map(|t| t.earliest_finish).fold(0.0_f32, f32::max);
        for &id in order.iter().rev() {
            let latest_finish = self
                .tracker
                .successors(id)
                .iter()
                .filter_map(|s| times.get(s).map(|t| t.latest_start))
                .fold(makespan, f32::min);
            if let Some(t) = times.get_mut(&id) {
                t.latest_finish = latest_finish;
                t.latest_start = latest_finish - t.duration;
            }
        }

        let critical_path = order
            .iter()
            .copied()
            .filter(|id| times.get(id).map_or(false, TaskTimes::is_critical))
            .collect();
        tracing::trace!(tasks = times.len(), makespan, "schedule computed");
        Schedule {
            times,
            makespan,
            critical_path,
        }
    }
}
