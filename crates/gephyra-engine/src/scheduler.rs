// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Tick-synchronous scheduler.
//!
//! One entry point, invoked by the simulation engine once per simulated
//! tick on its own update thread. Every registered wrapper executes its
//! single pending unit of work synchronously, to completion, in
//! registration order, before the call returns. No component runs
//! concurrently with another, and none runs outside this callback — there
//! is no timer or background thread driving component logic. A wrapper that
//! blocks stalls the whole step for all components; that is an accepted
//! constraint of the target domain's determinism requirements, not a bug.

use crate::registry::ComponentRegistry;
use gephyra_core::simulation::StepInfo;

/// Outcome of one simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    /// Wrappers that executed a unit of work.
    pub ran: usize,
    /// Wrappers that declined to run (had nothing to do, still fine).
    pub idle: usize,
}

/// Executes the registered set once per simulation step.
#[derive(Debug, Default)]
pub struct TickScheduler {
    steps: u64,
}

impl TickScheduler {
    /// Creates a scheduler with no steps recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of steps executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Runs every registered wrapper's pending unit of work, in
    /// registration order, to completion.
    pub fn run_step(&mut self, registry: &mut ComponentRegistry, step: &StepInfo) -> StepReport {
        let mut report = StepReport { ran: 0, idle: 0 };
        for wrapper in registry.wrappers_mut() {
            if wrapper.run_once() {
                report.ran += 1;
            } else {
                report.idle += 1;
            }
        }
        self.steps += 1;
        log::trace!(
            "Scheduler: step {} of world '{}' ran {} components ({} idle)",
            step.iteration,
            step.world,
            report.ran,
            report.idle
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::BridgeComponent;
    use gephyra_core::error::ActivationError;
    use gephyra_core::runtime::{ExecutionWrapper, Task};
    use gephyra_core::transport::RemoteHandle;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    struct StubTask(String);

    impl Task for StubTask {
        fn name(&self) -> &str {
            &self.0
        }
        fn model(&self) -> &str {
            "stub"
        }
    }

    /// Records its name into a shared trace on every executed slot.
    struct TracingWrapper {
        name: &'static str,
        trace: Arc<Mutex<Vec<&'static str>>>,
        busy: bool,
    }

    impl ExecutionWrapper for TracingWrapper {
        fn start(&mut self) -> Result<(), ActivationError> {
            Ok(())
        }
        fn run_once(&mut self) -> bool {
            if self.busy {
                self.trace.lock().unwrap().push(self.name);
            }
            self.busy
        }
        fn stop(&mut self) {}
    }

    fn registry_of(
        names: &[&'static str],
        trace: &Arc<Mutex<Vec<&'static str>>>,
    ) -> ComponentRegistry {
        let mut registry = ComponentRegistry::new();
        for (index, name) in names.iter().enumerate() {
            let task: Arc<dyn Task> = Arc::new(StubTask(name.to_string()));
            registry.push(
                Box::new(TracingWrapper {
                    name,
                    trace: Arc::clone(trace),
                    busy: true,
                }),
                BridgeComponent::new(name.to_string(), task, RemoteHandle(index as u64)),
            );
        }
        registry
    }

    fn step(iteration: u64) -> StepInfo {
        StepInfo {
            world: "w".to_string(),
            sim_time: Duration::from_millis(iteration),
            iteration,
        }
    }

    #[test]
    fn ten_ticks_run_each_component_ten_times_in_order() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let mut registry = registry_of(&["a", "b", "c"], &trace);
        let mut scheduler = TickScheduler::new();

        for iteration in 1..=10 {
            let report = scheduler.run_step(&mut registry, &step(iteration));
            assert_eq!(report, StepReport { ran: 3, idle: 0 });
        }

        let trace = trace.lock().unwrap();
        assert_eq!(trace.len(), 30);
        for tick in trace.chunks(3) {
            assert_eq!(tick, ["a", "b", "c"]);
        }
        assert_eq!(scheduler.steps(), 10);
    }

    #[test]
    fn declining_to_run_counts_as_idle() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let mut registry = registry_of(&["a", "b"], &trace);
        // Make "b" decline.
        let task: Arc<dyn Task> = Arc::new(StubTask("c".to_string()));
        registry.push(
            Box::new(TracingWrapper {
                name: "c",
                trace: Arc::clone(&trace),
                busy: false,
            }),
            BridgeComponent::new("c".to_string(), task, RemoteHandle(9)),
        );

        let mut scheduler = TickScheduler::new();
        let report = scheduler.run_step(&mut registry, &step(1));
        assert_eq!(report, StepReport { ran: 2, idle: 1 });
        assert_eq!(*trace.lock().unwrap(), ["a", "b"]);
    }
}
