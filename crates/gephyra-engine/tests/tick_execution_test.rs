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

use gephyra_core::scene::{ElementKind, SceneElement};
use gephyra_core::simulation::StepInfo;
use gephyra_engine::factory::models;
use gephyra_engine::{Bridge, BridgeConfig, StepReport};
use gephyra_infra::{InMemorySimulation, LocalRuntime, LoopbackTransport, TaskBehavior};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Appends its component name to a shared trace on every executed slot.
struct Recorder {
    name: String,
    trace: Arc<Mutex<Vec<String>>>,
}

impl TaskBehavior for Recorder {
    fn on_update(&mut self) -> bool {
        self.trace.lock().unwrap().push(self.name.clone());
        true
    }
}

fn recording_runtime(trace: &Arc<Mutex<Vec<String>>>) -> Arc<LocalRuntime> {
    let runtime = LocalRuntime::new();
    for model in [models::WORLD, models::MODEL, models::LASER_SCAN] {
        let trace = Arc::clone(trace);
        runtime.register_model(model, move |spec| {
            Box::new(Recorder {
                name: spec.name.clone(),
                trace: Arc::clone(&trace),
            })
        });
    }
    Arc::new(runtime)
}

fn step(iteration: u64) -> StepInfo {
    StepInfo {
        world: "harbor".to_string(),
        sim_time: Duration::from_millis(iteration * 10),
        iteration,
    }
}

#[test]
fn ten_ticks_run_three_components_in_stable_order() {
    let world = SceneElement::named(ElementKind::World, "harbor").with_child(
        SceneElement::named(ElementKind::Model, "rover").with_child(
            SceneElement::named(ElementKind::Link, "chassis").with_child(
                SceneElement::named(ElementKind::Sensor, "front_scan")
                    .with_attribute("type", "ray"),
            ),
        ),
    );
    let host = InMemorySimulation::new();
    host.add_world(world).unwrap();

    let trace = Arc::new(Mutex::new(Vec::new()));
    let mut bridge = Bridge::new(
        BridgeConfig::default(),
        Arc::new(host),
        recording_runtime(&trace),
        Arc::new(LoopbackTransport::new()),
    );
    bridge.on_world_created("harbor").unwrap();

    for iteration in 1..=10 {
        let report = bridge.on_simulation_step(&step(iteration));
        assert_eq!(report, StepReport { ran: 3, idle: 0 });
    }

    let trace = trace.lock().unwrap();
    assert_eq!(trace.len(), 30);
    for tick in trace.chunks(3) {
        assert_eq!(
            tick,
            [
                "sim:harbor",
                "sim:harbor:rover",
                "sim:harbor:rover:front_scan",
            ]
        );
    }
}

#[test]
fn components_run_only_in_response_to_steps() {
    let world = SceneElement::named(ElementKind::World, "harbor");
    let host = InMemorySimulation::new();
    host.add_world(world).unwrap();

    let trace = Arc::new(Mutex::new(Vec::new()));
    let mut bridge = Bridge::new(
        BridgeConfig::default(),
        Arc::new(host),
        recording_runtime(&trace),
        Arc::new(LoopbackTransport::new()),
    );
    bridge.on_world_created("harbor").unwrap();

    // Creation and startup alone execute no component work.
    assert!(trace.lock().unwrap().is_empty());
    bridge.on_simulation_step(&step(1));
    assert_eq!(*trace.lock().unwrap(), ["sim:harbor"]);

    // After shutdown the registry is empty; a step is a no-op.
    bridge.shutdown();
    let report = bridge.on_simulation_step(&step(2));
    assert_eq!(report, StepReport { ran: 0, idle: 0 });
    assert_eq!(trace.lock().unwrap().len(), 1);
}
