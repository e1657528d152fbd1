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

//! End-to-end demo: builds a small world, binds it, drives a few ticks,
//! prints the remote inspection view, and shuts down.

use anyhow::Result;
use gephyra_core::scene::{ElementKind, SceneElement};
use gephyra_core::simulation::StepInfo;
use gephyra_engine::factory::models;
use gephyra_engine::{Bridge, BridgeConfig};
use gephyra_infra::{InMemorySimulation, LocalRuntime, LoopbackTransport, TaskBehavior};
use std::sync::Arc;
use std::time::Duration;

/// Logs one line per scheduled slot.
struct Pulse {
    name: String,
    ticks: u64,
}

impl TaskBehavior for Pulse {
    fn on_update(&mut self) -> bool {
        self.ticks += 1;
        log::info!("{}: tick {}", self.name, self.ticks);
        true
    }

    fn on_stop(&mut self) {
        log::info!("{}: stopped after {} ticks", self.name, self.ticks);
    }
}

fn build_runtime() -> Arc<LocalRuntime> {
    let runtime = LocalRuntime::new();
    for model in [
        models::WORLD,
        models::MODEL,
        models::LASER_SCAN,
        models::CAMERA,
        models::THRUSTER,
        "demo::TelemetryTask",
    ] {
        runtime.register_model(model, |spec| {
            Box::new(Pulse {
                name: spec.name.clone(),
                ticks: 0,
            })
        });
    }
    Arc::new(runtime)
}

fn build_world() -> SceneElement {
    SceneElement::named(ElementKind::World, "harbor")
        .with_child(
            SceneElement::named(ElementKind::Model, "rover")
                .with_child(
                    SceneElement::named(ElementKind::Plugin, "drive")
                        .with_attribute("filename", "libgephyra_thruster.so"),
                )
                .with_child(
                    SceneElement::named(ElementKind::Link, "chassis")
                        .with_child(
                            SceneElement::named(ElementKind::Sensor, "front_scan")
                                .with_attribute("type", "ray"),
                        )
                        .with_child(
                            SceneElement::named(ElementKind::Sensor, "eye")
                                .with_attribute("type", "camera"),
                        ),
                ),
        )
        .with_child(
            SceneElement::named(ElementKind::Plugin, "gephyra_components").with_child(
                SceneElement::named(ElementKind::Task, "telemetry")
                    .with_attribute("model", "demo::TelemetryTask"),
            ),
        )
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let host = InMemorySimulation::new();
    host.add_world(build_world())?;
    let transport = Arc::new(LoopbackTransport::new());
    let client = transport
        .client()
        .ok_or_else(|| anyhow::anyhow!("inspection endpoint unavailable"))?;

    let mut bridge = Bridge::new(
        BridgeConfig::default(),
        Arc::new(host),
        build_runtime(),
        Arc::clone(&transport) as Arc<dyn gephyra_core::RemoteTransport>,
    );
    bridge.on_world_created("harbor")?;

    for iteration in 1..=5 {
        let report = bridge.on_simulation_step(&StepInfo {
            world: "harbor".to_string(),
            sim_time: Duration::from_millis(iteration * 10),
            iteration,
        });
        log::info!(
            "step {iteration}: {} components ran, {} idle",
            report.ran,
            report.idle
        );
    }

    println!("Remote inspection view:");
    for row in client.list() {
        println!(
            "  {:?}  {}  ({}, {})",
            row.handle,
            row.name,
            row.model,
            if row.alive { "alive" } else { "gone" }
        );
    }

    bridge.shutdown();
    Ok(())
}
