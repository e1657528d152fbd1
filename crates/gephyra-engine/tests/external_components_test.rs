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

use gephyra_core::error::{LibraryLoadError, PluginLoadError, TaskCreationError, WorldSetupError};
use gephyra_core::scene::{ElementKind, SceneElement};
use gephyra_engine::factory::models;
use gephyra_engine::{Bridge, BridgeConfig};
use gephyra_infra::{InMemorySimulation, LocalRuntime, LoopbackTransport, TaskBehavior};
use std::sync::Arc;

struct IdleBehavior;

impl TaskBehavior for IdleBehavior {
    fn on_update(&mut self) -> bool {
        false
    }
}

fn runtime() -> Arc<LocalRuntime> {
    let runtime = LocalRuntime::new();
    for model in [models::WORLD, models::MODEL] {
        runtime.register_model(model, |_| Box::new(IdleBehavior));
    }
    runtime.register_model("test::ExtTask", |_| Box::new(IdleBehavior));
    Arc::new(runtime)
}

fn bridge_over(world: SceneElement, runtime: Arc<LocalRuntime>) -> Bridge {
    let host = InMemorySimulation::new();
    host.add_world(world).unwrap();
    Bridge::new(
        BridgeConfig::default(),
        Arc::new(host),
        runtime,
        Arc::new(LoopbackTransport::new()),
    )
}

fn component_names(bridge: &Bridge) -> Vec<String> {
    bridge
        .registry()
        .components()
        .map(|c| c.name().to_string())
        .collect()
}

/// A world-level coordinating declaration, matched by name.
fn coordinating() -> SceneElement {
    SceneElement::named(ElementKind::Plugin, "gephyra_components")
}

fn task_entry(name: &str, model: &str) -> SceneElement {
    SceneElement::named(ElementKind::Task, name).with_attribute("model", model)
}

#[test]
fn declared_tasks_are_instantiated_and_adopted() {
    let world = SceneElement::named(ElementKind::World, "harbor")
        .with_child(SceneElement::named(ElementKind::Model, "rover"))
        .with_child(
            coordinating()
                .with_child(task_entry("telemetry", "test::ExtTask"))
                .with_child(task_entry("watchdog", "test::ExtTask")),
        );
    let mut bridge = bridge_over(world, runtime());
    bridge.on_world_created("harbor").unwrap();

    // External tasks come after the statically discovered set, in
    // declaration order, keeping their declared names.
    assert_eq!(
        component_names(&bridge),
        vec!["sim:harbor", "sim:harbor:rover", "telemetry", "watchdog"]
    );
}

#[test]
fn coordinating_declaration_is_matched_by_filename_stem() {
    let world = SceneElement::named(ElementKind::World, "harbor").with_child(
        SceneElement::named(ElementKind::Plugin, "external")
            .with_attribute("filename", "libgephyra_components.so")
            .with_child(task_entry("telemetry", "test::ExtTask")),
    );
    let mut bridge = bridge_over(world, runtime());
    bridge.on_world_created("harbor").unwrap();

    assert_eq!(component_names(&bridge), vec!["sim:harbor", "telemetry"]);
}

#[test]
fn coordinating_declaration_is_matched_by_name_despite_foreign_filename() {
    // World plugins usually carry both attributes; a matching name wins
    // even when the filename stem says something else.
    let world = SceneElement::named(ElementKind::World, "harbor").with_child(
        SceneElement::named(ElementKind::Plugin, "gephyra_components")
            .with_attribute("filename", "libsomething.so")
            .with_child(task_entry("telemetry", "test::ExtTask")),
    );
    let mut bridge = bridge_over(world, runtime());
    bridge.on_world_created("harbor").unwrap();

    assert_eq!(component_names(&bridge), vec!["sim:harbor", "telemetry"]);
}

#[test]
fn failed_load_aborts_before_any_task_entry() {
    let world = SceneElement::named(ElementKind::World, "harbor")
        .with_child(SceneElement::named(ElementKind::Model, "rover"))
        .with_child(
            coordinating()
                .with_child(
                    SceneElement::new(ElementKind::Load)
                        .with_attribute("path", "/nonexistent/libx.so"),
                )
                .with_child(task_entry("telemetry", "test::ExtTask")),
        );
    let mut bridge = bridge_over(world, runtime());

    let err = bridge.on_world_created("harbor").unwrap_err();
    assert!(matches!(
        err,
        WorldSetupError::PluginLoad(PluginLoadError::Library(LibraryLoadError::NotFound { .. }))
    ));

    // No rollback of earlier components, and the task entry under the
    // failed declaration was never attempted.
    assert_eq!(
        component_names(&bridge),
        vec!["sim:harbor", "sim:harbor:rover"]
    );
}

#[test]
fn unknown_declared_model_is_fatal() {
    let world = SceneElement::named(ElementKind::World, "harbor")
        .with_child(SceneElement::named(ElementKind::Model, "rover"))
        .with_child(coordinating().with_child(task_entry("ghost", "test::Missing")));
    let mut bridge = bridge_over(world, runtime());

    let err = bridge.on_world_created("harbor").unwrap_err();
    match err {
        WorldSetupError::PluginLoad(PluginLoadError::Instantiation {
            name,
            model,
            source,
        }) => {
            assert_eq!(name, "ghost");
            assert_eq!(model, "test::Missing");
            assert!(matches!(source, TaskCreationError::UnknownModel { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        component_names(&bridge),
        vec!["sim:harbor", "sim:harbor:rover"]
    );
}

#[test]
fn bridge_stays_usable_after_a_fatal_plugin_step() {
    let broken = SceneElement::named(ElementKind::World, "harbor").with_child(
        coordinating().with_child(
            SceneElement::new(ElementKind::Load).with_attribute("path", "/nonexistent/libx.so"),
        ),
    );
    let host = InMemorySimulation::new();
    host.add_world(broken).unwrap();
    host.add_world(SceneElement::named(ElementKind::World, "lagoon"))
        .unwrap();
    let mut bridge = Bridge::new(
        BridgeConfig::default(),
        Arc::new(host),
        runtime(),
        Arc::new(LoopbackTransport::new()),
    );

    assert!(bridge.on_world_created("harbor").is_err());
    bridge.on_world_created("lagoon").unwrap();
    assert_eq!(
        component_names(&bridge),
        vec!["sim:harbor", "sim:lagoon"]
    );
}

#[test]
fn non_coordinating_world_plugins_are_ignored_by_the_loader() {
    let world = SceneElement::named(ElementKind::World, "harbor").with_child(
        SceneElement::named(ElementKind::Plugin, "scoreboard")
            .with_attribute("filename", "libscoreboard.so")
            .with_child(task_entry("hidden", "test::ExtTask")),
    );
    let mut bridge = bridge_over(world, runtime());
    bridge.on_world_created("harbor").unwrap();

    assert_eq!(component_names(&bridge), vec!["sim:harbor"]);
}
