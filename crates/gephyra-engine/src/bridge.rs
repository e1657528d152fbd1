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

//! The bridge facade.
//!
//! One [`Bridge`] value owns all per-world-set state: the component
//! registry, the lifecycle manager, and the scheduler. The host adapter
//! forwards the simulation engine's notifications here —
//! [`on_world_created`](Bridge::on_world_created) exactly once per world,
//! then [`on_simulation_step`](Bridge::on_simulation_step) once per tick,
//! both on the engine's update thread. `&mut self` on both entry points
//! makes "no tick in progress when shutdown begins" a compile-time
//! guarantee.

use crate::config::BridgeConfig;
use crate::discovery;
use crate::factory::{models, scoped_name, FactoryTable};
use crate::lifecycle::LifecycleManager;
use crate::loader;
use crate::registrar::RemoteRegistrar;
use crate::registry::ComponentRegistry;
use crate::scheduler::{StepReport, TickScheduler};
use gephyra_core::descriptor::SceneBinding;
use gephyra_core::error::{StartupError, WorldSetupError};
use gephyra_core::runtime::{ComponentRuntime, TaskSpec};
use gephyra_core::simulation::{SimulationHost, StepInfo};
use gephyra_core::transport::RemoteTransport;
use std::sync::Arc;

/// Binds one simulation's worlds to the component runtime.
pub struct Bridge {
    config: BridgeConfig,
    host: Arc<dyn SimulationHost>,
    runtime: Arc<dyn ComponentRuntime>,
    factories: FactoryTable,
    lifecycle: LifecycleManager,
    scheduler: TickScheduler,
    registry: ComponentRegistry,
}

impl Bridge {
    /// Creates a bridge over the three collaborator contracts.
    pub fn new(
        config: BridgeConfig,
        host: Arc<dyn SimulationHost>,
        runtime: Arc<dyn ComponentRuntime>,
        transport: Arc<dyn RemoteTransport>,
    ) -> Self {
        Self {
            config,
            host,
            runtime: Arc::clone(&runtime),
            factories: FactoryTable::new(),
            lifecycle: LifecycleManager::new(runtime, RemoteRegistrar::new(transport)),
            scheduler: TickScheduler::new(),
            registry: ComponentRegistry::new(),
        }
    }

    /// Handles the one-time world-created notification.
    ///
    /// Resolves the world, creates the implicit world component (and the
    /// configured logger component before it, when enabled), binds every
    /// recognized entity the walker yields, then runs the external
    /// components pass. Entity-scoped failures are logged and skipped;
    /// setup-scoped failures propagate and leave the bridge usable for a
    /// subsequent notification.
    pub fn on_world_created(&mut self, world: &str) -> Result<(), WorldSetupError> {
        let root = self
            .host
            .find_world(world)
            .ok_or_else(|| WorldSetupError::WorldNotFound {
                name: world.to_string(),
            })?;
        log::info!("Bridge: world '{world}' created, starting discovery");
        let before = self.registry.len();

        if let Some(model) = self.config.logger_component.clone() {
            let name = format!("{}:{world}:logger", self.config.name_prefix);
            self.create_and_adopt(TaskSpec {
                model,
                name,
                binding: SceneBinding::World {
                    world: world.to_string(),
                },
            });
        }

        let binding = SceneBinding::World {
            world: world.to_string(),
        };
        self.create_and_adopt(TaskSpec {
            model: models::WORLD.to_string(),
            name: scoped_name(&self.config.name_prefix, &binding),
            binding,
        });

        for descriptor in discovery::enumerate(&root) {
            let Some(factory) = self.factories.resolve(&descriptor) else {
                log::warn!(
                    "Discovery: no factory for {:?} '{}' (tag '{}'), skipping",
                    descriptor.kind,
                    descriptor.display_name,
                    descriptor.type_tag
                );
                continue;
            };
            match factory.spawn(self.runtime.as_ref(), &self.config.name_prefix, &descriptor) {
                Ok(task) => {
                    if let Err(err) = self.lifecycle.adopt(&mut self.registry, task) {
                        log::warn!("Lifecycle: skipping '{}': {err}", descriptor.display_name);
                    }
                }
                Err(err) => {
                    let err = StartupError::Creation(err);
                    log::warn!("Lifecycle: skipping '{}': {err}", descriptor.display_name);
                }
            }
        }

        loader::run_external_components_pass(
            &root,
            &self.config.external_components_plugin,
            self.runtime.as_ref(),
            &mut self.lifecycle,
            &mut self.registry,
        )?;

        log::info!(
            "Bridge: world '{world}' bound, {} components adopted ({} total)",
            self.registry.len() - before,
            self.registry.len()
        );
        Ok(())
    }

    /// Handles one simulation step: executes every registered component's
    /// pending unit of work, in registration order, on the calling thread.
    pub fn on_simulation_step(&mut self, step: &StepInfo) -> StepReport {
        self.scheduler.run_step(&mut self.registry, step)
    }

    /// Tears down all components and the transport endpoints. Idempotent;
    /// also runs on drop.
    pub fn shutdown(&mut self) {
        self.lifecycle.shutdown_all(&mut self.registry);
    }

    /// The adopted component set, in registration order.
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Entity-scoped creation + adoption of one builtin component.
    fn create_and_adopt(&mut self, spec: TaskSpec) {
        let name = spec.name.clone();
        match self.runtime.create_task(&spec) {
            Ok(task) => {
                if let Err(err) = self.lifecycle.adopt(&mut self.registry, task) {
                    log::warn!("Lifecycle: skipping '{name}': {err}");
                }
            }
            Err(err) => {
                let err = StartupError::Creation(err);
                log::warn!("Lifecycle: skipping '{name}': {err}");
            }
        }
    }
}

impl Drop for Bridge {
    fn drop(&mut self) {
        self.shutdown();
    }
}
