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

//! Dynamic external-components loader.
//!
//! Runs once per world, after static discovery, scanning the world's own
//! plugin declarations for the coordinating tag. A matching declaration
//! lists `load { path }` entries naming libraries to pull into the process
//! and `task { name, model, filename }` entries naming externally defined
//! task models to instantiate. Unlike unrecognized sensor or plugin tags,
//! failure here is fatal for the remainder of world setup: the declaration
//! is an explicit user request, and silently skipping it would hide
//! misconfiguration. Load entries are processed before task entries, so a
//! failed load means no task under the same declaration is attempted.

use crate::factory::canonical_stem;
use crate::lifecycle::LifecycleManager;
use crate::registry::ComponentRegistry;
use gephyra_core::descriptor::SceneBinding;
use gephyra_core::error::{LibraryLoadError, PluginLoadError, TaskCreationError};
use gephyra_core::runtime::{ComponentRuntime, TaskSpec};
use gephyra_core::scene::{ElementKind, SceneElement};
use std::path::{Path, PathBuf};

/// Whether a world-level plugin declaration is the coordinating one.
///
/// Matched on the declaration's `name` or on the canonical stem of its
/// declared `filename`. Real scene descriptions give world plugins both
/// attributes, so either identifying the declaration is enough.
fn is_coordinating(plugin: &SceneElement, tag: &str) -> bool {
    if plugin.name() == Some(tag) {
        return true;
    }
    plugin
        .filename()
        .is_some_and(|filename| canonical_stem(filename) == tag)
}

/// Processes every coordinating declaration of one world.
///
/// Each successfully instantiated task is handed to the lifecycle manager;
/// an adoption failure after successful instantiation is entity-scoped and
/// only logged, since the misconfiguration the fatal path guards against
/// has already been ruled out by then.
pub fn run_external_components_pass(
    world: &SceneElement,
    tag: &str,
    runtime: &dyn ComponentRuntime,
    lifecycle: &mut LifecycleManager,
    registry: &mut ComponentRegistry,
) -> Result<(), PluginLoadError> {
    for plugin in world.children_of(ElementKind::Plugin) {
        if !is_coordinating(plugin, tag) {
            continue;
        }
        log::info!(
            "Loader: processing external components declaration '{}'",
            plugin.name().unwrap_or(tag)
        );
        process_declaration(plugin, runtime, lifecycle, registry)?;
    }
    Ok(())
}

fn process_declaration(
    plugin: &SceneElement,
    runtime: &dyn ComponentRuntime,
    lifecycle: &mut LifecycleManager,
    registry: &mut ComponentRegistry,
) -> Result<(), PluginLoadError> {
    // All load entries first: a failed load aborts before any task entry.
    for load in plugin.children_of(ElementKind::Load) {
        let Some(path) = load.path() else {
            return Err(PluginLoadError::Library(LibraryLoadError::LoadFailed {
                path: PathBuf::new(),
                reason: "load entry declares no path".to_string(),
            }));
        };
        log::info!("Loader: loading external library {path}");
        runtime.load_plugin_library(Path::new(path))?;
    }

    for task in plugin.children_of(ElementKind::Task) {
        let (name, model) = match (task.name(), task.model_name()) {
            (Some(name), Some(model)) => (name, model),
            (name, model) => {
                let name = name.unwrap_or("<unnamed>").to_string();
                let model = model.unwrap_or_default().to_string();
                return Err(PluginLoadError::Instantiation {
                    name,
                    model: model.clone(),
                    source: TaskCreationError::Failed {
                        model,
                        reason: "task entry is missing its name or model attribute".to_string(),
                    },
                });
            }
        };

        if let Some(filename) = task.filename() {
            log::info!("Loader: loading task-model library {filename} for '{name}'");
            runtime.load_task_library(Path::new(filename))?;
        }

        let spec = TaskSpec {
            model: model.to_string(),
            name: name.to_string(),
            binding: SceneBinding::Detached,
        };
        let task =
            runtime
                .create_task(&spec)
                .map_err(|source| PluginLoadError::Instantiation {
                    name: name.to_string(),
                    model: model.to_string(),
                    source,
                })?;

        if let Err(err) = lifecycle.adopt(registry, task) {
            log::warn!("Loader: declared task '{name}' could not be adopted: {err}");
        }
    }
    Ok(())
}
