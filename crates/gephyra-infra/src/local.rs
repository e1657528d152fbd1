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

//! In-process component runtime.
//!
//! Task models are registered as [`TaskBehavior`] constructors, either
//! programmatically through [`LocalRuntime::register_model`] or by loading a
//! shared library exposing the `gephyra_register_task_models` entry symbol.
//! Created tasks hold their behavior behind a mutex; the execution wrapper
//! the bridge schedules forwards `start`/`run_once`/`stop` to the behavior's
//! `on_start`/`on_update`/`on_stop`.

use gephyra_core::error::{ActivationError, LibraryLoadError, TaskCreationError};
use gephyra_core::runtime::{ComponentRuntime, ExecutionWrapper, Task, TaskSpec};
use libloading::{Library, Symbol};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Weak};

/// The work unit a locally created task executes once per scheduled slot.
///
/// Implemented by hosts and tests; the bridge itself never implements
/// component logic.
pub trait TaskBehavior: Send {
    /// Called once when the execution wrapper starts. Returning `false`
    /// refuses activation.
    fn on_start(&mut self) -> bool {
        true
    }

    /// One unit of work. Returning `false` means "had nothing to do, still
    /// fine".
    fn on_update(&mut self) -> bool;

    /// Called once when the execution wrapper stops.
    fn on_stop(&mut self) {}
}

/// Constructor producing a behavior for one task instance.
pub type BehaviorConstructor = Box<dyn Fn(&TaskSpec) -> Box<dyn TaskBehavior> + Send + Sync>;

/// Collects task-model registrations from a library's entry symbol.
///
/// A loaded library receives one of these and calls
/// [`register`](Self::register) for each model it defines. The entry symbol
/// signature is `fn(&mut ModelRegistrar) -> bool`, `false` reporting
/// failure.
#[derive(Default)]
pub struct ModelRegistrar {
    entries: Vec<(String, BehaviorConstructor)>,
}

impl ModelRegistrar {
    /// Registers one task model.
    pub fn register(
        &mut self,
        model: impl Into<String>,
        constructor: impl Fn(&TaskSpec) -> Box<dyn TaskBehavior> + Send + Sync + 'static,
    ) {
        self.entries.push((model.into(), Box::new(constructor)));
    }
}

type SharedBehavior = Arc<Mutex<Box<dyn TaskBehavior>>>;

/// Entry symbol looked up in loaded libraries.
const REGISTER_SYMBOL: &[u8] = b"gephyra_register_task_models";
type RegisterFn = unsafe extern "Rust" fn(&mut ModelRegistrar) -> bool;

/// In-process implementation of the component-runtime contract.
pub struct LocalRuntime {
    models: Mutex<HashMap<String, BehaviorConstructor>>,
    // Behaviors of live tasks, keyed by task name, held weakly so a task
    // dropped at shutdown leaves nothing behind. Pruned on insertion.
    behaviors: Mutex<HashMap<String, Weak<Mutex<Box<dyn TaskBehavior>>>>>,
    // Loaded libraries stay open for the process lifetime, keyed by
    // canonical path so re-loading is a no-op.
    libraries: Mutex<HashMap<PathBuf, Library>>,
}

impl LocalRuntime {
    /// Creates a runtime with no registered task models.
    pub fn new() -> Self {
        Self {
            models: Mutex::new(HashMap::new()),
            behaviors: Mutex::new(HashMap::new()),
            libraries: Mutex::new(HashMap::new()),
        }
    }

    /// Registers one task model programmatically.
    pub fn register_model(
        &self,
        model: impl Into<String>,
        constructor: impl Fn(&TaskSpec) -> Box<dyn TaskBehavior> + Send + Sync + 'static,
    ) {
        let model = model.into();
        log::debug!("LocalRuntime: registered task model '{model}'");
        self.models
            .lock()
            .unwrap()
            .insert(model, Box::new(constructor));
    }

    /// Whether a task model is currently registered.
    pub fn knows_model(&self, model: &str) -> bool {
        self.models.lock().unwrap().contains_key(model)
    }

    /// Number of libraries currently held open.
    pub fn loaded_libraries(&self) -> usize {
        self.libraries.lock().unwrap().len()
    }

    fn load_library(&self, path: &Path) -> Result<(), LibraryLoadError> {
        if !path.exists() {
            return Err(LibraryLoadError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let canonical = path
            .canonicalize()
            .map_err(|err| LibraryLoadError::LoadFailed {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?;

        let mut libraries = self.libraries.lock().unwrap();
        if libraries.contains_key(&canonical) {
            log::debug!(
                "LocalRuntime: {} already loaded, nothing to do",
                canonical.display()
            );
            return Ok(());
        }

        // SAFETY: Loading a foreign library runs its initializers; the path
        // comes from an explicit scene declaration the operator controls.
        let library =
            unsafe { Library::new(&canonical) }.map_err(|err| LibraryLoadError::LoadFailed {
                path: canonical.clone(),
                reason: err.to_string(),
            })?;

        // The registration entry point is optional: a plugin library may
        // define no task models of its own.
        // SAFETY: Symbol type matches the documented entry contract; the
        // library was built against this crate's ModelRegistrar.
        let entry: Option<Symbol<'_, RegisterFn>> = unsafe { library.get(REGISTER_SYMBOL).ok() };
        if let Some(entry) = entry {
            let mut registrar = ModelRegistrar::default();
            // SAFETY: The entry point only receives a registrar it fills in.
            let ok = unsafe { entry(&mut registrar) };
            if !ok {
                return Err(LibraryLoadError::BadRegistrar {
                    path: canonical,
                    reason: "registration entry point reported failure".to_string(),
                });
            }
            let mut models = self.models.lock().unwrap();
            for (model, constructor) in registrar.entries {
                log::info!(
                    "LocalRuntime: {} registered task model '{model}'",
                    canonical.display()
                );
                models.insert(model, constructor);
            }
        }

        log::info!("LocalRuntime: loaded {}", canonical.display());
        libraries.insert(canonical, library);
        Ok(())
    }
}

impl Default for LocalRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentRuntime for LocalRuntime {
    fn create_task(&self, spec: &TaskSpec) -> Result<Arc<dyn Task>, TaskCreationError> {
        let models = self.models.lock().unwrap();
        let constructor =
            models
                .get(&spec.model)
                .ok_or_else(|| TaskCreationError::UnknownModel {
                    model: spec.model.clone(),
                })?;
        let behavior: SharedBehavior = Arc::new(Mutex::new(constructor(spec)));

        let mut behaviors = self.behaviors.lock().unwrap();
        behaviors.retain(|_, weak| weak.strong_count() > 0);
        behaviors.insert(spec.name.clone(), Arc::downgrade(&behavior));

        log::debug!(
            "LocalRuntime: created task '{}' from model '{}'",
            spec.name,
            spec.model
        );
        Ok(Arc::new(LocalTask {
            spec: spec.clone(),
            _behavior: behavior,
        }))
    }

    fn wrap_for_execution(&self, task: Arc<dyn Task>) -> Box<dyn ExecutionWrapper> {
        let behavior = self
            .behaviors
            .lock()
            .unwrap()
            .get(task.name())
            .and_then(Weak::upgrade);
        Box::new(LocalWrapper {
            name: task.name().to_string(),
            behavior,
            started: false,
            stopped: false,
        })
    }

    fn load_plugin_library(&self, path: &Path) -> Result<(), LibraryLoadError> {
        self.load_library(path)
    }

    fn load_task_library(&self, path: &Path) -> Result<(), LibraryLoadError> {
        self.load_library(path)
    }
}

/// One locally created task: its spec plus the behavior it owns.
struct LocalTask {
    spec: TaskSpec,
    // Keeps the behavior alive as long as the task; the wrapper holds its
    // own strong reference once created.
    _behavior: SharedBehavior,
}

impl Task for LocalTask {
    fn name(&self) -> &str {
        &self.spec.name
    }

    fn model(&self) -> &str {
        &self.spec.model
    }
}

/// Execution adapter forwarding scheduled slots to the behavior.
struct LocalWrapper {
    name: String,
    behavior: Option<SharedBehavior>,
    started: bool,
    stopped: bool,
}

impl ExecutionWrapper for LocalWrapper {
    fn start(&mut self) -> Result<(), ActivationError> {
        let Some(behavior) = &self.behavior else {
            return Err(ActivationError {
                reason: format!("task '{}' was not created by this runtime", self.name),
            });
        };
        if !behavior.lock().unwrap().on_start() {
            return Err(ActivationError {
                reason: format!("behavior of '{}' refused to start", self.name),
            });
        }
        self.started = true;
        Ok(())
    }

    fn run_once(&mut self) -> bool {
        if !self.started || self.stopped {
            return false;
        }
        match &self.behavior {
            Some(behavior) => behavior.lock().unwrap().on_update(),
            None => false,
        }
    }

    fn stop(&mut self) {
        if self.started && !self.stopped {
            if let Some(behavior) = &self.behavior {
                behavior.lock().unwrap().on_stop();
            }
            self.stopped = true;
        }
    }
}
