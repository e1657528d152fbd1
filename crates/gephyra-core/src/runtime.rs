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

//! Interface contract for the external component runtime.
//!
//! The bridge drives the runtime through this narrow contract and never
//! implements component execution itself: it requests tasks by model name,
//! wraps them for scheduled execution, and loads the shared libraries the
//! scene description explicitly asks for.

use crate::descriptor::SceneBinding;
use crate::error::{ActivationError, LibraryLoadError, TaskCreationError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Instantiation request handed to the component runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Task model name the runtime resolves to a constructor.
    pub model: String,
    /// Instance name, unique within the running bridge.
    pub name: String,
    /// The scene scope the task drives.
    pub binding: SceneBinding,
}

/// One instantiated component-runtime task.
///
/// The lifecycle manager is the sole strong owner; collaborators observe
/// tasks through `Weak` references only.
pub trait Task: Send + Sync {
    /// Instance name, unique within the running bridge.
    fn name(&self) -> &str;

    /// Task model name this instance was built from.
    fn model(&self) -> &str;
}

/// The scheduling adapter that lets the bridge drive one task's execution
/// once per tick.
pub trait ExecutionWrapper: Send {
    /// Starts the wrapped task. Called exactly once, before any
    /// [`run_once`](Self::run_once).
    fn start(&mut self) -> Result<(), ActivationError>;

    /// Executes the task's single pending unit of work, synchronously, to
    /// completion. Returns `false` when the task had nothing to do, which is
    /// not an error.
    fn run_once(&mut self) -> bool;

    /// Stops the wrapped task. Idempotent; `run_once` after `stop` is idle.
    fn stop(&mut self);
}

/// Contract the component runtime exposes to the bridge.
pub trait ComponentRuntime: Send + Sync {
    /// Instantiates a task by model name.
    fn create_task(&self, spec: &TaskSpec) -> Result<Arc<dyn Task>, TaskCreationError>;

    /// Wraps a task for scheduled execution. The wrapper is the unit the
    /// tick-synchronous scheduler drives.
    fn wrap_for_execution(&self, task: Arc<dyn Task>) -> Box<dyn ExecutionWrapper>;

    /// Loads a shared plugin library into the process. Idempotent per path:
    /// loading an already-loaded path is a no-op, not an error.
    fn load_plugin_library(&self, path: &Path) -> Result<(), LibraryLoadError>;

    /// Loads a library defining externally declared task models. Same
    /// idempotency as [`load_plugin_library`](Self::load_plugin_library).
    fn load_task_library(&self, path: &Path) -> Result<(), LibraryLoadError>;
}
