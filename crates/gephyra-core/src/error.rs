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

//! Error taxonomy shared across the bridge workspace.
//!
//! Two scopes exist. Entity-scoped failures ([`StartupError`]) are contained
//! at the discovery loop: the failing entity's component is discarded and
//! sibling entities continue to be processed. Setup-scoped failures
//! ([`PluginLoadError`], [`WorldSetupError`]) abort the remainder of world
//! setup, leaving no half-built component behind; the bridge stays usable for
//! a subsequent world-created notification. An unrecognized sensor or plugin
//! tag is not an error at all — it is logged and skipped, as the scene may
//! contain entities outside this bridge's concern.

use std::fmt;
use std::path::PathBuf;

/// The component runtime could not instantiate a task.
#[derive(Debug)]
pub enum TaskCreationError {
    /// No task model with the requested name is known to the runtime.
    UnknownModel {
        /// The requested task model name.
        model: String,
    },
    /// The runtime knows the model but construction failed.
    Failed {
        /// The requested task model name.
        model: String,
        /// Runtime-reported reason.
        reason: String,
    },
}

impl fmt::Display for TaskCreationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskCreationError::UnknownModel { model } => {
                write!(f, "Unknown task model '{model}'")
            }
            TaskCreationError::Failed { model, reason } => {
                write!(f, "Failed to construct task model '{model}': {reason}")
            }
        }
    }
}

impl std::error::Error for TaskCreationError {}

/// An execution wrapper failed to start.
#[derive(Debug)]
pub struct ActivationError {
    /// Wrapper-reported reason.
    pub reason: String,
}

impl fmt::Display for ActivationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Execution wrapper failed to start: {}", self.reason)
    }
}

impl std::error::Error for ActivationError {}

/// Remote exposure of a task failed.
#[derive(Debug)]
pub enum RegistrationError {
    /// The transport endpoints are already shut down; no further
    /// registration is possible.
    EndpointsClosed,
    /// The transport refused this particular registration.
    Refused {
        /// Name of the task being registered.
        name: String,
        /// Transport-reported reason.
        reason: String,
    },
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationError::EndpointsClosed => {
                f.write_str("Remote transport endpoints are closed")
            }
            RegistrationError::Refused { name, reason } => {
                write!(f, "Remote registration refused for '{name}': {reason}")
            }
        }
    }
}

impl std::error::Error for RegistrationError {}

/// One entity's component could not be brought up.
///
/// Entity-scoped: the caller logs it, discards the half-built component, and
/// continues with sibling entities. There is no partial global rollback.
#[derive(Debug)]
pub enum StartupError {
    /// A live component with the same name already exists in the registry.
    DuplicateName {
        /// The contested component name.
        name: String,
    },
    /// The underlying task could not be created.
    Creation(TaskCreationError),
    /// The execution wrapper failed to start.
    Activation {
        /// Name of the component being started.
        name: String,
        /// The wrapper's failure.
        source: ActivationError,
    },
    /// Remote exposure failed after the wrapper had started.
    Registration {
        /// Name of the component being registered.
        name: String,
        /// The transport's failure.
        source: RegistrationError,
    },
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupError::DuplicateName { name } => {
                write!(f, "A component named '{name}' is already registered")
            }
            StartupError::Creation(source) => {
                write!(f, "Component startup failed: {source}")
            }
            StartupError::Activation { name, source } => {
                write!(f, "Component '{name}' failed to start: {source}")
            }
            StartupError::Registration { name, source } => {
                write!(f, "Component '{name}' could not be exposed remotely: {source}")
            }
        }
    }
}

impl std::error::Error for StartupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StartupError::DuplicateName { .. } => None,
            StartupError::Creation(source) => Some(source),
            StartupError::Activation { source, .. } => Some(source),
            StartupError::Registration { source, .. } => Some(source),
        }
    }
}

/// A shared library could not be loaded or its registration entry point
/// misbehaved.
#[derive(Debug)]
pub enum LibraryLoadError {
    /// The library file does not exist.
    NotFound {
        /// The requested path.
        path: PathBuf,
    },
    /// The dynamic loader rejected the library.
    LoadFailed {
        /// The requested path.
        path: PathBuf,
        /// Loader-reported reason.
        reason: String,
    },
    /// The library's task-model registration entry point failed.
    BadRegistrar {
        /// The loaded library's path.
        path: PathBuf,
        /// What went wrong inside the entry point.
        reason: String,
    },
}

impl fmt::Display for LibraryLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LibraryLoadError::NotFound { path } => {
                write!(f, "Library not found: {}", path.display())
            }
            LibraryLoadError::LoadFailed { path, reason } => {
                write!(f, "Failed to load library {}: {reason}", path.display())
            }
            LibraryLoadError::BadRegistrar { path, reason } => {
                write!(
                    f,
                    "Task-model registration failed in {}: {reason}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for LibraryLoadError {}

/// An explicitly declared external binary or task model failed to load or
/// instantiate.
///
/// Setup-scoped and fatal for the remainder of world setup: the declaration
/// is an explicit user request, and silently skipping it would hide
/// misconfiguration. Components adopted before the failing step remain
/// registered.
#[derive(Debug)]
pub enum PluginLoadError {
    /// A declared library could not be loaded.
    Library(LibraryLoadError),
    /// A declared task entry could not be instantiated.
    Instantiation {
        /// Declared instance name.
        name: String,
        /// Declared task model name.
        model: String,
        /// The runtime's failure.
        source: TaskCreationError,
    },
}

impl fmt::Display for PluginLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginLoadError::Library(source) => {
                write!(f, "External components declaration failed: {source}")
            }
            PluginLoadError::Instantiation {
                name,
                model,
                source,
            } => {
                write!(
                    f,
                    "Declared task '{name}' (model '{model}') could not be instantiated: {source}"
                )
            }
        }
    }
}

impl std::error::Error for PluginLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PluginLoadError::Library(source) => Some(source),
            PluginLoadError::Instantiation { source, .. } => Some(source),
        }
    }
}

impl From<LibraryLoadError> for PluginLoadError {
    fn from(source: LibraryLoadError) -> Self {
        PluginLoadError::Library(source)
    }
}

/// World setup aborted before completion.
///
/// Propagates out of world-created handling; the bridge remains usable for a
/// subsequent world-created notification.
#[derive(Debug)]
pub enum WorldSetupError {
    /// The notified world identifier cannot be resolved against the
    /// simulation engine. Nothing was registered for that world.
    WorldNotFound {
        /// The unresolvable world name.
        name: String,
    },
    /// The coordinating external-components step failed.
    PluginLoad(PluginLoadError),
}

impl fmt::Display for WorldSetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldSetupError::WorldNotFound { name } => {
                write!(f, "World '{name}' not found in the simulation")
            }
            WorldSetupError::PluginLoad(source) => {
                write!(f, "World setup aborted: {source}")
            }
        }
    }
}

impl std::error::Error for WorldSetupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WorldSetupError::WorldNotFound { .. } => None,
            WorldSetupError::PluginLoad(source) => Some(source),
        }
    }
}

impl From<PluginLoadError> for WorldSetupError {
    fn from(source: PluginLoadError) -> Self {
        WorldSetupError::PluginLoad(source)
    }
}
