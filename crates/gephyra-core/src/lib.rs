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

//! # Gephyra Core
//!
//! Foundational crate containing the scene description model, the interface
//! contracts the bridge drives its collaborators through, and the error
//! taxonomy shared across the workspace.

#![warn(missing_docs)]

pub mod descriptor;
pub mod error;
pub mod runtime;
pub mod scene;
pub mod simulation;
pub mod transport;

pub use descriptor::{ComponentDescriptor, ComponentKind, SceneBinding};
pub use runtime::{ComponentRuntime, ExecutionWrapper, Task, TaskSpec};
pub use scene::{ElementKind, SceneElement};
pub use simulation::{SimulationHost, StepInfo};
pub use transport::{RemoteHandle, RemoteTransport};
