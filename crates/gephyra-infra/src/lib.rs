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

//! # Gephyra Infra
//!
//! Concrete in-process implementations of the bridge's external contracts:
//! a component runtime with a task-model registry and dynamic library
//! loading, a loopback remote-exposure transport with a background
//! inspection thread, and an in-memory scene-graph source. These exist so
//! the bridge is exercisable end-to-end; concrete sensor and actuator logic
//! stays with hosts through the [`TaskBehavior`](local::TaskBehavior) trait.

#![warn(missing_docs)]

pub mod local;
pub mod loopback;
pub mod simulation;

pub use local::{LocalRuntime, ModelRegistrar, TaskBehavior};
pub use loopback::{InspectionClient, LoopbackTransport, RegisteredComponent};
pub use simulation::InMemorySimulation;
