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

//! # Gephyra Engine
//!
//! The bridge itself: walks a world's scene description, resolves declared
//! entities to task factories, adopts every created component into a single
//! ordered registry, exposes each one remotely, and drives the whole set in
//! lock-step with simulation ticks. One [`Bridge`] value owns all state for
//! one set of worlds; there are no process-wide globals, so multiple bridges
//! can coexist in one process.

#![warn(missing_docs)]

pub mod bridge;
pub mod config;
pub mod discovery;
pub mod factory;
pub mod lifecycle;
pub mod loader;
pub mod registrar;
pub mod registry;
pub mod scheduler;

pub use bridge::Bridge;
pub use config::BridgeConfig;
pub use registry::{BridgeComponent, ComponentRegistry};
pub use scheduler::StepReport;
