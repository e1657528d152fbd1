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

//! Interface contract for the simulation host.
//!
//! The simulation engine is a read-only scene-graph source plus a
//! step-notification source. The host adapter calls
//! `Bridge::on_world_created` once per world and `Bridge::on_simulation_step`
//! once per tick, both on the simulation engine's own update thread.

use crate::scene::SceneElement;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Per-tick notification payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Name of the world that stepped.
    pub world: String,
    /// Simulated time since world creation.
    pub sim_time: Duration,
    /// Monotonic step counter, starting at 1 for the first tick.
    pub iteration: u64,
}

/// Read-only scene-graph source.
pub trait SimulationHost: Send + Sync {
    /// Resolves a world identifier to its scene description root, or `None`
    /// when the simulation knows no such world.
    fn find_world(&self, name: &str) -> Option<Arc<SceneElement>>;
}
