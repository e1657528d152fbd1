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

//! In-memory scene-graph source.

use gephyra_core::scene::{ElementKind, SceneElement};
use gephyra_core::simulation::SimulationHost;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

/// A scene tree was rejected by [`InMemorySimulation::add_world`].
#[derive(Debug)]
pub struct WorldRejected {
    /// Why the tree is not a usable world root.
    pub reason: String,
}

impl fmt::Display for WorldRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "World rejected: {}", self.reason)
    }
}

impl std::error::Error for WorldRejected {}

/// Named world roots behind a mutex, implementing the simulation-host
/// contract.
#[derive(Default)]
pub struct InMemorySimulation {
    worlds: Mutex<HashMap<String, Arc<SceneElement>>>,
}

impl InMemorySimulation {
    /// Creates a simulation with no worlds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a world root. The element must be of kind `world` and named.
    pub fn add_world(&self, root: SceneElement) -> Result<(), WorldRejected> {
        if root.kind() != ElementKind::World {
            return Err(WorldRejected {
                reason: format!("root element is a {}, not a world", root.kind()),
            });
        }
        let Some(name) = root.name() else {
            return Err(WorldRejected {
                reason: "world element has no name".to_string(),
            });
        };
        log::debug!("InMemorySimulation: added world '{name}'");
        self.worlds
            .lock()
            .unwrap()
            .insert(name.to_string(), Arc::new(root));
        Ok(())
    }
}

impl SimulationHost for InMemorySimulation {
    fn find_world(&self, name: &str) -> Option<Arc<SceneElement>> {
        self.worlds.lock().unwrap().get(name).cloned()
    }
}
