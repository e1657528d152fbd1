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

//! Component descriptors produced by scene discovery.
//!
//! A descriptor is the classified view of one scene element: which kind of
//! bridge component it calls for, the tag the factory table resolves, and the
//! scope the walker observed while descending. Descriptors borrow the scene
//! tree and live only for the duration of one discovery pass; anything kept
//! beyond it is an owned string inside the [`SceneBinding`].

use crate::scene::SceneElement;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of bridge component a scene element calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    /// A component driving one simulated model.
    Model,
    /// A component driving one sensor attached to a link.
    Sensor,
    /// A component attached through a model-level plugin declaration.
    Plugin,
    /// A task declared by the world's coordinating plugin, bound to no
    /// scene entity.
    ExternalTask,
}

/// The scene scope a created task drives.
///
/// The scene tree carries no parent pointers; the walker records scope as it
/// descends, so a binding is self-contained owned data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneBinding {
    /// The implicit per-world component.
    World {
        /// World name.
        world: String,
    },
    /// A component for one model.
    Model {
        /// World name.
        world: String,
        /// Model name.
        model: String,
    },
    /// A component for one sensor on one link.
    Sensor {
        /// World name.
        world: String,
        /// Model name.
        model: String,
        /// Link carrying the sensor.
        link: String,
        /// Sensor name.
        sensor: String,
    },
    /// A component attached via a model-level plugin declaration.
    ModelPlugin {
        /// World name.
        world: String,
        /// Model name.
        model: String,
        /// Plugin declaration name.
        plugin: String,
    },
    /// An externally declared task with no scene entity of its own.
    Detached,
}

impl fmt::Display for SceneBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneBinding::World { world } => write!(f, "world '{world}'"),
            SceneBinding::Model { world, model } => write!(f, "model '{model}' in '{world}'"),
            SceneBinding::Sensor {
                world,
                model,
                link,
                sensor,
            } => write!(f, "sensor '{sensor}' on '{model}/{link}' in '{world}'"),
            SceneBinding::ModelPlugin {
                world,
                model,
                plugin,
            } => write!(f, "plugin '{plugin}' on '{model}' in '{world}'"),
            SceneBinding::Detached => f.write_str("detached task"),
        }
    }
}

/// The result of classifying one scene element during discovery.
#[derive(Debug, Clone)]
pub struct ComponentDescriptor<'scene> {
    /// Which kind of component the element calls for.
    pub kind: ComponentKind,
    /// The tag the factory table resolves: the `type` attribute for sensors,
    /// the declared `filename` for plugins. Empty for models, which are
    /// structural and carry no tag.
    pub type_tag: &'scene str,
    /// Human-readable name for diagnostics.
    pub display_name: String,
    /// The scope the walker observed for this element.
    pub binding: SceneBinding,
    /// The element itself, borrowed for the duration of discovery.
    pub source: &'scene SceneElement,
}
