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

//! Type-to-factory resolution.
//!
//! Maps a descriptor's declared tag to the task model that drives it. Sensor
//! tags go through the closed [`SensorKind`] enum so an unhandled kind is a
//! compile-time exhaustiveness concern; model-level plugins are matched by
//! normalized binary stem against a fixed allowlist. Resolution is pure —
//! unresolved descriptors yield `None`, and the discovery loop logs the
//! diagnostic. The table is extensible only at compile time; the external
//! components path bypasses it entirely.

use gephyra_core::descriptor::{ComponentDescriptor, ComponentKind, SceneBinding};
use gephyra_core::error::TaskCreationError;
use gephyra_core::runtime::{ComponentRuntime, Task, TaskSpec};
use std::sync::Arc;

/// Builtin task model names the bridge requests from the runtime.
pub mod models {
    /// Implicit per-world component.
    pub const WORLD: &str = "gephyra::WorldTask";
    /// Per-model component.
    pub const MODEL: &str = "gephyra::ModelTask";
    /// Range-scanner sensor component.
    pub const LASER_SCAN: &str = "gephyra::LaserScanTask";
    /// Camera sensor component.
    pub const CAMERA: &str = "gephyra::CameraTask";
    /// Inertial-measurement sensor component.
    pub const IMU: &str = "gephyra::ImuTask";
    /// Positioning sensor component.
    pub const GPS: &str = "gephyra::GpsTask";
    /// Thruster actuator plugin component.
    pub const THRUSTER: &str = "gephyra::ThrusterTask";
}

/// The closed set of sensor kinds the bridge recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    /// Ray/range scanner.
    Ray,
    /// Camera.
    Camera,
    /// Inertial measurement unit.
    Imu,
    /// Positioning (GPS-like) unit.
    Gps,
}

impl SensorKind {
    /// Parses a declared sensor type tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "ray" => Some(SensorKind::Ray),
            "camera" => Some(SensorKind::Camera),
            "imu" => Some(SensorKind::Imu),
            "gps" => Some(SensorKind::Gps),
            _ => None,
        }
    }

    /// The task model driving this sensor kind.
    pub fn task_model(self) -> &'static str {
        match self {
            SensorKind::Ray => models::LASER_SCAN,
            SensorKind::Camera => models::CAMERA,
            SensorKind::Imu => models::IMU,
            SensorKind::Gps => models::GPS,
        }
    }
}

/// Plugin binaries the bridge is willing to drive, stored as canonical
/// stems, paired with the task model each resolves to.
const PLUGIN_ALLOWLIST: &[(&str, &str)] = &[("gephyra_thruster", models::THRUSTER)];

/// Reduces a declared plugin filename to its canonical stem: basename, minus
/// one shared-library extension, minus a leading `lib`. Allowlist entries
/// are stored as stems, so `libgephyra_thruster.so`,
/// `/opt/plugins/libgephyra_thruster.so`, and `gephyra_thruster` all compare
/// equal.
pub fn canonical_stem(filename: &str) -> &str {
    let basename = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);
    let stem = basename
        .strip_suffix(".so")
        .or_else(|| basename.strip_suffix(".dll"))
        .or_else(|| basename.strip_suffix(".dylib"))
        .unwrap_or(basename);
    stem.strip_prefix("lib").unwrap_or(stem)
}

/// Builds the scoped unique name of a component from its binding.
///
/// Format: `<prefix>:<world>[:<model>[:<entity>]]`. Detached tasks keep
/// their declared name and never pass through here.
pub fn scoped_name(prefix: &str, binding: &SceneBinding) -> String {
    match binding {
        SceneBinding::World { world } => format!("{prefix}:{world}"),
        SceneBinding::Model { world, model } => format!("{prefix}:{world}:{model}"),
        SceneBinding::Sensor {
            world,
            model,
            sensor,
            ..
        } => format!("{prefix}:{world}:{model}:{sensor}"),
        SceneBinding::ModelPlugin {
            world,
            model,
            plugin,
        } => format!("{prefix}:{world}:{model}:{plugin}"),
        SceneBinding::Detached => prefix.to_string(),
    }
}

/// A resolved constructor: knows which task model to request from the
/// runtime for one descriptor.
#[derive(Debug, Clone, Copy)]
pub struct TaskFactory {
    model: &'static str,
}

impl TaskFactory {
    /// The task model this factory requests.
    pub fn model(&self) -> &'static str {
        self.model
    }

    /// Instantiates the task for one descriptor: builds the [`TaskSpec`]
    /// (model name, scoped unique name, binding) and asks the runtime.
    pub fn spawn(
        &self,
        runtime: &dyn ComponentRuntime,
        name_prefix: &str,
        descriptor: &ComponentDescriptor<'_>,
    ) -> Result<Arc<dyn Task>, TaskCreationError> {
        let spec = TaskSpec {
            model: self.model.to_string(),
            name: scoped_name(name_prefix, &descriptor.binding),
            binding: descriptor.binding.clone(),
        };
        runtime.create_task(&spec)
    }
}

/// Static mapping from descriptor tags to task factories.
#[derive(Debug, Default)]
pub struct FactoryTable;

impl FactoryTable {
    /// Creates the table of statically compiled factories.
    pub fn new() -> Self {
        Self
    }

    /// Resolves one descriptor to its factory, or `None` when the entity is
    /// outside this bridge's concern. Pure and side-effect-free.
    pub fn resolve(&self, descriptor: &ComponentDescriptor<'_>) -> Option<TaskFactory> {
        match descriptor.kind {
            ComponentKind::Model => Some(TaskFactory {
                model: models::MODEL,
            }),
            ComponentKind::Sensor => SensorKind::from_tag(descriptor.type_tag)
                .map(|kind| TaskFactory {
                    model: kind.task_model(),
                }),
            ComponentKind::Plugin => {
                let stem = canonical_stem(descriptor.type_tag);
                PLUGIN_ALLOWLIST
                    .iter()
                    .find(|entry| entry.0 == stem)
                    .map(|entry| TaskFactory { model: entry.1 })
            }
            // Externally declared tasks bypass the static table.
            ComponentKind::ExternalTask => None,
        }
    }
}
