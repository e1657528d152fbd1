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

//! Bridge configuration.

use serde::{Deserialize, Serialize};

/// Configuration for one [`Bridge`](crate::Bridge) instance.
///
/// Handed in by the host at construction; nothing is persisted. All
/// remaining configuration is the scene description itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Prefix for scoped component names
    /// (`<prefix>:<world>[:<model>[:<entity>]]`).
    pub name_prefix: String,
    /// Tag of the world-level coordinating plugin declaration that lists
    /// external libraries and task models to load.
    pub external_components_plugin: String,
    /// Task model name of an optional per-world logging component, created
    /// before anything else for its world. `None` disables it.
    pub logger_component: Option<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            name_prefix: "sim".to_string(),
            external_components_plugin: "gephyra_components".to_string(),
            logger_component: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_disable_the_logger_component() {
        let config = BridgeConfig::default();
        assert_eq!(config.name_prefix, "sim");
        assert_eq!(config.external_components_plugin, "gephyra_components");
        assert!(config.logger_component.is_none());
    }
}
