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

//! Component lifecycle manager.
//!
//! Owns adoption and teardown of every bridge component. Adoption wraps a
//! freshly built task for execution, starts it, exposes it remotely, and
//! appends wrapper and component to the registry in lock-step; a failure at
//! any step discards the half-built component and leaves siblings
//! unaffected. Teardown runs in one mandatory order: remote handles vanish
//! first, wrappers stop and drop next, tasks drop after that, and the
//! transport endpoints go last — components must stop producing before
//! their remote handles disappear, and remote handles must disappear before
//! the endpoint machinery does.

use crate::registrar::RemoteRegistrar;
use crate::registry::{BridgeComponent, ComponentRegistry};
use gephyra_core::error::StartupError;
use gephyra_core::runtime::{ComponentRuntime, Task};
use std::sync::Arc;

/// Sole owner of every bridge component's lifetime.
pub struct LifecycleManager {
    runtime: Arc<dyn ComponentRuntime>,
    registrar: RemoteRegistrar,
}

impl LifecycleManager {
    /// Creates a manager driving the given runtime and registrar.
    pub fn new(runtime: Arc<dyn ComponentRuntime>, registrar: RemoteRegistrar) -> Self {
        Self { runtime, registrar }
    }

    /// Adopts a freshly constructed task: wraps it, starts the wrapper,
    /// registers it remotely, and appends it to the registry.
    ///
    /// Entity-scoped on failure: the half-built component is discarded (a
    /// started wrapper is stopped first) and nothing is appended. After
    /// [`shutdown_all`](Self::shutdown_all) adoption is refused because the
    /// transport endpoints are closed.
    pub fn adopt(
        &mut self,
        registry: &mut ComponentRegistry,
        task: Arc<dyn Task>,
    ) -> Result<(), StartupError> {
        let name = task.name().to_string();
        if registry.contains(&name) {
            return Err(StartupError::DuplicateName { name });
        }

        let mut wrapper = self.runtime.wrap_for_execution(Arc::clone(&task));
        if let Err(source) = wrapper.start() {
            return Err(StartupError::Activation { name, source });
        }

        let handle = match self.registrar.register(&task) {
            Ok(handle) => handle,
            Err(source) => {
                wrapper.stop();
                return Err(StartupError::Registration { name, source });
            }
        };

        log::info!("Lifecycle: adopted '{}' (model '{}')", name, task.model());
        registry.push(wrapper, BridgeComponent::new(name, task, handle));
        Ok(())
    }

    /// Tears down every adopted component and the transport endpoints, in
    /// the mandatory order. Idempotent: a second call is a no-op.
    pub fn shutdown_all(&mut self, registry: &mut ComponentRegistry) {
        if !registry.is_empty() {
            log::info!("Lifecycle: shutting down {} components", registry.len());
        }

        // 1. Remote handles vanish while the components still exist.
        self.registrar.unregister_all();
        registry.clear_remote_handles();

        // 2. Wrappers stop in registration order, then drop together.
        for wrapper in registry.wrappers_mut() {
            wrapper.stop();
        }
        registry.drop_wrappers();

        // 3. The underlying tasks drop with the registry's strong refs.
        registry.drop_components();

        // 4. Endpoint machinery goes last, once nothing references it.
        self.registrar.shutdown_endpoints();
    }

    /// Number of live remote registrations, for diagnostics.
    pub fn registered(&self) -> usize {
        self.registrar.registered()
    }
}
