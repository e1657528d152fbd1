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

//! Ordered registry of adopted bridge components.
//!
//! Two parallel, insertion-ordered, index-aligned sequences: the execution
//! wrappers the scheduler drives, and the adopted components owning the
//! underlying tasks. Owned exclusively by one bridge instance — no ambient
//! globals — and drained only by shutdown, so teardown order is the
//! container's own drain order rather than manual bookkeeping.

use gephyra_core::runtime::{ExecutionWrapper, Task};
use gephyra_core::transport::RemoteHandle;
use std::sync::Arc;

/// One adopted component: the underlying task plus its remote registration.
///
/// Every component in the registry has been started exactly once and carries
/// a live remote registration until shutdown.
pub struct BridgeComponent {
    name: String,
    task: Arc<dyn Task>,
    remote: Option<RemoteHandle>,
}

impl BridgeComponent {
    pub(crate) fn new(name: String, task: Arc<dyn Task>, remote: RemoteHandle) -> Self {
        Self {
            name,
            task,
            remote: Some(remote),
        }
    }

    /// Component name, unique within the running bridge.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Task model this component was built from.
    pub fn model(&self) -> &str {
        self.task.model()
    }

    /// Whether the component currently holds a live remote registration.
    pub fn remote_registered(&self) -> bool {
        self.remote.is_some()
    }

    pub(crate) fn clear_remote(&mut self) {
        self.remote = None;
    }
}

/// Insertion-ordered store of wrappers and components, index-aligned.
#[derive(Default)]
pub struct ComponentRegistry {
    wrappers: Vec<Box<dyn ExecutionWrapper>>,
    components: Vec<BridgeComponent>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of adopted components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true when no components are adopted.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Whether a component with this name is currently adopted.
    pub fn contains(&self, name: &str) -> bool {
        self.components.iter().any(|c| c.name == name)
    }

    /// Adopted components in registration order.
    pub fn components(&self) -> impl Iterator<Item = &BridgeComponent> {
        self.components.iter()
    }

    /// Appends a wrapper/component pair, keeping the two sequences aligned.
    pub(crate) fn push(&mut self, wrapper: Box<dyn ExecutionWrapper>, component: BridgeComponent) {
        self.wrappers.push(wrapper);
        self.components.push(component);
    }

    /// Execution wrappers in registration order, for the scheduler and for
    /// ordered stopping at teardown.
    pub(crate) fn wrappers_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn ExecutionWrapper>> {
        self.wrappers.iter_mut()
    }

    /// Drops every remote handle after the transport deregistered them.
    pub(crate) fn clear_remote_handles(&mut self) {
        for component in &mut self.components {
            component.clear_remote();
        }
    }

    /// Drops all execution wrappers. Teardown step: wrappers go before the
    /// underlying tasks they drive.
    pub(crate) fn drop_wrappers(&mut self) {
        self.wrappers.clear();
    }

    /// Drops all adopted components and with them the registry's strong
    /// task references.
    pub(crate) fn drop_components(&mut self) {
        self.components.clear();
    }
}
