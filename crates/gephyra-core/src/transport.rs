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

//! Interface contract for the remote-exposure transport.
//!
//! The transport publishes tasks so external processes can inspect or
//! command them; the bridge treats it purely as a registration sink. The
//! transport may run its own background dispatch threads, but those threads
//! only read pre-registered handles and never execute component logic.

use crate::error::RegistrationError;
use crate::runtime::Task;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Opaque handle to one remote registration, issued by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteHandle(pub u64);

/// Contract the remote-exposure transport exposes to the bridge.
pub trait RemoteTransport: Send + Sync {
    /// Registers a task for remote access. The transport must hold the task
    /// weakly; the lifecycle manager stays the sole strong owner.
    fn register(&self, task: &Arc<dyn Task>) -> Result<RemoteHandle, RegistrationError>;

    /// Removes every registration. Idempotent.
    fn unregister_all(&self);

    /// Tears down the transport's endpoint machinery. Called once at bridge
    /// shutdown, after all registrations are gone; idempotent. After this,
    /// [`register`](Self::register) must refuse with
    /// [`RegistrationError::EndpointsClosed`].
    fn shutdown_endpoints(&self);
}
